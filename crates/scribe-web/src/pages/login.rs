//! Login Page

use leptos::prelude::*;

#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <div class="login">
            <h1>"Sign in"</h1>
            <p class="subtitle">
                "Sign in with Google to unlock an extra free generation and upgrade to Pro."
            </p>

            // Google Identity Services renders its button into this container;
            // the loader script lives in the host page.
            <div id="googleSignIn" class="google-signin"></div>

            <p class="note">
                <a href="/">"Continue as guest"</a>
            </p>
        </div>
    }
}
