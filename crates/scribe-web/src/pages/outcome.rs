//! Checkout Outcome Pages

use leptos::prelude::*;

#[component]
pub fn SuccessPage() -> impl IntoView {
    view! {
        <div class="outcome">
            <h1>"Welcome to Pro"</h1>
            <p>"Your subscription is active. Unlimited generations are unlocked."</p>
            <a href="/" class="btn btn-primary">"Start writing"</a>
        </div>
    }
}

#[component]
pub fn CancelledPage() -> impl IntoView {
    view! {
        <div class="outcome">
            <h1>"Checkout cancelled"</h1>
            <p>"No payment was taken. You can upgrade any time."</p>
            <a href="/upgrade" class="btn">"Back to plans"</a>
        </div>
    }
}
