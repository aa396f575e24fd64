//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::{CancelledPage, ConsultPage, HomePage, LoginPage, SuccessPage, UpgradePage};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/consult") view=ConsultPage />
                    <Route path=path!("/login") view=LoginPage />
                    <Route path=path!("/upgrade") view=UpgradePage />
                    <Route path=path!("/pro/success") view=SuccessPage />
                    <Route path=path!("/pro/cancelled") view=CancelledPage />
                </Routes>
            </main>
        </Router>
    }
}
