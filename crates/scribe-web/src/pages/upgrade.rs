//! Upgrade Page

use leptos::prelude::*;

use crate::api;
use crate::upgrade::run_checkout;

#[component]
pub fn UpgradePage() -> impl IntoView {
    let me = LocalResource::new(api::fetch_me);

    view! {
        <div class="pricing">
            <h1>"Upgrade to Pro"</h1>
            <p class="subtitle">"Unlimited generations for busy clinicians"</p>

            <Suspense fallback=|| view! { <p class="usage">"Loading usage..."</p> }>
                {move || {
                    me.get().map(|result| match result.as_ref() {
                        Ok(info) => {
                            let line = if info.logged_in {
                                format!(
                                    "{} ({} plan) — {} of {} generations left",
                                    info.email.clone().unwrap_or_default(),
                                    info.plan,
                                    info.remaining,
                                    info.limit,
                                )
                            } else {
                                format!("{}/{} free generations used", info.used, info.limit)
                            };
                            view! { <p class="usage">{line}</p> }.into_any()
                        }
                        Err(_) => view! { <p class="usage"></p> }.into_any(),
                    })
                }}
            </Suspense>

            <div class="plans">
                <div class="plan">
                    <h2>"Free"</h2>
                    <div class="price">"$0"<span>"/month"</span></div>
                    <ul>
                        <li>"10 generations as a guest"</li>
                        <li>"11 with a free account"</li>
                        <li>"All documentation modes"</li>
                    </ul>
                    <a href="/" class="btn">"Keep using free"</a>
                </div>

                <div class="plan featured">
                    <span class="badge">"Popular"</span>
                    <h2>"Pro"</h2>
                    <div class="price">"$29"<span>"/month"</span></div>
                    <ul>
                        <li>"Unlimited generations"</li>
                        <li>"Priority processing"</li>
                        <li>"Ongoing updates"</li>
                    </ul>
                    <button
                        id="upgradeBtn"
                        class="btn btn-primary"
                        on:click=move |_| run_checkout()
                    >
                        "Upgrade to Pro"
                    </button>
                </div>
            </div>
        </div>
    }
}
