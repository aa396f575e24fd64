//! Home Page

use leptos::prelude::*;

use crate::api;

const GENERATE_MODES: [(&str, &str); 6] = [
    ("clinical", "Clinical reasoning"),
    ("differential", "Differential diagnosis"),
    ("medication_review", "Medication review"),
    ("investigation_plan", "Investigation plan"),
    ("dva_new", "DVA D0904 new referral"),
    ("dva_renew", "DVA D0904 renewal"),
];

#[component]
pub fn HomePage() -> impl IntoView {
    let (query, set_query) = signal(String::new());
    let (mode, set_mode) = signal(String::from("clinical"));
    let (answer, set_answer) = signal(String::new());
    let (error, set_error) = signal(String::new());
    let (loading, set_loading) = signal(false);

    // Hand out the guest cookie before the first generation.
    leptos::task::spawn_local(async {
        api::ensure_session().await;
    });

    let generate = move |_| {
        let text = query.get();
        if text.trim().is_empty() || loading.get() {
            return;
        }

        set_error.set(String::new());
        set_loading.set(true);

        let selected_mode = mode.get();
        leptos::task::spawn_local(async move {
            match api::generate(&text, &selected_mode).await {
                Ok(result) => set_answer.set(result),
                Err(e) => set_error.set(e),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="home">
            <header class="hero">
                <h1>"clinscribe"</h1>
                <p class="tagline">"Structured clinical notes and DVA referrals from dictation"</p>
                <div class="cta">
                    <a href="/consult" class="btn">"Consult notes"</a>
                    <a href="/upgrade" class="btn">"Go Pro"</a>
                </div>
            </header>

            <section class="generator">
                <div class="field">
                    <label>"Mode"</label>
                    <select on:change=move |ev| set_mode.set(event_target_value(&ev))>
                        {GENERATE_MODES
                            .iter()
                            .map(|(value, label)| {
                                view! { <option value=*value>{*label}</option> }
                            })
                            .collect_view()}
                    </select>
                </div>

                <textarea
                    placeholder="Paste notes or dictation..."
                    prop:value=move || query.get()
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                />

                <button on:click=generate disabled=move || loading.get()>
                    {move || if loading.get() { "Generating..." } else { "Generate" }}
                </button>

                <Show when=move || !error.get().is_empty()>
                    <p class="error">
                        {move || error.get()}
                        " "
                        <a href="/upgrade">"Upgrade to Pro"</a>
                    </p>
                </Show>

                <Show when=move || !answer.get().is_empty()>
                    <pre class="answer">{move || answer.get()}</pre>
                </Show>
            </section>
        </div>
    }
}
