//! Consult Page

use leptos::prelude::*;

use crate::api;

const CONSULT_MODES: [(&str, &str); 3] = [
    ("consult_note", "Consult note"),
    ("handover", "Handover"),
    ("discharge_summary", "Discharge summary"),
];

#[component]
pub fn ConsultPage() -> impl IntoView {
    let (text, set_text) = signal(String::new());
    let (mode, set_mode) = signal(String::from("consult_note"));
    let (answer, set_answer) = signal(String::new());
    let (error, set_error) = signal(String::new());
    let (loading, set_loading) = signal(false);

    let build = move |_| {
        let dictation = text.get();
        if dictation.trim().is_empty() || loading.get() {
            return;
        }

        set_error.set(String::new());
        set_loading.set(true);

        let selected_mode = mode.get();
        leptos::task::spawn_local(async move {
            match api::consult(&dictation, &selected_mode).await {
                Ok(result) => set_answer.set(result),
                Err(e) => set_error.set(e),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="consult">
            <h1>"Consult notes"</h1>
            <p class="subtitle">"Turn raw dictation into a note, handover, or discharge summary"</p>

            <div class="field">
                <label>"Output"</label>
                <select on:change=move |ev| set_mode.set(event_target_value(&ev))>
                    {CONSULT_MODES
                        .iter()
                        .map(|(value, label)| {
                            view! { <option value=*value>{*label}</option> }
                        })
                        .collect_view()}
                </select>
            </div>

            <textarea
                placeholder="Dictate or paste the consultation..."
                prop:value=move || text.get()
                on:input=move |ev| set_text.set(event_target_value(&ev))
            />

            <button on:click=build disabled=move || loading.get()>
                {move || if loading.get() { "Building..." } else { "Build note" }}
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
        </div>
    }
}
