//! Upgrade Checkout Flow
//!
//! Requests a hosted checkout session and redirects the browser to it.
//! The decision logic is a pure function over the wire reply, so every
//! branch is testable without a DOM:
//!
//! - 401 redirects to the login page before the body is even parsed
//! - any other 2xx navigates to the returned checkout URL
//! - everything else surfaces a blocking notification
//!
//! The DOM side is injected through small traits; the browser adapters live
//! at the bottom of the module.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;

/// Checkout session endpoint
pub const CHECKOUT_ENDPOINT: &str = "/api/create-checkout-session";

/// Where unauthenticated users are sent, with the post-login destination
pub const LOGIN_REDIRECT: &str = "/login?next=/upgrade";

/// Shown when the server gives no usable error message
pub const FALLBACK_MESSAGE: &str = "Checkout failed";

/// Prefix for the user-facing notification
pub const ALERT_PREFIX: &str = "Checkout error: ";

/// Element id of the upgrade control
pub const UPGRADE_BUTTON_ID: &str = "upgradeBtn";

/// One checkout reply as seen over the wire. `body` is `None` when the
/// response had no parsable JSON body.
#[derive(Clone, Debug)]
pub struct HttpReply {
    pub status: u16,
    pub body: Option<serde_json::Value>,
}

/// The step to take after a checkout request settles
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Full-page redirect
    Navigate(String),
    /// Blocking user notification
    Notify(String),
}

/// Decide the next step from a settled checkout request.
///
/// `Err` carries a transport failure (network or request construction);
/// its message is surfaced verbatim.
pub fn resolve(reply: Result<HttpReply, String>) -> Step {
    let reply = match reply {
        Ok(reply) => reply,
        Err(message) => return Step::Notify(message),
    };

    // Unauthenticated: redirect, body ignored.
    if reply.status == 401 {
        return Step::Navigate(LOGIN_REDIRECT.into());
    }

    if (200..300).contains(&reply.status) {
        return match reply.body.as_ref().and_then(|b| b["url"].as_str()) {
            Some(url) => Step::Navigate(url.to_string()),
            None => Step::Notify(FALLBACK_MESSAGE.into()),
        };
    }

    let message = reply
        .body
        .as_ref()
        .and_then(|b| b["error"].as_str())
        .unwrap_or(FALLBACK_MESSAGE);
    Step::Notify(message.to_string())
}

/// Full-page navigation
pub trait Navigator {
    fn navigate(&self, url: &str);
}

/// Blocking user notification plus a diagnostic log entry
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// A clickable control that may be absent from the page
pub trait ClickSource {
    /// Attach a click handler; returns false when the control is absent
    /// (the handler is dropped and nothing is registered).
    fn attach(&self, handler: Box<dyn FnMut()>) -> bool;
}

/// Apply a resolved step to the injected DOM adapters
pub fn perform(step: Step, navigator: &dyn Navigator, notifier: &dyn Notifier) {
    match step {
        Step::Navigate(url) => navigator.navigate(&url),
        Step::Notify(message) => notifier.notify(&message),
    }
}

/// Bind the checkout trigger to the upgrade control, if present
pub fn install(source: &dyn ClickSource, trigger: Box<dyn FnMut()>) -> bool {
    source.attach(trigger)
}

/// The notification text shown to the user
pub fn alert_text(message: &str) -> String {
    format!("{ALERT_PREFIX}{message}")
}

// ---------------------------------------------------------------------------
// Browser adapters
// ---------------------------------------------------------------------------

/// Navigates via `window.location`
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(url);
        }
    }
}

/// Logs to the console and shows a blocking alert
pub struct BrowserNotifier;

impl Notifier for BrowserNotifier {
    fn notify(&self, message: &str) {
        let text = alert_text(message);
        web_sys::console::error_1(&text.as_str().into());
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(&text);
        }
    }
}

/// A DOM element looked up by id
pub struct DomClickSource {
    element_id: String,
}

impl DomClickSource {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

impl ClickSource for DomClickSource {
    fn attach(&self, mut handler: Box<dyn FnMut()>) -> bool {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return false;
        };
        let Some(element) = document.get_element_by_id(&self.element_id) else {
            return false;
        };

        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            handler();
        }) as Box<dyn FnMut(web_sys::Event)>);

        if element
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .is_err()
        {
            return false;
        }

        // Listener lives for the page lifetime.
        closure.forget();
        true
    }
}

/// One best-effort checkout attempt: no retry, no timeout, no in-flight
/// guard. A second click starts an independent attempt.
pub async fn initiate(navigator: &dyn Navigator, notifier: &dyn Notifier) {
    let reply = crate::api::checkout_reply().await;
    perform(resolve(reply), navigator, notifier);
}

/// Click handler used by the upgrade page button
pub fn run_checkout() {
    leptos::task::spawn_local(async {
        initiate(&BrowserNavigator, &BrowserNotifier).await;
    });
}

/// Page-load binding: attach the checkout flow to `upgradeBtn` when the
/// element exists, otherwise do nothing.
pub fn install_in_browser() -> bool {
    let source = DomClickSource::new(UPGRADE_BUTTON_ID);
    install(&source, Box::new(run_checkout))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn reply(status: u16, body: Option<serde_json::Value>) -> Result<HttpReply, String> {
        Ok(HttpReply { status, body })
    }

    #[test]
    fn test_success_navigates_to_checkout_url() {
        let step = resolve(reply(
            200,
            Some(serde_json::json!({ "url": "https://pay.example/session/abc" })),
        ));
        assert_eq!(step, Step::Navigate("https://pay.example/session/abc".into()));
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        // Body content is ignored on 401.
        let step = resolve(reply(
            401,
            Some(serde_json::json!({ "url": "https://pay.example/ignored" })),
        ));
        assert_eq!(step, Step::Navigate("/login?next=/upgrade".into()));
    }

    #[test]
    fn test_server_error_uses_server_message() {
        let step = resolve(reply(
            500,
            Some(serde_json::json!({ "error": "card declined" })),
        ));
        assert_eq!(step, Step::Notify("card declined".into()));
    }

    #[test]
    fn test_server_error_without_body_uses_fallback() {
        assert_eq!(resolve(reply(500, None)), Step::Notify("Checkout failed".into()));
    }

    #[test]
    fn test_server_error_without_error_field_uses_fallback() {
        let step = resolve(reply(502, Some(serde_json::json!({ "detail": "nope" }))));
        assert_eq!(step, Step::Notify("Checkout failed".into()));
    }

    #[test]
    fn test_transport_failure_surfaces_message() {
        let step = resolve(Err("connection reset".into()));
        assert_eq!(step, Step::Notify("connection reset".into()));
    }

    #[test]
    fn test_success_without_url_notifies_fallback() {
        let step = resolve(reply(200, Some(serde_json::json!({}))));
        assert_eq!(step, Step::Notify("Checkout failed".into()));
    }

    #[test]
    fn test_alert_text_prefix() {
        assert_eq!(alert_text("card declined"), "Checkout error: card declined");
    }

    #[derive(Default)]
    struct Recorder {
        navigations: RefCell<Vec<String>>,
        notifications: RefCell<Vec<String>>,
    }

    impl Navigator for Recorder {
        fn navigate(&self, url: &str) {
            self.navigations.borrow_mut().push(url.to_string());
        }
    }

    impl Notifier for Recorder {
        fn notify(&self, message: &str) {
            self.notifications.borrow_mut().push(message.to_string());
        }
    }

    #[test]
    fn test_perform_dispatches_navigate() {
        let recorder = Recorder::default();
        perform(
            Step::Navigate("https://pay.example/s".into()),
            &recorder,
            &recorder,
        );
        assert_eq!(recorder.navigations.borrow().as_slice(), ["https://pay.example/s"]);
        assert!(recorder.notifications.borrow().is_empty());
    }

    #[test]
    fn test_perform_dispatches_notify_without_navigation() {
        let recorder = Recorder::default();
        perform(Step::Notify("card declined".into()), &recorder, &recorder);
        assert!(recorder.navigations.borrow().is_empty());
        assert_eq!(recorder.notifications.borrow().as_slice(), ["card declined"]);
    }

    /// Control present: stores the handler so the test can simulate a click.
    #[derive(Default)]
    struct PresentControl {
        handler: RefCell<Option<Box<dyn FnMut()>>>,
    }

    impl ClickSource for PresentControl {
        fn attach(&self, handler: Box<dyn FnMut()>) -> bool {
            *self.handler.borrow_mut() = Some(handler);
            true
        }
    }

    /// Control absent from the page: drops the handler.
    struct AbsentControl;

    impl ClickSource for AbsentControl {
        fn attach(&self, _handler: Box<dyn FnMut()>) -> bool {
            false
        }
    }

    #[test]
    fn test_install_fires_trigger_on_click() {
        let control = PresentControl::default();
        let clicks = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&clicks);

        assert!(install(
            &control,
            Box::new(move || *counter.borrow_mut() += 1)
        ));

        let mut handler = control.handler.borrow_mut();
        let handler = handler.as_mut().unwrap();
        handler();
        handler();
        assert_eq!(*clicks.borrow(), 2);
    }

    #[test]
    fn test_install_absent_control_registers_nothing() {
        let clicks = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&clicks);

        assert!(!install(
            &AbsentControl,
            Box::new(move || *counter.borrow_mut() += 1)
        ));
        assert_eq!(*clicks.borrow(), 0);
    }
}
