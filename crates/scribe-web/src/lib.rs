//! clinscribe Web Frontend
//!
//! Leptos-based WASM frontend: note generation, Google sign-in, and the
//! Pro upgrade checkout flow.

mod api;
mod app;
mod pages;
pub mod upgrade;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);

    // Host pages that carry a bare upgrade control get the checkout flow
    // bound here; when the element is absent nothing is registered.
    let _ = upgrade::install_in_browser();
}
