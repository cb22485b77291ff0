//! interop.rs
//!
//! Custom Yew hook to load Stripe.js v3 at runtime (no inline JS).
//!
//! # Overview
//! This hook, `use_stripejs()`, injects a single
//! `<script id="stripejs-sdk" src="https://js.stripe.com/v3/" defer>`
//! into `<head>` on first use, returns `false` until the
//! script’s `load` event fires, then returns `true`
//! on every subsequent call.
//!
//! Server-rendered pages load Stripe.js from the template instead and only
//! need [`crate::card::stripe_loaded`].
//!
//! # Usage
//! ```rust,ignore
//! use yew::prelude::*;
//! use yew_stripe_checkout::use_stripejs;
//!
//! #[function_component(App)]
//! fn app() -> Html {
//!     let stripe_ready = use_stripejs();
//!     html! {
//!         if stripe_ready {
//!             <p>{"✅ Stripe.js loaded"}</p>
//!         } else {
//!             <p>{"⏳ Loading Stripe.js..."}</p>
//!         }
//!     }
//! }
//! ```

use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::HtmlScriptElement;
use yew::functional::hook;
use yew::prelude::*;

use crate::card::stripe_loaded;

/// Id of the injected `<script>`.
pub const STRIPE_SCRIPT_ID: &str = "stripejs-sdk";
/// Stripe.js v3.
pub const STRIPE_SCRIPT_SRC: &str = "https://js.stripe.com/v3/";

/// Custom hook: load Stripe.js v3 exactly once and track readiness.
///
/// # Returns
/// - `false` while the `<script>` is being fetched & parsed.
/// - `true` once `window.Stripe` exists (script loaded & parsed).
///
/// All components using `use_stripejs()` share the same `<script>`.
#[hook]
pub fn use_stripejs() -> bool {
    let loaded = use_state(stripe_loaded);

    {
        let loaded = loaded.clone();
        use_effect_with((), move |_| {
            if !*loaded {
                let on_load = {
                    let loaded = loaded.clone();
                    Closure::wrap(Box::new(move || loaded.set(true)) as Box<dyn Fn()>)
                };
                match inject_script(&on_load) {
                    // Leak so it lives until the load event.
                    Ok(()) => on_load.forget(),
                    Err(err) => log::error!("could not load Stripe.js: {:?}", err),
                }
            }
            || ()
        });
    }

    *loaded
}

/// Insert the Stripe.js `<script>` unless a previous call already did.
///
/// When the script is already in `<head>`, `on_load` is attached to it so a
/// second component still learns when loading finishes.
fn inject_script(on_load: &Closure<dyn Fn()>) -> Result<(), JsValue> {
    let document = gloo_utils::document();

    if let Some(existing) = document.get_element_by_id(STRIPE_SCRIPT_ID) {
        existing.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
        return Ok(());
    }

    let script: HtmlScriptElement = document.create_element("script")?.dyn_into()?;
    script.set_id(STRIPE_SCRIPT_ID);
    script.set_src(STRIPE_SCRIPT_SRC);
    script.set_defer(true);
    script.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;

    document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no <head>"))?
        .append_child(&script)?;
    log::debug!("injected {}", STRIPE_SCRIPT_SRC);
    Ok(())
}
