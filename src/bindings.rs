//! yew_stripe_checkout/src/bindings.rs
//!
//! Low‐level wasm-bindgen bindings to the parts of Stripe.js v3 the card
//! checkout uses.
//!
//! Exposes the raw Stripe.js handles (`JsStripe`, `JsElements`, `JsCardElement`)
//! and their async methods via `js_sys::Promise`.
//! Higher-level wrappers live in `client.rs` and `card.rs`.

use wasm_bindgen::prelude::*;
use web_sys::js_sys::{Function, Promise};

#[wasm_bindgen]
extern "C" {
    //------------------------------------------------------------------------------
    // Core Types
    //------------------------------------------------------------------------------

    /// Raw Stripe.js client handle.
    #[wasm_bindgen(js_name = Stripe)]
    #[derive(Debug, Clone)]
    pub type JsStripe;

    /// Raw Elements factory handle.
    #[wasm_bindgen(js_name = Elements)]
    #[derive(Debug, Clone)]
    pub type JsElements;

    /// Raw card Element handle (the hosted iframe field).
    #[wasm_bindgen(js_name = CardElement)]
    #[derive(Debug, Clone)]
    pub type JsCardElement;

    //------------------------------------------------------------------------------
    // Constructors
    //------------------------------------------------------------------------------

    /// Construct a new `JsStripe` from your publishable key.
    ///
    /// ```js
    ///   const stripe = Stripe("pk_test_...");
    /// ```
    ///
    /// Stripe.js throws on an empty or malformed key; the throw surfaces as `Err`.
    #[wasm_bindgen(catch, js_name = Stripe, js_namespace = window)]
    pub fn new_stripe(publishable_key: &str) -> Result<JsStripe, JsValue>;

    //------------------------------------------------------------------------------
    // Instance Methods
    //------------------------------------------------------------------------------

    /// `stripe.elements(options)` → `JsElements`
    #[wasm_bindgen(method, catch, js_name = elements)]
    pub fn elements(this: &JsStripe, options: JsValue) -> Result<JsElements, JsValue>;

    /// `elements.create("card", { style })` → `JsCardElement`
    #[wasm_bindgen(method, catch, js_name = create)]
    pub fn create_element(
        this: &JsElements,
        element_type: &str,
        options: JsValue,
    ) -> Result<JsCardElement, JsValue>;

    /// `card.mount(selector)` → `()`
    #[wasm_bindgen(method, catch, js_name = mount)]
    pub fn mount(this: &JsCardElement, selector: &str) -> Result<(), JsValue>;

    /// `card.unmount()` → `()`
    #[wasm_bindgen(method, catch, js_name = unmount)]
    pub fn unmount(this: &JsCardElement) -> Result<(), JsValue>;

    /// `card.on("change", handler)`
    #[wasm_bindgen(method, catch, js_name = on)]
    pub fn on(this: &JsCardElement, event: &str, handler: &Function) -> Result<(), JsValue>;

    /// `card.off("change", handler)`
    #[wasm_bindgen(method, catch, js_name = off)]
    pub fn off(this: &JsCardElement, event: &str, handler: &Function) -> Result<(), JsValue>;

    /// `card.update({ disabled })`
    #[wasm_bindgen(method, catch, js_name = update)]
    pub fn update(this: &JsCardElement, options: JsValue) -> Result<(), JsValue>;

    /// `stripe.confirmCardPayment(clientSecret, data)` → JS `Promise`
    #[wasm_bindgen(method, catch, js_name = confirmCardPayment)]
    pub fn confirm_card_payment(
        this: &JsStripe,
        client_secret: &str,
        data: JsValue,
    ) -> Result<Promise, JsValue>;
}
