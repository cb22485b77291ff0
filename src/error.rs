//! Crate error type.

use wasm_bindgen::JsValue;

use crate::client::StripeError;

/// Everything that can go wrong while wiring or driving the checkout page.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// An element the page contract requires is not in the document.
    #[error("missing element `#{0}`")]
    MissingElement(String),

    /// An element exists but is not of the expected kind.
    #[error("element `#{id}` is not a {expected}")]
    UnexpectedElement {
        /// Element id.
        id: String,
        /// Expected DOM interface, e.g. `HTMLFormElement`.
        expected: &'static str,
    },

    /// A session token in the markup is not a quote-wrapped string.
    #[error("malformed {field}: expected a quoted value")]
    MalformedToken {
        /// Which token, e.g. `publishable key`.
        field: &'static str,
    },

    /// A session token unwrapped to nothing.
    #[error("empty {field}")]
    EmptyToken {
        /// Which token, e.g. `client secret`.
        field: &'static str,
    },

    /// Stripe.js is not loaded on the page.
    #[error("Stripe.js is not loaded")]
    StripeUnavailable,

    /// Stripe.js reported an error.
    #[error(transparent)]
    Stripe(#[from] StripeError),

    /// The metadata endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {status_text}")]
    Http {
        /// Status code.
        status: u16,
        /// Status text.
        status_text: String,
    },

    /// The request never got an answer.
    #[error("request failed: {0}")]
    Request(String),

    /// A JS exception that is not a Stripe error.
    #[error("javascript error: {0}")]
    Js(String),

    /// Converting between Rust values and JS objects failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CheckoutError {
    /// Build a [`CheckoutError::Js`] from any thrown value.
    pub fn js(value: &JsValue) -> Self {
        CheckoutError::Js(js_error_message(value))
    }
}

impl From<serde_wasm_bindgen::Error> for CheckoutError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        CheckoutError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        CheckoutError::Serialization(err.to_string())
    }
}

impl From<gloo_net::Error> for CheckoutError {
    fn from(err: gloo_net::Error) -> Self {
        CheckoutError::Request(err.to_string())
    }
}

impl From<CheckoutError> for JsValue {
    fn from(err: CheckoutError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    web_sys::js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
