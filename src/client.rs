//! yew_stripe_checkout/src/client.rs
//!
//! High-level Rust API over `stripe.confirmCardPayment` and the Stripe.js
//! error object.
//!
//! This module provides:
//! - `StripeError`, the typed form of Stripe.js error payloads.
//! - `PaymentIntentInfo` and `ConfirmOutcome`, the typed result of a confirmation.
//! - `confirm_card_payment()` to confirm a PaymentIntent with the mounted card
//!   field plus billing and shipping details.
//!
//! # Example Usage
//! ```rust,ignore
//! use yew_stripe_checkout::client::{confirm_card_payment, ConfirmOutcome};
//!
//! match confirm_card_payment(&stripe, &card, &secret, &billing, &shipping).await {
//!     ConfirmOutcome::Succeeded(info) => log::info!("Paid: {}", info.id),
//!     ConfirmOutcome::Error(err) => log::error!("Error: {}", err.message),
//!     ConfirmOutcome::Unhandled(info) => log::warn!("Status: {}", info.status),
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Object, Reflect};

use crate::bindings::{JsCardElement, JsStripe};
use crate::form::{BillingDetails, ShippingDetails};

/// The only PaymentIntent status the checkout acts on.
pub const STATUS_SUCCEEDED: &str = "succeeded";

/// Representation of a Stripe.js error object.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct StripeError {
    /// Human-readable message.
    pub message: String,
    /// Stripe’s error type, e.g. `"card_error"`.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Optional Stripe error code, e.g. `"card_declined"`.
    #[serde(default)]
    pub code: Option<String>,
}

impl StripeError {
    /// An error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        StripeError {
            message: message.into(),
            error_type: None,
            code: None,
        }
    }
}

/// Minimal representation of a PaymentIntent after confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PaymentIntentInfo {
    /// Stripe’s identifier, e.g. `pi_1Fxxxxxx`.
    #[serde(default)]
    pub id: String,
    /// Status, e.g. `"succeeded"` or `"requires_action"`.
    pub status: String,
}

/// What `confirmCardPayment` resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The PaymentIntent reached `succeeded`.
    Succeeded(PaymentIntentInfo),
    /// Stripe rejected the payment or the call failed.
    Error(StripeError),
    /// A PaymentIntent came back in any other status.
    Unhandled(PaymentIntentInfo),
}

/// Raw `{ error }` / `{ paymentIntent }` resolution value.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmResult {
    #[serde(default)]
    pub error: Option<StripeError>,
    #[serde(rename = "paymentIntent", default)]
    pub payment_intent: Option<PaymentIntentInfo>,
}

impl From<ConfirmResult> for ConfirmOutcome {
    fn from(result: ConfirmResult) -> Self {
        match (result.error, result.payment_intent) {
            (Some(err), _) => ConfirmOutcome::Error(err),
            (None, Some(intent)) if intent.status == STATUS_SUCCEEDED => {
                ConfirmOutcome::Succeeded(intent)
            }
            (None, Some(intent)) => ConfirmOutcome::Unhandled(intent),
            (None, None) => ConfirmOutcome::Error(StripeError::new(
                "Stripe returned neither an error nor a PaymentIntent",
            )),
        }
    }
}

/// Serialize to a plain JS object (no `Map`s) the way Stripe.js expects options.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::json_compatible())
}

/// Confirm the PaymentIntent behind `client_secret` with the mounted card field.
///
/// Sends
/// `{ payment_method: { card, billing_details }, shipping }`.
/// Never retries; every failure is folded into [`ConfirmOutcome::Error`].
pub async fn confirm_card_payment(
    stripe: &JsStripe,
    card: &JsCardElement,
    client_secret: &str,
    billing: &BillingDetails,
    shipping: &ShippingDetails,
) -> ConfirmOutcome {
    let data = match confirm_data(card, billing, shipping) {
        Ok(data) => data,
        Err(err) => return ConfirmOutcome::Error(err),
    };

    let promise = match stripe.confirm_card_payment(client_secret, data) {
        Ok(p) => p,
        Err(e) => return ConfirmOutcome::Error(js_to_stripe_error(e)),
    };

    match JsFuture::from(promise).await {
        Ok(js_val) => match from_value::<ConfirmResult>(js_val) {
            Ok(result) => result.into(),
            Err(err) => ConfirmOutcome::Error(serde_error_to_stripe_error(err)),
        },
        Err(js_err) => ConfirmOutcome::Error(js_to_stripe_error(js_err)),
    }
}

fn confirm_data(
    card: &JsCardElement,
    billing: &BillingDetails,
    shipping: &ShippingDetails,
) -> Result<JsValue, StripeError> {
    let payment_method = Object::new();
    Reflect::set(&payment_method, &"card".into(), card.as_ref()).map_err(js_to_stripe_error)?;
    let billing_js = to_js(billing).map_err(serde_error_to_stripe_error)?;
    Reflect::set(&payment_method, &"billing_details".into(), &billing_js)
        .map_err(js_to_stripe_error)?;

    let data = Object::new();
    Reflect::set(&data, &"payment_method".into(), &payment_method).map_err(js_to_stripe_error)?;
    let shipping_js = to_js(shipping).map_err(serde_error_to_stripe_error)?;
    Reflect::set(&data, &"shipping".into(), &shipping_js).map_err(js_to_stripe_error)?;
    Ok(data.into())
}

/// Convert any caught `JsValue` into a `StripeError` with best effort.
pub(crate) fn js_to_stripe_error(value: JsValue) -> StripeError {
    from_value::<StripeError>(value.clone())
        .unwrap_or_else(|_| StripeError::new(crate::error::js_error_message(&value)))
}

/// Convert a `serde_wasm_bindgen::Error` into `StripeError`.
fn serde_error_to_stripe_error(err: serde_wasm_bindgen::Error) -> StripeError {
    StripeError::new(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome(value: serde_json::Value) -> ConfirmOutcome {
        serde_json::from_value::<ConfirmResult>(value).unwrap().into()
    }

    #[test]
    fn error_payload_wins() {
        let got = outcome(json!({
            "error": {
                "type": "card_error",
                "code": "card_declined",
                "message": "Your card was declined."
            }
        }));
        assert_eq!(
            got,
            ConfirmOutcome::Error(StripeError {
                message: "Your card was declined.".into(),
                error_type: Some("card_error".into()),
                code: Some("card_declined".into()),
            })
        );
    }

    #[test]
    fn only_succeeded_is_success() {
        let got = outcome(json!({
            "paymentIntent": { "id": "pi_1", "status": "succeeded", "amount": 2500 }
        }));
        assert!(matches!(got, ConfirmOutcome::Succeeded(ref pi) if pi.id == "pi_1"));

        let got = outcome(json!({
            "paymentIntent": { "id": "pi_2", "status": "requires_action" }
        }));
        assert!(matches!(got, ConfirmOutcome::Unhandled(ref pi) if pi.status == "requires_action"));
    }

    #[test]
    fn empty_result_is_an_error() {
        assert!(matches!(outcome(json!({})), ConfirmOutcome::Error(_)));
    }
}
