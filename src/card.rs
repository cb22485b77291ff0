//! Card input widget adapter.
//!
//! Creates the Stripe client and Elements factory, mounts a styled hosted
//! card field, and turns its `change` events into inline error messages.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use gloo_utils::format::JsValueSerdeExt;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Reflect;

use crate::bindings::{new_stripe, JsCardElement, JsElements, JsStripe};
use crate::client::{confirm_card_payment, js_to_stripe_error, to_js, ConfirmOutcome, StripeError};
use crate::config::CardStyle;
use crate::error::CheckoutError;
use crate::form::{BillingDetails, ShippingDetails};
use crate::view::ErrorSink;

/// The card field as the submission controller sees it.
#[async_trait(?Send)]
pub trait CardPayment {
    /// Disable or enable typing into the card field. Idempotent.
    ///
    /// On error the field keeps its previous flag.
    fn set_disabled(&self, disabled: bool) -> Result<(), CheckoutError>;

    /// Current disabled flag.
    fn is_disabled(&self) -> bool;

    /// Confirm the PaymentIntent with the card details held by the field.
    async fn confirm(
        &self,
        client_secret: &str,
        billing: &BillingDetails,
        shipping: &ShippingDetails,
    ) -> ConfirmOutcome;
}

/// Payload of the card field's `change` event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ValidationEvent {
    /// Present while the typed value is invalid.
    #[serde(default)]
    pub error: Option<StripeError>,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub empty: bool,
    #[serde(default)]
    pub brand: Option<String>,
}

impl ValidationEvent {
    /// The message to show, if any. A blank message counts as none.
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .map(|err| err.message.as_str())
            .filter(|msg| !msg.is_empty())
    }
}

/// Show or clear the inline error for one validation event.
///
/// Returns the message that is now displayed.
pub fn render_validation(event: &ValidationEvent, sink: &dyn ErrorSink) -> Option<String> {
    match event.message() {
        Some(message) => {
            sink.show_error(message);
            Some(message.to_owned())
        }
        None => {
            sink.clear_error();
            None
        }
    }
}

#[derive(Serialize)]
struct CardOptions<'a> {
    style: &'a CardStyle,
}

#[derive(Serialize)]
struct UpdateOptions {
    disabled: bool,
}

/// `true` once Stripe.js has defined `window.Stripe`.
pub fn stripe_loaded() -> bool {
    web_sys::window()
        .and_then(|win| Reflect::has(&win, &JsValue::from_str("Stripe")).ok())
        .unwrap_or(false)
}

/// Stripe client plus Elements factory for one page view.
#[derive(Debug, Clone)]
pub struct StripeContext {
    stripe: JsStripe,
    elements: JsElements,
}

impl StripeContext {
    /// `Stripe(publicKey)` followed by `stripe.elements()`.
    ///
    /// An empty key, a missing Stripe.js, or a key Stripe.js throws on all
    /// come back as errors; nothing is mounted in those cases.
    pub fn initialize(public_key: &str) -> Result<Self, CheckoutError> {
        if public_key.trim().is_empty() {
            return Err(CheckoutError::EmptyToken { field: "publishable key" });
        }
        if !stripe_loaded() {
            return Err(CheckoutError::StripeUnavailable);
        }
        let stripe = new_stripe(public_key).map_err(js_to_stripe_error)?;
        let elements = stripe
            .elements(JsValue::undefined())
            .map_err(js_to_stripe_error)?;
        Ok(StripeContext { stripe, elements })
    }

    /// Create the card field with `style` and mount it at `selector`.
    pub fn create_and_mount(&self, selector: &str, style: &CardStyle) -> Result<CardWidget, CheckoutError> {
        let options = to_js(&CardOptions { style })?;
        let card = self
            .elements
            .create_element("card", options)
            .map_err(js_to_stripe_error)?;
        card.mount(selector).map_err(js_to_stripe_error)?;
        log::debug!("card field mounted at {}", selector);

        Ok(CardWidget {
            stripe: self.stripe.clone(),
            card,
            disabled: Cell::new(false),
            last_validation_error: Rc::new(RefCell::new(None)),
            on_change: RefCell::new(None),
        })
    }
}

/// A mounted card field. Unmounts itself when dropped.
pub struct CardWidget {
    stripe: JsStripe,
    card: JsCardElement,
    disabled: Cell<bool>,
    last_validation_error: Rc<RefCell<Option<String>>>,
    on_change: RefCell<Option<Closure<dyn FnMut(JsValue)>>>,
}

impl std::fmt::Debug for CardWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardWidget")
            .field("disabled", &self.disabled.get())
            .field("last_validation_error", &self.last_validation_error.borrow())
            .finish()
    }
}

impl CardWidget {
    /// Render validation errors into `sink` as the buyer types.
    ///
    /// Replaces any earlier listener.
    pub fn on_change(&self, sink: Rc<dyn ErrorSink>) -> Result<(), CheckoutError> {
        self.remove_listener();

        let last_error = self.last_validation_error.clone();
        let closure = Closure::wrap(Box::new(move |event: JsValue| {
            let event: ValidationEvent = match event.into_serde() {
                Ok(event) => event,
                Err(err) => {
                    log::warn!("unreadable card change event: {}", err);
                    return;
                }
            };
            *last_error.borrow_mut() = render_validation(&event, sink.as_ref());
        }) as Box<dyn FnMut(JsValue)>);

        self.card
            .on("change", closure.as_ref().unchecked_ref())
            .map_err(js_to_stripe_error)?;
        *self.on_change.borrow_mut() = Some(closure);
        Ok(())
    }

    /// Latest validation message, if the field currently shows one.
    pub fn last_validation_error(&self) -> Option<String> {
        self.last_validation_error.borrow().clone()
    }

    fn remove_listener(&self) {
        if let Some(old) = self.on_change.borrow_mut().take() {
            if let Err(err) = self.card.off("change", old.as_ref().unchecked_ref()) {
                log::warn!("card.off failed: {}", js_to_stripe_error(err));
            }
        }
    }
}

impl Drop for CardWidget {
    fn drop(&mut self) {
        self.remove_listener();
        if let Err(err) = self.card.unmount() {
            log::debug!("card.unmount failed: {}", js_to_stripe_error(err));
        }
    }
}

#[async_trait(?Send)]
impl CardPayment for CardWidget {
    fn set_disabled(&self, disabled: bool) -> Result<(), CheckoutError> {
        let options = to_js(&UpdateOptions { disabled })?;
        self.card.update(options).map_err(js_to_stripe_error)?;
        self.disabled.set(disabled);
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    async fn confirm(
        &self,
        client_secret: &str,
        billing: &BillingDetails,
        shipping: &ShippingDetails,
    ) -> ConfirmOutcome {
        confirm_card_payment(&self.stripe, &self.card, client_secret, billing, shipping).await
    }
}
