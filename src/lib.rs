//! Stripe card checkout for WebAssembly front-ends.
//!
//! Two ways in:
//! - `initCheckout(config?)` / `initCountryField(config?)` bind to a
//!   server-rendered checkout template ([`page`], [`country`]);
//! - [`StripeCardCheckout`] renders the same checkout as a Yew component.
//!
//! Both drive one [`CheckoutController`]: lock the form, cache buyer
//! metadata on the server, confirm the PaymentIntent with the hosted card
//! field, then submit or revert.

pub mod backend;
pub mod bindings;
pub mod card;
pub mod checkout_component;
pub mod client;
pub mod components;
pub mod config;
pub mod controller;
pub mod country;
pub mod error;
pub mod form;
pub mod interop;
pub mod logging;
pub mod page;
pub mod session;
pub mod view;

#[cfg(test)]
mod testing;

pub use backend::{CacheCheckoutData, CheckoutBackend, HttpBackend};
pub use bindings::*;
pub use card::{CardPayment, CardWidget, StripeContext, ValidationEvent};
pub use checkout_component::*;
pub use client::{ConfirmOutcome, PaymentIntentInfo, StripeError};
pub use components::*;
pub use config::{CardStyle, CheckoutConfig, CountryFieldConfig};
pub use controller::{CheckoutController, SubmitOutcome, SubmitState};
pub use error::CheckoutError;
pub use form::CheckoutFormSnapshot;
pub use interop::use_stripejs;
pub use session::PaymentSession;
pub use view::{CheckoutView, ErrorSink};
