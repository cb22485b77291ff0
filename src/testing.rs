//! Fakes for the controller's backend and card seams, shared by unit tests.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::backend::{CacheCheckoutData, CheckoutBackend};
use crate::card::CardPayment;
use crate::client::{ConfirmOutcome, PaymentIntentInfo, StripeError};
use crate::error::CheckoutError;
use crate::form::{BillingDetails, ShippingDetails};

pub(crate) enum BackendReply {
    Ok,
    Status(u16),
    Wait(oneshot::Receiver<()>),
}

/// Answers the first metadata POST with the given reply, later ones with `Ok`.
pub(crate) struct FakeBackend {
    reply: RefCell<Option<BackendReply>>,
    pub(crate) posted: RefCell<Vec<CacheCheckoutData>>,
}

impl FakeBackend {
    pub(crate) fn new(reply: BackendReply) -> Self {
        FakeBackend {
            reply: RefCell::new(Some(reply)),
            posted: RefCell::new(Vec::new()),
        }
    }
}

#[async_trait(?Send)]
impl CheckoutBackend for FakeBackend {
    async fn cache_checkout_data(&self, data: &CacheCheckoutData) -> Result<(), CheckoutError> {
        self.posted.borrow_mut().push(data.clone());
        let reply = self.reply.borrow_mut().take().unwrap_or(BackendReply::Ok);
        match reply {
            BackendReply::Ok => Ok(()),
            BackendReply::Status(status) => Err(CheckoutError::Http {
                status,
                status_text: "Bad Request".into(),
            }),
            BackendReply::Wait(rx) => {
                let _ = rx.await;
                Ok(())
            }
        }
    }
}

/// Card field that resolves every confirmation with the same outcome.
pub(crate) struct FakeCard {
    outcome: ConfirmOutcome,
    disabled: Cell<bool>,
    /// When set, `set_disabled` fails the way a rejected `card.update` does.
    pub(crate) refuse_updates: Cell<bool>,
    pub(crate) confirms: RefCell<Vec<(String, BillingDetails, ShippingDetails)>>,
}

impl FakeCard {
    pub(crate) fn resolving(outcome: ConfirmOutcome) -> Self {
        FakeCard {
            outcome,
            disabled: Cell::new(false),
            refuse_updates: Cell::new(false),
            confirms: RefCell::new(Vec::new()),
        }
    }
}

#[async_trait(?Send)]
impl CardPayment for FakeCard {
    fn set_disabled(&self, disabled: bool) -> Result<(), CheckoutError> {
        if self.refuse_updates.get() {
            return Err(StripeError::new("card.update rejected").into());
        }
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
        self.confirms
            .borrow_mut()
            .push((client_secret.to_owned(), billing.clone(), shipping.clone()));
        self.outcome.clone()
    }
}

pub(crate) fn succeeded() -> ConfirmOutcome {
    ConfirmOutcome::Succeeded(PaymentIntentInfo {
        id: "pi_1".into(),
        status: "succeeded".into(),
    })
}

pub(crate) fn declined(message: &str) -> ConfirmOutcome {
    ConfirmOutcome::Error(StripeError::new(message))
}
