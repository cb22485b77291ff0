//! Checkout submission controller.
//!
//! One submission is a linear pipeline:
//!
//! 1. guard against a second submit and switch the page to "submitting",
//! 2. cache the buyer metadata on the server,
//! 3. confirm the PaymentIntent with the card field,
//! 4. hand the form to the browser on success, or revert the page.
//!
//! The controller owns no DOM; everything goes through [`CheckoutView`],
//! [`CheckoutBackend`] and [`CardPayment`].

use std::cell::RefCell;

use crate::backend::{CacheCheckoutData, CheckoutBackend};
use crate::card::CardPayment;
use crate::client::{ConfirmOutcome, PaymentIntentInfo};
use crate::session::PaymentSession;
use crate::view::CheckoutView;

/// Where the page is in the submit sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    /// The last attempt was declined. The buyer may submit again.
    Failed,
}

/// How one call to [`CheckoutController::submit`] ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing happened.
    Ignored,
    /// Payment succeeded and the form was handed to the browser.
    Submitted(PaymentIntentInfo),
    /// Caching metadata failed and the page is reloading.
    Reloaded,
    /// Stripe declined; the message is on screen and the form is usable again.
    Declined(String),
    /// Stripe returned a status this checkout does not act on (e.g. `requires_action`).
    Unhandled(String),
}

/// Drives one page view's submissions.
pub struct CheckoutController<V, B, C> {
    session: PaymentSession,
    view: V,
    backend: B,
    card: C,
    state: RefCell<SubmitState>,
}

impl<V, B, C> CheckoutController<V, B, C>
where
    V: CheckoutView,
    B: CheckoutBackend,
    C: CardPayment,
{
    pub fn new(session: PaymentSession, view: V, backend: B, card: C) -> Self {
        CheckoutController {
            session,
            view,
            backend,
            card,
            state: RefCell::new(SubmitState::Idle),
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn card(&self) -> &C {
        &self.card
    }

    /// Run one submission. The caller has already suppressed the native POST.
    ///
    /// Ignored while a submission is in flight and after one has succeeded.
    pub async fn submit(&self) -> SubmitOutcome {
        let state = self.state();
        if matches!(state, SubmitState::Submitting | SubmitState::Succeeded) {
            log::debug!("submit ignored: {:?}", state);
            return SubmitOutcome::Ignored;
        }
        self.set_state(SubmitState::Submitting);
        self.enter_submitting();

        let form = self.view.read_form();
        let metadata = CacheCheckoutData {
            csrfmiddlewaretoken: self.view.csrf_token(),
            client_secret: self.session.client_secret.clone(),
            save_info: self.view.save_info(),
        };

        if let Err(err) = self.backend.cache_checkout_data(&metadata).await {
            log::warn!("caching checkout data failed, reloading: {}", err);
            self.leave_submitting();
            self.set_state(SubmitState::Failed);
            self.view.reload();
            return SubmitOutcome::Reloaded;
        }

        let outcome = self
            .card
            .confirm(
                &self.session.client_secret,
                &form.billing_details(),
                &form.shipping_details(),
            )
            .await;

        match outcome {
            ConfirmOutcome::Error(err) => {
                log::info!("payment declined: {}", err.message);
                self.view.show_error(&err.message);
                self.leave_submitting();
                self.set_state(SubmitState::Failed);
                SubmitOutcome::Declined(err.message)
            }
            ConfirmOutcome::Succeeded(intent) => {
                log::info!("payment {} succeeded", intent.id);
                self.set_state(SubmitState::Succeeded);
                self.view.submit_native();
                SubmitOutcome::Submitted(intent)
            }
            ConfirmOutcome::Unhandled(intent) => {
                // Left as-is: the page stays in its submitting state.
                log::warn!("payment {} returned unhandled status `{}`", intent.id, intent.status);
                SubmitOutcome::Unhandled(intent.status)
            }
        }
    }

    fn set_state(&self, state: SubmitState) {
        log::debug!("checkout state {:?} -> {:?}", self.state(), state);
        *self.state.borrow_mut() = state;
    }

    /// A card field that refuses `update` is logged and left as it is; the
    /// in-flight guard is the state, not the field.
    fn set_card_disabled(&self, disabled: bool) {
        if let Err(err) = self.card.set_disabled(disabled) {
            log::warn!("card field stayed {}: {}", if disabled { "enabled" } else { "disabled" }, err);
        }
    }

    fn enter_submitting(&self) {
        self.set_card_disabled(true);
        self.view.set_submit_enabled(false);
        self.view.show_loading(true);
    }

    /// Panels first, then the inputs.
    fn leave_submitting(&self) {
        self.view.show_loading(false);
        self.set_card_disabled(false);
        self.view.set_submit_enabled(true);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::FutureExt;

    use super::*;
    use crate::form::CheckoutFormSnapshot;
    use crate::testing::{declined, succeeded, BackendReply, FakeBackend, FakeCard};
    use crate::view::ErrorSink;

    #[derive(Default)]
    struct FakeView {
        error_text: RefCell<String>,
        loading: Cell<bool>,
        submit_enabled: Cell<bool>,
        native_submits: Cell<u32>,
        reloads: Cell<u32>,
        events: RefCell<Vec<&'static str>>,
    }

    impl FakeView {
        fn new() -> Self {
            let view = FakeView::default();
            view.submit_enabled.set(true);
            view
        }

        fn form_panel_visible(&self) -> bool {
            !self.loading.get()
        }
    }

    impl ErrorSink for FakeView {
        fn show_error(&self, message: &str) {
            *self.error_text.borrow_mut() = message.to_owned();
        }
        fn clear_error(&self) {
            self.error_text.borrow_mut().clear();
        }
    }

    impl CheckoutView for FakeView {
        fn read_form(&self) -> CheckoutFormSnapshot {
            CheckoutFormSnapshot::read_with(|name| match name {
                "full_name" => Some(" Ada Lovelace ".into()),
                "email" => Some("ada@example.com".into()),
                "postcode" => Some("N1 9GU".into()),
                _ => None,
            })
        }
        fn csrf_token(&self) -> String {
            "csrf-123".into()
        }
        fn save_info(&self) -> bool {
            true
        }
        fn show_loading(&self, loading: bool) {
            self.events.borrow_mut().push(if loading { "overlay-on" } else { "overlay-off" });
            self.loading.set(loading);
        }
        fn set_submit_enabled(&self, enabled: bool) {
            self.events.borrow_mut().push(if enabled { "submit-on" } else { "submit-off" });
            self.submit_enabled.set(enabled);
        }
        fn submit_native(&self) {
            self.native_submits.set(self.native_submits.get() + 1);
        }
        fn reload(&self) {
            self.events.borrow_mut().push("reload");
            self.reloads.set(self.reloads.get() + 1);
        }
    }

    fn controller(
        backend: BackendReply,
        outcome: ConfirmOutcome,
    ) -> CheckoutController<FakeView, FakeBackend, FakeCard> {
        CheckoutController::new(
            PaymentSession::new("pk_test_1", "pi_1_secret_2").unwrap(),
            FakeView::new(),
            FakeBackend::new(backend),
            FakeCard::resolving(outcome),
        )
    }

    fn assert_idle_ui(c: &CheckoutController<FakeView, FakeBackend, FakeCard>) {
        assert!(c.view().form_panel_visible());
        assert!(c.view().submit_enabled.get());
        assert!(!c.card().is_disabled());
    }

    #[test]
    fn success_submits_the_form_once() {
        let c = controller(BackendReply::Ok, succeeded());
        let outcome = block_on(c.submit());

        assert!(matches!(outcome, SubmitOutcome::Submitted(ref pi) if pi.id == "pi_1"));
        assert_eq!(c.state(), SubmitState::Succeeded);
        assert_eq!(c.view().native_submits.get(), 1);
        assert_eq!(c.view().reloads.get(), 0);

        let posted = c.backend.posted.borrow();
        assert_eq!(
            posted.as_slice(),
            &[CacheCheckoutData {
                csrfmiddlewaretoken: "csrf-123".into(),
                client_secret: "pi_1_secret_2".into(),
                save_info: true,
            }]
        );

        let confirms = c.card().confirms.borrow();
        assert_eq!(confirms.len(), 1);
        let (secret, billing, shipping) = &confirms[0];
        assert_eq!(secret, "pi_1_secret_2");
        assert_eq!(billing.name, "Ada Lovelace");
        assert_eq!(shipping.address.postal_code.as_deref(), Some("N1 9GU"));
    }

    #[test]
    fn submit_after_success_is_ignored() {
        let c = controller(BackendReply::Ok, succeeded());
        block_on(c.submit());
        let again = block_on(c.submit());

        assert_eq!(again, SubmitOutcome::Ignored);
        assert_eq!(c.state(), SubmitState::Succeeded);
        assert_eq!(c.backend.posted.borrow().len(), 1);
        assert_eq!(c.card().confirms.borrow().len(), 1);
        assert_eq!(c.view().native_submits.get(), 1);
    }

    #[test]
    fn card_update_failure_does_not_stall_the_submission() {
        let c = controller(BackendReply::Ok, declined("Your card was declined."));
        c.card().refuse_updates.set(true);

        let outcome = block_on(c.submit());

        assert_eq!(outcome, SubmitOutcome::Declined("Your card was declined.".into()));
        assert_eq!(c.state(), SubmitState::Failed);
        assert_eq!(
            c.view().events.borrow().as_slice(),
            &["submit-off", "overlay-on", "overlay-off", "submit-on"]
        );
        // the field never left its enabled state, so it agrees with the button again
        assert_idle_ui(&c);
    }

    #[test]
    fn metadata_failure_reloads_without_confirming() {
        let c = controller(BackendReply::Status(400), succeeded());
        let outcome = block_on(c.submit());

        assert_eq!(outcome, SubmitOutcome::Reloaded);
        assert_eq!(c.view().reloads.get(), 1);
        assert!(c.card().confirms.borrow().is_empty());
        assert_eq!(c.view().native_submits.get(), 0);
        assert_idle_ui(&c);
        assert_eq!(
            c.view().events.borrow().as_slice(),
            &["submit-off", "overlay-on", "overlay-off", "submit-on", "reload"]
        );
    }

    #[test]
    fn decline_shows_message_and_reverts_ui() {
        let c = controller(
            BackendReply::Ok,
            declined("Your card was declined."),
        );
        let outcome = block_on(c.submit());

        assert_eq!(outcome, SubmitOutcome::Declined("Your card was declined.".into()));
        assert_eq!(c.state(), SubmitState::Failed);
        assert_eq!(*c.view().error_text.borrow(), "Your card was declined.");
        assert_idle_ui(&c);
        assert_eq!(c.view().native_submits.get(), 0);
    }

    #[test]
    fn declined_checkout_can_be_retried() {
        let c = controller(
            BackendReply::Ok,
            declined("Your card was declined."),
        );
        block_on(c.submit());
        let again = block_on(c.submit());
        assert_eq!(again, SubmitOutcome::Declined("Your card was declined.".into()));
        assert_eq!(c.card().confirms.borrow().len(), 2);
    }

    #[test]
    fn unhandled_status_leaves_page_submitting() {
        let c = controller(
            BackendReply::Ok,
            ConfirmOutcome::Unhandled(PaymentIntentInfo {
                id: "pi_1".into(),
                status: "requires_action".into(),
            }),
        );
        let outcome = block_on(c.submit());

        assert_eq!(outcome, SubmitOutcome::Unhandled("requires_action".into()));
        assert_eq!(c.state(), SubmitState::Submitting);
        assert!(c.view().loading.get());
        assert!(c.card().is_disabled());
        assert_eq!(c.view().native_submits.get(), 0);
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let (tx, rx) = oneshot::channel();
        let c = controller(BackendReply::Wait(rx), succeeded());

        block_on(async {
            let mut first = Box::pin(c.submit());
            assert!((&mut first).now_or_never().is_none());
            assert_eq!(c.state(), SubmitState::Submitting);

            // inputs are locked together while in flight
            assert!(c.card().is_disabled());
            assert!(!c.view().submit_enabled.get());
            assert!(!c.view().form_panel_visible());

            assert_eq!(c.submit().await, SubmitOutcome::Ignored);

            tx.send(()).unwrap();
            assert!(matches!(first.await, SubmitOutcome::Submitted(_)));
        });

        assert_eq!(c.backend.posted.borrow().len(), 1);
        assert_eq!(c.card().confirms.borrow().len(), 1);
        assert_eq!(c.view().native_submits.get(), 1);
    }
}
