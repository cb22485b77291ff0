//! A Yew card-checkout component for apps that render the form themselves.
//!
//! This component loads Stripe.js, mounts the card field, renders the
//! billing/shipping form, and runs submissions through the same
//! [`CheckoutController`] as the server-rendered page. Instead of a native
//! form POST on success it emits `on_success`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::backend::HttpBackend;
use crate::card::{CardWidget, StripeContext};
use crate::client::{PaymentIntentInfo, StripeError};
use crate::components::{Button, CardErrors, LoadingOverlay, TextInput};
use crate::config::CheckoutConfig;
use crate::controller::{CheckoutController, SubmitOutcome};
use crate::error::CheckoutError;
use crate::form::CheckoutFormSnapshot;
use crate::session::PaymentSession;
use crate::use_stripejs;
use crate::view::{CheckoutView, ErrorSink};

/// `(name, placeholder, required)` for each rendered field, in page order.
const FIELDS: [(&str, &str, bool); 9] = [
    ("full_name", "Full Name", true),
    ("email", "Email Address", true),
    ("phone_number", "Phone Number", true),
    ("street_address1", "Street Address 1", true),
    ("street_address2", "Street Address 2", false),
    ("town_or_city", "Town or City", true),
    ("county", "County", false),
    ("postcode", "Postal Code", false),
    ("country", "Country", true),
];

/// Properties for the [`StripeCardCheckout`] component.
///
/// # Fields
///
/// * `publishable_key` – Your Stripe Publishable Key (`pk_…`).
/// * `client_secret` – The PaymentIntent client secret from your backend.
/// * `csrf_token` – Sent with the metadata POST.
/// * `config` – Element ids, endpoint and card style.
/// * `on_success` – Invoked with the PaymentIntent once it has succeeded.
/// * `on_error` – Invoked with every decline or init failure.
/// * `button_label` – Override the submit button text (default: `"Complete Order"`).
/// * `children` – Extra nodes (e.g. an order summary) rendered above the form.
#[derive(Properties, PartialEq, Clone)]
pub struct StripeCardCheckoutProps {
    pub publishable_key: String,
    pub client_secret: String,
    #[prop_or_default]
    pub csrf_token: AttrValue,
    #[prop_or_default]
    pub config: CheckoutConfig,
    #[prop_or_default]
    pub on_success: Callback<PaymentIntentInfo>,
    #[prop_or_default]
    pub on_error: Callback<StripeError>,
    #[prop_or_default]
    pub button_label: Option<String>,
    #[prop_or_default]
    pub children: Children,
}

/// [`CheckoutView`] over the component's own state.
///
/// Writes go through setter callbacks so the view does not hold hook handles.
#[derive(Clone)]
struct ComponentView {
    form: Rc<RefCell<CheckoutFormSnapshot>>,
    save_info: Rc<Cell<bool>>,
    csrf_token: AttrValue,
    set_error: Callback<Option<String>>,
    set_loading: Callback<bool>,
    set_submit_enabled: Callback<bool>,
    set_paid: Callback<bool>,
    reload: Callback<()>,
}

fn setter<T: 'static>(handle: &UseStateHandle<T>) -> Callback<T> {
    let handle = handle.clone();
    Callback::from(move |value| handle.set(value))
}

fn reload_page(_: ()) {
    if let Err(err) = gloo_utils::window().location().reload() {
        log::error!("location.reload() failed: {:?}", err);
    }
}

impl ErrorSink for ComponentView {
    fn show_error(&self, message: &str) {
        self.set_error.emit(Some(message.to_owned()));
    }

    fn clear_error(&self) {
        self.set_error.emit(None);
    }
}

impl CheckoutView for ComponentView {
    fn read_form(&self) -> CheckoutFormSnapshot {
        let form = self.form.borrow();
        CheckoutFormSnapshot::read_with(|name| form.get(name).map(str::to_owned))
    }

    fn csrf_token(&self) -> String {
        self.csrf_token.to_string()
    }

    fn save_info(&self) -> bool {
        self.save_info.get()
    }

    fn show_loading(&self, loading: bool) {
        self.set_loading.emit(loading);
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.set_submit_enabled.emit(enabled);
    }

    fn submit_native(&self) {
        self.set_paid.emit(true);
    }

    fn reload(&self) {
        self.reload.emit(());
    }
}

/// Report a finished submission to the parent.
fn emit_outcome(
    outcome: SubmitOutcome,
    on_success: &Callback<PaymentIntentInfo>,
    on_error: &Callback<StripeError>,
) {
    match outcome {
        SubmitOutcome::Submitted(info) => on_success.emit(info),
        SubmitOutcome::Declined(message) => on_error.emit(StripeError::new(message)),
        other => log::debug!("submit finished: {:?}", other),
    }
}

type ComponentController = CheckoutController<ComponentView, HttpBackend, CardWidget>;

fn build_controller(
    props: &StripeCardCheckoutProps,
    view: ComponentView,
) -> Result<ComponentController, CheckoutError> {
    let session = PaymentSession::new(props.publishable_key.clone(), props.client_secret.clone())?;
    let stripe = StripeContext::initialize(&session.public_key)?;
    let card = stripe.create_and_mount(&props.config.card_selector(), &props.config.card_style)?;
    card.on_change(Rc::new(view.clone()))?;
    Ok(CheckoutController::new(
        session,
        view,
        HttpBackend::new(props.config.cache_checkout_url.clone()),
        card,
    ))
}

/// Yew function component rendering a complete card checkout form.
///
/// This component will:
/// 1. Dynamically load `https://js.stripe.com/v3/` once per page.
/// 2. Mount a styled card field into `#card-element`.
/// 3. On submit: lock the form, cache the buyer metadata, call
///    `stripe.confirmCardPayment()` and emit the outcome.
/// 4. Show the loading overlay while in flight and any error inline.
///
/// # Example
///
/// ```rust,ignore
/// use yew::prelude::*;
/// use yew_stripe_checkout::{StripeCardCheckout, PaymentIntentInfo, StripeError};
///
/// #[function_component(App)]
/// fn app() -> Html {
///     let on_success = Callback::from(|info: PaymentIntentInfo| {
///         log::info!("Payment succeeded: {}", info.id);
///     });
///     html! {
///         <StripeCardCheckout
///             publishable_key="pk_test_123"
///             client_secret="pi_ABC_secret_XYZ"
///             {on_success}
///         >
///             <p>{ "Your order: Awesome T-shirt – £25.00" }</p>
///         </StripeCardCheckout>
///     }
/// }
/// ```
#[function_component(StripeCardCheckout)]
pub fn stripe_card_checkout(props: &StripeCardCheckoutProps) -> Html {
    let stripe_ready = use_stripejs();
    let controller = use_state(|| None::<Rc<ComponentController>>);
    let form = use_mut_ref(CheckoutFormSnapshot::default);
    let save_info = use_memo((), |_| Cell::new(false));
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let submit_enabled = use_state(|| true);
    let paid = use_state(|| false);

    let view = ComponentView {
        form: form.clone(),
        save_info: save_info.clone(),
        csrf_token: props.csrf_token.clone(),
        set_error: setter(&error),
        set_loading: setter(&loading),
        set_submit_enabled: setter(&submit_enabled),
        set_paid: setter(&paid),
        reload: Callback::from(reload_page),
    };

    // Mount the card field once Stripe.js is ready
    {
        let controller = controller.clone();
        let props = props.clone();
        let view = view.clone();
        use_effect_with(stripe_ready, move |ready| {
            if *ready && controller.is_none() {
                match build_controller(&props, view.clone()) {
                    Ok(built) => controller.set(Some(Rc::new(built))),
                    Err(err) => {
                        log::error!("card checkout init failed: {}", err);
                        view.show_error(&err.to_string());
                        props.on_error.emit(StripeError::new(err.to_string()));
                    }
                }
            }
            || ()
        });
    }

    let onsubmit = {
        let controller = controller.clone();
        let on_success = props.on_success.clone();
        let on_error = props.on_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(controller) = (*controller).clone() else {
                log::debug!("submit before the card field is mounted");
                return;
            };
            let on_success = on_success.clone();
            let on_error = on_error.clone();
            wasm_bindgen_futures::spawn_local(async move {
                emit_outcome(controller.submit().await, &on_success, &on_error);
            });
        })
    };

    let oninput = {
        let form = form.clone();
        Callback::from(move |(name, value): (AttrValue, String)| {
            form.borrow_mut().set(&name, &value);
        })
    };

    let onchange_save = {
        let save_info = save_info.clone();
        Callback::from(move |e: Event| {
            let checkbox: HtmlInputElement = e.target_unchecked_into();
            save_info.set(checkbox.checked());
        })
    };

    if *paid {
        return html! {
            <div class="checkout-complete">
                { for props.children.iter() }
                <p>{ "Payment received. Thank you!" }</p>
            </div>
        };
    }

    let config = &props.config;
    let form_style = if *loading { "display:none;" } else { "" };
    let values = form.borrow().clone();

    html! {
        <>
            { for props.children.iter() }
            <form id={config.form_id.clone()} style={form_style} {onsubmit}>
                <fieldset class="rounded px-3 mb-5">
                    {
                        for FIELDS.iter().map(|(name, placeholder, required)| {
                            let placeholder = if *required {
                                format!("{} *", placeholder)
                            } else {
                                placeholder.to_string()
                            };
                            html! {
                                <TextInput
                                    name={*name}
                                    value={values.get(name).unwrap_or_default().to_string()}
                                    placeholder={placeholder}
                                    required={*required}
                                    oninput={oninput.clone()}
                                />
                            }
                        })
                    }
                    <div class="form-check">
                        <input
                            class="form-check-input"
                            type="checkbox"
                            id={config.save_info_id.clone()}
                            checked={save_info.get()}
                            onchange={onchange_save}
                        />
                        <label class="form-check-label" for={config.save_info_id.clone()}>
                            { "Save this delivery information to my profile" }
                        </label>
                    </div>
                </fieldset>
                <fieldset class="px-3">
                    <legend class="fieldset-label small text-black px-2 w-auto">{ "Payment" }</legend>
                    <div class="mb-3" id={config.card_element_id.clone()}></div>
                    <CardErrors
                        id={AttrValue::from(config.card_errors_id.clone())}
                        message={(*error).clone()}
                    />
                </fieldset>
                <Button
                    id={AttrValue::from(config.submit_button_id.clone())}
                    label={props.button_label.clone().unwrap_or_else(|| "Complete Order".to_string())}
                    disabled={!stripe_ready || !*submit_enabled}
                />
            </form>
            <LoadingOverlay
                id={AttrValue::from(config.loading_overlay_id.clone())}
                visible={*loading}
            />
        </>
    }
}
