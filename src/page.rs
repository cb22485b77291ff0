//! Server-rendered checkout page.
//!
//! Binds the card field and the submission controller to markup the server
//! already rendered, looked up by element id. Exposed to JavaScript as
//! `initCheckout(config?)`.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::backend::HttpBackend;
use crate::card::{CardWidget, StripeContext};
use crate::config::CheckoutConfig;
use crate::controller::CheckoutController;
use crate::error::CheckoutError;
use crate::form::CheckoutFormSnapshot;
use crate::logging::init_logging;
use crate::session::PaymentSession;
use crate::view::{CheckoutView, ErrorSink};

/// Controller type for the markup front-end.
pub type PageController = CheckoutController<DomView, HttpBackend, CardWidget>;

/// Look up `#id`.
pub(crate) fn element_by_id(document: &Document, id: &str) -> Result<Element, CheckoutError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| CheckoutError::MissingElement(id.to_owned()))
}

/// Look up `#id` and check its DOM interface.
pub(crate) fn typed_element<T: JsCast>(
    document: &Document,
    id: &str,
    expected: &'static str,
) -> Result<T, CheckoutError> {
    element_by_id(document, id)?
        .dyn_into::<T>()
        .map_err(|_| CheckoutError::UnexpectedElement {
            id: id.to_owned(),
            expected,
        })
}

/// Current value of an `<input>`, `<select>` or `<textarea>`.
fn control_value(element: &Element) -> Option<String> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        Some(input.value())
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        Some(select.value())
    } else {
        element
            .dyn_ref::<HtmlTextAreaElement>()
            .map(|area| area.value())
    }
}

fn set_display(element: &HtmlElement, value: &str) {
    if let Err(err) = element.style().set_property("display", value) {
        log::warn!("set display on #{}: {:?}", element.id(), err);
    }
}

/// Replace the children of `container` with the alert icon and `message`.
///
/// The message goes in as text, never as markup.
pub(crate) fn render_error(container: &Element, message: &str) -> Result<(), JsValue> {
    let document = container
        .owner_document()
        .ok_or_else(|| JsValue::from_str("detached error container"))?;

    let icon = document.create_element("span")?;
    icon.set_class_name("icon");
    icon.set_attribute("role", "alert")?;
    let glyph = document.create_element("i")?;
    glyph.set_class_name("fas fa-times");
    icon.append_child(&glyph)?;

    let text = document.create_element("span")?;
    text.set_text_content(Some(message));

    container.set_text_content(None);
    container.append_child(&icon)?;
    container.append_child(&text)?;
    Ok(())
}

/// Typed handles on the checkout markup.
#[derive(Clone, Debug)]
pub struct DomView {
    form: HtmlFormElement,
    submit_button: Element,
    overlay: HtmlElement,
    errors: Element,
    save_info: Option<HtmlInputElement>,
    csrf_field_name: String,
}

impl DomView {
    /// Resolve every element `config` names. The save-info checkbox is optional.
    pub fn bind(document: &Document, config: &CheckoutConfig) -> Result<Self, CheckoutError> {
        let save_info = document
            .get_element_by_id(&config.save_info_id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        if save_info.is_none() {
            log::debug!("no #{} checkbox; save_info will be false", config.save_info_id);
        }

        Ok(DomView {
            form: typed_element(document, &config.form_id, "HTMLFormElement")?,
            submit_button: element_by_id(document, &config.submit_button_id)?,
            overlay: typed_element(document, &config.loading_overlay_id, "HTMLElement")?,
            errors: element_by_id(document, &config.card_errors_id)?,
            save_info,
            csrf_field_name: config.csrf_field_name.clone(),
        })
    }

    fn named_control(&self, name: &str) -> Option<Element> {
        self.form
            .query_selector(&format!("[name=\"{}\"]", name))
            .ok()
            .flatten()
    }

    /// Text currently shown in the error container.
    pub fn error_text(&self) -> String {
        self.errors.text_content().unwrap_or_default()
    }
}

impl ErrorSink for DomView {
    fn show_error(&self, message: &str) {
        if let Err(err) = render_error(&self.errors, message) {
            log::error!("could not render error: {:?}", err);
        }
    }

    fn clear_error(&self) {
        self.errors.set_text_content(None);
    }
}

impl CheckoutView for DomView {
    fn read_form(&self) -> CheckoutFormSnapshot {
        CheckoutFormSnapshot::read_with(|name| {
            self.named_control(name).and_then(|el| control_value(&el))
        })
    }

    fn csrf_token(&self) -> String {
        self.named_control(&self.csrf_field_name)
            .and_then(|el| control_value(&el))
            .unwrap_or_default()
    }

    fn save_info(&self) -> bool {
        self.save_info.as_ref().map(|cb| cb.checked()).unwrap_or(false)
    }

    fn show_loading(&self, loading: bool) {
        if loading {
            set_display(&self.form, "none");
            set_display(&self.overlay, "block");
        } else {
            set_display(&self.overlay, "none");
            set_display(&self.form, "");
        }
    }

    fn set_submit_enabled(&self, enabled: bool) {
        let result = if enabled {
            self.submit_button.remove_attribute("disabled")
        } else {
            self.submit_button.set_attribute("disabled", "")
        };
        if let Err(err) = result {
            log::warn!("toggle #{} disabled: {:?}", self.submit_button.id(), err);
        }
    }

    fn submit_native(&self) {
        // HTMLFormElement.submit() does not fire `submit`, so this never re-enters.
        if let Err(err) = self.form.submit() {
            log::error!("form.submit() failed: {:?}", err);
        }
    }

    fn reload(&self) {
        if let Err(err) = gloo_utils::window().location().reload() {
            log::error!("location.reload() failed: {:?}", err);
        }
    }
}

/// Read the session tokens from `#id_stripe_public_key` / `#id_client_secret`.
pub fn session_from_document(document: &Document, config: &CheckoutConfig) -> Result<PaymentSession, CheckoutError> {
    let raw = |id: &str| -> Result<String, CheckoutError> {
        Ok(element_by_id(document, id)?.text_content().unwrap_or_default())
    };
    PaymentSession::from_markup(&raw(&config.public_key_id)?, &raw(&config.client_secret_id)?)
}

/// Mount the card field and route form submission through the controller.
///
/// The submit listener lives for the rest of the page.
pub fn bind_checkout(document: &Document, config: &CheckoutConfig) -> Result<Rc<PageController>, CheckoutError> {
    let session = session_from_document(document, config)?;
    let view = DomView::bind(document, config)?;

    let stripe = StripeContext::initialize(&session.public_key)?;
    let card = stripe.create_and_mount(&config.card_selector(), &config.card_style)?;
    card.on_change(Rc::new(view.clone()))?;

    let form = view.form.clone();
    let controller = Rc::new(CheckoutController::new(
        session,
        view,
        HttpBackend::new(config.cache_checkout_url.clone()),
        card,
    ));

    let handler = {
        let controller = controller.clone();
        Closure::wrap(Box::new(move |event: web_sys::Event| {
            event.prevent_default();
            let controller = controller.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = controller.submit().await;
                log::debug!("submit finished: {:?}", outcome);
            });
        }) as Box<dyn FnMut(web_sys::Event)>)
    };
    form.add_event_listener_with_callback("submit", handler.as_ref().unchecked_ref())
        .map_err(|err| CheckoutError::js(&err))?;
    handler.forget();

    log::info!("checkout ready");
    Ok(controller)
}

/// Decode an optional JS config object; `undefined`/`null` mean defaults.
pub(crate) fn config_from_js<T>(value: JsValue) -> Result<T, CheckoutError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if value.is_undefined() || value.is_null() {
        Ok(T::default())
    } else {
        Ok(serde_wasm_bindgen::from_value(value)?)
    }
}

/// JS entry point: `initCheckout(config?)`.
#[wasm_bindgen(js_name = initCheckout)]
pub fn init_checkout(config: JsValue) -> Result<(), JsValue> {
    let config: CheckoutConfig = config_from_js(config)?;
    init_logging(&config.log_level);
    match bind_checkout(&gloo_utils::document(), &config) {
        Ok(_) => Ok(()),
        Err(err) => {
            log::error!("checkout init failed: {}", err);
            Err(err.into())
        }
    }
}
