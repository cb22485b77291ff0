//! Placeholder coloring for the profile page's default-country select.
//!
//! An empty select reads as a placeholder (grey); any chosen country is black.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlSelectElement};

use crate::config::CountryFieldConfig;
use crate::error::CheckoutError;
use crate::logging::init_logging;
use crate::page::{config_from_js, typed_element};

/// Text color for a select whose current value is `value`.
pub fn country_color<'a>(value: &str, config: &'a CountryFieldConfig) -> &'a str {
    if value.is_empty() {
        &config.placeholder_color
    } else {
        &config.selected_color
    }
}

fn paint(select: &HtmlSelectElement, color: &str) {
    if let Err(err) = select.style().set_property("color", color) {
        log::warn!("set color on #{}: {:?}", select.id(), err);
    }
}

/// Grey out an empty select now, and recolor it on every `change`.
pub fn bind_country_field(document: &Document, config: &CountryFieldConfig) -> Result<(), CheckoutError> {
    let select: HtmlSelectElement = typed_element(document, &config.select_id, "HTMLSelectElement")?;
    if select.value().is_empty() {
        paint(&select, &config.placeholder_color);
    }

    let handler = {
        let select = select.clone();
        let config = config.clone();
        Closure::wrap(Box::new(move || {
            paint(&select, country_color(&select.value(), &config));
        }) as Box<dyn Fn()>)
    };
    select
        .add_event_listener_with_callback("change", handler.as_ref().unchecked_ref())
        .map_err(|err| CheckoutError::js(&err))?;
    handler.forget();
    Ok(())
}

/// JS entry point: `initCountryField(config?)`.
#[wasm_bindgen(js_name = initCountryField)]
pub fn init_country_field(config: JsValue) -> Result<(), JsValue> {
    init_logging("info");
    let config: CountryFieldConfig = config_from_js(config)?;
    bind_country_field(&gloo_utils::document(), &config).map_err(|err| {
        log::error!("country field init failed: {}", err);
        err.into()
    })
}
