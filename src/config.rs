//! Page configuration.
//!
//! Every id, selector and endpoint the checkout touches lives here with the
//! defaults the checkout template uses. JavaScript callers may pass a partial
//! object; omitted keys keep their defaults.

use serde::{Deserialize, Serialize};

/// Default endpoint that caches buyer metadata on the PaymentIntent.
pub const CACHE_CHECKOUT_DATA_URL: &str = "/checkout/cache_checkout_data/";

/// Placeholder grey, shared by the card field and the country select.
pub const PLACEHOLDER_COLOR: &str = "#aab7c4";

/// Settings for the checkout page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Element holding the quoted publishable key.
    pub public_key_id: String,
    /// Element holding the quoted client secret.
    pub client_secret_id: String,
    /// The checkout `<form>`.
    pub form_id: String,
    /// Submit control inside the form.
    pub submit_button_id: String,
    /// Mount point for the hosted card field.
    pub card_element_id: String,
    /// Sink for card and confirmation errors.
    pub card_errors_id: String,
    /// Overlay shown while a submission is in flight.
    pub loading_overlay_id: String,
    /// "Save this information" checkbox.
    pub save_info_id: String,
    /// Name of the hidden CSRF input.
    pub csrf_field_name: String,
    /// Metadata POST target.
    pub cache_checkout_url: String,
    /// Style handed to `elements.create("card", { style })`.
    pub card_style: CardStyle,
    /// `log` level for the console logger.
    pub log_level: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            public_key_id: "id_stripe_public_key".into(),
            client_secret_id: "id_client_secret".into(),
            form_id: "payment-form".into(),
            submit_button_id: "submit-button".into(),
            card_element_id: "card-element".into(),
            card_errors_id: "card-errors".into(),
            loading_overlay_id: "loading-overlay".into(),
            save_info_id: "id-save-info".into(),
            csrf_field_name: "csrfmiddlewaretoken".into(),
            cache_checkout_url: CACHE_CHECKOUT_DATA_URL.into(),
            card_style: CardStyle::default(),
            log_level: "info".into(),
        }
    }
}

impl CheckoutConfig {
    /// `#card-element` style selector for `card.mount`.
    pub fn card_selector(&self) -> String {
        format!("#{}", self.card_element_id)
    }
}

/// Settings for the profile page country select.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryFieldConfig {
    pub select_id: String,
    pub placeholder_color: String,
    pub selected_color: String,
}

impl Default for CountryFieldConfig {
    fn default() -> Self {
        CountryFieldConfig {
            select_id: "id_default_country".into(),
            placeholder_color: PLACEHOLDER_COLOR.into(),
            selected_color: "#000".into(),
        }
    }
}

/// Stripe Elements style object for the card field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardStyle {
    pub base: BaseStyle,
    pub invalid: InvalidStyle,
}

impl Default for CardStyle {
    fn default() -> Self {
        CardStyle {
            base: BaseStyle {
                color: "#000".into(),
                font_family: "\"Helvetica Neue\", Helvetica, sans-serif".into(),
                font_smoothing: "antialiased".into(),
                font_size: "16px".into(),
                placeholder: PlaceholderStyle {
                    color: PLACEHOLDER_COLOR.into(),
                },
            },
            invalid: InvalidStyle {
                color: "#dc3545".into(),
                icon_color: "#dc3545".into(),
            },
        }
    }
}

/// Text style in the normal state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStyle {
    pub color: String,
    pub font_family: String,
    pub font_smoothing: String,
    pub font_size: String,
    #[serde(rename = "::placeholder")]
    pub placeholder: PlaceholderStyle,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderStyle {
    pub color: String,
}

/// Text and icon color once Stripe flags the input invalid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidStyle {
    pub color: String,
    pub icon_color: String,
}
