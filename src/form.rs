//! Checkout form snapshot and the billing/shipping payloads built from it.

use serde::{Deserialize, Serialize};

/// Names of the text controls read from the checkout form, in page order.
pub const FIELD_NAMES: [&str; 9] = [
    "full_name",
    "phone_number",
    "email",
    "street_address1",
    "street_address2",
    "town_or_city",
    "county",
    "country",
    "postcode",
];

/// The checkout form as read once at submit time.
///
/// Values are trimmed on the way in; nothing is kept after the request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutFormSnapshot {
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub street_address1: String,
    pub street_address2: String,
    pub town_or_city: String,
    pub county: String,
    pub country: String,
    pub postcode: String,
}

impl CheckoutFormSnapshot {
    /// Build a snapshot by looking every field up by name.
    ///
    /// Missing fields read as empty.
    pub fn read_with<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut snapshot = Self::default();
        for name in FIELD_NAMES {
            if let Some(value) = lookup(name) {
                snapshot.set(name, &value);
            }
        }
        snapshot
    }

    /// Store `value`, trimmed, under the field `name`. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.slot_mut(name) {
            *slot = value.trim().to_owned();
        }
    }

    /// Current value of the field `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "full_name" => &self.full_name,
            "phone_number" => &self.phone_number,
            "email" => &self.email,
            "street_address1" => &self.street_address1,
            "street_address2" => &self.street_address2,
            "town_or_city" => &self.town_or_city,
            "county" => &self.county,
            "country" => &self.country,
            "postcode" => &self.postcode,
            _ => return None,
        };
        Some(value)
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "full_name" => Some(&mut self.full_name),
            "phone_number" => Some(&mut self.phone_number),
            "email" => Some(&mut self.email),
            "street_address1" => Some(&mut self.street_address1),
            "street_address2" => Some(&mut self.street_address2),
            "town_or_city" => Some(&mut self.town_or_city),
            "county" => Some(&mut self.county),
            "country" => Some(&mut self.country),
            "postcode" => Some(&mut self.postcode),
            _ => None,
        }
    }

    /// `payment_method.billing_details` for `confirmCardPayment`.
    ///
    /// The postcode is left out: the card field collects its own.
    pub fn billing_details(&self) -> BillingDetails {
        BillingDetails {
            name: self.full_name.clone(),
            phone: self.phone_number.clone(),
            email: self.email.clone(),
            address: Address {
                line1: self.street_address1.clone(),
                line2: self.street_address2.clone(),
                city: self.town_or_city.clone(),
                country: self.country.clone(),
                state: self.county.clone(),
                postal_code: None,
            },
        }
    }

    /// `shipping` for `confirmCardPayment`.
    pub fn shipping_details(&self) -> ShippingDetails {
        ShippingDetails {
            name: self.full_name.clone(),
            phone: self.phone_number.clone(),
            address: Address {
                line1: self.street_address1.clone(),
                line2: self.street_address2.clone(),
                city: self.town_or_city.clone(),
                country: self.country.clone(),
                state: self.county.clone(),
                postal_code: Some(self.postcode.clone()),
            },
        }
    }
}

/// Stripe address object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub country: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Stripe `billing_details`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BillingDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
}

/// Stripe `shipping`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShippingDetails {
    pub name: String,
    pub phone: String,
    pub address: Address,
}
