//! Server round trip that caches buyer metadata before confirmation.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::Serialize;

use crate::error::CheckoutError;

/// Body of `POST /checkout/cache_checkout_data/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheCheckoutData {
    pub csrfmiddlewaretoken: String,
    pub client_secret: String,
    pub save_info: bool,
}

impl CacheCheckoutData {
    /// `application/x-www-form-urlencoded` encoding, the way a form post sends it.
    pub fn to_form_body(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("csrfmiddlewaretoken", &self.csrfmiddlewaretoken)
            .append_pair("client_secret", &self.client_secret)
            .append_pair("save_info", if self.save_info { "true" } else { "false" })
            .finish()
    }
}

/// Persists checkout metadata server-side. Only success or failure matters.
#[async_trait(?Send)]
pub trait CheckoutBackend {
    async fn cache_checkout_data(&self, data: &CacheCheckoutData) -> Result<(), CheckoutError>;
}

/// [`CheckoutBackend`] over `fetch`.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    url: String,
}

impl HttpBackend {
    pub fn new(url: impl Into<String>) -> Self {
        HttpBackend { url: url.into() }
    }
}

#[async_trait(?Send)]
impl CheckoutBackend for HttpBackend {
    async fn cache_checkout_data(&self, data: &CacheCheckoutData) -> Result<(), CheckoutError> {
        let response = Request::post(&self.url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("X-CSRFToken", &data.csrfmiddlewaretoken)
            .body(data.to_form_body())?
            .send()
            .await?;

        if !response.ok() {
            return Err(CheckoutError::Http {
                status: response.status(),
                status_text: response.status_text(),
            });
        }
        log::debug!("cached checkout data ({})", response.status());
        Ok(())
    }
}
