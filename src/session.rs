//! Payment session context: the publishable key and the PaymentIntent
//! client secret the server renders into the page.

use crate::error::CheckoutError;

/// Tokens for one page view. Immutable once parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentSession {
    /// Stripe publishable key (`pk_…`).
    pub public_key: String,
    /// PaymentIntent client secret.
    pub client_secret: String,
}

impl PaymentSession {
    /// Build a session from the raw, quote-wrapped text of the two markup elements.
    pub fn from_markup(raw_public_key: &str, raw_client_secret: &str) -> Result<Self, CheckoutError> {
        Ok(Self {
            public_key: unwrap_quoted(raw_public_key, "publishable key")?,
            client_secret: unwrap_quoted(raw_client_secret, "client secret")?,
        })
    }

    /// Build a session from values that are already unwrapped.
    pub fn new(public_key: impl Into<String>, client_secret: impl Into<String>) -> Result<Self, CheckoutError> {
        let public_key = public_key.into();
        let client_secret = client_secret.into();
        if public_key.trim().is_empty() {
            return Err(CheckoutError::EmptyToken { field: "publishable key" });
        }
        if client_secret.trim().is_empty() {
            return Err(CheckoutError::EmptyToken { field: "client secret" });
        }
        Ok(Self { public_key, client_secret })
    }
}

/// Strip the first and last character of a quote-wrapped token.
///
/// Surrounding whitespace is ignored. The wrapping must be a matching pair
/// of `"` or `'`, and the inner value must be non-empty.
pub fn unwrap_quoted(raw: &str, field: &'static str) -> Result<String, CheckoutError> {
    let raw = raw.trim();
    let mut chars = raw.chars();
    let (first, last) = match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(CheckoutError::MalformedToken { field }),
    };
    if first != last || !matches!(first, '"' | '\'') {
        return Err(CheckoutError::MalformedToken { field });
    }
    let inner = chars.as_str();
    if inner.trim().is_empty() {
        return Err(CheckoutError::EmptyToken { field });
    }
    Ok(inner.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_the_wrapping_quotes() {
        assert_eq!(unwrap_quoted("\"pk_test_123\"", "key").unwrap(), "pk_test_123");
        assert_eq!(unwrap_quoted("  'pi_1_secret_2'\n", "key").unwrap(), "pi_1_secret_2");
    }

    #[test]
    fn rejects_malformed_and_empty_tokens() {
        for raw in ["", " ", "\"", "pk_test_123", "\"pk_test_123'", "'pk_test_123"] {
            assert!(
                matches!(unwrap_quoted(raw, "key"), Err(CheckoutError::MalformedToken { .. })),
                "{raw:?} should be malformed"
            );
        }
        for raw in ["\"\"", "''", "\"   \""] {
            assert!(
                matches!(unwrap_quoted(raw, "key"), Err(CheckoutError::EmptyToken { .. })),
                "{raw:?} should be empty"
            );
        }
    }

    #[test]
    fn session_from_markup() {
        let session = PaymentSession::from_markup("\"pk_test_abc\"", "\"pi_1_secret_x\"").unwrap();
        assert_eq!(session.public_key, "pk_test_abc");
        assert_eq!(session.client_secret, "pi_1_secret_x");

        let err = PaymentSession::from_markup("\"pk_test_abc\"", "").unwrap_err();
        assert_eq!(err.to_string(), "malformed client secret: expected a quoted value");
    }

    #[test]
    fn new_rejects_blank_values() {
        assert!(PaymentSession::new("pk_test_abc", "pi_secret").is_ok());
        assert!(matches!(
            PaymentSession::new("", "pi_secret"),
            Err(CheckoutError::EmptyToken { field: "publishable key" })
        ));
    }
}
