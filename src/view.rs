//! The capabilities the checkout logic needs from whatever renders the page.
//!
//! `page::DomView` implements these over server-rendered markup, the Yew
//! component implements them over its own state, and tests use fakes.

use crate::form::CheckoutFormSnapshot;

/// Where card and confirmation errors are shown.
pub trait ErrorSink {
    /// Render `message` (with the alert icon). The visible text must be exactly `message`.
    fn show_error(&self, message: &str);
    /// Empty the error container.
    fn clear_error(&self);
}

/// Everything the submission controller reads from or does to the page.
pub trait CheckoutView: ErrorSink {
    /// Read and trim the billing/shipping fields.
    fn read_form(&self) -> CheckoutFormSnapshot;
    /// Value of the CSRF token input.
    fn csrf_token(&self) -> String;
    /// Whether the buyer ticked "save this information".
    fn save_info(&self) -> bool;
    /// `true` hides the form panel and shows the loading overlay; `false` reverses it.
    fn show_loading(&self, loading: bool);
    /// Enable or disable the submit control.
    fn set_submit_enabled(&self, enabled: bool);
    /// Hand the form to the browser's own submission.
    fn submit_native(&self);
    /// Reload the page so the server can render its flash message.
    fn reload(&self);
}
