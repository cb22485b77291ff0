//! Browser console logging.
//!
//! Routes the `log` facade to `console.*` and installs the panic hook so a
//! panic inside an event handler shows up with a message instead of
//! `unreachable`.

use std::str::FromStr;
use std::sync::Once;

static INIT: Once = Once::new();

/// Install the console logger at `level` (`"error"` … `"trace"`).
///
/// Only the first call has an effect. An unknown level falls back to `info`.
pub fn init_logging(level: &str) {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        let level = log::Level::from_str(level).unwrap_or(log::Level::Info);
        if console_log::init_with_level(level).is_err() {
            web_sys::console::warn_1(&"yew_stripe_checkout: a logger is already installed".into());
        }
    });
}
