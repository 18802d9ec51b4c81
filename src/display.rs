//! Display formatting module.
//!
//! Formatted strings pulled by the display surface: elapsed-streak text,
//! currency figures, and period-over-period change captions.

use crate::common::Millis;
use crate::config;

/// Formats a duration for display.
///
/// At least one elapsed day reads as `"3d 4h 12m"`; anything shorter reads
/// as a clock, `"1:05:09"`.
pub fn format_duration(ms: Millis) -> String {
    let seconds = (ms.max(0)) / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h {}m", days, hours % 24, minutes % 60)
    } else {
        format!("{}:{:02}:{:02}", hours, minutes % 60, seconds % 60)
    }
}

/// Formats a currency amount with the configured symbol.
pub fn format_money(amount: f64) -> String {
    format!("{}{:.2}", config::get_config().display.currency_symbol, amount)
}

/// Change caption for a session count delta, e.g. `"+2 vs prev"`.
pub fn format_count_change(change: i64) -> String {
    if change == 0 {
        "No change".to_string()
    } else {
        format!("{:+} vs prev", change)
    }
}

/// Change caption for a spending delta, e.g. `"-$4.50 vs prev"`.
pub fn format_money_change(change: f64) -> String {
    if change == 0.0 {
        return "No change".to_string();
    }
    let symbol = &config::get_config().display.currency_symbol;
    let sign = if change > 0.0 { "+" } else { "-" };
    format!("{}{}{:.2} vs prev", sign, symbol, change.abs())
}
