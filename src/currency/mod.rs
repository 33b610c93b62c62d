//! Currency conversion and the display-currency preference.
//!
//! All amounts are stored in their original transaction currency. Pages
//! convert to USD through the session rate table, then to the user's chosen
//! display currency. Conversion is best-effort and eventually-approximate,
//! which is acceptable for a dashboard but not for financial settlement.

mod preference;
mod rates;

pub use preference::{
    CurrencyPreferenceState, DisplayCurrency, get_display_currency, save_display_currency,
    set_display_currency,
};
pub use rates::{RateTable, load_rate_table, session_rate_table};
