//! Calendar age derivation from a date of birth.

use chrono::{Datelike, Local, NaiveDate};

/// Whole years elapsed between `dob` (as `YYYY-MM-DD`) and `today`: the
/// year difference, minus one if this year's birthday has not arrived yet.
/// Empty or unparseable input yields `None`; a date of birth in the future
/// clamps to zero.
pub fn age_on(dob: &str, today: NaiveDate) -> Option<u32> {
    let born = NaiveDate::parse_from_str(dob.trim(), "%Y-%m-%d").ok()?;
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    Some(years.max(0) as u32)
}

/// Age as of the current local date.
pub fn derive_age(dob: &str) -> Option<u32> {
    age_on(dob, Local::now().date_naive())
}
