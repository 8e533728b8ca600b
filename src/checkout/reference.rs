//! Credit-card expiry ranges. These are computed locally rather than fetched.

use chrono::{Datelike, NaiveDate};

pub const EXPIRY_YEARS_AHEAD: i32 = 10;

/// Months from `start_month` through December.
pub fn credit_card_months(start_month: u32) -> Vec<u32> {
    (start_month.clamp(1, 12)..=12).collect()
}

/// The current year and the next ten.
pub fn credit_card_years(current_year: i32) -> Vec<i32> {
    (current_year..=current_year + EXPIRY_YEARS_AHEAD).collect()
}

/// Months valid for the selected expiry year: the rest of this year when the
/// current year is selected (or nothing is selected yet), the whole year
/// otherwise.
pub fn expiry_months_for(selected_year: Option<i32>, today: NaiveDate) -> Vec<u32> {
    match selected_year {
        Some(year) if year != today.year() => credit_card_months(1),
        _ => credit_card_months(today.month()),
    }
}
