//! Provisional comet designations
//!
//! New comets get a designation of the form `C/{year} {letter}{index}` where the
//! letter encodes the half-month of discovery and the index counts discoveries
//! within that half-month. `I` and `Z` are not used, leaving 24 letters for the
//! 24 half-months of a year.

use chrono::{Datelike, NaiveDate};

/// Half-month letters, January 1-15 first
pub const HALF_MONTH_LETTERS: [char; 24] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T',
    'U', 'V', 'W', 'X', 'Y',
];

/// Half-month letter for `date`
pub fn month_letter(date: NaiveDate) -> char {
    let mut index = (date.month0() * 2) as usize;
    if date.day() > 15 {
        index += 1;
    }
    HALF_MONTH_LETTERS[index]
}

/// Comet designations `C/{year} {letter}{i}` for `i` in `start..=end`
///
/// Returns an empty list when `start > end`; callers are expected to validate
/// the range beforehand (see `TrackerConfig::validate`).
pub fn designation_range(date: NaiveDate, start: u32, end: u32) -> Vec<String> {
    let letter = month_letter(date);
    (start..=end)
        .map(|i| format!("C/{} {}{}", date.year(), letter, i))
        .collect()
}

/// A date inside the half-month preceding the one containing `date`
///
/// First half of a month maps to the 16th of the previous month (rolling the
/// year back in January), second half maps to the 1st of the same month.
pub fn previous_half_month(date: NaiveDate) -> NaiveDate {
    if date.day() > 15 {
        return date.with_day(1).unwrap_or(date);
    }

    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 16).unwrap_or(date)
}
