use chrono::{Datelike, Duration, NaiveDate};

/// Shift a calendar day by a signed number of days.
pub fn date_with_offset(today: NaiveDate, offset_days: i64) -> NaiveDate {
    today + Duration::days(offset_days)
}

/// Day of the year with Jan 1 = 1. The quote schedule is keyed on this
/// convention; changing it would move every quote to a different date.
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Map a calendar day onto a corpus slot. `corpus_len` must be non-zero;
/// the loader guarantees this by substituting a single-quote corpus.
pub fn quote_index(date: NaiveDate, corpus_len: usize) -> usize {
    debug_assert!(corpus_len > 0, "corpus must not be empty");
    day_of_year(date) as usize % corpus_len
}
