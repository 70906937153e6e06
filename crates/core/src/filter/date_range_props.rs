//! Property-based tests for the date filter parser.

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use proptest::prelude::*;

use super::date_range::parse_day_range;

/// Any calendar date in a range bookings realistically use.
fn calendar_date() -> impl Strategy<Value = NaiveDate> {
    (1950i32..2100, 1u32..=366).prop_filter_map("valid ordinal", |(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A zero-padded `dd/mm/yyyy` string always resolves to its own day.
    #[test]
    fn prop_day_month_year_round_trips(date in calendar_date()) {
        let input = date.format("%d/%m/%Y").to_string();
        let range = parse_day_range(&input, Tz::UTC).unwrap();
        prop_assert_eq!(range.date(), date);
        prop_assert!(range.start < range.end);
    }

    /// ISO and `dd/mm/yyyy` spellings of the same day agree.
    #[test]
    fn prop_iso_and_slash_forms_agree(date in calendar_date()) {
        let iso = parse_day_range(&date.format("%Y-%m-%d").to_string(), Tz::UTC);
        let slash = parse_day_range(
            &format!("{}/{}/{}", date.day(), date.month(), date.year()),
            Tz::UTC,
        );
        prop_assert_eq!(iso, slash);
    }

    /// Arbitrary input never panics, and a slash form with a month above 12 never parses.
    #[test]
    fn prop_garbage_never_panics(input in ".{0,24}", day in 1u32..=31, month in 13u32..=99) {
        let _ = parse_day_range(&input, Tz::UTC);
        let bad_month = format!("{day:02}/{month:02}/2024");
        prop_assert!(parse_day_range(&bad_month, Tz::UTC).is_none());
    }
}
