//! Day-bounded date ranges.

use chrono::{
    DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;

/// One calendar day in agency-local wall-clock time.
///
/// `start` is `00:00:00.000` and `end` is `23:59:59.999` of the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    /// First instant of the day.
    pub start: NaiveDateTime,
    /// Last millisecond of the day.
    pub end: NaiveDateTime,
}

impl DayRange {
    /// Builds the range covering `date`.
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        Self {
            start: date.and_time(NaiveTime::MIN),
            end: date.and_time(last_ms),
        }
    }

    /// The calendar day this range covers.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Returns true if the local wall-clock time falls inside the range.
    #[must_use]
    pub fn contains(&self, local: NaiveDateTime) -> bool {
        local >= self.start && local <= self.end
    }

    /// Resolves the local bounds to UTC instants for a database predicate.
    #[must_use]
    pub fn bounds(&self, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        (resolve_local(tz, self.start), resolve_local(tz, self.end))
    }
}

/// Parses a single date query parameter into a day range.
///
/// Accepted forms:
/// - `dd/mm/yyyy` (day and month may be one digit)
/// - `yyyy-mm-dd`
/// - `yyyy-mm-ddThh:mm:ss[.fff]` (local wall-clock)
/// - RFC 3339 timestamps, taken as the day they fall on in `tz`
///
/// Anything else yields `None`, which callers treat as "no filter".
#[must_use]
pub fn parse_day_range(input: &str, tz: Tz) -> Option<DayRange> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let date = if input.contains('/') {
        parse_day_month_year(input)?
    } else {
        parse_iso(input, tz)?
    };

    Some(DayRange::for_date(date))
}

fn parse_day_month_year(input: &str) -> Option<NaiveDate> {
    let mut parts = input.split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let day = digits(day, 1..=2)?;
    let month = digits(month, 1..=2)?;
    let year = digits(year, 4..=4)?;

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn parse_iso(input: &str, tz: Tz) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.with_timezone(&tz).date_naive());
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|local| local.date())
}

/// Parses an all-ASCII-digit field whose length lies in `len`.
fn digits(field: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&field.len()) || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Maps local wall-clock time to UTC.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// DST gap move forward by one hour.
fn resolve_local(tz: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(local + TimeDelta::hours(1)))
                .earliest()
        })
        .map_or_else(|| local.and_utc(), |t| t.with_timezone(&Utc))
}
