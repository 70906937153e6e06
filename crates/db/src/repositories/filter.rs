//! Predicate helpers shared by the list queries.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use safar_core::filter::DayRange;
use sea_orm::{
    ColumnTrait,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

/// Inclusive instant window for a timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First instant inside the window.
    pub start: DateTime<Utc>,
    /// Last instant inside the window.
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Resolves a local calendar day to UTC instants in `tz`.
    #[must_use]
    pub fn from_day(range: &DayRange, tz: Tz) -> Self {
        let (start, end) = range.bounds(tz);
        Self { start, end }
    }

    /// Builds `column BETWEEN start AND end`.
    pub(crate) fn between<C: ColumnTrait>(&self, column: C) -> SimpleExpr {
        let start: DateTime<FixedOffset> = self.start.fixed_offset();
        let end: DateTime<FixedOffset> = self.end.fixed_offset();
        column.between(start, end)
    }
}

/// Case-insensitive substring match: `LOWER(column) LIKE '%needle%'`.
///
/// `%` and `_` in the needle match themselves.
pub(crate) fn contains_ci<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.trim().to_lowercase()));
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    use crate::entities::customers;

    #[test]
    fn test_window_resolves_local_day() {
        let day = DayRange::for_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let window = DateWindow::from_day(&day, chrono_tz::Africa::Cairo);

        // Cairo is UTC+2 in February
        assert_eq!(
            window.start,
            Utc.with_ymd_and_hms(2024, 1, 31, 22, 0, 0).unwrap()
        );
        assert!(window.end > window.start);
    }

    #[test]
    fn test_contains_ci_lowercases_both_sides() {
        let sql = customers::Entity::find()
            .filter(contains_ci(customers::Column::Name, " Ahmed "))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LOWER("customers"."name") LIKE '%ahmed%'"#), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
    }

    #[test]
    fn test_escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("bk_1"), r"bk\_1");
        assert_eq!(escape_like("50%"), r"50\%");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
