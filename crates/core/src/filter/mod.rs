//! Query-string filters shared by the list and export endpoints.
//!
//! Date parameters arrive as `dd/mm/yyyy` from the dashboard's date pickers
//! or as ISO strings from other clients. Both resolve to a whole local day.

mod date_range;

#[cfg(test)]
mod date_range_props;

pub use date_range::{DayRange, parse_day_range};
