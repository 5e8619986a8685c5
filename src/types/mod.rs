//! Oracle temporal value types
//!
//! Calendar and interval values as carried by [`WireValue`](crate::WireValue),
//! with conversions to and from their chrono counterparts.

mod date;
mod interval;

pub use date::{OracleDate, OracleTimestamp};
pub use interval::{IntervalDs, IntervalYm};
