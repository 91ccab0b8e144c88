pub mod customers;
pub mod error;
pub mod rentals;
pub mod repo;
pub mod service;

use chrono::{NaiveDateTime, SubsecRound, Utc};

/// Current UTC time truncated to whole seconds, the precision of the
/// `DATETIME` columns and of the wire format.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}
