//! Services: orchestration of repos and domain rules inside one transaction.

pub mod history;
pub mod simulation;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Timestamp in the form every JSON view uses.
pub(crate) fn rfc3339(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}
