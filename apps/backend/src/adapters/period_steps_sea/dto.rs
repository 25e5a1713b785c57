//! DTOs for period_steps_sea adapter.

use time::OffsetDateTime;

use crate::entities::ActionCode;

/// One step row to insert; `step_index` is assigned by the caller.
#[derive(Debug, Clone)]
pub struct StepCreate {
    pub execution_id: i64,
    pub game_id: i64,
    pub action: ActionCode,
    pub period_from: i32,
    pub period_to: i32,
    pub decisions_from: Option<bool>,
    pub decisions_to: Option<bool>,
    pub step_index: i32,
    pub requested_at: OffsetDateTime,
}

/// History filters; `None` means "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepFilter {
    /// Matches the step's own action or the action of its execution
    pub action: Option<ActionCode>,
    pub game_id: Option<i64>,
    pub batch_id: Option<String>,
}
