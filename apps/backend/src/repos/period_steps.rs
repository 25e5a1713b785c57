//! Period step repository functions (append and read only).

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::period_steps_sea as steps_adapter;
use crate::domain::{ActionKind, StepDraft};
use crate::entities::period_steps;
use crate::errors::domain::{DomainError, InfraErrorKind};

pub use steps_adapter::StepFilter;

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodStep {
    pub id: i64,
    pub execution_id: i64,
    pub game_id: i64,
    pub action: ActionKind,
    pub period_from: u32,
    pub period_to: u32,
    pub decisions_from: Option<bool>,
    pub decisions_to: Option<bool>,
    pub step_index: u32,
    pub requested_at: OffsetDateTime,
}

/// Index the next appended step of `execution_id` gets: 0 for a fresh
/// execution, otherwise one past the highest recorded index.
pub async fn next_step_index<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    execution_id: i64,
) -> Result<u32, DomainError> {
    match steps_adapter::max_step_index(conn, execution_id).await? {
        None => Ok(0),
        Some(max) => u32::try_from(max)
            .map(|max| max + 1)
            .map_err(|_| corrupt(format!("execution {execution_id} has step index {max}"))),
    }
}

/// Append `drafts` with consecutive indices starting at `first_index`.
pub async fn append<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    execution_id: i64,
    game_id: i64,
    first_index: u32,
    drafts: &[StepDraft],
    requested_at: OffsetDateTime,
) -> Result<u64, DomainError> {
    let mut rows = Vec::with_capacity(drafts.len());
    for (offset, draft) in drafts.iter().enumerate() {
        let step_index = u32::try_from(offset)
            .ok()
            .and_then(|offset| first_index.checked_add(offset))
            .and_then(|index| i32::try_from(index).ok())
            .ok_or_else(|| corrupt(format!("step index overflow on execution {execution_id}")))?;
        rows.push(steps_adapter::StepCreate {
            execution_id,
            game_id,
            action: draft.action.into(),
            period_from: to_column(draft.period_from)?,
            period_to: to_column(draft.period_to)?,
            decisions_from: draft.decisions_from,
            decisions_to: draft.decisions_to,
            step_index,
            requested_at,
        });
    }
    Ok(steps_adapter::insert_steps(conn, rows).await?)
}

/// Steps of the given executions, grouped by execution then by index.
pub async fn find_by_executions<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    execution_ids: &[i64],
) -> Result<Vec<PeriodStep>, DomainError> {
    steps_adapter::find_by_executions(conn, execution_ids)
        .await?
        .into_iter()
        .map(PeriodStep::try_from)
        .collect()
}

pub async fn count_matching<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &StepFilter,
) -> Result<u64, DomainError> {
    Ok(steps_adapter::count_filtered(conn, filter).await?)
}

/// One zero-based page of matching steps, newest first.
pub async fn page_matching<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &StepFilter,
    page: u64,
    page_size: u64,
) -> Result<Vec<PeriodStep>, DomainError> {
    steps_adapter::page_filtered(conn, filter, page, page_size)
        .await?
        .into_iter()
        .map(PeriodStep::try_from)
        .collect()
}

fn to_column(period: u32) -> Result<i32, DomainError> {
    i32::try_from(period).map_err(|_| corrupt(format!("period {period} out of range")))
}

fn corrupt(detail: String) -> DomainError {
    DomainError::infra(InfraErrorKind::DataCorruption, detail)
}

impl TryFrom<period_steps::Model> for PeriodStep {
    type Error = DomainError;

    fn try_from(model: period_steps::Model) -> Result<Self, Self::Error> {
        let non_negative = |value: i32, field: &str| {
            u32::try_from(value)
                .map_err(|_| corrupt(format!("step {} has negative {field} {value}", model.id)))
        };
        Ok(Self {
            id: model.id,
            execution_id: model.execution_id,
            game_id: model.game_id,
            action: model.action.into(),
            period_from: non_negative(model.period_from, "period_from")?,
            period_to: non_negative(model.period_to, "period_to")?,
            decisions_from: model.decisions_from,
            decisions_to: model.decisions_to,
            step_index: non_negative(model.step_index, "step_index")?,
            requested_at: model.requested_at,
        })
    }
}
