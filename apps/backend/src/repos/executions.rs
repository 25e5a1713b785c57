//! Execution batch repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::executions_sea as executions_adapter;
use crate::domain::{ActionKind, BatchId};
use crate::entities::execution_batches;
use crate::errors::domain::DomainError;

/// One (game, batch id) execution record.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub id: i64,
    pub game_id: i64,
    pub batch_id: String,
    pub action: ActionKind,
    pub requested_at: OffsetDateTime,
    pub requested_by: Option<i64>,
}

/// Return the execution for `(game_id, batch_id)`, creating it on first use.
///
/// An existing row keeps its timestamps; only a differing action is
/// overwritten with the newly requested one.
pub async fn get_or_create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    batch_id: &BatchId,
    action: ActionKind,
    requested_at: OffsetDateTime,
    requested_by: Option<i64>,
) -> Result<Execution, DomainError> {
    if let Some(existing) =
        executions_adapter::find_by_game_and_batch(conn, game_id, batch_id.as_str()).await?
    {
        let mut execution = Execution::from(existing);
        if execution.action != action {
            tracing::warn!(
                game_id,
                batch_id = %batch_id,
                recorded = %execution.action,
                requested = %action,
                "correcting execution action label"
            );
            executions_adapter::update_action(conn, execution.id, action.into()).await?;
            execution.action = action;
        }
        return Ok(execution);
    }

    let model = executions_adapter::create_execution(
        conn,
        executions_adapter::ExecutionCreate {
            game_id,
            batch_id: batch_id.as_str().to_string(),
            action: action.into(),
            requested_at,
            requested_by,
        },
    )
    .await?;
    Ok(Execution::from(model))
}

/// Every execution recorded under `batch_id`, ascending by game id.
pub async fn find_by_batch_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    batch_id: &BatchId,
) -> Result<Vec<Execution>, DomainError> {
    let rows = executions_adapter::find_by_batch_id(conn, batch_id.as_str()).await?;
    Ok(rows.into_iter().map(Execution::from).collect())
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<Execution>, DomainError> {
    let rows = executions_adapter::find_by_ids(conn, ids).await?;
    Ok(rows.into_iter().map(Execution::from).collect())
}

impl From<execution_batches::Model> for Execution {
    fn from(model: execution_batches::Model) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            batch_id: model.batch_id,
            action: model.action.into(),
            requested_at: model.requested_at,
            requested_by: model.requested_by,
        }
    }
}
