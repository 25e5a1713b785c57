//! SeaORM adapter for period steps (append-only audit rows).

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, JoinType, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};

use crate::entities::{execution_batches, period_steps};

pub mod dto;

pub use dto::{StepCreate, StepFilter};

/// Highest step index recorded for an execution, if any.
pub async fn max_step_index<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    execution_id: i64,
) -> Result<Option<i32>, DbErr> {
    let last = period_steps::Entity::find()
        .filter(period_steps::Column::ExecutionId.eq(execution_id))
        .order_by_desc(period_steps::Column::StepIndex)
        .one(conn)
        .await?;
    Ok(last.map(|s| s.step_index))
}

/// Rows per INSERT statement; keeps the bind count (nine per row) well under
/// the SQLite and Postgres parameter limits.
const INSERT_CHUNK_ROWS: usize = 1000;

/// Insert `steps` in chunks on `conn`; returns the number of rows written.
pub async fn insert_steps<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    steps: Vec<StepCreate>,
) -> Result<u64, DbErr> {
    let mut written = 0;
    for chunk in steps.chunks(INSERT_CHUNK_ROWS) {
        let models = chunk.iter().map(|s| period_steps::ActiveModel {
            id: NotSet,
            execution_id: Set(s.execution_id),
            game_id: Set(s.game_id),
            action: Set(s.action),
            period_from: Set(s.period_from),
            period_to: Set(s.period_to),
            decisions_from: Set(s.decisions_from),
            decisions_to: Set(s.decisions_to),
            step_index: Set(s.step_index),
            requested_at: Set(s.requested_at),
        });
        written += period_steps::Entity::insert_many(models)
            .exec_without_returning(conn)
            .await?;
    }
    Ok(written)
}

/// Steps of one execution in step order.
pub async fn find_by_execution<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    execution_id: i64,
) -> Result<Vec<period_steps::Model>, DbErr> {
    period_steps::Entity::find()
        .filter(period_steps::Column::ExecutionId.eq(execution_id))
        .order_by_asc(period_steps::Column::StepIndex)
        .all(conn)
        .await
}

/// Steps of several executions, grouped by execution then step order.
pub async fn find_by_executions<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    execution_ids: &[i64],
) -> Result<Vec<period_steps::Model>, DbErr> {
    if execution_ids.is_empty() {
        return Ok(Vec::new());
    }
    period_steps::Entity::find()
        .filter(period_steps::Column::ExecutionId.is_in(execution_ids.iter().copied()))
        .order_by_asc(period_steps::Column::ExecutionId)
        .order_by_asc(period_steps::Column::StepIndex)
        .all(conn)
        .await
}

pub async fn count_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DbErr> {
    period_steps::Entity::find()
        .filter(period_steps::Column::GameId.eq(game_id))
        .count(conn)
        .await
}

fn filtered(filter: &StepFilter) -> Select<period_steps::Entity> {
    let mut query = period_steps::Entity::find().join(
        JoinType::InnerJoin,
        period_steps::Relation::ExecutionBatch.def(),
    );
    if let Some(action) = filter.action {
        query = query.filter(
            Condition::any()
                .add(period_steps::Column::Action.eq(action))
                .add(execution_batches::Column::Action.eq(action)),
        );
    }
    if let Some(game_id) = filter.game_id {
        query = query.filter(period_steps::Column::GameId.eq(game_id));
    }
    if let Some(batch_id) = &filter.batch_id {
        query = query.filter(execution_batches::Column::BatchId.eq(batch_id.as_str()));
    }
    query
}

pub async fn count_filtered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &StepFilter,
) -> Result<u64, DbErr> {
    filtered(filter).count(conn).await
}

/// One page of matching steps, newest first; `page` is zero-based.
pub async fn page_filtered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &StepFilter,
    page: u64,
    page_size: u64,
) -> Result<Vec<period_steps::Model>, DbErr> {
    filtered(filter)
        .order_by_desc(period_steps::Column::RequestedAt)
        .order_by_desc(period_steps::Column::Id)
        .offset(page * page_size)
        .limit(page_size)
        .all(conn)
        .await
}
