//! SeaORM adapter for execution batches.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::{execution_batches, ActionCode};

#[derive(Debug, Clone)]
pub struct ExecutionCreate {
    pub game_id: i64,
    pub batch_id: String,
    pub action: ActionCode,
    pub requested_at: OffsetDateTime,
    pub requested_by: Option<i64>,
}

pub async fn find_by_game_and_batch<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    batch_id: &str,
) -> Result<Option<execution_batches::Model>, DbErr> {
    execution_batches::Entity::find()
        .filter(execution_batches::Column::GameId.eq(game_id))
        .filter(execution_batches::Column::BatchId.eq(batch_id))
        .one(conn)
        .await
}

pub async fn create_execution<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ExecutionCreate,
) -> Result<execution_batches::Model, DbErr> {
    execution_batches::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        batch_id: Set(dto.batch_id),
        action: Set(dto.action),
        requested_at: Set(dto.requested_at),
        requested_by: Set(dto.requested_by),
    }
    .insert(conn)
    .await
}

/// Overwrite the recorded action label; the only mutation an execution ever sees.
pub async fn update_action<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    action: ActionCode,
) -> Result<(), DbErr> {
    let result = execution_batches::Entity::update_many()
        .col_expr(execution_batches::Column::Action, Expr::value(action))
        .filter(execution_batches::Column::Id.eq(id))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(DbErr::RecordNotFound(format!("execution batch {id}")));
    }
    Ok(())
}

/// All executions of one batch id, ascending by game id.
pub async fn find_by_batch_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    batch_id: &str,
) -> Result<Vec<execution_batches::Model>, DbErr> {
    execution_batches::Entity::find()
        .filter(execution_batches::Column::BatchId.eq(batch_id))
        .order_by_asc(execution_batches::Column::GameId)
        .all(conn)
        .await
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<execution_batches::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    execution_batches::Entity::find()
        .filter(execution_batches::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await
}

pub async fn count_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DbErr> {
    use sea_orm::PaginatorTrait;

    execution_batches::Entity::find()
        .filter(execution_batches::Column::GameId.eq(game_id))
        .count(conn)
        .await
}
