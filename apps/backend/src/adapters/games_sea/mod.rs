//! SeaORM adapter for games - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DbErr, EntityTrait, NotSet,
    QueryFilter, QueryOrder, QuerySelect, Set, UpdateMany,
};

use crate::entities::games;

pub mod dto;

pub use dto::{GameCreate, GameUpdateProgress, GameUpdateStatus};

/// Apply a compare-and-swap update on `lock_version`, then refetch.
///
/// Zero affected rows means either the game is gone (`GAME_NOT_FOUND:`) or
/// someone else bumped the version first (`OPTIMISTIC_LOCK:` with both
/// versions); both are structured so `map_db_err` can classify them.
async fn optimistic_update_then_fetch<C, F>(
    conn: &C,
    id: i64,
    expected_lock_version: i32,
    configure_update: F,
) -> Result<games::Model, DbErr>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce(UpdateMany<games::Entity>) -> UpdateMany<games::Entity>,
{
    let now = time::OffsetDateTime::now_utc();

    let result = configure_update(games::Entity::update_many())
        .col_expr(games::Column::UpdatedAt, Expr::value(now))
        .col_expr(
            games::Column::LockVersion,
            Expr::col(games::Column::LockVersion).add(1),
        )
        .filter(games::Column::Id.eq(id))
        .filter(games::Column::LockVersion.eq(expected_lock_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find_by_id(conn, id).await? {
            Some(game) => Err(DbErr::Custom(format!(
                "OPTIMISTIC_LOCK:{{\"game_id\":{},\"expected\":{},\"actual\":{}}}",
                id, expected_lock_version, game.lock_version
            ))),
            None => Err(DbErr::Custom(format!("GAME_NOT_FOUND:{id}"))),
        };
    }

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| DbErr::Custom(format!("GAME_NOT_FOUND:{id}")))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, DbErr> {
    games::Entity::find_by_id(game_id).one(conn).await
}

/// Games with the given ids, ascending by id.
pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<games::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    games::Entity::find()
        .filter(games::Column::Id.is_in(ids.iter().copied()))
        .order_by_asc(games::Column::Id)
        .all(conn)
        .await
}

/// Like [`find_by_ids`] but takes row locks in id order on Postgres.
/// SQLite holds a database-wide write lock for the transaction instead.
pub async fn lock_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<games::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut query = games::Entity::find()
        .filter(games::Column::Id.is_in(ids.iter().copied()))
        .order_by_asc(games::Column::Id);
    if conn.get_database_backend() == DatabaseBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.all(conn).await
}

pub async fn find_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<games::Model>, DbErr> {
    games::Entity::find()
        .filter(games::Column::Code.eq(code))
        .one(conn)
        .await
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let game_active = games::ActiveModel {
        id: NotSet,
        code: Set(dto.code),
        name: Set(dto.name),
        status: Set(dto.status),
        current_period: Set(dto.current_period),
        decisions_available: Set(dto.decisions_available),
        lock_version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
    };

    game_active.insert(conn).await
}

pub async fn update_progress<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameUpdateProgress,
) -> Result<games::Model, DbErr> {
    optimistic_update_then_fetch(conn, dto.id, dto.expected_lock_version, |update| {
        update
            .col_expr(games::Column::CurrentPeriod, Expr::value(dto.current_period))
            .col_expr(
                games::Column::DecisionsAvailable,
                Expr::value(dto.decisions_available),
            )
    })
    .await
}

pub async fn update_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameUpdateStatus,
) -> Result<games::Model, DbErr> {
    optimistic_update_then_fetch(conn, dto.id, dto.expected_lock_version, |update| {
        update.col_expr(games::Column::Status, Expr::value(dto.status))
    })
    .await
}
