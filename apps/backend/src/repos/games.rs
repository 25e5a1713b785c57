//! Game repository functions for the batch processor.

use sea_orm::ConnectionTrait;

use crate::adapters::games_sea as games_adapter;
use crate::domain::GameSnapshot;
use crate::entities::games;
use crate::entities::games::GameStatus;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// Game domain model
///
/// Only the fields the processor reads or writes. Converted from
/// `games::Model` when loaded through repos functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub status: GameStatus,
    pub current_period: u32,
    pub decisions_available: bool,
    pub lock_version: i32,
}

impl Game {
    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            current_period: self.current_period,
            decisions_available: self.decisions_available,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Game>, DomainError> {
    games_adapter::find_by_id(conn, game_id)
        .await?
        .map(Game::try_from)
        .transpose()
}

/// Load and lock the given games, ascending by id.
///
/// Ids with no matching row are simply absent from the result; callers
/// compare against their selection to report every missing id at once.
pub async fn lock_for_processing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<Game>, DomainError> {
    games_adapter::lock_by_ids(conn, ids)
        .await?
        .into_iter()
        .map(Game::try_from)
        .collect()
}

/// Games by id, ascending; used to decorate audit views.
pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<Game>, DomainError> {
    games_adapter::find_by_ids(conn, ids)
        .await?
        .into_iter()
        .map(Game::try_from)
        .collect()
}

/// Persist the period counter and decisions flag with a compare-and-swap on
/// `lock_version`. Returns the game as stored afterwards.
pub async fn save_progress<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game: &Game,
    next: GameSnapshot,
) -> Result<Game, DomainError> {
    let current_period = i32::try_from(next.current_period).map_err(|_| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!(
                "Period {} for game {} does not fit the period column",
                next.current_period, game.id
            ),
        )
    })?;
    let dto = games_adapter::GameUpdateProgress {
        id: game.id,
        expected_lock_version: game.lock_version,
        current_period,
        decisions_available: next.decisions_available,
    };
    let model = games_adapter::update_progress(conn, dto).await?;
    Game::try_from(model)
}

pub async fn set_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game: &Game,
    status: GameStatus,
) -> Result<Game, DomainError> {
    let dto = games_adapter::GameUpdateStatus {
        id: game.id,
        expected_lock_version: game.lock_version,
        status,
    };
    let model = games_adapter::update_status(conn, dto).await?;
    Game::try_from(model)
}

impl TryFrom<games::Model> for Game {
    type Error = DomainError;

    fn try_from(model: games::Model) -> Result<Self, Self::Error> {
        let current_period = u32::try_from(model.current_period).map_err(|_| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!(
                    "Game {} has negative period {}",
                    model.id, model.current_period
                ),
            )
        })?;
        Ok(Self {
            id: model.id,
            code: model.code,
            name: model.name,
            status: model.status,
            current_period,
            decisions_available: model.decisions_available,
            lock_version: model.lock_version,
        })
    }
}
