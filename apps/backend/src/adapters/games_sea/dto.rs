//! DTOs for games_sea adapter.

use crate::entities::games::GameStatus;

/// DTO for creating a new game.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub code: String,
    pub name: String,
    pub status: GameStatus,
    pub current_period: i32,
    pub decisions_available: bool,
}

impl GameCreate {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            status: GameStatus::Active,
            current_period: 0,
            decisions_available: false,
        }
    }

    pub fn with_status(mut self, status: GameStatus) -> Self {
        self.status = status;
        self
    }

    pub fn at_period(mut self, current_period: i32) -> Self {
        self.current_period = current_period;
        self
    }

    pub fn with_decisions(mut self, decisions_available: bool) -> Self {
        self.decisions_available = decisions_available;
        self
    }
}

/// Period/decisions update guarded by `expected_lock_version`.
#[derive(Debug, Clone)]
pub struct GameUpdateProgress {
    pub id: i64,
    pub expected_lock_version: i32,
    pub current_period: i32,
    pub decisions_available: bool,
}

/// Status toggle guarded by `expected_lock_version`.
#[derive(Debug, Clone)]
pub struct GameUpdateStatus {
    pub id: i64,
    pub expected_lock_version: i32,
    pub status: GameStatus,
}
