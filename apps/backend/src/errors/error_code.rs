//! Error codes for the simulation API.
//!
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses. Add new codes here; never pass ad-hoc strings.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// No game ids supplied
    EmptySelection,
    /// Action code outside the fixed set
    InvalidAction,
    /// Batch id is not 16 lowercase hex characters
    InvalidBatchId,
    /// `x-actor-id` header is not a positive integer
    InvalidActorId,
    /// Game id is not a positive integer
    InvalidGameId,
    /// History filter or page parameter could not be parsed
    InvalidFilter,
    /// Request body is not valid JSON for the endpoint
    InvalidJson,
    ValidationError,
    BadRequest,

    // Resource Not Found
    GameNotFound,
    BatchNotFound,
    NotFound,

    // Preconditions
    /// A selected game is not Active
    GameNotActive,
    /// The action would move a game past the largest storable period
    PeriodOutOfRange,
    PreconditionFailed,

    // Conflicts
    OptimisticLock,
    UniqueGameCode,
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    DbTimeout,
    DataCorruption,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EmptySelection => "EMPTY_SELECTION",
            Self::InvalidAction => "INVALID_ACTION",
            Self::InvalidBatchId => "INVALID_BATCH_ID",
            Self::InvalidActorId => "INVALID_ACTOR_ID",
            Self::InvalidGameId => "INVALID_GAME_ID",
            Self::InvalidFilter => "INVALID_FILTER",
            Self::InvalidJson => "INVALID_JSON",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::BatchNotFound => "BATCH_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::GameNotActive => "GAME_NOT_ACTIVE",
            Self::PeriodOutOfRange => "PERIOD_OUT_OF_RANGE",
            Self::PreconditionFailed => "PRECONDITION_FAILED",

            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::UniqueGameCode => "UNIQUE_GAME_CODE",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    pub const ALL: [ErrorCode; 24] = [
        Self::EmptySelection,
        Self::InvalidAction,
        Self::InvalidBatchId,
        Self::InvalidActorId,
        Self::InvalidGameId,
        Self::InvalidFilter,
        Self::InvalidJson,
        Self::ValidationError,
        Self::BadRequest,
        Self::GameNotFound,
        Self::BatchNotFound,
        Self::NotFound,
        Self::GameNotActive,
        Self::PeriodOutOfRange,
        Self::PreconditionFailed,
        Self::OptimisticLock,
        Self::UniqueGameCode,
        Self::Conflict,
        Self::DbError,
        Self::DbUnavailable,
        Self::DbTimeout,
        Self::DataCorruption,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
