//! SeaORM adapters: thin, connection-generic queries returning `DbErr`.
//! The repos layer maps errors to `DomainError` and rows to domain types.

pub mod executions_sea;
pub mod games_sea;
pub mod period_steps_sea;
