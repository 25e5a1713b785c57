//! Shortcuts for driving the batch service inside a test transaction.

use sea_orm::DatabaseTransaction;
use simulation_backend::errors::domain::DomainError;
use simulation_backend::services::simulation::{BatchResult, ProcessRequest, SimulationService};

pub async fn process(
    txn: &DatabaseTransaction,
    game_ids: &[i64],
    action: &str,
    batch_id: Option<&str>,
) -> Result<BatchResult, DomainError> {
    let req = ProcessRequest::parse(game_ids, action, None, batch_id)?;
    SimulationService::new().process(txn, req).await
}
