//! Batch processing: apply one action to a set of games as a single unit.

use std::collections::{BTreeMap, BTreeSet};

use sea_orm::{ConnectionTrait, DatabaseTransaction, TransactionTrait};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::domain::{self, ActionKind, BatchId};
use crate::errors::domain::{DomainError, NotFoundKind, PreconditionKind, ValidationKind};
use crate::repos::{executions, games, period_steps};
use crate::services::rfc3339;

/// Validated input of one `process` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRequest {
    /// Distinct ids, ascending
    pub game_ids: BTreeSet<i64>,
    pub action: ActionKind,
    pub actor_id: Option<i64>,
    pub batch_id: BatchId,
}

impl ProcessRequest {
    /// Validate raw caller input. Runs before any storage access.
    ///
    /// Duplicate ids collapse; a missing batch id is generated.
    pub fn parse(
        game_ids: &[i64],
        action: &str,
        actor_id: Option<i64>,
        batch_id: Option<&str>,
    ) -> Result<Self, DomainError> {
        if game_ids.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::EmptySelection,
                "Select at least one game",
            ));
        }
        let invalid: Vec<i64> = game_ids.iter().copied().filter(|id| *id <= 0).collect();
        if !invalid.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidGameId,
                format!("Game ids must be positive: {}", join_ids(&invalid)),
            ));
        }
        let action: ActionKind = action.parse()?;
        let batch_id = BatchId::resolve(batch_id)?;
        Ok(Self {
            game_ids: game_ids.iter().copied().collect(),
            action,
            actor_id,
            batch_id,
        })
    }
}

/// Outcome for one game of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameResult {
    pub game_id: i64,
    pub code: String,
    pub name: String,
    pub action: ActionKind,
    pub batch_id: BatchId,
    pub period_before: u32,
    pub period_after: u32,
    pub decisions_before: bool,
    pub decisions_after: bool,
    pub steps_created: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub batch_id: BatchId,
    /// Ascending by game id
    pub results: Vec<GameResult>,
}

/// Step as shown in the batch lookup view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub step_id: i64,
    pub step_index: u32,
    pub action: ActionKind,
    pub action_label: &'static str,
    pub period_from: u32,
    pub period_to: u32,
    pub decisions_from: Option<bool>,
    pub decisions_to: Option<bool>,
    pub requested_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionView {
    pub execution_id: i64,
    pub game_id: i64,
    pub game_code: String,
    pub game_name: String,
    pub action: ActionKind,
    pub action_label: &'static str,
    pub requested_at: String,
    pub requested_by: Option<i64>,
    pub steps: Vec<StepView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchView {
    pub batch_id: BatchId,
    pub executions: Vec<ExecutionView>,
}

/// Simulation batch service.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulationService;

impl SimulationService {
    pub fn new() -> Self {
        Self
    }

    /// Apply `req.action` to every selected game.
    ///
    /// All writes happen under a savepoint of `txn`: either every game is
    /// advanced and audited, or nothing is.
    pub async fn process(
        &self,
        txn: &DatabaseTransaction,
        req: ProcessRequest,
    ) -> Result<BatchResult, DomainError> {
        let savepoint = txn.begin().await?;
        match self.process_in(&savepoint, &req).await {
            Ok(result) => {
                savepoint.commit().await?;
                info!(
                    batch_id = %result.batch_id,
                    action = %req.action,
                    games = result.results.len(),
                    "batch processed"
                );
                Ok(result)
            }
            Err(err) => {
                if let Err(rollback_err) = savepoint.rollback().await {
                    warn!(error = %rollback_err, "savepoint rollback failed");
                }
                warn!(
                    batch_id = %req.batch_id,
                    action = %req.action,
                    error = %err,
                    "batch aborted"
                );
                Err(err)
            }
        }
    }

    async fn process_in<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        req: &ProcessRequest,
    ) -> Result<BatchResult, DomainError> {
        let ids: Vec<i64> = req.game_ids.iter().copied().collect();
        info!(
            batch_id = %req.batch_id,
            action = %req.action,
            games = ids.len(),
            actor_id = ?req.actor_id,
            "batch starting"
        );

        let loaded = games::lock_for_processing(conn, &ids).await?;
        check_selection(&req.game_ids, &loaded)?;

        let requested_at = OffsetDateTime::now_utc();
        let mut results = Vec::with_capacity(loaded.len());

        for game in loaded {
            let before = game.snapshot();
            ensure_storable(game.id, req.action, before.current_period)?;
            let transition = domain::apply(req.action, before);

            let execution = executions::get_or_create(
                conn,
                game.id,
                &req.batch_id,
                req.action,
                requested_at,
                req.actor_id,
            )
            .await?;
            let first_index = period_steps::next_step_index(conn, execution.id).await?;
            period_steps::append(
                conn,
                execution.id,
                game.id,
                first_index,
                &transition.steps,
                requested_at,
            )
            .await?;
            let saved = games::save_progress(conn, &game, transition.next).await?;

            debug!(
                game_id = game.id,
                execution_id = execution.id,
                first_index,
                steps = transition.steps_created(),
                lock_version = saved.lock_version,
                "game advanced"
            );

            results.push(GameResult {
                game_id: game.id,
                code: game.code,
                name: game.name,
                action: req.action,
                batch_id: req.batch_id.clone(),
                period_before: before.current_period,
                period_after: transition.next.current_period,
                decisions_before: before.decisions_available,
                decisions_after: transition.next.decisions_available,
                steps_created: transition.steps_created(),
            });
        }

        Ok(BatchResult {
            batch_id: req.batch_id.clone(),
            results,
        })
    }

    /// Every execution recorded under `batch_id` with its game and steps.
    pub async fn find_batch<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        batch_id: &BatchId,
    ) -> Result<BatchView, DomainError> {
        let executions = executions::find_by_batch_id(conn, batch_id).await?;
        if executions.is_empty() {
            return Err(DomainError::not_found(
                NotFoundKind::Batch,
                format!("No executions recorded for batch {batch_id}"),
            ));
        }

        let game_ids: Vec<i64> = executions.iter().map(|e| e.game_id).collect();
        let games_by_id: BTreeMap<i64, games::Game> = games::find_by_ids(conn, &game_ids)
            .await?
            .into_iter()
            .map(|g| (g.id, g))
            .collect();

        let execution_ids: Vec<i64> = executions.iter().map(|e| e.id).collect();
        let mut steps_by_execution: BTreeMap<i64, Vec<StepView>> = BTreeMap::new();
        for step in period_steps::find_by_executions(conn, &execution_ids).await? {
            steps_by_execution
                .entry(step.execution_id)
                .or_default()
                .push(StepView {
                    step_id: step.id,
                    step_index: step.step_index,
                    action: step.action,
                    action_label: step.action.label(),
                    period_from: step.period_from,
                    period_to: step.period_to,
                    decisions_from: step.decisions_from,
                    decisions_to: step.decisions_to,
                    requested_at: rfc3339(step.requested_at),
                });
        }

        let executions = executions
            .into_iter()
            .map(|execution| {
                let (game_code, game_name) = games_by_id
                    .get(&execution.game_id)
                    .map(|g| (g.code.clone(), g.name.clone()))
                    .unwrap_or_default();
                ExecutionView {
                    execution_id: execution.id,
                    game_id: execution.game_id,
                    game_code,
                    game_name,
                    action: execution.action,
                    action_label: execution.action.label(),
                    requested_at: rfc3339(execution.requested_at),
                    requested_by: execution.requested_by,
                    steps: steps_by_execution
                        .remove(&execution.id)
                        .unwrap_or_default(),
                }
            })
            .collect();

        Ok(BatchView {
            batch_id: batch_id.clone(),
            executions,
        })
    }
}

/// Every requested id must exist and be active; all offenders are reported.
fn check_selection(requested: &BTreeSet<i64>, loaded: &[games::Game]) -> Result<(), DomainError> {
    let found: BTreeSet<i64> = loaded.iter().map(|g| g.id).collect();
    let missing: Vec<i64> = requested.difference(&found).copied().collect();
    if !missing.is_empty() {
        return Err(DomainError::not_found(
            NotFoundKind::Game,
            format!("Games not found: {}", join_ids(&missing)),
        ));
    }

    let inactive: Vec<i64> = loaded
        .iter()
        .filter(|g| !g.is_active())
        .map(|g| g.id)
        .collect();
    if !inactive.is_empty() {
        return Err(DomainError::precondition(
            PreconditionKind::GameNotActive,
            format!("Games not active: {}", join_ids(&inactive)),
        ));
    }
    Ok(())
}

/// Periods are stored as non-negative 32-bit integers; an action that would
/// leave that range is refused before anything is written for the game.
fn ensure_storable(
    game_id: i64,
    action: ActionKind,
    current_period: u32,
) -> Result<(), DomainError> {
    let highest = domain::highest_period(action, current_period);
    if highest <= i32::MAX as u64 {
        return Ok(());
    }
    Err(DomainError::precondition(
        PreconditionKind::PeriodOutOfRange,
        format!(
            "Game {game_id} would reach period {highest}, past the largest storable period {}",
            i32::MAX
        ),
    ))
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
