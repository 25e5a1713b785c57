//! Audit history listing: period steps joined with their execution and game.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

use crate::domain::{ActionKind, BatchId};
use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};
use crate::repos::period_steps::StepFilter;
use crate::repos::{executions, games, period_steps};
use crate::services::rfc3339;

pub const PAGE_SIZE: u64 = 20;

/// Raw query-string values; empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistoryQuery {
    pub action: Option<String>,
    pub game_id: Option<String>,
    pub batch_id: Option<String>,
    pub page: Option<String>,
}

/// Parsed filter plus the requested (unclamped, 1-based) page.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRequest {
    pub action: Option<ActionKind>,
    pub game_id: Option<i64>,
    pub batch_id: Option<BatchId>,
    pub page: u64,
}

impl HistoryRequest {
    /// Malformed filters are rejected; a page that is not a number means page 1.
    pub fn parse(query: &HistoryQuery) -> Result<Self, DomainError> {
        let action = match present(&query.action) {
            Some(raw) => Some(raw.parse::<ActionKind>().map_err(|_| {
                invalid_filter(format!("Unknown action filter '{raw}'"))
            })?),
            None => None,
        };
        let game_id = match present(&query.game_id) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) if id > 0 => Some(id),
                _ => return Err(invalid_filter(format!("Invalid game filter '{raw}'"))),
            },
            None => None,
        };
        let batch_id = match present(&query.batch_id) {
            Some(raw) => Some(
                BatchId::parse(raw)
                    .map_err(|_| invalid_filter(format!("Invalid batch filter '{raw}'")))?,
            ),
            None => None,
        };
        let page = present(&query.page)
            .and_then(|raw| raw.parse::<i64>().ok())
            .map(|p| p.max(1) as u64)
            .unwrap_or(1);
        Ok(Self {
            action,
            game_id,
            batch_id,
            page,
        })
    }

    fn filter(&self) -> StepFilter {
        StepFilter {
            action: self.action.map(Into::into),
            game_id: self.game_id,
            batch_id: self.batch_id.as_ref().map(|b| b.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryItem {
    pub step_id: i64,
    pub execution_id: i64,
    pub batch_id: String,
    pub game_id: i64,
    pub game_code: String,
    pub game_name: String,
    /// Primitive that produced the step
    pub action: ActionKind,
    pub action_label: &'static str,
    /// Action requested for the whole execution (differs for composites)
    pub execution_action: ActionKind,
    pub period_from: u32,
    pub period_to: u32,
    pub decisions_from: Option<bool>,
    pub decisions_to: Option<bool>,
    pub step_index: u32,
    pub requested_at: String,
    pub requested_by: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPage {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub items: Vec<HistoryItem>,
}

/// Clamp a 1-based page into `[1, total_pages]`; an empty listing has one page.
pub fn clamp_page(requested: u64, total_items: u64, page_size: u64) -> (u64, u64) {
    let total_pages = total_items.div_ceil(page_size).max(1);
    (requested.clamp(1, total_pages), total_pages)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HistoryService;

impl HistoryService {
    pub fn new() -> Self {
        Self
    }

    /// Newest-first page of steps matching `req`.
    pub async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        req: &HistoryRequest,
    ) -> Result<HistoryPage, DomainError> {
        let filter = req.filter();
        let total_items = period_steps::count_matching(conn, &filter).await?;
        let (page, total_pages) = clamp_page(req.page, total_items, PAGE_SIZE);

        let steps = if total_items == 0 {
            Vec::new()
        } else {
            period_steps::page_matching(conn, &filter, page - 1, PAGE_SIZE).await?
        };

        let mut execution_ids: Vec<i64> = steps.iter().map(|s| s.execution_id).collect();
        execution_ids.sort_unstable();
        execution_ids.dedup();
        let executions: HashMap<i64, executions::Execution> =
            executions::find_by_ids(conn, &execution_ids)
                .await?
                .into_iter()
                .map(|e| (e.id, e))
                .collect();

        let mut game_ids: Vec<i64> = steps.iter().map(|s| s.game_id).collect();
        game_ids.sort_unstable();
        game_ids.dedup();
        let games_by_id: HashMap<i64, games::Game> = games::find_by_ids(conn, &game_ids)
            .await?
            .into_iter()
            .map(|g| (g.id, g))
            .collect();

        let mut items = Vec::with_capacity(steps.len());
        for step in steps {
            let execution = executions.get(&step.execution_id).ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("Step {} references missing execution", step.id),
                )
            })?;
            let (game_code, game_name) = games_by_id
                .get(&step.game_id)
                .map(|g| (g.code.clone(), g.name.clone()))
                .unwrap_or_default();
            items.push(HistoryItem {
                step_id: step.id,
                execution_id: step.execution_id,
                batch_id: execution.batch_id.clone(),
                game_id: step.game_id,
                game_code,
                game_name,
                action: step.action,
                action_label: step.action.label(),
                execution_action: execution.action,
                period_from: step.period_from,
                period_to: step.period_to,
                decisions_from: step.decisions_from,
                decisions_to: step.decisions_to,
                step_index: step.step_index,
                requested_at: rfc3339(step.requested_at),
                requested_by: execution.requested_by,
            });
        }

        Ok(HistoryPage {
            page,
            page_size: PAGE_SIZE,
            total_items,
            total_pages,
            items,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn invalid_filter(detail: String) -> DomainError {
    DomainError::validation(ValidationKind::InvalidFilter, detail)
}
