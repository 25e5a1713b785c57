//! Simulation batch HTTP routes.

use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Deserialize;

use crate::db::txn::with_txn;
use crate::domain::BatchId;
use crate::error::AppError;
use crate::extractors::{ActorId, ValidatedJson};
use crate::services::history::{HistoryQuery, HistoryRequest, HistoryService};
use crate::services::simulation::{ProcessRequest, SimulationService};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessBody {
    pub game_ids: Vec<i64>,
    pub action: String,
    #[serde(default)]
    pub batch_id: Option<String>,
}

/// POST /api/simulation/batches
///
/// Applies one action to every selected game in a single transaction and
/// returns the per-game summary. Input is validated before the database is
/// touched.
async fn process_batch(
    http_req: HttpRequest,
    actor: ActorId,
    body: ValidatedJson<ProcessBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let req = ProcessRequest::parse(
        &body.game_ids,
        &body.action,
        actor.into_inner(),
        body.batch_id.as_deref(),
    )?;

    let result = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(SimulationService::new().process(txn, req).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/simulation/history?action=&game_id=&batch_id=&page=
async fn list_history(
    http_req: HttpRequest,
    query: web::Query<HistoryQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = HistoryRequest::parse(&query)?;

    let page = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(HistoryService::new().list(txn, &req).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/simulation/batches/{batch_id}
async fn get_batch(
    http_req: HttpRequest,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let batch_id = BatchId::parse(&path.into_inner())?;

    let view = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(SimulationService::new().find_batch(txn, &batch_id).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/batches", web::post().to(process_batch))
        .route("/batches/{batch_id}", web::get().to(get_batch))
        .route("/history", web::get().to(list_history));
}
