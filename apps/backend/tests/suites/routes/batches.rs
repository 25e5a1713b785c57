//! POST /api/simulation/batches and GET /api/simulation/batches/{batch_id}

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::{json, Value};
use simulation_backend::db::txn::SharedTxn;
use simulation_backend::db::require_db;
use simulation_backend::error::AppError;

use crate::support::app_builder::create_test_app;
use crate::support::games::{reload, seed_game, seed_inactive_game};
use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn process_then_lookup_batch() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let game = seed_game(shared.transaction(), 1, false).await?;

    let app = create_test_app(state)
        .with_shared_txn(shared.clone())
        .build()
        .await;

    let req = test::TestRequest::post()
        .uri("/api/simulation/batches")
        .insert_header(("x-actor-id", "11"))
        .set_json(json!({
            "game_ids": [game.id],
            "action": "SPN",
            "batch_id": "00000000000000a0"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["batch_id"], "00000000000000a0");
    let row = &body["results"][0];
    assert_eq!(row["game_id"], game.id);
    assert_eq!(row["code"], game.code.as_str());
    assert_eq!(row["action"], "SPN");
    assert_eq!(row["period_before"], 1);
    assert_eq!(row["period_after"], 2);
    assert_eq!(row["decisions_before"], false);
    assert_eq!(row["steps_created"], 1);

    let req = test::TestRequest::get()
        .uri("/api/simulation/batches/00000000000000a0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let view: Value = test::read_body_json(resp).await;
    let execution = &view["executions"][0];
    assert_eq!(execution["game_id"], game.id);
    assert_eq!(execution["action"], "SPN");
    assert_eq!(execution["requested_by"], 11);
    assert_eq!(execution["steps"][0]["period_from"], 1);
    assert_eq!(execution["steps"][0]["period_to"], 2);

    assert_eq!(reload(shared.transaction(), game.id).await?.current_period, 2);

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn generated_batch_id_is_sixteen_hex_chars() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let game = seed_game(shared.transaction(), 0, false).await?;

    let app = create_test_app(state)
        .with_shared_txn(shared.clone())
        .build()
        .await;

    let req = test::TestRequest::post()
        .uri("/api/simulation/batches")
        .set_json(json!({ "game_ids": [game.id], "action": "SPA" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let batch_id = body["batch_id"].as_str().unwrap();
    assert_eq!(batch_id.len(), 16);
    assert!(batch_id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn inactive_selection_is_422_and_nothing_changes() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let active = seed_game(shared.transaction(), 3, false).await?;
    let inactive = seed_inactive_game(shared.transaction(), 0).await?;

    let app = create_test_app(state)
        .with_shared_txn(shared.clone())
        .build()
        .await;

    let req = test::TestRequest::post()
        .uri("/api/simulation/batches")
        .set_json(json!({ "game_ids": [active.id, inactive.id], "action": "RND" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "GAME_NOT_ACTIVE",
        StatusCode::UNPROCESSABLE_ENTITY,
        Some(&inactive.id.to_string()),
    )
    .await;

    assert_eq!(reload(shared.transaction(), active.id).await?.current_period, 3);

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn missing_game_is_404() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/simulation/batches")
        .set_json(json!({ "game_ids": [424242], "action": "SPA" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "GAME_NOT_FOUND",
        StatusCode::NOT_FOUND,
        Some("424242"),
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn unknown_batch_lookup_is_404_and_bad_id_is_400() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/api/simulation/batches/abcdefabcdefabcd")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "BATCH_NOT_FOUND",
        StatusCode::NOT_FOUND,
        None,
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/simulation/batches/ABCDEF")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_BATCH_ID",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn advancing_past_largest_period_is_422() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let game = seed_game(shared.transaction(), i32::MAX, false).await?;

    let app = create_test_app(state)
        .with_shared_txn(shared.clone())
        .build()
        .await;

    let req = test::TestRequest::post()
        .uri("/api/simulation/batches")
        .set_json(json!({ "game_ids": [game.id], "action": "RND" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "PERIOD_OUT_OF_RANGE",
        StatusCode::UNPROCESSABLE_ENTITY,
        Some(&game.id.to_string()),
    )
    .await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}
