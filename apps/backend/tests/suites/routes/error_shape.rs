//! Problem-details shape for request-level failures.

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::json;
use simulation_backend::state::app_state::AppState;

use crate::support::app_builder::create_test_app;

fn post(body: serde_json::Value) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/api/simulation/batches")
        .set_json(body)
        .to_request()
}

#[actix_web::test]
async fn validation_errors_need_no_database() {
    let app = create_test_app(AppState::without_db()).build().await;

    let cases = [
        (json!({ "game_ids": [], "action": "SPA" }), "EMPTY_SELECTION"),
        (json!({ "game_ids": [1], "action": "XYZ" }), "INVALID_ACTION"),
        (
            json!({ "game_ids": [1], "action": "SPA", "batch_id": "123" }),
            "INVALID_BATCH_ID",
        ),
        (json!({ "game_ids": [0], "action": "SPA" }), "INVALID_GAME_ID"),
        (json!({ "action": "SPA" }), "INVALID_JSON"),
    ];

    for (body, code) in cases {
        let resp = test::call_service(&app, post(body)).await;
        assert_problem_details_from_service_response(resp, code, StatusCode::BAD_REQUEST, None)
            .await;
    }
}

#[actix_web::test]
async fn malformed_actor_header_is_400() {
    let app = create_test_app(AppState::without_db()).build().await;

    let req = test::TestRequest::post()
        .uri("/api/simulation/batches")
        .insert_header(("x-actor-id", "nobody"))
        .set_json(json!({ "game_ids": [1], "action": "SPA" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_ACTOR_ID",
        StatusCode::BAD_REQUEST,
        Some("nobody"),
    )
    .await;
}

#[actix_web::test]
async fn missing_database_is_503_with_retry_after() {
    let app = create_test_app(AppState::without_db()).build().await;

    let resp = test::call_service(&app, post(json!({ "game_ids": [1], "action": "SPA" }))).await;
    assert!(resp.headers().get("retry-after").is_some());
    assert_problem_details_from_service_response(
        resp,
        "DB_UNAVAILABLE",
        StatusCode::SERVICE_UNAVAILABLE,
        None,
    )
    .await;
}

#[actix_web::test]
async fn trace_header_matches_request_id() {
    let app = create_test_app(AppState::without_db()).build().await;

    let req = test::TestRequest::post()
        .uri("/api/simulation/batches")
        .insert_header(("x-request-id", "gateway-trace-1"))
        .set_json(json!({ "game_ids": [], "action": "SPA" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "gateway-trace-1");
    assert_eq!(resp.headers().get("x-trace-id").unwrap(), "gateway-trace-1");
}
