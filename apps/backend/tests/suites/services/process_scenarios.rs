//! End-to-end batch scenarios with exact step shapes.

use simulation_backend::adapters::{executions_sea, period_steps_sea};
use simulation_backend::db::txn::with_txn;
use simulation_backend::domain::ActionKind;
use simulation_backend::entities::ActionCode;
use simulation_backend::error::AppError;

use crate::support::games::{reload, seed_game};
use crate::support::process::process;
use crate::support::test_state::build_test_state;

#[tokio::test]
async fn r0d_on_period_three_replays_history_without_moving() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let game = seed_game(txn, 3, false).await?;

            let result = process(txn, &[game.id], "R0D", Some("0000000000000abc")).await?;

            assert_eq!(result.batch_id.as_str(), "0000000000000abc");
            let row = &result.results[0];
            assert_eq!(row.action, ActionKind::ReprocessToCurrent);
            assert_eq!((row.period_before, row.period_after), (3, 3));
            assert_eq!(row.steps_created, 3);

            let exec = executions_sea::find_by_game_and_batch(txn, game.id, "0000000000000abc")
                .await?
                .unwrap();
            let steps = period_steps_sea::find_by_execution(txn, exec.id).await?;
            let shape: Vec<(i32, i32, i32)> = steps
                .iter()
                .map(|s| (s.step_index, s.period_from, s.period_to))
                .collect();
            assert_eq!(shape, vec![(0, 0, 1), (1, 1, 2), (2, 2, 3)]);
            assert!(steps.iter().all(|s| s.action == ActionCode::R0d));

            let after = reload(txn, game.id).await?;
            assert_eq!(after.current_period, 3);
            assert_eq!(after.lock_version, game.lock_version + 1);
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn rsd_on_period_zero_simulates_and_releases_decisions() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let game = seed_game(txn, 0, false).await?;

            let result = process(txn, &[game.id], "RSD", None).await?;
            let row = &result.results[0];
            assert_eq!((row.period_before, row.period_after), (0, 1));
            assert!(!row.decisions_before);
            assert!(row.decisions_after);
            assert_eq!(row.steps_created, 2);

            let exec =
                executions_sea::find_by_game_and_batch(txn, game.id, result.batch_id.as_str())
                    .await?
                    .unwrap();
            assert_eq!(exec.action, ActionCode::Rsd);

            let steps = period_steps_sea::find_by_execution(txn, exec.id).await?;
            assert_eq!(steps.len(), 2);
            assert_eq!(
                (steps[0].action, steps[0].period_from, steps[0].period_to),
                (ActionCode::Spn, 0, 1)
            );
            assert_eq!(
                (steps[1].action, steps[1].period_from, steps[1].period_to),
                (ActionCode::Lpd, 1, 1)
            );
            assert_eq!((steps[1].decisions_from, steps[1].decisions_to), (Some(false), Some(true)));
            assert_eq!((steps[0].decisions_from, steps[0].decisions_to), (None, None));

            let after = reload(txn, game.id).await?;
            assert_eq!(after.current_period, 1);
            assert!(after.decisions_available);
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn cad_on_period_zero_stays_at_zero() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let game = seed_game(txn, 0, false).await?;

            let result = process(txn, &[game.id], "CAD", None).await?;
            let row = &result.results[0];
            assert_eq!((row.period_before, row.period_after), (0, 0));
            assert_eq!(row.steps_created, 1);

            let exec =
                executions_sea::find_by_game_and_batch(txn, game.id, result.batch_id.as_str())
                    .await?
                    .unwrap();
            let steps = period_steps_sea::find_by_execution(txn, exec.id).await?;
            assert_eq!((steps[0].period_from, steps[0].period_to), (0, 0));
            assert_eq!(reload(txn, game.id).await?.current_period, 0);
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn multi_game_results_follow_ascending_id() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let a = seed_game(txn, 1, false).await?;
            let b = seed_game(txn, 4, true).await?;

            let result = process(txn, &[b.id, a.id, b.id], "SPN", None).await?;

            let ids: Vec<i64> = result.results.iter().map(|r| r.game_id).collect();
            assert_eq!(ids, vec![a.id, b.id]);
            assert_eq!(result.results[0].period_after, 2);
            assert_eq!(result.results[1].period_after, 5);
            assert!(result.results[1].decisions_after);
            assert_eq!(result.results[0].code, a.code);
            assert_eq!(result.results[1].name, b.name);
            assert!(result.results.iter().all(|r| r.batch_id == result.batch_id));

            let executions =
                executions_sea::find_by_batch_id(txn, result.batch_id.as_str()).await?;
            assert_eq!(executions.len(), 2);
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn lpd_when_already_released_records_true_to_true() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let game = seed_game(txn, 2, true).await?;

            let result = process(txn, &[game.id], "LPD", None).await?;
            let row = &result.results[0];
            assert!(row.decisions_before && row.decisions_after);
            assert_eq!(row.period_after, 2);

            let exec =
                executions_sea::find_by_game_and_batch(txn, game.id, result.batch_id.as_str())
                    .await?
                    .unwrap();
            let steps = period_steps_sea::find_by_execution(txn, exec.id).await?;
            assert_eq!((steps[0].decisions_from, steps[0].decisions_to), (Some(true), Some(true)));
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn r0d_on_a_long_running_game_records_every_period() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let game = seed_game(txn, 5000, false).await?;

            let result = process(txn, &[game.id], "R0D", None).await?;
            assert_eq!(result.results[0].steps_created, 5000);

            let exec =
                executions_sea::find_by_game_and_batch(txn, game.id, result.batch_id.as_str())
                    .await?
                    .unwrap();
            let steps = period_steps_sea::find_by_execution(txn, exec.id).await?;
            assert_eq!(steps.len(), 5000);
            for (k, step) in steps.iter().enumerate() {
                let k = k as i32;
                assert_eq!((step.step_index, step.period_from, step.period_to), (k, k, k + 1));
            }

            assert_eq!(reload(txn, game.id).await?.current_period, 5000);
            Ok::<_, AppError>(())
        })
    })
    .await
}
