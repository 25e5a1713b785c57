//! period_steps_sea: step indices, bulk insert and the filtered history query.

use sea_orm::{ConnectionTrait, TransactionTrait};
use simulation_backend::adapters::executions_sea::{self, ExecutionCreate};
use simulation_backend::adapters::period_steps_sea::{self, StepCreate, StepFilter};
use simulation_backend::db::txn::with_txn;
use simulation_backend::entities::{execution_batches, ActionCode};
use simulation_backend::error::AppError;
use time::{Duration, OffsetDateTime};

use crate::support::games::seed_game;
use crate::support::test_state::build_test_state;

async fn new_execution<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    batch_id: &str,
    action: ActionCode,
    requested_at: OffsetDateTime,
) -> Result<execution_batches::Model, AppError> {
    Ok(executions_sea::create_execution(
        conn,
        ExecutionCreate {
            game_id,
            batch_id: batch_id.to_string(),
            action,
            requested_at,
            requested_by: None,
        },
    )
    .await?)
}

fn step(
    execution: &execution_batches::Model,
    action: ActionCode,
    index: i32,
    requested_at: OffsetDateTime,
) -> StepCreate {
    StepCreate {
        execution_id: execution.id,
        game_id: execution.game_id,
        action,
        period_from: index,
        period_to: index + 1,
        decisions_from: None,
        decisions_to: None,
        step_index: index,
        requested_at,
    }
}

#[tokio::test]
async fn max_step_index_tracks_inserts() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let now = OffsetDateTime::now_utc();
            let game = seed_game(txn, 0, false).await?;
            let exec = new_execution(txn, game.id, "0000000000000001", ActionCode::R0d, now).await?;

            assert_eq!(period_steps_sea::max_step_index(txn, exec.id).await?, None);
            assert_eq!(period_steps_sea::insert_steps(txn, Vec::new()).await?, 0);

            let rows = (0..3).map(|i| step(&exec, ActionCode::R0d, i, now)).collect();
            assert_eq!(period_steps_sea::insert_steps(txn, rows).await?, 3);
            assert_eq!(period_steps_sea::max_step_index(txn, exec.id).await?, Some(2));

            let stored = period_steps_sea::find_by_execution(txn, exec.id).await?;
            assert_eq!(
                stored.iter().map(|s| s.step_index).collect::<Vec<_>>(),
                vec![0, 1, 2]
            );
            assert_eq!(period_steps_sea::count_for_game(txn, game.id).await?, 3);
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn duplicate_step_index_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let now = OffsetDateTime::now_utc();
            let game = seed_game(txn, 0, false).await?;
            let exec = new_execution(txn, game.id, "0000000000000002", ActionCode::Spa, now).await?;
            period_steps_sea::insert_steps(txn, vec![step(&exec, ActionCode::Spa, 0, now)]).await?;

            let savepoint = txn.begin().await?;
            let result =
                period_steps_sea::insert_steps(&savepoint, vec![step(&exec, ActionCode::Spa, 0, now)])
                    .await;
            savepoint.rollback().await?;

            assert!(result.is_err());
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn history_query_filters_and_orders_newest_first() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let earlier = OffsetDateTime::now_utc() - Duration::minutes(5);
            let later = earlier + Duration::minutes(1);
            let a = seed_game(txn, 0, false).await?;
            let b = seed_game(txn, 0, false).await?;

            // Composite execution on game a: steps labelled with their primitives.
            let rsd = new_execution(txn, a.id, "00000000000000aa", ActionCode::Rsd, earlier).await?;
            period_steps_sea::insert_steps(
                txn,
                vec![
                    step(&rsd, ActionCode::Spn, 0, earlier),
                    step(&rsd, ActionCode::Lpd, 1, earlier),
                ],
            )
            .await?;

            let spa = new_execution(txn, b.id, "00000000000000bb", ActionCode::Spa, later).await?;
            period_steps_sea::insert_steps(txn, vec![step(&spa, ActionCode::Spa, 0, later)])
                .await?;

            let all = StepFilter::default();
            assert_eq!(period_steps_sea::count_filtered(txn, &all).await?, 3);
            let page = period_steps_sea::page_filtered(txn, &all, 0, 20).await?;
            let order: Vec<(i64, i32)> = page.iter().map(|s| (s.execution_id, s.step_index)).collect();
            assert_eq!(order, vec![(spa.id, 0), (rsd.id, 1), (rsd.id, 0)]);

            // Matching the execution action surfaces every step of the composite.
            let by_rsd = StepFilter {
                action: Some(ActionCode::Rsd),
                ..StepFilter::default()
            };
            assert_eq!(period_steps_sea::count_filtered(txn, &by_rsd).await?, 2);

            // Matching the step action finds the primitive inside the composite.
            let by_lpd = StepFilter {
                action: Some(ActionCode::Lpd),
                ..StepFilter::default()
            };
            let lpd = period_steps_sea::page_filtered(txn, &by_lpd, 0, 20).await?;
            assert_eq!(lpd.len(), 1);
            assert_eq!(lpd[0].execution_id, rsd.id);

            let by_game = StepFilter {
                game_id: Some(b.id),
                ..StepFilter::default()
            };
            assert_eq!(period_steps_sea::count_filtered(txn, &by_game).await?, 1);

            let by_batch = StepFilter {
                batch_id: Some("00000000000000aa".to_string()),
                game_id: Some(a.id),
                ..StepFilter::default()
            };
            assert_eq!(period_steps_sea::count_filtered(txn, &by_batch).await?, 2);

            let none = StepFilter {
                batch_id: Some("00000000000000aa".to_string()),
                game_id: Some(b.id),
                ..StepFilter::default()
            };
            assert_eq!(period_steps_sea::count_filtered(txn, &none).await?, 0);
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn history_query_pages_by_offset() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let now = OffsetDateTime::now_utc();
            let game = seed_game(txn, 0, false).await?;
            let exec = new_execution(txn, game.id, "00000000000000cc", ActionCode::R0d, now).await?;
            let rows = (0..5).map(|i| step(&exec, ActionCode::R0d, i, now)).collect();
            period_steps_sea::insert_steps(txn, rows).await?;

            let filter = StepFilter::default();
            let first = period_steps_sea::page_filtered(txn, &filter, 0, 2).await?;
            let third = period_steps_sea::page_filtered(txn, &filter, 2, 2).await?;
            let beyond = period_steps_sea::page_filtered(txn, &filter, 3, 2).await?;

            // Same timestamp everywhere: ties fall back to id, newest first.
            assert_eq!(first.iter().map(|s| s.step_index).collect::<Vec<_>>(), vec![4, 3]);
            assert_eq!(third.iter().map(|s| s.step_index).collect::<Vec<_>>(), vec![0]);
            assert!(beyond.is_empty());
            Ok::<_, AppError>(())
        })
    })
    .await
}
