//! Integration tests for the evaluation orchestrator, driven directly so
//! outcomes are observed deterministically instead of polled over HTTP.

mod common;

use chrono::DateTime;
use sqlx::PgPool;
use studio_api::engine::evaluation::run_evaluation;
use studio_core::correlation::correlation_id;
use studio_core::status::JobStatus;
use studio_db::models::{CreateStreamJob, StreamJob};
use studio_db::repositories::{ResultRepo, StreamAlgorithmRepo, StreamJobRepo, UserRepo};

fn job_input(name: &str) -> CreateStreamJob {
    CreateStreamJob {
        name: name.to_string(),
        description: None,
        dataset: "demo-small".to_string(),
        top_k: 5,
        metrics: vec!["Precision".to_string()],
        split_start: DateTime::from_timestamp(1_300_000, 0).unwrap(),
        window_size_secs: 100_000,
    }
}

async fn claimed_job(pool: &PgPool, name: &str, algorithms: &[&str]) -> StreamJob {
    let user = UserRepo::create(pool, name, None, "irrelevant-hash")
        .await
        .unwrap();
    let job = StreamJobRepo::create(pool, user.id, &job_input(name))
        .await
        .unwrap();
    for algorithm in algorithms {
        StreamAlgorithmRepo::add(
            pool,
            job.id,
            algorithm,
            correlation_id(job.id, algorithm),
            &serde_json::json!({}),
        )
        .await
        .unwrap();
    }
    assert!(StreamJobRepo::claim_run(pool, job.id).await.unwrap());
    job
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn successful_run_persists_all_categories_and_completes(pool: PgPool) {
    let job = claimed_job(&pool, "engine-success", &["Popularity"]).await;
    let state = common::test_state(pool.clone());

    run_evaluation(state, job.id).await;

    let job = StreamJobRepo::find_by_id_unscoped(&pool, job.id)
        .await
        .unwrap()
        .unwrap();
    assert!(job.completed_at.is_some());
    assert_eq!(job.error_message, None);
    assert_eq!(job.status(true), JobStatus::Completed);

    // One algorithm, one metric: 1 macro row, 1 micro row, 3 windows.
    let macro_rows = ResultRepo::macro_for_job(&pool, job.id).await.unwrap();
    assert_eq!(macro_rows.len(), 1);
    assert_eq!(macro_rows[0].algorithm, "Popularity");
    assert_eq!(macro_rows[0].num_windows, 3);

    assert_eq!(ResultRepo::micro_for_job(&pool, job.id).await.unwrap().len(), 1);
    assert_eq!(ResultRepo::window_for_job(&pool, job.id).await.unwrap().len(), 3);
    assert!(!ResultRepo::user_for_job(&pool, job.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_algorithm_is_skipped_not_fatal(pool: PgPool) {
    // One resolvable algorithm plus one the registry does not know;
    // attaching the latter directly bypasses the API-level validation,
    // which is exactly what a stale catalog entry would look like. The
    // run completes with the resolvable algorithm's results.
    let job = claimed_job(&pool, "engine-stale-entry", &["Popularity", "SVD"]).await;
    let state = common::test_state(pool.clone());

    run_evaluation(state, job.id).await;

    let job = StreamJobRepo::find_by_id_unscoped(&pool, job.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status(true), JobStatus::Completed);
    assert_eq!(job.error_message, None);

    let macro_rows = ResultRepo::macro_for_job(&pool, job.id).await.unwrap();
    assert_eq!(macro_rows.len(), 1);
    assert_eq!(macro_rows[0].algorithm, "Popularity");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn run_with_nothing_resolvable_fails(pool: PgPool) {
    // Every attached algorithm is unknown, so after skipping them all
    // there is nothing left to evaluate and the run goes terminal-failed.
    let job = claimed_job(&pool, "engine-failure", &["SVD"]).await;
    let state = common::test_state(pool.clone());

    run_evaluation(state, job.id).await;

    let job = StreamJobRepo::find_by_id_unscoped(&pool, job.id)
        .await
        .unwrap()
        .unwrap();
    assert!(job.completed_at.is_some());
    let message = job.error_message.clone().unwrap();
    assert!(message.contains("no algorithms"), "got: {message}");
    assert_eq!(job.status(true), JobStatus::Failed);

    assert!(ResultRepo::macro_for_job(&pool, job.id).await.unwrap().is_empty());
    assert!(ResultRepo::user_for_job(&pool, job.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rerun_after_success_replaces_results(pool: PgPool) {
    let job = claimed_job(&pool, "engine-rerun", &["Popularity"]).await;
    let state = common::test_state(pool.clone());
    run_evaluation(state.clone(), job.id).await;

    let first = ResultRepo::macro_for_job(&pool, job.id).await.unwrap();
    assert_eq!(first.len(), 1);

    // Claim for rerun: terminal state cleared, results wiped.
    assert!(StreamJobRepo::claim_rerun(&pool, job.id).await.unwrap());
    assert!(ResultRepo::macro_for_job(&pool, job.id).await.unwrap().is_empty());

    run_evaluation(state, job.id).await;

    let job = StreamJobRepo::find_by_id_unscoped(&pool, job.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status(true), JobStatus::Completed);
    assert_eq!(ResultRepo::macro_for_job(&pool, job.id).await.unwrap().len(), 1);
}
