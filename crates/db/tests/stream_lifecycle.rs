//! Lifecycle tests for the stream job repositories: claims, rerun reset,
//! and terminal transitions.

use chrono::Utc;
use sqlx::PgPool;
use studio_core::correlation::correlation_id;
use studio_core::status::JobStatus;
use studio_core::types::DbId;
use studio_db::models::{CreateStreamJob, NewMacroResult, StreamJob};
use studio_db::repositories::{ResultRepo, StreamAlgorithmRepo, StreamJobRepo, UserRepo};

fn job_input(name: &str) -> CreateStreamJob {
    CreateStreamJob {
        name: name.to_string(),
        description: Some("test job".to_string()),
        dataset: "demo-small".to_string(),
        top_k: 10,
        metrics: vec!["Precision".to_string(), "Recall".to_string()],
        split_start: Utc::now(),
        window_size_secs: 3_600,
    }
}

async fn user_and_job(pool: &PgPool, name: &str) -> (DbId, StreamJob) {
    let user = UserRepo::create(pool, name, None, "hash").await.unwrap();
    let job = StreamJobRepo::create(pool, user.id, &job_input(name))
        .await
        .unwrap();
    (user.id, job)
}

async fn attach(pool: &PgPool, job_id: DbId, name: &str) -> DbId {
    StreamAlgorithmRepo::add(
        pool,
        job_id,
        name,
        correlation_id(job_id, name),
        &serde_json::json!({}),
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fresh_job_has_no_lifecycle_timestamps(pool: PgPool) {
    let (_, job) = user_and_job(&pool, "fresh").await;

    assert_eq!(job.started_at, None);
    assert_eq!(job.completed_at, None);
    assert_eq!(job.error_message, None);
    assert_eq!(job.status(false), JobStatus::Created);
    assert_eq!(job.status(true), JobStatus::Ready);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_run_requires_an_algorithm(pool: PgPool) {
    let (_, job) = user_and_job(&pool, "no-algos").await;

    assert!(!StreamJobRepo::claim_run(&pool, job.id).await.unwrap());

    attach(&pool, job.id, "Popularity").await;
    assert!(StreamJobRepo::claim_run(&pool, job.id).await.unwrap());

    let job = StreamJobRepo::find_by_id_unscoped(&pool, job.id)
        .await
        .unwrap()
        .unwrap();
    assert!(job.started_at.is_some());
    assert_eq!(job.status(true), JobStatus::Running);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_run_has_a_single_winner(pool: PgPool) {
    let (_, job) = user_and_job(&pool, "raced").await;
    attach(&pool, job.id, "Popularity").await;

    assert!(StreamJobRepo::claim_run(&pool, job.id).await.unwrap());
    // started_at is set now, so the second claim loses.
    assert!(!StreamJobRepo::claim_run(&pool, job.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn terminal_transitions_drive_derived_status(pool: PgPool) {
    let (_, job) = user_and_job(&pool, "terminal").await;
    attach(&pool, job.id, "Popularity").await;
    StreamJobRepo::claim_run(&pool, job.id).await.unwrap();

    StreamJobRepo::mark_completed(&pool, job.id).await.unwrap();
    let done = StreamJobRepo::find_by_id_unscoped(&pool, job.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(done.status(true), JobStatus::Completed);

    StreamJobRepo::mark_failed(&pool, job.id, "pipeline exploded")
        .await
        .unwrap();
    let failed = StreamJobRepo::find_by_id_unscoped(&pool, job.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(failed.status(true), JobStatus::Failed);
    assert_eq!(failed.error_message.as_deref(), Some("pipeline exploded"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_rerun_requires_a_finished_job(pool: PgPool) {
    let (_, job) = user_and_job(&pool, "not-finished").await;
    attach(&pool, job.id, "Popularity").await;

    // Neither fresh nor running jobs can be rerun.
    assert!(!StreamJobRepo::claim_rerun(&pool, job.id).await.unwrap());
    StreamJobRepo::claim_run(&pool, job.id).await.unwrap();
    assert!(!StreamJobRepo::claim_rerun(&pool, job.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_rerun_resets_state_and_deletes_results(pool: PgPool) {
    let (_, job) = user_and_job(&pool, "rerunner").await;
    let algo_id = attach(&pool, job.id, "Popularity").await;
    StreamJobRepo::claim_run(&pool, job.id).await.unwrap();
    StreamJobRepo::mark_failed(&pool, job.id, "first attempt failed")
        .await
        .unwrap();

    ResultRepo::insert_macro(
        &pool,
        job.id,
        &[NewMacroResult {
            stream_algorithm_id: algo_id,
            metric: "Precision".into(),
            macro_score: 0.1,
            num_windows: 2,
        }],
    )
    .await
    .unwrap();

    assert!(StreamJobRepo::claim_rerun(&pool, job.id).await.unwrap());

    let job = StreamJobRepo::find_by_id_unscoped(&pool, job.id)
        .await
        .unwrap()
        .unwrap();
    // Fresh claim: running again, terminal state and old error gone.
    assert!(job.started_at.is_some());
    assert_eq!(job.completed_at, None);
    assert_eq!(job.error_message, None);
    assert_eq!(job.status(true), JobStatus::Running);

    assert!(ResultRepo::macro_for_job(&pool, job.id).await.unwrap().is_empty());
    // The algorithm attachment survives the reset.
    assert_eq!(
        StreamAlgorithmRepo::count_for_job(&pool, job.id).await.unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn job_names_are_unique(pool: PgPool) {
    let (user_id, _) = user_and_job(&pool, "unique-name").await;

    let err = StreamJobRepo::create(&pool, user_id, &job_input("unique-name"))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db) => {
            assert_eq!(db.constraint(), Some("uq_stream_jobs_name"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_job_cascades(pool: PgPool) {
    let (user_id, job) = user_and_job(&pool, "cascade").await;
    let algo_id = attach(&pool, job.id, "Popularity").await;
    ResultRepo::insert_macro(
        &pool,
        job.id,
        &[NewMacroResult {
            stream_algorithm_id: algo_id,
            metric: "Precision".into(),
            macro_score: 0.5,
            num_windows: 1,
        }],
    )
    .await
    .unwrap();

    assert!(StreamJobRepo::delete(&pool, user_id, job.id).await.unwrap());

    assert!(StreamJobRepo::find_by_id_unscoped(&pool, job.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        StreamAlgorithmRepo::count_for_job(&pool, job.id).await.unwrap(),
        0
    );
    assert!(ResultRepo::macro_for_job(&pool, job.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_available_excludes_dispatched_jobs(pool: PgPool) {
    let (user_id, first) = user_and_job(&pool, "available-1").await;
    let second = StreamJobRepo::create(&pool, user_id, &job_input("available-2"))
        .await
        .unwrap();
    attach(&pool, first.id, "Popularity").await;
    StreamJobRepo::claim_run(&pool, first.id).await.unwrap();

    let available = StreamJobRepo::list_available(&pool, user_id).await.unwrap();
    let ids: Vec<DbId> = available.iter().map(|j| j.id).collect();
    assert_eq!(ids, vec![second.id]);
}
