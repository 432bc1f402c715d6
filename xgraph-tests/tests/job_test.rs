/// Job scheduling and monitoring tests
///
/// Run on tokio's paused clock, so sleeps between polls complete instantly
/// while the observed intervals stay exact.

use std::time::Duration;
use xgraph_client::{ClientError, ErrorKind, JobRef, JobStatus, DEFAULT_OPT_LEVEL, MAX_QUERY_LENGTH};
use xgraph_proto::{ErrorCodeEnum, JobStatusEnum};
use xgraph_test_utils::*;

const QUERY: &str = "MATCH (a:Person)-[e:WorksAt]->(b:Company) RETURN a.id, b.cid INTO Result1";

#[tokio::test(start_paused = true)]
async fn test_poll_backoff_is_linear() {
    init_tracing();
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    server.add_job(
        7,
        vec![
            JobStatusEnum::Scheduled,
            JobStatusEnum::Running,
            JobStatusEnum::Running,
            JobStatusEnum::Completed,
        ],
    );

    let job = conn.wait_for_job(JobRef(7), None).await.unwrap();
    assert_eq!(job.id, 7);
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.end_time.is_some());

    // Four polls in the loop, then the authoritative final fetch
    let times = server.poll_times();
    assert_eq!(times.len(), 5);

    let gaps: Vec<Duration> = times.windows(2).map(|w| w[1] - w[0]).collect();
    assert_eq!(
        gaps,
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(300),
            Duration::ZERO,
        ]
    );
    assert_eq!(server.calls(CANCEL_JOBS), 0);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_cancels_once_then_keeps_polling() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    server.add_job(9, vec![JobStatusEnum::Scheduled, JobStatusEnum::Running]);
    server.on_cancel(
        9,
        vec![
            JobStatusEnum::Running,
            JobStatusEnum::Running,
            JobStatusEnum::Running,
            JobStatusEnum::Canceled,
        ],
    );

    let started = tokio::time::Instant::now();
    let job = conn
        .wait_for_job(JobRef(9), Some(Duration::from_secs(1)))
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Canceled);
    assert_eq!(server.calls(CANCEL_JOBS), 1);
    assert_eq!(server.canceled(), vec![9]);

    // The monitor returned only after the cancel took effect, well past the
    // deadline
    assert!(started.elapsed() > Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_cancel_is_not_repeated() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    // The server ignores the cancel for a long while
    let mut still_running = vec![JobStatusEnum::Running; 30];
    still_running.push(JobStatusEnum::Completed);
    server.add_job(12, vec![JobStatusEnum::Running]);
    server.on_cancel(12, still_running);

    let job = conn
        .wait_for_job(JobRef(12), Some(Duration::from_millis(250)))
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(server.calls(CANCEL_JOBS), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_cancel_waits_for_cancelable_status() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    // Still `started` when the deadline passes, cancelable only later
    let mut statuses = vec![JobStatusEnum::Started; 6];
    statuses.extend(vec![JobStatusEnum::Running; 40]);
    statuses.push(JobStatusEnum::Completed);
    server.add_job(21, statuses);

    let job = conn
        .wait_for_job(JobRef(21), Some(Duration::from_millis(250)))
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Canceled);
    assert_eq!(server.calls(CANCEL_JOBS), 1);
    assert_eq!(server.canceled(), vec![21]);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_on_uncancelable_job_keeps_polling() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    server.add_job(
        22,
        vec![
            JobStatusEnum::Running,
            JobStatusEnum::TransactionCommitting,
            JobStatusEnum::TransactionCommitting,
            JobStatusEnum::TransactionCommitting,
            JobStatusEnum::TransactionCommitting,
            JobStatusEnum::TransactionCommitting,
            JobStatusEnum::Completed,
        ],
    );

    let job = conn
        .wait_for_job(JobRef(22), Some(Duration::from_millis(250)))
        .await
        .unwrap();

    // Never cancelable past the deadline, so no cancel went out
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(server.calls(CANCEL_JOBS), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_job_raises() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    server.add_job(11, vec![JobStatusEnum::Running, JobStatusEnum::Failed]);
    server.set_job_error(
        11,
        ErrorCodeEnum::ArithmeticError,
        "Division by zero",
        &["eval.cpp:120", "job.cpp:48"],
    );

    let err = conn.wait_for_job(JobRef(11), None).await.unwrap_err();
    match &err {
        ClientError::JobFailed {
            job_id,
            kind,
            message,
            trace,
        } => {
            assert_eq!(*job_id, 11);
            assert_eq!(*kind, ErrorKind::Arithmetic);
            assert_eq!(message, "Division by zero");
            assert_eq!(trace.as_deref(), Some("eval.cpp:120\njob.cpp:48"));
        }
        other => panic!("Expected a job failure, got {:?}", other),
    }
    assert_eq!(err.to_string(), "Failed job. id=11 msg=\"Division by zero\"");
}

#[tokio::test(start_paused = true)]
async fn test_failed_job_is_still_visible_via_get_job() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    server.add_job(13, vec![JobStatusEnum::Failed]);
    server.set_job_error(13, ErrorCodeEnum::ValueError, "Bad date", &[]);

    let job = conn.get_job(JobRef(13)).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error.as_deref(), Some("Bad date"));
    assert_eq!(job.error_class, Some(ErrorKind::Value));
    assert_eq!(job.trace, None);
}

#[tokio::test]
async fn test_cancel_completed_job_sends_nothing() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    server.add_job(3, vec![JobStatusEnum::Completed]);

    assert!(!conn.cancel_job(JobRef(3)).await.unwrap());
    assert_eq!(server.calls(CANCEL_JOBS), 0);
}

#[tokio::test]
async fn test_cancel_running_job() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    server.add_job(4, vec![JobStatusEnum::Running]);

    assert!(conn.cancel_job(JobRef(4)).await.unwrap());
    assert_eq!(server.calls(CANCEL_JOBS), 1);
    assert_eq!(conn.get_job(JobRef(4)).await.unwrap().status, JobStatus::Canceled);

    // A second cancel finds the job terminal
    assert!(!conn.cancel_job(JobRef(4)).await.unwrap());
    assert_eq!(server.calls(CANCEL_JOBS), 1);
}

#[tokio::test]
async fn test_get_jobs() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    server.add_job(1, vec![JobStatusEnum::Completed]);
    server.add_job(2, vec![JobStatusEnum::Running]);
    server.add_job(5, vec![JobStatusEnum::Scheduled]);

    let all = conn.get_jobs(None).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|j| j.id).collect();
    assert_eq!(ids, vec![1, 2, 5]);

    let some = conn.get_jobs(Some(&[2, 5][..])).await.unwrap();
    let statuses: Vec<JobStatus> = some.iter().map(|j| j.status).collect();
    assert_eq!(statuses, vec![JobStatus::Running, JobStatus::Scheduled]);

    let err = conn.get_job(JobRef(404)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[tokio::test]
async fn test_schedule_job() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    let job = conn.schedule_job(QUERY, None).await.unwrap();
    assert_eq!(job.status, JobStatus::Scheduled);

    conn.schedule_job(QUERY, Some(0)).await.unwrap();
    conn.set_optimization_level(1).unwrap();
    conn.schedule_job(QUERY, None).await.unwrap();

    assert_eq!(
        server.scheduled(),
        vec![
            (QUERY.to_string(), DEFAULT_OPT_LEVEL as i32),
            (QUERY.to_string(), 0),
            (QUERY.to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn test_invalid_job_arguments_fail_without_rpc() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    let err = conn.schedule_job(QUERY, Some(3)).await.unwrap_err();
    assert!(matches!(err, ClientError::Value(_)));

    let err = conn.schedule_job("", None).await.unwrap_err();
    assert!(matches!(err, ClientError::Value(_)));

    let huge = "x".repeat(MAX_QUERY_LENGTH + 1);
    let err = conn.run_job(&huge, None, None).await.unwrap_err();
    assert!(matches!(err, ClientError::Value(_)));

    assert!(conn.set_optimization_level(7).is_err());
    assert_eq!(conn.optimization_level(), DEFAULT_OPT_LEVEL);

    assert_eq!(server.job_calls(), 0);
}

#[tokio::test]
async fn test_syntax_error_on_schedule() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    server.inject_error(
        SCHEDULE_JOBS,
        ErrorCodeEnum::SyntaxError,
        "Unexpected token RETRUN",
        &["line 1, column 12"],
    );

    let err = conn.run_job("MATCH (a) RETRUN a", None, None).await.unwrap_err();
    assert!(matches!(err, ClientError::Server { kind: ErrorKind::Syntax, .. }));
    assert_eq!(err.trace(), Some("line 1, column 12"));
    assert_eq!(server.calls(GET_JOBS), 0);
}

#[tokio::test(start_paused = true)]
async fn test_run_job() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    server.script_next_job(vec![
        JobStatusEnum::Scheduled,
        JobStatusEnum::Started,
        JobStatusEnum::Running,
        JobStatusEnum::TransactionCommitting,
        JobStatusEnum::Completed,
    ]);

    let job = conn.run_job(QUERY, None, None).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.to_string(), format!("id:{}, status:completed", job.id));
    assert_eq!(server.calls(SCHEDULE_JOBS), 1);
}

#[tokio::test(start_paused = true)]
async fn test_run_job_failure_surfaces_once() {
    let server = MockServer::new();
    let mut conn = server.connect().await.unwrap();

    server.script_next_job(vec![
        JobStatusEnum::Scheduled,
        JobStatusEnum::Running,
        JobStatusEnum::Failed,
    ]);

    let job = conn.schedule_job(QUERY, None).await.unwrap();
    server.set_job_error(job.id, ErrorCodeEnum::ServerMemoryError, "Out of memory", &[]);

    let err = conn.wait_for_job(&job, None).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::JobFailed {
            kind: ErrorKind::ServerMemory,
            ..
        }
    ));
}
