//! Job polling, timeout and cancellation
//!
//! `wait_for_job` never returns a job that might still be running. Past the
//! deadline it sends one cancel request as soon as the job is cancelable and
//! keeps polling until a terminal status shows up.

use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::job::{Job, JobRef, JobStatus};
use crate::translate::check_response;
use crate::transport::Transport;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};
use xgraph_proto as proto;

/// First sleep between two status polls
pub const POLL_INTERVAL_START: Duration = Duration::from_millis(100);
/// Growth of the sleep after every poll
pub const POLL_INTERVAL_STEP: Duration = Duration::from_millis(100);
/// Upper bound of the sleep between two polls
pub const POLL_INTERVAL_MAX: Duration = Duration::from_secs(10);

/// Linear poll backoff: 100ms, 200ms, 300ms, ... capped at 10s.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    current: Duration,
}

impl PollBackoff {
    pub fn new() -> Self {
        Self {
            current: POLL_INTERVAL_START,
        }
    }

    /// Interval to sleep now; advances the schedule.
    pub fn next_interval(&mut self) -> Duration {
        let interval = self.current;
        self.current = (self.current + POLL_INTERVAL_STEP).min(POLL_INTERVAL_MAX);
        interval
    }
}

impl Default for PollBackoff {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Connection<T> {
    /// Poll a job until it reaches a terminal status.
    ///
    /// With a `timeout`, the deadline is fixed when the call starts. Once it
    /// has passed, a single cancel request is sent, on the first poll that
    /// finds the job cancelable. Polling continues until the server reports
    /// the job as completed, failed or canceled.
    ///
    /// A failed job is returned as [`ClientError::JobFailed`], never as an
    /// `Ok` value.
    pub async fn wait_for_job(
        &mut self,
        job: impl Into<JobRef>,
        timeout: Option<Duration>,
    ) -> Result<Job> {
        let job_id = Into::<JobRef>::into(job).id();
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let mut backoff = PollBackoff::new();
        let mut cancel_sent = false;

        loop {
            let current = self.fetch_job(job_id).await?;
            if current.is_terminal() {
                break;
            }

            // Past the deadline, retry on every poll until one cancel request
            // went out or the attempt failed.
            if let Some(deadline) = deadline {
                if !cancel_sent && Instant::now() >= deadline {
                    match self.cancel_job(job_id).await {
                        Ok(true) => {
                            cancel_sent = true;
                            info!(job_id, "Job timed out, cancel sent");
                        }
                        Ok(false) => {
                            debug!(job_id, status = %current.status, "Not cancelable yet");
                        }
                        Err(e) => {
                            cancel_sent = true;
                            warn!(job_id, error = %e, "Failed to cancel timed out job");
                        }
                    }
                }
            }

            let interval = backoff.next_interval();
            debug!(job_id, status = %current.status, ?interval, "Job not finished");
            sleep(interval).await;
        }

        let job = self.fetch_job(job_id).await?;
        if job.status == JobStatus::Failed {
            warn!(job_id, error = ?job.error, "Job failed");
            return Err(job.failure());
        }

        info!(job_id, status = %job.status, "Job finished");
        Ok(job)
    }

    /// Ask the server to cancel a job.
    ///
    /// Returns `true` if a cancel request was sent. A job that is not in a
    /// cancelable state, or unknown to the server, is left alone and `false`
    /// is returned.
    pub async fn cancel_job(&mut self, job: impl Into<JobRef>) -> Result<bool> {
        let job_id = Into::<JobRef>::into(job).id();
        let current = match self.get_jobs(Some(&[job_id][..])).await?.into_iter().next() {
            Some(current) => current,
            None => return Ok(false),
        };

        if !current.status.is_cancelable() {
            debug!(job_id, status = %current.status, "Job not cancelable");
            return Ok(false);
        }

        let request = self.session.stamp(proto::CancelJobsRequest {
            expected_server_id: 0,
            job_id: vec![job_id],
        });
        check_response(self.transport.cancel_jobs(request).await?)?;

        info!(job_id, "Cancel requested");
        Ok(true)
    }

    /// Snapshot of job states on the server.
    ///
    /// With `None`, every job the server knows about at the time of the call.
    pub async fn get_jobs(&mut self, job_ids: Option<&[i64]>) -> Result<Vec<Job>> {
        let request = self.session.stamp(proto::GetJobsRequest {
            expected_server_id: 0,
            job_id: job_ids.map(<[i64]>::to_vec).unwrap_or_default(),
        });

        let response = check_response(self.transport.get_jobs(request).await?)?;
        response.job_status.into_iter().map(Job::from_proto).collect()
    }

    /// Current server state of one job.
    pub async fn get_job(&mut self, job: impl Into<JobRef>) -> Result<Job> {
        self.fetch_job(Into::<JobRef>::into(job).id()).await
    }

    async fn fetch_job(&mut self, job_id: i64) -> Result<Job> {
        self.get_jobs(Some(&[job_id][..]))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClientError::InvalidPayload(format!("Server returned no status for job {}", job_id))
            })
    }
}
