//! Job submission
use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::job::{validate_opt_level, validate_query, Job};
use crate::translate::check_response;
use crate::transport::Transport;
use std::time::Duration;
use tracing::info;
use xgraph_proto as proto;

impl<T: Transport> Connection<T> {
    /// Schedule a query as a job and return immediately.
    ///
    /// `optlevel` defaults to the connection's current optimization level.
    /// The returned job is in the `scheduled` state.
    pub async fn schedule_job(&mut self, query: &str, optlevel: Option<u32>) -> Result<Job> {
        validate_query(query)?;
        let optlevel = match optlevel {
            Some(level) => validate_opt_level(level)?,
            None => self.opt_level,
        };

        let request = self.session.stamp(proto::ScheduleJobsCypherRequest {
            expected_server_id: 0,
            cypher_query: vec![query.to_string()],
            optimization_level: optlevel as i32,
        });

        let response = check_response(self.transport.schedule_jobs_cypher(request).await?)?;
        let data = response.job_status.into_iter().next().ok_or_else(|| {
            ClientError::InvalidPayload("Server scheduled no job for the query".to_string())
        })?;

        let job = Job::from_proto(data)?;
        info!(job_id = job.id, optlevel, "Scheduled job");
        Ok(job)
    }

    /// Schedule a query and wait for it to finish.
    ///
    /// Exactly `wait_for_job(schedule_job(query, optlevel), timeout)`.
    pub async fn run_job(
        &mut self,
        query: &str,
        optlevel: Option<u32>,
        timeout: Option<Duration>,
    ) -> Result<Job> {
        let job = self.schedule_job(query, optlevel).await?;
        self.wait_for_job(&job, timeout).await
    }
}
