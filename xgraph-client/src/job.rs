//! Job handles and status

use crate::error::{ClientError, ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use xgraph_proto::{self as proto, JobStatusEnum};

/// Default query optimization level (WHERE-clause optimization)
pub const DEFAULT_OPT_LEVEL: u32 = 2;

/// Longest query text accepted by the server
pub const MAX_QUERY_LENGTH: usize = 209_000;

/// Server-side job status.
///
/// `Completed`, `Failed` and `Canceled` are terminal: once observed, the
/// status never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobStatus {
    Scheduled,
    Started,
    Running,
    TransactionNotStarted,
    TransactionCommitting,
    Completed,
    Failed,
    Canceled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed | JobStatus::Canceled)
    }

    /// Statuses for which the server accepts a cancel request
    pub fn is_cancelable(&self) -> bool {
        matches!(self, JobStatus::Scheduled | JobStatus::Running)
    }

    pub fn from_proto(status: JobStatusEnum) -> Self {
        match status {
            JobStatusEnum::Scheduled => JobStatus::Scheduled,
            JobStatusEnum::Started => JobStatus::Started,
            JobStatusEnum::Running => JobStatus::Running,
            JobStatusEnum::Completed => JobStatus::Completed,
            JobStatusEnum::Failed => JobStatus::Failed,
            JobStatusEnum::Canceled => JobStatus::Canceled,
            JobStatusEnum::TransactionNotStarted => JobStatus::TransactionNotStarted,
            JobStatusEnum::TransactionCommitting => JobStatus::TransactionCommitting,
        }
    }

    pub fn to_proto(&self) -> JobStatusEnum {
        match self {
            JobStatus::Scheduled => JobStatusEnum::Scheduled,
            JobStatus::Started => JobStatusEnum::Started,
            JobStatus::Running => JobStatusEnum::Running,
            JobStatus::Completed => JobStatusEnum::Completed,
            JobStatus::Failed => JobStatusEnum::Failed,
            JobStatus::Canceled => JobStatusEnum::Canceled,
            JobStatus::TransactionNotStarted => JobStatusEnum::TransactionNotStarted,
            JobStatus::TransactionCommitting => JobStatusEnum::TransactionCommitting,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::Started => "started",
            JobStatus::Running => "running",
            JobStatus::TransactionNotStarted => "transactionNotStarted",
            JobStatus::TransactionCommitting => "transactionCommitting",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a job as last reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub status: JobStatus,
    pub error: Option<String>,
    pub error_class: Option<ErrorKind>,
    pub trace: Option<String>,
    /// Milliseconds since the epoch
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl Job {
    pub(crate) fn from_proto(data: proto::JobStatus) -> Result<Self> {
        let status = JobStatusEnum::try_from(data.status)
            .map(JobStatus::from_proto)
            .map_err(|_| {
                ClientError::InvalidPayload(format!(
                    "Unknown status {} for job {}",
                    data.status, data.job_id
                ))
            })?;

        let first_error = data.error.first();
        let trace = first_error
            .filter(|e| !e.detail.is_empty())
            .map(|e| e.detail.join("\n"));

        Ok(Self {
            id: data.job_id,
            status,
            error: first_error.map(|e| e.error_detail_message.clone()),
            error_class: first_error.map(|e| ErrorKind::from_wire(e.code)),
            trace,
            start_time: Some(data.start_time).filter(|t| *t > 0),
            end_time: Some(data.end_time).filter(|t| *t > 0),
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The typed error describing this job's failure.
    pub fn failure(&self) -> ClientError {
        ClientError::JobFailed {
            job_id: self.id,
            kind: self.error_class.unwrap_or(ErrorKind::Generic),
            message: self.error.clone().unwrap_or_default(),
            trace: self.trace.clone(),
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id:{}, status:{}", self.id, self.status)?;
        if let Some(error) = &self.error {
            write!(f, ", error:{}", error)?;
        }
        Ok(())
    }
}

/// A job given either as a handle or by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobRef(pub i64);

impl JobRef {
    pub fn id(&self) -> i64 {
        self.0
    }
}

impl From<i64> for JobRef {
    fn from(id: i64) -> Self {
        JobRef(id)
    }
}

impl From<&Job> for JobRef {
    fn from(job: &Job) -> Self {
        JobRef(job.id)
    }
}

impl From<Job> for JobRef {
    fn from(job: Job) -> Self {
        JobRef(job.id)
    }
}

/// Reject optimization levels outside {0, 1, 2}.
pub fn validate_opt_level(level: u32) -> Result<u32> {
    match level {
        0..=2 => Ok(level),
        _ => Err(ClientError::Value(format!(
            "Invalid optimization level {}: expected 0, 1 or 2",
            level
        ))),
    }
}

/// Reject query text the server would refuse outright.
pub fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(ClientError::Value("Query text must not be empty".to_string()));
    }

    let length = query.chars().count();
    if length > MAX_QUERY_LENGTH {
        return Err(ClientError::Value(format!(
            "Query text is {} characters long, the limit is {}",
            length, MAX_QUERY_LENGTH
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xgraph_proto::{ErrorCodeEnum, ErrorMessage};

    #[test]
    fn test_terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Canceled.is_terminal());
        assert!(!JobStatus::Scheduled.is_terminal());
        assert!(!JobStatus::TransactionCommitting.is_terminal());
    }

    #[test]
    fn test_cancelable_statuses() {
        assert!(JobStatus::Scheduled.is_cancelable());
        assert!(JobStatus::Running.is_cancelable());
        assert!(!JobStatus::Started.is_cancelable());
        assert!(!JobStatus::Completed.is_cancelable());
    }

    #[test]
    fn test_job_from_proto_with_error() {
        let data = proto::JobStatus {
            job_id: 17,
            status: JobStatusEnum::Failed as i32,
            start_time: 1_000,
            end_time: 0,
            error: vec![ErrorMessage {
                code: ErrorCodeEnum::SyntaxError as i32,
                error_detail_message: "Unexpected RETURN".to_string(),
                detail: vec!["tql.cpp:42".to_string()],
            }],
        };

        let job = Job::from_proto(data).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_class, Some(ErrorKind::Syntax));
        assert_eq!(job.start_time, Some(1_000));
        assert_eq!(job.end_time, None);

        let err = job.failure();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.trace(), Some("tql.cpp:42"));
        assert_eq!(err.to_string(), "Failed job. id=17 msg=\"Unexpected RETURN\"");
    }

    #[test]
    fn test_unknown_status_rejected() {
        let data = proto::JobStatus {
            job_id: 1,
            status: 77,
            ..Default::default()
        };
        assert!(Job::from_proto(data).is_err());
    }

    #[test]
    fn test_opt_level_validation() {
        assert_eq!(validate_opt_level(0).unwrap(), 0);
        assert_eq!(validate_opt_level(2).unwrap(), 2);
        assert!(matches!(validate_opt_level(3), Err(ClientError::Value(_))));
    }

    #[test]
    fn test_query_validation() {
        assert!(validate_query("MATCH (a) RETURN a.id INTO R").is_ok());
        assert!(validate_query("   ").is_err());
        assert!(validate_query(&"x".repeat(MAX_QUERY_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_job_display() {
        let job = Job {
            id: 6,
            status: JobStatus::Completed,
            error: None,
            error_class: None,
            trace: None,
            start_time: None,
            end_time: None,
        };
        assert_eq!(job.to_string(), "id:6, status:completed");
    }
}
