//! JobService messages: schedule, inspect and cancel query jobs

use crate::errors::ErrorMessage;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum JobStatusEnum {
    Scheduled = 0,
    Started = 1,
    Running = 2,
    Completed = 3,
    Failed = 4,
    Canceled = 5,
    TransactionNotStarted = 6,
    TransactionCommitting = 7,
}

impl JobStatusEnum {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            JobStatusEnum::Scheduled => "SCHEDULED",
            JobStatusEnum::Started => "STARTED",
            JobStatusEnum::Running => "RUNNING",
            JobStatusEnum::Completed => "COMPLETED",
            JobStatusEnum::Failed => "FAILED",
            JobStatusEnum::Canceled => "CANCELED",
            JobStatusEnum::TransactionNotStarted => "TRANSACTIONNOTSTARTED",
            JobStatusEnum::TransactionCommitting => "TRANSACTIONCOMMITTING",
        }
    }
}

/// Server-side state of one job
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct JobStatus {
    #[prost(int64, tag = "1")]
    pub job_id: i64,
    #[prost(enumeration = "JobStatusEnum", tag = "2")]
    pub status: i32,
    /// Milliseconds since the epoch, zero when not yet started
    #[prost(int64, tag = "3")]
    pub start_time: i64,
    /// Milliseconds since the epoch, zero while the job is live
    #[prost(int64, tag = "4")]
    pub end_time: i64,
    #[prost(message, repeated, tag = "5")]
    pub error: Vec<ErrorMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ScheduleJobsCypherRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
    #[prost(string, repeated, tag = "2")]
    pub cypher_query: Vec<String>,
    #[prost(int32, tag = "3")]
    pub optimization_level: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ScheduleJobsResponse {
    #[prost(message, repeated, tag = "1")]
    pub job_status: Vec<JobStatus>,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}

/// An empty `job_id` list asks for every job known to the server.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetJobsRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
    #[prost(int64, repeated, tag = "2")]
    pub job_id: Vec<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetJobsResponse {
    #[prost(message, repeated, tag = "1")]
    pub job_status: Vec<JobStatus>,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CancelJobsRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
    #[prost(int64, repeated, tag = "2")]
    pub job_id: Vec<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CancelJobsResponse {
    #[prost(message, repeated, tag = "1")]
    pub job_status: Vec<JobStatus>,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}
