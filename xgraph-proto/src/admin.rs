//! AdminService messages: identity, version and memory statistics

use crate::errors::ErrorMessage;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IdentifierRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IdentifierResponse {
    #[prost(uint64, tag = "1")]
    pub server_unique_identifier: u64,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VersionRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VersionResponse {
    #[prost(string, tag = "1")]
    pub version: String,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MaxUserMemorySizeRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MaxUserMemorySizeResponse {
    #[prost(uint64, tag = "1")]
    pub pool_size: u64,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FreeUserMemorySizeRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FreeUserMemorySizeResponse {
    #[prost(uint64, tag = "1")]
    pub free_memory_size: u64,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StatReportRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StatReportResponse {
    #[prost(string, tag = "1")]
    pub stat_report_json: String,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}
