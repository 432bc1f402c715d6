//! GraphTypesService messages: frame catalog

use crate::errors::ErrorMessage;
use crate::schema::Schema;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VertexType {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub schema: Option<Schema>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EdgeType {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub schema: Option<Schema>,
    #[prost(string, tag = "3")]
    pub source_vertex: String,
    #[prost(string, tag = "4")]
    pub target_vertex: String,
    #[prost(string, tag = "5")]
    pub source_key: String,
    #[prost(string, tag = "6")]
    pub target_key: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TableType {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub schema: Option<Schema>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateVertexFrameRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
    #[prost(message, optional, tag = "2")]
    pub vertex_type: Option<VertexType>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateVertexFrameResponse {
    #[prost(message, repeated, tag = "1")]
    pub vertex_type: Vec<VertexType>,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateEdgeFrameRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
    #[prost(message, optional, tag = "2")]
    pub edge_type: Option<EdgeType>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateEdgeFrameResponse {
    #[prost(message, repeated, tag = "1")]
    pub edge_type: Vec<EdgeType>,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateTableFrameRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
    #[prost(message, optional, tag = "2")]
    pub table_type: Option<TableType>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateTableFrameResponse {
    #[prost(message, repeated, tag = "1")]
    pub table_type: Vec<TableType>,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}

/// An empty `name` list asks for every frame of the kind.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetVertexFramesRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
    #[prost(string, repeated, tag = "2")]
    pub name: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetVertexFramesResponse {
    #[prost(message, repeated, tag = "1")]
    pub vertex_type: Vec<VertexType>,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetEdgeFramesRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
    #[prost(string, repeated, tag = "2")]
    pub name: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetEdgeFramesResponse {
    #[prost(message, repeated, tag = "1")]
    pub edge_type: Vec<EdgeType>,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetTableFramesRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
    #[prost(string, repeated, tag = "2")]
    pub name: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetTableFramesResponse {
    #[prost(message, repeated, tag = "1")]
    pub table_type: Vec<TableType>,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteTypeRequest {
    #[prost(uint64, tag = "1")]
    pub expected_server_id: u64,
    #[prost(string, tag = "2")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteTypeResponse {
    #[prost(bool, tag = "1")]
    pub found_and_deleted: bool,
    #[prost(message, repeated, tag = "2")]
    pub error: Vec<ErrorMessage>,
}
