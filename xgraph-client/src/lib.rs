//! XGraph gRPC client library
//!
//! A [`Connection`] binds to one server instance, keeps a typed catalog of
//! vertex, edge and table frames on it, and schedules, polls and cancels
//! query jobs.

pub mod catalog;
pub mod config;
pub mod connection;
pub mod error;
pub mod frame;
pub mod job;
pub mod monitor;
pub mod scheduler;
pub mod schema;
pub mod session;
pub mod translate;
pub mod transport;

// Re-export key types
pub use config::{ConnectionConfig, ConnectionFlags, DEFAULT_HOST, DEFAULT_PORT};
pub use connection::Connection;
pub use error::{ClientError, ErrorKind, Result};
pub use frame::{Frame, FrameKind, FrameRef};
pub use job::{Job, JobRef, JobStatus, DEFAULT_OPT_LEVEL, MAX_QUERY_LENGTH};
pub use monitor::PollBackoff;
pub use schema::{Column, ColumnType, FrameSchema};
pub use session::{ServerSession, CLIENT_VERSION};
pub use transport::{GrpcTransport, RpcResult, Transport};
