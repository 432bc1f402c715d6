//! XGraph wire protocol
//!
//! Message definitions for the admin, graph-types and job services, plus the
//! unary RPC stub used by the client's gRPC transport.

pub mod admin;
pub mod client;
pub mod errors;
pub mod graph;
pub mod job;
pub mod schema;

pub use admin::*;
pub use client::RpcClient;
pub use errors::*;
pub use graph::*;
pub use job::*;
pub use schema::*;

/// Requests that carry the server instance identifier.
///
/// The server rejects a request whose `expected_server_id` does not match its
/// own identifier, which is how a client notices a server restart.
pub trait SessionStamped {
    fn expected_server_id(&self) -> u64;
    fn set_expected_server_id(&mut self, server_id: u64);
}

/// Responses that carry a list of server-reported errors.
pub trait ServerErrors {
    fn server_errors(&self) -> &[ErrorMessage];
}

macro_rules! session_stamped {
    ($($request:ty),* $(,)?) => {
        $(
            impl SessionStamped for $request {
                fn expected_server_id(&self) -> u64 {
                    self.expected_server_id
                }

                fn set_expected_server_id(&mut self, server_id: u64) {
                    self.expected_server_id = server_id;
                }
            }
        )*
    };
}

macro_rules! server_errors {
    ($($response:ty),* $(,)?) => {
        $(
            impl ServerErrors for $response {
                fn server_errors(&self) -> &[ErrorMessage] {
                    &self.error
                }
            }
        )*
    };
}

session_stamped!(
    IdentifierRequest,
    VersionRequest,
    MaxUserMemorySizeRequest,
    FreeUserMemorySizeRequest,
    StatReportRequest,
    CreateVertexFrameRequest,
    CreateEdgeFrameRequest,
    CreateTableFrameRequest,
    GetVertexFramesRequest,
    GetEdgeFramesRequest,
    GetTableFramesRequest,
    DeleteTypeRequest,
    ScheduleJobsCypherRequest,
    GetJobsRequest,
    CancelJobsRequest,
);

server_errors!(
    IdentifierResponse,
    VersionResponse,
    MaxUserMemorySizeResponse,
    FreeUserMemorySizeResponse,
    StatReportResponse,
    CreateVertexFrameResponse,
    CreateEdgeFrameResponse,
    CreateTableFrameResponse,
    GetVertexFramesResponse,
    GetEdgeFramesResponse,
    GetTableFramesResponse,
    DeleteTypeResponse,
    ScheduleJobsResponse,
    GetJobsResponse,
    CancelJobsResponse,
);
