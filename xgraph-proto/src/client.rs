//! Unary RPC stub over a tonic channel
//!
//! One method per RPC; every call goes through the same `unary` path so the
//! codec and readiness handling live in one place.

use crate::*;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{Code, Request, Status};

/// Typed client for the admin, graph-types and job services
#[derive(Clone)]
pub struct RpcClient {
    inner: tonic::client::Grpc<Channel>,
}

impl RpcClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    async fn unary<Req, Resp>(&mut self, request: Req, path: &'static str) -> Result<Resp, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::new(Code::Unknown, format!("Service was not ready: {}", e)))?;

        let codec = tonic::codec::ProstCodec::<Req, Resp>::default();
        let path = PathAndQuery::from_static(path);
        let response = self.inner.unary(Request::new(request), path, codec).await?;
        Ok(response.into_inner())
    }

    // ========================================================================
    // AdminService
    // ========================================================================

    pub async fn identifier(&mut self, request: IdentifierRequest) -> Result<IdentifierResponse, Status> {
        self.unary(request, "/xgraph.AdminService/Identifier").await
    }

    pub async fn version(&mut self, request: VersionRequest) -> Result<VersionResponse, Status> {
        self.unary(request, "/xgraph.AdminService/Version").await
    }

    pub async fn max_user_memory_size(
        &mut self,
        request: MaxUserMemorySizeRequest,
    ) -> Result<MaxUserMemorySizeResponse, Status> {
        self.unary(request, "/xgraph.AdminService/MaxUserMemorySize").await
    }

    pub async fn free_user_memory_size(
        &mut self,
        request: FreeUserMemorySizeRequest,
    ) -> Result<FreeUserMemorySizeResponse, Status> {
        self.unary(request, "/xgraph.AdminService/FreeUserMemorySize").await
    }

    pub async fn stat_report(&mut self, request: StatReportRequest) -> Result<StatReportResponse, Status> {
        self.unary(request, "/xgraph.AdminService/StatReport").await
    }

    // ========================================================================
    // GraphTypesService
    // ========================================================================

    pub async fn create_vertex_frame(
        &mut self,
        request: CreateVertexFrameRequest,
    ) -> Result<CreateVertexFrameResponse, Status> {
        self.unary(request, "/xgraph.GraphTypesService/CreateVertexFrame").await
    }

    pub async fn create_edge_frame(
        &mut self,
        request: CreateEdgeFrameRequest,
    ) -> Result<CreateEdgeFrameResponse, Status> {
        self.unary(request, "/xgraph.GraphTypesService/CreateEdgeFrame").await
    }

    pub async fn create_table_frame(
        &mut self,
        request: CreateTableFrameRequest,
    ) -> Result<CreateTableFrameResponse, Status> {
        self.unary(request, "/xgraph.GraphTypesService/CreateTableFrame").await
    }

    pub async fn get_vertex_frames(
        &mut self,
        request: GetVertexFramesRequest,
    ) -> Result<GetVertexFramesResponse, Status> {
        self.unary(request, "/xgraph.GraphTypesService/GetVertexFrames").await
    }

    pub async fn get_edge_frames(
        &mut self,
        request: GetEdgeFramesRequest,
    ) -> Result<GetEdgeFramesResponse, Status> {
        self.unary(request, "/xgraph.GraphTypesService/GetEdgeFrames").await
    }

    pub async fn get_table_frames(
        &mut self,
        request: GetTableFramesRequest,
    ) -> Result<GetTableFramesResponse, Status> {
        self.unary(request, "/xgraph.GraphTypesService/GetTableFrames").await
    }

    pub async fn delete_type(&mut self, request: DeleteTypeRequest) -> Result<DeleteTypeResponse, Status> {
        self.unary(request, "/xgraph.GraphTypesService/DeleteType").await
    }

    // ========================================================================
    // JobService
    // ========================================================================

    pub async fn schedule_jobs_cypher(
        &mut self,
        request: ScheduleJobsCypherRequest,
    ) -> Result<ScheduleJobsResponse, Status> {
        self.unary(request, "/xgraph.JobService/ScheduleJobsCypher").await
    }

    pub async fn get_jobs(&mut self, request: GetJobsRequest) -> Result<GetJobsResponse, Status> {
        self.unary(request, "/xgraph.JobService/GetJobs").await
    }

    pub async fn cancel_jobs(&mut self, request: CancelJobsRequest) -> Result<CancelJobsResponse, Status> {
        self.unary(request, "/xgraph.JobService/CancelJobs").await
    }
}
