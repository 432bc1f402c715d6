/// Test utilities for the XGraph client
///
/// `MockServer` is an in-memory stand-in for an XGraph server. It keeps a
/// frame catalog, plays scripted job status sequences and counts every RPC it
/// receives. `MockTransport` plugs it into a `Connection`.

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tokio::time::Instant;
use tonic::Status;
use xgraph_client::{Connection, ConnectionConfig, Result, RpcResult, CLIENT_VERSION};
use xgraph_proto::{self as proto, ErrorCodeEnum, ErrorMessage, JobStatusEnum, SessionStamped};

pub const IDENTIFIER: &str = "identifier";
pub const VERSION: &str = "version";
pub const MAX_USER_MEMORY_SIZE: &str = "max_user_memory_size";
pub const FREE_USER_MEMORY_SIZE: &str = "free_user_memory_size";
pub const STAT_REPORT: &str = "stat_report";
pub const CREATE_VERTEX_FRAME: &str = "create_vertex_frame";
pub const CREATE_EDGE_FRAME: &str = "create_edge_frame";
pub const CREATE_TABLE_FRAME: &str = "create_table_frame";
pub const GET_VERTEX_FRAMES: &str = "get_vertex_frames";
pub const GET_EDGE_FRAMES: &str = "get_edge_frames";
pub const GET_TABLE_FRAMES: &str = "get_table_frames";
pub const DELETE_TYPE: &str = "delete_type";
pub const SCHEDULE_JOBS: &str = "schedule_jobs_cypher";
pub const GET_JOBS: &str = "get_jobs";
pub const CANCEL_JOBS: &str = "cancel_jobs";

/// RPCs that touch the frame catalog
pub const CATALOG_RPCS: &[&str] = &[
    CREATE_VERTEX_FRAME,
    CREATE_EDGE_FRAME,
    CREATE_TABLE_FRAME,
    GET_VERTEX_FRAMES,
    GET_EDGE_FRAMES,
    GET_TABLE_FRAMES,
    DELETE_TYPE,
];

/// RPCs that touch jobs
pub const JOB_RPCS: &[&str] = &[SCHEDULE_JOBS, GET_JOBS, CANCEL_JOBS];

/// Status sequence of one job on the mock server
#[derive(Debug, Clone)]
struct ScriptedJob {
    statuses: VecDeque<JobStatusEnum>,
    on_cancel: Option<Vec<JobStatusEnum>>,
    error: Option<ErrorMessage>,
}

impl ScriptedJob {
    fn new(statuses: Vec<JobStatusEnum>) -> Self {
        Self {
            statuses: statuses.into(),
            on_cancel: None,
            error: None,
        }
    }

    fn current(&self) -> JobStatusEnum {
        self.statuses.front().copied().unwrap_or(JobStatusEnum::Completed)
    }

    /// Report the current status and move to the next one. The last status
    /// is kept forever.
    fn observe(&mut self) -> JobStatusEnum {
        let status = self.current();
        if self.statuses.len() > 1 {
            self.statuses.pop_front();
        }
        status
    }

    fn to_proto(&self, job_id: i64, status: JobStatusEnum) -> proto::JobStatus {
        let terminal = matches!(
            status,
            JobStatusEnum::Completed | JobStatusEnum::Failed | JobStatusEnum::Canceled
        );
        let error = match (status, &self.error) {
            (JobStatusEnum::Failed, Some(error)) => vec![error.clone()],
            _ => Vec::new(),
        };

        proto::JobStatus {
            job_id,
            status: status as i32,
            start_time: 1_700_000_000_000,
            end_time: if terminal { 1_700_000_005_000 } else { 0 },
            error,
        }
    }
}

#[derive(Debug)]
struct ServerState {
    server_id: u64,
    version: String,
    unavailable: Option<String>,
    identifier_status: Option<Status>,
    injected: HashMap<&'static str, ErrorMessage>,
    calls: HashMap<&'static str, usize>,
    stamps: Vec<u64>,
    vertex_frames: BTreeMap<String, proto::VertexType>,
    edge_frames: BTreeMap<String, proto::EdgeType>,
    table_frames: BTreeMap<String, proto::TableType>,
    jobs: BTreeMap<i64, ScriptedJob>,
    next_job_id: i64,
    next_script: Option<Vec<JobStatusEnum>>,
    scheduled: Vec<(String, i32)>,
    poll_times: Vec<Instant>,
    canceled: Vec<i64>,
    stat_report_json: String,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            server_id: 0x5eed_1234,
            version: CLIENT_VERSION.to_string(),
            unavailable: None,
            identifier_status: None,
            injected: HashMap::new(),
            calls: HashMap::new(),
            stamps: Vec::new(),
            vertex_frames: BTreeMap::new(),
            edge_frames: BTreeMap::new(),
            table_frames: BTreeMap::new(),
            jobs: BTreeMap::new(),
            next_job_id: 1,
            next_script: None,
            scheduled: Vec::new(),
            poll_times: Vec::new(),
            canceled: Vec::new(),
            stat_report_json: r#"{"type": "info", "data": {"jobs": 0}}"#.to_string(),
        }
    }
}

impl ServerState {
    /// Count the call and decide whether it proceeds.
    fn begin<R: SessionStamped>(
        &mut self,
        rpc: &'static str,
        request: &R,
    ) -> RpcResult<Option<ErrorMessage>> {
        *self.calls.entry(rpc).or_insert(0) += 1;

        if let Some(message) = &self.unavailable {
            return Err(Status::unavailable(message.clone()));
        }

        self.stamps.push(request.expected_server_id());
        if request.expected_server_id() != self.server_id {
            return Ok(Some(error_message(
                ErrorCodeEnum::ConnectionError,
                "Server was restarted, reconnect",
            )));
        }

        Ok(self.injected.remove(rpc))
    }

    fn job_status(&mut self, job_id: i64) -> std::result::Result<proto::JobStatus, ErrorMessage> {
        match self.jobs.get_mut(&job_id) {
            Some(job) => {
                let status = job.observe();
                Ok(job.to_proto(job_id, status))
            }
            None => Err(error_message(
                ErrorCodeEnum::ValueError,
                &format!("Job {} does not exist", job_id),
            )),
        }
    }
}

/// Handle on the in-memory server; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockServer {
    state: Arc<Mutex<ServerState>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transport(&self) -> MockTransport {
        MockTransport {
            state: Arc::clone(&self.state),
        }
    }

    /// Bootstrap a connection against this server.
    pub async fn connect(&self) -> Result<Connection<MockTransport>> {
        Connection::with_transport(self.transport(), ConnectionConfig::default()).await
    }

    pub fn server_id(&self) -> u64 {
        self.state.lock().server_id
    }

    pub fn set_version(&self, version: &str) {
        self.state.lock().version = version.to_string();
    }

    /// Change the server identifier, as a server restart does.
    pub fn restart(&self, server_id: u64) {
        self.state.lock().server_id = server_id;
    }

    /// Fail every RPC at the transport level.
    pub fn set_unavailable(&self, message: &str) {
        self.state.lock().unavailable = Some(message.to_string());
    }

    /// Fail the identifier RPC with `status`.
    pub fn fail_identifier(&self, status: Status) {
        self.state.lock().identifier_status = Some(status);
    }

    /// Attach a server error to the next response of `rpc`.
    pub fn inject_error(&self, rpc: &'static str, code: ErrorCodeEnum, message: &str, detail: &[&str]) {
        let mut error = error_message(code, message);
        error.detail = detail.iter().map(|d| d.to_string()).collect();
        self.state.lock().injected.insert(rpc, error);
    }

    pub fn set_stat_report(&self, json: &str) {
        self.state.lock().stat_report_json = json.to_string();
    }

    /// Statuses reported for the next scheduled job, starting with the one
    /// returned by the schedule call.
    pub fn script_next_job(&self, statuses: Vec<JobStatusEnum>) {
        self.state.lock().next_script = Some(statuses);
    }

    /// Register a job with a scripted status sequence.
    pub fn add_job(&self, job_id: i64, statuses: Vec<JobStatusEnum>) {
        let mut state = self.state.lock();
        state.jobs.insert(job_id, ScriptedJob::new(statuses));
        state.next_job_id = state.next_job_id.max(job_id + 1);
    }

    /// Statuses the job goes through once a cancel request arrives.
    pub fn on_cancel(&self, job_id: i64, statuses: Vec<JobStatusEnum>) {
        if let Some(job) = self.state.lock().jobs.get_mut(&job_id) {
            job.on_cancel = Some(statuses);
        }
    }

    /// Error reported with the job once it shows as failed.
    pub fn set_job_error(&self, job_id: i64, code: ErrorCodeEnum, message: &str, detail: &[&str]) {
        if let Some(job) = self.state.lock().jobs.get_mut(&job_id) {
            let mut error = error_message(code, message);
            error.detail = detail.iter().map(|d| d.to_string()).collect();
            job.error = Some(error);
        }
    }

    pub fn calls(&self, rpc: &str) -> usize {
        self.state.lock().calls.get(rpc).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().calls.values().sum()
    }

    pub fn catalog_calls(&self) -> usize {
        CATALOG_RPCS.iter().map(|rpc| self.calls(rpc)).sum()
    }

    pub fn job_calls(&self) -> usize {
        JOB_RPCS.iter().map(|rpc| self.calls(rpc)).sum()
    }

    /// `expected_server_id` of every stamped request, in arrival order
    pub fn stamps(&self) -> Vec<u64> {
        self.state.lock().stamps.clone()
    }

    /// Query text and optimization level of every scheduled job
    pub fn scheduled(&self) -> Vec<(String, i32)> {
        self.state.lock().scheduled.clone()
    }

    /// Arrival time of every GetJobs call
    pub fn poll_times(&self) -> Vec<Instant> {
        self.state.lock().poll_times.clone()
    }

    /// Job ids named by cancel requests
    pub fn canceled(&self) -> Vec<i64> {
        self.state.lock().canceled.clone()
    }

    pub fn vertex_frame(&self, name: &str) -> Option<proto::VertexType> {
        self.state.lock().vertex_frames.get(name).cloned()
    }

    pub fn edge_frame(&self, name: &str) -> Option<proto::EdgeType> {
        self.state.lock().edge_frames.get(name).cloned()
    }
}

/// `Transport` backed by a `MockServer`
#[derive(Debug, Clone)]
pub struct MockTransport {
    state: Arc<Mutex<ServerState>>,
}

#[tonic::async_trait]
impl xgraph_client::Transport for MockTransport {
    async fn identifier(
        &mut self,
        _request: proto::IdentifierRequest,
    ) -> RpcResult<proto::IdentifierResponse> {
        let mut state = self.state.lock();
        *state.calls.entry(IDENTIFIER).or_insert(0) += 1;
        if let Some(message) = &state.unavailable {
            return Err(Status::unavailable(message.clone()));
        }
        if let Some(status) = state.identifier_status.clone() {
            return Err(status);
        }

        Ok(proto::IdentifierResponse {
            server_unique_identifier: state.server_id,
            error: Vec::new(),
        })
    }

    async fn version(
        &mut self,
        request: proto::VersionRequest,
    ) -> RpcResult<proto::VersionResponse> {
        let mut state = self.state.lock();
        let error = state.begin(VERSION, &request)?;
        Ok(proto::VersionResponse {
            version: state.version.clone(),
            error: error.into_iter().collect(),
        })
    }

    async fn max_user_memory_size(
        &mut self,
        request: proto::MaxUserMemorySizeRequest,
    ) -> RpcResult<proto::MaxUserMemorySizeResponse> {
        let mut state = self.state.lock();
        let error = state.begin(MAX_USER_MEMORY_SIZE, &request)?;
        Ok(proto::MaxUserMemorySizeResponse {
            pool_size: 64 << 30,
            error: error.into_iter().collect(),
        })
    }

    async fn free_user_memory_size(
        &mut self,
        request: proto::FreeUserMemorySizeRequest,
    ) -> RpcResult<proto::FreeUserMemorySizeResponse> {
        let mut state = self.state.lock();
        let error = state.begin(FREE_USER_MEMORY_SIZE, &request)?;
        Ok(proto::FreeUserMemorySizeResponse {
            free_memory_size: 48 << 30,
            error: error.into_iter().collect(),
        })
    }

    async fn stat_report(
        &mut self,
        request: proto::StatReportRequest,
    ) -> RpcResult<proto::StatReportResponse> {
        let mut state = self.state.lock();
        let error = state.begin(STAT_REPORT, &request)?;
        Ok(proto::StatReportResponse {
            stat_report_json: state.stat_report_json.clone(),
            error: error.into_iter().collect(),
        })
    }

    async fn create_vertex_frame(
        &mut self,
        request: proto::CreateVertexFrameRequest,
    ) -> RpcResult<proto::CreateVertexFrameResponse> {
        let mut state = self.state.lock();
        let mut response = proto::CreateVertexFrameResponse::default();
        if let Some(error) = state.begin(CREATE_VERTEX_FRAME, &request)? {
            response.error.push(error);
            return Ok(response);
        }

        if let Some(vertex) = request.vertex_type {
            if state.vertex_frames.contains_key(&vertex.name) {
                response.error.push(already_exists(&vertex.name));
            } else {
                state.vertex_frames.insert(vertex.name.clone(), vertex.clone());
                response.vertex_type.push(vertex);
            }
        }
        Ok(response)
    }

    async fn create_edge_frame(
        &mut self,
        request: proto::CreateEdgeFrameRequest,
    ) -> RpcResult<proto::CreateEdgeFrameResponse> {
        let mut state = self.state.lock();
        let mut response = proto::CreateEdgeFrameResponse::default();
        if let Some(error) = state.begin(CREATE_EDGE_FRAME, &request)? {
            response.error.push(error);
            return Ok(response);
        }

        if let Some(edge) = request.edge_type {
            for endpoint in [&edge.source_vertex, &edge.target_vertex] {
                if !state.vertex_frames.contains_key(endpoint) {
                    response.error.push(not_found(endpoint));
                    return Ok(response);
                }
            }
            if state.edge_frames.contains_key(&edge.name) {
                response.error.push(already_exists(&edge.name));
            } else {
                state.edge_frames.insert(edge.name.clone(), edge.clone());
                response.edge_type.push(edge);
            }
        }
        Ok(response)
    }

    async fn create_table_frame(
        &mut self,
        request: proto::CreateTableFrameRequest,
    ) -> RpcResult<proto::CreateTableFrameResponse> {
        let mut state = self.state.lock();
        let mut response = proto::CreateTableFrameResponse::default();
        if let Some(error) = state.begin(CREATE_TABLE_FRAME, &request)? {
            response.error.push(error);
            return Ok(response);
        }

        if let Some(table) = request.table_type {
            if state.table_frames.contains_key(&table.name) {
                response.error.push(already_exists(&table.name));
            } else {
                state.table_frames.insert(table.name.clone(), table.clone());
                response.table_type.push(table);
            }
        }
        Ok(response)
    }

    async fn get_vertex_frames(
        &mut self,
        request: proto::GetVertexFramesRequest,
    ) -> RpcResult<proto::GetVertexFramesResponse> {
        let mut state = self.state.lock();
        let mut response = proto::GetVertexFramesResponse::default();
        if let Some(error) = state.begin(GET_VERTEX_FRAMES, &request)? {
            response.error.push(error);
            return Ok(response);
        }

        match lookup(&state.vertex_frames, &request.name) {
            Ok(frames) => response.vertex_type = frames,
            Err(error) => response.error.push(error),
        }
        Ok(response)
    }

    async fn get_edge_frames(
        &mut self,
        request: proto::GetEdgeFramesRequest,
    ) -> RpcResult<proto::GetEdgeFramesResponse> {
        let mut state = self.state.lock();
        let mut response = proto::GetEdgeFramesResponse::default();
        if let Some(error) = state.begin(GET_EDGE_FRAMES, &request)? {
            response.error.push(error);
            return Ok(response);
        }

        match lookup(&state.edge_frames, &request.name) {
            Ok(frames) => response.edge_type = frames,
            Err(error) => response.error.push(error),
        }
        Ok(response)
    }

    async fn get_table_frames(
        &mut self,
        request: proto::GetTableFramesRequest,
    ) -> RpcResult<proto::GetTableFramesResponse> {
        let mut state = self.state.lock();
        let mut response = proto::GetTableFramesResponse::default();
        if let Some(error) = state.begin(GET_TABLE_FRAMES, &request)? {
            response.error.push(error);
            return Ok(response);
        }

        match lookup(&state.table_frames, &request.name) {
            Ok(frames) => response.table_type = frames,
            Err(error) => response.error.push(error),
        }
        Ok(response)
    }

    async fn delete_type(
        &mut self,
        request: proto::DeleteTypeRequest,
    ) -> RpcResult<proto::DeleteTypeResponse> {
        let mut state = self.state.lock();
        let mut response = proto::DeleteTypeResponse::default();
        if let Some(error) = state.begin(DELETE_TYPE, &request)? {
            response.error.push(error);
            return Ok(response);
        }

        response.found_and_deleted = state.vertex_frames.remove(&request.name).is_some()
            || state.edge_frames.remove(&request.name).is_some()
            || state.table_frames.remove(&request.name).is_some();
        Ok(response)
    }

    async fn schedule_jobs_cypher(
        &mut self,
        request: proto::ScheduleJobsCypherRequest,
    ) -> RpcResult<proto::ScheduleJobsResponse> {
        let mut state = self.state.lock();
        let mut response = proto::ScheduleJobsResponse::default();
        if let Some(error) = state.begin(SCHEDULE_JOBS, &request)? {
            response.error.push(error);
            return Ok(response);
        }

        let statuses = state.next_script.take().unwrap_or_else(|| {
            vec![
                JobStatusEnum::Scheduled,
                JobStatusEnum::Running,
                JobStatusEnum::Completed,
            ]
        });

        for query in request.cypher_query {
            let job_id = state.next_job_id;
            state.next_job_id += 1;
            state.scheduled.push((query, request.optimization_level));

            let job = ScriptedJob::new(statuses.clone());
            response.job_status.push(job.to_proto(job_id, job.current()));
            state.jobs.insert(job_id, job);
        }
        Ok(response)
    }

    async fn get_jobs(
        &mut self,
        request: proto::GetJobsRequest,
    ) -> RpcResult<proto::GetJobsResponse> {
        let mut state = self.state.lock();
        state.poll_times.push(Instant::now());
        let mut response = proto::GetJobsResponse::default();
        if let Some(error) = state.begin(GET_JOBS, &request)? {
            response.error.push(error);
            return Ok(response);
        }

        let job_ids: Vec<i64> = if request.job_id.is_empty() {
            state.jobs.keys().copied().collect()
        } else {
            request.job_id
        };

        for job_id in job_ids {
            match state.job_status(job_id) {
                Ok(status) => response.job_status.push(status),
                Err(error) => {
                    response.job_status.clear();
                    response.error.push(error);
                    break;
                }
            }
        }
        Ok(response)
    }

    async fn cancel_jobs(
        &mut self,
        request: proto::CancelJobsRequest,
    ) -> RpcResult<proto::CancelJobsResponse> {
        let mut state = self.state.lock();
        let mut response = proto::CancelJobsResponse::default();
        if let Some(error) = state.begin(CANCEL_JOBS, &request)? {
            response.error.push(error);
            return Ok(response);
        }

        for job_id in request.job_id {
            state.canceled.push(job_id);
            if let Some(job) = state.jobs.get_mut(&job_id) {
                let statuses = job
                    .on_cancel
                    .take()
                    .unwrap_or_else(|| vec![JobStatusEnum::Canceled]);
                job.statuses = statuses.into();
                response.job_status.push(job.to_proto(job_id, job.current()));
            }
        }
        Ok(response)
    }
}

fn lookup<F: Clone>(
    frames: &BTreeMap<String, F>,
    names: &[String],
) -> std::result::Result<Vec<F>, ErrorMessage> {
    if names.is_empty() {
        return Ok(frames.values().cloned().collect());
    }

    names
        .iter()
        .map(|name| frames.get(name).cloned().ok_or_else(|| not_found(name)))
        .collect()
}

pub fn error_message(code: ErrorCodeEnum, message: &str) -> ErrorMessage {
    ErrorMessage {
        code: code as i32,
        error_detail_message: message.to_string(),
        detail: Vec::new(),
    }
}

fn not_found(name: &str) -> ErrorMessage {
    error_message(ErrorCodeEnum::NameError, &format!("Frame {} does not exist", name))
}

fn already_exists(name: &str) -> ErrorMessage {
    error_message(ErrorCodeEnum::NameError, &format!("Frame {} already exists", name))
}

/// Route client logs to the test output; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
