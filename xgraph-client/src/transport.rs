//! Transport seam between the client and the wire
//!
//! `Transport` is the "call(request) -> response | error" contract the rest of
//! the client is written against. `GrpcTransport` fulfils it over a single
//! tonic channel, plaintext or TLS.

use crate::config::ConnectionConfig;
use crate::error::{ClientError, Result};
use std::path::Path;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint, Identity};
use tonic::Status;
use tracing::{debug, info};
use xgraph_proto::{self as proto, RpcClient};

/// Outcome of one RPC as the transport reports it
pub type RpcResult<T> = std::result::Result<T, Status>;

/// One method per RPC consumed by the client.
///
/// Implementations perform no retries; a failed call is reported once.
#[tonic::async_trait]
pub trait Transport: Send {
    async fn identifier(
        &mut self,
        request: proto::IdentifierRequest,
    ) -> RpcResult<proto::IdentifierResponse>;

    async fn version(
        &mut self,
        request: proto::VersionRequest,
    ) -> RpcResult<proto::VersionResponse>;

    async fn max_user_memory_size(
        &mut self,
        request: proto::MaxUserMemorySizeRequest,
    ) -> RpcResult<proto::MaxUserMemorySizeResponse>;

    async fn free_user_memory_size(
        &mut self,
        request: proto::FreeUserMemorySizeRequest,
    ) -> RpcResult<proto::FreeUserMemorySizeResponse>;

    async fn stat_report(
        &mut self,
        request: proto::StatReportRequest,
    ) -> RpcResult<proto::StatReportResponse>;

    async fn create_vertex_frame(
        &mut self,
        request: proto::CreateVertexFrameRequest,
    ) -> RpcResult<proto::CreateVertexFrameResponse>;

    async fn create_edge_frame(
        &mut self,
        request: proto::CreateEdgeFrameRequest,
    ) -> RpcResult<proto::CreateEdgeFrameResponse>;

    async fn create_table_frame(
        &mut self,
        request: proto::CreateTableFrameRequest,
    ) -> RpcResult<proto::CreateTableFrameResponse>;

    async fn get_vertex_frames(
        &mut self,
        request: proto::GetVertexFramesRequest,
    ) -> RpcResult<proto::GetVertexFramesResponse>;

    async fn get_edge_frames(
        &mut self,
        request: proto::GetEdgeFramesRequest,
    ) -> RpcResult<proto::GetEdgeFramesResponse>;

    async fn get_table_frames(
        &mut self,
        request: proto::GetTableFramesRequest,
    ) -> RpcResult<proto::GetTableFramesResponse>;

    async fn delete_type(
        &mut self,
        request: proto::DeleteTypeRequest,
    ) -> RpcResult<proto::DeleteTypeResponse>;

    async fn schedule_jobs_cypher(
        &mut self,
        request: proto::ScheduleJobsCypherRequest,
    ) -> RpcResult<proto::ScheduleJobsResponse>;

    async fn get_jobs(
        &mut self,
        request: proto::GetJobsRequest,
    ) -> RpcResult<proto::GetJobsResponse>;

    async fn cancel_jobs(
        &mut self,
        request: proto::CancelJobsRequest,
    ) -> RpcResult<proto::CancelJobsResponse>;
}

/// gRPC transport over one tonic channel
#[derive(Clone)]
pub struct GrpcTransport {
    inner: RpcClient,
}

impl GrpcTransport {
    /// Open the channel described by `config`.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;

        let uri = config.endpoint_uri();
        let mut endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|e| ClientError::Connection(format!("Invalid address: {}", e)))?;

        if config.ssl {
            let tls = load_tls_config(&config.ssl_root_dir, config.server_cn())?;
            endpoint = endpoint
                .tls_config(tls)
                .map_err(|e| ClientError::Connection(format!("Invalid TLS configuration: {}", e)))?;
        }

        debug!(uri = %uri, ssl = config.ssl, "Opening channel");
        let channel = endpoint
            .connect()
            .await
            .map_err(|e| ClientError::Connection(format!("Failed to connect: {}", e)))?;

        info!(uri = %uri, "Channel established");
        Ok(Self::from_channel(channel))
    }

    /// Wrap an already established channel
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            inner: RpcClient::new(channel),
        }
    }
}

/// Load the CA chain and client identity from `root_dir`.
///
/// Expected layout: `certs/ca-chain.cert.pem`, `certs/client.cert.pem` and
/// `private/client.key.pem`.
pub fn load_tls_config(root_dir: &Path, server_cn: &str) -> Result<ClientTlsConfig> {
    let read = |relative: &str| {
        let path = root_dir.join(relative);
        std::fs::read(&path).map_err(|e| {
            ClientError::Connection(format!("Failed to read {}: {}", path.display(), e))
        })
    };

    let ca_chain = read("certs/ca-chain.cert.pem")?;
    let client_key = read("private/client.key.pem")?;
    let client_cert = read("certs/client.cert.pem")?;

    Ok(ClientTlsConfig::new()
        .domain_name(server_cn)
        .ca_certificate(Certificate::from_pem(ca_chain))
        .identity(Identity::from_pem(client_cert, client_key)))
}

#[tonic::async_trait]
impl Transport for GrpcTransport {
    async fn identifier(
        &mut self,
        request: proto::IdentifierRequest,
    ) -> RpcResult<proto::IdentifierResponse> {
        self.inner.identifier(request).await
    }

    async fn version(
        &mut self,
        request: proto::VersionRequest,
    ) -> RpcResult<proto::VersionResponse> {
        self.inner.version(request).await
    }

    async fn max_user_memory_size(
        &mut self,
        request: proto::MaxUserMemorySizeRequest,
    ) -> RpcResult<proto::MaxUserMemorySizeResponse> {
        self.inner.max_user_memory_size(request).await
    }

    async fn free_user_memory_size(
        &mut self,
        request: proto::FreeUserMemorySizeRequest,
    ) -> RpcResult<proto::FreeUserMemorySizeResponse> {
        self.inner.free_user_memory_size(request).await
    }

    async fn stat_report(
        &mut self,
        request: proto::StatReportRequest,
    ) -> RpcResult<proto::StatReportResponse> {
        self.inner.stat_report(request).await
    }

    async fn create_vertex_frame(
        &mut self,
        request: proto::CreateVertexFrameRequest,
    ) -> RpcResult<proto::CreateVertexFrameResponse> {
        self.inner.create_vertex_frame(request).await
    }

    async fn create_edge_frame(
        &mut self,
        request: proto::CreateEdgeFrameRequest,
    ) -> RpcResult<proto::CreateEdgeFrameResponse> {
        self.inner.create_edge_frame(request).await
    }

    async fn create_table_frame(
        &mut self,
        request: proto::CreateTableFrameRequest,
    ) -> RpcResult<proto::CreateTableFrameResponse> {
        self.inner.create_table_frame(request).await
    }

    async fn get_vertex_frames(
        &mut self,
        request: proto::GetVertexFramesRequest,
    ) -> RpcResult<proto::GetVertexFramesResponse> {
        self.inner.get_vertex_frames(request).await
    }

    async fn get_edge_frames(
        &mut self,
        request: proto::GetEdgeFramesRequest,
    ) -> RpcResult<proto::GetEdgeFramesResponse> {
        self.inner.get_edge_frames(request).await
    }

    async fn get_table_frames(
        &mut self,
        request: proto::GetTableFramesRequest,
    ) -> RpcResult<proto::GetTableFramesResponse> {
        self.inner.get_table_frames(request).await
    }

    async fn delete_type(
        &mut self,
        request: proto::DeleteTypeRequest,
    ) -> RpcResult<proto::DeleteTypeResponse> {
        self.inner.delete_type(request).await
    }

    async fn schedule_jobs_cypher(
        &mut self,
        request: proto::ScheduleJobsCypherRequest,
    ) -> RpcResult<proto::ScheduleJobsResponse> {
        self.inner.schedule_jobs_cypher(request).await
    }

    async fn get_jobs(
        &mut self,
        request: proto::GetJobsRequest,
    ) -> RpcResult<proto::GetJobsResponse> {
        self.inner.get_jobs(request).await
    }

    async fn cancel_jobs(
        &mut self,
        request: proto::CancelJobsRequest,
    ) -> RpcResult<proto::CancelJobsResponse> {
        self.inner.cancel_jobs(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_tls_material_missing() {
        let dir = TempDir::new().unwrap();
        let err = load_tls_config(dir.path(), "server").unwrap_err();
        match err {
            ClientError::Connection(msg) => assert!(msg.contains("ca-chain.cert.pem")),
            other => panic!("Expected Connection error, got {:?}", other),
        }
    }

    #[test]
    fn test_tls_material_loaded() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("certs")).unwrap();
        fs::create_dir_all(dir.path().join("private")).unwrap();
        fs::write(dir.path().join("certs/ca-chain.cert.pem"), b"ca").unwrap();
        fs::write(dir.path().join("certs/client.cert.pem"), b"cert").unwrap();
        fs::write(dir.path().join("private/client.key.pem"), b"key").unwrap();

        assert!(load_tls_config(dir.path(), "server").is_ok());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_connect() {
        let config = ConnectionConfig::new().with_port(0);
        let err = GrpcTransport::connect(&config).await.err().unwrap();
        assert!(matches!(err, ClientError::Value(_)));
    }
}
