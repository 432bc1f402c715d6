//! The `Connection` facade
//!
//! A connection owns one transport and one server session for its whole
//! lifetime. Catalog and job operations are implemented in their own modules
//! on top of the fields kept here.

use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::job::{validate_opt_level, DEFAULT_OPT_LEVEL};
use crate::session::ServerSession;
use crate::translate::{check_response, parse_payload};
use crate::transport::{GrpcTransport, Transport};
use serde_json::Value as JsonValue;
use tracing::debug;
use xgraph_proto as proto;

/// Connection to an XGraph server
///
/// Meant for one logical caller at a time: every operation takes `&mut self`
/// and no internal locking is done. A torn channel surfaces as a connection
/// error on the next call; nothing is retried or reconnected automatically.
///
/// # Example
/// ```no_run
/// # use xgraph_client::{Connection, ConnectionConfig, ColumnType};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut conn = Connection::connect(ConnectionConfig::default()).await?;
///
/// conn.create_vertex_frame(
///     "Person",
///     vec![("id", ColumnType::Int), ("name", ColumnType::Text)],
///     "id",
/// )
/// .await?;
///
/// let job = conn
///     .run_job("MATCH (a:Person) RETURN a.id INTO Result1", None, None)
///     .await?;
/// println!("{}", job);
/// # Ok(())
/// # }
/// ```
pub struct Connection<T: Transport = GrpcTransport> {
    pub(crate) transport: T,
    pub(crate) session: ServerSession,
    pub(crate) config: ConnectionConfig,
    pub(crate) opt_level: u32,
}

impl Connection<GrpcTransport> {
    /// Open a channel to the configured server and bootstrap the session.
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        let transport = GrpcTransport::connect(&config).await?;
        Self::with_transport(transport, config).await
    }
}

impl<T: Transport> Connection<T> {
    /// Bootstrap a session over an already open transport.
    ///
    /// Fails with a connection error when the identifier cannot be fetched or
    /// the server runs a different version.
    pub async fn with_transport(mut transport: T, config: ConnectionConfig) -> Result<Self> {
        let session = ServerSession::establish(&mut transport).await?;
        Ok(Self {
            transport,
            session,
            config,
            opt_level: DEFAULT_OPT_LEVEL,
        })
    }

    pub fn session(&self) -> ServerSession {
        self.session
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Optimization level used when a job is scheduled without one
    pub fn optimization_level(&self) -> u32 {
        self.opt_level
    }

    /// Change the default optimization level: 0 none, 1 general, 2 WHERE-clause.
    pub fn set_optimization_level(&mut self, level: u32) -> Result<()> {
        self.opt_level = validate_opt_level(level)?;
        debug!(opt_level = level, "Optimization level changed");
        Ok(())
    }

    /// Current product version reported by the server
    pub async fn server_version(&mut self) -> Result<String> {
        let request = self.session.stamp(proto::VersionRequest::default());
        let response = check_response(self.transport.version(request).await?)?;
        Ok(response.version)
    }

    /// Maximum memory available for user data on the server, in bytes
    pub async fn max_user_memory_size(&mut self) -> Result<u64> {
        let request = self.session.stamp(proto::MaxUserMemorySizeRequest::default());
        let response = check_response(self.transport.max_user_memory_size(request).await?)?;
        Ok(response.pool_size)
    }

    /// Free memory available for user data on the server, in bytes
    pub async fn free_user_memory_size(&mut self) -> Result<u64> {
        let request = self.session.stamp(proto::FreeUserMemorySizeRequest::default());
        let response = check_response(self.transport.free_user_memory_size(request).await?)?;
        Ok(response.free_memory_size)
    }

    /// Server statistics report, parsed from its JSON payload
    pub async fn stat_report(&mut self) -> Result<JsonValue> {
        let request = self.session.stamp(proto::StatReportRequest::default());
        let response = check_response(self.transport.stat_report(request).await?)?;
        parse_payload(&response.stat_report_json)
    }
}
