//! Session bootstrap: server identity and version gate
//!
//! The server identifier fetched at connect time is copied into every
//! outgoing request. After a server restart the identifier changes and the
//! server rejects stale requests, so the client never re-derives state on its
//! own.

use crate::error::{ClientError, Result};
use crate::transport::Transport;
use crate::translate::check_response;
use tracing::{debug, info, warn};
use xgraph_proto::{self as proto, SessionStamped};

/// Version this client speaks; the server must report exactly the same.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Identity of the server instance this connection is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServerSession {
    server_unique_identifier: u64,
}

impl ServerSession {
    pub fn new(server_unique_identifier: u64) -> Self {
        Self {
            server_unique_identifier,
        }
    }

    pub fn server_unique_identifier(&self) -> u64 {
        self.server_unique_identifier
    }

    /// Tag a request with this session's server identifier.
    pub fn stamp<R: SessionStamped>(&self, mut request: R) -> R {
        request.set_expected_server_id(self.server_unique_identifier);
        request
    }

    /// Fetch the server identifier, then check the server version.
    ///
    /// Both steps must succeed before any other RPC is issued.
    pub async fn establish<T: Transport>(transport: &mut T) -> Result<Self> {
        let session = Self::fetch_identifier(transport).await?;
        session.check_version(transport).await?;
        Ok(session)
    }

    async fn fetch_identifier<T: Transport>(transport: &mut T) -> Result<Self> {
        let response = transport
            .identifier(proto::IdentifierRequest::default())
            .await
            .map_err(ClientError::from)
            .and_then(check_response)
            .map_err(|e| {
                warn!(error = %e, "Server identifier fetch failed");
                ClientError::Connection(format!("Failure on connection initialization: {}", e))
            })?;

        debug!(
            server_id = response.server_unique_identifier,
            "Fetched server identifier"
        );
        Ok(Self::new(response.server_unique_identifier))
    }

    async fn check_version<T: Transport>(&self, transport: &mut T) -> Result<()> {
        let request = self.stamp(proto::VersionRequest::default());
        let response = transport
            .version(request)
            .await
            .map_err(ClientError::from)
            .and_then(check_response)
            .map_err(|e| {
                warn!(error = %e, "Server version fetch failed");
                ClientError::Connection(format!("Failure on version check: {}", e))
            })?;

        if response.version != CLIENT_VERSION {
            warn!(
                server_version = %response.version,
                client_version = CLIENT_VERSION,
                "Server version mismatch"
            );
            return Err(ClientError::Connection(format!(
                "Version matching for the client and the server failed. \
                 Install the client matching server version {} (client version: {})",
                response.version, CLIENT_VERSION
            )));
        }

        info!(
            server_id = self.server_unique_identifier,
            version = %response.version,
            "Session established"
        );
        Ok(())
    }
}
