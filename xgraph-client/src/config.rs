//! Connection configuration
use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::path::PathBuf;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 4367;

/// Optional connection flags.
///
/// The set of recognized flags is closed: unknown keys are rejected when the
/// flags are parsed from a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionFlags {
    /// Passed through to bulk-load paths that read from S3
    #[serde(default)]
    pub aws_access_key_id: Option<String>,

    #[serde(default)]
    pub aws_secret_access_key: Option<String>,

    #[serde(default)]
    pub ssl: Option<bool>,

    #[serde(default)]
    pub ssl_root_dir: Option<PathBuf>,

    #[serde(default)]
    pub ssl_server_cn: Option<String>,
}

impl ConnectionFlags {
    /// Parse flags from a JSON object map.
    pub fn from_map(flags: Map<String, JsonValue>) -> Result<Self> {
        serde_json::from_value(JsonValue::Object(flags))
            .map_err(|e| ClientError::Value(format!("Invalid connection flags: {}", e)))
    }
}

/// Where and how to reach the server
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,

    /// AWS credentials forwarded to bulk-load requests
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,

    /// Use TLS with client certificates
    pub ssl: bool,

    /// Directory holding `certs/` and `private/` TLS material
    pub ssl_root_dir: PathBuf,

    /// Expected common name on the server certificate (None = host)
    pub ssl_server_cn: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            aws_access_key_id: String::new(),
            aws_secret_access_key: String::new(),
            ssl: false,
            ssl_root_dir: default_ssl_root_dir(),
            ssl_server_cn: None,
        }
    }
}

impl ConnectionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    pub fn with_ssl_root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ssl_root_dir = dir.into();
        self
    }

    pub fn with_ssl_server_cn(mut self, cn: impl Into<String>) -> Self {
        self.ssl_server_cn = Some(cn.into());
        self
    }

    pub fn with_aws_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.aws_access_key_id = access_key_id.into();
        self.aws_secret_access_key = secret_access_key.into();
        self
    }

    /// Apply a set of flags on top of this configuration
    pub fn with_flags(mut self, flags: ConnectionFlags) -> Self {
        if let Some(id) = flags.aws_access_key_id {
            self.aws_access_key_id = id;
        }
        if let Some(secret) = flags.aws_secret_access_key {
            self.aws_secret_access_key = secret;
        }
        if let Some(ssl) = flags.ssl {
            self.ssl = ssl;
        }
        if let Some(dir) = flags.ssl_root_dir {
            self.ssl_root_dir = dir;
        }
        if let Some(cn) = flags.ssl_server_cn {
            self.ssl_server_cn = Some(cn);
        }
        self
    }

    /// Name the server certificate must carry
    pub fn server_cn(&self) -> &str {
        self.ssl_server_cn.as_deref().unwrap_or(&self.host)
    }

    /// Endpoint URI for the channel
    pub fn endpoint_uri(&self) -> String {
        let scheme = if self.ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ClientError::Value("host must not be empty".to_string()));
        }

        if self.port == 0 {
            return Err(ClientError::Value("port must be greater than 0".to_string()));
        }

        if let Some(cn) = &self.ssl_server_cn {
            if cn.trim().is_empty() {
                return Err(ClientError::Value(
                    "ssl_server_cn must not be empty when set".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn default_ssl_root_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ssl")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = ConnectionConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4367);
        assert!(!config.ssl);
        assert!(config.ssl_root_dir.ends_with(".ssl"));
        assert_eq!(config.server_cn(), "127.0.0.1");
        assert!(config.aws_access_key_id.is_empty());
    }

    #[test]
    fn test_builder_methods() {
        let config = ConnectionConfig::new()
            .with_host("graph.internal")
            .with_port(5000)
            .with_ssl(true)
            .with_ssl_root_dir("/etc/xgraph/ssl")
            .with_ssl_server_cn("xgraph-server");

        assert_eq!(config.endpoint_uri(), "https://graph.internal:5000");
        assert_eq!(config.server_cn(), "xgraph-server");
        assert_eq!(config.ssl_root_dir, PathBuf::from("/etc/xgraph/ssl"));
    }

    #[test]
    fn test_server_cn_follows_host() {
        let config = ConnectionConfig::new().with_host("db.example.com");
        assert_eq!(config.server_cn(), "db.example.com");
        assert_eq!(config.endpoint_uri(), "http://db.example.com:4367");
    }

    #[test]
    fn test_flags_from_map() {
        let map = json!({
            "ssl": true,
            "ssl_server_cn": "node-1",
            "aws_access_key_id": "AKIA",
            "aws_secret_access_key": "secret"
        });
        let flags = match map {
            JsonValue::Object(map) => ConnectionFlags::from_map(map).unwrap(),
            _ => unreachable!(),
        };

        let config = ConnectionConfig::new().with_flags(flags);
        assert!(config.ssl);
        assert_eq!(config.server_cn(), "node-1");
        assert_eq!(config.aws_access_key_id, "AKIA");
        assert_eq!(config.aws_secret_access_key, "secret");
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let mut map = Map::new();
        map.insert("ssl_mode".to_string(), json!("strict"));

        let err = ConnectionFlags::from_map(map).unwrap_err();
        assert!(matches!(err, ClientError::Value(_)));
    }

    #[test]
    fn test_validate() {
        assert!(ConnectionConfig::default().validate().is_ok());
        assert!(ConnectionConfig::new().with_port(0).validate().is_err());
        assert!(ConnectionConfig::new().with_host(" ").validate().is_err());
        assert!(ConnectionConfig::new()
            .with_ssl_server_cn("")
            .validate()
            .is_err());
    }
}
