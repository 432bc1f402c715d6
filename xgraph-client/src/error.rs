//! Error types for the XGraph client
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tonic::Status;
use xgraph_proto::ErrorCodeEnum;

/// Closed classification of everything that can go wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Generic,
    NotImplemented,
    Arithmetic,
    Io,
    ServerMemory,
    Connection,
    Syntax,
    Type,
    Value,
    Name,
    FrameDependency,
    Transaction,
    Security,
}

impl ErrorKind {
    /// Returns the stable wire code for this kind.
    pub fn code(&self) -> &'static str {
        self.to_proto().as_str_name()
    }

    /// Maps a wire code to its kind. Unrecognized codes are `Generic`.
    pub fn from_code(code: &str) -> Self {
        ErrorCodeEnum::from_str_name(code)
            .map(Self::from_proto)
            .unwrap_or(ErrorKind::Generic)
    }

    /// Maps a numeric wire code to its kind. Unrecognized codes are `Generic`.
    pub fn from_wire(code: i32) -> Self {
        ErrorCodeEnum::try_from(code)
            .map(Self::from_proto)
            .unwrap_or(ErrorKind::Generic)
    }

    pub fn from_proto(code: ErrorCodeEnum) -> Self {
        match code {
            ErrorCodeEnum::GenericError => ErrorKind::Generic,
            ErrorCodeEnum::NotImplemented => ErrorKind::NotImplemented,
            ErrorCodeEnum::ArithmeticError => ErrorKind::Arithmetic,
            ErrorCodeEnum::IoError => ErrorKind::Io,
            ErrorCodeEnum::ServerMemoryError => ErrorKind::ServerMemory,
            ErrorCodeEnum::ConnectionError => ErrorKind::Connection,
            ErrorCodeEnum::SyntaxError => ErrorKind::Syntax,
            ErrorCodeEnum::TypeError => ErrorKind::Type,
            ErrorCodeEnum::ValueError => ErrorKind::Value,
            ErrorCodeEnum::NameError => ErrorKind::Name,
            ErrorCodeEnum::FrameDependencyError => ErrorKind::FrameDependency,
            ErrorCodeEnum::TransactionError => ErrorKind::Transaction,
            ErrorCodeEnum::SecurityError => ErrorKind::Security,
        }
    }

    pub fn to_proto(&self) -> ErrorCodeEnum {
        match self {
            ErrorKind::Generic => ErrorCodeEnum::GenericError,
            ErrorKind::NotImplemented => ErrorCodeEnum::NotImplemented,
            ErrorKind::Arithmetic => ErrorCodeEnum::ArithmeticError,
            ErrorKind::Io => ErrorCodeEnum::IoError,
            ErrorKind::ServerMemory => ErrorCodeEnum::ServerMemoryError,
            ErrorKind::Connection => ErrorCodeEnum::ConnectionError,
            ErrorKind::Syntax => ErrorCodeEnum::SyntaxError,
            ErrorKind::Type => ErrorCodeEnum::TypeError,
            ErrorKind::Value => ErrorCodeEnum::ValueError,
            ErrorKind::Name => ErrorCodeEnum::NameError,
            ErrorKind::FrameDependency => ErrorCodeEnum::FrameDependencyError,
            ErrorKind::Transaction => ErrorCodeEnum::TransactionError,
            ErrorKind::Security => ErrorCodeEnum::SecurityError,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Generic => "Server error",
            ErrorKind::NotImplemented => "Not implemented",
            ErrorKind::Arithmetic => "Arithmetic error",
            ErrorKind::Io => "IO error",
            ErrorKind::ServerMemory => "Server memory error",
            ErrorKind::Connection => "Connection error",
            ErrorKind::Syntax => "Syntax error",
            ErrorKind::Type => "Type error",
            ErrorKind::Value => "Value error",
            ErrorKind::Name => "Name error",
            ErrorKind::FrameDependency => "Frame dependency error",
            ErrorKind::Transaction => "Transaction error",
            ErrorKind::Security => "Security error",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure, failed handshake or version mismatch
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid, duplicate or unknown identifier detected locally
    #[error("Name error: {0}")]
    Name(String),

    #[error("Value error: {0}")]
    Value(String),

    #[error("Type error: {0}")]
    Type(String),

    /// A server payload that could not be parsed
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Error reported by the server for a request
    #[error("{kind}: {message}")]
    Server {
        kind: ErrorKind,
        message: String,
        trace: Option<String>,
    },

    /// A job reached the `failed` state
    #[error("Failed job. id={job_id} msg=\"{message}\"")]
    JobFailed {
        job_id: i64,
        kind: ErrorKind,
        message: String,
        trace: Option<String>,
    },
}

impl ClientError {
    /// Unified classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Connection(_) => ErrorKind::Connection,
            ClientError::Name(_) => ErrorKind::Name,
            ClientError::Value(_) => ErrorKind::Value,
            ClientError::Type(_) => ErrorKind::Type,
            ClientError::InvalidPayload(_) => ErrorKind::Generic,
            ClientError::Server { kind, .. } => *kind,
            ClientError::JobFailed { kind, .. } => *kind,
        }
    }

    /// Server-side trace, when the server supplied one.
    pub fn trace(&self) -> Option<&str> {
        match self {
            ClientError::Server { trace, .. } | ClientError::JobFailed { trace, .. } => {
                trace.as_deref()
            }
            _ => None,
        }
    }

    pub fn server(kind: ErrorKind, message: impl Into<String>, trace: Option<String>) -> Self {
        ClientError::Server {
            kind,
            message: message.into(),
            trace: trace.filter(|t| !t.is_empty()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Every transport-level failure surfaces as a connection error carrying the
/// transport's message.
impl From<Status> for ClientError {
    fn from(status: Status) -> Self {
        ClientError::Connection(status.message().to_string())
    }
}

impl From<tonic::transport::Error> for ClientError {
    fn from(err: tonic::transport::Error) -> Self {
        ClientError::Connection(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ErrorKind::Syntax.code(), "SYNTAX_ERROR");
        assert_eq!(ErrorKind::Name.code(), "NAME_ERROR");
        assert_eq!(ErrorKind::FrameDependency.code(), "FRAME_DEPENDENCY_ERROR");
        assert_eq!(ErrorKind::Generic.code(), "GENERIC_ERROR");
    }

    #[test]
    fn test_from_code_round_trips() {
        for kind in [
            ErrorKind::Generic,
            ErrorKind::NotImplemented,
            ErrorKind::Arithmetic,
            ErrorKind::Io,
            ErrorKind::ServerMemory,
            ErrorKind::Connection,
            ErrorKind::Syntax,
            ErrorKind::Type,
            ErrorKind::Value,
            ErrorKind::Name,
            ErrorKind::FrameDependency,
            ErrorKind::Transaction,
            ErrorKind::Security,
        ] {
            assert_eq!(ErrorKind::from_code(kind.code()), kind);
        }
    }

    #[test]
    fn test_unknown_codes_fall_back_to_generic() {
        assert_eq!(ErrorKind::from_code("QUANTUM_ERROR"), ErrorKind::Generic);
        assert_eq!(ErrorKind::from_wire(999), ErrorKind::Generic);
    }

    #[test]
    fn test_status_is_wrapped_as_connection_error() {
        let err: ClientError = Status::unavailable("socket closed").into();
        match err {
            ClientError::Connection(msg) => assert_eq!(msg, "socket closed"),
            other => panic!("Expected Connection error, got {:?}", other),
        }

        let err: ClientError = Status::invalid_argument("bad server id").into();
        assert_eq!(err.kind(), ErrorKind::Connection);
    }

    #[test]
    fn test_server_error_display_and_trace() {
        let err = ClientError::server(
            ErrorKind::Syntax,
            "unexpected token",
            Some("parser.cpp:10".to_string()),
        );
        assert_eq!(err.to_string(), "Syntax error: unexpected token");
        assert_eq!(err.trace(), Some("parser.cpp:10"));

        let err = ClientError::server(ErrorKind::Name, "missing", Some(String::new()));
        assert_eq!(err.trace(), None);
    }
}
