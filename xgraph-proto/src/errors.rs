//! Error payloads attached to every response

/// Server error classification codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ErrorCodeEnum {
    GenericError = 0,
    NotImplemented = 1,
    ArithmeticError = 2,
    IoError = 3,
    ServerMemoryError = 4,
    ConnectionError = 5,
    SyntaxError = 6,
    TypeError = 7,
    ValueError = 8,
    NameError = 9,
    FrameDependencyError = 10,
    TransactionError = 11,
    SecurityError = 12,
}

impl ErrorCodeEnum {
    /// Wire name of the code, as it appears in JSON payloads.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            ErrorCodeEnum::GenericError => "GENERIC_ERROR",
            ErrorCodeEnum::NotImplemented => "NOT_IMPLEMENTED",
            ErrorCodeEnum::ArithmeticError => "ARITHMETIC_ERROR",
            ErrorCodeEnum::IoError => "IO_ERROR",
            ErrorCodeEnum::ServerMemoryError => "SERVER_MEMORY_ERROR",
            ErrorCodeEnum::ConnectionError => "CONNECTION_ERROR",
            ErrorCodeEnum::SyntaxError => "SYNTAX_ERROR",
            ErrorCodeEnum::TypeError => "TYPE_ERROR",
            ErrorCodeEnum::ValueError => "VALUE_ERROR",
            ErrorCodeEnum::NameError => "NAME_ERROR",
            ErrorCodeEnum::FrameDependencyError => "FRAME_DEPENDENCY_ERROR",
            ErrorCodeEnum::TransactionError => "TRANSACTION_ERROR",
            ErrorCodeEnum::SecurityError => "SECURITY_ERROR",
        }
    }

    pub fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "GENERIC_ERROR" => Some(Self::GenericError),
            "NOT_IMPLEMENTED" => Some(Self::NotImplemented),
            "ARITHMETIC_ERROR" => Some(Self::ArithmeticError),
            "IO_ERROR" => Some(Self::IoError),
            "SERVER_MEMORY_ERROR" => Some(Self::ServerMemoryError),
            "CONNECTION_ERROR" => Some(Self::ConnectionError),
            "SYNTAX_ERROR" => Some(Self::SyntaxError),
            "TYPE_ERROR" => Some(Self::TypeError),
            "VALUE_ERROR" => Some(Self::ValueError),
            "NAME_ERROR" => Some(Self::NameError),
            "FRAME_DEPENDENCY_ERROR" => Some(Self::FrameDependencyError),
            "TRANSACTION_ERROR" => Some(Self::TransactionError),
            "SECURITY_ERROR" => Some(Self::SecurityError),
            _ => None,
        }
    }
}

/// One server-reported error
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ErrorMessage {
    #[prost(enumeration = "ErrorCodeEnum", tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub error_detail_message: String,
    /// Server-side trace lines
    #[prost(string, repeated, tag = "3")]
    pub detail: Vec<String>,
}
