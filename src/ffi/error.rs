//! # Error Types for Native Calls
//!
//! This module defines the error taxonomy of the binding. Every negative
//! status returned by the native component becomes one variant here, carrying
//! the native code and a message.

use std::os::raw::c_int;

use thiserror::Error;

use crate::ffi::status;

/// Broad classification of a [`BoletoError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The native library could not be loaded or bound
    Binding,
    Initialization,
    Finalization,
    ConfigRead,
    ConfigNotFound,
    ConfigDirNotFound,
    /// Generic native failure, message fetched from the last-error call
    MethodCall,
    /// Negative status outside the documented set
    Native,
    InvalidParameter,
    InvalidResponse,
    Finalized,
    Configuration,
    Internal,
}

/// Main error type for the binding
#[derive(Error, Debug)]
pub enum BoletoError {
    #[error("Library loading failed: {0}")]
    LibraryLoad(#[from] libloading::Error),

    #[error("Library not found: {resource}")]
    LibraryNotFound { resource: String },

    #[error("Function not found: {function_name}")]
    FunctionNotFound { function_name: String },

    #[error("Falhas na inicialização da biblioteca")]
    Initialization,

    #[error("Falhas na finalização da biblioteca")]
    Finalization,

    #[error("Erro ao ler a configuração informada")]
    ConfigRead,

    #[error("Não foi possível localizar o arquivo INI informado")]
    ConfigNotFound,

    #[error("Não foi possível encontrar o diretório do arquivo INI")]
    ConfigDirNotFound,

    #[error("Falha na execução do método: {message}")]
    MethodCall { message: String },

    #[error("Native error {code}: {message}")]
    Native { code: c_int, message: String },

    #[error("Invalid parameter: {parameter} - {reason}")]
    InvalidParameter { parameter: String, reason: String },

    #[error("Invalid response from {operation}: {text:?}")]
    InvalidResponse { operation: String, text: String },

    #[error("Library already finalized, {operation} rejected")]
    Finalized { operation: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BoletoError {
    /// Builds the error for a negative native status, using `message` for
    /// the variants that carry native text. Returns `None` for successful
    /// statuses.
    pub fn from_status(code: c_int, message: impl Into<String>) -> Option<Self> {
        let error = match code {
            c if c >= 0 => return None,
            status::NOT_INITIALIZED => Self::Initialization,
            status::FINALIZATION_FAILED => Self::Finalization,
            status::CONFIG_READ_FAILED => Self::ConfigRead,
            status::CONFIG_NOT_FOUND => Self::ConfigNotFound,
            status::CONFIG_DIR_NOT_FOUND => Self::ConfigDirNotFound,
            status::METHOD_CALL_FAILED => Self::MethodCall {
                message: message.into(),
            },
            code => Self::Native {
                code,
                message: message.into(),
            },
        };
        Some(error)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LibraryLoad(_) | Self::LibraryNotFound { .. } | Self::FunctionNotFound { .. } => {
                ErrorKind::Binding
            }
            Self::Initialization => ErrorKind::Initialization,
            Self::Finalization => ErrorKind::Finalization,
            Self::ConfigRead => ErrorKind::ConfigRead,
            Self::ConfigNotFound => ErrorKind::ConfigNotFound,
            Self::ConfigDirNotFound => ErrorKind::ConfigDirNotFound,
            Self::MethodCall { .. } => ErrorKind::MethodCall,
            Self::Native { .. } => ErrorKind::Native,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            Self::Finalized { .. } => ErrorKind::Finalized,
            Self::Configuration(_) | Self::Io(_) => ErrorKind::Configuration,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Native status code behind this error, if it came from a native call
    pub fn code(&self) -> Option<c_int> {
        match self {
            Self::Initialization => Some(status::NOT_INITIALIZED),
            Self::Finalization => Some(status::FINALIZATION_FAILED),
            Self::ConfigRead => Some(status::CONFIG_READ_FAILED),
            Self::ConfigNotFound => Some(status::CONFIG_NOT_FOUND),
            Self::ConfigDirNotFound => Some(status::CONFIG_DIR_NOT_FOUND),
            Self::MethodCall { .. } => Some(status::METHOD_CALL_FAILED),
            Self::Native { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Message without the variant prefix. For `MethodCall` and `Native`
    /// this is the native text, verbatim.
    pub fn message(&self) -> String {
        match self {
            Self::MethodCall { message } | Self::Native { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type for binding operations
pub type BoletoResult<T> = Result<T, BoletoError>;

impl From<BoletoError> for std::io::Error {
    fn from(err: BoletoError) -> Self {
        match err {
            BoletoError::Io(io_err) => io_err,
            _ => std::io::Error::new(std::io::ErrorKind::Other, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_codes_have_no_error() {
        assert!(BoletoError::from_status(0, "").is_none());
        assert!(BoletoError::from_status(42, "").is_none());
    }

    #[test]
    fn test_documented_codes() {
        let cases = [
            (-1, ErrorKind::Initialization),
            (-2, ErrorKind::Finalization),
            (-3, ErrorKind::ConfigRead),
            (-5, ErrorKind::ConfigNotFound),
            (-6, ErrorKind::ConfigDirNotFound),
            (-10, ErrorKind::MethodCall),
            (-4, ErrorKind::Native),
        ];
        for (code, kind) in cases {
            let err = BoletoError::from_status(code, "x").unwrap();
            assert_eq!(err.kind(), kind);
            assert_eq!(err.code(), Some(code));
        }
    }

    #[test]
    fn test_config_dir_not_found_message() {
        let err = BoletoError::from_status(-6, "ignored").unwrap();
        assert_eq!(
            err.message(),
            "Não foi possível encontrar o diretório do arquivo INI"
        );
        assert_eq!(err.code(), Some(-6));
    }

    #[test]
    fn test_method_call_keeps_native_text() {
        let err = BoletoError::from_status(-10, "Banco não selecionado").unwrap();
        assert_eq!(err.message(), "Banco não selecionado");
        assert_eq!(
            err.to_string(),
            "Falha na execução do método: Banco não selecionado"
        );
    }

    #[test]
    fn test_binding_errors_have_no_code() {
        let err = BoletoError::FunctionNotFound {
            function_name: "Boleto_Nome".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Binding);
        assert_eq!(err.code(), None);
    }
}
