//! # Binding Configuration
//!
//! Settings of the Rust side of the binding. The native component keeps its
//! own configuration in its INI file, reachable through
//! [`Boleto::config_read_value`](crate::Boleto::config_read_value) and
//! friends.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ffi::error::BoletoResult;
use crate::ffi::library_loader::{LibraryConfig, LIBRARY_PATH_ENV};
use crate::types::encoding::TextEncoding;

/// Environment variable selecting the text encoding
pub const ENCODING_ENV: &str = "ACBRLIB_ENCODING";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Shared library to load; platform search paths when unset
    pub library_path: Option<PathBuf>,
    pub encoding: TextEncoding,
    /// Fetch the complete answer through `Boleto_UltimoRetorno` when a
    /// response does not fit its buffer
    pub recover_truncated_responses: bool,
    /// Call `Boleto_Finalizar` when an initialized facade is dropped
    pub finalize_on_drop: bool,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            encoding: TextEncoding::Utf8,
            recover_truncated_responses: true,
            finalize_on_drop: true,
        }
    }
}

impl BindingConfig {
    pub fn with_library(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> BoletoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> BoletoResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Defaults overridden by `ACBRLIB_BOLETO_PATH` and `ACBRLIB_ENCODING`
    pub fn from_env() -> BoletoResult<Self> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var(LIBRARY_PATH_ENV) {
            config.library_path = Some(PathBuf::from(path));
        }
        if let Ok(encoding) = std::env::var(ENCODING_ENV) {
            config.encoding = encoding.parse()?;
        }
        Ok(config)
    }

    /// Library search configuration derived from these settings
    pub fn library_config(&self) -> LibraryConfig {
        match &self.library_path {
            Some(path) => LibraryConfig::with_path(path),
            None => LibraryConfig::default(),
        }
    }
}
