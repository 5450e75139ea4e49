//! # ACBrLib Boleto for Rust
//!
//! Safe Rust bindings for the ACBrLib Boleto native library: bank-slip
//! (boleto) issuance, printing, remittance and return files, and bank
//! parameter lookups. All business rules live in the native library; this
//! crate loads it, marshals arguments and answers, and turns its status codes
//! into typed errors.
//!
//! ## Features
//!
//! - **Bound up front**: every entry point is resolved when the library is loaded
//! - **Typed errors**: each native status maps to a [`BoletoError`] variant
//! - **Diagnostics included**: generic failures carry the library's own message
//! - **Serialized sharing**: [`SharedBoleto`] for multi-threaded and async callers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use acbrlib_boleto::{Boleto, OutputKind};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut boleto = Boleto::new("/opt/acbrlib/libacbrboleto64.so")?;
//!     boleto.initialize("", "")?;
//!
//!     boleto.select_bank("001")?;
//!     boleto.include_titles("titulos.ini", OutputKind::None)?;
//!     println!("{} titles queued", boleto.total_titles()?);
//!     println!("{}", boleto.typeable_line(0)?);
//!
//!     boleto.finalize()?;
//!     Ok(())
//! }
//! ```

// Core modules
pub mod boleto;
pub mod ffi;
pub mod types;

// Test modules (only included in test configuration)
#[cfg(test)]
pub mod __tests__;

// Re-export main types for convenience
pub use boleto::{Boleto, SessionState, SharedBoleto};

pub use ffi::{
    bindings::NativeBoleto,
    buffer::ResponseBuffer,
    error::{BoletoError, BoletoResult, ErrorKind},
    library_loader::{LibraryConfig, LibraryLoader},
};

pub use types::{
    config::BindingConfig, encoding::TextEncoding, output::OutputKind,
    lists::{parse_code_descriptions, parse_count, split_list},
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Install a `tracing` subscriber driven by `RUST_LOG`.
///
/// Applications that already install their own subscriber should skip this.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_with_config(InitConfig::default())
}

/// Install a `tracing` subscriber with a custom filter
pub fn init_with_config(
    config: InitConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter)
        .try_init()?;

    tracing::info!("{} v{} initialized", NAME, VERSION);
    Ok(())
}

/// Logging initialization configuration
#[derive(Debug)]
pub struct InitConfig {
    /// Log filter configuration
    pub log_filter: tracing_subscriber::EnvFilter,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            log_filter: tracing_subscriber::EnvFilter::from_default_env(),
        }
    }
}
