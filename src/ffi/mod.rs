//! # FFI Module
//!
//! Foreign function interface to the ACBrLib Boleto library: the native
//! interface description, dynamic loading, response buffers and status
//! codes.

pub mod bindings;
pub mod buffer;
pub mod error;
pub mod library_loader;
pub mod status;

// Re-export main types
pub use bindings::NativeBoleto;
pub use buffer::ResponseBuffer;
pub use error::*;
pub use library_loader::{LibraryConfig, LibraryLoader};
