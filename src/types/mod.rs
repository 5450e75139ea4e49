//! # Type Definitions
//!
//! Value types and response parsers used by the facade.

pub mod config;
pub mod encoding;
pub mod lists;
pub mod output;

// Re-export main types
pub use config::BindingConfig;
pub use encoding::TextEncoding;
pub use lists::{parse_code_descriptions, parse_count, split_list};
pub use output::OutputKind;
