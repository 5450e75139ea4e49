//! # Boleto Module
//!
//! The high-level API: the binding facade and its shared, serialized
//! variant.

pub mod api;
pub mod shared;

pub use api::{Boleto, SessionState};
pub use shared::SharedBoleto;
