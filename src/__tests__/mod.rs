//! # Test Modules
//!
//! Component tests for the facade, run against a scripted native library.

pub mod boleto_shared_test;
pub mod mock;

use crate::{BindingConfig, Boleto};
use mock::MockNative;

/// Facade over a clone of `mock`, default configuration
pub fn facade(mock: &MockNative) -> Boleto<MockNative> {
    Boleto::from_native(mock.clone(), BindingConfig::default())
}

/// Facade over a clone of `mock` with a custom configuration
pub fn facade_with(mock: &MockNative, config: BindingConfig) -> Boleto<MockNative> {
    Boleto::from_native(mock.clone(), config)
}
