//! # Shared Facade
//!
//! The native component is not thread-safe, so one facade must only ever
//! run one call at a time. [`SharedBoleto`] puts a facade behind a mutex and
//! offers an async entry point that runs the blocking native call on tokio's
//! blocking pool.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::boleto::api::Boleto;
use crate::ffi::bindings::NativeBoleto;
use crate::ffi::error::{BoletoError, BoletoResult};
use crate::ffi::library_loader::LibraryLoader;

/// Cloneable handle that serializes access to one [`Boleto`]
#[derive(Debug)]
pub struct SharedBoleto<N: NativeBoleto = LibraryLoader> {
    inner: Arc<Mutex<Boleto<N>>>,
}

impl<N: NativeBoleto> Clone for SharedBoleto<N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<N: NativeBoleto> SharedBoleto<N> {
    pub fn new(boleto: Boleto<N>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(boleto)),
        }
    }

    /// Exclusive synchronous access
    pub fn lock(&self) -> BoletoResult<MutexGuard<'_, Boleto<N>>> {
        self.inner
            .lock()
            .map_err(|_| BoletoError::Internal("facade mutex poisoned".to_string()))
    }

    /// Run `f` with exclusive access on the blocking pool
    pub async fn run<F, T>(&self, f: F) -> BoletoResult<T>
    where
        N: Send + 'static,
        F: FnOnce(&mut Boleto<N>) -> BoletoResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = self.inner.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let mut boleto = inner
                .lock()
                .map_err(|_| BoletoError::Internal("facade mutex poisoned".to_string()))?;
            f(&mut *boleto)
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(e) => {
                debug!("Blocking native call did not complete: {}", e);
                Err(BoletoError::Internal(format!("native call task failed: {e}")))
            }
        }
    }
}
