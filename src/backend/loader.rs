// In: src/backend/loader.rs

//! The load-time factory that picks the backend.
//!
//! Resolution order:
//!   1. `BackendPreference::Fallback` installs the fallback without probing.
//!   2. A configured `library_path` is opened, its ABI resolved and its version
//!      checked.
//!   3. Otherwise the linked kernels are used when built with feature `native`.
//!   4. Anything else installs the fallback.
//!
//! A failed probe is never an error for the caller. It only decides which
//! implementation is installed.

use crate::backend::{AcceleratedBackend, Backend, FallbackBackend};
use crate::config::{BackendPreference, FacadeConfig};
use crate::error::DemopyError;

/// Attempts to acquire the accelerated backend, once, without retries.
pub fn probe_accelerated(config: &FacadeConfig) -> Result<AcceleratedBackend, DemopyError> {
    if config.preference == BackendPreference::Fallback {
        return Err(DemopyError::BackendUnavailable(
            "fallback backend requested by configuration".to_string(),
        ));
    }

    if let Some(path) = &config.library_path {
        return AcceleratedBackend::load(path);
    }

    linked_kernels()
}

#[cfg(feature = "native")]
fn linked_kernels() -> Result<AcceleratedBackend, DemopyError> {
    AcceleratedBackend::linked()
}

#[cfg(not(feature = "native"))]
fn linked_kernels() -> Result<AcceleratedBackend, DemopyError> {
    Err(DemopyError::BackendUnavailable(
        "built without native kernels and no library configured".to_string(),
    ))
}

/// Resolves the backend for `config`. Always succeeds.
pub fn resolve(config: &FacadeConfig) -> Box<dyn Backend> {
    let backend: Box<dyn Backend> = match probe_accelerated(config) {
        Ok(accelerated) => Box::new(accelerated),
        Err(e) => {
            // A library the user pointed us at failing to load is worth a warning;
            // the other reasons are expected configurations.
            if config.library_path.is_some()
                && config.preference != BackendPreference::Fallback
            {
                log::warn!("Accelerated backend unavailable, using fallback: {}", e);
            } else {
                log::info!("Using fallback backend: {}", e);
            }
            Box::new(FallbackBackend::new())
        }
    };

    log::info!(
        "demopy backend resolved: {} ({})",
        backend.kind(),
        backend.source()
    );
    log_metric!(
        "event" = "backend_resolved",
        "backend" = backend.kind(),
        "source" = backend.source()
    );

    backend
}
