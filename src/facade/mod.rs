// In: src/facade/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Facade Layer
// ====================================================================================
//
// The facade is the public surface of the library. Callers see six functions with
// fixed signatures and never learn which backend produced the result.
//
//   1. [First call to any free function]
//         |
//         `-> FACADE.get_or_init(..)  (std::sync::OnceLock: runs exactly once)
//               |
//               `-> FacadeConfig::from_env()
//               `-> backend::loader::resolve(&config) -> Box<dyn Backend>
//
//   2. [Every later call]
//         |
//         `-> facade().<op>(..) -> backend.<op>(..)
//
// Independent `Facade` values can also be built from an explicit `FacadeConfig`;
// they never touch the process-wide instance.
// ====================================================================================
pub mod registry;

use serde::Serialize;
use std::sync::OnceLock;

use crate::backend::{loader, Backend, BackendKind, Number};
use crate::config::FacadeConfig;
use crate::error::DemopyError;
use crate::ffi::native::ABI_VERSION;
use crate::VERSION;

pub use registry::{FunctionRegistry, Value, EXPORTS};

/// Diagnostic summary of a resolved facade.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BackendInfo {
    pub kind: BackendKind,
    pub source: String,
    pub abi_version: u32,
    pub version: String,
}

/// A resolved backend plus the registry that dispatches to it by name.
pub struct Facade {
    backend: Box<dyn Backend>,
    registry: FunctionRegistry,
}

impl Facade {
    /// Resolves a backend for `config`. Never fails: an unavailable accelerated
    /// backend means the fallback is installed.
    pub fn resolve(config: &FacadeConfig) -> Self {
        Self::with_backend(loader::resolve(config))
    }

    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            registry: FunctionRegistry::new(),
        }
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn info(&self) -> BackendInfo {
        BackendInfo {
            kind: self.backend.kind(),
            source: self.backend.source(),
            abi_version: ABI_VERSION,
            version: VERSION.to_string(),
        }
    }

    pub fn hello(&self) -> String {
        self.backend.hello()
    }

    pub fn add(&self, a: i64, b: i64) -> Result<i64, DemopyError> {
        self.backend.add(a, b)
    }

    pub fn multiply(&self, a: f64, b: f64) -> f64 {
        self.backend.multiply(a, b)
    }

    pub fn sum_list(&self, numbers: &[i64]) -> Result<i64, DemopyError> {
        self.backend.sum_list(numbers)
    }

    pub fn reverse_string(&self, s: &str) -> Result<String, DemopyError> {
        self.backend.reverse_string(s)
    }

    pub fn power(&self, base: i64, exponent: i64) -> Result<Number, DemopyError> {
        self.backend.power(base, exponent)
    }

    /// Calls an exported function by name with positional arguments.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, DemopyError> {
        self.registry.invoke(self.backend.as_ref(), name, args)
    }

    /// Like `invoke`, with the arguments given as a JSON array and the result
    /// returned as JSON.
    pub fn invoke_json(&self, name: &str, args_json: &str) -> Result<String, DemopyError> {
        let args: Vec<Value> = serde_json::from_str(args_json)?;
        let result = self.invoke(name, &args)?;
        Ok(serde_json::to_string(&result)?)
    }
}

//==================================================================================
// Process-Wide Instance
//==================================================================================

static FACADE: OnceLock<Facade> = OnceLock::new();

/// The process-wide facade, resolved from the environment on first use.
pub fn facade() -> &'static Facade {
    FACADE.get_or_init(|| Facade::resolve(&FacadeConfig::from_env()))
}

/// Returns a greeting. The text names the active backend.
pub fn hello() -> String {
    facade().hello()
}

/// Checked integer addition.
pub fn add(a: i64, b: i64) -> Result<i64, DemopyError> {
    facade().add(a, b)
}

pub fn multiply(a: f64, b: f64) -> f64 {
    facade().multiply(a, b)
}

/// Sums `numbers`; `0` for an empty slice.
pub fn sum_list(numbers: &[i64]) -> Result<i64, DemopyError> {
    facade().sum_list(numbers)
}

/// Reverses the chars of `s`.
pub fn reverse_string(s: &str) -> Result<String, DemopyError> {
    facade().reverse_string(s)
}

/// `base` raised to `exponent`. See [`Backend`] for the full numeric policy.
pub fn power(base: i64, exponent: i64) -> Result<Number, DemopyError> {
    facade().power(base, exponent)
}

pub fn backend_kind() -> BackendKind {
    facade().kind()
}

pub fn backend_name() -> &'static str {
    facade().kind().name()
}

pub fn exported_names() -> &'static [&'static str] {
    &EXPORTS
}

#[cfg(test)]
mod tests;
