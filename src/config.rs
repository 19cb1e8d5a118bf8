// In: src/config.rs

//! The single source of truth for backend selection settings.
//!
//! `FacadeConfig` is read once at the process boundary (environment variables or a
//! JSON document) and handed to the loader. The process-wide facade is built from
//! `FacadeConfig::from_env()`; independent facades can be built from any config.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::DemopyError;

/// Selects the backend preference.
pub const ENV_BACKEND: &str = "DEMOPY_BACKEND";
/// Path of a shared library exporting the native `demopy_*` C ABI.
pub const ENV_NATIVE_LIB: &str = "DEMOPY_NATIVE_LIB";

//==================================================================================
// I. Backend Preference
//==================================================================================

/// How the loader should choose a backend.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendPreference {
    /// **Default:** Probe for the accelerated backend and fall back if it cannot be
    /// acquired.
    #[default]
    Auto,

    /// Skip the probe entirely and install the portable fallback.
    Fallback,
}

impl std::str::FromStr for BackendPreference {
    type Err = DemopyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "" => Ok(BackendPreference::Auto),
            "fallback" => Ok(BackendPreference::Fallback),
            other => Err(DemopyError::Config(format!(
                "Invalid backend preference '{}'. Must be 'auto' or 'fallback'.",
                other
            ))),
        }
    }
}

//==================================================================================
// II. The Unified FacadeConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct FacadeConfig {
    #[serde(default)]
    pub preference: BackendPreference,

    /// If set, the accelerated backend is loaded from this shared library instead
    /// of the kernels linked into the current process.
    #[serde(default)]
    pub library_path: Option<PathBuf>,
}

impl FacadeConfig {
    /// A config that always resolves to the fallback backend.
    pub fn fallback() -> Self {
        Self {
            preference: BackendPreference::Fallback,
            library_path: None,
        }
    }

    /// Builds a config from `DEMOPY_BACKEND` and `DEMOPY_NATIVE_LIB`.
    ///
    /// Backend selection must never fail, so an unparseable preference is logged
    /// and treated as `Auto`.
    pub fn from_env() -> Self {
        let preference = match std::env::var(ENV_BACKEND) {
            Ok(raw) => raw.parse().unwrap_or_else(|e: DemopyError| {
                log::warn!("Ignoring {}: {}", ENV_BACKEND, e);
                BackendPreference::Auto
            }),
            Err(_) => BackendPreference::Auto,
        };

        let library_path = std::env::var_os(ENV_NATIVE_LIB)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Self {
            preference,
            library_path,
        }
    }

    /// Parses a config from a JSON document, e.g. `{"preference": "fallback"}`.
    pub fn from_json(json: &str) -> Result<Self, DemopyError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_auto_without_library() {
        let config = FacadeConfig::default();
        assert_eq!(config.preference, BackendPreference::Auto);
        assert!(config.library_path.is_none());
    }

    #[test]
    fn test_preference_parsing() {
        assert_eq!("auto".parse::<BackendPreference>().unwrap(), BackendPreference::Auto);
        assert_eq!(
            " Fallback ".parse::<BackendPreference>().unwrap(),
            BackendPreference::Fallback
        );
        let err = "turbo".parse::<BackendPreference>().unwrap_err();
        assert!(matches!(err, DemopyError::Config(_)));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = FacadeConfig::from_json("{}").unwrap();
        assert_eq!(config, FacadeConfig::default());

        let config =
            FacadeConfig::from_json(r#"{"preference": "fallback", "library_path": "/opt/libdemopy.so"}"#)
                .unwrap();
        assert_eq!(config.preference, BackendPreference::Fallback);
        assert_eq!(config.library_path, Some(PathBuf::from("/opt/libdemopy.so")));
    }

    #[test]
    fn test_from_json_rejects_unknown_preference() {
        let result = FacadeConfig::from_json(r#"{"preference": "gpu"}"#);
        assert!(matches!(result, Err(DemopyError::SerdeJson(_))));
    }

    // Both variables are driven from one test so no other test sees them change
    // halfway through.
    #[test]
    fn test_from_env_never_fails() {
        std::env::set_var(ENV_BACKEND, "turbo");
        std::env::set_var(ENV_NATIVE_LIB, "");
        assert_eq!(
            FacadeConfig::from_env(),
            FacadeConfig {
                preference: BackendPreference::Auto,
                library_path: None,
            }
        );

        std::env::set_var(ENV_BACKEND, "FALLBACK");
        std::env::set_var(ENV_NATIVE_LIB, "/opt/demopy/libdemopy_gb_jj.so");
        let config = FacadeConfig::from_env();
        assert_eq!(config.preference, BackendPreference::Fallback);
        assert_eq!(
            config.library_path,
            Some(PathBuf::from("/opt/demopy/libdemopy_gb_jj.so"))
        );

        std::env::remove_var(ENV_BACKEND);
        std::env::remove_var(ENV_NATIVE_LIB);
        assert_eq!(FacadeConfig::from_env(), FacadeConfig::default());
    }
}
