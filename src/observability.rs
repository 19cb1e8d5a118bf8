//! Logging hooks for the facade.
//!
//! Backend resolution is the only decision this library makes at runtime, so it is
//! the one thing worth making visible. `log_metric!` emits a structured key/value
//! line through the `log` facade in debug builds only, and `init_logging` installs
//! an `env_logger` backend for callers (such as the Python module) that have none.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::sync::Once;

/// Logs a structured key-value metric string at `debug` level, only in debug builds.
///
/// # Example
/// ```
/// use demopy_gb_jj::log_metric;
/// let backend = "fallback";
/// log_metric!("event"="backend_resolved", "backend"=backend);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            $crate::__log::debug!("DEMOPY_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` at `Info` level, optionally appending to `log_file`.
///
/// Only the first call has any effect. If another logger is already installed,
/// it is left in place.
pub fn init_logging(log_file: Option<&str>) {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Info);

        // Just the level and the message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(filename) = log_file {
            match OpenOptions::new().append(true).create(true).open(filename) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                }
                Err(e) => {
                    eprintln!("[WARN] Could not open log file '{}': {}", filename, e);
                }
            }
        }

        let _ = builder.try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(None);
        init_logging(None);
        log::info!("logger installed");
    }

    #[test]
    fn test_log_metric_accepts_mixed_values() {
        let lanes = 4;
        log_metric!("event" = "test", "lanes" = &lanes, "ok" = true);
    }
}
