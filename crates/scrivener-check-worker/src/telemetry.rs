//! Logging setup for the check worker.
//!
//! Natively, logs go to stderr through a compact `fmt` layer so stdout stays
//! free for the JSON-lines protocol. In a web worker they go to the browser
//! console through `tracing-wasm`.
//!
//! ```ignore
//! let config = LogConfig::from_env("check-worker");
//! telemetry::init(config)?;
//! ```

use tracing::Level;

use crate::error::WorkerError;

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Service name attached to the startup log line.
    pub service_name: String,
    /// Default level when `RUST_LOG` is unset (INFO, DEBUG in debug builds).
    pub console_level: Level,
}

impl LogConfig {
    /// `RUST_LOG`, when set, overrides `console_level`.
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        Self {
            service_name: service_name.into(),
            console_level,
        }
    }

    fn default_directive(&self) -> String {
        self.console_level.as_str().to_lowercase()
    }
}

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub fn init(config: LogConfig) -> Result<(), WorkerError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, Layer};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .map_err(|e| WorkerError::Logging(e.to_string()))?;

    tracing::info!(service = %config.service_name, "logging initialized");
    Ok(())
}

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub fn init(config: LogConfig) -> Result<(), WorkerError> {
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(config.console_level)
            .build(),
    );
    let filter = EnvFilter::new(config.default_directive());
    let reg = Registry::default().with(filter).with(wasm_layer);

    set_global_default(reg).map_err(|e| WorkerError::Logging(e.to_string()))?;
    tracing::info!(service = %config.service_name, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_follows_level() {
        let config = LogConfig {
            service_name: "check-worker".into(),
            console_level: Level::WARN,
        };
        assert_eq!(config.default_directive(), "warn");
    }
}
