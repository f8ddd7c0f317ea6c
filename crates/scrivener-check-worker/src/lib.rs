//! Background spell-check worker.
//!
//! The check engine runs in an isolated execution context and is reached
//! only through [`CheckerInput`](scrivener_spellcheck::CheckerInput)
//! messages:
//! - in the browser, as a gloo-worker reactor (`SpellCheckReactor`) spawned
//!   from the page with [`CheckWorkerHost`]
//! - natively, on a dedicated thread ([`CheckWorkerHost`]) or as the
//!   `check_worker` binary speaking JSON lines over stdio

pub mod error;
pub mod telemetry;

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub mod native;
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub use native::{CheckWorkerHost, serve};

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod reactor;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod web;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use reactor::SpellCheckReactor;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use web::CheckWorkerHost;

pub use error::WorkerError;
pub use telemetry::LogConfig;
