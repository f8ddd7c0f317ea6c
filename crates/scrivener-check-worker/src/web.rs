//! Host-side management for the check web worker.
//!
//! The reactor bridge is neither `Send` nor usable from a sync callback, so
//! inputs go through an unbounded channel and a local task forwards them into
//! the bridge. A second local task delivers outputs to the callback.

use futures_util::{SinkExt, StreamExt};
use gloo_worker::Spawnable;
use scrivener_spellcheck::{CheckerChannel, CheckerInput, CheckerOutput, SpellCheckError};
use tokio::sync::mpsc;

use crate::reactor::SpellCheckReactor;

/// Host-side handle to the check web worker.
///
/// ```ignore
/// let host = CheckWorkerHost::spawn("/check_worker.js", |output| match output {
///     CheckerOutput::CheckResult { invalid_words, .. } => { /* repaint */ }
///     _ => {}
/// });
/// let mut client = SpellCheckClient::new(host, SpellCheckConfig::default());
/// ```
pub struct CheckWorkerHost {
    tx: mpsc::UnboundedSender<CheckerInput>,
}

impl CheckWorkerHost {
    /// Spawn the worker; `worker_url` points at the compiled worker script,
    /// typically "/check_worker.js".
    pub fn spawn(worker_url: &str, on_output: impl Fn(CheckerOutput) + 'static) -> Self {
        let bridge = SpellCheckReactor::spawner().spawn(worker_url);
        let (mut sink, mut stream) = bridge.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<CheckerInput>();

        wasm_bindgen_futures::spawn_local(async move {
            while let Some(input) = rx.recv().await {
                if let Err(e) = sink.send(input).await {
                    tracing::error!("Failed to send input to check worker: {e}");
                    break;
                }
            }
        });

        wasm_bindgen_futures::spawn_local(async move {
            while let Some(output) = stream.next().await {
                on_output(output);
            }
            tracing::debug!("check worker output stream ended");
        });

        Self { tx }
    }
}

impl CheckerChannel for CheckWorkerHost {
    fn send(&self, input: CheckerInput) -> Result<(), SpellCheckError> {
        self.tx
            .send(input)
            .map_err(|_| SpellCheckError::ChannelClosed)
    }
}
