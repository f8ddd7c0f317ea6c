//! Native check worker: a dedicated OS thread running the engine.
//!
//! The thread owns a current-thread tokio runtime and drains an unbounded
//! channel one input at a time, so a `CHECK_TEXT` never overlaps another and
//! the engine state is touched only from that thread. Outputs are handed to
//! the callback given at spawn time, on the worker thread.

use std::thread::JoinHandle;

use scrivener_spellcheck::{
    CheckEngine, CheckerChannel, CheckerInput, CheckerOutput, SpellCheckConfig, SpellCheckError,
};
use tokio::sync::mpsc;

use crate::error::WorkerError;

const THREAD_NAME: &str = "scrivener-check-worker";

/// Host-side handle to a check worker thread.
///
/// ```ignore
/// let host = CheckWorkerHost::spawn(SpellCheckConfig::from_env(), |output| {
///     if let CheckerOutput::CheckResult { invalid_words, .. } = output {
///         // repaint spans
///     }
/// })?;
/// host.send(CheckerInput::CheckText { full_text: "Helo".into(), request_id: None })?;
/// ```
pub struct CheckWorkerHost {
    tx: Option<mpsc::UnboundedSender<CheckerInput>>,
    thread: Option<JoinHandle<()>>,
}

impl CheckWorkerHost {
    pub fn spawn(
        config: SpellCheckConfig,
        on_output: impl Fn(CheckerOutput) + Send + 'static,
    ) -> Result<Self, WorkerError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let thread = std::thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread().build() {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        tracing::error!(target: "scrivener::worker", "failed to build worker runtime: {e}");
                        return;
                    }
                };
                runtime.block_on(serve(&config, rx, on_output));
            })
            .map_err(WorkerError::Spawn)?;

        tracing::debug!(target: "scrivener::worker", "check worker started");
        Ok(Self {
            tx: Some(tx),
            thread: Some(thread),
        })
    }

    /// Close the input channel and wait for queued inputs to finish.
    pub fn shutdown(mut self) -> Result<(), WorkerError> {
        self.close()
    }

    fn close(&mut self) -> Result<(), WorkerError> {
        self.tx.take();
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| WorkerError::Panicked),
            None => Ok(()),
        }
    }
}

impl CheckerChannel for CheckWorkerHost {
    fn send(&self, input: CheckerInput) -> Result<(), SpellCheckError> {
        let tx = self.tx.as_ref().ok_or(SpellCheckError::ChannelClosed)?;
        tx.send(input).map_err(|_| SpellCheckError::ChannelClosed)
    }
}

impl Drop for CheckWorkerHost {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::error!(target: "scrivener::worker", "check worker did not shut down cleanly: {e}");
        }
    }
}

/// Run an engine over `rx` until every sender is gone.
pub async fn serve(
    config: &SpellCheckConfig,
    mut rx: mpsc::UnboundedReceiver<CheckerInput>,
    emit: impl Fn(CheckerOutput),
) {
    let mut engine = CheckEngine::new(config);
    while let Some(input) = rx.recv().await {
        tracing::trace!(target: "scrivener::worker", ?input, "received message");
        if let Some(output) = engine.handle(input, tokio::task::yield_now).await {
            emit(output);
        }
    }
    tracing::debug!(target: "scrivener::worker", "input channel closed, worker exiting");
}
