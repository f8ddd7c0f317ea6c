//! Web worker reactor hosting the check engine.

use std::time::Duration;

use futures_util::sink::SinkExt;
use futures_util::stream::StreamExt;
use gloo_worker::reactor::{ReactorScope, reactor};
use scrivener_spellcheck::{CheckEngine, CheckerInput, CheckerOutput, SpellCheckConfig};

/// Check worker that owns the dictionary, custom words and verdict cache.
#[reactor]
pub async fn SpellCheckReactor(mut scope: ReactorScope<CheckerInput, CheckerOutput>) {
    let mut engine = CheckEngine::new(&SpellCheckConfig::default());

    loop {
        let Some(msg) = scope.next().await else { break };
        tracing::trace!(?msg, "Worker: received message");
        let Some(output) = engine.handle(msg, yield_to_host).await else {
            continue;
        };
        if let Err(e) = scope.send(output).await {
            tracing::error!("Failed to send output to host: {e}");
        }
    }
}

/// Give the worker's event loop a turn so queued messages are accepted
/// while a long check runs.
async fn yield_to_host() {
    n0_future::time::sleep(Duration::ZERO).await;
}
