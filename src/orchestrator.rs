//! Runs one prompt chain call inside a telemetry trace.

use crate::chain::PromptChain;
use crate::error::Result;
use crate::llm::{Completion, CompletionModel};
use crate::telemetry::{TelemetrySink, TraceContext, TraceStatus};

/// The query run when none is given on the command line.
pub const EXAMPLE_QUERY: &str =
    "I like the following artists: Drake, Future. Can I get 5 song recommendations?";

const TRACE_NAME: &str = "song-recommendation";

/// Closes its trace exactly once when dropped.
struct TraceGuard<'a> {
    sink: &'a dyn TelemetrySink,
    trace: Option<TraceContext>,
    status: TraceStatus,
}

impl<'a> TraceGuard<'a> {
    fn start(sink: &'a dyn TelemetrySink, name: &str) -> Self {
        Self {
            sink,
            trace: sink.start_trace(name),
            status: TraceStatus::Error("interrupted before completion".to_string()),
        }
    }

    fn finish(mut self, status: TraceStatus) {
        self.status = status;
    }
}

impl Drop for TraceGuard<'_> {
    fn drop(&mut self) {
        if let Some(trace) = self.trace.take() {
            let status = std::mem::replace(&mut self.status, TraceStatus::Success);
            self.sink.end_trace(trace, status);
        }
    }
}

/// Wires a prompt chain to a telemetry sink.
pub struct Orchestrator<M, T> {
    chain: PromptChain<M>,
    telemetry: T,
}

impl<M: CompletionModel, T: TelemetrySink> Orchestrator<M, T> {
    pub fn new(chain: PromptChain<M>, telemetry: T) -> Self {
        Self { chain, telemetry }
    }

    /// Run the chain for `query`.
    ///
    /// The trace is closed before this returns, whatever the outcome.
    /// Errors from the chain are returned unchanged.
    pub async fn run(&self, query: &str) -> Result<Completion> {
        let guard = TraceGuard::start(&self.telemetry, TRACE_NAME);

        let result = self.chain.run(query).await;

        guard.finish(match &result {
            Ok(_) => TraceStatus::Success,
            Err(e) => TraceStatus::Error(e.to_string()),
        });

        result
    }
}
