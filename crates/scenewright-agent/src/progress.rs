//! Progress events emitted while a goal runs.
//!
//! Each event renders as one line. The web page colours lines by prefix
//! (`LLM`, `TOOL CALL`, `TOOL RESPONSE`, `ERROR`, everything else is agent
//! output), so those prefixes are part of the contract.

use std::fmt;

use tokio::sync::mpsc;
use tracing::trace;

#[derive(Clone, Debug, PartialEq)]
pub enum Progress {
    /// Loop status, e.g. "Sending tool results back to LLM for next step...".
    Status(String),
    /// Something the model decided; rendered after an `LLM` prefix.
    Llm(String),
    ToolCall { name: String, arguments: String },
    ToolResponse { name: String, output: String },
    /// A line of the verification report.
    Verification(String),
    Error(String),
    /// The model's final answer.
    Final(String),
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Status(s) | Progress::Verification(s) => f.write_str(s),
            Progress::Llm(s) => write!(f, "LLM {s}"),
            Progress::ToolCall { name, arguments } => {
                write!(f, "TOOL CALL: Calling `{name}` with arguments: {arguments}")
            }
            Progress::ToolResponse { name, output } => {
                write!(f, "TOOL RESPONSE: `{name}` returned: {output}")
            }
            Progress::Error(s) => write!(f, "ERROR: {s}"),
            Progress::Final(s) => write!(f, "AGENT: {s}"),
        }
    }
}

/// Sending half handed to the loop.
///
/// A dropped receiver (closed browser tab, finished REPL line) must not abort
/// the run, so sends never fail.
#[derive(Clone, Debug)]
pub struct ProgressSink {
    tx: Option<mpsc::Sender<Progress>>,
}

impl ProgressSink {
    pub fn new(tx: mpsc::Sender<Progress>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sink that discards everything.
    pub fn none() -> Self {
        Self { tx: None }
    }

    pub async fn emit(&self, event: Progress) {
        trace!(line = %event, "progress");
        if let Some(tx) = &self.tx {
            // Receiver gone: keep running, the events are simply dropped.
            let _ = tx.send(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_prefixes() {
        assert_eq!(
            Progress::Llm("has decided to use tools. Executing...".into()).to_string(),
            "LLM has decided to use tools. Executing..."
        );
        assert_eq!(
            Progress::ToolCall {
                name: "clear_scene".into(),
                arguments: "{}".into()
            }
            .to_string(),
            "TOOL CALL: Calling `clear_scene` with arguments: {}"
        );
        assert!(Progress::ToolResponse {
            name: "clear_scene".into(),
            output: "{\"success\":true}".into()
        }
        .to_string()
        .starts_with("TOOL RESPONSE: `clear_scene` returned:"));
        assert_eq!(Progress::Error("boom".into()).to_string(), "ERROR: boom");
        assert_eq!(Progress::Final("Done.".into()).to_string(), "AGENT: Done.");
        assert_eq!(Progress::Status("Agent waking up...".into()).to_string(), "Agent waking up...");
    }

    #[tokio::test]
    async fn test_closed_receiver_does_not_fail() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sink = ProgressSink::new(tx);
        sink.emit(Progress::Status("still running".into())).await;
    }

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let sink = ProgressSink::new(tx);
        sink.emit(Progress::Status("one".into())).await;
        sink.emit(Progress::Final("two".into())).await;
        drop(sink);
        assert_eq!(rx.recv().await, Some(Progress::Status("one".into())));
        assert_eq!(rx.recv().await, Some(Progress::Final("two".into())));
        assert_eq!(rx.recv().await, None);
    }
}
