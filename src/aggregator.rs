//! Stream aggregation for one generation call.
//!
//! The generation service streams heterogeneous fragments: reasoning
//! commentary tagged as thoughts, and final-artifact content. The
//! [`StreamAggregator`] routes each fragment to the right accumulator,
//! derives a live progress label from the thought text as it arrives, and
//! yields the raw artifact text exactly once when the stream is exhausted.
//!
//! An aggregator is single-use: `finalize` consumes it, and an abandoned
//! (cancelled) aggregator is simply dropped without finalizing.

use crate::error::StreamError;
use crate::types::Fragment;
use regex::Regex;
use tracing::debug;

/// Caller-supplied sink for progress labels, invoked synchronously from
/// `consume`. An `Err` return aborts aggregation for the call.
pub type ProgressSink =
    Box<dyn FnMut(&str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send>;

/// Accumulates one generation call's fragment stream.
///
/// Thought fragments grow an internal buffer that is rescanned for the
/// latest `**bold**` header on every append; artifact fragments grow the raw
/// artifact text. Neither buffer is exposed; only derived labels and the
/// finalized artifact text escape.
pub struct StreamAggregator {
    thought_buffer: String,
    artifact_text: String,
    last_label: Option<String>,
    sink: Option<ProgressSink>,
    label_pattern: Regex,
}

impl StreamAggregator {
    /// Create an aggregator with no progress sink (labels are computed but
    /// go nowhere).
    pub fn new() -> Self {
        Self {
            thought_buffer: String::new(),
            artifact_text: String::new(),
            last_label: None,
            sink: None,
            // Bold-marker pairs with no nested markers; the innermost
            // character class rules out `****` producing an empty label.
            label_pattern: Regex::new(r"\*\*([^*]+)\*\*").unwrap(),
        }
    }

    /// Attach a progress sink that receives each newly derived label.
    pub fn with_progress<F>(mut self, sink: F) -> Self
    where
        F: FnMut(&str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + 'static,
    {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Consume one fragment, in arrival order.
    ///
    /// Thought text is appended to the thought buffer and may produce a
    /// progress label; artifact text is appended to the raw artifact text.
    /// Fragments without text are skipped. The only error is a failing
    /// progress sink, after which the aggregator must be discarded.
    pub fn consume(&mut self, fragment: &Fragment) -> Result<(), StreamError> {
        let text = match fragment.text.as_deref() {
            Some(t) => t,
            None => {
                debug!("Skipping fragment with no text content");
                return Ok(());
            }
        };

        if fragment.is_thought {
            self.thought_buffer.push_str(text);
            self.emit_latest_label()
        } else {
            self.artifact_text.push_str(text);
            Ok(())
        }
    }

    /// Rescan the whole thought buffer for the most recently closed bold
    /// header and push it to the sink if it changed.
    ///
    /// Rescanning from the start trades repeated work (bounded by one model
    /// turn's thought output) for correctness under arbitrary fragment
    /// boundaries: a header whose closing `**` lands several fragments after
    /// its opener is still detected the moment it closes.
    fn emit_latest_label(&mut self) -> Result<(), StreamError> {
        let candidate = match self
            .label_pattern
            .captures_iter(&self.thought_buffer)
            .last()
            .map(|caps| caps[1].trim().to_string())
        {
            Some(c) if !c.is_empty() => c,
            _ => return Ok(()),
        };

        if self.last_label.as_deref() == Some(candidate.as_str()) {
            return Ok(());
        }

        debug!(label = candidate.as_str(), "New progress label");
        if let Some(sink) = self.sink.as_mut() {
            sink(&candidate).map_err(|e| StreamError::SinkFailed {
                message: e.to_string(),
            })?;
        }
        self.last_label = Some(candidate);
        Ok(())
    }

    /// Finish the stream and return the accumulated raw artifact text.
    ///
    /// Takes the aggregator by value: it cannot be finalized twice or fed
    /// further fragments afterwards.
    pub fn finalize(self) -> String {
        self.artifact_text
    }
}

impl Default for StreamAggregator {
    fn default() -> Self {
        Self::new()
    }
}
