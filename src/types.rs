//! Fundamental types for the generation pipeline.
//!
//! A generation call delivers an ordered, finite sequence of fragment
//! batches. Each [`Fragment`] carries either reasoning commentary (`thought`)
//! or final-artifact text; the tag decides which accumulator receives it.
//! The pipeline's output is an [`EmbeddableDocument`], an immutable markup
//! document ready for a sandboxed viewer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One unit of streamed content from a generation call.
///
/// Wire names follow the provider's part format: a part with
/// `"thought": true` is reasoning/progress commentary, anything else is
/// final-artifact content. A fragment with no text is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Text payload; absent for non-text parts (which are skipped).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Whether this fragment is reasoning commentary rather than artifact
    /// content.
    #[serde(rename = "thought", default)]
    pub is_thought: bool,
}

impl Fragment {
    /// Create a reasoning/progress fragment.
    pub fn thought(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            is_thought: true,
        }
    }

    /// Create a final-artifact fragment.
    pub fn artifact(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            is_thought: false,
        }
    }

    /// Parse a single streamed content part into a fragment.
    ///
    /// Returns `None` for part shapes that carry no text (e.g. function
    /// calls or inline data), which the aggregator would skip anyway.
    pub fn from_part(part: &Value) -> Option<Self> {
        let text = match part.get("text").and_then(|t| t.as_str()) {
            Some(t) => t.to_string(),
            None => {
                debug!(?part, "Ignoring partless or non-text content part");
                return None;
            }
        };
        let is_thought = part
            .get("thought")
            .and_then(|t| t.as_bool())
            .unwrap_or(false);
        Some(Self {
            text: Some(text),
            is_thought,
        })
    }
}

/// One streamed chunk's worth of fragments, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentBatch {
    pub fragments: Vec<Fragment>,
}

impl FragmentBatch {
    /// Build a batch from a slice of fragments.
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Parse a provider streaming chunk (`candidates[0].content.parts[]`)
    /// into a batch. Missing candidates or parts yield an empty batch, not
    /// an error; heartbeat and usage-only chunks are normal mid-stream.
    pub fn from_stream_chunk(chunk: &Value) -> Self {
        let parts = match chunk["candidates"]
            .as_array()
            .and_then(|c| c.first())
            .and_then(|candidate| candidate["content"]["parts"].as_array())
        {
            Some(parts) => parts,
            None => return Self::default(),
        };

        let fragments = parts.iter().filter_map(Fragment::from_part).collect();
        Self { fragments }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Iterate over fragments in arrival order.
    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }
}

impl From<Vec<Fragment>> for FragmentBatch {
    fn from(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }
}

impl IntoIterator for FragmentBatch {
    type Item = Fragment;
    type IntoIter = std::vec::IntoIter<Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.into_iter()
    }
}

/// The final, fully rewritten markup document.
///
/// Immutable once produced; the only entity that outlives the generation
/// call that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddableDocument(String);

impl EmbeddableDocument {
    pub(crate) fn new(html: String) -> Self {
        Self(html)
    }

    /// Borrow the document markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the document, returning the markup string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EmbeddableDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fragment_constructors() {
        let t = Fragment::thought("**Planning**");
        assert!(t.is_thought);
        assert_eq!(t.text.as_deref(), Some("**Planning**"));

        let a = Fragment::artifact("<html>");
        assert!(!a.is_thought);
        assert_eq!(a.text.as_deref(), Some("<html>"));
    }

    #[test]
    fn test_fragment_from_part_text() {
        let part = serde_json::json!({"text": "hello"});
        let frag = Fragment::from_part(&part).unwrap();
        assert!(!frag.is_thought);
        assert_eq!(frag.text.as_deref(), Some("hello"));
    }

    #[test]
    fn test_fragment_from_part_thought() {
        let part = serde_json::json!({"text": "**Choosing palette**", "thought": true});
        let frag = Fragment::from_part(&part).unwrap();
        assert!(frag.is_thought);
    }

    #[test]
    fn test_fragment_from_part_non_text_skipped() {
        let part = serde_json::json!({"functionCall": {"name": "noop", "args": {}}});
        assert!(Fragment::from_part(&part).is_none());
    }

    #[test]
    fn test_fragment_deserialize_wire_names() {
        let frag: Fragment =
            serde_json::from_str(r#"{"text": "thinking...", "thought": true}"#).unwrap();
        assert!(frag.is_thought);
        assert_eq!(frag.text.as_deref(), Some("thinking..."));
    }

    #[test]
    fn test_fragment_deserialize_defaults() {
        let frag: Fragment = serde_json::from_str("{}").unwrap();
        assert!(!frag.is_thought);
        assert!(frag.text.is_none());
    }

    #[test]
    fn test_batch_from_stream_chunk() {
        let chunk = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "**Setting up the scene**", "thought": true},
                        {"text": "<html>"},
                    ],
                    "role": "model"
                }
            }]
        });
        let batch = FragmentBatch::from_stream_chunk(&chunk);
        assert_eq!(batch.len(), 2);
        assert!(batch.fragments[0].is_thought);
        assert!(!batch.fragments[1].is_thought);
    }

    #[test]
    fn test_batch_from_stream_chunk_no_candidates() {
        let chunk = serde_json::json!({"usageMetadata": {"promptTokenCount": 12}});
        let batch = FragmentBatch::from_stream_chunk(&chunk);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_batch_from_stream_chunk_skips_non_text_parts() {
        let chunk = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
                        {"text": "<canvas>"},
                    ],
                    "role": "model"
                }
            }]
        });
        let batch = FragmentBatch::from_stream_chunk(&chunk);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.fragments[0].text.as_deref(), Some("<canvas>"));
    }

    #[test]
    fn test_embeddable_document_accessors() {
        let doc = EmbeddableDocument::new("<html></html>".to_string());
        assert_eq!(doc.as_str(), "<html></html>");
        assert_eq!(doc.to_string(), "<html></html>");
        assert_eq!(doc.into_inner(), "<html></html>");
    }
}
