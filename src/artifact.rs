//! Artifact extraction and rewriting.
//!
//! The model's raw output may wrap the generated document in a markdown
//! fence, surround it with prose, or emit it bare. [`ArtifactRewriter`]
//! extracts the first complete `<html>...</html>` root from the raw text and
//! applies two independent, idempotent rewrites that make it safe to embed
//! in a sandboxed viewer: hiding explanatory page text that would render
//! outside the 3D canvas, and normalizing the scene camera to a fixed
//! framing convention.
//!
//! The camera rewrite is a pattern-matching contract over the script text
//! (`camera.position.set(...)` calls and the `PerspectiveCamera` fov
//! argument), not semantic analysis of the scene. Scripts that construct
//! their camera some other way pass through unchanged.

use crate::config::FramingConfig;
use crate::error::ExtractError;
use crate::types::EmbeddableDocument;
use regex::Regex;
use tracing::{debug, warn};

/// Marker attribute on the injected style element; its presence makes the
/// text-visibility rewrite a no-op on a second pass.
const SUPPRESS_MARKER: &str = r#"data-role="suppress-page-text""#;

/// Extracts the embeddable document from raw model output and applies the
/// visibility-suppression and camera-framing rewrites.
///
/// All patterns are compiled once at construction.
pub struct ArtifactRewriter {
    framing: FramingConfig,
    open_root: Regex,
    close_root: Regex,
    head_tag: Regex,
    position_call: Regex,
    perspective_fov: Regex,
}

impl ArtifactRewriter {
    /// Create a rewriter using the given camera framing convention.
    pub fn new(framing: FramingConfig) -> Self {
        Self {
            framing,
            open_root: Regex::new(r"(?i)<html(\s[^>]*)?>").unwrap(),
            close_root: Regex::new(r"(?i)</html\s*>").unwrap(),
            head_tag: Regex::new(r"(?i)<head(\s[^>]*)?>").unwrap(),
            position_call: Regex::new(r"camera\.position\.set\s*\(\s*[^()]*\)").unwrap(),
            perspective_fov: Regex::new(r"(?P<ctor>new\s+THREE\.PerspectiveCamera\s*\(\s*)[0-9]+(\.[0-9]+)?")
                .unwrap(),
        }
    }

    /// Extract the first complete document root from raw model output.
    ///
    /// Everything outside the `<html ...>...</html>` span (fence markers,
    /// language annotations, surrounding commentary, any later roots) is
    /// discarded. Fails with [`ExtractError::NoDocumentRoot`] when no root
    /// pair is present; callers must treat that as terminal for the whole
    /// generation.
    pub fn extract_document(&self, raw: &str) -> Result<String, ExtractError> {
        let open = self
            .open_root
            .find(raw)
            .ok_or(ExtractError::NoDocumentRoot)?;
        let close = self
            .close_root
            .find_at(raw, open.end())
            .ok_or(ExtractError::NoDocumentRoot)?;
        Ok(raw[open.start()..close.end()].to_string())
    }

    /// Hide explanatory page text that would render outside the 3D canvas.
    ///
    /// Injects one marked `<style>` element (after `<head>` when present,
    /// otherwise after the root tag) that suppresses the visibility of body
    /// children other than the canvas, while re-asserting canvas visibility
    /// for scenes that nest it inside a container. The suppressed nodes stay
    /// in the document; scripts and structure are untouched. Applying the
    /// rewrite twice is a no-op.
    pub fn suppress_page_text(&self, doc: &str) -> String {
        if doc.contains(SUPPRESS_MARKER) {
            debug!("Page text already suppressed, skipping");
            return doc.to_string();
        }

        let style = format!(
            "<style {SUPPRESS_MARKER}>body > :not(canvas):not(script) {{ visibility: hidden !important; }} canvas {{ visibility: visible !important; }}</style>"
        );

        let insert_at = self
            .head_tag
            .find(doc)
            .or_else(|| self.open_root.find(doc))
            .map(|m| m.end());

        match insert_at {
            Some(at) => {
                let mut out = String::with_capacity(doc.len() + style.len());
                out.push_str(&doc[..at]);
                out.push_str(&style);
                out.push_str(&doc[at..]);
                out
            }
            None => {
                warn!("No injection point for text suppression, leaving document unchanged");
                doc.to_string()
            }
        }
    }

    /// Normalize camera placement to the configured framing convention.
    ///
    /// Rewrites every `camera.position.set(...)` call to the configured
    /// vantage position and the first argument of every
    /// `new THREE.PerspectiveCamera(...)` construction to the configured
    /// field of view. Purely textual; geometry, materials and the animation
    /// loop are untouched. Returns the document unchanged when no
    /// recognizable camera statement is present.
    ///
    /// Recognized shapes only: a position call with a flat argument list
    /// (no nested calls inside the parentheses) and a numeric-literal field
    /// of view. Anything else, such as `set(Math.cos(t), ...)` or a `fov`
    /// variable, is left intact rather than risking a partial rewrite that
    /// breaks the script.
    pub fn reframe_camera(&self, doc: &str) -> String {
        let [x, y, z] = self.framing.position;
        let position = format!("camera.position.set({x}, {y}, {z})");
        let fov = format!("${{ctor}}{}", self.framing.fov);

        let repositioned = self.position_call.replace_all(doc, position.as_str());
        let reframed = self.perspective_fov.replace_all(&repositioned, fov.as_str());

        if reframed == doc {
            warn!("No recognizable camera statement, leaving framing as generated");
        }
        reframed.into_owned()
    }

    /// Produce the final embeddable document from raw accumulated output.
    ///
    /// Extraction runs first and is the only stage that can fail; the two
    /// rewrites then run in a fixed order (suppression, then framing). They
    /// target disjoint regions and commute, but pinning one order keeps the
    /// output deterministic.
    pub fn prepare(&self, raw: &str) -> Result<EmbeddableDocument, ExtractError> {
        let doc = self.extract_document(raw)?;
        let doc = self.suppress_page_text(&doc);
        let doc = self.reframe_camera(&doc);
        Ok(EmbeddableDocument::new(doc))
    }
}

impl Default for ArtifactRewriter {
    fn default() -> Self {
        Self::new(FramingConfig::default())
    }
}
