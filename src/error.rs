//! Error types for the sceneforge pipeline.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering the two conditions that cross the component boundary: a failed
//! progress sink during aggregation and a missing document root during
//! extraction. Degraded rewrites (nothing to suppress or reframe) are not
//! errors and never appear here.

/// Top-level error type for the sceneforge library.
#[derive(Debug, thiserror::Error)]
pub enum SceneforgeError {
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),
}

/// Errors raised while consuming the fragment stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The caller-supplied progress sink returned an error. Aggregation for
    /// the call is abandoned; the partial artifact text is untrustworthy.
    #[error("Progress sink failed: {message}")]
    SinkFailed { message: String },
}

/// Errors raised while extracting the embeddable document.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// No `<html>...</html>` root element pair was found in the accumulated
    /// raw text. Terminal for the whole generation attempt.
    #[error("No embeddable document root found in model output")]
    NoDocumentRoot,
}

/// A type alias for results using the top-level `SceneforgeError`.
pub type Result<T> = std::result::Result<T, SceneforgeError>;
