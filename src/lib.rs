//! # Sceneforge
//!
//! Streaming-response ingestion and code extraction for model-generated 3D
//! scenes. Consumes the chunked output of a long-running generation call,
//! separating reasoning commentary from artifact content and deriving live
//! progress labels, then deterministically extracts a single embeddable HTML
//! document from the accumulated output and applies two idempotent rewrites
//! (page-text suppression and camera reframing) before handing it to a
//! sandboxed viewer.

pub mod aggregator;
pub mod artifact;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-export commonly used types at the crate root.
pub use aggregator::{ProgressSink, StreamAggregator};
pub use artifact::ArtifactRewriter;
pub use config::{FramingConfig, PipelineConfig, load_config};
pub use error::{ExtractError, Result, SceneforgeError, StreamError};
pub use pipeline::{run_generation, run_generation_channel};
pub use types::{EmbeddableDocument, Fragment, FragmentBatch};
