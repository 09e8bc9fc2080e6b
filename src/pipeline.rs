//! End-to-end driver for one generation call.
//!
//! A generation produces an ordered, finite, non-restartable stream of
//! fragment batches. The driver resumes the aggregator synchronously on each
//! fragment as batches arrive, and only when the stream is exhausted hands
//! the finalized raw text to the rewriter, exactly once. Abandoning the stream
//! mid-flight (e.g. the request was superseded) drops the aggregator without
//! finalizing it.

use crate::aggregator::StreamAggregator;
use crate::artifact::ArtifactRewriter;
use crate::error::Result;
use crate::types::{EmbeddableDocument, FragmentBatch};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

/// Consume a fragment-batch stream to completion and produce the final
/// embeddable document.
///
/// The aggregator is moved in (it is single-use) and should carry the
/// caller's progress sink; the rewriter is reusable across generations. Any
/// sink failure or extraction failure aborts the run with no partial
/// artifact.
pub async fn run_generation<S>(
    mut batches: S,
    mut aggregator: StreamAggregator,
    rewriter: &ArtifactRewriter,
) -> Result<EmbeddableDocument>
where
    S: Stream<Item = FragmentBatch> + Unpin,
{
    let mut batch_count = 0usize;
    while let Some(batch) = batches.next().await {
        batch_count += 1;
        for fragment in batch.iter() {
            aggregator.consume(fragment)?;
        }
    }

    let raw = aggregator.finalize();
    debug!(
        batches = batch_count,
        raw_len = raw.len(),
        "Fragment stream complete, extracting document"
    );

    Ok(rewriter.prepare(&raw)?)
}

/// Variant of [`run_generation`] for callers that deliver batches over a
/// bounded channel from the task reading the provider's wire stream.
///
/// Dropping the receiver before the sender finishes (a superseded request)
/// abandons the generation; nothing is finalized and the sender observes the
/// closed channel.
pub async fn run_generation_channel(
    batches: mpsc::Receiver<FragmentBatch>,
    aggregator: StreamAggregator,
    rewriter: &ArtifactRewriter,
) -> Result<EmbeddableDocument> {
    run_generation(ReceiverStream::new(batches), aggregator, rewriter).await
}
