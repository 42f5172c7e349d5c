//! Best-effort compaction
//!
//! Works on a copy so the merged document is untouched if anything fails.

use lopdf::Document;

use crate::types::OptimizationError;

/// Outcome of a successful compaction
#[derive(Debug)]
pub struct Compacted {
    pub bytes: Vec<u8>,
    pub pruned_objects: usize,
}

/// Drop unreachable objects and empty streams, renumber and recompress,
/// then serialize. The result is re-read to make sure no page was lost.
pub fn compact(doc: &Document) -> Result<Compacted, OptimizationError> {
    let before = doc.get_pages().len();
    let mut candidate = doc.clone();

    let mut pruned_objects = candidate.prune_objects().len();
    pruned_objects += candidate.delete_zero_length_streams().len();
    candidate.renumber_objects();
    candidate.compress();

    let mut bytes = Vec::new();
    candidate.save_to(&mut bytes)?;

    let after = Document::load_mem(&bytes)?.get_pages().len();
    if after != before {
        return Err(OptimizationError::PageCountChanged { before, after });
    }

    log::info!(
        "Compaction removed {} objects, {} bytes written",
        pruned_objects,
        bytes.len()
    );
    Ok(Compacted {
        bytes,
        pruned_objects,
    })
}
