//! Messages exchanged between the coordinator and worker threads

use crate::Result;
use crate::hashing::HashOptions;
use std::sync::Arc;

/// A single hash request, correlated by `id`
#[derive(Debug, Clone)]
pub(crate) struct HashRequest {
    pub id: u64,
    pub text: String,
    pub algorithm: String,
    pub options: Arc<HashOptions>,
}

/// One input of a bulk request
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BulkItem {
    pub text: String,
    /// Position in the caller's input list
    pub original_index: usize,
}

/// A bounded slice of a bulk request sent to one worker
#[derive(Debug, Clone)]
pub(crate) struct Batch {
    pub batch_id: u64,
    pub items: Vec<BulkItem>,
    pub algorithm: String,
    pub options: Arc<HashOptions>,
}

/// Work sent to a worker thread
#[derive(Debug)]
pub(crate) enum WorkerJob {
    Single(HashRequest),
    Batch(Batch),
}

/// A worker's reply, tagged with the id of the job it answers
#[derive(Debug)]
pub(crate) enum WorkerMessage {
    Single {
        id: u64,
        result: Result<String>,
    },
    Batch {
        batch_id: u64,
        /// `(original_index, digest)` pairs
        result: Result<Vec<(usize, String)>>,
    },
}

/// Split `texts` into batches of at most `batch_size` items
pub(crate) fn partition(
    batch_id: u64,
    texts: Vec<String>,
    batch_size: usize,
    algorithm: &str,
    options: &Arc<HashOptions>,
) -> Vec<Batch> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(texts.len().div_ceil(batch_size));
    let mut items = Vec::with_capacity(batch_size.min(texts.len()));

    for (original_index, text) in texts.into_iter().enumerate() {
        items.push(BulkItem {
            text,
            original_index,
        });
        if items.len() == batch_size {
            batches.push(Batch {
                batch_id,
                items: std::mem::take(&mut items),
                algorithm: algorithm.to_string(),
                options: Arc::clone(options),
            });
        }
    }

    if !items.is_empty() {
        batches.push(Batch {
            batch_id,
            items,
            algorithm: algorithm.to_string(),
            options: Arc::clone(options),
        });
    }
    batches
}
