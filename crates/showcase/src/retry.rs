//! Retry registry: ordered status sequences bound to server-generated ids.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry::{Occupied, Vacant};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ShowcaseError;
use crate::status::StatusSpec;

/// Statuses to replay for one id, plus the position of the next one.
#[derive(Debug)]
struct RetrySequence {
    responses: Vec<StatusSpec>,
    cursor: AtomicUsize,
}

impl RetrySequence {
    /// Claims the next position. Concurrent callers never observe the same one.
    fn advance(&self) -> Option<&StatusSpec> {
        let len = self.responses.len();
        self.cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |pos| {
                (pos < len).then_some(pos + 1)
            })
            .ok()
            .map(|pos| &self.responses[pos])
    }
}

#[derive(Debug, Default)]
pub struct RetryRegistry {
    sequences: DashMap<String, Arc<RetrySequence>>,
}

impl RetryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `responses` to a fresh id and returns it.
    pub fn setup(&self, responses: Vec<StatusSpec>) -> String {
        let sequence = Arc::new(RetrySequence {
            responses,
            cursor: AtomicUsize::new(0),
        });
        loop {
            let id = uuid::Uuid::new_v4().simple().to_string();
            match self.sequences.entry(id.clone()) {
                Occupied(_) => continue,
                Vacant(entry) => {
                    log::debug!(
                        "registered retry sequence {id} with {} responses",
                        sequence.responses.len()
                    );
                    entry.insert(sequence);
                    return id;
                }
            }
        }
    }

    /// Replays the next status bound to `id`.
    ///
    /// An OK status yields `Ok(())`; any other status comes back as
    /// [`ShowcaseError::Configured`].
    pub fn next(&self, id: &str) -> Result<(), ShowcaseError> {
        // Clone the Arc so the map shard lock is released before touching the cursor.
        let sequence = self
            .sequences
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ShowcaseError::RetryNotFound { id: id.to_string() })?;

        match sequence.advance() {
            Some(status) if status.is_ok() => Ok(()),
            Some(status) => Err(ShowcaseError::Configured(status.clone())),
            None => Err(ShowcaseError::RetryExhausted {
                id: id.to_string(),
                attempts: sequence.responses.len(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}
