//! Operation registry: long-running operations whose completion is evaluated
//! lazily against the clock each time they are read.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry::{Occupied, Vacant};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::ShowcaseError;
use crate::pagination::parse_offset_token;
use crate::status::{Code, StatusSpec, non_ok};

/// Prefix of every operation name handed out by the registry.
pub const OPERATION_NAME_PREFIX: &str = "operations/";

/// Terminal result of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// Completed successfully with the configured response content (empty when none).
    Succeeded { content: String },
    Failed(StatusSpec),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    Pending { time_remaining: Duration },
    Done(OperationOutcome),
}

/// Point-in-time view of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSnapshot {
    pub name: String,
    pub state: OperationState,
}

impl OperationSnapshot {
    pub fn is_done(&self) -> bool {
        matches!(self.state, OperationState::Done(_))
    }

    pub fn time_remaining(&self) -> Option<Duration> {
        match self.state {
            OperationState::Pending { time_remaining } => Some(time_remaining),
            OperationState::Done(_) => None,
        }
    }
}

/// What the caller asked the operation to do once it completes.
#[derive(Debug, Clone, Default)]
pub struct OperationSpec {
    pub completion_time: Option<DateTime<Utc>>,
    pub error: Option<StatusSpec>,
    pub success: Option<String>,
}

#[derive(Debug)]
struct OperationEntry {
    completion_time: DateTime<Utc>,
    error: Option<StatusSpec>,
    success: Option<String>,
    /// Set once, by the first read past `completion_time` or by cancellation.
    outcome: Option<OperationOutcome>,
}

impl OperationEntry {
    fn resolve(&self) -> OperationOutcome {
        match non_ok(self.error.as_ref()) {
            Some(error) => OperationOutcome::Failed(error.clone()),
            None => OperationOutcome::Succeeded {
                content: self.success.clone().unwrap_or_default(),
            },
        }
    }

    fn evaluate(&mut self, now: DateTime<Utc>) -> OperationState {
        if let Some(outcome) = &self.outcome {
            return OperationState::Done(outcome.clone());
        }
        if now >= self.completion_time {
            let outcome = self.resolve();
            self.outcome = Some(outcome.clone());
            return OperationState::Done(outcome);
        }
        OperationState::Pending {
            time_remaining: self.completion_time - now,
        }
    }
}

pub struct OperationRegistry {
    operations: DashMap<String, Arc<Mutex<OperationEntry>>>,
    clock: Arc<dyn Clock>,
}

impl OperationRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            operations: DashMap::new(),
            clock,
        }
    }

    /// Registers a new operation and returns its initial view. An operation whose
    /// completion time has already passed comes back done.
    pub fn start(&self, spec: OperationSpec) -> OperationSnapshot {
        let now = self.clock.now();
        let entry = Arc::new(Mutex::new(OperationEntry {
            completion_time: spec.completion_time.unwrap_or(now),
            error: spec.error,
            success: spec.success,
            outcome: None,
        }));

        let name = loop {
            let name = format!(
                "{OPERATION_NAME_PREFIX}{}",
                uuid::Uuid::new_v4().simple()
            );
            match self.operations.entry(name.clone()) {
                Occupied(_) => continue,
                Vacant(slot) => {
                    slot.insert(Arc::clone(&entry));
                    break name;
                }
            }
        };

        let state = entry.lock().evaluate(now);
        log::debug!(
            "started operation {name}, done={}",
            matches!(state, OperationState::Done(_))
        );
        OperationSnapshot { name, state }
    }

    /// Current view of `name`, performing the terminal transition if it is due.
    pub fn get(&self, name: &str) -> Result<OperationSnapshot, ShowcaseError> {
        let entry = self.lookup(name)?;
        let state = entry.lock().evaluate(self.clock.now());
        Ok(OperationSnapshot {
            name: name.to_string(),
            state,
        })
    }

    /// Lists operations in name order, `page_size` at a time (0 means all).
    pub fn list(
        &self,
        page_size: i32,
        page_token: &str,
    ) -> Result<(Vec<OperationSnapshot>, String), ShowcaseError> {
        let mut names: Vec<String> = self
            .operations
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();

        let total = names.len();
        let start = parse_offset_token(page_token, total)?;
        let size = usize::try_from(page_size)
            .ok()
            .filter(|&s| s > 0)
            .unwrap_or(total);
        let end = start.saturating_add(size).min(total);

        let mut page = Vec::with_capacity(end - start);
        for name in &names[start..end] {
            // Deleted between the listing and the read: skip it.
            match self.get(name) {
                Ok(snapshot) => page.push(snapshot),
                Err(ShowcaseError::OperationNotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        let next_page_token = if end < total {
            end.to_string()
        } else {
            String::new()
        };
        Ok((page, next_page_token))
    }

    /// Cancels a pending operation. Done operations keep their outcome.
    pub fn cancel(&self, name: &str) -> Result<OperationSnapshot, ShowcaseError> {
        let entry = self.lookup(name)?;
        let mut guard = entry.lock();
        let state = match guard.evaluate(self.clock.now()) {
            OperationState::Pending { .. } => {
                let outcome = OperationOutcome::Failed(StatusSpec::new(
                    Code::Cancelled,
                    "operation cancelled",
                ));
                guard.outcome = Some(outcome.clone());
                log::debug!("cancelled operation {name}");
                OperationState::Done(outcome)
            }
            done => done,
        };
        Ok(OperationSnapshot {
            name: name.to_string(),
            state,
        })
    }

    pub fn delete(&self, name: &str) -> Result<(), ShowcaseError> {
        match self.operations.remove(name) {
            Some(_) => {
                log::debug!("deleted operation {name}");
                Ok(())
            }
            None => Err(ShowcaseError::OperationNotFound {
                name: name.to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    fn lookup(&self, name: &str) -> Result<Arc<Mutex<OperationEntry>>, ShowcaseError> {
        self.operations
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ShowcaseError::OperationNotFound {
                name: name.to_string(),
            })
    }
}
