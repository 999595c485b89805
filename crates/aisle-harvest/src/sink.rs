//! Destination seam for finished datasets.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors a sink can surface. The harvest treats every one of them as
/// fatal: a run whose output cannot be written has nothing to show for
/// the requests it already spent.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write dataset: {0}")]
    Io(#[from] std::io::Error),
}

/// Receives named datasets produced by a harvest run.
///
/// `name` is a short identifier (`"categories"`, `"products"`, `"report"`),
/// not a path; the sink decides where and how the dataset lands.
#[async_trait]
pub trait DatasetSink: Send + Sync {
    async fn persist(&self, name: &str, dataset: &Value) -> Result<(), SinkError>;
}

/// Sink that keeps every dataset in memory, in arrival order, so tests
/// can inspect what a run persisted.
#[derive(Debug, Default)]
pub struct MemorySink {
    datasets: Mutex<Vec<(String, Value)>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// Snapshot of everything persisted so far.
    ///
    /// # Panics
    ///
    /// Panics if a previous `persist` call panicked while holding the lock.
    #[must_use]
    pub fn datasets(&self) -> Vec<(String, Value)> {
        self.datasets.lock().expect("dataset lock poisoned").clone()
    }

    /// The most recent dataset persisted under `name`, if any.
    ///
    /// # Panics
    ///
    /// Panics if a previous `persist` call panicked while holding the lock.
    #[must_use]
    pub fn dataset(&self, name: &str) -> Option<Value> {
        self.datasets
            .lock()
            .expect("dataset lock poisoned")
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }
}

#[async_trait]
impl DatasetSink for MemorySink {
    async fn persist(&self, name: &str, dataset: &Value) -> Result<(), SinkError> {
        self.datasets
            .lock()
            .expect("dataset lock poisoned")
            .push((name.to_owned(), dataset.clone()));
        Ok(())
    }
}
