use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod listings;
pub mod memory;

pub use listings::{ListingFilters, ListingStore, ListingStoreError};
pub use memory::MemoryStore;

/// Errors from the document collection backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Comparison operators the document collection supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// A single field condition. Callers compose these into filter sets; the
/// collection applies them conjunctively.
#[derive(Debug, Clone)]
pub struct Condition {
    pub field: String,
    pub op: QueryOp,
    pub value: Value,
}

impl Condition {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { field: field.into(), op: QueryOp::Eq, value: value.into() }
    }

    pub fn range(field: impl Into<String>, op: QueryOp, value: impl Into<Value>) -> Self {
        Self { field: field.into(), op, value: value.into() }
    }
}

/// External document collection boundary. Consistency guarantees
/// (read-after-write, concurrent update ordering) belong entirely to the
/// implementation behind this trait; the core does no locking or retries.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Map<String, Value>>, StoreError>;

    async fn put(&self, id: &str, doc: Map<String, Value>) -> Result<(), StoreError>;

    /// Merge `patch` into an existing document. Returns whether it existed.
    async fn update(&self, id: &str, patch: Map<String, Value>) -> Result<bool, StoreError>;

    /// Returns whether the document existed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    async fn query(&self, conditions: &[Condition]) -> Result<Vec<Map<String, Value>>, StoreError>;
}
