//! Repository Layer - Storage Trait
//!
//! The asynchronous, string-keyed, string-valued storage facility the
//! party store persists through, the on-device equivalent of a mobile
//! platform's async key-value storage.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;

use crate::domain::DomainResult;

/// Durable (or test-transient) key-value storage.
///
/// Operations either complete or fail outright; there are no partial
/// writes and no cancellation semantics. Failures surface as
/// `DomainError::Internal` and are the caller's to retry.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    /// Store `value` under `key`, overwriting any previous value
    async fn set(&self, key: &str, value: &str) -> DomainResult<()>;

    /// Delete the value stored under `key`; absent keys are fine
    async fn remove(&self, key: &str) -> DomainResult<()>;
}
