//! Storage and clock ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use charvault_domain::{Character, CharacterId, CharacterPage, ListQuery};

/// Storage operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Target identifier does not exist.
    #[error("character not found: {id}")]
    NotFound { id: String },

    /// Caller-supplied identifier already exists at create time.
    #[error("character already exists: {id}")]
    Duplicate { id: String },

    /// Durable backend timeout or transport failure unrelated to record
    /// existence.
    #[error("storage backend unavailable during {operation}: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },

    /// A stored record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    pub fn duplicate(id: impl ToString) -> Self {
        Self::Duplicate { id: id.to_string() }
    }

    pub fn unavailable(operation: &'static str, message: impl ToString) -> Self {
        Self::Unavailable {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Storage contract every character backend implements.
///
/// The in-memory and Neo4j implementations are behaviorally interchangeable
/// for every operation here; callers never need to know which one is behind
/// the trait object.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Persist a new record. Assigns an identifier if absent and stamps both
    /// timestamps; the passed-in record is mutated so the caller observes the
    /// assigned values.
    async fn create(&self, character: &mut Character) -> Result<(), StoreError>;

    /// Fetch a record by identifier.
    async fn get(&self, id: &CharacterId) -> Result<Character, StoreError>;

    /// List records with pagination, sorting, and search. Pagination metadata
    /// is computed over the search-filtered set.
    async fn list(&self, query: &ListQuery) -> Result<CharacterPage, StoreError>;

    /// Replace every field of an existing record except its identifier and
    /// creation timestamp, refreshing the update timestamp. The passed-in
    /// record is mutated to reflect the persisted state.
    async fn update(&self, id: &CharacterId, character: &mut Character)
        -> Result<(), StoreError>;

    /// Remove a record permanently.
    async fn delete(&self, id: &CharacterId) -> Result<(), StoreError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
