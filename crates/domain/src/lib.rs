//! CharVault domain - character records, validation rules, and query types.
//!
//! This crate is pure data and rules: no I/O, no async, no storage knowledge.
//! Storage backends and the HTTP surface live in `charvault-engine`.

pub mod character;
pub mod ids;
pub mod page;
pub mod query;
pub mod validation;

pub use character::{AbilityScore, AbilityScores, Character, MulticlassEntry};
pub use ids::CharacterId;
pub use page::{CharacterPage, Pagination};
pub use query::{ListQuery, SortKey, SortOrder};
pub use validation::{validate, ValidationCode, ValidationError};
