//! CharVault Engine library.
//!
//! This crate contains all server-side code for the CharVault service.
//!
//! ## Structure
//!
//! - `infrastructure/` - Storage port and backend implementations
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;

/// Shared character fixtures for tests.
#[cfg(test)]
pub mod test_fixtures;

/// E2E integration tests using real Neo4j via testcontainers.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
