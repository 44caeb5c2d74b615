//! E2E integration tests against a real Neo4j instance via testcontainers.
//!
//! These are ignored by default: they need a local Docker daemon. Run with
//! `cargo test -- --ignored` when one is available.

mod neo4j_harness;
mod store_tests;
