//! Neo4j deserialization helpers for node-to-record conversion.

use chrono::{DateTime, Utc};
use neo4rs::Node;

use crate::infrastructure::ports::StoreError;

/// Extension trait for Neo4j nodes to simplify common deserialization
/// patterns.
pub trait NodeExt {
    /// Get an optional string property, returning `None` if empty or missing.
    fn get_optional_string(&self, property: &str) -> Option<String>;

    /// Get an i64 property with a default value if missing.
    fn get_i64_or(&self, property: &str, default: i64) -> i64;

    /// Get a required string property with strict error handling.
    fn get_string_strict(&self, property: &str) -> Result<String, StoreError>;

    /// Get and deserialize a required JSON property.
    fn get_json_strict<T: serde::de::DeserializeOwned>(
        &self,
        property: &str,
    ) -> Result<T, StoreError>;

    /// Get a required RFC 3339 datetime property.
    fn get_datetime_strict(&self, property: &str) -> Result<DateTime<Utc>, StoreError>;
}

impl NodeExt for Node {
    fn get_optional_string(&self, property: &str) -> Option<String> {
        self.get::<String>(property).ok().filter(|s| !s.is_empty())
    }

    fn get_i64_or(&self, property: &str, default: i64) -> i64 {
        self.get(property).unwrap_or(default)
    }

    fn get_string_strict(&self, property: &str) -> Result<String, StoreError> {
        self.get(property).map_err(|e| {
            StoreError::serialization(format!("missing required property '{property}': {e}"))
        })
    }

    fn get_json_strict<T: serde::de::DeserializeOwned>(
        &self,
        property: &str,
    ) -> Result<T, StoreError> {
        let raw = self.get_string_strict(property)?;
        serde_json::from_str(&raw).map_err(|e| {
            StoreError::serialization(format!(
                "invalid JSON in property '{property}': {e} (value: '{raw}')"
            ))
        })
    }

    fn get_datetime_strict(&self, property: &str) -> Result<DateTime<Utc>, StoreError> {
        let raw = self.get_string_strict(property)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                StoreError::serialization(format!(
                    "invalid datetime in property '{property}': {e} (value: '{raw}')"
                ))
            })
    }
}
