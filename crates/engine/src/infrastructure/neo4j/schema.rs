//! Neo4j schema initialization - constraints and indexes.

use neo4rs::{query, Graph};

/// Initialize the schema for the character label.
///
/// This should be called once on startup. Constraints and indexes are
/// created with IF NOT EXISTS to be idempotent.
pub async fn ensure_schema(graph: &Graph, label: &str) -> Result<(), neo4rs::Error> {
    let prefix = label.to_lowercase();

    // Unique constraint on the business identifier. Lookups go through this
    // property, never through Neo4j's internal node id.
    graph
        .run(query(&format!(
            "CREATE CONSTRAINT {prefix}_id_unique IF NOT EXISTS
             FOR (c:{label}) REQUIRE c.id IS UNIQUE"
        )))
        .await?;

    // Indexes backing the default sort and name search.
    graph
        .run(query(&format!(
            "CREATE INDEX {prefix}_created_at IF NOT EXISTS
             FOR (c:{label}) ON (c.createdAt)"
        )))
        .await?;

    graph
        .run(query(&format!(
            "CREATE INDEX {prefix}_name IF NOT EXISTS
             FOR (c:{label}) ON (c.characterName)"
        )))
        .await?;

    tracing::info!(label, "Neo4j schema initialized (constraints and indexes ensured)");
    Ok(())
}
