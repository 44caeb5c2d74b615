//! Neo4j character store implementation.
//!
//! One node per record under a configurable label (the logical collection
//! name). Property names map 1:1 to the record's wire names; nested values
//! (`multiclass`, `abilityScores`) are stored as JSON strings and timestamps
//! as RFC 3339 strings, whose lexicographic order is chronological for UTC.
//! The id is a plain string property backed by a uniqueness constraint,
//! decoupled from Neo4j's internal node id.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use neo4rs::{query, Graph, Query, Row};

use charvault_domain::{
    Character, CharacterId, CharacterPage, ListQuery, Pagination, SortKey, SortOrder,
};

use super::helpers::NodeExt;
use crate::infrastructure::ports::{CharacterStore, ClockPort, StoreError};

/// Timeout for single-record operations.
const OP_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout for list queries, which filter and sort server-side.
const LIST_TIMEOUT: Duration = Duration::from_secs(10);

/// Every replaceable property. Deliberately excludes `createdAt`: create
/// stamps it separately and update never touches it.
const SET_CLAUSE: &str = "c.characterName = $characterName,
    c.playerName = $playerName,
    c.race = $race,
    c.subrace = $subrace,
    c.class = $class,
    c.subclass = $subclass,
    c.multiclass = $multiclass,
    c.level = $level,
    c.experiencePoints = $experiencePoints,
    c.background = $background,
    c.alignment = $alignment,
    c.abilityScores = $abilityScores,
    c.updatedAt = $updatedAt";

/// Neo4j-backed character store.
pub struct Neo4jCharacterStore {
    graph: Graph,
    label: String,
    clock: Arc<dyn ClockPort>,
}

impl Neo4jCharacterStore {
    /// `label` is the logical collection name records are stored under.
    pub fn new(graph: Graph, label: impl Into<String>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            graph,
            label: label.into(),
            clock,
        }
    }

    /// Convert a row holding a character node (aliased as `c`) to a record.
    fn row_to_character(&self, row: Row) -> Result<Character, StoreError> {
        let node: neo4rs::Node = row
            .get("c")
            .map_err(|e| StoreError::serialization(e.to_string()))?;

        Ok(Character {
            id: Some(CharacterId::new(node.get_string_strict("id")?)),
            character_name: node.get_string_strict("characterName")?,
            player_name: node.get_optional_string("playerName"),
            race: node.get_string_strict("race")?,
            subrace: node.get_optional_string("subrace"),
            class: node.get_string_strict("class")?,
            subclass: node.get_optional_string("subclass"),
            multiclass: node.get_json_strict("multiclass")?,
            level: node.get_i64_or("level", 0) as i32,
            experience_points: node.get_i64_or("experiencePoints", 0) as i32,
            background: node.get_optional_string("background"),
            alignment: node.get_optional_string("alignment"),
            ability_scores: node.get_json_strict("abilityScores")?,
            created_at: Some(node.get_datetime_strict("createdAt")?),
            updated_at: Some(node.get_datetime_strict("updatedAt")?),
        })
    }

    /// Bind every replaceable property covered by [`SET_CLAUSE`].
    fn bind_character(
        q: Query,
        character: &Character,
        id: &str,
        updated_at: &DateTime<Utc>,
    ) -> Result<Query, StoreError> {
        let multiclass_json = serde_json::to_string(&character.multiclass)
            .map_err(|e| StoreError::serialization(e.to_string()))?;
        let ability_scores_json = serde_json::to_string(&character.ability_scores)
            .map_err(|e| StoreError::serialization(e.to_string()))?;

        Ok(q
            .param("id", id)
            .param("characterName", character.character_name.clone())
            .param(
                "playerName",
                character.player_name.clone().unwrap_or_default(),
            )
            .param("race", character.race.clone())
            .param("subrace", character.subrace.clone().unwrap_or_default())
            .param("class", character.class.clone())
            .param("subclass", character.subclass.clone().unwrap_or_default())
            .param("multiclass", multiclass_json)
            .param("level", i64::from(character.level))
            .param(
                "experiencePoints",
                i64::from(character.experience_points),
            )
            .param(
                "background",
                character.background.clone().unwrap_or_default(),
            )
            .param("alignment", character.alignment.clone().unwrap_or_default())
            .param("abilityScores", ability_scores_json)
            .param("updatedAt", updated_at.to_rfc3339()))
    }

    async fn create_inner(&self, character: &mut Character) -> Result<(), StoreError> {
        let id = match &character.id {
            Some(id) => {
                // Check-then-create is enough here: the contract is
                // last-write-wins, and the uniqueness constraint backstops
                // the race window.
                let q = query(&format!(
                    "MATCH (c:{} {{id: $id}}) RETURN c.id AS id",
                    self.label
                ))
                .param("id", id.as_str());
                let mut result = self
                    .graph
                    .execute(q)
                    .await
                    .map_err(|e| StoreError::unavailable("create", e))?;
                if result
                    .next()
                    .await
                    .map_err(|e| StoreError::unavailable("create", e))?
                    .is_some()
                {
                    return Err(StoreError::duplicate(id));
                }
                id.clone()
            }
            None => {
                let id = CharacterId::generate();
                character.id = Some(id.clone());
                id
            }
        };

        let now = self.clock.now();
        character.created_at = Some(now);
        character.updated_at = Some(now);

        let cypher = format!(
            "CREATE (c:{} {{id: $id}}) SET {SET_CLAUSE}, c.createdAt = $createdAt",
            self.label
        );
        let q = Self::bind_character(query(&cypher), character, id.as_str(), &now)?
            .param("createdAt", now.to_rfc3339());
        self.graph
            .run(q)
            .await
            .map_err(|e| StoreError::unavailable("create", e))?;

        tracing::debug!(id = %id, name = %character.character_name, "created character");
        Ok(())
    }

    async fn get_inner(&self, id: &CharacterId) -> Result<Character, StoreError> {
        let q = query(&format!("MATCH (c:{} {{id: $id}}) RETURN c", self.label))
            .param("id", id.as_str());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| StoreError::unavailable("get", e))?;

        match result
            .next()
            .await
            .map_err(|e| StoreError::unavailable("get", e))?
        {
            Some(row) => self.row_to_character(row),
            None => Err(StoreError::not_found(id)),
        }
    }

    async fn list_inner(&self, params: &ListQuery) -> Result<CharacterPage, StoreError> {
        let search = params.search_term().unwrap_or_default();

        // Filtering, sorting, and pagination are all pushed to the store so
        // results match the in-memory backend for the same parameters.
        let filter = format!(
            "MATCH (c:{})
             WHERE $search = ''
                OR toLower(c.characterName) CONTAINS $search
                OR toLower(c.race) CONTAINS $search
                OR toLower(c.class) CONTAINS $search",
            self.label
        );

        let count_q =
            query(&format!("{filter} RETURN count(c) AS total")).param("search", search.clone());
        let mut result = self
            .graph
            .execute(count_q)
            .await
            .map_err(|e| StoreError::unavailable("list", e))?;
        let total: i64 = match result
            .next()
            .await
            .map_err(|e| StoreError::unavailable("list", e))?
        {
            Some(row) => row
                .get("total")
                .map_err(|e| StoreError::serialization(e.to_string()))?,
            None => 0,
        };

        let sort_expr = match params.sort_by {
            SortKey::Name => "toLower(c.characterName)",
            SortKey::Level => "c.level",
            SortKey::Race => "toLower(c.race)",
            SortKey::Class => "toLower(c.class)",
            SortKey::CreatedAt => "c.createdAt",
        };
        let direction = match params.sort_order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        let page_q = query(&format!(
            "{filter}
             WITH c ORDER BY {sort_expr} {direction}
             SKIP $skip LIMIT $limit
             RETURN c"
        ))
        .param("search", search)
        .param("skip", params.offset() as i64)
        .param("limit", i64::from(params.limit));

        let mut rows = self
            .graph
            .execute(page_q)
            .await
            .map_err(|e| StoreError::unavailable("list", e))?;

        let mut data = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::unavailable("list", e))?
        {
            data.push(self.row_to_character(row)?);
        }

        Ok(CharacterPage {
            data,
            pagination: Pagination::new(params.page, params.limit, total as usize),
        })
    }

    async fn update_inner(
        &self,
        id: &CharacterId,
        character: &mut Character,
    ) -> Result<(), StoreError> {
        let now = self.clock.now();

        // Full replace in one round trip; the stored createdAt is returned so
        // the caller observes the preserved value.
        let cypher = format!(
            "MATCH (c:{} {{id: $id}}) SET {SET_CLAUSE} RETURN c.createdAt AS createdAt",
            self.label
        );
        let q = Self::bind_character(query(&cypher), character, id.as_str(), &now)?;

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| StoreError::unavailable("update", e))?;
        let row = result
            .next()
            .await
            .map_err(|e| StoreError::unavailable("update", e))?
            .ok_or_else(|| StoreError::not_found(id))?;

        let created_at: String = row
            .get("createdAt")
            .map_err(|e| StoreError::serialization(e.to_string()))?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                StoreError::serialization(format!("invalid createdAt on stored record: {e}"))
            })?;

        character.id = Some(id.clone());
        character.created_at = Some(created_at);
        character.updated_at = Some(now);

        tracing::debug!(id = %id, "updated character");
        Ok(())
    }

    async fn delete_inner(&self, id: &CharacterId) -> Result<(), StoreError> {
        let q = query(&format!(
            "MATCH (c:{} {{id: $id}}) DETACH DELETE c RETURN count(*) AS deleted",
            self.label
        ))
        .param("id", id.as_str());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| StoreError::unavailable("delete", e))?;
        let deleted: i64 = match result
            .next()
            .await
            .map_err(|e| StoreError::unavailable("delete", e))?
        {
            Some(row) => row.get("deleted").unwrap_or(0),
            None => 0,
        };

        if deleted == 0 {
            return Err(StoreError::not_found(id));
        }

        tracing::debug!(id = %id, "deleted character");
        Ok(())
    }
}

#[async_trait]
impl CharacterStore for Neo4jCharacterStore {
    async fn create(&self, character: &mut Character) -> Result<(), StoreError> {
        with_timeout("create", OP_TIMEOUT, self.create_inner(character)).await
    }

    async fn get(&self, id: &CharacterId) -> Result<Character, StoreError> {
        with_timeout("get", OP_TIMEOUT, self.get_inner(id)).await
    }

    async fn list(&self, query: &ListQuery) -> Result<CharacterPage, StoreError> {
        with_timeout("list", LIST_TIMEOUT, self.list_inner(query)).await
    }

    async fn update(
        &self,
        id: &CharacterId,
        character: &mut Character,
    ) -> Result<(), StoreError> {
        with_timeout("update", OP_TIMEOUT, self.update_inner(id, character)).await
    }

    async fn delete(&self, id: &CharacterId) -> Result<(), StoreError> {
        with_timeout("delete", OP_TIMEOUT, self.delete_inner(id)).await
    }
}

/// Bound the operation; an elapsed timeout surfaces as `Unavailable`.
async fn with_timeout<T, F>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::unavailable(
            operation,
            format!("timed out after {limit:?}"),
        )),
    }
}
