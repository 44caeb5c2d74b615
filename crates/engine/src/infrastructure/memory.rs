//! In-memory character storage.
//!
//! Reference backend used for fast deterministic tests and local development:
//! a single map guarded by one reader/writer lock. Readers (`get`, `list`)
//! run concurrently with each other; writers exclude everything else. The
//! lock is held for the whole operation - comparison and filter cost is small
//! next to lock overhead at the scale this backend serves (thousands of
//! records, not millions).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use charvault_domain::{
    Character, CharacterId, CharacterPage, ListQuery, Pagination, SortKey, SortOrder,
};

use crate::infrastructure::ports::{CharacterStore, ClockPort, StoreError};

/// In-memory character store.
pub struct MemoryStore {
    characters: RwLock<HashMap<String, Character>>,
    clock: Arc<dyn ClockPort>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            characters: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl CharacterStore for MemoryStore {
    async fn create(&self, character: &mut Character) -> Result<(), StoreError> {
        let mut characters = self.characters.write().await;

        let id = match &character.id {
            Some(id) => {
                if characters.contains_key(id.as_str()) {
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

        characters.insert(id.as_str().to_string(), character.clone());
        tracing::debug!(id = %id, name = %character.character_name, "created character");
        Ok(())
    }

    async fn get(&self, id: &CharacterId) -> Result<Character, StoreError> {
        let characters = self.characters.read().await;
        characters
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn list(&self, query: &ListQuery) -> Result<CharacterPage, StoreError> {
        let characters = self.characters.read().await;

        let mut matches: Vec<&Character> = match query.search_term() {
            Some(term) => characters
                .values()
                .filter(|c| matches_search(c, &term))
                .collect(),
            None => characters.values().collect(),
        };

        sort_characters(&mut matches, query.sort_by, query.sort_order);

        let total = matches.len();
        let offset = query.offset();
        let data: Vec<Character> = if offset >= total {
            Vec::new()
        } else {
            matches
                .iter()
                .skip(offset)
                .take(query.limit as usize)
                .map(|c| (*c).clone())
                .collect()
        };

        Ok(CharacterPage {
            data,
            pagination: Pagination::new(query.page, query.limit, total),
        })
    }

    async fn update(
        &self,
        id: &CharacterId,
        character: &mut Character,
    ) -> Result<(), StoreError> {
        let mut characters = self.characters.write().await;

        let existing = characters
            .get(id.as_str())
            .ok_or_else(|| StoreError::not_found(id))?;

        // Full replace: only the identifier and creation timestamp survive.
        character.id = Some(id.clone());
        character.created_at = existing.created_at;
        character.updated_at = Some(self.clock.now());

        characters.insert(id.as_str().to_string(), character.clone());
        tracing::debug!(id = %id, "updated character");
        Ok(())
    }

    async fn delete(&self, id: &CharacterId) -> Result<(), StoreError> {
        let mut characters = self.characters.write().await;
        if characters.remove(id.as_str()).is_none() {
            return Err(StoreError::not_found(id));
        }
        tracing::debug!(id = %id, "deleted character");
        Ok(())
    }
}

fn matches_search(character: &Character, term: &str) -> bool {
    character.character_name.to_lowercase().contains(term)
        || character.race.to_lowercase().contains(term)
        || character.class.to_lowercase().contains(term)
}

fn sort_characters(characters: &mut [&Character], key: SortKey, order: SortOrder) {
    characters.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Name => a
                .character_name
                .to_lowercase()
                .cmp(&b.character_name.to_lowercase()),
            SortKey::Level => a.level.cmp(&b.level),
            SortKey::Race => a.race.to_lowercase().cmp(&b.race.to_lowercase()),
            SortKey::Class => a.class.to_lowercase().cmp(&b.class.to_lowercase()),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
