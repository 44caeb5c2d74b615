//! Backend behavior and equivalence tests.
//!
//! The portability invariant under test: for the same operation sequence and
//! the same list parameters, the in-memory and Neo4j backends return
//! identical record sets, ordering, and pagination metadata. Both stores get
//! a stepping clock seeded from the same instant so timestamps line up.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use charvault_domain::{Character, CharacterId, ListQuery, SortKey, SortOrder};

use super::neo4j_harness::Neo4jTestHarness;
use crate::infrastructure::clock::SteppingClock;
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::neo4j::{ensure_schema, Neo4jCharacterStore};
use crate::infrastructure::ports::CharacterStore;
use crate::test_fixtures;

const TEST_LABEL: &str = "Character";

async fn durable_store(harness: &Neo4jTestHarness) -> Neo4jCharacterStore {
    let graph = harness.graph_clone();
    ensure_schema(&graph, TEST_LABEL).await.expect("schema");
    Neo4jCharacterStore::new(graph, TEST_LABEL, stepping_clock())
}

fn memory_store() -> MemoryStore {
    MemoryStore::new(stepping_clock())
}

fn stepping_clock() -> Arc<SteppingClock> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).expect("valid time");
    Arc::new(SteppingClock::new(start))
}

/// Five characters with distinct values for every sortable field, so each
/// sort key yields one unambiguous order on both backends.
fn roster() -> Vec<Character> {
    let seeds = [
        ("char-1", "Aldric", "Human", "Fighter", 3),
        ("char-2", "Brigid", "Dwarf", "Cleric", 8),
        ("char-3", "Caelum", "Elf", "Wizard", 12),
        ("char-4", "Darrow", "Half-Elf", "Bard", 5),
        ("char-5", "Estrid", "Tiefling", "Warlock", 17),
    ];
    seeds
        .iter()
        .map(|(id, name, race, class, level)| {
            let mut character = test_fixtures::character(name, race, class, *level);
            character.id = Some(CharacterId::new(*id));
            character
        })
        .collect()
}

/// Run the fixed create/update/delete sequence against a store.
async fn seed(store: &dyn CharacterStore) {
    for mut character in roster() {
        store.create(&mut character).await.expect("create");
    }

    let mut replacement = test_fixtures::character("Brigid the Bold", "Dwarf", "Paladin", 9);
    store
        .update(&CharacterId::new("char-2"), &mut replacement)
        .await
        .expect("update");

    store
        .delete(&CharacterId::new("char-5"))
        .await
        .expect("delete");
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn backends_are_equivalent_for_every_list_shape() {
    let harness = Neo4jTestHarness::start().await.expect("harness");
    let durable = durable_store(&harness).await;
    let memory = memory_store();

    seed(&memory).await;
    seed(&durable).await;

    let sort_keys = [
        SortKey::Name,
        SortKey::Level,
        SortKey::Race,
        SortKey::Class,
        SortKey::CreatedAt,
    ];
    let orders = [SortOrder::Asc, SortOrder::Desc];
    let searches = [None, Some("elf"), Some("CHARACTER"), Some("bard"), Some("zz")];
    let pages = [(1u32, 2u32), (2, 2), (3, 2), (1, 100)];

    for sort_by in sort_keys {
        for sort_order in orders {
            for search in searches {
                for (page, limit) in pages {
                    let query = ListQuery {
                        page,
                        limit,
                        sort_by,
                        sort_order,
                        search: search.map(str::to_string),
                    };
                    let from_memory = memory.list(&query).await.expect("memory list");
                    let from_durable = durable.list(&query).await.expect("durable list");
                    assert_eq!(
                        from_memory, from_durable,
                        "backends diverged for query {query:?}"
                    );
                }
            }
        }
    }
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn durable_create_then_get_round_trips() {
    let harness = Neo4jTestHarness::start().await.expect("harness");
    let store = durable_store(&harness).await;

    let mut character = test_fixtures::multiclassed("Grosha", 6, 2);
    let input = character.clone();
    store.create(&mut character).await.expect("create");

    let id = character.id.clone().expect("id assigned");
    assert!(character.created_at.is_some());
    assert_eq!(character.created_at, character.updated_at);

    let fetched = store.get(&id).await.expect("get");
    assert_eq!(fetched, character);

    // Equal to the input except for the server-assigned fields.
    let mut stripped = fetched;
    stripped.id = None;
    stripped.created_at = None;
    stripped.updated_at = None;
    assert_eq!(stripped, input);
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn durable_rejects_duplicates_and_missing_ids() {
    let harness = Neo4jTestHarness::start().await.expect("harness");
    let store = durable_store(&harness).await;

    let mut character = test_fixtures::valid_character("Miriel");
    character.id = Some(CharacterId::new("fixed-id"));
    store.create(&mut character).await.expect("create");

    let mut duplicate = test_fixtures::valid_character("Imposter");
    duplicate.id = Some(CharacterId::new("fixed-id"));
    let err = store.create(&mut duplicate).await.expect_err("duplicate");
    assert!(matches!(
        err,
        crate::infrastructure::ports::StoreError::Duplicate { .. }
    ));

    let err = store
        .get(&CharacterId::new("ghost"))
        .await
        .expect_err("missing");
    assert!(err.is_not_found());

    let mut replacement = test_fixtures::valid_character("Nobody");
    let err = store
        .update(&CharacterId::new("ghost"), &mut replacement)
        .await
        .expect_err("missing");
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn durable_update_preserves_identity_and_creation_time() {
    let harness = Neo4jTestHarness::start().await.expect("harness");
    let store = durable_store(&harness).await;

    let mut character = test_fixtures::valid_character("Miriel");
    store.create(&mut character).await.expect("create");
    let id = character.id.clone().expect("id assigned");
    let created_at = character.created_at;

    let mut replacement = test_fixtures::character("Miriel the Wise", "Elf", "Wizard", 9);
    store.update(&id, &mut replacement).await.expect("update");

    assert_eq!(replacement.id, Some(id.clone()));
    assert_eq!(replacement.created_at, created_at);
    assert!(replacement.updated_at > replacement.created_at);

    let fetched = store.get(&id).await.expect("get");
    assert_eq!(fetched, replacement);
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn durable_delete_is_permanent_and_rejects_repeats() {
    let harness = Neo4jTestHarness::start().await.expect("harness");
    let store = durable_store(&harness).await;

    let mut character = test_fixtures::valid_character("Miriel");
    store.create(&mut character).await.expect("create");
    let id = character.id.clone().expect("id assigned");

    store.delete(&id).await.expect("delete");
    assert!(store.delete(&id).await.expect_err("second delete").is_not_found());
    assert!(store.get(&id).await.expect_err("get after delete").is_not_found());
}
