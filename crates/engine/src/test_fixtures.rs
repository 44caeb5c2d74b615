//! Shared character fixtures for tests.

use charvault_domain::{AbilityScore, AbilityScores, Character, MulticlassEntry};

/// Six ability scores in canonical order.
pub fn ability_scores(bases: [i32; 6]) -> AbilityScores {
    AbilityScores {
        strength: AbilityScore { base: bases[0] },
        dexterity: AbilityScore { base: bases[1] },
        constitution: AbilityScore { base: bases[2] },
        intelligence: AbilityScore { base: bases[3] },
        wisdom: AbilityScore { base: bases[4] },
        charisma: AbilityScore { base: bases[5] },
    }
}

/// A fully valid character with the given identity fields.
pub fn character(name: &str, race: &str, class: &str, level: i32) -> Character {
    Character {
        id: None,
        character_name: name.to_string(),
        player_name: Some("Alex".to_string()),
        race: race.to_string(),
        subrace: None,
        class: class.to_string(),
        subclass: None,
        multiclass: Vec::new(),
        level,
        experience_points: 6500,
        background: Some("Sage".to_string()),
        alignment: Some("Neutral Good".to_string()),
        ability_scores: ability_scores([8, 14, 12, 18, 13, 10]),
        created_at: None,
        updated_at: None,
    }
}

/// A fully valid elven wizard.
pub fn valid_character(name: &str) -> Character {
    character(name, "Elf", "Wizard", 5)
}

/// A fully valid character with one multiclass entry.
pub fn multiclassed(name: &str, level: i32, entry_level: i32) -> Character {
    let mut result = character(name, "Half-Orc", "Barbarian", level);
    result.multiclass = vec![MulticlassEntry {
        class: "Fighter".to_string(),
        subclass: Some("Champion".to_string()),
        level: entry_level,
    }];
    result
}
