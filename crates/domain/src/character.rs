//! Character record schema.
//!
//! Pure data definition. The wire format (JSON) and the storage format use
//! the same camelCase field names; validation rules live in
//! [`crate::validation`], not here.
//!
//! Every field carries a serde default so that an incomplete payload still
//! deserializes and the validator can report all missing/invalid fields in
//! one pass instead of failing at decode time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::CharacterId;

/// A tabletop player character record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Server-assigned when absent at create time; immutable afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CharacterId>,
    #[serde(default)]
    pub character_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(default)]
    pub race: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subrace: Option<String>,
    #[serde(default)]
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subclass: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multiclass: Vec<MulticlassEntry>,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub experience_points: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    #[serde(default)]
    pub ability_scores: AbilityScores,
    /// Set exactly once by the backend at create time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Refreshed by the backend on every successful update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Character {
    /// Own level plus the sum of all multiclass entry levels.
    ///
    /// Computed in `i64` so a hostile payload full of large entry levels
    /// cannot overflow the sum.
    pub fn effective_total_level(&self) -> i64 {
        i64::from(self.level)
            + self
                .multiclass
                .iter()
                .map(|entry| i64::from(entry.level))
                .sum::<i64>()
    }
}

/// One entry of a multiclass progression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MulticlassEntry {
    #[serde(default)]
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subclass: Option<String>,
    #[serde(default)]
    pub level: i32,
}

/// The six ability scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(default)]
    pub strength: AbilityScore,
    #[serde(default)]
    pub dexterity: AbilityScore,
    #[serde(default)]
    pub constitution: AbilityScore,
    #[serde(default)]
    pub intelligence: AbilityScore,
    #[serde(default)]
    pub wisdom: AbilityScore,
    #[serde(default)]
    pub charisma: AbilityScore,
}

impl AbilityScores {
    /// Base scores paired with their wire names, in canonical order.
    pub fn named(&self) -> [(&'static str, i32); 6] {
        [
            ("strength", self.strength.base),
            ("dexterity", self.dexterity.base),
            ("constitution", self.constitution.base),
            ("intelligence", self.intelligence.base),
            ("wisdom", self.wisdom.base),
            ("charisma", self.charisma.base),
        ]
    }
}

/// A single ability score with its base value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    #[serde(default)]
    pub base: i32,
}
