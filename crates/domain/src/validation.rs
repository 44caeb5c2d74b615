//! Character validation rules.
//!
//! Two passes over a record, both always evaluated so one call surfaces every
//! problem at once:
//!
//! 1. A structural pass driven by a static rule table: required fields,
//!    numeric ranges, enumerated values.
//! 2. A domain pass for the race/class sets, multiclass entries, the
//!    effective-total-level cap, and ability score bounds.
//!
//! [`validate`] is a pure function of its input; it never touches storage.

use serde::{Deserialize, Serialize};

use crate::character::Character;

/// Races a character may have.
pub const VALID_RACES: &[&str] = &[
    "Human",
    "Elf",
    "Dwarf",
    "Halfling",
    "Dragonborn",
    "Gnome",
    "Half-Elf",
    "Half-Orc",
    "Tiefling",
];

/// Classes a character or multiclass entry may have.
pub const VALID_CLASSES: &[&str] = &[
    "Fighter",
    "Wizard",
    "Rogue",
    "Cleric",
    "Barbarian",
    "Bard",
    "Druid",
    "Monk",
    "Paladin",
    "Ranger",
    "Sorcerer",
    "Warlock",
];

/// The nine canonical alignments.
pub const VALID_ALIGNMENTS: &[&str] = &[
    "Lawful Good",
    "Neutral Good",
    "Chaotic Good",
    "Lawful Neutral",
    "True Neutral",
    "Chaotic Neutral",
    "Lawful Evil",
    "Neutral Evil",
    "Chaotic Evil",
];

/// Cap on own level plus the sum of all multiclass entry levels.
pub const MAX_TOTAL_LEVEL: i64 = 30;

const LEVEL_MIN: i64 = 1;
const LEVEL_MAX: i64 = 20;
const ABILITY_MIN: i64 = 1;
const ABILITY_MAX: i64 = 20;

/// Machine-readable validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    /// Structural failure: missing required field or value out of range.
    ValidationError,
    InvalidRace,
    InvalidClass,
    InvalidMulticlass,
    LevelTooHigh,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `multiclass[0].class`.
    pub field: String,
    pub message: String,
    pub code: ValidationCode,
}

// =============================================================================
// Structural rule table
// =============================================================================

/// Value of a field as seen by the structural pass.
enum FieldValue<'a> {
    Text(&'a str),
    OptionalText(Option<&'a str>),
    Int(i64),
}

/// Constraint kinds the structural pass knows how to evaluate.
enum Constraint {
    /// Field must be present and non-empty.
    Required,
    /// Numeric value must fall within the inclusive range.
    Range { min: i64, max: i64 },
    /// Numeric value must not fall below the floor.
    AtLeast(i64),
    /// Value, when present, must be a member of the set.
    OneOf(&'static [&'static str]),
}

struct FieldRule {
    field: &'static str,
    constraint: Constraint,
    value: fn(&Character) -> FieldValue<'_>,
}

/// Statically enumerated structural rules.
///
/// The identifier is deliberately absent: new records legitimately omit it.
/// Ability scores are covered by the domain pass, which owns the range
/// message format for nested fields.
const STRUCTURAL_RULES: &[FieldRule] = &[
    FieldRule {
        field: "characterName",
        constraint: Constraint::Required,
        value: |c: &Character| FieldValue::Text(&c.character_name),
    },
    FieldRule {
        field: "race",
        constraint: Constraint::Required,
        value: |c: &Character| FieldValue::Text(&c.race),
    },
    FieldRule {
        field: "class",
        constraint: Constraint::Required,
        value: |c: &Character| FieldValue::Text(&c.class),
    },
    FieldRule {
        field: "level",
        constraint: Constraint::Range {
            min: LEVEL_MIN,
            max: LEVEL_MAX,
        },
        value: |c: &Character| FieldValue::Int(i64::from(c.level)),
    },
    FieldRule {
        field: "experiencePoints",
        constraint: Constraint::AtLeast(0),
        value: |c: &Character| FieldValue::Int(i64::from(c.experience_points)),
    },
    FieldRule {
        field: "alignment",
        constraint: Constraint::OneOf(VALID_ALIGNMENTS),
        value: |c: &Character| FieldValue::OptionalText(c.alignment.as_deref()),
    },
];

impl FieldRule {
    fn check(&self, character: &Character) -> Option<ValidationError> {
        match (&self.constraint, (self.value)(character)) {
            (Constraint::Required, FieldValue::Text(value)) => {
                value.trim().is_empty().then(|| required(self.field))
            }
            (Constraint::Required, FieldValue::OptionalText(value)) => value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .is_none()
                .then(|| required(self.field)),
            (Constraint::Range { min, max }, FieldValue::Int(value)) => {
                range_error(self.field, value, *min, *max)
            }
            (Constraint::AtLeast(min), FieldValue::Int(value)) => (value < *min).then(|| {
                structural(
                    self.field,
                    format!("{} must be at least {} (got {})", self.field, min, value),
                )
            }),
            (Constraint::OneOf(allowed), FieldValue::OptionalText(value)) => value
                .filter(|v| !allowed.contains(v))
                .map(|v| one_of_error(self.field, v, allowed)),
            (Constraint::OneOf(allowed), FieldValue::Text(value)) => (!allowed.contains(&value))
                .then(|| one_of_error(self.field, value, allowed)),
            // The table is static; a rule never pairs a constraint with a
            // value shape it cannot judge.
            _ => None,
        }
    }
}

fn structural(field: &str, message: String) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message,
        code: ValidationCode::ValidationError,
    }
}

fn required(field: &'static str) -> ValidationError {
    structural(field, format!("{field} is required"))
}

fn range_error(field: &str, value: i64, min: i64, max: i64) -> Option<ValidationError> {
    (value < min || value > max).then(|| {
        structural(
            field,
            format!("{field} must be between {min} and {max} (got {value})"),
        )
    })
}

fn one_of_error(field: &str, value: &str, allowed: &[&str]) -> ValidationError {
    structural(
        field,
        format!(
            "{} must be one of: {} (got '{}')",
            field,
            allowed.join(", "),
            value
        ),
    )
}

// =============================================================================
// Domain pass
// =============================================================================

fn domain_errors(character: &Character) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !VALID_RACES.contains(&character.race.as_str()) {
        errors.push(ValidationError {
            field: "race".to_string(),
            message: format!(
                "Invalid race '{}'. Must be one of: {}",
                character.race,
                VALID_RACES.join(", ")
            ),
            code: ValidationCode::InvalidRace,
        });
    }

    if !VALID_CLASSES.contains(&character.class.as_str()) {
        errors.push(ValidationError {
            field: "class".to_string(),
            message: format!(
                "Invalid class '{}'. Must be one of: {}",
                character.class,
                VALID_CLASSES.join(", ")
            ),
            code: ValidationCode::InvalidClass,
        });
    }

    for (index, entry) in character.multiclass.iter().enumerate() {
        if !VALID_CLASSES.contains(&entry.class.as_str()) {
            errors.push(ValidationError {
                field: format!("multiclass[{index}].class"),
                message: format!(
                    "Invalid multiclass class '{}'. Must be one of: {}",
                    entry.class,
                    VALID_CLASSES.join(", ")
                ),
                code: ValidationCode::InvalidMulticlass,
            });
        }
        if let Some(error) = range_error(
            &format!("multiclass[{index}].level"),
            i64::from(entry.level),
            LEVEL_MIN,
            LEVEL_MAX,
        ) {
            errors.push(error);
        }
    }

    let total = character.effective_total_level();
    if total > MAX_TOTAL_LEVEL {
        errors.push(ValidationError {
            field: "level".to_string(),
            message: format!(
                "Total character level {total} exceeds the maximum of {MAX_TOTAL_LEVEL}"
            ),
            code: ValidationCode::LevelTooHigh,
        });
    }

    for (name, base) in character.ability_scores.named() {
        if let Some(error) = range_error(
            &format!("abilityScores.{name}.base"),
            i64::from(base),
            ABILITY_MIN,
            ABILITY_MAX,
        ) {
            errors.push(error);
        }
    }

    errors
}

/// Validate a character record, returning every detectable problem at once.
///
/// Both passes always run; nothing short-circuits. An empty result means the
/// record may be persisted.
pub fn validate(character: &Character) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = STRUCTURAL_RULES
        .iter()
        .filter_map(|rule| rule.check(character))
        .collect();
    errors.extend(domain_errors(character));
    errors
}
