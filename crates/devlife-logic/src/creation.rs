//! Character creation input and its validation.
//!
//! [`validate_creation`] checks every constraint and returns all violations
//! at once; an empty list means the input is valid. [`build_agent`] validates
//! and then constructs the [`Agent`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::schedule::{Schedule, MINUTES_PER_DAY};
use crate::skills::{is_known_skill, names, MAX_SKILL_LEVEL};
use crate::traits::{are_compatible, trait_by_id};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
/// Skill points must be spent exactly.
pub const SKILL_POINT_BUDGET: u32 = 100;
pub const REQUIRED_TRAITS: usize = 2;
pub const LUNCH_MIN_MINUTES: u32 = 30;
pub const LUNCH_MAX_MINUTES: u32 = 120;

/// Everything the player chooses when creating a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreationInput {
    pub name: String,
    /// Skill name to starting level.
    pub skills: BTreeMap<String, u32>,
    /// Trait catalog ids.
    pub traits: Vec<String>,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreationError {
    #[error("name must be at least 2 characters")]
    NameTooShort,
    #[error("name must be at most 50 characters (got {0})")]
    NameTooLong(usize),
    #[error("unknown skill '{0}'")]
    UnknownSkill(String),
    #[error("skill '{skill}' has level {level}, must be between 0 and 20")]
    SkillLevelOutOfRange { skill: String, level: u32 },
    #[error("exactly 100 skill points must be assigned (assigned {0})")]
    SkillPointsMismatch(u32),
    #[error("exactly 2 traits must be chosen (chose {0})")]
    TraitCount(usize),
    #[error("unknown trait '{0}'")]
    UnknownTrait(String),
    #[error("trait '{0}' was chosen twice")]
    DuplicateTrait(String),
    #[error("traits '{0}' and '{1}' are incompatible")]
    IncompatibleTraits(String, String),
    #[error("{field} at minute {value} is outside the day")]
    TimeOutOfRange { field: &'static str, value: u32 },
    #[error("break at minute {0} has no duration")]
    EmptyBreak(u32),
    #[error("break at minute {time} lasting {duration} minutes runs past midnight")]
    BreakPastMidnight { time: u32, duration: u32 },
    #[error("work start ({start}) must be before work end ({end})")]
    WorkWindowInverted { start: u32, end: u32 },
    #[error("lunch must last between 30 and 120 minutes (got {0})")]
    LunchDurationOutOfRange(u32),
    #[error("lunch must fall within working hours")]
    LunchOutsideWorkHours,
}

/// Returns every violated creation constraint.
pub fn validate_creation(input: &CreationInput) -> Vec<CreationError> {
    let mut errors = Vec::new();

    let trimmed = input.name.trim().chars().count();
    if trimmed < NAME_MIN_CHARS {
        errors.push(CreationError::NameTooShort);
    }
    let length = input.name.chars().count();
    if length > NAME_MAX_CHARS {
        errors.push(CreationError::NameTooLong(length));
    }

    for (skill, level) in &input.skills {
        if !is_known_skill(skill) {
            errors.push(CreationError::UnknownSkill(skill.clone()));
        }
        if *level > MAX_SKILL_LEVEL {
            errors.push(CreationError::SkillLevelOutOfRange {
                skill: skill.clone(),
                level: *level,
            });
        }
    }
    let total: u32 = input.skills.values().fold(0u32, |acc, v| acc.saturating_add(*v));
    if total != SKILL_POINT_BUDGET {
        errors.push(CreationError::SkillPointsMismatch(total));
    }

    errors.extend(trait_errors(&input.traits));
    errors.extend(schedule_errors(&input.schedule));

    errors
}

/// Trait selection errors: count, catalog membership, duplicates, and
/// incompatibility.
pub fn trait_errors(trait_ids: &[String]) -> Vec<CreationError> {
    let mut errors = Vec::new();

    if trait_ids.len() != REQUIRED_TRAITS {
        errors.push(CreationError::TraitCount(trait_ids.len()));
    }
    for id in trait_ids {
        if trait_by_id(id).is_none() {
            errors.push(CreationError::UnknownTrait(id.clone()));
        }
    }
    for (i, a) in trait_ids.iter().enumerate() {
        for b in &trait_ids[i + 1..] {
            if a == b {
                errors.push(CreationError::DuplicateTrait(a.clone()));
            } else if !are_compatible(a, b) {
                errors.push(CreationError::IncompatibleTraits(a.clone(), b.clone()));
            }
        }
    }

    errors
}

/// Schedule errors: times inside the day, breaks that are non-empty and end
/// by midnight, non-empty work window, lunch length, and lunch inside the
/// work window.
pub fn schedule_errors(schedule: &Schedule) -> Vec<CreationError> {
    let mut errors = Vec::new();

    let times = [
        ("work start", schedule.work_start),
        ("work end", schedule.work_end),
        ("lunch start", schedule.lunch_start),
    ];
    for (field, value) in times {
        if value >= MINUTES_PER_DAY {
            errors.push(CreationError::TimeOutOfRange { field, value });
        }
    }
    for b in &schedule.breaks {
        if b.time >= MINUTES_PER_DAY {
            errors.push(CreationError::TimeOutOfRange {
                field: "break",
                value: b.time,
            });
        } else if b.end() > MINUTES_PER_DAY {
            errors.push(CreationError::BreakPastMidnight {
                time: b.time,
                duration: b.duration,
            });
        }
        if b.duration == 0 {
            errors.push(CreationError::EmptyBreak(b.time));
        }
    }

    if schedule.work_start >= schedule.work_end {
        errors.push(CreationError::WorkWindowInverted {
            start: schedule.work_start,
            end: schedule.work_end,
        });
    }
    if !(LUNCH_MIN_MINUTES..=LUNCH_MAX_MINUTES).contains(&schedule.lunch_duration) {
        errors.push(CreationError::LunchDurationOutOfRange(schedule.lunch_duration));
    }
    if schedule.lunch_start < schedule.work_start || schedule.lunch_end() > schedule.work_end {
        errors.push(CreationError::LunchOutsideWorkHours);
    }

    errors
}

/// Renders errors as display messages.
pub fn error_messages(errors: &[CreationError]) -> Vec<String> {
    errors.iter().map(|e| e.to_string()).collect()
}

/// Validates the input and builds the agent. Every catalog skill is present
/// on the agent; skills absent from the input start at level 0.
pub fn build_agent(
    input: &CreationInput,
    id: impl Into<String>,
    created_at: DateTime<Utc>,
) -> Result<Agent, Vec<CreationError>> {
    let errors = validate_creation(input);
    if !errors.is_empty() {
        return Err(errors);
    }

    let mut levels: BTreeMap<String, u32> =
        names::ALL.iter().map(|name| (name.to_string(), 0)).collect();
    levels.extend(input.skills.iter().map(|(k, v)| (k.clone(), *v)));

    let traits = input.traits.iter().filter_map(|t| trait_by_id(t)).collect();

    Ok(Agent::new(
        id,
        input.name.trim(),
        &levels,
        traits,
        input.schedule.clone(),
        created_at,
    ))
}
