//! Skill levels, experience, and the progression curve.
//!
//! Skills run from level 0 to [`MAX_SKILL_LEVEL`]. Each level requires
//! `floor(100 × 1.2^level)` experience; the maximum level is terminal.
//!
//! ```
//! use devlife_logic::skills::{Skill, names};
//!
//! let mut skill = Skill::new(names::BACKEND, 0);
//! assert!(skill.add_experience(100.0));
//! assert_eq!(skill.level(), 1);
//! assert_eq!(skill.experience(), 0.0);
//! ```
//!
//! # Single-step progression
//!
//! [`Skill::add_experience`] raises the level at most once per call. Excess
//! experience stays in the pool and is applied on the next call, so a large
//! one-off grant settles over successive calls.

use serde::{Deserialize, Serialize};

/// Highest reachable level.
pub const MAX_SKILL_LEVEL: u32 = 20;

/// Base experience for the first level.
const BASE_EXPERIENCE: f64 = 100.0;
/// Growth factor of the required experience per level.
const GROWTH: f64 = 1.2;

/// Canonical skill names.
pub mod names {
    pub const BACKEND: &str = "backend";
    pub const FRONTEND: &str = "frontend";
    pub const SYSTEMS: &str = "systems";
    pub const NETWORKING: &str = "networking";
    pub const TESTING: &str = "testing";
    pub const ARCHITECTURE: &str = "architecture";
    pub const ANALYSIS: &str = "analysis";
    pub const NEGOTIATION: &str = "negotiation";
    pub const COMMUNICATION: &str = "communication";
    pub const MARKETING: &str = "marketing";
    pub const MANAGEMENT: &str = "management";
    pub const STAMINA: &str = "stamina";
    pub const FOCUS: &str = "focus";
    pub const LEARNING: &str = "learning";

    /// Every skill an agent can be created with.
    pub const ALL: [&str; 14] = [
        BACKEND,
        FRONTEND,
        SYSTEMS,
        NETWORKING,
        TESTING,
        ARCHITECTURE,
        ANALYSIS,
        NEGOTIATION,
        COMMUNICATION,
        MARKETING,
        MANAGEMENT,
        STAMINA,
        FOCUS,
        LEARNING,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    Technical,
    Business,
    Personal,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 3] = [
        SkillCategory::Technical,
        SkillCategory::Business,
        SkillCategory::Personal,
    ];

    /// Category of a skill name. Unknown names are personal.
    pub fn for_skill(name: &str) -> SkillCategory {
        use names::*;
        match name {
            BACKEND | FRONTEND | SYSTEMS | NETWORKING | TESTING | ARCHITECTURE => {
                SkillCategory::Technical
            }
            ANALYSIS | NEGOTIATION | COMMUNICATION | MARKETING | MANAGEMENT => {
                SkillCategory::Business
            }
            _ => SkillCategory::Personal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkillCategory::Technical => "technical",
            SkillCategory::Business => "business",
            SkillCategory::Personal => "personal",
        }
    }
}

/// True if `name` is one of [`names::ALL`].
pub fn is_known_skill(name: &str) -> bool {
    names::ALL.contains(&name)
}

/// Experience needed to advance from `level` to the next one, or `None` at
/// the maximum level.
pub fn required_experience(level: u32) -> Option<f32> {
    if level >= MAX_SKILL_LEVEL {
        return None;
    }
    Some((BASE_EXPERIENCE * GROWTH.powi(level as i32)).floor() as f32)
}

/// Work effectiveness of a level: 0.1 at level 0, otherwise
/// `min(2.0, 0.1 + level × 0.095)`.
pub fn effectiveness(level: u32) -> f32 {
    if level == 0 {
        0.1
    } else {
        (0.1 + level as f32 * 0.095).min(2.0)
    }
}

/// Tier name of a level.
pub fn level_description(level: u32) -> &'static str {
    match level {
        0 => "None",
        1..=3 => "Beginner",
        4..=6 => "Basic",
        7..=9 => "Intermediate",
        10..=12 => "Advanced",
        13..=15 => "Expert",
        16..=18 => "Master",
        _ => "Legend",
    }
}

/// A named proficiency with an experience pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: SkillCategory,
    level: u32,
    experience: f32,
}

impl Skill {
    /// New skill at `level` (capped at the maximum) with no experience.
    pub fn new(name: &str, level: u32) -> Self {
        Self {
            name: name.to_string(),
            category: SkillCategory::for_skill(name),
            level: level.min(MAX_SKILL_LEVEL),
            experience: 0.0,
        }
    }

    /// Restores a skill with an existing experience pool. Negative or
    /// non-finite experience is reset to zero.
    pub fn with_experience(name: &str, level: u32, experience: f32) -> Self {
        let mut skill = Self::new(name, level);
        skill.experience = if experience.is_finite() { experience.max(0.0) } else { 0.0 };
        skill
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> f32 {
        self.experience
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= MAX_SKILL_LEVEL
    }

    /// Adds experience and levels up at most once. Returns whether the level
    /// increased. Negative or non-finite amounts are ignored.
    pub fn add_experience(&mut self, amount: f32) -> bool {
        if !amount.is_finite() || amount < 0.0 {
            return false;
        }
        self.experience += amount;

        match required_experience(self.level) {
            Some(required) if self.experience >= required => {
                self.experience -= required;
                self.level += 1;
                true
            }
            _ => false,
        }
    }

    /// Experience needed for the next level, or `None` at the maximum.
    pub fn required_experience_for_next_level(&self) -> Option<f32> {
        required_experience(self.level)
    }

    /// Fraction of the way to the next level, in `[0, 1]`. 1 at the maximum.
    pub fn progress_to_next_level(&self) -> f32 {
        match required_experience(self.level) {
            Some(required) => (self.experience / required).clamp(0.0, 1.0),
            None => 1.0,
        }
    }

    pub fn meets_requirement(&self, required_level: u32) -> bool {
        self.level >= required_level
    }

    pub fn effectiveness_modifier(&self) -> f32 {
        effectiveness(self.level)
    }

    pub fn level_description(&self) -> &'static str {
        level_description(self.level)
    }

    /// True when the level and experience satisfy their bounds.
    pub fn is_consistent(&self) -> bool {
        self.level <= MAX_SKILL_LEVEL && self.experience.is_finite() && self.experience >= 0.0
    }
}
