//! Personality traits and the fixed trait catalog.
//!
//! A trait is an immutable bundle of modifiers. Named numeric effects are
//! plain fields that default to zero; per-skill modifiers live in a separate
//! map keyed by skill name. Every agent carries exactly two traits, which
//! must not form one of the [`INCOMPATIBLE_PAIRS`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::skills::names as skill;

/// Version of the built-in catalog. Bumped whenever an effect changes.
pub const CATALOG_VERSION: u32 = 1;

/// Dominant behavior style of a trait (and, by majority, of an agent).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorType {
    Disciplined,
    Creative,
    Social,
    Focused,
    Methodical,
    #[default]
    Balanced,
}

impl BehaviorType {
    pub const ALL: [BehaviorType; 6] = [
        BehaviorType::Disciplined,
        BehaviorType::Creative,
        BehaviorType::Social,
        BehaviorType::Focused,
        BehaviorType::Methodical,
        BehaviorType::Balanced,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BehaviorType::Disciplined => "disciplined",
            BehaviorType::Creative => "creative",
            BehaviorType::Social => "social",
            BehaviorType::Focused => "focused",
            BehaviorType::Methodical => "methodical",
            BehaviorType::Balanced => "balanced",
        }
    }
}

/// Time-of-day productivity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPeriod {
    /// [6, 12)
    Morning,
    /// [12, 18)
    Afternoon,
    /// [18, 24) and [0, 6)
    Night,
}

impl DayPeriod {
    pub fn from_hour(hour: u32) -> DayPeriod {
        match hour % 24 {
            6..=11 => DayPeriod::Morning,
            12..=17 => DayPeriod::Afternoon,
            _ => DayPeriod::Night,
        }
    }
}

/// Effects of a trait. Absent fields are zero. Percentages unless noted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraitEffects {
    /// Absolute change to the energy cap.
    pub max_energy: f32,
    pub energy_decay_rate: f32,
    pub hunger_decay_rate: f32,
    pub thirst_decay_rate: f32,
    pub motivation_decay_rate: f32,
    pub morning_productivity: f32,
    pub afternoon_productivity: f32,
    pub night_productivity: f32,
    pub concentration_bonus: f32,
    pub creativity_bonus: f32,
    pub quality_bonus: f32,
    pub speed_bonus: f32,
    pub team_morale_effect: f32,
    pub communication_bonus: f32,
    pub negotiation_bonus: f32,
    /// Level adjustments keyed by skill name.
    pub skill_modifiers: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub id: String,
    pub name: String,
    pub description: String,
    pub behavior_type: BehaviorType,
    pub effects: TraitEffects,
}

impl Trait {
    /// Level adjustment for a skill; zero when the trait does not mention it.
    pub fn skill_modifier(&self, skill_name: &str) -> i32 {
        self.effects
            .skill_modifiers
            .get(skill_name)
            .copied()
            .unwrap_or(0)
    }

    pub fn skill_modifiers(&self) -> &BTreeMap<String, i32> {
        &self.effects.skill_modifiers
    }

    /// Productivity adjustment for an hour of the day, as a fraction.
    pub fn productivity_modifier(&self, hour: u32) -> f32 {
        let percent = match DayPeriod::from_hour(hour) {
            DayPeriod::Morning => self.effects.morning_productivity,
            DayPeriod::Afternoon => self.effects.afternoon_productivity,
            DayPeriod::Night => self.effects.night_productivity,
        };
        percent / 100.0
    }

    pub fn concentration_modifier(&self) -> f32 {
        self.effects.concentration_bonus / 100.0
    }

    pub fn creativity_modifier(&self) -> f32 {
        self.effects.creativity_bonus / 100.0
    }

    pub fn quality_modifier(&self) -> f32 {
        self.effects.quality_bonus / 100.0
    }

    pub fn speed_modifier(&self) -> f32 {
        self.effects.speed_bonus / 100.0
    }

    pub fn max_energy_modifier(&self) -> f32 {
        self.effects.max_energy
    }

    pub fn is_compatible_with(&self, other: &Trait) -> bool {
        are_compatible(&self.id, &other.id)
    }

    /// Human-readable effect lines, e.g. `"+15% morning productivity"`.
    pub fn effects_description(&self) -> Vec<String> {
        let e = &self.effects;
        let mut lines = Vec::new();

        let mut pct = |value: f32, what: &str| {
            if value != 0.0 {
                lines.push(format!("{:+}% {}", value, what));
            }
        };
        pct(e.morning_productivity, "morning productivity");
        pct(e.afternoon_productivity, "afternoon productivity");
        pct(e.night_productivity, "night productivity");
        pct(e.concentration_bonus, "concentration");
        pct(e.creativity_bonus, "creativity");
        pct(e.quality_bonus, "work quality");
        pct(e.speed_bonus, "work speed");
        pct(e.energy_decay_rate, "energy drain");
        pct(e.hunger_decay_rate, "hunger rate");
        pct(e.thirst_decay_rate, "thirst rate");
        pct(e.motivation_decay_rate, "motivation loss");
        pct(e.team_morale_effect, "team morale");
        pct(e.communication_bonus, "communication");
        pct(e.negotiation_bonus, "negotiation");

        if e.max_energy != 0.0 {
            lines.push(format!("{:+} max energy", e.max_energy));
        }
        for (name, modifier) in &e.skill_modifiers {
            lines.push(format!("{:+} {}", modifier, name));
        }
        lines
    }
}

/// Catalog ids.
pub mod ids {
    pub const WORKAHOLIC: &str = "workaholic";
    pub const PERFECTIONIST: &str = "perfectionist";
    pub const MORNING_PERSON: &str = "morning_person";
    pub const NIGHT_OWL: &str = "night_owl";
    pub const CHARISMATIC: &str = "charismatic";
    pub const INTROVERT: &str = "introvert";
    pub const CREATIVE: &str = "creative";
    pub const METHODICAL: &str = "methodical";
    pub const QUICK_LEARNER: &str = "quick_learner";
    pub const SOCIAL: &str = "social";
    pub const FOCUSED: &str = "focused";
    pub const MULTITASKER: &str = "multitasker";
    pub const DETAIL_ORIENTED: &str = "detail_oriented";
    pub const INNOVATIVE: &str = "innovative";
    pub const PRAGMATIC: &str = "pragmatic";
}

/// Mutually exclusive trait pairs. The relation is symmetric.
pub const INCOMPATIBLE_PAIRS: [(&str, &str); 5] = [
    (ids::MORNING_PERSON, ids::NIGHT_OWL),
    (ids::INTROVERT, ids::SOCIAL),
    (ids::PERFECTIONIST, ids::PRAGMATIC),
    (ids::METHODICAL, ids::CREATIVE),
    (ids::FOCUSED, ids::MULTITASKER),
];

/// False if `(a, b)` appears in [`INCOMPATIBLE_PAIRS`] in either order.
pub fn are_compatible(a: &str, b: &str) -> bool {
    !INCOMPATIBLE_PAIRS
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

fn modifiers(pairs: &[(&str, i32)]) -> BTreeMap<String, i32> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn entry(
    id: &str,
    name: &str,
    description: &str,
    behavior_type: BehaviorType,
    effects: TraitEffects,
) -> Trait {
    Trait {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        behavior_type,
        effects,
    }
}

/// The built-in trait catalog.
pub fn catalog() -> Vec<Trait> {
    use BehaviorType::*;

    vec![
        entry(
            ids::WORKAHOLIC,
            "Workaholic",
            "Lives for work. More stamina on the job, but burns out faster.",
            Disciplined,
            TraitEffects {
                max_energy: 20.0,
                energy_decay_rate: 15.0,
                morning_productivity: 15.0,
                afternoon_productivity: 10.0,
                concentration_bonus: 10.0,
                skill_modifiers: modifiers(&[(skill::COMMUNICATION, -5)]),
                ..Default::default()
            },
        ),
        entry(
            ids::PERFECTIONIST,
            "Perfectionist",
            "Delivers excellent work but takes longer to finish it.",
            Methodical,
            TraitEffects {
                quality_bonus: 25.0,
                speed_bonus: -20.0,
                concentration_bonus: 15.0,
                creativity_bonus: -10.0,
                skill_modifiers: modifiers(&[(skill::TESTING, 10), (skill::ARCHITECTURE, 5)]),
                ..Default::default()
            },
        ),
        entry(
            ids::MORNING_PERSON,
            "Early Bird",
            "At their best early in the day, fading by nightfall.",
            Disciplined,
            TraitEffects {
                morning_productivity: 30.0,
                afternoon_productivity: 10.0,
                night_productivity: -25.0,
                concentration_bonus: 20.0,
                skill_modifiers: modifiers(&[(skill::STAMINA, 5)]),
                ..Default::default()
            },
        ),
        entry(
            ids::NIGHT_OWL,
            "Night Owl",
            "Comes alive after dark. Mornings are a struggle.",
            Creative,
            TraitEffects {
                morning_productivity: -20.0,
                afternoon_productivity: 5.0,
                night_productivity: 35.0,
                creativity_bonus: 15.0,
                skill_modifiers: modifiers(&[(skill::BACKEND, 5)]),
                ..Default::default()
            },
        ),
        entry(
            ids::CHARISMATIC,
            "Charismatic",
            "Naturally persuasive and good at rallying people.",
            Social,
            TraitEffects {
                team_morale_effect: 20.0,
                skill_modifiers: modifiers(&[
                    (skill::COMMUNICATION, 25),
                    (skill::NEGOTIATION, 20),
                    (skill::MARKETING, 15),
                    (skill::MANAGEMENT, 10),
                ]),
                ..Default::default()
            },
        ),
        entry(
            ids::INTROVERT,
            "Introvert",
            "Does their deepest work alone; meetings drain them.",
            Focused,
            TraitEffects {
                concentration_bonus: 25.0,
                team_morale_effect: -10.0,
                skill_modifiers: modifiers(&[
                    (skill::BACKEND, 10),
                    (skill::SYSTEMS, 8),
                    (skill::ARCHITECTURE, 5),
                    (skill::COMMUNICATION, -15),
                ]),
                ..Default::default()
            },
        ),
        entry(
            ids::CREATIVE,
            "Creative",
            "Full of original ideas, easily distracted by new ones.",
            Creative,
            TraitEffects {
                creativity_bonus: 25.0,
                concentration_bonus: -10.0,
                skill_modifiers: modifiers(&[
                    (skill::FRONTEND, 15),
                    (skill::ARCHITECTURE, 10),
                    (skill::ANALYSIS, 8),
                    (skill::TESTING, -5),
                ]),
                ..Default::default()
            },
        ),
        entry(
            ids::METHODICAL,
            "Methodical",
            "Follows the process step by step. Reliable, rarely surprising.",
            Methodical,
            TraitEffects {
                quality_bonus: 20.0,
                concentration_bonus: 15.0,
                creativity_bonus: -15.0,
                speed_bonus: -10.0,
                skill_modifiers: modifiers(&[
                    (skill::TESTING, 15),
                    (skill::SYSTEMS, 10),
                    (skill::MANAGEMENT, 8),
                ]),
                ..Default::default()
            },
        ),
        entry(
            ids::QUICK_LEARNER,
            "Fast Learner",
            "Picks up new skills quickly and gains extra experience.",
            Balanced,
            TraitEffects {
                concentration_bonus: 10.0,
                skill_modifiers: modifiers(&[(skill::LEARNING, 20), (skill::ANALYSIS, 10)]),
                ..Default::default()
            },
        ),
        entry(
            ids::SOCIAL,
            "Social",
            "Thrives around people and keeps spirits up, at some cost to focus.",
            Social,
            TraitEffects {
                team_morale_effect: 25.0,
                concentration_bonus: -15.0,
                motivation_decay_rate: -20.0,
                skill_modifiers: modifiers(&[
                    (skill::COMMUNICATION, 20),
                    (skill::MARKETING, 10),
                    (skill::NEGOTIATION, 5),
                ]),
                ..Default::default()
            },
        ),
        entry(
            ids::FOCUSED,
            "Focused",
            "Locks onto one problem until it is solved.",
            Focused,
            TraitEffects {
                concentration_bonus: 30.0,
                speed_bonus: 10.0,
                creativity_bonus: -5.0,
                skill_modifiers: modifiers(&[
                    (skill::BACKEND, 8),
                    (skill::TESTING, 10),
                    (skill::SYSTEMS, 5),
                ]),
                ..Default::default()
            },
        ),
        entry(
            ids::MULTITASKER,
            "Multitasker",
            "Juggles many things at once, not always carefully.",
            Balanced,
            TraitEffects {
                speed_bonus: 15.0,
                quality_bonus: -15.0,
                concentration_bonus: -10.0,
                skill_modifiers: modifiers(&[(skill::MANAGEMENT, 15), (skill::STAMINA, 5)]),
                ..Default::default()
            },
        ),
        entry(
            ids::DETAIL_ORIENTED,
            "Detail-Oriented",
            "Spots the bugs everyone else misses.",
            Methodical,
            TraitEffects {
                quality_bonus: 20.0,
                speed_bonus: -15.0,
                concentration_bonus: 10.0,
                skill_modifiers: modifiers(&[(skill::TESTING, 20), (skill::ARCHITECTURE, 5)]),
                ..Default::default()
            },
        ),
        entry(
            ids::INNOVATIVE,
            "Innovative",
            "Always looking for a better way to build things.",
            Creative,
            TraitEffects {
                creativity_bonus: 20.0,
                skill_modifiers: modifiers(&[
                    (skill::LEARNING, 15),
                    (skill::ARCHITECTURE, 12),
                    (skill::FRONTEND, 8),
                    (skill::TESTING, -8),
                    (skill::SYSTEMS, -5),
                ]),
                ..Default::default()
            },
        ),
        entry(
            ids::PRAGMATIC,
            "Pragmatic",
            "Ships what works and moves on.",
            Balanced,
            TraitEffects {
                speed_bonus: 20.0,
                quality_bonus: -10.0,
                creativity_bonus: -5.0,
                concentration_bonus: 5.0,
                skill_modifiers: modifiers(&[(skill::MANAGEMENT, 10), (skill::BACKEND, 8)]),
                ..Default::default()
            },
        ),
    ]
}

pub fn trait_by_id(id: &str) -> Option<Trait> {
    catalog().into_iter().find(|t| t.id == id)
}

pub fn traits_by_behavior(behavior: BehaviorType) -> Vec<Trait> {
    catalog()
        .into_iter()
        .filter(|t| t.behavior_type == behavior)
        .collect()
}

/// Majority behavior of a trait set. Anything short of a strict majority is
/// balanced.
pub fn dominant_behavior(traits: &[Trait]) -> BehaviorType {
    let mut counts: BTreeMap<&'static str, (BehaviorType, usize)> = BTreeMap::new();
    for t in traits {
        counts
            .entry(t.behavior_type.label())
            .or_insert((t.behavior_type, 0))
            .1 += 1;
    }
    let Some(best) = counts.values().map(|(_, n)| *n).max() else {
        return BehaviorType::Balanced;
    };
    let mut leaders = counts.values().filter(|(_, n)| *n == best);
    match (leaders.next(), leaders.next()) {
        (Some((behavior, _)), None) => *behavior,
        _ => BehaviorType::Balanced,
    }
}

/// Broad play styles used to suggest traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayStyle {
    Technical,
    Business,
    Balanced,
}

impl PlayStyle {
    pub const ALL: [PlayStyle; 3] = [
        PlayStyle::Technical,
        PlayStyle::Business,
        PlayStyle::Balanced,
    ];
}

/// Catalog traits that suit a play style, in catalog order. Any two of them
/// are compatible with each other.
pub fn recommended_traits(style: PlayStyle) -> Vec<Trait> {
    let picks: &[&str] = match style {
        PlayStyle::Technical => &[
            ids::INTROVERT,
            ids::FOCUSED,
            ids::METHODICAL,
            ids::DETAIL_ORIENTED,
            ids::NIGHT_OWL,
        ],
        PlayStyle::Business => &[
            ids::CHARISMATIC,
            ids::SOCIAL,
            ids::PRAGMATIC,
            ids::MULTITASKER,
            ids::MORNING_PERSON,
        ],
        PlayStyle::Balanced => &[
            ids::QUICK_LEARNER,
            ids::INNOVATIVE,
            ids::CREATIVE,
            ids::WORKAHOLIC,
        ],
    };
    catalog()
        .into_iter()
        .filter(|t| picks.contains(&t.id.as_str()))
        .collect()
}
