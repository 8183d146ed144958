//! Character service - creation, presets, random characters and stats.
//!
//! Stateless functions over [`CreationInput`] and [`Agent`]. Validation
//! itself lives in `devlife_logic::creation`; this module adds identity and
//! timestamps, canned presets for the creation screen, and reporting.

use chrono::Utc;
use devlife_logic::agent::Agent;
use devlife_logic::creation::{build_agent, CreationError, CreationInput, SKILL_POINT_BUDGET};
use devlife_logic::schedule::Schedule;
use devlife_logic::skills::{names, SkillCategory, MAX_SKILL_LEVEL};
use devlife_logic::traits::{are_compatible, catalog, ids, trait_by_id, Trait};
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::persistence::{agent_from_json, agent_to_json, SaveError};

/// Names used for random characters.
static RANDOM_NAMES: &[&str] = &[
    "Alex", "Jordan", "Casey", "Taylor", "Morgan", "Riley", "Avery", "Quinn",
];

/// Preset skill point allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillProfile {
    Fullstack,
    Backend,
    Frontend,
    Business,
    Balanced,
}

impl SkillProfile {
    pub const ALL: [SkillProfile; 5] = [
        SkillProfile::Fullstack,
        SkillProfile::Backend,
        SkillProfile::Frontend,
        SkillProfile::Business,
        SkillProfile::Balanced,
    ];
}

/// Preset trait shortlists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitProfile {
    Technical,
    Business,
    Creative,
    Management,
}

impl TraitProfile {
    pub const ALL: [TraitProfile; 4] = [
        TraitProfile::Technical,
        TraitProfile::Business,
        TraitProfile::Creative,
        TraitProfile::Management,
    ];
}

/// 09:00-18:00, lunch at 13:00 for an hour, coffee at 11:00 and 16:00.
pub fn default_schedule() -> Schedule {
    Schedule::default()
}

/// Skill levels for a profile. Every catalog skill is listed and the levels
/// sum to the creation budget.
pub fn recommended_skill_distribution(profile: SkillProfile) -> BTreeMap<String, u32> {
    use names::*;
    // backend, frontend, systems, networking, testing, architecture,
    // analysis, negotiation, communication, marketing, management,
    // stamina, focus, learning
    let levels: [u32; 14] = match profile {
        SkillProfile::Fullstack => [15, 15, 10, 5, 8, 10, 10, 4, 8, 3, 7, 3, 2, 0],
        SkillProfile::Backend => [20, 5, 15, 10, 8, 12, 10, 3, 5, 2, 5, 3, 2, 0],
        SkillProfile::Frontend => [8, 20, 5, 3, 10, 8, 12, 4, 10, 8, 6, 3, 2, 1],
        SkillProfile::Business => [5, 5, 3, 2, 3, 4, 18, 10, 15, 12, 15, 4, 2, 2],
        SkillProfile::Balanced => [10, 10, 8, 6, 6, 8, 12, 5, 10, 6, 8, 4, 4, 3],
    };
    let order = [
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
    order
        .iter()
        .zip(levels)
        .map(|(name, level)| (name.to_string(), level))
        .collect()
}

/// Catalog traits that suit a profile, in catalog order.
pub fn suggested_traits(profile: TraitProfile) -> Vec<Trait> {
    let picks: &[&str] = match profile {
        TraitProfile::Technical => &[
            ids::FOCUSED,
            ids::METHODICAL,
            ids::DETAIL_ORIENTED,
            ids::NIGHT_OWL,
            ids::INTROVERT,
        ],
        TraitProfile::Business => &[
            ids::CHARISMATIC,
            ids::SOCIAL,
            ids::MORNING_PERSON,
            ids::PRAGMATIC,
            ids::MULTITASKER,
        ],
        TraitProfile::Creative => &[
            ids::CREATIVE,
            ids::INNOVATIVE,
            ids::NIGHT_OWL,
            ids::QUICK_LEARNER,
        ],
        TraitProfile::Management => &[
            ids::CHARISMATIC,
            ids::MULTITASKER,
            ids::MORNING_PERSON,
            ids::SOCIAL,
            ids::PRAGMATIC,
        ],
    };
    catalog()
        .into_iter()
        .filter(|t| picks.contains(&t.id.as_str()))
        .collect()
}

/// Point cost of an unusual schedule. The default schedule costs nothing.
pub fn schedule_cost(schedule: &Schedule) -> u32 {
    let mut cost = 0;
    if schedule.work_start < 480 {
        cost += 5;
    }
    if schedule.work_end > 1140 {
        cost += 5;
    }
    let hours = schedule.work_hours();
    if hours > 9.0 {
        cost += (hours - 9.0).floor() as u32 * 2;
    }
    if schedule.lunch_duration < 45 {
        cost += 3;
    }
    cost
}

/// One message per incompatible pair among the given trait ids. Unknown ids
/// are ignored.
pub fn validate_trait_compatibility(trait_ids: &[String]) -> Vec<String> {
    let traits: Vec<Trait> = trait_ids.iter().filter_map(|id| trait_by_id(id)).collect();
    let mut conflicts = Vec::new();
    for (i, a) in traits.iter().enumerate() {
        for b in &traits[i + 1..] {
            if !are_compatible(&a.id, &b.id) {
                conflicts.push(format!("{} is incompatible with {}", a.name, b.name));
            }
        }
    }
    conflicts
}

/// Validates the input and creates an agent with a fresh id.
pub fn create_character(input: &CreationInput) -> Result<Agent, Vec<CreationError>> {
    let agent = build_agent(input, Uuid::new_v4().to_string(), Utc::now())?;
    info!("Created character {} ({})", agent.name, agent.id);
    Ok(agent)
}

/// A valid creation input with random name, skills and traits and the
/// default schedule.
pub fn random_creation_input<R: Rng>(rng: &mut R) -> CreationInput {
    let name = RANDOM_NAMES[rng.gen_range(0..RANDOM_NAMES.len())];

    // hand out the budget one point at a time to skills below the cap
    let mut levels: BTreeMap<String, u32> =
        names::ALL.iter().map(|n| (n.to_string(), 0)).collect();
    for _ in 0..SKILL_POINT_BUDGET {
        let open: Vec<&str> = names::ALL
            .iter()
            .copied()
            .filter(|n| levels.get(*n).copied().unwrap_or(0) < MAX_SKILL_LEVEL)
            .collect();
        if let Some(pick) = open.choose(rng) {
            *levels.entry(pick.to_string()).or_insert(0) += 1;
        }
    }

    let all = catalog();
    let mut traits = Vec::new();
    if let Some(first) = all.choose(rng) {
        let partners: Vec<&Trait> = all
            .iter()
            .filter(|t| t.id != first.id && are_compatible(&first.id, &t.id))
            .collect();
        traits.push(first.id.clone());
        if let Some(second) = partners.choose(rng) {
            traits.push(second.id.clone());
        }
    }

    CreationInput {
        name: name.to_string(),
        skills: levels,
        traits,
        schedule: default_schedule(),
    }
}

/// Random character for testing.
pub fn random_character<R: Rng>(rng: &mut R) -> Result<Agent, Vec<CreationError>> {
    create_character(&random_creation_input(rng))
}

/// Skill summary of a character.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStats {
    pub total_skill_points: u32,
    /// Rounded to one decimal.
    pub average_skill_level: f32,
    /// Highest level; ties go to the first name alphabetically.
    pub strongest: Option<(String, u32)>,
    /// Lowest level; ties go to the first name alphabetically.
    pub weakest: Option<(String, u32)>,
    pub technical_score: u32,
    pub business_score: u32,
    pub personal_score: u32,
}

pub fn character_stats(agent: &Agent) -> CharacterStats {
    let skills = &agent.skills;
    let total: u32 = skills.values().map(|s| s.level()).sum();
    let average = if skills.is_empty() {
        0.0
    } else {
        (total as f32 / skills.len() as f32 * 10.0).round() / 10.0
    };

    let mut strongest: Option<(String, u32)> = None;
    let mut weakest: Option<(String, u32)> = None;
    for (name, skill) in skills {
        let level = skill.level();
        if strongest.as_ref().map_or(true, |(_, best)| level > *best) {
            strongest = Some((name.clone(), level));
        }
        if weakest.as_ref().map_or(true, |(_, worst)| level < *worst) {
            weakest = Some((name.clone(), level));
        }
    }

    let score = |category: SkillCategory| -> u32 {
        skills
            .values()
            .filter(|s| s.category == category)
            .map(|s| s.level())
            .sum()
    };

    CharacterStats {
        total_skill_points: total,
        average_skill_level: average,
        strongest,
        weakest,
        technical_score: score(SkillCategory::Technical),
        business_score: score(SkillCategory::Business),
        personal_score: score(SkillCategory::Personal),
    }
}

/// Pretty JSON character document.
pub fn export_character(agent: &Agent) -> Result<String, SaveError> {
    agent_to_json(agent)
}

/// Parses and validates a character document.
pub fn import_character(json: &str) -> Result<Agent, SaveError> {
    agent_from_json(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use devlife_logic::creation::validate_creation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-5;

    fn input(profile: SkillProfile, traits: [&str; 2]) -> CreationInput {
        CreationInput {
            name: "Barbara".to_string(),
            skills: recommended_skill_distribution(profile),
            traits: traits.iter().map(|t| t.to_string()).collect(),
            schedule: default_schedule(),
        }
    }

    #[test]
    fn every_profile_is_a_valid_allocation() {
        for profile in SkillProfile::ALL {
            let skills = recommended_skill_distribution(profile);
            assert_eq!(skills.len(), 14, "{:?}", profile);
            assert_eq!(skills.values().sum::<u32>(), 100, "{:?}", profile);
            assert!(skills.values().all(|l| *l <= 20), "{:?}", profile);
            let errors = validate_creation(&input(profile, [ids::FOCUSED, ids::CREATIVE]));
            assert!(errors.is_empty(), "{:?}: {:?}", profile, errors);
        }
    }

    #[test]
    fn profiles_emphasize_their_focus() {
        let backend = recommended_skill_distribution(SkillProfile::Backend);
        assert_eq!(backend[names::BACKEND], 20);
        let business = recommended_skill_distribution(SkillProfile::Business);
        assert_eq!(business[names::ANALYSIS], 18);
    }

    #[test]
    fn suggested_traits_are_catalog_entries() {
        for profile in TraitProfile::ALL {
            let traits = suggested_traits(profile);
            assert!(!traits.is_empty());
            assert!(traits.iter().all(|t| trait_by_id(&t.id).is_some()));
        }
        let creative: Vec<String> = suggested_traits(TraitProfile::Creative)
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(
            creative,
            vec![ids::NIGHT_OWL, ids::CREATIVE, ids::QUICK_LEARNER, ids::INNOVATIVE]
        );
    }

    #[test]
    fn default_schedule_is_free() {
        assert_eq!(schedule_cost(&default_schedule()), 0);
    }

    #[test]
    fn schedule_cost_adds_up() {
        let early_long = Schedule {
            work_start: 420,
            work_end: 1200,
            lunch_start: 720,
            lunch_duration: 30,
            breaks: Vec::new(),
        };
        // early 5, late 5, 13h -> 4 extra hours -> 8, short lunch 3
        assert_eq!(schedule_cost(&early_long), 21);

        let nine_and_a_half = Schedule {
            work_start: 540,
            work_end: 1110,
            ..default_schedule()
        };
        assert_eq!(schedule_cost(&nine_and_a_half), 0);
    }

    #[test]
    fn trait_conflicts_are_reported_by_name() {
        let ids: Vec<String> = [ids::MORNING_PERSON, ids::NIGHT_OWL, ids::FOCUSED]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let conflicts = validate_trait_compatibility(&ids);
        assert_eq!(conflicts.len(), 1);
        assert!(conflicts[0].contains("is incompatible with"));

        let fine = vec![ids::FOCUSED.to_string(), ids::CREATIVE.to_string()];
        assert!(validate_trait_compatibility(&fine).is_empty());
    }

    #[test]
    fn create_character_assigns_identity() {
        let focused_owl = input(SkillProfile::Backend, [ids::FOCUSED, ids::NIGHT_OWL]);
        let a = create_character(&focused_owl).unwrap();
        let b = create_character(&focused_owl).unwrap();
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
        assert_eq!(a.name, "Barbara");
        assert_eq!(a.skills.len(), 14);
    }

    #[test]
    fn create_character_rejects_bad_input() {
        let mut bad = input(SkillProfile::Fullstack, [ids::FOCUSED, ids::MULTITASKER]);
        bad.name = " ".to_string();
        let errors = create_character(&bad).unwrap_err();
        assert!(errors.contains(&CreationError::NameTooShort));
        assert!(errors
            .iter()
            .any(|e| matches!(e, CreationError::IncompatibleTraits(_, _))));
    }

    #[test]
    fn random_characters_are_always_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let input = random_creation_input(&mut rng);
            let errors = validate_creation(&input);
            assert!(errors.is_empty(), "{:?}: {:?}", input, errors);
            assert!(RANDOM_NAMES.contains(&input.name.as_str()));
        }
        assert!(random_character(&mut rng).is_ok());
    }

    #[test]
    fn random_characters_are_reproducible() {
        let a = random_creation_input(&mut StdRng::seed_from_u64(42));
        let b = random_creation_input(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn stats_summarize_skills() {
        let business = input(SkillProfile::Business, [ids::SOCIAL, ids::PRAGMATIC]);
        let agent = create_character(&business).unwrap();
        let stats = character_stats(&agent);
        assert_eq!(stats.total_skill_points, 100);
        assert!((stats.average_skill_level - 7.1).abs() < EPS);
        assert_eq!(stats.strongest, Some((names::ANALYSIS.to_string(), 18)));
        assert_eq!(stats.weakest, Some((names::FOCUS.to_string(), 2)));
        assert_eq!(stats.technical_score, 22);
        assert_eq!(stats.business_score, 70);
        assert_eq!(stats.personal_score, 8);
    }

    #[test]
    fn export_import_character() {
        let agent =
            create_character(&input(SkillProfile::Frontend, [ids::CREATIVE, ids::SOCIAL])).unwrap();
        let json = export_character(&agent).unwrap();
        assert_eq!(import_character(&json).unwrap(), agent);
        assert!(import_character("[]").is_err());
    }
}
