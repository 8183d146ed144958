//! Save/Load functionality for persisting simulation state
//!
//! Two formats:
//! - bincode for the whole simulation (agent, project, clock, run state and
//!   tuning), versioned by [`SAVE_VERSION`] and stamped with the trait
//!   catalog version
//! - pretty-printed JSON for a single agent, the character export format
//!
//! Everything read back is checked before it is handed out, so a decoded
//! agent or simulation always satisfies the same invariants a live one does.

use devlife_logic::agent::{max_needs_for, Agent};
use devlife_logic::config::SimConfig;
use devlife_logic::creation::{error_messages, trait_errors};
use devlife_logic::project::ProjectTracker;
use devlife_logic::skills::SkillCategory;
use devlife_logic::traits::{dominant_behavior, trait_by_id, CATALOG_VERSION};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::engine::RunState;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Trait catalog the agents were built from
    pub catalog_version: u32,
    /// Epoch minute of the clock
    pub minute: u64,
    pub tick_count: u64,
    pub state: RunState,
    pub config: SimConfig,
    pub agent: Agent,
    /// Agent as created, restored on reset
    pub initial_agent: Agent,
    pub project: ProjectTracker,
    pub initial_project: ProjectTracker,
}

/// Errors that can occur during save/load
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Trait catalog mismatch: expected {expected}, found {found}")]
    CatalogMismatch { expected: u32, found: u32 },
    #[error("Invalid data: {0}")]
    Invalid(String),
}

/// Save a simulation to a writer
pub fn save_simulation<W: Write>(writer: W, data: &SaveData) -> Result<(), SaveError> {
    bincode::serialize_into(writer, data)?;
    Ok(())
}

/// Load a simulation from a reader
pub fn load_simulation<R: Read>(reader: R) -> Result<SaveData, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }
    if save_data.catalog_version != CATALOG_VERSION {
        return Err(SaveError::CatalogMismatch {
            expected: CATALOG_VERSION,
            found: save_data.catalog_version,
        });
    }

    let mut problems = Vec::new();
    let invalid = save_data.config.invalid_fields();
    if !invalid.is_empty() {
        problems.push(format!("invalid config fields: {}", invalid.join(", ")));
    }
    problems.extend(agent_problems(&save_data.agent));
    problems.extend(
        agent_problems(&save_data.initial_agent)
            .into_iter()
            .map(|p| format!("initial agent: {}", p)),
    );
    if !save_data.project.is_consistent() {
        problems.push("project progress is inconsistent".to_string());
    }
    if !save_data.initial_project.is_consistent() {
        problems.push("initial project progress is inconsistent".to_string());
    }
    if !problems.is_empty() {
        return Err(SaveError::Invalid(problems.join("; ")));
    }

    Ok(save_data)
}

/// Invariant violations, trait-selection errors, and fields that disagree
/// with what the traits and skill names imply.
fn agent_problems(agent: &Agent) -> Vec<String> {
    let mut problems = agent.invariant_violations();
    let ids: Vec<String> = agent.traits.iter().map(|t| t.id.clone()).collect();
    problems.extend(error_messages(&trait_errors(&ids)));

    for t in &agent.traits {
        if let Some(catalog) = trait_by_id(&t.id) {
            if *t != catalog {
                problems.push(format!("trait {} differs from the catalog", t.id));
            }
        }
    }
    if agent.max_needs != max_needs_for(&agent.traits) {
        problems.push("max needs do not match the traits".to_string());
    }
    let behavior = dominant_behavior(&agent.traits);
    if agent.behavior_type != behavior {
        problems.push(format!(
            "behavior type {:?} does not match the traits ({:?})",
            agent.behavior_type, behavior
        ));
    }
    for skill in agent.skills.values() {
        if skill.category != SkillCategory::for_skill(&skill.name) {
            problems.push(format!(
                "skill {} has category {:?}",
                skill.name, skill.category
            ));
        }
    }
    problems
}

/// Agent as a pretty-printed JSON document.
pub fn agent_to_json(agent: &Agent) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(agent)?)
}

/// Parses and validates an agent JSON document.
pub fn agent_from_json(json: &str) -> Result<Agent, SaveError> {
    let agent: Agent = serde_json::from_str(json)?;
    let problems = agent_problems(&agent);
    if !problems.is_empty() {
        return Err(SaveError::Invalid(problems.join("; ")));
    }
    Ok(agent)
}

/// Writes an agent as JSON.
pub fn export_agent<W: Write>(mut writer: W, agent: &Agent) -> Result<(), SaveError> {
    let json = agent_to_json(agent)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Reads an agent from JSON.
pub fn import_agent<R: Read>(mut reader: R) -> Result<Agent, SaveError> {
    let mut json = String::new();
    reader.read_to_string(&mut json)?;
    agent_from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use devlife_logic::activity::Activity;
    use devlife_logic::needs::{NeedKind, Needs};
    use devlife_logic::schedule::Schedule;
    use devlife_logic::skills::names;
    use devlife_logic::traits::{ids, BehaviorType};
    use std::collections::BTreeMap;

    fn sample_agent() -> Agent {
        let levels: BTreeMap<String, u32> = [
            (names::BACKEND, 12),
            (names::FRONTEND, 0),
            (names::TESTING, 7),
            (names::ANALYSIS, 20),
            (names::LEARNING, 3),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();
        let traits = [ids::CREATIVE, ids::NIGHT_OWL]
            .iter()
            .filter_map(|id| trait_by_id(id))
            .collect();

        let mut agent = Agent::new(
            "agent-7",
            "Margaret",
            &levels,
            traits,
            Schedule::default(),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        );
        let config = SimConfig::default();
        agent.add_experience(names::BACKEND, 37.5, &config.experience);
        agent.add_experience(names::TESTING, 0.25, &config.experience);
        agent.needs = Needs::new(55.5, 31.25, 12.0, 99.0, 44.0, 70.125);
        agent.current_activity = Activity::Drinking;
        agent.activity_start_time = 1_234;
        agent.activity_duration = 2;
        agent.money = 987.65;
        agent
    }

    fn save_data() -> SaveData {
        let agent = sample_agent();
        SaveData {
            version: SAVE_VERSION,
            catalog_version: CATALOG_VERSION,
            minute: 2_000,
            tick_count: 1_460,
            state: RunState::Paused,
            config: SimConfig::default(),
            initial_agent: agent.clone(),
            agent,
            project: ProjectTracker::default(),
            initial_project: ProjectTracker::default(),
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let data = save_data();
        let mut buffer = Vec::new();
        save_simulation(&mut buffer, &data).expect("Save failed");
        let loaded = load_simulation(buffer.as_slice()).expect("Load failed");
        assert_eq!(loaded, data);
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let mut data = save_data();
        data.version = SAVE_VERSION + 1;
        let mut buffer = Vec::new();
        save_simulation(&mut buffer, &data).unwrap();
        match load_simulation(buffer.as_slice()) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, SAVE_VERSION + 1);
            }
            other => panic!("expected version mismatch, got {:?}", other),
        }
    }

    #[test]
    fn catalog_mismatch_is_rejected() {
        let mut data = save_data();
        data.catalog_version = CATALOG_VERSION + 1;
        let mut buffer = Vec::new();
        save_simulation(&mut buffer, &data).unwrap();
        match load_simulation(buffer.as_slice()) {
            Err(SaveError::CatalogMismatch { expected, found }) => {
                assert_eq!(expected, CATALOG_VERSION);
                assert_eq!(found, CATALOG_VERSION + 1);
            }
            other => panic!("expected catalog mismatch, got {:?}", other),
        }
    }

    #[test]
    fn truncated_save_is_an_error() {
        let mut buffer = Vec::new();
        save_simulation(&mut buffer, &save_data()).unwrap();
        buffer.truncate(buffer.len() / 2);
        assert!(matches!(
            load_simulation(buffer.as_slice()),
            Err(SaveError::Bincode(_))
        ));
    }

    #[test]
    fn invalid_saved_state_is_rejected() {
        let mut data = save_data();
        data.agent.productivity = f32::NAN;
        let mut buffer = Vec::new();
        save_simulation(&mut buffer, &data).unwrap();
        assert!(matches!(
            load_simulation(buffer.as_slice()),
            Err(SaveError::Invalid(_))
        ));
    }

    #[test]
    fn agent_json_round_trip() {
        let agent = sample_agent();
        let mut buffer = Vec::new();
        export_agent(&mut buffer, &agent).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.contains('\n'), "export is pretty printed");
        assert!(text.contains("Margaret"));

        let back = import_agent(buffer.as_slice()).unwrap();
        assert_eq!(back, agent);
        assert_eq!(back.skill(names::BACKEND), agent.skill(names::BACKEND));
        assert_eq!(back.needs.get(NeedKind::Thirst), 12.0);
        assert_eq!(back.created_at, agent.created_at);
    }

    #[test]
    fn import_rejects_malformed_json() {
        assert!(matches!(
            agent_from_json("{ not json"),
            Err(SaveError::Json(_))
        ));
    }

    #[test]
    fn import_rejects_wrong_trait_count() {
        let mut agent = sample_agent();
        agent.traits.truncate(1);
        let json = agent_to_json(&agent).unwrap();
        assert!(matches!(
            agent_from_json(&json),
            Err(SaveError::Invalid(_))
        ));
    }

    #[test]
    fn import_rejects_out_of_range_needs() {
        let agent = sample_agent();
        let json = agent_to_json(&agent)
            .unwrap()
            .replace("\"thirst\": 12.0", "\"thirst\": 140.0");
        assert!(json.contains("140.0"));
        assert!(matches!(
            agent_from_json(&json),
            Err(SaveError::Invalid(_))
        ));
    }

    fn assert_import_rejected(agent: &Agent, needle: &str) {
        let json = agent_to_json(agent).unwrap();
        match agent_from_json(&json) {
            Err(SaveError::Invalid(problems)) => {
                assert!(problems.contains(needle), "{}", problems)
            }
            other => panic!("expected invalid data, got {:?}", other),
        }
    }

    #[test]
    fn import_rejects_forged_max_needs() {
        let mut agent = sample_agent();
        agent.max_needs = agent.max_needs.with(NeedKind::Energy, 20.0);
        assert_import_rejected(&agent, "max needs");
    }

    #[test]
    fn import_rejects_behavior_type_the_traits_do_not_imply() {
        let mut agent = sample_agent();
        assert_eq!(agent.behavior_type, dominant_behavior(&agent.traits));
        agent.behavior_type = if agent.behavior_type == BehaviorType::Social {
            BehaviorType::Methodical
        } else {
            BehaviorType::Social
        };
        assert_import_rejected(&agent, "behavior type");
    }

    #[test]
    fn import_rejects_miscategorized_skill() {
        let mut agent = sample_agent();
        let backend = agent.skills.get_mut(names::BACKEND).unwrap();
        assert_eq!(backend.category, SkillCategory::Technical);
        backend.category = SkillCategory::Business;
        assert_import_rejected(&agent, "skill backend has category Business");
    }

    #[test]
    fn import_rejects_edited_trait_effects() {
        let mut agent = sample_agent();
        agent.traits[0].effects.creativity_bonus += 50.0;
        assert_import_rejected(&agent, "differs from the catalog");
    }

    #[test]
    fn load_rejects_forged_initial_agent() {
        let mut data = save_data();
        data.initial_agent.max_needs = Needs::uniform(100.0).with(NeedKind::Energy, 1.0);
        let mut buffer = Vec::new();
        save_simulation(&mut buffer, &data).unwrap();
        match load_simulation(buffer.as_slice()) {
            Err(SaveError::Invalid(problems)) => {
                assert!(problems.contains("initial agent: max needs"), "{}", problems)
            }
            other => panic!("expected invalid data, got {:?}", other),
        }
    }
}
