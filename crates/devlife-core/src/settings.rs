//! Tuning file loading.
//!
//! A tuning file is a JSON object shaped like [`SimConfig`]. Every section
//! and key is optional; missing ones take the built-in defaults.

use devlife_logic::config::SimConfig;
use log::warn;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid values in: {}", .0.join(", "))]
    Invalid(Vec<&'static str>),
}

/// Parses and validates a tuning document.
pub fn parse_config(content: &str) -> Result<SimConfig, ConfigError> {
    let config: SimConfig = serde_json::from_str(content)?;
    let invalid = config.invalid_fields();
    if !invalid.is_empty() {
        return Err(ConfigError::Invalid(invalid));
    }
    Ok(config)
}

/// Loads a tuning file.
pub fn load_config(path: impl AsRef<Path>) -> Result<SimConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Loads a tuning file, falling back to defaults when it is missing or bad.
pub fn load_or_default(path: impl AsRef<Path>) -> SimConfig {
    let path = path.as_ref();
    match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Using default tuning, {} not loaded: {}", path.display(), e);
            SimConfig::default()
        }
    }
}

/// Pretty JSON of a config, e.g. to write out the defaults.
pub fn config_to_json(config: &SimConfig) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(parse_config("{}").unwrap(), SimConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = parse_config(
            r#"{
                "decision": { "min_energy_for_work": 35.0 },
                "project": { "progress_rate_per_skill": 3000.0 }
            }"#,
        )
        .unwrap();
        assert!((config.decision.min_energy_for_work - 35.0).abs() < EPS);
        assert!((config.project.progress_rate_per_skill - 3000.0).abs() < EPS);
        let defaults = SimConfig::default();
        assert_eq!(config.decision.durations, defaults.decision.durations);
        assert_eq!(config.needs, defaults.needs);
    }

    #[test]
    fn defaults_survive_a_json_round_trip() {
        let json = config_to_json(&SimConfig::default()).unwrap();
        assert_eq!(parse_config(&json).unwrap(), SimConfig::default());
    }

    #[test]
    fn bad_documents_are_rejected() {
        assert!(matches!(parse_config("not json"), Err(ConfigError::Parse(_))));
        let zero_work = r#"{ "decision": { "durations": { "working": 0 } } }"#;
        assert!(matches!(parse_config(zero_work), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_falls_back() {
        let path = std::env::temp_dir().join("devlife-missing-tuning-file.json");
        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
        assert_eq!(load_or_default(&path), SimConfig::default());
    }

    #[test]
    fn shipped_tuning_file_parses() {
        let config = parse_config(include_str!("../../../data/tuning.json")).unwrap();
        assert!(config.invalid_fields().is_empty());
    }
}
