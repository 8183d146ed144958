//! Tuning parameters for the decision core.
//!
//! Every rate, amount and duration the simulation applies lives here so a
//! host can load overrides from a file. `Default` reproduces the stock tuning;
//! each section is `#[serde(default)]`, so a partial document only overrides
//! the keys it names.
//!
//! ```
//! use devlife_logic::config::SimConfig;
//!
//! let config = SimConfig::default();
//! assert_eq!(config.decision.durations.working, 15);
//! assert!(config.needs.working.energy < 0.0);
//! ```

use serde::{Deserialize, Serialize};

/// Signed per-minute deltas for each need. Negative values decay, positive
/// values recover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeedRates {
    pub energy: f32,
    pub hunger: f32,
    pub thirst: f32,
    pub bathroom: f32,
    pub concentration: f32,
    pub motivation: f32,
}

impl NeedRates {
    /// Idle / default activity: everything drifts down slowly.
    pub const IDLE: NeedRates = NeedRates {
        energy: -0.1,
        hunger: -0.08,
        thirst: -0.12,
        bathroom: -0.05,
        concentration: -0.15,
        motivation: -0.02,
    };

    /// Working at intensity zero. Energy and concentration are further
    /// scaled by the work multiplier (see [`NeedsConfig::work_intensity_factor`]).
    pub const WORKING: NeedRates = NeedRates {
        energy: -0.2,
        hunger: -0.08,
        thirst: -0.12,
        bathroom: -0.05,
        concentration: -0.25,
        motivation: -0.03,
    };

    /// Resting: energy, concentration and motivation recover while the
    /// physiological needs decay at a reduced pace.
    pub const RESTING: NeedRates = NeedRates {
        energy: 0.3,
        hunger: -0.04,
        thirst: -0.08,
        bathroom: -0.03,
        concentration: 0.2,
        motivation: 0.05,
    };
}

/// Rate tables for the three activity classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    pub idle: NeedRates,
    pub working: NeedRates,
    pub resting: NeedRates,
    /// Work multiplier is `1 + intensity × factor`, applied to the energy and
    /// concentration decay while working.
    pub work_intensity_factor: f32,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            idle: NeedRates::IDLE,
            working: NeedRates::WORKING,
            resting: NeedRates::RESTING,
            work_intensity_factor: 0.5,
        }
    }
}

/// Per-minute satisfaction granted by consumption activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub eating_hunger: f32,
    pub eating_motivation: f32,
    pub drinking_thirst: f32,
    /// Lunch recovers like resting and additionally feeds at this pace.
    pub lunch_hunger: f32,
    pub lunch_thirst: f32,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            eating_hunger: 40.0,
            eating_motivation: 5.0,
            drinking_thirst: 60.0,
            lunch_hunger: 5.0,
            lunch_thirst: 3.0,
        }
    }
}

/// Minutes an activity runs before the agent decides again.
///
/// Lunch and scheduled breaks are not listed: they last until their window
/// in the schedule closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityDurations {
    pub working: u32,
    pub eating: u32,
    pub drinking: u32,
    pub bathroom: u32,
    pub resting: u32,
    /// Resting forced by critically low energy.
    pub exhausted_rest: u32,
    /// Unscheduled recovery break (critical concentration or motivation).
    pub recovery_break: u32,
    pub idle: u32,
}

impl Default for ActivityDurations {
    fn default() -> Self {
        Self {
            working: 15,
            eating: 15,
            drinking: 2,
            bathroom: 3,
            resting: 10,
            exhausted_rest: 30,
            recovery_break: 10,
            idle: 5,
        }
    }
}

/// Work eligibility thresholds and activity durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Energy must be strictly above this to start working.
    pub min_energy_for_work: f32,
    /// Concentration must be strictly above this to start working.
    pub min_concentration_for_work: f32,
    pub durations: ActivityDurations,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            min_energy_for_work: 20.0,
            min_concentration_for_work: 30.0,
            durations: ActivityDurations::default(),
        }
    }
}

/// Task progress tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Base progress rate before the skill effectiveness multiplier. At
    /// productivity 1.0 and effectiveness 1.0 a task of `duration` effort
    /// minutes finishes in `duration × 6000 / rate` working minutes.
    pub progress_rate_per_skill: f32,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            progress_rate_per_skill: 6000.0,
        }
    }
}

/// Skill experience tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    /// Experience per working minute at productivity 1.0.
    pub xp_per_work_minute: f32,
    /// Multiplier applied to all experience when the agent has the
    /// fast-learner trait.
    pub fast_learner_multiplier: f32,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            xp_per_work_minute: 1.0,
            fast_learner_multiplier: 1.5,
        }
    }
}

/// Complete tuning for one simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub needs: NeedsConfig,
    pub recovery: RecoveryConfig,
    pub decision: DecisionConfig,
    pub project: ProjectConfig,
    pub experience: ExperienceConfig,
}

impl SimConfig {
    /// Returns the names of fields holding values that would break the
    /// simulation (non-finite numbers, zero-length activities, non-positive
    /// rates).
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let mut bad = Vec::new();

        let tables = [
            ("needs.idle", &self.needs.idle),
            ("needs.working", &self.needs.working),
            ("needs.resting", &self.needs.resting),
        ];
        for (name, rates) in tables {
            let values = [
                rates.energy,
                rates.hunger,
                rates.thirst,
                rates.bathroom,
                rates.concentration,
                rates.motivation,
            ];
            if values.iter().any(|v| !v.is_finite()) {
                bad.push(name);
            }
        }
        if !self.needs.work_intensity_factor.is_finite() || self.needs.work_intensity_factor < 0.0 {
            bad.push("needs.work_intensity_factor");
        }

        let recovery = [
            self.recovery.eating_hunger,
            self.recovery.eating_motivation,
            self.recovery.drinking_thirst,
            self.recovery.lunch_hunger,
            self.recovery.lunch_thirst,
        ];
        if recovery.iter().any(|v| !v.is_finite() || *v < 0.0) {
            bad.push("recovery");
        }

        let d = &self.decision.durations;
        if [
            d.working,
            d.eating,
            d.drinking,
            d.bathroom,
            d.resting,
            d.exhausted_rest,
            d.recovery_break,
            d.idle,
        ]
        .contains(&0)
        {
            bad.push("decision.durations");
        }
        if !self.decision.min_energy_for_work.is_finite()
            || !self.decision.min_concentration_for_work.is_finite()
        {
            bad.push("decision.thresholds");
        }

        if !self.project.progress_rate_per_skill.is_finite()
            || self.project.progress_rate_per_skill <= 0.0
        {
            bad.push("project.progress_rate_per_skill");
        }
        if !self.experience.xp_per_work_minute.is_finite()
            || self.experience.xp_per_work_minute < 0.0
        {
            bad.push("experience.xp_per_work_minute");
        }
        if !self.experience.fast_learner_multiplier.is_finite()
            || self.experience.fast_learner_multiplier <= 0.0
        {
            bad.push("experience.fast_learner_multiplier");
        }

        bad
    }
}
