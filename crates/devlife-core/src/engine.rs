//! Simulation engine - drives one agent and its project minute by minute.
//!
//! Each [`SimulationEngine::tick`] runs, in order: needs update, activity
//! decision (only once the current activity has expired), task progress and
//! experience (only while working), then advances the clock. The tick works
//! on staged copies of the agent and project and commits them only if the
//! result is valid; otherwise the engine stops and the last committed state
//! is kept.

use devlife_logic::activity::Activity;
use devlife_logic::agent::Agent;
use devlife_logic::clock::SimClock;
use devlife_logic::config::SimConfig;
use devlife_logic::project::{ProgressEvent, ProjectTracker};
use devlife_logic::traits::CATALOG_VERSION;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::persistence::{self, SaveData, SaveError};
use crate::snapshot::{SimEvent, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    NotStarted,
    Running,
    Paused,
    /// Halted by the host or by a failed tick. Only `reset` leaves this state.
    Stopped,
    /// Every project task is done.
    Completed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Stopped | RunState::Completed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: RunState,
    },
    #[error("tick at minute {minute} produced an invalid state: {problems}")]
    InvalidState { minute: u64, problems: String },
    #[error("invalid configuration: {}", .0.join(", "))]
    InvalidConfig(Vec<&'static str>),
}

/// Main simulation engine
pub struct SimulationEngine {
    config: SimConfig,
    clock: SimClock,
    tick_count: u64,
    state: RunState,
    agent: Agent,
    project: ProjectTracker,
    /// Restored by `reset`.
    initial_agent: Agent,
    initial_project: ProjectTracker,
}

impl SimulationEngine {
    /// Engine with the stock tuning and the default project.
    pub fn new(agent: Agent) -> Self {
        Self {
            config: SimConfig::default(),
            clock: SimClock::default(),
            tick_count: 0,
            state: RunState::NotStarted,
            initial_agent: agent.clone(),
            agent,
            project: ProjectTracker::default(),
            initial_project: ProjectTracker::default(),
        }
    }

    /// Engine with custom tuning. Rejects configs that would break the tick.
    pub fn with_config(agent: Agent, config: SimConfig) -> Result<Self, EngineError> {
        let invalid = config.invalid_fields();
        if !invalid.is_empty() {
            return Err(EngineError::InvalidConfig(invalid));
        }
        let mut engine = Self::new(agent);
        engine.config = config;
        Ok(engine)
    }

    /// Replaces the project; `reset` restores this one.
    pub fn with_project(mut self, project: ProjectTracker) -> Self {
        self.initial_project = project.clone();
        self.project = project;
        self
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn project(&self) -> &ProjectTracker {
        &self.project
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> SimClock {
        self.clock
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Starts at the agent's work start on day 0, or resumes a paused run.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.state {
            RunState::NotStarted => {
                self.clock = SimClock::at(0, self.agent.schedule.work_start);
                self.state = RunState::Running;
                info!(
                    "Simulation started for {} at {}",
                    self.agent.name,
                    self.clock.label()
                );
                Ok(())
            }
            RunState::Paused => self.resume(),
            RunState::Running => Ok(()),
            state => Err(EngineError::InvalidTransition {
                action: "start",
                state,
            }),
        }
    }

    pub fn pause(&mut self) -> Result<(), EngineError> {
        match self.state {
            RunState::Running => {
                self.state = RunState::Paused;
                info!("Simulation paused at {}", self.clock.label());
                Ok(())
            }
            RunState::Paused => Ok(()),
            state => Err(EngineError::InvalidTransition {
                action: "pause",
                state,
            }),
        }
    }

    pub fn resume(&mut self) -> Result<(), EngineError> {
        match self.state {
            RunState::Paused => {
                self.state = RunState::Running;
                info!("Simulation resumed at {}", self.clock.label());
                Ok(())
            }
            RunState::Running => Ok(()),
            state => Err(EngineError::InvalidTransition {
                action: "resume",
                state,
            }),
        }
    }

    /// Flips between running and paused. Returns the new state.
    pub fn toggle_pause(&mut self) -> Result<RunState, EngineError> {
        match self.state {
            RunState::Running => self.pause()?,
            RunState::Paused => self.resume()?,
            state => {
                return Err(EngineError::InvalidTransition {
                    action: "toggle pause",
                    state,
                })
            }
        }
        Ok(self.state)
    }

    /// Halts the run. A completed run stays completed.
    pub fn stop(&mut self) {
        if self.state != RunState::Completed {
            self.state = RunState::Stopped;
            info!("Simulation stopped at {}", self.clock.label());
        }
    }

    /// Restores the agent, project, and clock to their construction-time
    /// values.
    pub fn reset(&mut self) {
        self.agent = self.initial_agent.clone();
        self.project = self.initial_project.clone();
        self.clock = SimClock::default();
        self.tick_count = 0;
        self.state = RunState::NotStarted;
        info!("Simulation reset");
    }

    /// Advances one simulated minute.
    pub fn tick(&mut self) -> Result<Snapshot, EngineError> {
        if self.state != RunState::Running {
            return Err(EngineError::InvalidTransition {
                action: "tick",
                state: self.state,
            });
        }

        let now = self.clock.minute();
        let mut agent = self.agent.clone();
        let mut project = self.project.clone();
        let mut events = Vec::new();

        // 1. needs
        agent.update_needs(1, &self.config);

        // 2. decision
        if agent.is_activity_expired(now) {
            let previous = agent.current_activity;
            let decision =
                agent.decide_next_activity(now, project.has_open_task(), &self.config.decision);
            agent.start_activity(&decision, now);
            if decision.activity != previous {
                debug!(
                    "{} {}: {} -> {} ({}, {} min)",
                    self.clock.label(),
                    agent.name,
                    previous.label(),
                    decision.activity.label(),
                    decision.reason,
                    decision.duration
                );
                events.push(SimEvent::ActivityChanged {
                    from: previous,
                    to: decision.activity,
                    reason: decision.reason,
                });
            }
        }

        // 3. progress and experience
        let productivity = agent.current_productivity(now);
        if agent.current_activity == Activity::Working {
            if let Some(kind) = project.current_task().map(|t| t.kind) {
                let skill = kind.primary_skill();
                let level = agent.effective_skill_level(skill);
                match project.advance(productivity, level, &self.config.project) {
                    Some(ProgressEvent::TaskCompleted { task, next }) => {
                        info!("{} completed '{}', next up '{}'", agent.name, task, next);
                        events.push(SimEvent::TaskCompleted { task, next });
                    }
                    Some(ProgressEvent::ProjectCompleted { last_task }) => {
                        info!("{} completed the project with '{}'", agent.name, last_task);
                        events.push(SimEvent::ProjectCompleted { last_task });
                    }
                    Some(ProgressEvent::Progressed { .. }) | None => {}
                }

                let xp = self.config.experience.xp_per_work_minute * productivity;
                if agent.add_experience(skill, xp, &self.config.experience) {
                    let level = agent.skill(skill).map(|s| s.level()).unwrap_or(0);
                    info!("{} reached {} level {}", agent.name, skill, level);
                    events.push(SimEvent::LevelUp {
                        skill: skill.to_string(),
                        level,
                    });
                }
            }
        }

        // 4. validate before commit
        let mut problems = agent.invariant_violations();
        if !productivity.is_finite() {
            problems.push(format!("productivity {} is not finite", productivity));
        }
        if !project.is_consistent() {
            problems.push("project progress is out of range".to_string());
        }
        if !problems.is_empty() {
            self.state = RunState::Stopped;
            let problems = problems.join("; ");
            error!(
                "Tick at {} rejected, simulation halted: {}",
                self.clock.label(),
                problems
            );
            return Err(EngineError::InvalidState {
                minute: now,
                problems,
            });
        }

        // 5. commit
        self.agent = agent;
        self.project = project;
        self.tick_count += 1;
        if self.project.is_complete() {
            self.state = RunState::Completed;
        }
        let snapshot = Snapshot::capture(
            self.tick_count,
            self.clock,
            &self.agent,
            &self.project,
            self.state,
            events,
        );
        self.clock.advance(1);
        Ok(snapshot)
    }

    /// Runs up to `max_ticks` ticks, stopping early when the run leaves the
    /// running state. Returns the number of ticks executed.
    pub fn run(&mut self, max_ticks: u64) -> Result<u64, EngineError> {
        let mut done = 0;
        while done < max_ticks && self.state == RunState::Running {
            self.tick()?;
            done += 1;
        }
        Ok(done)
    }

    /// View of the committed state, without events.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            self.tick_count,
            self.clock,
            &self.agent,
            &self.project,
            self.state,
            Vec::new(),
        )
    }

    pub fn to_save_data(&self) -> SaveData {
        SaveData {
            version: persistence::SAVE_VERSION,
            catalog_version: CATALOG_VERSION,
            minute: self.clock.minute(),
            tick_count: self.tick_count,
            state: self.state,
            config: self.config.clone(),
            agent: self.agent.clone(),
            initial_agent: self.initial_agent.clone(),
            project: self.project.clone(),
            initial_project: self.initial_project.clone(),
        }
    }

    /// Rebuilds an engine from saved data. A run saved while running comes
    /// back paused.
    pub fn from_save_data(data: SaveData) -> Self {
        let state = match data.state {
            RunState::Running => RunState::Paused,
            other => other,
        };
        Self {
            config: data.config,
            clock: SimClock::new(data.minute),
            tick_count: data.tick_count,
            state,
            agent: data.agent,
            project: data.project,
            initial_agent: data.initial_agent,
            initial_project: data.initial_project,
        }
    }

    /// Save simulation state to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_simulation(writer, &self.to_save_data())
    }

    /// Load simulation state from a reader, replacing this engine's state.
    /// On error the engine is left unchanged.
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let data = persistence::load_simulation(reader)?;
        *self = Self::from_save_data(data);
        info!(
            "Simulation loaded for {} at {}",
            self.agent.name,
            self.clock.label()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{
        create_character, default_schedule, recommended_skill_distribution, SkillProfile,
    };
    use devlife_logic::creation::CreationInput;
    use devlife_logic::project::{ProjectTask, TaskKind};
    use devlife_logic::skills::{names, Skill};
    use devlife_logic::traits::ids;

    fn test_agent() -> Agent {
        create_character(&CreationInput {
            name: "Ada".to_string(),
            skills: recommended_skill_distribution(SkillProfile::Fullstack),
            traits: vec![ids::FOCUSED.to_string(), ids::QUICK_LEARNER.to_string()],
            schedule: default_schedule(),
        })
        .unwrap()
    }

    fn running_engine() -> SimulationEngine {
        let mut engine = SimulationEngine::new(test_agent());
        engine.start().unwrap();
        engine
    }

    #[test]
    fn start_positions_clock_at_work_start() {
        let engine = running_engine();
        assert_eq!(engine.state(), RunState::Running);
        assert_eq!(engine.clock().minute(), 540);
    }

    #[test]
    fn tick_requires_running() {
        let mut engine = SimulationEngine::new(test_agent());
        assert!(matches!(
            engine.tick(),
            Err(EngineError::InvalidTransition { action: "tick", .. })
        ));
    }

    #[test]
    fn first_tick_starts_working() {
        let mut engine = running_engine();
        let snap = engine.tick().unwrap();
        assert_eq!(snap.minute, 540);
        assert_eq!(snap.time, "09:00");
        assert_eq!(snap.activity, Activity::Working);
        assert!(snap.productivity > 0.0);
        assert!(snap.project_progress > 0.0);
        assert_eq!(
            snap.current_task.as_deref(),
            Some("Requirements analysis")
        );
        assert!(matches!(
            snap.events.first(),
            Some(SimEvent::ActivityChanged {
                from: Activity::Idle,
                to: Activity::Working,
                ..
            })
        ));
        assert_eq!(engine.clock().minute(), 541);
        assert_eq!(engine.tick_count(), 1);
    }

    #[test]
    fn pause_freezes_time_and_state() {
        let mut engine = running_engine();
        engine.run(30).unwrap();
        engine.pause().unwrap();
        let before = engine.snapshot();
        assert!(engine.tick().is_err());
        assert_eq!(engine.run(100).unwrap(), 0);
        assert_eq!(engine.snapshot(), before);

        assert_eq!(engine.toggle_pause().unwrap(), RunState::Running);
        engine.tick().unwrap();
        assert_eq!(engine.clock().minute(), before.minute + 1);
    }

    #[test]
    fn stop_is_terminal_until_reset() {
        let mut engine = running_engine();
        engine.run(10).unwrap();
        engine.stop();
        assert_eq!(engine.state(), RunState::Stopped);
        assert!(engine.start().is_err());
        assert!(engine.toggle_pause().is_err());

        engine.reset();
        assert_eq!(engine.state(), RunState::NotStarted);
        engine.start().unwrap();
        assert_eq!(engine.clock().minute(), 540);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut engine = running_engine();
        let initial_agent = engine.agent().clone();
        engine.run(600).unwrap();
        assert_ne!(engine.agent().needs, initial_agent.needs);
        assert!(engine.project().overall_progress() > 0.0);

        engine.reset();
        assert_eq!(engine.agent(), &initial_agent);
        assert_eq!(engine.project(), &ProjectTracker::default());
        assert_eq!(engine.clock().minute(), 0);
        assert_eq!(engine.tick_count(), 0);
    }

    #[test]
    fn needs_stay_in_bounds_over_a_week() {
        let mut engine = running_engine();
        for _ in 0..(7 * 1440) {
            if engine.state() != RunState::Running {
                break;
            }
            let snap = engine.tick().unwrap();
            assert!(snap.needs.is_within_bounds());
            assert!((0.0..=2.0).contains(&snap.productivity));
        }
    }

    #[test]
    fn completes_small_project() {
        let project = ProjectTracker::new(vec![
            ProjectTask::new("Spike", 30, TaskKind::Analysis),
            ProjectTask::new("Write-up", 20, TaskKind::Documentation),
        ]);
        let mut engine = SimulationEngine::new(test_agent()).with_project(project);
        engine.start().unwrap();

        let mut events = Vec::new();
        while engine.state() == RunState::Running {
            events.extend(engine.tick().unwrap().events);
        }
        assert_eq!(engine.state(), RunState::Completed);
        assert!(engine.project().is_complete());
        assert!(events.contains(&SimEvent::TaskCompleted {
            task: "Spike".to_string(),
            next: "Write-up".to_string()
        }));
        assert!(events.contains(&SimEvent::ProjectCompleted {
            last_task: "Write-up".to_string()
        }));
        assert!(engine.start().is_err());

        // stop does not hide completion
        engine.stop();
        assert_eq!(engine.state(), RunState::Completed);
    }

    #[test]
    fn invalid_tick_halts_without_committing() {
        let mut engine = running_engine();
        engine.run(5).unwrap();
        // a skill filed under the wrong key survives the tick and fails validation
        engine.agent.skills.insert("misfiled".to_string(), Skill::new(names::FOCUS, 3));
        let before = engine.snapshot();
        let agent_before = engine.agent().clone();
        let project_before = engine.project().clone();

        let err = engine.tick().unwrap_err();
        match &err {
            EngineError::InvalidState { minute, problems } => {
                assert_eq!(*minute, before.minute);
                assert!(problems.contains("misfiled"), "{}", problems);
            }
            other => panic!("expected invalid state, got {:?}", other),
        }
        assert_eq!(engine.state(), RunState::Stopped);
        assert_eq!(engine.agent(), &agent_before);
        assert_eq!(engine.project(), &project_before);
        assert_eq!(engine.clock().minute(), before.minute);
        assert_eq!(engine.tick_count(), before.tick);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SimConfig::default();
        config.decision.durations.working = 0;
        assert!(matches!(
            SimulationEngine::with_config(test_agent(), config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn save_load_round_trip() {
        let mut engine = running_engine();
        engine.run(240).unwrap();

        let mut buffer = Vec::new();
        engine.save(&mut buffer).unwrap();

        let mut loaded = SimulationEngine::new(test_agent());
        loaded.load(buffer.as_slice()).unwrap();
        assert_eq!(loaded.state(), RunState::Paused);
        assert_eq!(loaded.agent(), engine.agent());
        assert_eq!(loaded.project(), engine.project());
        assert_eq!(loaded.clock(), engine.clock());
        assert_eq!(loaded.tick_count(), engine.tick_count());

        // both continue identically
        loaded.resume().unwrap();
        let a = engine.tick().unwrap();
        let b = loaded.tick().unwrap();
        assert_eq!(a, b);
    }
}
