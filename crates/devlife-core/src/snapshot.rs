//! Read-only per-tick view of the simulation for display.

use devlife_logic::activity::{Activity, DecisionReason};
use devlife_logic::agent::Agent;
use devlife_logic::clock::SimClock;
use devlife_logic::needs::Needs;
use devlife_logic::project::ProjectTracker;
use serde::{Deserialize, Serialize};

use crate::engine::RunState;

/// Something noteworthy that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    ActivityChanged {
        from: Activity,
        to: Activity,
        reason: DecisionReason,
    },
    TaskCompleted {
        task: String,
        next: String,
    },
    ProjectCompleted {
        last_task: String,
    },
    LevelUp {
        skill: String,
        level: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub name: String,
    pub progress: f32,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    /// Epoch minute this snapshot describes.
    pub minute: u64,
    pub day: u64,
    /// `HH:MM`
    pub time: String,
    pub agent_id: String,
    pub agent_name: String,
    pub needs: Needs,
    pub satisfaction: f32,
    pub activity: Activity,
    pub productivity: f32,
    pub project_progress: f32,
    pub current_task: Option<String>,
    pub current_task_progress: Option<f32>,
    pub tasks: Vec<TaskView>,
    pub state: RunState,
    pub events: Vec<SimEvent>,
}

impl Snapshot {
    pub fn capture(
        tick: u64,
        clock: SimClock,
        agent: &Agent,
        project: &ProjectTracker,
        state: RunState,
        events: Vec<SimEvent>,
    ) -> Self {
        let current = project.current_task();
        let current_index = project.current_index();
        let tasks = project
            .tasks()
            .iter()
            .enumerate()
            .map(|(i, t)| TaskView {
                name: t.name.clone(),
                progress: t.progress,
                is_current: i == current_index && !t.is_complete(),
            })
            .collect();

        Self {
            tick,
            minute: clock.minute(),
            day: clock.day(),
            time: devlife_logic::schedule::format_clock(clock.minute_of_day()),
            agent_id: agent.id.clone(),
            agent_name: agent.name.clone(),
            needs: agent.needs,
            satisfaction: agent.needs.overall_satisfaction(),
            activity: agent.current_activity,
            productivity: agent.current_productivity(clock.minute()),
            project_progress: project.overall_progress(),
            current_task: current.map(|t| t.name.clone()),
            current_task_progress: current.map(|t| t.progress),
            tasks,
            state,
            events,
        }
    }

    /// One status line, e.g. `Day 0 09:15 | Ada | working | prod 1.21 | project 3.4%`.
    pub fn summary(&self) -> String {
        format!(
            "Day {} {} | {} | {} | prod {:.2} | project {:.1}%",
            self.day,
            self.time,
            self.agent_name,
            self.activity.label(),
            self.productivity,
            self.project_progress
        )
    }
}
