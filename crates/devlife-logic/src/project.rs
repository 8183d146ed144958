//! Project progress: an ordered queue of tasks worked one at a time.
//!
//! Each working minute adds
//! `productivity × rate × effectiveness(level) / duration / 60` percent to the
//! current task, where `level` is the agent's effective level in the task's
//! skill. Finishing the last task completes the project; the tracker then
//! ignores further work.

use serde::{Deserialize, Serialize};

use crate::config::ProjectConfig;
use crate::skills::{effectiveness, names};

/// Completion percentage of a finished task.
pub const TASK_COMPLETE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    Analysis,
    Design,
    Programming,
    Testing,
    Documentation,
}

impl TaskKind {
    /// Skill that drives progress on, and gains experience from, this kind
    /// of task.
    pub fn primary_skill(&self) -> &'static str {
        match self {
            TaskKind::Analysis => names::ANALYSIS,
            TaskKind::Design => names::ARCHITECTURE,
            TaskKind::Programming => names::BACKEND,
            TaskKind::Testing => names::TESTING,
            TaskKind::Documentation => names::COMMUNICATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTask {
    pub name: String,
    /// Effort in work-minute units.
    pub duration: u32,
    /// Percent complete, `[0, 100]`.
    pub progress: f32,
    pub kind: TaskKind,
}

impl ProjectTask {
    pub fn new(name: &str, duration: u32, kind: TaskKind) -> Self {
        Self {
            name: name.to_string(),
            duration,
            progress: 0.0,
            kind,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= TASK_COMPLETE
    }
}

/// The stock six-task web application project.
pub fn default_tasks() -> Vec<ProjectTask> {
    vec![
        ProjectTask::new("Requirements analysis", 120, TaskKind::Analysis),
        ProjectTask::new("Database design", 180, TaskKind::Design),
        ProjectTask::new("Backend development", 300, TaskKind::Programming),
        ProjectTask::new("Frontend development", 240, TaskKind::Programming),
        ProjectTask::new("Testing and debugging", 150, TaskKind::Testing),
        ProjectTask::new("Documentation", 90, TaskKind::Documentation),
    ]
}

/// What one minute of work did to the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProgressEvent {
    Progressed { task: String, progress: f32 },
    TaskCompleted { task: String, next: String },
    ProjectCompleted { last_task: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTracker {
    tasks: Vec<ProjectTask>,
    current: usize,
}

impl Default for ProjectTracker {
    fn default() -> Self {
        Self::new(default_tasks())
    }
}

impl ProjectTracker {
    pub fn new(tasks: Vec<ProjectTask>) -> Self {
        let mut tracker = Self { tasks, current: 0 };
        tracker.skip_finished();
        tracker
    }

    fn skip_finished(&mut self) {
        while self.tasks.get(self.current).is_some_and(|t| t.is_complete()) {
            self.current += 1;
        }
    }

    pub fn tasks(&self) -> &[ProjectTask] {
        &self.tasks
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The task being worked on, if any is left.
    pub fn current_task(&self) -> Option<&ProjectTask> {
        self.tasks.get(self.current).filter(|t| !t.is_complete())
    }

    pub fn has_open_task(&self) -> bool {
        self.current_task().is_some()
    }

    /// True once every task is done. An empty project is never complete.
    pub fn is_complete(&self) -> bool {
        !self.tasks.is_empty() && self.current >= self.tasks.len()
    }

    /// Mean progress across all tasks, in `[0, 100]`.
    pub fn overall_progress(&self) -> f32 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        self.tasks.iter().map(|t| t.progress).sum::<f32>() / self.tasks.len() as f32
    }

    /// Percent one working minute adds to a task of `duration` effort.
    pub fn progress_increase(
        productivity: f32,
        effective_level: u32,
        duration: u32,
        config: &ProjectConfig,
    ) -> f32 {
        let base_rate = config.progress_rate_per_skill * effectiveness(effective_level);
        (productivity.max(0.0) * base_rate / duration.max(1) as f32) / 60.0
    }

    /// Applies one working minute to the current task. Returns `None` when
    /// nothing is left to work on.
    pub fn advance(
        &mut self,
        productivity: f32,
        effective_level: u32,
        config: &ProjectConfig,
    ) -> Option<ProgressEvent> {
        let index = self.current;
        let task = self.tasks.get_mut(index).filter(|t| !t.is_complete())?;

        let increase =
            Self::progress_increase(productivity, effective_level, task.duration, config);
        task.progress = (task.progress + increase).min(TASK_COMPLETE);

        if !task.is_complete() {
            return Some(ProgressEvent::Progressed {
                task: task.name.clone(),
                progress: task.progress,
            });
        }

        let finished = task.name.clone();
        self.current += 1;
        self.skip_finished();
        Some(match self.current_task() {
            Some(next) => ProgressEvent::TaskCompleted {
                task: finished,
                next: next.name.clone(),
            },
            None => ProgressEvent::ProjectCompleted { last_task: finished },
        })
    }

    /// Clears all progress and returns to the first task.
    pub fn reset(&mut self) {
        for task in &mut self.tasks {
            task.progress = 0.0;
        }
        self.current = 0;
    }

    /// True when every task's progress is finite and in range and the
    /// current index is consistent.
    pub fn is_consistent(&self) -> bool {
        self.current <= self.tasks.len()
            && self
                .tasks
                .iter()
                .all(|t| t.progress.is_finite() && (0.0..=TASK_COMPLETE).contains(&t.progress))
            && self.tasks[..self.current].iter().all(|t| t.is_complete())
    }
}
