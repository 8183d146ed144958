//! What the agent is doing, and why it chose to.

use serde::{Deserialize, Serialize};

use crate::needs::NeedKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    Working,
    Eating,
    Drinking,
    Bathroom,
    Resting,
    Break,
    Lunch,
    #[default]
    Idle,
}

impl Activity {
    pub const ALL: [Activity; 8] = [
        Activity::Working,
        Activity::Eating,
        Activity::Drinking,
        Activity::Bathroom,
        Activity::Resting,
        Activity::Break,
        Activity::Lunch,
        Activity::Idle,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Activity::Working => "working",
            Activity::Eating => "eating",
            Activity::Drinking => "drinking",
            Activity::Bathroom => "bathroom",
            Activity::Resting => "resting",
            Activity::Break => "break",
            Activity::Lunch => "lunch",
            Activity::Idle => "idle",
        }
    }
}

/// Which rule of the decision policy fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionReason {
    CriticalNeed(NeedKind),
    LunchWindow,
    ScheduledBreak,
    WorkHours,
    /// Eligible to work but nothing is left to work on.
    NoOpenTask,
    /// None of the above applied.
    Default,
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionReason::CriticalNeed(need) => write!(f, "critical {}", need.name()),
            DecisionReason::LunchWindow => write!(f, "lunch time"),
            DecisionReason::ScheduledBreak => write!(f, "scheduled break"),
            DecisionReason::WorkHours => write!(f, "work hours"),
            DecisionReason::NoOpenTask => write!(f, "no open task"),
            DecisionReason::Default => write!(f, "nothing else to do"),
        }
    }
}

/// Outcome of one decision: the next activity and how long it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub activity: Activity,
    pub duration: u32,
    pub reason: DecisionReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<&str> = Activity::ALL.iter().map(|a| a.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), Activity::ALL.len());
    }

    #[test]
    fn reason_display() {
        assert_eq!(
            DecisionReason::CriticalNeed(NeedKind::Thirst).to_string(),
            "critical thirst"
        );
        assert_eq!(DecisionReason::LunchWindow.to_string(), "lunch time");
    }
}
