//! The simulated employee.
//!
//! An [`Agent`] composes skills, two traits, needs, and a schedule, and owns
//! the three per-minute rules of the simulation:
//!
//! - **Needs dispatch**: [`Agent::update_needs`] applies the rate table of the
//!   current activity, scaled by trait decay effects, then caps energy at the
//!   trait-adjusted maximum.
//! - **Decision policy**: [`Agent::decide_next_activity`] walks a fixed
//!   priority cascade (critical need, lunch, scheduled break, work,
//!   rest). It is only consulted once the current activity has run for its
//!   assigned duration.
//! - **Productivity**: [`Agent::current_productivity`] combines needs, the
//!   time-of-day and concentration effects of both traits, and is zero
//!   whenever the agent is not working.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{Activity, Decision, DecisionReason};
use crate::clock::{hour_of_day, minute_of_day};
use crate::config::{DecisionConfig, ExperienceConfig, NeedsConfig, SimConfig};
use crate::needs::{DecayScale, NeedKind, Needs, NEED_MAX};
use crate::schedule::Schedule;
use crate::skills::{Skill, MAX_SKILL_LEVEL};
use crate::traits::{dominant_behavior, ids, BehaviorType, Trait};

/// Starting work intensity.
pub const DEFAULT_PRODUCTIVITY: f32 = 0.8;
pub const DEFAULT_MONEY: f64 = 1000.0;
pub const DEFAULT_REPUTATION: f32 = 50.0;
/// Upper clamp of the productivity formula.
pub const MAX_PRODUCTIVITY: f32 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    /// Keyed by skill name.
    pub skills: BTreeMap<String, Skill>,
    pub traits: Vec<Trait>,
    pub needs: Needs,
    /// Caps derived from trait effects. Only energy is below 100 in practice.
    pub max_needs: Needs,
    pub schedule: Schedule,
    pub behavior_type: BehaviorType,
    pub current_activity: Activity,
    /// Epoch minute the current activity started.
    pub activity_start_time: u64,
    /// Minutes the current activity runs before the next decision.
    pub activity_duration: u32,
    /// Work intensity; scales energy and concentration drain while working.
    pub productivity: f32,
    pub money: f64,
    pub reputation: f32,
    pub created_at: DateTime<Utc>,
}

/// Need caps implied by a trait set.
pub fn max_needs_for(traits: &[Trait]) -> Needs {
    let energy = NEED_MAX + traits.iter().map(|t| t.max_energy_modifier()).sum::<f32>();
    Needs::uniform(NEED_MAX).with(NeedKind::Energy, energy)
}

impl Agent {
    /// Builds an agent at default needs, idle, with an already-expired
    /// activity so the first tick triggers a decision.
    ///
    /// Input is not validated here; see [`crate::creation`].
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        skill_levels: &BTreeMap<String, u32>,
        traits: Vec<Trait>,
        schedule: Schedule,
        created_at: DateTime<Utc>,
    ) -> Self {
        let skills = skill_levels
            .iter()
            .map(|(name, level)| (name.clone(), Skill::new(name, *level)))
            .collect();
        let max_needs = max_needs_for(&traits);
        let behavior_type = dominant_behavior(&traits);

        Self {
            id: id.into(),
            name: name.into(),
            skills,
            needs: Needs::default().capped_by(&max_needs),
            max_needs,
            traits,
            schedule,
            behavior_type,
            current_activity: Activity::Idle,
            activity_start_time: 0,
            activity_duration: 0,
            productivity: DEFAULT_PRODUCTIVITY,
            money: DEFAULT_MONEY,
            reputation: DEFAULT_REPUTATION,
            created_at,
        }
    }

    pub fn has_trait(&self, id: &str) -> bool {
        self.traits.iter().any(|t| t.id == id)
    }

    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.get(name)
    }

    /// Raw level plus every trait's modifier for the skill, clamped to
    /// `[0, 20]`. Unknown skills start from zero.
    pub fn effective_skill_level(&self, name: &str) -> u32 {
        let raw = self.skills.get(name).map(|s| s.level()).unwrap_or(0) as i64;
        let bonus: i64 = self.traits.iter().map(|t| t.skill_modifier(name) as i64).sum();
        (raw + bonus).clamp(0, MAX_SKILL_LEVEL as i64) as u32
    }

    /// Experience multiplier from traits.
    pub fn learning_multiplier(&self, config: &ExperienceConfig) -> f32 {
        if self.has_trait(ids::QUICK_LEARNER) {
            config.fast_learner_multiplier
        } else {
            1.0
        }
    }

    /// Grants experience to a skill. Returns whether it leveled up; false if
    /// the agent does not have the skill.
    pub fn add_experience(&mut self, name: &str, amount: f32, config: &ExperienceConfig) -> bool {
        let multiplier = self.learning_multiplier(config);
        match self.skills.get_mut(name) {
            Some(skill) => skill.add_experience(amount * multiplier),
            None => false,
        }
    }

    /// Sum of both traits' decay effects.
    pub fn decay_scale(&self) -> DecayScale {
        self.traits.iter().fold(DecayScale::default(), |acc, t| DecayScale {
            energy: acc.energy + t.effects.energy_decay_rate,
            hunger: acc.hunger + t.effects.hunger_decay_rate,
            thirst: acc.thirst + t.effects.thirst_decay_rate,
            motivation: acc.motivation + t.effects.motivation_decay_rate,
        })
    }

    /// Productivity if the agent were working at `hour`, in `[0, 2]`.
    pub fn potential_productivity(&self, hour: u32) -> f32 {
        let trait_bonus: f32 = self
            .traits
            .iter()
            .map(|t| t.productivity_modifier(hour) + t.concentration_modifier())
            .sum();
        (self.needs.productivity_multiplier() + trait_bonus).clamp(0.0, MAX_PRODUCTIVITY)
    }

    /// Productivity right now: zero unless working.
    pub fn current_productivity(&self, now: u64) -> f32 {
        if self.current_activity == Activity::Working {
            self.potential_productivity(hour_of_day(now))
        } else {
            0.0
        }
    }

    /// Advances needs by `minutes` of the current activity.
    ///
    /// The next vector is computed in full before it replaces the current one.
    pub fn update_needs(&mut self, minutes: u32, config: &SimConfig) {
        let m = minutes as f32;
        let rates: NeedsConfig = self.decay_scale().apply_config(&config.needs);
        let recovery = &config.recovery;

        let mut next = self.needs;
        match self.current_activity {
            Activity::Working => next.update_while_working(m, self.productivity, &rates),
            Activity::Resting | Activity::Break => next.update_while_resting(m, &rates),
            Activity::Lunch => {
                next.update_while_resting(m, &rates);
                next.satisfy(NeedKind::Hunger, recovery.lunch_hunger * m);
                next.satisfy(NeedKind::Thirst, recovery.lunch_thirst * m);
            }
            Activity::Eating => {
                next.satisfy(NeedKind::Hunger, recovery.eating_hunger * m);
                next.satisfy(NeedKind::Motivation, recovery.eating_motivation * m);
            }
            Activity::Drinking => next.satisfy(NeedKind::Thirst, recovery.drinking_thirst * m),
            Activity::Bathroom => next.satisfy_completely(NeedKind::Bathroom),
            Activity::Idle => next.update_over_time(m, &rates),
        }
        self.needs = next.capped_by(&self.max_needs);
    }

    /// Picks the next activity. First matching rule wins:
    ///
    /// 1. a critical need maps to the activity that relieves it
    /// 2. lunch window
    /// 3. scheduled break window
    /// 4. work hours with enough energy and concentration (idle if no task is open)
    /// 5. rest
    pub fn decide_next_activity(
        &self,
        now: u64,
        has_open_task: bool,
        config: &DecisionConfig,
    ) -> Decision {
        let minute = minute_of_day(now);
        let durations = &config.durations;
        let decision = |activity, duration: u32, reason| Decision {
            activity,
            duration: duration.max(1),
            reason,
        };

        if let Some(need) = self.needs.most_critical_need() {
            let reason = DecisionReason::CriticalNeed(need);
            return match need {
                NeedKind::Bathroom => decision(Activity::Bathroom, durations.bathroom, reason),
                NeedKind::Thirst => decision(Activity::Drinking, durations.drinking, reason),
                NeedKind::Hunger if self.schedule.is_lunch_time(minute) => decision(
                    Activity::Lunch,
                    self.schedule.lunch_minutes_remaining(minute),
                    reason,
                ),
                NeedKind::Hunger => decision(Activity::Eating, durations.eating, reason),
                NeedKind::Energy => decision(Activity::Resting, durations.exhausted_rest, reason),
                NeedKind::Concentration | NeedKind::Motivation => {
                    decision(Activity::Break, durations.recovery_break, reason)
                }
            };
        }

        if self.schedule.is_lunch_time(minute) {
            return decision(
                Activity::Lunch,
                self.schedule.lunch_minutes_remaining(minute),
                DecisionReason::LunchWindow,
            );
        }

        if self.schedule.is_break_time(minute) {
            return decision(
                Activity::Break,
                self.schedule.break_minutes_remaining(minute),
                DecisionReason::ScheduledBreak,
            );
        }

        if self.schedule.is_work_time(minute)
            && self.needs.energy() > config.min_energy_for_work
            && self.needs.concentration() > config.min_concentration_for_work
        {
            return if has_open_task {
                decision(Activity::Working, durations.working, DecisionReason::WorkHours)
            } else {
                decision(Activity::Idle, durations.idle, DecisionReason::NoOpenTask)
            };
        }

        decision(Activity::Resting, durations.resting, DecisionReason::Default)
    }

    /// Switches to a decided activity starting at `now`.
    pub fn start_activity(&mut self, decision: &Decision, now: u64) {
        self.current_activity = decision.activity;
        self.activity_start_time = now;
        self.activity_duration = decision.duration;
    }

    /// True once the current activity has run for its duration.
    pub fn is_activity_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.activity_start_time) >= self.activity_duration as u64
    }

    pub fn is_work_time(&self, now: u64) -> bool {
        self.schedule.is_work_time(minute_of_day(now))
    }

    pub fn is_lunch_time(&self, now: u64) -> bool {
        self.schedule.is_lunch_time(minute_of_day(now))
    }

    pub fn is_break_time(&self, now: u64) -> bool {
        self.schedule.is_break_time(minute_of_day(now))
    }

    /// Highest raw levels first; ties by name.
    pub fn top_skills(&self, limit: usize) -> Vec<&Skill> {
        let mut skills: Vec<&Skill> = self.skills.values().collect();
        skills.sort_by(|a, b| b.level().cmp(&a.level()).then_with(|| a.name.cmp(&b.name)));
        skills.truncate(limit);
        skills
    }

    /// True if every required skill is met at its effective level.
    pub fn meets_requirements(&self, requirements: &BTreeMap<String, u32>) -> bool {
        requirements
            .iter()
            .all(|(name, level)| self.effective_skill_level(name) >= *level)
    }

    /// Describes every broken state invariant. Empty for a healthy agent.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if !self.needs.is_within_bounds() {
            problems.push(format!("needs out of range: {:?}", self.needs));
        }
        if !self.max_needs.is_within_bounds() {
            problems.push(format!("max needs out of range: {:?}", self.max_needs));
        }
        for (key, skill) in &self.skills {
            if key != &skill.name {
                problems.push(format!("skill {} stored under key {}", skill.name, key));
            }
            if !skill.is_consistent() {
                problems.push(format!(
                    "skill {} has level {} and experience {}",
                    skill.name,
                    skill.level(),
                    skill.experience()
                ));
            }
        }
        if !self.productivity.is_finite() || self.productivity < 0.0 {
            problems.push(format!("productivity {} is invalid", self.productivity));
        }
        if !self.money.is_finite() {
            problems.push("money is not finite".to_string());
        }
        if !self.reputation.is_finite() {
            problems.push("reputation is not finite".to_string());
        }
        if self.schedule.work_start >= self.schedule.work_end {
            problems.push(format!(
                "work window {}..{} is empty",
                self.schedule.work_start, self.schedule.work_end
            ));
        }

        problems
    }
}
