//! Six bounded needs and their per-activity update rules.
//!
//! Every need is a scalar in `[0, 100]`. Updates never write a partially
//! computed vector: each rule computes the full next state from the current
//! one and replaces it in a single assignment, clamping every component.

use serde::{Deserialize, Serialize};

use crate::config::{NeedRates, NeedsConfig};

/// Lower bound of every need.
pub const NEED_MIN: f32 = 0.0;
/// Upper bound of every need.
pub const NEED_MAX: f32 = 100.0;
/// Needs strictly below this are critical and interrupt routine behavior.
pub const CRITICAL_THRESHOLD: f32 = 20.0;
/// Needs strictly below this are low.
pub const LOW_THRESHOLD: f32 = 40.0;
/// Needs at or above this are in good shape.
pub const GOOD_THRESHOLD: f32 = 70.0;

/// The six needs, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NeedKind {
    Energy,
    Hunger,
    Thirst,
    Bathroom,
    Concentration,
    Motivation,
}

impl NeedKind {
    pub const ALL: [NeedKind; 6] = [
        NeedKind::Energy,
        NeedKind::Hunger,
        NeedKind::Thirst,
        NeedKind::Bathroom,
        NeedKind::Concentration,
        NeedKind::Motivation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NeedKind::Energy => "energy",
            NeedKind::Hunger => "hunger",
            NeedKind::Thirst => "thirst",
            NeedKind::Bathroom => "bathroom",
            NeedKind::Concentration => "concentration",
            NeedKind::Motivation => "motivation",
        }
    }
}

/// Coarse health of a single need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeedStatus {
    Good,
    Warning,
    Critical,
}

/// Percentage adjustments to decay rates, contributed by traits.
///
/// `+15.0` makes that need decay 15% faster; recovery rates are never
/// scaled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DecayScale {
    pub energy: f32,
    pub hunger: f32,
    pub thirst: f32,
    pub motivation: f32,
}

impl DecayScale {
    fn factor(percent: f32) -> f32 {
        (1.0 + percent / 100.0).max(0.0)
    }

    /// Applies the scale to the negative entries of a rate table.
    pub fn apply(&self, rates: NeedRates) -> NeedRates {
        let scale = |rate: f32, percent: f32| {
            if rate < 0.0 {
                rate * Self::factor(percent)
            } else {
                rate
            }
        };
        NeedRates {
            energy: scale(rates.energy, self.energy),
            hunger: scale(rates.hunger, self.hunger),
            thirst: scale(rates.thirst, self.thirst),
            bathroom: rates.bathroom,
            concentration: rates.concentration,
            motivation: scale(rates.motivation, self.motivation),
        }
    }

    /// Applies the scale to all three rate tables of a config.
    pub fn apply_config(&self, config: &NeedsConfig) -> NeedsConfig {
        NeedsConfig {
            idle: self.apply(config.idle),
            working: self.apply(config.working),
            resting: self.apply(config.resting),
            work_intensity_factor: config.work_intensity_factor,
        }
    }
}

/// The need vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    energy: f32,
    hunger: f32,
    thirst: f32,
    bathroom: f32,
    concentration: f32,
    motivation: f32,
}

impl Default for Needs {
    /// Rested and comfortable, but not saturated.
    fn default() -> Self {
        Self {
            energy: 100.0,
            hunger: 80.0,
            thirst: 90.0,
            bathroom: 100.0,
            concentration: 80.0,
            motivation: 75.0,
        }
    }
}

/// Clamps into range. NaN maps to the minimum.
fn clamp_need(value: f32) -> f32 {
    if value.is_nan() {
        NEED_MIN
    } else {
        value.clamp(NEED_MIN, NEED_MAX)
    }
}

impl Needs {
    /// Builds a need vector, clamping every component into range.
    pub fn new(
        energy: f32,
        hunger: f32,
        thirst: f32,
        bathroom: f32,
        concentration: f32,
        motivation: f32,
    ) -> Self {
        Self {
            energy: clamp_need(energy),
            hunger: clamp_need(hunger),
            thirst: clamp_need(thirst),
            bathroom: clamp_need(bathroom),
            concentration: clamp_need(concentration),
            motivation: clamp_need(motivation),
        }
    }

    /// All six needs at the same value.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }
    pub fn hunger(&self) -> f32 {
        self.hunger
    }
    pub fn thirst(&self) -> f32 {
        self.thirst
    }
    pub fn bathroom(&self) -> f32 {
        self.bathroom
    }
    pub fn concentration(&self) -> f32 {
        self.concentration
    }
    pub fn motivation(&self) -> f32 {
        self.motivation
    }

    pub fn get(&self, need: NeedKind) -> f32 {
        match need {
            NeedKind::Energy => self.energy,
            NeedKind::Hunger => self.hunger,
            NeedKind::Thirst => self.thirst,
            NeedKind::Bathroom => self.bathroom,
            NeedKind::Concentration => self.concentration,
            NeedKind::Motivation => self.motivation,
        }
    }

    /// Returns a copy with one need replaced (clamped). A non-finite value
    /// leaves the need unchanged.
    pub fn with(mut self, need: NeedKind, value: f32) -> Self {
        if !value.is_finite() {
            return self;
        }
        let value = clamp_need(value);
        match need {
            NeedKind::Energy => self.energy = value,
            NeedKind::Hunger => self.hunger = value,
            NeedKind::Thirst => self.thirst = value,
            NeedKind::Bathroom => self.bathroom = value,
            NeedKind::Concentration => self.concentration = value,
            NeedKind::Motivation => self.motivation = value,
        }
        self
    }

    /// The vector after `minutes` at the given per-minute rates.
    pub fn advanced(&self, rates: &NeedRates, minutes: f32) -> Needs {
        Needs::new(
            self.energy + rates.energy * minutes,
            self.hunger + rates.hunger * minutes,
            self.thirst + rates.thirst * minutes,
            self.bathroom + rates.bathroom * minutes,
            self.concentration + rates.concentration * minutes,
            self.motivation + rates.motivation * minutes,
        )
    }

    /// Idle decay.
    pub fn update_over_time(&mut self, minutes: f32, config: &NeedsConfig) {
        *self = self.advanced(&config.idle, minutes);
    }

    /// Working decay. Energy and concentration drain faster with intensity:
    /// multiplier = `1 + intensity × work_intensity_factor`.
    pub fn update_while_working(&mut self, minutes: f32, intensity: f32, config: &NeedsConfig) {
        *self = self.advanced(&working_rates(config, intensity), minutes);
    }

    /// Resting recovery.
    pub fn update_while_resting(&mut self, minutes: f32, config: &NeedsConfig) {
        *self = self.advanced(&config.resting, minutes);
    }

    /// Bounded add. Non-finite amounts are ignored.
    pub fn satisfy(&mut self, need: NeedKind, amount: f32) {
        if !amount.is_finite() {
            return;
        }
        *self = self.with(need, self.get(need) + amount);
    }

    /// Forces a need to the maximum.
    pub fn satisfy_completely(&mut self, need: NeedKind) {
        *self = self.with(need, NEED_MAX);
    }

    /// Mean of all six needs, in `[0, 100]`.
    pub fn overall_satisfaction(&self) -> f32 {
        NeedKind::ALL.iter().map(|n| self.get(*n)).sum::<f32>() / NeedKind::ALL.len() as f32
    }

    /// Energy 40%, concentration 40%, the mean of the remaining four 20%.
    /// Result in `[0, 1]`.
    pub fn productivity_multiplier(&self) -> f32 {
        let energy = self.energy / NEED_MAX;
        let concentration = self.concentration / NEED_MAX;
        let basics =
            (self.hunger + self.thirst + self.bathroom + self.motivation) / (4.0 * NEED_MAX);
        energy * 0.4 + concentration * 0.4 + basics * 0.2
    }

    /// The lowest need strictly below [`CRITICAL_THRESHOLD`], if any. On an
    /// exact tie the need declared later in [`NeedKind::ALL`] wins.
    pub fn most_critical_need(&self) -> Option<NeedKind> {
        let mut worst: Option<(NeedKind, f32)> = None;
        for need in NeedKind::ALL {
            let value = self.get(need);
            if value >= CRITICAL_THRESHOLD {
                continue;
            }
            match worst {
                Some((_, lowest)) if lowest < value => {}
                _ => worst = Some((need, value)),
            }
        }
        worst.map(|(need, _)| need)
    }

    pub fn is_critical(&self, need: NeedKind) -> bool {
        self.get(need) < CRITICAL_THRESHOLD
    }

    pub fn is_low(&self, need: NeedKind) -> bool {
        self.get(need) < LOW_THRESHOLD
    }

    pub fn status(&self, need: NeedKind) -> NeedStatus {
        let value = self.get(need);
        if value >= GOOD_THRESHOLD {
            NeedStatus::Good
        } else if value >= LOW_THRESHOLD {
            NeedStatus::Warning
        } else {
            NeedStatus::Critical
        }
    }

    /// Caps each need at the corresponding value of `max`.
    pub fn capped_by(&self, max: &Needs) -> Needs {
        Needs::new(
            self.energy.min(max.energy),
            self.hunger.min(max.hunger),
            self.thirst.min(max.thirst),
            self.bathroom.min(max.bathroom),
            self.concentration.min(max.concentration),
            self.motivation.min(max.motivation),
        )
    }

    /// True when every need is finite and in range.
    pub fn is_within_bounds(&self) -> bool {
        NeedKind::ALL.iter().all(|n| {
            let v = self.get(*n);
            v.is_finite() && (NEED_MIN..=NEED_MAX).contains(&v)
        })
    }
}

/// The working rate table at a given intensity.
pub fn working_rates(config: &NeedsConfig, intensity: f32) -> NeedRates {
    let multiplier = 1.0 + intensity * config.work_intensity_factor;
    NeedRates {
        energy: config.working.energy * multiplier,
        concentration: config.working.concentration * multiplier,
        ..config.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn cfg() -> NeedsConfig {
        NeedsConfig::default()
    }

    #[test]
    fn defaults_are_not_saturated() {
        let n = Needs::default();
        assert_eq!(n.energy(), 100.0);
        assert_eq!(n.hunger(), 80.0);
        assert_eq!(n.thirst(), 90.0);
        assert_eq!(n.bathroom(), 100.0);
        assert_eq!(n.concentration(), 80.0);
        assert_eq!(n.motivation(), 75.0);
    }

    #[test]
    fn constructor_clamps() {
        let n = Needs::new(150.0, -10.0, 50.0, 50.0, 50.0, 50.0);
        assert_eq!(n.energy(), 100.0);
        assert_eq!(n.hunger(), 0.0);
        assert!(n.is_within_bounds());
    }

    #[test]
    fn idle_decay_one_minute() {
        let mut n = Needs::default();
        n.update_over_time(1.0, &cfg());
        assert!((n.energy() - 99.9).abs() < EPS);
        assert!((n.hunger() - 79.92).abs() < EPS);
        assert!((n.thirst() - 89.88).abs() < EPS);
        assert!((n.bathroom() - 99.95).abs() < EPS);
        assert!((n.concentration() - 79.85).abs() < EPS);
        assert!((n.motivation() - 74.98).abs() < EPS);
    }

    #[test]
    fn working_scales_energy_and_concentration_with_intensity() {
        let mut n = Needs::default();
        n.update_while_working(10.0, 1.0, &cfg());
        // multiplier 1.5: energy 0.3/min, concentration 0.375/min
        assert!((n.energy() - 97.0).abs() < EPS);
        assert!((n.concentration() - 76.25).abs() < EPS);
        assert!((n.motivation() - 74.7).abs() < EPS);
        assert!((n.hunger() - 79.2).abs() < EPS);
    }

    #[test]
    fn resting_recovers() {
        let mut n = Needs::new(50.0, 50.0, 50.0, 50.0, 50.0, 50.0);
        n.update_while_resting(10.0, &cfg());
        assert!((n.energy() - 53.0).abs() < EPS);
        assert!((n.concentration() - 52.0).abs() < EPS);
        assert!((n.motivation() - 50.5).abs() < EPS);
        assert!((n.hunger() - 49.6).abs() < EPS);
        assert!((n.thirst() - 49.2).abs() < EPS);
        assert!((n.bathroom() - 49.7).abs() < EPS);
    }

    #[test]
    fn clamp_holds_under_long_updates() {
        let mut n = Needs::default();
        for _ in 0..500 {
            n.update_while_working(7.0, 2.0, &cfg());
            assert!(n.is_within_bounds());
        }
        assert_eq!(n.energy(), 0.0);
        for _ in 0..500 {
            n.update_while_resting(9.0, &cfg());
            n.satisfy(NeedKind::Hunger, 75.0);
            assert!(n.is_within_bounds());
        }
        assert_eq!(n.energy(), 100.0);
        assert_eq!(n.hunger(), 100.0);
    }

    #[test]
    fn satisfy_is_bounded() {
        let mut n = Needs::uniform(90.0);
        n.satisfy(NeedKind::Thirst, 60.0);
        assert_eq!(n.thirst(), 100.0);
        n.satisfy(NeedKind::Thirst, -250.0);
        assert_eq!(n.thirst(), 0.0);
        n.satisfy_completely(NeedKind::Thirst);
        assert_eq!(n.thirst(), 100.0);
    }

    #[test]
    fn productivity_multiplier_weights() {
        assert!((Needs::uniform(100.0).productivity_multiplier() - 1.0).abs() < EPS);
        assert!(Needs::uniform(0.0).productivity_multiplier().abs() < EPS);
        let n = Needs::new(100.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!((n.productivity_multiplier() - 0.4).abs() < EPS);
        let n = Needs::new(0.0, 100.0, 100.0, 100.0, 0.0, 100.0);
        assert!((n.productivity_multiplier() - 0.2).abs() < EPS);
    }

    #[test]
    fn most_critical_none_when_all_at_or_above_threshold() {
        assert_eq!(Needs::uniform(20.0).most_critical_need(), None);
        assert_eq!(Needs::default().most_critical_need(), None);
    }

    #[test]
    fn most_critical_returns_lowest() {
        let n = Needs::new(15.0, 50.0, 60.0, 70.0, 80.0, 90.0);
        assert_eq!(n.most_critical_need(), Some(NeedKind::Energy));
        let n = Needs::new(15.0, 50.0, 5.0, 70.0, 19.0, 90.0);
        assert_eq!(n.most_critical_need(), Some(NeedKind::Thirst));
    }

    #[test]
    fn most_critical_tie_prefers_later_need() {
        let n = Needs::new(10.0, 50.0, 50.0, 10.0, 50.0, 50.0);
        assert_eq!(n.most_critical_need(), Some(NeedKind::Bathroom));
    }

    #[test]
    fn status_bands() {
        let n = Needs::new(70.0, 69.9, 40.0, 39.9, 20.0, 19.9);
        assert_eq!(n.status(NeedKind::Energy), NeedStatus::Good);
        assert_eq!(n.status(NeedKind::Hunger), NeedStatus::Warning);
        assert_eq!(n.status(NeedKind::Thirst), NeedStatus::Warning);
        assert_eq!(n.status(NeedKind::Bathroom), NeedStatus::Critical);
        assert!(n.is_low(NeedKind::Bathroom));
        assert!(!n.is_critical(NeedKind::Concentration));
        assert!(n.is_critical(NeedKind::Motivation));
    }

    #[test]
    fn decay_scale_only_touches_decay() {
        let scale = DecayScale {
            energy: 100.0,
            motivation: -20.0,
            ..DecayScale::default()
        };
        let idle = scale.apply(NeedRates::IDLE);
        assert!((idle.energy - -0.2).abs() < EPS);
        assert!((idle.motivation - -0.016).abs() < EPS);
        assert!((idle.hunger - NeedRates::IDLE.hunger).abs() < EPS);
        let resting = scale.apply(NeedRates::RESTING);
        assert!((resting.energy - NeedRates::RESTING.energy).abs() < EPS);
        assert!((resting.motivation - NeedRates::RESTING.motivation).abs() < EPS);
    }

    #[test]
    fn capped_by_limits_energy() {
        let max = Needs::new(80.0, 100.0, 100.0, 100.0, 100.0, 100.0);
        let n = Needs::default().capped_by(&max);
        assert_eq!(n.energy(), 80.0);
        assert_eq!(n.hunger(), 80.0);
    }

    #[test]
    fn non_finite_writes_keep_needs_in_range() {
        let mut n = Needs::default();
        n.satisfy(NeedKind::Energy, f32::NAN);
        n.satisfy(NeedKind::Hunger, f32::INFINITY);
        n.satisfy(NeedKind::Thirst, f32::NEG_INFINITY);
        assert_eq!(n, Needs::default());

        let n = Needs::default().with(NeedKind::Motivation, f32::NAN);
        assert_eq!(n.motivation(), Needs::default().motivation());

        let n = Needs::new(f32::NAN, 50.0, 50.0, 50.0, 50.0, 50.0);
        assert_eq!(n.energy(), NEED_MIN);
        assert!(n.is_within_bounds());
    }

    #[test]
    fn out_of_range_serialized_needs_are_detected() {
        let mut value = serde_json::to_value(Needs::default()).unwrap();
        value["energy"] = serde_json::json!(140.0);
        let n: Needs = serde_json::from_value(value).unwrap();
        assert!(!n.is_within_bounds());
    }
}
