//! DevLife Headless Simulation Harness
//!
//! Validates the decision core, the engine and persistence end to end.
//! Runs entirely in-process with no UI.
//!
//! Usage:
//!   cargo run -p devlife-simtest
//!   cargo run -p devlife-simtest -- --verbose

use devlife_core::engine::{RunState, SimulationEngine};
use devlife_core::persistence;
use devlife_core::service::{self, SkillProfile, TraitProfile};
use devlife_core::settings;
use devlife_core::snapshot::SimEvent;
use devlife_logic::activity::Activity;
use devlife_logic::config::SimConfig;
use devlife_logic::creation::{validate_creation, CreationError, CreationInput};
use devlife_logic::needs::{NeedKind, Needs};
use devlife_logic::schedule::{format_clock, MINUTES_PER_DAY};
use devlife_logic::skills::{self, MAX_SKILL_LEVEL};
use devlife_logic::traits::{self, ids, PlayStyle};
use log::{LevelFilter, Log, Metadata, Record};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Tuning file (same JSON a host would load) ───────────────────────────
const TUNING_JSON: &str = include_str!("../../../data/tuning.json");

/// Days the workday run may take before it counts as stalled.
const MAX_RUN_DAYS: u64 = 14;

// ── Logging ─────────────────────────────────────────────────────────────

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    if verbose && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
    println!("=== DevLife Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Tuning file
    results.extend(validate_tuning(verbose));

    // 2. Trait catalog
    results.extend(validate_trait_catalog(verbose));

    // 3. Skill curve
    results.extend(validate_skill_curve(verbose));

    // 4. Decision sweep over one day
    results.extend(validate_decision_sweep(verbose));

    // 5. Character creation
    results.extend(validate_character_creation(verbose));

    // 6. Full workday run through the engine
    results.extend(validate_engine_run(verbose));

    // 7. Save / load
    results.extend(validate_persistence(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn sample_input(profile: SkillProfile, traits: [&str; 2]) -> CreationInput {
    CreationInput {
        name: "Ada".to_string(),
        skills: service::recommended_skill_distribution(profile),
        traits: traits.iter().map(|t| t.to_string()).collect(),
        schedule: service::default_schedule(),
    }
}

// ── 1. Tuning ───────────────────────────────────────────────────────────

fn validate_tuning(_verbose: bool) -> Vec<TestResult> {
    println!("--- Tuning File ---");
    let mut results = Vec::new();

    let config = match settings::parse_config(TUNING_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "tuning_parse".into(),
                passed: false,
                detail: format!("{}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "tuning_parse".into(),
        passed: true,
        detail: "data/tuning.json parsed and validated".into(),
    });

    results.push(TestResult {
        name: "tuning_matches_defaults".into(),
        passed: config == SimConfig::default(),
        detail: "shipped tuning equals the built-in defaults".into(),
    });

    // Working must drain energy faster than idling, resting must restore it
    let n = &config.needs;
    results.push(TestResult {
        name: "tuning_rate_ordering".into(),
        passed: n.working.energy < n.idle.energy
            && n.idle.energy < 0.0
            && n.resting.energy > 0.0
            && n.resting.concentration > 0.0,
        detail: format!(
            "energy/min idle={} working={} resting={}",
            n.idle.energy, n.working.energy, n.resting.energy
        ),
    });

    results
}

// ── 2. Trait Catalog ────────────────────────────────────────────────────

fn validate_trait_catalog(verbose: bool) -> Vec<TestResult> {
    println!("--- Trait Catalog ---");
    let mut results = Vec::new();
    let catalog = traits::catalog();

    let mut seen: Vec<&str> = catalog.iter().map(|t| t.id.as_str()).collect();
    seen.sort_unstable();
    seen.dedup();
    results.push(TestResult {
        name: "catalog_unique_ids".into(),
        passed: catalog.len() == 15 && seen.len() == 15,
        detail: format!("{} traits, {} unique ids", catalog.len(), seen.len()),
    });

    let asymmetric: Vec<String> = catalog
        .iter()
        .flat_map(|a| catalog.iter().map(move |b| (a, b)))
        .filter(|(a, b)| a.is_compatible_with(b) != b.is_compatible_with(a))
        .map(|(a, b)| format!("{}/{}", a.id, b.id))
        .collect();
    results.push(TestResult {
        name: "catalog_symmetric_compatibility".into(),
        passed: asymmetric.is_empty(),
        detail: if asymmetric.is_empty() {
            "compatibility is symmetric".into()
        } else {
            format!("asymmetric pairs: {}", asymmetric.join(", "))
        },
    });

    let loners: Vec<&str> = catalog
        .iter()
        .filter(|a| {
            !catalog
                .iter()
                .any(|b| b.id != a.id && traits::are_compatible(&a.id, &b.id))
        })
        .map(|t| t.id.as_str())
        .collect();
    results.push(TestResult {
        name: "catalog_every_trait_pairable".into(),
        passed: loners.is_empty(),
        detail: format!("{} traits without a compatible partner", loners.len()),
    });

    for style in PlayStyle::ALL {
        let picks = traits::recommended_traits(style);
        let ids: Vec<String> = picks.iter().map(|t| t.id.clone()).collect();
        let conflicts = service::validate_trait_compatibility(&ids);
        results.push(TestResult {
            name: format!("recommended_{:?}_compatible", style).to_lowercase(),
            passed: !picks.is_empty() && conflicts.is_empty(),
            detail: format!("{} traits, {} conflicts", picks.len(), conflicts.len()),
        });
    }

    if verbose {
        println!("  Suggested traits:");
        for profile in TraitProfile::ALL {
            let names: Vec<String> = service::suggested_traits(profile)
                .into_iter()
                .map(|t| t.name)
                .collect();
            println!("    {:10}: {}", format!("{:?}", profile), names.join(", "));
        }
    }

    results
}

// ── 3. Skill Curve ──────────────────────────────────────────────────────

fn validate_skill_curve(verbose: bool) -> Vec<TestResult> {
    println!("--- Skill Curve ---");
    let mut results = Vec::new();

    let costs: Vec<f32> = (0..MAX_SKILL_LEVEL)
        .filter_map(skills::required_experience)
        .collect();
    let increasing = costs.windows(2).all(|w| w[1] > w[0]);
    results.push(TestResult {
        name: "experience_curve_increasing".into(),
        passed: costs.len() == MAX_SKILL_LEVEL as usize && increasing,
        detail: format!(
            "level 0 costs {}, level {} costs {}",
            costs.first().copied().unwrap_or(0.0),
            MAX_SKILL_LEVEL - 1,
            costs.last().copied().unwrap_or(0.0)
        ),
    });

    results.push(TestResult {
        name: "experience_none_at_max".into(),
        passed: skills::required_experience(MAX_SKILL_LEVEL).is_none(),
        detail: format!("no further experience needed at level {}", MAX_SKILL_LEVEL),
    });

    let eff: Vec<f32> = (0..=MAX_SKILL_LEVEL).map(skills::effectiveness).collect();
    results.push(TestResult {
        name: "effectiveness_bounded".into(),
        passed: eff.windows(2).all(|w| w[1] >= w[0]) && eff.iter().all(|e| *e > 0.0 && *e <= 2.0),
        detail: format!("{:.3}..{:.3}", eff[0], eff[eff.len() - 1]),
    });

    if verbose {
        println!("  Level tiers:");
        for level in (0..=MAX_SKILL_LEVEL).step_by(4) {
            println!(
                "    {:2}: {:12} effectiveness {:.3}",
                level,
                skills::level_description(level),
                skills::effectiveness(level)
            );
        }
    }

    results
}

// ── 4. Decision Sweep ───────────────────────────────────────────────────

fn validate_decision_sweep(verbose: bool) -> Vec<TestResult> {
    println!("--- Decision Sweep ---");
    let mut results = Vec::new();
    let config = SimConfig::default();

    let agent = match service::create_character(&sample_input(
        SkillProfile::Balanced,
        [ids::FOCUSED, ids::CREATIVE],
    )) {
        Ok(a) => a,
        Err(errors) => {
            results.push(TestResult {
                name: "sweep_agent".into(),
                passed: false,
                detail: format!("{:?}", errors),
            });
            return results;
        }
    };

    // Rested agent: the schedule alone decides
    let mut by_minute = Vec::with_capacity(MINUTES_PER_DAY as usize);
    for minute in 0..MINUTES_PER_DAY as u64 {
        by_minute.push(agent.decide_next_activity(minute, true, &config.decision));
    }

    let lunch_ok = (780..840).all(|m| by_minute[m].activity == Activity::Lunch);
    results.push(TestResult {
        name: "sweep_lunch_window".into(),
        passed: lunch_ok,
        detail: "13:00-14:00 decides lunch".into(),
    });

    let breaks_ok = (660..675)
        .chain(960..975)
        .all(|m| by_minute[m].activity == Activity::Break);
    results.push(TestResult {
        name: "sweep_coffee_breaks".into(),
        passed: breaks_ok,
        detail: "11:00 and 16:00 decide a break".into(),
    });

    let off_hours_work = by_minute
        .iter()
        .enumerate()
        .filter(|(m, d)| !(540..=1080).contains(m) && d.activity == Activity::Working)
        .count();
    results.push(TestResult {
        name: "sweep_no_work_off_hours".into(),
        passed: off_hours_work == 0,
        detail: format!("{} off-hour minutes decided work", off_hours_work),
    });

    let zero_length = by_minute.iter().filter(|d| d.duration == 0).count();
    results.push(TestResult {
        name: "sweep_positive_durations".into(),
        passed: zero_length == 0,
        detail: format!("{} zero-length decisions", zero_length),
    });

    // Each critical need overrides the schedule
    let mut override_ok = true;
    for need in NeedKind::ALL {
        let mut starving = agent.clone();
        starving.needs = Needs::default().with(need, 5.0);
        let d = starving.decide_next_activity(600, true, &config.decision);
        let expected = match need {
            NeedKind::Energy => Activity::Resting,
            NeedKind::Hunger => Activity::Eating,
            NeedKind::Thirst => Activity::Drinking,
            NeedKind::Bathroom => Activity::Bathroom,
            NeedKind::Concentration | NeedKind::Motivation => Activity::Break,
        };
        if d.activity != expected {
            override_ok = false;
        }
        if verbose {
            println!(
                "  critical {:13} at 10:00 -> {} ({} min)",
                need.name(),
                d.activity.label(),
                d.duration
            );
        }
    }
    results.push(TestResult {
        name: "sweep_critical_overrides".into(),
        passed: override_ok,
        detail: "each critical need maps to its relief activity".into(),
    });

    if verbose {
        println!("  Schedule-only decisions:");
        let mut last = None;
        for (m, d) in by_minute.iter().enumerate() {
            if last != Some(d.activity) {
                println!("    {} {}", format_clock(m as u32), d.activity.label());
                last = Some(d.activity);
            }
        }
    }

    results
}

// ── 5. Character Creation ───────────────────────────────────────────────

fn validate_character_creation(verbose: bool) -> Vec<TestResult> {
    println!("--- Character Creation ---");
    let mut results = Vec::new();

    for profile in SkillProfile::ALL {
        let errors = validate_creation(&sample_input(profile, [ids::FOCUSED, ids::CREATIVE]));
        results.push(TestResult {
            name: format!("profile_{:?}_valid", profile).to_lowercase(),
            passed: errors.is_empty(),
            detail: if errors.is_empty() {
                "100 points, all within 0..=20".into()
            } else {
                format!("{:?}", errors)
            },
        });
    }

    let mut rng = StdRng::seed_from_u64(2024);
    let mut invalid = 0;
    for _ in 0..500 {
        if !validate_creation(&service::random_creation_input(&mut rng)).is_empty() {
            invalid += 1;
        }
    }
    results.push(TestResult {
        name: "random_characters_valid".into(),
        passed: invalid == 0,
        detail: format!("{} of 500 random characters invalid", invalid),
    });

    let mut bad = sample_input(SkillProfile::Fullstack, [ids::MORNING_PERSON, ids::NIGHT_OWL]);
    bad.name = "A".into();
    bad.schedule.lunch_duration = 10;
    let errors = validate_creation(&bad);
    let expected = errors.contains(&CreationError::NameTooShort)
        && errors
            .iter()
            .any(|e| matches!(e, CreationError::IncompatibleTraits(_, _)))
        && errors.contains(&CreationError::LunchDurationOutOfRange(10));
    results.push(TestResult {
        name: "creation_reports_all_errors".into(),
        passed: expected,
        detail: format!("{} errors reported", errors.len()),
    });

    if verbose {
        for e in &errors {
            println!("  rejected: {}", e);
        }
        if let Ok(agent) = service::random_character(&mut rng) {
            let stats = service::character_stats(&agent);
            println!(
                "  random {}: avg {:.1}, technical {}, business {}, personal {}",
                agent.name,
                stats.average_skill_level,
                stats.technical_score,
                stats.business_score,
                stats.personal_score
            );
        }
    }

    results
}

// ── 6. Engine Run ───────────────────────────────────────────────────────

fn validate_engine_run(verbose: bool) -> Vec<TestResult> {
    println!("--- Engine Run ---");
    let mut results = Vec::new();

    let agent = match service::create_character(&sample_input(
        SkillProfile::Fullstack,
        [ids::QUICK_LEARNER, ids::METHODICAL],
    )) {
        Ok(a) => a,
        Err(errors) => {
            results.push(TestResult {
                name: "engine_agent".into(),
                passed: false,
                detail: format!("{:?}", errors),
            });
            return results;
        }
    };

    let mut engine = SimulationEngine::new(agent);
    if let Err(e) = engine.start() {
        results.push(TestResult {
            name: "engine_start".into(),
            passed: false,
            detail: format!("{}", e),
        });
        return results;
    }

    let max_ticks = MAX_RUN_DAYS * MINUTES_PER_DAY as u64;
    let mut out_of_bounds = 0;
    let mut bad_productivity = 0;
    let mut task_completions = 0;
    let mut level_ups = 0;
    let mut minutes_by_activity = [0u64; 8];
    let mut error = None;

    while engine.state() == RunState::Running && engine.tick_count() < max_ticks {
        match engine.tick() {
            Ok(snap) => {
                if !snap.needs.is_within_bounds() {
                    out_of_bounds += 1;
                }
                let working = snap.activity == Activity::Working;
                if (working && !(snap.productivity > 0.0 && snap.productivity <= 2.0))
                    || (!working && snap.productivity != 0.0)
                {
                    bad_productivity += 1;
                }
                if let Some(i) = Activity::ALL.iter().position(|a| *a == snap.activity) {
                    minutes_by_activity[i] += 1;
                }
                for event in &snap.events {
                    match event {
                        SimEvent::TaskCompleted { .. } | SimEvent::ProjectCompleted { .. } => {
                            task_completions += 1
                        }
                        SimEvent::LevelUp { .. } => level_ups += 1,
                        SimEvent::ActivityChanged { .. } => {}
                    }
                }
            }
            Err(e) => {
                error = Some(e.to_string());
                break;
            }
        }
    }

    results.push(TestResult {
        name: "engine_no_tick_errors".into(),
        passed: error.is_none(),
        detail: error.unwrap_or_else(|| format!("{} ticks", engine.tick_count())),
    });

    results.push(TestResult {
        name: "engine_needs_in_bounds".into(),
        passed: out_of_bounds == 0,
        detail: format!("{} ticks with needs out of range", out_of_bounds),
    });

    results.push(TestResult {
        name: "engine_productivity_gating".into(),
        passed: bad_productivity == 0,
        detail: format!("{} ticks with inconsistent productivity", bad_productivity),
    });

    let tasks = engine.project().tasks().len();
    results.push(TestResult {
        name: "engine_project_completes".into(),
        passed: engine.state() == RunState::Completed && task_completions == tasks,
        detail: format!(
            "{:?} after {} at {:.1}% ({} of {} tasks)",
            engine.state(),
            engine.clock().label(),
            engine.project().overall_progress(),
            task_completions,
            tasks
        ),
    });

    if verbose {
        println!("  Minutes per activity:");
        for (activity, minutes) in Activity::ALL.iter().zip(minutes_by_activity) {
            println!("    {:9}: {}", activity.label(), minutes);
        }
        println!("  Level ups: {}", level_ups);
        println!("  {}", engine.snapshot().summary());
    }

    results
}

// ── 7. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let mut rng = StdRng::seed_from_u64(99);
    let agent = match service::random_character(&mut rng) {
        Ok(a) => a,
        Err(errors) => {
            results.push(TestResult {
                name: "persist_agent".into(),
                passed: false,
                detail: format!("{:?}", errors),
            });
            return results;
        }
    };

    let json_ok = service::export_character(&agent)
        .and_then(|json| service::import_character(&json))
        .map(|back| back == agent);
    results.push(TestResult {
        name: "persist_character_json".into(),
        passed: matches!(json_ok, Ok(true)),
        detail: format!("{:?}", json_ok),
    });

    let mut engine = SimulationEngine::new(agent.clone());
    let mut buffer = Vec::new();
    let run = engine
        .start()
        .and_then(|_| engine.run(3 * 60))
        .map_err(|e| e.to_string());
    let saved = run.and_then(|_| engine.save(&mut buffer).map_err(|e| e.to_string()));

    let mut restored = SimulationEngine::new(agent);
    let loaded = saved.and_then(|_| {
        restored
            .load(buffer.as_slice())
            .map_err(|e| e.to_string())
    });
    let same = loaded.is_ok()
        && restored.agent() == engine.agent()
        && restored.project() == engine.project()
        && restored.clock() == engine.clock()
        && restored.state() == RunState::Paused;
    results.push(TestResult {
        name: "persist_engine_round_trip".into(),
        passed: same,
        detail: match loaded {
            Ok(()) => format!("{} bytes, restored at {}", buffer.len(), restored.clock().label()),
            Err(e) => e,
        },
    });

    let mut corrupted = buffer.clone();
    corrupted.truncate(corrupted.len() / 3);
    results.push(TestResult {
        name: "persist_rejects_truncated".into(),
        passed: persistence::load_simulation(corrupted.as_slice()).is_err(),
        detail: "truncated save is rejected".into(),
    });

    results
}
