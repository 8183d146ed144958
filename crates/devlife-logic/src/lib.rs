//! Pure simulation logic for DevLife.
//!
//! This crate contains the decision core of a single simulated software
//! developer: needs that decay and recover, skills that level up, two
//! personality traits, a work schedule, and the policy that picks what to do
//! next. Nothing here performs I/O or keeps global state; every operation
//! takes plain data (and a [`config::SimConfig`] where tuning applies) and
//! returns results, so the engine, the harness, and tests all drive it the
//! same way.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`activity`] | Activity enum, decision reasons, decision value |
//! | [`agent`] | The employee: needs dispatch, decision policy, productivity, experience |
//! | [`clock`] | Simulated minutes, days, and hours |
//! | [`config`] | Rates, recovery amounts, thresholds, and durations |
//! | [`creation`] | Character creation input and validation |
//! | [`needs`] | Six bounded needs with per-activity update rules |
//! | [`project`] | Ordered task queue advanced by working minutes |
//! | [`schedule`] | Work, lunch, and break windows |
//! | [`skills`] | Skill levels, experience curve, effectiveness |
//! | [`traits`] | Personality traits, catalog, compatibility |

pub mod activity;
pub mod agent;
pub mod clock;
pub mod config;
pub mod creation;
pub mod needs;
pub mod project;
pub mod schedule;
pub mod skills;
pub mod traits;
