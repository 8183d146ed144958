//! DevLife Core - Developer Life Simulation Engine
//!
//! Drives one simulated software developer through their working days, one
//! simulated minute per tick. The decision rules live in `devlife_logic`;
//! this crate owns the run loop around them.
//!
//! # Architecture
//!
//! - **Engine**: run states, staged ticks that commit only valid state
//! - **Snapshot**: read-only per-tick view for display, with the tick's events
//! - **Persistence**: versioned binary saves and JSON character documents
//! - **Service**: character creation, presets, random characters, stats
//! - **Settings**: tuning file loading
//!
//! # Example
//!
//! ```rust,no_run
//! use devlife_core::prelude::*;
//!
//! let mut rng = rand::thread_rng();
//! let agent = random_character(&mut rng).expect("random characters are valid");
//! let mut engine = SimulationEngine::new(agent);
//! engine.start().expect("fresh engine starts");
//!
//! while engine.state() == RunState::Running {
//!     let snapshot = engine.tick().expect("tick");
//!     println!("{}", snapshot.summary());
//! }
//! ```

pub mod engine;
pub mod persistence;
pub mod service;
pub mod settings;
pub mod snapshot;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::{EngineError, RunState, SimulationEngine};
    pub use crate::service::{create_character, random_character};
    pub use crate::snapshot::{SimEvent, Snapshot};
    pub use devlife_logic::config::SimConfig;
    pub use devlife_logic::creation::CreationInput;
}
