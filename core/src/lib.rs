//! triad-core: a three-agent token economy.
//!
//! Yang (+1), yin (-1) and swing (0) spend MAYA tokens to respond to a
//! scalar stimulus. Acting against one's bias costs more. A token-weighted
//! consensus summarizes how the triad leans for a given stimulus.

pub mod agent;
pub mod config;
pub mod consensus;
pub mod economy;
pub mod engine;
pub mod error;
pub mod event;
pub mod rng;
pub mod snapshot;
pub mod types;

pub use agent::{Agent, AgentKind};
pub use config::SimConfig;
pub use consensus::consensus;
pub use economy::{apply_step, can_act, compute_cost, compute_response};
pub use engine::{RunReport, SimEngine, SimulationState};
pub use error::{SimError, SimResult};
pub use rng::{NormalStimulus, StimulusRng, StimulusSampler};
