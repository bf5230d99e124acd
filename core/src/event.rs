//! The in-memory event log of a simulation run.
//!
//! Events are appended in execution order and never rewritten.
//! Serialized logs are the determinism oracle: same seed, same bytes.

use crate::{
    agent::AgentKind,
    economy::StepOutcome,
    types::{Step, Stimulus, Tokens},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    StepStarted {
        step: Step,
        stimulus: Stimulus,
    },
    StepCompleted {
        step: Step,
        actions: usize,
    },
    StateReset {
        initial_balance: Tokens,
    },

    // ── Agent events ───────────────────────────────
    AgentActed {
        step: Step,
        agent: AgentKind,
        cost: Tokens,
        balance: Tokens,
    },
    AgentSkipped {
        step: Step,
        agent: AgentKind,
        cost: Tokens,
        balance: Tokens,
    },
}

impl SimEvent {
    pub fn from_outcome(step: Step, outcome: &StepOutcome) -> Self {
        if outcome.acted {
            SimEvent::AgentActed {
                step,
                agent: outcome.agent,
                cost: outcome.cost,
                balance: outcome.balance,
            }
        } else {
            SimEvent::AgentSkipped {
                step,
                agent: outcome.agent,
                cost: outcome.cost,
                balance: outcome.balance,
            }
        }
    }

    /// Stable string name for each variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            SimEvent::StepStarted { .. }   => "step_started",
            SimEvent::StepCompleted { .. } => "step_completed",
            SimEvent::StateReset { .. }    => "state_reset",
            SimEvent::AgentActed { .. }    => "agent_acted",
            SimEvent::AgentSkipped { .. }  => "agent_skipped",
        }
    }
}
