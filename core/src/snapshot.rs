//! Read-only views of the simulation for a presentation layer.
//!
//! A ledger snapshot captures every agent's balance and history.
//! A behaviour snapshot captures how the triad would respond to one
//! stimulus right now, plus the consensus if there is one.

use crate::{
    agent::{Agent, AgentKind},
    economy::AgentQuote,
    engine::SimEngine,
    error::SimResult,
    types::{Step, Stimulus, Tokens},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentLedger {
    pub name:    AgentKind,
    pub bias:    f64,
    pub balance: Tokens,
    /// balance - initial balance
    pub delta:   Tokens,
    pub history: Vec<Tokens>,
}

impl AgentLedger {
    fn from_agent(agent: &Agent, initial_balance: Tokens) -> Self {
        Self {
            name:    agent.kind,
            bias:    agent.bias,
            balance: agent.balance(),
            delta:   agent.balance() - initial_balance,
            history: agent.history().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub step_count:      Step,
    pub initial_balance: Tokens,
    pub agents:          Vec<AgentLedger>,
}

impl LedgerSnapshot {
    pub fn capture(engine: &SimEngine) -> Self {
        let state = engine.state();
        Self {
            step_count:      state.step_count,
            initial_balance: state.initial_balance,
            agents: state
                .agents()
                .iter()
                .map(|a| AgentLedger::from_agent(a, state.initial_balance))
                .collect(),
        }
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviourSnapshot {
    pub stimulus:         Stimulus,
    pub action_cost_rate: f64,
    pub quotes:           Vec<AgentQuote>,
    /// None when no agent responds or no agent holds tokens.
    pub consensus:        Option<f64>,
}

impl BehaviourSnapshot {
    pub fn capture(engine: &SimEngine, stimulus: Stimulus, action_cost_rate: f64) -> Self {
        Self {
            stimulus,
            action_cost_rate,
            quotes:    engine.quote(stimulus, action_cost_rate),
            consensus: engine.consensus_at(stimulus, action_cost_rate),
        }
    }
}
