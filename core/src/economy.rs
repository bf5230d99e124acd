//! The token economy: what an action costs, who can afford it,
//! and how an agent responds to a stimulus.
//!
//! Everything here except `apply_step` is pure. None of these
//! functions validate the cost rate; a negative rate is a caller
//! precondition violation (see `error::check_cost_rate`).

use crate::{
    agent::{Agent, AgentKind},
    types::{Stimulus, Tokens},
};
use serde::{Deserialize, Serialize};

/// Flat fee added to every action. Keeps cost >= 1 even when the
/// stimulus sits exactly on the agent's bias.
pub const BASE_ACTION_COST: Tokens = 1.0;

/// cost = |stimulus - bias| * rate + 1
pub fn compute_cost(agent: &Agent, stimulus: Stimulus, action_cost_rate: f64) -> Tokens {
    (stimulus - agent.bias).abs() * action_cost_rate + BASE_ACTION_COST
}

pub fn can_act(agent: &Agent, cost: Tokens) -> bool {
    agent.balance() >= cost
}

/// `bias * tanh(stimulus)` if the agent can pay for the action, else 0.
/// A broke agent contributes nothing. Swing (bias 0) always returns 0.
pub fn compute_response(agent: &Agent, stimulus: Stimulus, action_cost_rate: f64) -> f64 {
    let cost = compute_cost(agent, stimulus, action_cost_rate);
    if can_act(agent, cost) {
        agent.bias * stimulus.tanh()
    } else {
        0.0
    }
}

/// What happened to one agent during one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub agent:   AgentKind,
    pub cost:    Tokens,
    pub acted:   bool,
    /// Balance after the step (unchanged if the agent could not act).
    pub balance: Tokens,
}

/// Spend for one step. Affordable: deduct and record history.
/// Unaffordable: leave the agent untouched.
pub fn apply_step(agent: &mut Agent, stimulus: Stimulus, action_cost_rate: f64) -> StepOutcome {
    let cost = compute_cost(agent, stimulus, action_cost_rate);
    let acted = can_act(agent, cost);
    let balance = if acted { agent.spend(cost) } else { agent.balance() };

    StepOutcome {
        agent: agent.kind,
        cost,
        acted,
        balance,
    }
}

/// One row of the behaviour table for a snapshot stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentQuote {
    pub agent:    AgentKind,
    pub bias:     f64,
    pub response: f64,
    pub cost:     Tokens,
    pub can_act:  bool,
}

pub fn quote(agent: &Agent, stimulus: Stimulus, action_cost_rate: f64) -> AgentQuote {
    let cost = compute_cost(agent, stimulus, action_cost_rate);
    AgentQuote {
        agent:    agent.kind,
        bias:     agent.bias,
        response: compute_response(agent, stimulus, action_cost_rate),
        cost,
        can_act:  can_act(agent, cost),
    }
}
