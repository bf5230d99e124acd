//! Triad consensus: token-weighted mean of agent responses.
//!
//! Weights are current balances, so an agent that has spent down its
//! tokens carries less say. No consensus exists when nobody responds
//! or nobody holds tokens; callers get `None`, never 0.0.

use crate::{
    agent::Agent,
    economy::compute_response,
    types::Stimulus,
};

/// Σ(balance_i * response_i) / Σ(balance_i), or None when every
/// response is zero or the total weight is zero.
///
/// `responses` pairs positionally with `agents` and must be the same
/// length. Every agent's balance counts towards the total weight.
pub fn consensus(agents: &[Agent], responses: &[f64]) -> Option<f64> {
    debug_assert_eq!(agents.len(), responses.len(), "one response per agent");

    if responses.iter().all(|r| *r == 0.0) {
        return None;
    }

    let total_weight: f64 = agents.iter().map(Agent::balance).sum();
    if total_weight <= 0.0 {
        return None;
    }

    let weighted: f64 = agents
        .iter()
        .zip(responses)
        .map(|(agent, response)| agent.balance() * response)
        .sum();

    Some(weighted / total_weight)
}

/// Responses for a single stimulus, in the agents' order.
pub fn responses_for(agents: &[Agent], stimulus: Stimulus, action_cost_rate: f64) -> Vec<f64> {
    agents
        .iter()
        .map(|a| compute_response(a, stimulus, action_cost_rate))
        .collect()
}

/// Compute responses for one stimulus and aggregate them.
pub fn snapshot_consensus(agents: &[Agent], stimulus: Stimulus, action_cost_rate: f64) -> Option<f64> {
    let responses = responses_for(agents, stimulus, action_cost_rate);
    consensus(agents, &responses)
}
