//! The simulation engine: owns the triad and drives it step by step.
//!
//! EXECUTION ORDER (fixed, never reordered):
//!   1. Draw ONE stimulus from the sampler.
//!   2. Apply the economy step to yang, yin, swing, in that order,
//!      all with the same stimulus.
//!   3. Increment the step counter, whether or not anyone acted.
//!
//! RULES:
//!   - No rollback. If yang spends and yin cannot, yang's spend stands.
//!   - All randomness flows through the injected StimulusSampler.
//!   - Every state change is recorded in the event log.

use crate::{
    agent::{Agent, AgentKind},
    config::SimConfig,
    consensus::snapshot_consensus,
    economy::{apply_step, quote, AgentQuote, StepOutcome},
    error::{check_balance, check_cost_rate, SimError, SimResult},
    event::SimEvent,
    rng::StimulusSampler,
    types::{Step, Stimulus, Tokens},
};
use serde::{Deserialize, Serialize};

/// Session-scoped state. Exclusively owns the three agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StateRecord")]
pub struct SimulationState {
    agents:              [Agent; 3],
    pub step_count:      Step,
    pub initial_balance: Tokens,
}

impl SimulationState {
    /// Negative balances are clamped to zero.
    pub fn new(initial_balance: Tokens) -> Self {
        let initial_balance = initial_balance.max(0.0);
        Self {
            agents: AgentKind::ALL.map(|kind| Agent::new(kind, initial_balance)),
            step_count: 0,
            initial_balance,
        }
    }

    /// Build a triad with caller-chosen biases, in canonical order.
    pub fn with_biases(initial_balance: Tokens, biases: [f64; 3]) -> Self {
        let initial_balance = initial_balance.max(0.0);
        Self {
            agents: AgentKind::ALL
                .map(|kind| Agent::with_bias(kind, biases[kind.index()], initial_balance)),
            step_count: 0,
            initial_balance,
        }
    }

    /// Agents in canonical display order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, kind: AgentKind) -> &Agent {
        &self.agents[kind.index()]
    }

    /// Balances back to `initial_balance`, histories cleared, counter zeroed.
    /// Public callers go through `SimEngine::reset`, which rejects bad input.
    pub(crate) fn reset(&mut self, initial_balance: Tokens) {
        let initial_balance = initial_balance.max(0.0);
        for agent in &mut self.agents {
            agent.reset(initial_balance);
        }
        self.step_count = 0;
        self.initial_balance = initial_balance;
    }

    /// Apply one step with a shared stimulus. Increments the counter.
    pub fn advance(&mut self, stimulus: Stimulus, action_cost_rate: f64) -> [StepOutcome; 3] {
        let outcomes =
            std::array::from_fn(|i| apply_step(&mut self.agents[i], stimulus, action_cost_rate));
        self.step_count += 1;
        outcomes
    }
}

/// Wire shape of a state. Agents arrive already checked; the
/// triad must also be in canonical order.
#[derive(Deserialize)]
struct StateRecord {
    agents:          [Agent; 3],
    step_count:      Step,
    initial_balance: Tokens,
}

impl TryFrom<StateRecord> for SimulationState {
    type Error = SimError;

    fn try_from(record: StateRecord) -> Result<Self, Self::Error> {
        check_balance(record.initial_balance)?;
        for (agent, kind) in record.agents.iter().zip(AgentKind::ALL) {
            if agent.kind != kind {
                return Err(SimError::AgentOrder { position: kind.index(), found: agent.kind });
            }
        }
        Ok(Self {
            agents:          record.agents,
            step_count:      record.step_count,
            initial_balance: record.initial_balance,
        })
    }
}

/// Summary of one `run` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub steps_completed: Step,
    /// Stimulus drawn for each completed step.
    pub stimuli:         Vec<Stimulus>,
    /// Number of steps each agent acted in, indexed by AgentKind.
    pub actions:         [u64; 3],
    pub events:          Vec<SimEvent>,
}

impl RunReport {
    fn empty() -> Self {
        Self {
            steps_completed: 0,
            stimuli: Vec::new(),
            actions: [0; 3],
            events: Vec::new(),
        }
    }

    pub fn actions_for(&self, kind: AgentKind) -> u64 {
        self.actions[kind.index()]
    }
}

pub struct SimEngine {
    state: SimulationState,
    log:   Vec<SimEvent>,
}

impl SimEngine {
    pub fn new(initial_balance: Tokens) -> SimResult<Self> {
        check_balance(initial_balance)?;
        Ok(Self::from_state(SimulationState::new(initial_balance)))
    }

    /// Wrap an existing state. Every public way of building one keeps
    /// balances non-negative.
    pub fn from_state(state: SimulationState) -> Self {
        Self { state, log: Vec::new() }
    }

    pub fn from_config(config: &SimConfig) -> SimResult<Self> {
        config.validate()?;
        Self::new(config.initial_balance)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn agents(&self) -> &[Agent] {
        self.state.agents()
    }

    pub fn step_count(&self) -> Step {
        self.state.step_count
    }

    /// Every event since construction, the last reset or the last drain.
    /// The log is unbounded; long sessions should drain it.
    pub fn event_log(&self) -> &[SimEvent] {
        &self.log
    }

    /// Hand the accumulated events to the caller and start a fresh log.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.log)
    }

    pub fn reset(&mut self, initial_balance: Tokens) -> SimResult<()> {
        check_balance(initial_balance)?;
        self.state.reset(initial_balance);
        self.log.clear();
        self.log.push(SimEvent::StateReset { initial_balance });
        log::info!("triad reset: balance={initial_balance}");
        Ok(())
    }

    /// Run `num_steps` steps. Zero steps is a no-op.
    pub fn run<S>(&mut self, num_steps: u64, action_cost_rate: f64, sampler: &mut S) -> SimResult<RunReport>
    where
        S: StimulusSampler + ?Sized,
    {
        self.run_with_progress(num_steps, action_cost_rate, sampler, |_, _| {})
    }

    /// Like `run`, calling `on_step(completed, total)` after each step.
    ///
    /// A non-finite stimulus aborts the run before it touches any agent;
    /// steps already completed are kept.
    pub fn run_with_progress<S, F>(
        &mut self,
        num_steps: u64,
        action_cost_rate: f64,
        sampler: &mut S,
        mut on_step: F,
    ) -> SimResult<RunReport>
    where
        S: StimulusSampler + ?Sized,
        F: FnMut(u64, u64),
    {
        check_cost_rate(action_cost_rate)?;

        let mut report = RunReport::empty();
        for done in 0..num_steps {
            let stimulus = sampler.sample();
            if !stimulus.is_finite() {
                self.log.extend(report.events.iter().cloned());
                return Err(SimError::InvalidStimulus { stimulus });
            }

            let step = self.state.step_count + 1;
            report.events.push(SimEvent::StepStarted { step, stimulus });

            let outcomes = self.state.advance(stimulus, action_cost_rate);
            let mut actions = 0;
            for outcome in &outcomes {
                if outcome.acted {
                    report.actions[outcome.agent.index()] += 1;
                    actions += 1;
                } else {
                    log::debug!(
                        "step={step} {} skipped: cost={:.3} balance={:.3}",
                        outcome.agent,
                        outcome.cost,
                        outcome.balance
                    );
                }
                report.events.push(SimEvent::from_outcome(step, outcome));
            }
            report.events.push(SimEvent::StepCompleted { step, actions });

            log::debug!("step={step} stimulus={stimulus:.4} actions={actions}");

            report.stimuli.push(stimulus);
            report.steps_completed += 1;
            on_step(done + 1, num_steps);
        }

        self.log.extend(report.events.iter().cloned());
        log::info!(
            "run complete: steps={} total_steps={} actions={:?}",
            report.steps_completed,
            self.state.step_count,
            report.actions
        );
        Ok(report)
    }

    /// Behaviour table for one stimulus, without mutating anything.
    pub fn quote(&self, stimulus: Stimulus, action_cost_rate: f64) -> Vec<AgentQuote> {
        self.agents()
            .iter()
            .map(|a| quote(a, stimulus, action_cost_rate))
            .collect()
    }

    pub fn consensus_at(&self, stimulus: Stimulus, action_cost_rate: f64) -> Option<f64> {
        snapshot_consensus(self.agents(), stimulus, action_cost_rate)
    }
}
