//! The triad agents: identity, bias, token balance and ledger history.
//!
//! RULE: balance never goes negative. The only mutation paths are
//! `spend` (guarded by the economy model) and `reset`.

use crate::{
    error::{check_balance, SimError},
    types::Tokens,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three canonical agents, in display order.
/// NEVER reorder: the discriminant is the index into the triad array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum AgentKind {
    Yang  = 0,
    Yin   = 1,
    Swing = 2,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::Yang, AgentKind::Yin, AgentKind::Swing];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Yang  => "yang",
            Self::Yin   => "yin",
            Self::Swing => "swing",
        }
    }

    /// Canonical bias for this agent.
    pub fn bias(&self) -> f64 {
        match self {
            Self::Yang  =>  1.0,
            Self::Yin   => -1.0,
            Self::Swing =>  0.0,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AgentRecord")]
pub struct Agent {
    pub kind: AgentKind,
    pub bias: f64,
    balance:  Tokens,
    /// Balance after each step in which this agent acted.
    history:  Vec<Tokens>,
}

impl Agent {
    /// Agent with its canonical bias.
    pub fn new(kind: AgentKind, balance: Tokens) -> Self {
        Self::with_bias(kind, kind.bias(), balance)
    }

    /// Agent with an arbitrary bias. The balance is clamped at zero.
    pub fn with_bias(kind: AgentKind, bias: f64, balance: Tokens) -> Self {
        Self {
            kind,
            bias,
            balance: balance.max(0.0),
            history: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn balance(&self) -> Tokens {
        self.balance
    }

    pub fn history(&self) -> &[Tokens] {
        &self.history
    }

    /// Deduct `cost` and record the new balance.
    /// Callers must have checked affordability first.
    pub(crate) fn spend(&mut self, cost: Tokens) -> Tokens {
        debug_assert!(self.balance >= cost, "spend() past balance");
        self.balance -= cost;
        self.history.push(self.balance);
        self.balance
    }

    /// Reinitialize in place: fresh balance, empty history.
    pub fn reset(&mut self, balance: Tokens) {
        self.balance = balance.max(0.0);
        self.history.clear();
    }
}

/// Wire shape of an agent. Deserialized agents pass through the same
/// balance checks as the engine's entry points.
#[derive(Deserialize)]
struct AgentRecord {
    kind:    AgentKind,
    bias:    f64,
    balance: Tokens,
    #[serde(default)]
    history: Vec<Tokens>,
}

impl TryFrom<AgentRecord> for Agent {
    type Error = SimError;

    fn try_from(record: AgentRecord) -> Result<Self, Self::Error> {
        check_balance(record.balance)?;
        for balance in &record.history {
            check_balance(*balance)?;
        }
        Ok(Self {
            kind:    record.kind,
            bias:    record.bias,
            balance: record.balance,
            history: record.history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_indices() {
        for (i, kind) in AgentKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        let names: Vec<_> = AgentKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names, ["yang", "yin", "swing"]);
    }

    #[test]
    fn spend_appends_post_spend_balance() {
        let mut agent = Agent::new(AgentKind::Yang, 10.0);
        agent.spend(3.5);
        agent.spend(1.5);

        assert_eq!(agent.balance(), 5.0);
        assert_eq!(agent.history(), &[6.5, 5.0]);
    }

    #[test]
    fn reset_clears_history() {
        let mut agent = Agent::new(AgentKind::Yin, 10.0);
        agent.spend(2.0);
        agent.reset(500.0);

        assert_eq!(agent.balance(), 500.0);
        assert!(agent.history().is_empty());
    }

    #[test]
    fn negative_starting_balance_is_clamped() {
        let agent = Agent::with_bias(AgentKind::Swing, 0.25, -4.0);
        assert_eq!(agent.balance(), 0.0);
        assert_eq!(agent.bias, 0.25);
    }
}
