use crate::agent::AgentKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid action cost rate: {rate} (must be finite and >= 0)")]
    InvalidCostRate { rate: f64 },

    #[error("Invalid token balance: {balance} (must be finite and >= 0)")]
    InvalidBalance { balance: f64 },

    #[error("Invalid stimulus spread: {spread} (must be finite and >= 0)")]
    InvalidSpread { spread: f64 },

    #[error("Invalid stimulus: {stimulus} (must be finite)")]
    InvalidStimulus { stimulus: f64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Agent {found} out of canonical order at position {position}")]
    AgentOrder { position: usize, found: AgentKind },
}

pub type SimResult<T> = Result<T, SimError>;

/// Reject cost rates the economy model is not defined for.
pub fn check_cost_rate(rate: f64) -> SimResult<()> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidCostRate { rate })
    }
}

/// Reject balances that would break the non-negative balance invariant.
pub fn check_balance(balance: f64) -> SimResult<()> {
    if balance.is_finite() && balance >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidBalance { balance })
    }
}
