//! Shared primitive types used across the entire simulation.

/// A simulation step. Step 1 is the first completed step after a reset.
pub type Step = u64;

/// An amount of MAYA tokens.
pub type Tokens = f64;

/// A scalar environment stimulus. Reference range is [-1, 1],
/// sampled stimuli may fall outside it.
pub type Stimulus = f64;
