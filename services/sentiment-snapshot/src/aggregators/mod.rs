// Derived metrics computed from normalized feed values
pub mod altseason;
pub mod rate_decision;

pub use altseason::{
    AltseasonChain, AltseasonInputs, AltseasonReading, AltseasonStrategy, AthBlend,
    DominanceProxy, OutperformanceRatio,
};
pub use rate_decision::{probabilities_for, rate_decision, RateInputs};
