//! Randomized invariant checking for the gate and sequencer.

pub mod simulator;

pub use simulator::{
    run_simulator, SimulatedOperation, SimulatorConfig, SimulatorReport, SimulatorStats, Violation,
};
