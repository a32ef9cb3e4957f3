//! Simulation loop: drives ticks, applies input, invokes render.
//!
//! Each iteration runs, strictly in order: render, input, processing, tick,
//! exit check. Phases never overlap and the world has a single writer.

mod processing;
mod runner;

pub use processing::{Directive, process_input};
pub use runner::{LoopConfig, LoopState, RunSummary, SimError, SimulationLoop};
