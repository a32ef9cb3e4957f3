//! Input: the events the simulation loop consumes and the sources that
//! produce them.
//!
//! # Invariants
//! - "No event this frame" is `Ok(None)`, never an error.
//! - Sources never touch world state; they only produce events.

pub mod action;
pub mod source;

pub use action::{InputEvent, ParseError};
pub use source::{FailureLimit, InputError, InputSource, LineInput, ScriptedInput};
