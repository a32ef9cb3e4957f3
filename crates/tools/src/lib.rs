//! Developer Tooling: read-only world inspection for the CLI and debugging.

mod inspector;

pub use inspector::{EntityInfo, WorldInspector, WorldSummary};
