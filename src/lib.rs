//! Stackfall (workspace facade crate).
//!
//! Re-exports the workspace crates as `stackfall::{core, input, types}` and
//! holds the host-side configuration used by the terminal binary.

pub mod config;

pub use stackfall_core as core;
pub use stackfall_input as input;
pub use stackfall_types as types;

pub use config::HostConfig;
