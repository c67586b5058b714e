//! Terminal input mapping (host side).
//!
//! Maps `crossterm` key events onto session actions and the few commands the
//! host handles itself (pause, restart, quit). No gameplay logic lives here.

pub mod map;

pub use stackfall_types as types;

pub use map::{handle_key_event, host_command, should_quit, HostCommand};
