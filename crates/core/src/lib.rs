//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the gameplay simulation: the playfield, the piece
//! catalog, the piece sequencer and the playing session. It has no
//! dependencies on rendering, input devices, audio or I/O.
//!
//! - **Deterministic**: the same seed produces the same piece stream
//! - **Host-driven**: the host calls [`GameState::update`] every frame and
//!   one action method per key press; nothing runs on its own
//! - **Event-based**: sounds and effects react to [`GameEvent`]s drained from
//!   the session, the core never calls into the host
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 playfield, collision, settling, line clearing, score and level
//! - [`game_state`]: the session: active piece, gravity, actions, game over
//! - [`pieces`]: shape catalog and wall-kick rotation
//! - [`rng`]: uniform randomizer, next queue and hold slot
//! - [`scoring`]: line-clear points and drop-delay tables
//! - [`snapshot`]: read-only export for renderers
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: every draw is independent over the seven kinds (no bag)
//! - **Fixed kicks**: a blocked rotation tries eight offsets in a fixed order
//! - **Hold**: once per spawn; a held piece returns at the spawn point
//! - **Scoring**: 40/100/300/1200 x (level + 1), plus one point per soft-drop row
//! - **Levels**: one level per ten lines, classic arcade gravity curve
//! - **Game over**: a newly spawned piece does not fit at the spawn point
//!
//! # Example
//!
//! ```
//! use stackfall_core::{GameState, SessionConfig};
//! use stackfall_core::types::{GameAction, GameEvent};
//!
//! let mut game = GameState::new(SessionConfig { seed: Some(12345), start_level: 0 });
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! let placed = game
//!     .drain_events()
//!     .any(|e| matches!(e, GameEvent::PiecePlaced { .. }));
//! assert!(placed);
//! assert_eq!(game.board().filled_count(), 4);
//! ```
//!
//! # Timing
//!
//! Time is measured in internal units of 1/16 frame (milliseconds at 60 FPS).
//! Gravity moves the piece one row when more than the level's drop delay has
//! passed since the previous gravity step; at level 0 that is 48 frames
//! (768 units).

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use stackfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Placement};
pub use game_state::{GameState, Phase, SessionConfig, Tetromino};
pub use pieces::{cells, shape_of, try_rotate, Piece, Shape, WALL_KICKS};
pub use rng::{HoldOutcome, PieceSequencer};
pub use scoring::{drop_delay_frames, drop_delay_ms, line_clear_points};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use types::GameEvent;
