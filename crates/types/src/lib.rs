//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behavior beyond parsing and formatting, so
//! they can be used by the simulation core, the terminal host and any other
//! consumer of snapshots or events.
//!
//! # Board Dimensions
//!
//! Standard playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn position**: (3, 0), the top-left corner of the 5x5 shape box
//!
//! # Drop Timing
//!
//! Gravity follows the classic arcade curve, expressed in frames of
//! [`FRAME_MS`] internal units each:
//!
//! | Level | Frames |
//! |-------|--------|
//! | 0 | 48 |
//! | 1 | 43 |
//! | 2 | 38 |
//! | 3 | 33 |
//! | 4 | 28 |
//! | 5 | 23 |
//! | 6 | 18 |
//! | 7 | 13 |
//! | 8 | 8 |
//! | 9 | 6 |
//! | 10-12 | 5 |
//! | 13-15 | 4 |
//! | 16-18 | 3 |
//! | 19-28 | 2 |
//! | 29+ | 1 |
//!
//! # Examples
//!
//! ```
//! use stackfall_types::{PieceKind, Rotation, GameAction, BOARD_WIDTH, BOARD_HEIGHT};
//!
//! let piece = PieceKind::T;
//! assert_eq!(PieceKind::from_str("t"), Some(piece));
//!
//! assert_eq!(Rotation::new(3).next(), Rotation::new(0));
//!
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Side length of the square box every rotation state is drawn in
pub const SHAPE_SIZE: usize = 5;

/// Number of upcoming pieces kept in the next queue
pub const NEXT_QUEUE_LEN: usize = 4;

/// Spawn column for the top-left corner of the shape box
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8 - 2;

/// Spawn row for the top-left corner of the shape box
pub const SPAWN_Y: i8 = 0;

/// Internal time units per frame of the drop table
pub const FRAME_MS: u32 = 16;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear scoring table (classic scoring)
///
/// Base points for clearing N lines at level 0:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
///
/// Points are multiplied by (level + 1). Clears of more than four rows use the
/// last entry.
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Drop delay in frames for levels 0 through 9; higher levels use [`DROP_FRAMES_BANDS`].
pub const DROP_FRAMES: [u32; 10] = [48, 43, 38, 33, 28, 23, 18, 13, 8, 6];

/// Drop delay bands for level 10 and above: (last level of band, frames).
/// Anything past the last band drops every frame.
pub const DROP_FRAMES_BANDS: [(u32, u32); 4] = [(12, 5), (15, 4), (18, 3), (28, 2)];

/// The seven tetromino piece kinds
///
/// - **I**: straight bar
/// - **O**: 2x2 square
/// - **T**: T-shaped
/// - **S**: S-shaped
/// - **Z**: Z-shaped (mirror of S)
/// - **J**: J-shaped
/// - **L**: L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Position in [`PieceKind::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Kind at `index % 7`
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Non-zero tag written into exported grids (0 means empty)
    ///
    /// ```
    /// use stackfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.tag(), 1);
    /// assert_eq!(PieceKind::L.tag(), 7);
    /// ```
    pub fn tag(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`PieceKind::tag`]
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1..=7 => Some(Self::ALL[(tag - 1) as usize]),
            _ => None,
        }
    }

    /// Single-character display code
    pub fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Rotation state index, always in 0..=3
///
/// Each step is a quarter turn. There is only one rotation direction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rotation(u8);

impl Rotation {
    /// Number of rotation states
    pub const COUNT: u8 = 4;

    /// Spawn orientation
    pub const SPAWN: Rotation = Rotation(0);

    /// Rotation `index % 4`
    pub fn new(index: u8) -> Self {
        Self(index % Self::COUNT)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Advance one quarter turn
    ///
    /// ```
    /// use stackfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::new(0).next(), Rotation::new(1));
    /// assert_eq!(Rotation::new(3).next(), Rotation::new(0));
    /// ```
    pub fn next(self) -> Self {
        Self::new(self.0.wrapping_add(1))
    }
}

/// Discrete player actions
///
/// These are fed by the host once per key press. Each maps to one session
/// entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (one point per row)
    SoftDrop,
    /// Rotate piece one quarter turn, with wall kicks
    Rotate,
    /// Drop piece to its resting row and settle it
    HardDrop,
    /// Swap with the hold slot (once per spawn)
    Hold,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotate"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "rotate" => Some(GameAction::Rotate),
            "harddrop" => Some(GameAction::HardDrop),
            "hold" => Some(GameAction::Hold),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::Rotate => "rotate",
            GameAction::HardDrop => "hardDrop",
            GameAction::Hold => "hold",
        }
    }
}

/// Notification emitted by the session for hosts to react to (sound, effects).
///
/// Events are buffered while an action or tick runs and drained by the host
/// afterwards. Each is emitted at most once per triggering action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PieceRotated,
    PiecePlaced { kind: PieceKind, lines_cleared: u32 },
    LinesCleared { count: u32, points: u32 },
    LevelUp { level: u32 },
    PieceHeld { kind: PieceKind },
    GameOver,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell settled by a piece of that kind
pub type Cell = Option<PieceKind>;
