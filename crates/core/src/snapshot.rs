use serde::Serialize;

use crate::game_state::Tetromino;
use crate::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH, NEXT_QUEUE_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind(),
            rotation: value.rotation(),
            x: value.x,
            y: value.y,
        }
    }
}

/// Read-only view of a session for renderers and other hosts
///
/// Board cells hold [`PieceKind::tag`] values, 0 for empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameSnapshot {
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: ActiveSnapshot,
    pub ghost_y: i8,
    pub hold: Option<PieceKind>,
    pub next_queue: [PieceKind; NEXT_QUEUE_LEN],
    pub can_hold: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub drop_delay_ms: u32,
    pub game_over: bool,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: ActiveSnapshot {
                kind: PieceKind::I,
                rotation: Rotation::SPAWN,
                x: 0,
                y: 0,
            },
            ghost_y: 0,
            hold: None,
            next_queue: [PieceKind::I; NEXT_QUEUE_LEN],
            can_hold: true,
            score: 0,
            level: 0,
            lines: 0,
            drop_delay_ms: 0,
            game_over: false,
        }
    }
}
