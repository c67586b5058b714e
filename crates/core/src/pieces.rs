//! Pieces module - tetromino shape catalog and wall-kick rotation
//!
//! Every kind has four rotation states drawn in a 5x5 box. Shapes are indexed
//! `shape[x][y]`: the outer index is the column offset inside the box, the inner
//! index the row offset. Kinds with two-fold symmetry repeat states 0/1 as 2/3 so
//! that every kind is indexed the same way.
//!
//! Rotation uses a fixed kick list that does not depend on kind or rotation
//! state (this is not SRS). The kick offsets are tuned against these exact
//! shapes, so the tables must not be edited independently.

use stackfall_types::{PieceKind, Rotation, SHAPE_SIZE};

/// 5x5 occupancy grid, `1` = occupied, indexed `[x][y]`
pub type Shape = [[u8; SHAPE_SIZE]; SHAPE_SIZE];

/// Occupied offsets of a shape relative to the box origin, x-major order
pub type PieceCells = [(i8, i8); 4];

/// Offsets tried in order when a rotation is blocked at the current position
pub const WALL_KICKS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (-2, 0),
    (2, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
];

/// A piece kind in a rotation state. Position is owned by whoever moves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
}

impl Piece {
    /// New piece in spawn orientation
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::SPAWN,
        }
    }

    /// Same kind, advanced one quarter turn
    pub fn rotated(self) -> Self {
        Self {
            rotation: self.rotation.next(),
            ..self
        }
    }

    pub fn shape(&self) -> &'static Shape {
        shape_of(self.kind, self.rotation)
    }

    pub fn cells(&self) -> PieceCells {
        cells(self.kind, self.rotation)
    }
}

/// Get the 5x5 shape for a kind and rotation
pub fn shape_of(kind: PieceKind, rotation: Rotation) -> &'static Shape {
    let states = match kind {
        PieceKind::I => &I_SHAPES,
        PieceKind::O => &O_SHAPES,
        PieceKind::T => &T_SHAPES,
        PieceKind::S => &S_SHAPES,
        PieceKind::Z => &Z_SHAPES,
        PieceKind::J => &J_SHAPES,
        PieceKind::L => &L_SHAPES,
    };
    &states[rotation.index()]
}

/// Occupied (dx, dy) offsets for a kind and rotation
pub fn cells(kind: PieceKind, rotation: Rotation) -> PieceCells {
    let shape = shape_of(kind, rotation);
    let mut out = [(0i8, 0i8); 4];
    let mut n = 0usize;
    for (x, column) in shape.iter().enumerate() {
        for (y, &filled) in column.iter().enumerate() {
            if filled != 0 && n < out.len() {
                out[n] = (x as i8, y as i8);
                n += 1;
            }
        }
    }
    debug_assert_eq!(n, 4, "{kind:?} rotation {rotation:?} is not a tetromino");
    out
}

/// Rotate `piece` at (x, y) one quarter turn, falling back to [`WALL_KICKS`]
///
/// Returns the rotated piece and the kick offset that was applied, or `None` if
/// neither the unkicked position nor any kick validates.
pub fn try_rotate(
    piece: Piece,
    x: i8,
    y: i8,
    is_valid: impl Fn(Piece, i8, i8) -> bool,
) -> Option<(Piece, (i8, i8))> {
    let rotated = piece.rotated();

    std::iter::once((0, 0))
        .chain(WALL_KICKS)
        .find(|&(dx, dy)| is_valid(rotated, x + dx, y + dy))
        .map(|offset| (rotated, offset))
}

const I_SHAPES: [Shape; 4] = {
    let r0 = [
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 1, 1, 1, 1],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ];
    let r1 = [
        [0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
    ];
    [r0, r1, r0, r1]
};

const O_SHAPES: [Shape; 4] = {
    let r0 = [
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 1, 1, 0],
        [0, 0, 1, 1, 0],
        [0, 0, 0, 0, 0],
    ];
    [r0, r0, r0, r0]
};

const T_SHAPES: [Shape; 4] = [
    [
        [0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 1, 1, 1, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 1, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 1, 1, 1, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 1, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 0, 0, 0],
    ],
];

const S_SHAPES: [Shape; 4] = {
    let r0 = [
        [0, 0, 0, 0, 0],
        [0, 0, 1, 1, 0],
        [0, 1, 1, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ];
    let r1 = [
        [0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 1, 0],
        [0, 0, 0, 1, 0],
        [0, 0, 0, 0, 0],
    ];
    [r0, r1, r0, r1]
};

const Z_SHAPES: [Shape; 4] = {
    let r0 = [
        [0, 0, 0, 0, 0],
        [0, 1, 1, 0, 0],
        [0, 0, 1, 1, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ];
    let r1 = [
        [0, 0, 0, 0, 0],
        [0, 0, 0, 1, 0],
        [0, 0, 1, 1, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 0, 0, 0],
    ];
    [r0, r1, r0, r1]
};

const J_SHAPES: [Shape; 4] = [
    [
        [0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 1, 1, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 1, 0, 0, 0],
        [0, 1, 1, 1, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 0, 1, 1, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 1, 1, 1, 0],
        [0, 0, 0, 1, 0],
        [0, 0, 0, 0, 0],
    ],
];

const L_SHAPES: [Shape; 4] = [
    [
        [0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 1, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 1, 1, 1, 0],
        [0, 1, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 1, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 0, 0, 1, 0],
        [0, 1, 1, 1, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(cells: impl IntoIterator<Item = (i8, i8)>) -> Vec<(i8, i8)> {
        let cells: Vec<_> = cells.into_iter().collect();
        let min_x = cells.iter().map(|c| c.0).min().unwrap();
        let min_y = cells.iter().map(|c| c.1).min().unwrap();
        let mut out: Vec<_> = cells.iter().map(|&(x, y)| (x - min_x, y - min_y)).collect();
        out.sort();
        out
    }

    #[test]
    fn test_every_state_has_four_cells() {
        for kind in PieceKind::ALL {
            for r in 0..4 {
                let shape = shape_of(kind, Rotation::new(r));
                let count: u32 = shape.iter().flatten().map(|&c| c as u32).sum();
                assert_eq!(count, 4, "{kind:?} rotation {r}");
            }
        }
    }

    #[test]
    fn test_each_state_is_quarter_turn_of_previous() {
        for kind in PieceKind::ALL {
            for r in 0..4u8 {
                let turned = cells(kind, Rotation::new(r)).map(|(x, y)| (y, -x));
                let next = cells(kind, Rotation::new(r + 1));
                assert_eq!(normalized(turned), normalized(next), "{kind:?} {r}->{}", r + 1);
            }
        }
    }

    #[test]
    fn test_symmetric_kinds_repeat_states() {
        for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
            assert_eq!(shape_of(kind, Rotation::new(0)), shape_of(kind, Rotation::new(2)));
            assert_eq!(shape_of(kind, Rotation::new(1)), shape_of(kind, Rotation::new(3)));
        }
        for r in 1..4 {
            assert_eq!(
                shape_of(PieceKind::O, Rotation::new(0)),
                shape_of(PieceKind::O, Rotation::new(r))
            );
        }
    }

    #[test]
    fn test_shapes_are_indexed_column_first() {
        assert_eq!(
            cells(PieceKind::I, Rotation::SPAWN),
            [(2, 1), (2, 2), (2, 3), (2, 4)]
        );
        assert_eq!(
            cells(PieceKind::T, Rotation::SPAWN),
            [(1, 2), (2, 1), (2, 2), (2, 3)]
        );
    }

    #[test]
    fn test_try_rotate_prefers_unkicked_position() {
        let piece = Piece::new(PieceKind::T);
        let (rotated, offset) = try_rotate(piece, 3, 0, |_, _, _| true).unwrap();
        assert_eq!(rotated.rotation, Rotation::new(1));
        assert_eq!(offset, (0, 0));
    }

    #[test]
    fn test_try_rotate_uses_kicks_in_order() {
        let piece = Piece::new(PieceKind::T);
        // Only the fourth kick (+2, 0) validates.
        let result = try_rotate(piece, 3, 5, |_, x, y| (x, y) == (5, 5) || (x, y) == (3, 4));
        assert_eq!(result.map(|(_, o)| o), Some((2, 0)));
    }

    #[test]
    fn test_try_rotate_fails_when_nothing_fits() {
        let piece = Piece::new(PieceKind::L);
        assert!(try_rotate(piece, 3, 5, |_, _, _| false).is_none());
    }
}
