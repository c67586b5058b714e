//! Board module - the playfield grid plus score and level bookkeeping
//!
//! The board is a 10x20 grid where each cell is empty or holds the kind of the
//! piece that settled there. Uses a flat array for cache locality and no
//! allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//!
//! Grid contents change only through [`Board::place_piece`] and
//! [`Board::clear_full_lines`]. Score and level live here too, because a
//! placement, its line clear and the resulting score change are one step.

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::pieces::Piece;
use crate::scoring::line_clear_points;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH, LINES_PER_LEVEL};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Outcome of settling a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub lines_cleared: u32,
    /// Line-clear points awarded for this placement
    pub points: u32,
    /// Level after the placement, if it changed
    pub level_up: Option<u32>,
}

/// The playfield - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
    score: u32,
    level: u32,
    /// Lines toward the next level; reset to 0 on every level-up
    level_lines: u32,
    /// Total lines cleared this game
    lines: u32,
}

impl Board {
    /// Create a new empty board at level 0
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            score: 0,
            level: 0,
            level_lines: 0,
            lines: 0,
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y), for hosts and tests building a position.
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if a single cell is inside the grid and empty
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Board coordinates of a piece cell, or None if they leave the i8 range
    #[inline]
    fn cell_at(x: i8, y: i8, (dx, dy): (i8, i8)) -> Option<(i8, i8)> {
        Some((x.checked_add(dx)?, y.checked_add(dy)?))
    }

    /// Check whether every occupied cell of `piece` with its box at (x, y)
    /// lands inside the grid on an empty cell
    pub fn is_valid_position(&self, piece: Piece, x: i8, y: i8) -> bool {
        piece.cells().iter().all(|&offset| {
            Self::cell_at(x, y, offset).is_some_and(|(cx, cy)| self.is_free(cx, cy))
        })
    }

    /// Lowest row the piece can fall to from (x, y) without passing through anything
    ///
    /// Used for hard drop and the ghost preview. If (x, y) itself is invalid
    /// the starting row is returned unchanged.
    pub fn find_drop_position(&self, piece: Piece, x: i8, y: i8) -> i8 {
        let mut drop_y = y;
        while let Some(below) = drop_y.checked_add(1) {
            if !self.is_valid_position(piece, x, below) {
                break;
            }
            drop_y = below;
        }
        drop_y
    }

    /// Settle `piece` at (x, y), clear any full rows and update score and level
    ///
    /// The caller must have checked [`Board::is_valid_position`] first.
    pub fn place_piece(&mut self, piece: Piece, x: i8, y: i8) -> Placement {
        debug_assert!(
            self.is_valid_position(piece, x, y),
            "placing {:?} at invalid position ({x}, {y})",
            piece.kind
        );

        for offset in piece.cells() {
            if let Some((cx, cy)) = Self::cell_at(x, y, offset) {
                self.set(cx, cy, Some(piece.kind));
            }
        }

        let lines_cleared = self.clear_full_lines();
        let level_before = self.level;
        let points = self.update_score(lines_cleared);

        debug!(kind = ?piece.kind, x, y, lines_cleared, points, "piece placed");

        Placement {
            lines_cleared,
            points,
            level_up: (self.level != level_before).then_some(self.level),
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Remove every full row and shift the rows above down
    ///
    /// Full rows are collected top to bottom before anything moves. Each one
    /// then pulls the rows above it down by one, so k full rows compact the
    /// stack by k. Returns the number of rows removed.
    pub fn clear_full_lines(&mut self) -> u32 {
        let full: ArrayVec<usize, { BOARD_HEIGHT as usize }> = (0..BOARD_HEIGHT as usize)
            .filter(|&y| self.is_row_full(y))
            .collect();

        for &y in &full {
            self.clear_row(y);
        }

        full.len() as u32
    }

    /// Remove row `y` and shift all rows above it down by one
    fn clear_row(&mut self, y: usize) {
        let width = BOARD_WIDTH as usize;

        // copy_within handles the overlapping ranges
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            self.cells
                .copy_within(src_start..src_start + width, row * width);
        }

        for cell in &mut self.cells[..width] {
            *cell = None;
        }
    }

    /// Award line-clear points and advance level progress; returns the points added
    ///
    /// A level-up resets the progress counter to 0, so a single clear past the
    /// threshold still advances exactly one level.
    pub fn update_score(&mut self, lines_cleared: u32) -> u32 {
        let points = line_clear_points(lines_cleared, self.level);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(lines_cleared);
        self.level_lines = self.level_lines.saturating_add(lines_cleared);

        if self.level_lines >= LINES_PER_LEVEL {
            self.level = self.level.saturating_add(1);
            self.level_lines = 0;
            info!(level = self.level, "level up");
        }

        points
    }

    /// Add non line-clear points (soft drop)
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Starting level chosen by the host; does not touch level progress
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    /// Lines counted toward the next level
    pub fn level_progress(&self) -> u32 {
        self.level_lines
    }

    /// Total lines cleared
    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Get a reference to the internal cells array (row-major)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Export the grid as kind tags (0 = empty), rows top to bottom
    pub fn write_tag_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            for (x, tag) in row.iter_mut().enumerate() {
                *tag = self.cells[y * width + x].map_or(0, |kind| kind.tag());
            }
        }
    }

    /// Number of non-empty cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Empty the grid and reset score and level
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn fill_row(board: &mut Board, y: i8) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Some(PieceKind::I));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_valid_position_rejects_walls_floor_and_stack() {
        let mut board = Board::new();
        let piece = Piece::new(PieceKind::O);
        // O occupies box columns 2..=3, rows 2..=3.
        assert!(board.is_valid_position(piece, -2, -2));
        assert!(!board.is_valid_position(piece, -3, 0));
        assert!(board.is_valid_position(piece, 6, 0));
        assert!(!board.is_valid_position(piece, 7, 0));
        assert!(board.is_valid_position(piece, 0, 16));
        assert!(!board.is_valid_position(piece, 0, 17));

        board.set(3, 5, Some(PieceKind::T));
        assert!(!board.is_valid_position(piece, 0, 2));
        assert!(board.is_valid_position(piece, 0, 4));
    }

    #[test]
    fn test_valid_position_far_outside_i8_range() {
        let board = Board::new();
        for kind in PieceKind::ALL {
            let piece = Piece::new(kind);
            for (x, y) in [(126, 0), (i8::MAX, i8::MAX), (i8::MIN, 0), (0, i8::MIN), (0, 125)] {
                assert!(!board.is_valid_position(piece, x, y), "{kind:?} at ({x}, {y})");
            }
        }
        assert_eq!(board.find_drop_position(Piece::new(PieceKind::O), 0, i8::MAX), i8::MAX);
    }

    #[test]
    fn test_find_drop_position_on_empty_board() {
        let board = Board::new();
        let piece = Piece::new(PieceKind::I);
        // Vertical I fills box rows 1..=4, so the box rests at y = 15.
        let y = board.find_drop_position(piece, 3, 0);
        assert_eq!(y, 15);
        assert!(board.is_valid_position(piece, 3, y));
        assert!(!board.is_valid_position(piece, 3, y + 1));
    }

    #[test]
    fn test_clear_non_adjacent_rows_preserves_order() {
        let mut board = Board::new();
        fill_row(&mut board, 19);
        fill_row(&mut board, 17);
        board.set(0, 18, Some(PieceKind::S));
        board.set(4, 16, Some(PieceKind::Z));
        board.set(9, 10, Some(PieceKind::J));

        assert_eq!(board.clear_full_lines(), 2);

        assert_eq!(board.get(0, 19), Some(Some(PieceKind::S)));
        assert_eq!(board.get(4, 18), Some(Some(PieceKind::Z)));
        assert_eq!(board.get(9, 12), Some(Some(PieceKind::J)));
        assert_eq!(board.filled_count(), 3);
    }

    #[test]
    fn test_update_score_table() {
        let mut board = Board::new();
        assert_eq!(board.update_score(0), 0);
        assert_eq!(board.update_score(1), 40);
        assert_eq!(board.update_score(2), 100);
        assert_eq!(board.update_score(3), 300);
        // 6 lines so far; the tetris pushes progress to 10 after scoring at level 0.
        assert_eq!(board.update_score(4), 1200);
        assert_eq!(board.level(), 1);
        assert_eq!(board.level_progress(), 0);
        assert_eq!(board.update_score(1), 80);
        assert_eq!(board.score(), 40 + 100 + 300 + 1200 + 80);
    }

    #[test]
    fn test_big_clear_advances_single_level() {
        let mut board = Board::new();
        board.update_score(9);
        board.update_score(4);
        assert_eq!(board.level(), 1);
        assert_eq!(board.level_progress(), 0);
        assert_eq!(board.lines(), 13);
    }

    #[test]
    fn test_level_saturates_at_max() {
        let mut board = Board::new();
        board.set_level(u32::MAX);
        for _ in 0..4 {
            assert_eq!(board.update_score(4), u32::MAX);
        }
        assert_eq!(board.level(), u32::MAX);
        assert_eq!(board.score(), u32::MAX);
        assert_eq!(board.lines(), 16);
    }

    #[test]
    fn test_place_piece_reports_clear() {
        let mut board = Board::new();
        for x in 0..BOARD_WIDTH as i8 {
            if x != 4 {
                board.set(x, 19, Some(PieceKind::L));
            }
        }
        // Spawn-orientation I is vertical in box column 2.
        let piece = Piece::new(PieceKind::I);
        let y = board.find_drop_position(piece, 2, 0);
        let placement = board.place_piece(piece, 2, y);
        assert_eq!(placement.lines_cleared, 1);
        assert_eq!(placement.points, 40);
        assert_eq!(placement.level_up, None);
        assert_eq!(board.filled_count(), 3);
    }

    #[test]
    fn test_write_tag_grid() {
        let mut board = Board::new();
        board.set(2, 3, Some(PieceKind::T));
        let mut grid = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        board.write_tag_grid(&mut grid);
        assert_eq!(grid[3][2], PieceKind::T.tag());
        assert_eq!(grid.iter().flatten().filter(|&&t| t != 0).count(), 1);
    }
}
