//! Game state module - the playing session
//!
//! Ties together the board, the piece catalog and the sequencer. It owns the
//! active piece and its position, runs gravity from elapsed time, applies
//! player actions and detects game over.
//!
//! A session is either playing or over. Pause is the host not calling
//! [`GameState::update`]; the session itself has no pause state.

use arrayvec::ArrayVec;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

use crate::board::Board;
use crate::pieces::{try_rotate, Piece};
use crate::rng::PieceSequencer;
use crate::scoring::{drop_delay_ms, soft_drop_points};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{
    GameAction, GameEvent, PieceKind, Rotation, NEXT_QUEUE_LEN, SPAWN_X, SPAWN_Y,
};

/// Events kept between drains; the oldest is dropped when full
const EVENT_CAPACITY: usize = 32;

/// Session settings chosen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// Piece stream seed; `None` seeds from the operating system
    pub seed: Option<u64>,
    /// Level the board starts at
    pub start_level: u32,
}

/// Whether the session still accepts input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
}

/// Active falling piece and the position of its shape box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub piece: Piece,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Place `piece` at the spawn point
    ///
    /// Only the position is reset. Queue pieces arrive in spawn orientation; a
    /// piece coming back from hold keeps the rotation it was held at.
    pub fn spawn(piece: Piece) -> Self {
        Self {
            piece,
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.piece.kind
    }

    pub fn rotation(&self) -> Rotation {
        self.piece.rotation
    }

    fn shifted(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Check if all minos are at valid positions on the board
    pub fn is_valid(&self, board: &Board) -> bool {
        board.is_valid_position(self.piece, self.x, self.y)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState<R = StdRng> {
    config: SessionConfig,
    board: Board,
    sequencer: PieceSequencer<R>,
    active: Tetromino,
    phase: Phase,
    /// Time accumulated from `update` calls
    clock_ms: u64,
    /// Clock value at the last gravity step
    last_gravity_ms: u64,
    events: ArrayVec<GameEvent, EVENT_CAPACITY>,
}

impl GameState<StdRng> {
    /// Start a new session and spawn the first piece
    pub fn new(config: SessionConfig) -> Self {
        let sequencer = match config.seed {
            Some(seed) => PieceSequencer::new(seed),
            None => PieceSequencer::from_entropy(),
        };
        Self::from_parts(config, Board::new(), sequencer)
    }
}

impl<R: Rng> GameState<R> {
    /// Start a session from an existing board and sequencer
    ///
    /// The board's level is set to `config.start_level` and the first piece is
    /// spawned immediately, so a blocked spawn point yields a session that is
    /// already over.
    pub fn from_parts(
        config: SessionConfig,
        mut board: Board,
        mut sequencer: PieceSequencer<R>,
    ) -> Self {
        board.set_level(config.start_level);
        let first = sequencer.spawn_next();

        let mut state = Self {
            config,
            board,
            sequencer,
            active: Tetromino::spawn(first),
            phase: Phase::Playing,
            clock_ms: 0,
            last_gravity_ms: 0,
            events: ArrayVec::new(),
        };
        state.enter_spawn(first);
        state
    }

    /// Throw away the current game and start over with the same config
    ///
    /// The sequencer keeps its random stream, so a restarted game gets new pieces.
    pub fn restart(&mut self) {
        self.board.clear();
        self.board.set_level(self.config.start_level);
        self.sequencer.reset();
        self.phase = Phase::Playing;
        self.clock_ms = 0;
        self.last_gravity_ms = 0;
        self.events.clear();

        let first = self.sequencer.spawn_next();
        self.enter_spawn(first);
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    pub fn level(&self) -> u32 {
        self.board.level()
    }

    pub fn lines(&self) -> u32 {
        self.board.lines()
    }

    /// Current piece; after game over this is the piece that could not spawn
    pub fn active(&self) -> Tetromino {
        self.active
    }

    pub fn held(&self) -> Option<Piece> {
        self.sequencer.held()
    }

    pub fn can_hold(&self) -> bool {
        self.sequencer.can_hold()
    }

    pub fn next_queue(&self) -> &[PieceKind; NEXT_QUEUE_LEN] {
        self.sequencer.queue()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Gravity delay at the current level
    pub fn drop_delay_ms(&self) -> u32 {
        drop_delay_ms(self.board.level())
    }

    /// Row the active piece would land on (ghost preview)
    pub fn ghost_y(&self) -> i8 {
        self.board
            .find_drop_position(self.active.piece, self.active.x, self.active.y)
    }

    /// Take every event emitted since the last drain, oldest first
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_tag_grid(&mut out.board);
        out.active = ActiveSnapshot::from(self.active);
        out.ghost_y = self.ghost_y();
        out.hold = self.sequencer.held().map(|p| p.kind);
        out.next_queue = *self.sequencer.queue();
        out.can_hold = self.sequencer.can_hold();
        out.score = self.board.score();
        out.level = self.board.level();
        out.lines = self.board.lines();
        out.drop_delay_ms = self.drop_delay_ms();
        out.game_over = self.is_game_over();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Advance the session clock by `elapsed_ms`
    ///
    /// Gravity fires once when more than the level's drop delay has passed since
    /// the last gravity step. Returns true if gravity fired.
    pub fn update(&mut self, elapsed_ms: u32) -> bool {
        if self.is_game_over() {
            return false;
        }

        self.clock_ms += u64::from(elapsed_ms);
        if self.clock_ms - self.last_gravity_ms <= u64::from(self.drop_delay_ms()) {
            return false;
        }

        self.last_gravity_ms = self.clock_ms;
        if !self.try_move(0, 1) {
            self.settle();
        }
        true
    }

    /// Apply a player action; returns whether anything changed
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::Rotate => self.rotate(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Hold => self.hold(),
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// Move down one row, scoring one point if the piece moved
    ///
    /// A blocked soft drop does not settle the piece; gravity does that.
    pub fn soft_drop(&mut self) -> bool {
        let moved = self.try_move(0, 1);
        if moved {
            self.board.add_score(soft_drop_points(1));
        }
        moved
    }

    /// Rotate one quarter turn, trying wall kicks if the turn is blocked in place
    ///
    /// All or nothing: on failure the piece is left exactly as it was.
    pub fn rotate(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }

        let active = self.active;
        let board = &self.board;
        let Some((rotated, (dx, dy))) = try_rotate(active.piece, active.x, active.y, |p, x, y| {
            board.is_valid_position(p, x, y)
        }) else {
            return false;
        };

        self.active = Tetromino {
            piece: rotated,
            ..active.shifted(dx, dy)
        };
        self.push_event(GameEvent::PieceRotated);
        true
    }

    /// Drop to the resting row and settle immediately
    pub fn hard_drop(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }

        let active = self.active;
        let drop_y = self.ghost_y();
        if !self.board.is_valid_position(active.piece, active.x, drop_y) {
            return false;
        }

        self.active.y = drop_y;
        self.settle();
        true
    }

    /// Swap with the hold slot
    ///
    /// The piece that becomes active is moved to the spawn point without
    /// changing its rotation.
    pub fn hold(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }

        let kind = self.active.kind();
        let Some(next) = self.sequencer.hold_swap(self.active.piece).next() else {
            return false;
        };

        self.push_event(GameEvent::PieceHeld { kind });
        self.enter_spawn(next);
        true
    }

    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if self.is_game_over() {
            return false;
        }

        let moved = self.active.shifted(dx, dy);
        if !moved.is_valid(&self.board) {
            return false;
        }
        self.active = moved;
        true
    }

    /// Write the active piece into the board and bring in the next one
    fn settle(&mut self) {
        let active = self.active;
        let placement = self.board.place_piece(active.piece, active.x, active.y);

        self.push_event(GameEvent::PiecePlaced {
            kind: active.kind(),
            lines_cleared: placement.lines_cleared,
        });
        if placement.lines_cleared > 0 {
            self.push_event(GameEvent::LinesCleared {
                count: placement.lines_cleared,
                points: placement.points,
            });
        }
        if let Some(level) = placement.level_up {
            self.push_event(GameEvent::LevelUp { level });
        }

        let next = self.sequencer.spawn_next();
        self.enter_spawn(next);
    }

    /// Make `piece` active at the spawn point; game over if it does not fit
    fn enter_spawn(&mut self, piece: Piece) {
        self.active = Tetromino::spawn(piece);

        if !self.active.is_valid(&self.board) {
            self.phase = Phase::GameOver;
            self.push_event(GameEvent::GameOver);
            info!(score = self.board.score(), level = self.board.level(), "game over");
            return;
        }

        debug!(kind = ?piece.kind, next = ?self.sequencer.peek(), "spawned");
    }

    fn push_event(&mut self, event: GameEvent) {
        if self.events.is_full() {
            self.events.remove(0);
        }
        self.events.push(event);
    }
}

impl Default for GameState<StdRng> {
    fn default() -> Self {
        Self::new(SessionConfig {
            seed: Some(1),
            ..SessionConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};
    use rand::SeedableRng;

    fn session_with_queue(board: Board, queue: [PieceKind; NEXT_QUEUE_LEN]) -> GameState {
        let sequencer = PieceSequencer::with_queue(StdRng::seed_from_u64(42), queue);
        GameState::from_parts(SessionConfig::default(), board, sequencer)
    }

    fn events(state: &mut GameState) -> Vec<GameEvent> {
        state.drain_events().collect()
    }

    #[test]
    fn test_new_session_spawns_first_piece() {
        let state = session_with_queue(
            Board::new(),
            [PieceKind::T, PieceKind::O, PieceKind::S, PieceKind::Z],
        );
        let active = state.active();
        assert_eq!(active.kind(), PieceKind::T);
        assert_eq!((active.x, active.y), (SPAWN_X, SPAWN_Y));
        assert_eq!(active.rotation(), Rotation::SPAWN);
        assert_eq!(state.next_queue()[..3], [PieceKind::O, PieceKind::S, PieceKind::Z]);
        assert!(!state.is_game_over());
        assert_eq!(state.phase(), Phase::Playing);
    }

    #[test]
    fn test_gravity_waits_for_drop_delay() {
        let mut state = GameState::default();
        let y0 = state.active().y;

        // Strictly greater than the delay is required.
        assert!(!state.update(768));
        assert_eq!(state.active().y, y0);
        assert!(state.update(1));
        assert_eq!(state.active().y, y0 + 1);

        // Clock restarts from the last gravity step.
        assert!(!state.update(700));
        assert!(state.update(69));
        assert_eq!(state.active().y, y0 + 2);
    }

    #[test]
    fn test_gravity_fires_once_per_update() {
        let mut state = GameState::default();
        let y0 = state.active().y;
        assert!(state.update(10_000));
        assert_eq!(state.active().y, y0 + 1);
    }

    #[test]
    fn test_gravity_settles_grounded_piece() {
        let mut state = session_with_queue(
            Board::new(),
            [PieceKind::O, PieceKind::T, PieceKind::T, PieceKind::T],
        );
        while state.active().y < state.ghost_y() {
            state.soft_drop();
        }
        events(&mut state);

        assert!(state.update(769));
        assert_eq!(state.board().filled_count(), 4);
        assert_eq!(state.active().kind(), PieceKind::T);
        assert_eq!(state.active().y, SPAWN_Y);
        assert_eq!(
            events(&mut state),
            vec![GameEvent::PiecePlaced {
                kind: PieceKind::O,
                lines_cleared: 0
            }]
        );
    }

    #[test]
    fn test_moves_stop_at_walls() {
        let mut state = session_with_queue(
            Board::new(),
            [PieceKind::O, PieceKind::O, PieceKind::O, PieceKind::O],
        );
        // O covers box columns 2..=3: x may range over -2..=6.
        let mut lefts = 0;
        while state.move_left() {
            lefts += 1;
        }
        assert_eq!(lefts, 5);
        assert_eq!(state.active().x, -2);

        let mut rights = 0;
        while state.move_right() {
            rights += 1;
        }
        assert_eq!(rights, 8);
        assert_eq!(state.active().x, 6);
    }

    #[test]
    fn test_soft_drop_scores_only_when_moving() {
        let mut state = session_with_queue(
            Board::new(),
            [PieceKind::O, PieceKind::O, PieceKind::O, PieceKind::O],
        );
        let mut rows = 0;
        while state.soft_drop() {
            rows += 1;
        }
        assert_eq!(rows, 16);
        assert_eq!(state.score(), 16);
        assert!(!state.soft_drop());
        assert_eq!(state.score(), 16);
        assert_eq!(state.board().filled_count(), 0);
    }

    #[test]
    fn test_hard_drop_settles_and_spawns() {
        let mut state = session_with_queue(
            Board::new(),
            [PieceKind::I, PieceKind::J, PieceKind::L, PieceKind::S],
        );
        assert!(state.hard_drop());
        // Vertical I in box column 2 at spawn column 3.
        for y in 16..20 {
            assert_eq!(state.board().get(5, y), Some(Some(PieceKind::I)));
        }
        assert_eq!(state.score(), 0);
        assert_eq!(state.active().kind(), PieceKind::J);
        assert!(state.can_hold());
    }

    #[test]
    fn test_rotate_in_open_space() {
        let mut state = session_with_queue(
            Board::new(),
            [PieceKind::T, PieceKind::O, PieceKind::O, PieceKind::O],
        );
        let before = state.active();
        assert!(state.rotate());
        let after = state.active();
        assert_eq!(after.rotation(), Rotation::new(1));
        assert_eq!((after.x, after.y), (before.x, before.y));
        assert_eq!(events(&mut state), vec![GameEvent::PieceRotated]);
    }

    #[test]
    fn test_rotate_kicks_off_right_wall() {
        let mut state = session_with_queue(
            Board::new(),
            [PieceKind::I, PieceKind::O, PieceKind::O, PieceKind::O],
        );
        // Vertical I in box column 2; push it to the right wall (x = 7).
        while state.move_right() {}
        assert_eq!(state.active().x, 7);

        // Horizontal I needs box columns 1..=4, i.e. x + 4 <= 9.
        assert!(state.rotate());
        let active = state.active();
        assert_eq!(active.rotation(), Rotation::new(1));
        assert_eq!(active.x, 5);
        assert_eq!(active.y, 0);
    }

    #[test]
    fn test_blocked_rotation_leaves_piece_unchanged() {
        let mut board = Board::new();
        // Wall off everything except the vertical I's own column at spawn.
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                if x != 5 {
                    board.set(x, y, Some(PieceKind::Z));
                }
            }
        }
        let mut state = session_with_queue(
            board,
            [PieceKind::I, PieceKind::O, PieceKind::O, PieceKind::O],
        );
        assert!(!state.is_game_over());
        let before = state.active();
        assert!(!state.rotate());
        assert_eq!(state.active(), before);
        assert!(events(&mut state).is_empty());
    }

    #[test]
    fn test_hold_then_swap_back() {
        let mut state = session_with_queue(
            Board::new(),
            [PieceKind::T, PieceKind::S, PieceKind::Z, PieceKind::J],
        );
        state.rotate();
        let turned = Piece::new(PieceKind::T).rotated();

        assert!(state.hold());
        assert_eq!(state.held(), Some(turned));
        assert_eq!(state.active().kind(), PieceKind::S);
        assert!(!state.can_hold());

        // Second hold before a spawn does nothing.
        let before = state.active();
        assert!(!state.hold());
        assert_eq!(state.active(), before);

        state.hard_drop();
        assert!(state.can_hold());
        assert_eq!(state.active().kind(), PieceKind::Z);

        assert!(state.hold());
        let active = state.active();
        assert_eq!(active.piece, turned);
        assert_eq!((active.x, active.y), (SPAWN_X, SPAWN_Y));
        assert_eq!(state.held(), Some(Piece::new(PieceKind::Z)));
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let mut board = Board::new();
        for y in 0..4 {
            for x in 0..BOARD_WIDTH as i8 {
                board.set(x, y, Some(PieceKind::L));
            }
        }
        let mut state = session_with_queue(
            board.clone(),
            [PieceKind::O, PieceKind::O, PieceKind::O, PieceKind::O],
        );
        assert!(state.is_game_over());
        assert_eq!(events(&mut state), vec![GameEvent::GameOver]);

        let snapshot = state.snapshot();
        assert!(!state.update(100_000));
        assert!(!state.apply_action(GameAction::HardDrop));
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.apply_action(GameAction::Hold));
        assert!(!state.apply_action(GameAction::Rotate));
        assert_eq!(state.snapshot(), snapshot);
        assert_eq!(state.board(), &board);
        assert!(events(&mut state).is_empty());
    }

    #[test]
    fn test_restart_resets_board_and_score() {
        let mut state = GameState::new(SessionConfig {
            seed: Some(8),
            start_level: 3,
        });
        assert_eq!(state.level(), 3);
        state.hard_drop();
        state.soft_drop();
        state.restart();

        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 3);
        assert_eq!(state.board().filled_count(), 0);
        assert!(state.held().is_none());
        assert!(!state.is_game_over());
        assert!(events(&mut state).is_empty());
    }

    #[test]
    fn test_event_buffer_drops_oldest_when_full() {
        let mut state = session_with_queue(
            Board::new(),
            [PieceKind::T, PieceKind::O, PieceKind::O, PieceKind::O],
        );
        for _ in 0..EVENT_CAPACITY + 3 {
            state.rotate();
        }
        assert_eq!(events(&mut state).len(), EVENT_CAPACITY);
    }
}
