//! RNG module - uniform piece generation, next queue and hold slot
//!
//! Every queue slot is an independent uniform draw over the seven kinds. There
//! is no bag: long droughts of a kind are possible and expected.
//!
//! The sequencer is generic over any [`rand::Rng`]. [`PieceSequencer::new`]
//! seeds a [`StdRng`] so that a seed always reproduces the same piece stream.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::pieces::Piece;
use crate::types::{PieceKind, NEXT_QUEUE_LEN};

/// What a hold request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// Hold already used since the last spawn; nothing changed
    Ignored,
    /// Hold slot was empty: the active piece was stored and `next` drawn from the queue
    Stored { next: Piece },
    /// The held piece came back as `next` and the active piece took its place
    Swapped { next: Piece },
}

impl HoldOutcome {
    /// The piece that becomes active, if any
    pub fn next(self) -> Option<Piece> {
        match self {
            HoldOutcome::Ignored => None,
            HoldOutcome::Stored { next } | HoldOutcome::Swapped { next } => Some(next),
        }
    }
}

/// Next-piece queue plus hold slot
#[derive(Debug, Clone)]
pub struct PieceSequencer<R = StdRng> {
    /// Upcoming pieces, oldest first
    queue: [PieceKind; NEXT_QUEUE_LEN],
    held: Option<Piece>,
    can_hold: bool,
    rng: R,
}

impl PieceSequencer<StdRng> {
    /// Create a sequencer whose piece stream is fixed by `seed`
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Create a sequencer seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<R: Rng> PieceSequencer<R> {
    /// Create a sequencer over `rng` with a freshly drawn queue
    pub fn with_rng(rng: R) -> Self {
        let mut sequencer = Self {
            queue: [PieceKind::I; NEXT_QUEUE_LEN],
            held: None,
            can_hold: true,
            rng,
        };
        sequencer.initialize();
        sequencer
    }

    /// Create a sequencer with a known starting queue; later draws come from `rng`
    pub fn with_queue(rng: R, queue: [PieceKind; NEXT_QUEUE_LEN]) -> Self {
        Self {
            queue,
            held: None,
            can_hold: true,
            rng,
        }
    }

    /// Fill every queue slot with an independent uniform draw
    pub fn initialize(&mut self) {
        for i in 0..NEXT_QUEUE_LEN {
            self.queue[i] = self.draw();
        }
    }

    /// Refill the queue and empty the hold slot, for a new game
    pub fn reset(&mut self) {
        self.initialize();
        self.held = None;
        self.can_hold = true;
    }

    fn draw(&mut self) -> PieceKind {
        PieceKind::from_index(self.rng.random_range(0..PieceKind::ALL.len()))
    }

    /// Take the front of the queue as the new active piece
    ///
    /// The remaining entries move forward, a fresh draw is appended at the back
    /// and hold becomes available again.
    pub fn spawn_next(&mut self) -> Piece {
        let kind = self.queue[0];
        self.queue.rotate_left(1);
        self.queue[NEXT_QUEUE_LEN - 1] = self.draw();
        self.can_hold = true;
        Piece::new(kind)
    }

    /// Put `active` in the hold slot
    ///
    /// Ignored if hold was already used since the last spawn. With an empty
    /// slot the next piece comes from the queue; otherwise the held piece comes
    /// back with the rotation it was held at. Either way hold is unavailable
    /// until the next spawn.
    pub fn hold_swap(&mut self, active: Piece) -> HoldOutcome {
        if !self.can_hold {
            return HoldOutcome::Ignored;
        }

        let outcome = match self.held.replace(active) {
            None => HoldOutcome::Stored {
                next: self.spawn_next(),
            },
            Some(previous) => HoldOutcome::Swapped { next: previous },
        };

        self.can_hold = false;
        debug!(held = ?active.kind, ?outcome, "hold");
        outcome
    }

    pub fn queue(&self) -> &[PieceKind; NEXT_QUEUE_LEN] {
        &self.queue
    }

    /// Front of the queue (the next piece to spawn)
    pub fn peek(&self) -> PieceKind {
        self.queue[0]
    }

    pub fn held(&self) -> Option<Piece> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }
}

impl Default for PieceSequencer<StdRng> {
    fn default() -> Self {
        Self::new(1)
    }
}
