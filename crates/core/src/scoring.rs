//! Scoring module - line-clear points and level-dependent drop delay
//!
//! Both curves are classic arcade lookup tables and are kept as tables rather
//! than approximated by a formula.

use crate::types::{DROP_FRAMES, DROP_FRAMES_BANDS, FRAME_MS, LINE_SCORES};

/// Points for clearing `lines` rows at once at `level` (0-based)
///
/// Clears of more than four rows score as four.
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    let base = LINE_SCORES[(lines as usize).min(LINE_SCORES.len() - 1)];
    base.saturating_mul(level.saturating_add(1))
}

/// Points for a soft drop of `rows` rows
pub fn soft_drop_points(rows: u32) -> u32 {
    rows
}

/// Gravity delay for `level`, in frames
pub fn drop_delay_frames(level: u32) -> u32 {
    if let Some(&frames) = DROP_FRAMES.get(level as usize) {
        return frames;
    }
    DROP_FRAMES_BANDS
        .iter()
        .find(|&&(last_level, _)| level <= last_level)
        .map_or(1, |&(_, frames)| frames)
}

/// Gravity delay for `level`, in internal time units
pub fn drop_delay_ms(level: u32) -> u32 {
    drop_delay_frames(level) * FRAME_MS
}
