//! Score-wide transposition change notifications

use crate::models::{ScoreId, Tick, TickEnd};
use crate::transposition::Interval;
use serde::{Deserialize, Serialize};

/// The transposition active over `[tick_start, tick_end)` of a part changed
///
/// `old_interval` is the transposition that was in effect before, so that
/// downstream respelling can undo it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranspositionChange {
    pub score: ScoreId,
    pub part: usize,
    pub old_interval: Interval,
    pub tick_start: Tick,
    pub tick_end: TickEnd,
}

/// Receives transposition change broadcasts
pub trait TranspositionNotifier {
    fn transposition_changed(&mut self, change: TranspositionChange);
}

impl TranspositionNotifier for Vec<TranspositionChange> {
    fn transposition_changed(&mut self, change: TranspositionChange) {
        self.push(change);
    }
}
