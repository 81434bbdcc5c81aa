//! Per-part instrument timeline
//!
//! Maps ticks to the instrument that becomes active there. Each entry holds
//! until the next one; the part's base instrument covers everything before
//! the first entry.

use super::instrument::Instrument;
use super::Tick;
use crate::transposition::Interval;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

/// End of a half-open tick range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickEnd {
    At(Tick),
    /// Runs to the end of the score
    Open,
}

impl TickEnd {
    /// True when `tick` lies before this end
    pub fn is_after(&self, tick: Tick) -> bool {
        match self {
            TickEnd::At(end) => tick < *end,
            TickEnd::Open => true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentTimeline {
    base: Instrument,
    changes: BTreeMap<Tick, Instrument>,
}

impl InstrumentTimeline {
    pub fn new(base: Instrument) -> Self {
        Self {
            base,
            changes: BTreeMap::new(),
        }
    }

    /// The part's instrument before any change
    pub fn base(&self) -> &Instrument {
        &self.base
    }

    /// Instrument active at `tick` (entry at or before it)
    pub fn instrument_at(&self, tick: Tick) -> &Instrument {
        self.changes
            .range(..=tick)
            .next_back()
            .map(|(_, instrument)| instrument)
            .unwrap_or(&self.base)
    }

    /// Instrument active just before `tick`, ignoring an entry exactly at it
    pub fn instrument_before(&self, tick: Tick) -> &Instrument {
        self.changes
            .range(..tick)
            .next_back()
            .map(|(_, instrument)| instrument)
            .unwrap_or(&self.base)
    }

    /// Tick of the first entry strictly after `tick`
    pub fn next_change_after(&self, tick: Tick) -> TickEnd {
        self.changes
            .range((Excluded(tick), Unbounded))
            .next()
            .map(|(next, _)| TickEnd::At(*next))
            .unwrap_or(TickEnd::Open)
    }

    pub fn transpose_at(&self, tick: Tick) -> Interval {
        self.instrument_at(tick).transpose()
    }

    /// Record `instrument` as active from `tick`, returning any entry it replaces
    pub fn set_instrument(&mut self, tick: Tick, instrument: Instrument) -> Option<Instrument> {
        self.changes.insert(tick, instrument)
    }

    pub fn remove_instrument(&mut self, tick: Tick) -> Option<Instrument> {
        self.changes.remove(&tick)
    }

    /// Ordered (tick, instrument) entries, excluding the base instrument
    pub fn changes(&self) -> impl Iterator<Item = (Tick, &Instrument)> {
        self.changes.iter().map(|(tick, instrument)| (*tick, instrument))
    }

    /// Ordered (tick, transposition) entries, excluding the base instrument
    pub fn transpositions(&self) -> impl Iterator<Item = (Tick, Interval)> + '_ {
        self.changes().map(|(tick, instrument)| (tick, instrument.transpose()))
    }
}
