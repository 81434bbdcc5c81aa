//! Parts: a player's staves and instrument timeline

use super::instrument::Instrument;
use super::staff::Staff;
use super::timeline::{InstrumentTimeline, TickEnd};
use super::Tick;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    pub staves: Vec<Staff>,
    pub instruments: InstrumentTimeline,
}

impl Part {
    /// A part with `n_staves` staves whose initial clefs come from `instrument`
    pub fn new(id: impl Into<String>, instrument: Instrument, n_staves: usize) -> Self {
        let staves = (0..n_staves)
            .map(|idx| Staff::new(instrument.clef_type(idx)))
            .collect();
        Self {
            id: id.into(),
            staves,
            instruments: InstrumentTimeline::new(instrument),
        }
    }

    pub fn n_staves(&self) -> usize {
        self.staves.len()
    }

    pub fn staff(&self, idx: usize) -> Option<&Staff> {
        self.staves.get(idx)
    }

    pub fn staff_mut(&mut self, idx: usize) -> Option<&mut Staff> {
        self.staves.get_mut(idx)
    }

    pub fn instrument_at(&self, tick: Tick) -> &Instrument {
        self.instruments.instrument_at(tick)
    }

    pub fn instrument_before(&self, tick: Tick) -> &Instrument {
        self.instruments.instrument_before(tick)
    }

    pub fn next_change_after(&self, tick: Tick) -> TickEnd {
        self.instruments.next_change_after(tick)
    }

    pub fn set_instrument(&mut self, tick: Tick, instrument: Instrument) -> Option<Instrument> {
        self.instruments.set_instrument(tick, instrument)
    }

    pub fn remove_instrument(&mut self, tick: Tick) -> Option<Instrument> {
        self.instruments.remove_instrument(tick)
    }
}
