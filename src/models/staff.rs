//! Staves: key and clef maps

use super::clef::{ClefType, StaffClef};
use super::key_sig::{Key, KeySigEvent};
use super::Tick;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Addresses a staff as (part index, staff index within the part)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaffId {
    pub part: usize,
    pub staff: usize,
}

impl StaffId {
    pub fn new(part: usize, staff: usize) -> Self {
        Self { part, staff }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    /// Clef in effect before any clef change
    pub initial_clef: StaffClef,
    key_sigs: BTreeMap<Tick, KeySigEvent>,
    clefs: BTreeMap<Tick, ClefType>,
}

impl Staff {
    pub fn new(initial_clef: StaffClef) -> Self {
        Self {
            initial_clef,
            ..Default::default()
        }
    }

    /// Key signature in effect at `tick`
    ///
    /// A staff with no key signature at or before `tick` is in C.
    pub fn key_sig_event(&self, tick: Tick) -> KeySigEvent {
        self.key_sigs
            .range(..=tick)
            .next_back()
            .map(|(_, event)| *event)
            .unwrap_or_default()
    }

    pub fn key(&self, tick: Tick) -> Key {
        self.key_sig_event(tick).key
    }

    /// Key signature starting exactly at `tick`, if any
    pub fn key_sig_at(&self, tick: Tick) -> Option<&KeySigEvent> {
        self.key_sigs.get(&tick)
    }

    pub fn set_key(&mut self, tick: Tick, event: KeySigEvent) -> Option<KeySigEvent> {
        self.key_sigs.insert(tick, event)
    }

    pub fn remove_key(&mut self, tick: Tick) -> Option<KeySigEvent> {
        self.key_sigs.remove(&tick)
    }

    /// Clef shown at `tick` in the given display mode
    pub fn clef(&self, tick: Tick, concert_pitch: bool) -> ClefType {
        self.clefs
            .range(..=tick)
            .next_back()
            .map(|(_, clef)| *clef)
            .unwrap_or_else(|| self.initial_clef.for_mode(concert_pitch))
    }

    pub fn set_clef(&mut self, tick: Tick, clef: ClefType) -> Option<ClefType> {
        self.clefs.insert(tick, clef)
    }

    pub fn remove_clef(&mut self, tick: Tick) -> Option<ClefType> {
        self.clefs.remove(&tick)
    }
}
