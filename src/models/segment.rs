//! Measures, segments and the graphical clef/key elements they hold

use super::clef::ClefType;
use super::key_sig::KeySigEvent;
use super::staff::StaffId;
use super::Tick;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub tick: Tick,
    /// Length in ticks
    pub ticks: Tick,
}

impl Measure {
    pub fn end_tick(&self) -> Tick {
        self.tick + self.ticks
    }

    pub fn contains(&self, tick: Tick) -> bool {
        tick >= self.tick && tick < self.end_tick()
    }
}

/// Segment kinds, in the order they appear at one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SegmentType {
    Clef,
    KeySig,
    ChordRest,
}

/// Position of a segment: ordered by tick, then by segment type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentKey {
    pub tick: Tick,
    pub segment_type: SegmentType,
}

impl SegmentKey {
    pub fn new(tick: Tick, segment_type: SegmentType) -> Self {
        Self { tick, segment_type }
    }
}

/// A clef drawn on a staff
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clef {
    pub staff: StaffId,
    pub tick: Tick,
    pub clef_type: ClefType,
    pub for_instrument_change: bool,
    /// Placed at the end of the previous measure, ahead of the barline
    pub before_barline: bool,
    /// User clef a generated clef was placed over
    #[serde(default)]
    pub replaced: Option<UserClef>,
}

/// The parts of a user clef needed to put it back
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClef {
    pub clef_type: ClefType,
    pub before_barline: bool,
}

impl Clef {
    /// The user clef underneath this one, if any
    ///
    /// A user clef is its own answer; a generated clef answers with the user
    /// clef it replaced.
    pub fn user_clef(&self) -> Option<UserClef> {
        if self.for_instrument_change {
            self.replaced
        } else {
            Some(UserClef { clef_type: self.clef_type, before_barline: self.before_barline })
        }
    }

    /// What to put back at this position when a generated clef is removed
    pub fn restored(&self) -> Option<Clef> {
        self.user_clef().map(|user| Clef {
            staff: self.staff,
            tick: self.tick,
            clef_type: user.clef_type,
            for_instrument_change: false,
            before_barline: user.before_barline,
            replaced: None,
        })
    }
}

/// A key signature drawn on a staff
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySig {
    pub staff: StaffId,
    pub tick: Tick,
    pub event: KeySigEvent,
    /// User key signature a generated one was placed over
    #[serde(default)]
    pub replaced: Option<KeySigEvent>,
}

impl KeySig {
    pub fn new(staff: StaffId, tick: Tick, event: KeySigEvent) -> Self {
        Self { staff, tick, event, replaced: None }
    }

    pub fn for_instrument_change(&self) -> bool {
        self.event.for_instrument_change
    }

    pub fn user_event(&self) -> Option<KeySigEvent> {
        if self.for_instrument_change() {
            self.replaced
        } else {
            Some(self.event)
        }
    }

    /// What to put back at this position when a generated key signature is removed
    pub fn restored(&self) -> Option<KeySig> {
        self.user_event().map(|event| KeySig::new(self.staff, self.tick, event))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentElement {
    Clef(Clef),
    KeySig(KeySig),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub key: SegmentKey,
    elements: BTreeMap<StaffId, SegmentElement>,
}

impl Segment {
    pub fn new(key: SegmentKey) -> Self {
        Self {
            key,
            elements: BTreeMap::new(),
        }
    }

    pub fn tick(&self) -> Tick {
        self.key.tick
    }

    pub fn segment_type(&self) -> SegmentType {
        self.key.segment_type
    }

    pub fn element(&self, staff: StaffId) -> Option<&SegmentElement> {
        self.elements.get(&staff)
    }

    pub fn clef(&self, staff: StaffId) -> Option<&Clef> {
        match self.elements.get(&staff) {
            Some(SegmentElement::Clef(clef)) => Some(clef),
            _ => None,
        }
    }

    pub fn key_sig(&self, staff: StaffId) -> Option<&KeySig> {
        match self.elements.get(&staff) {
            Some(SegmentElement::KeySig(key_sig)) => Some(key_sig),
            _ => None,
        }
    }

    pub fn add(&mut self, staff: StaffId, element: SegmentElement) -> Option<SegmentElement> {
        self.elements.insert(staff, element)
    }

    pub fn remove(&mut self, staff: StaffId) -> Option<SegmentElement> {
        self.elements.remove(&staff)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
