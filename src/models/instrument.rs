//! Instrument snapshots
//!
//! An [`Instrument`] is a plain value. Every element that holds one owns its
//! own copy; handing an instrument to another element or to a command always
//! clones it.

use super::clef::{ClefType, StaffClef};
use crate::transposition::Interval;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Template identifier, e.g. "b-flat-clarinet"
    pub id: String,
    pub long_name: String,
    pub short_name: String,
    /// Name shown in mixers and instrument-change labels
    pub track_name: String,
    /// Sounding pitch relative to written pitch
    pub transpose: Interval,
    /// Per-staff clefs, indexed by staff within the part
    pub clefs: Vec<StaffClef>,
}

impl Instrument {
    pub fn new(track_name: impl Into<String>) -> Self {
        let track_name = track_name.into();
        Self {
            long_name: track_name.clone(),
            track_name,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_transpose(mut self, transpose: Interval) -> Self {
        self.transpose = transpose;
        self
    }

    pub fn with_clef(mut self, staff_idx: usize, clef: impl Into<StaffClef>) -> Self {
        self.set_clef_type(staff_idx, clef.into());
        self
    }

    pub fn transpose(&self) -> Interval {
        self.transpose
    }

    pub fn set_transpose(&mut self, transpose: Interval) {
        self.transpose = transpose;
    }

    /// Clefs for a staff of the part
    ///
    /// Staves beyond the listed clefs reuse the first one. An instrument
    /// with no clefs at all gets treble on the first staff and bass on the
    /// second, like a keyboard.
    pub fn clef_type(&self, staff_idx: usize) -> StaffClef {
        if let Some(clef) = self.clefs.get(staff_idx) {
            return *clef;
        }
        match self.clefs.first() {
            Some(first) => *first,
            None if staff_idx == 1 => StaffClef::from(ClefType::F),
            None => StaffClef::from(ClefType::G),
        }
    }

    pub fn set_clef_type(&mut self, staff_idx: usize, clef: StaffClef) {
        while self.clefs.len() <= staff_idx {
            let filler = self.clef_type(self.clefs.len());
            self.clefs.push(filler);
        }
        self.clefs[staff_idx] = clef;
    }

    pub fn set_concert_clef(&mut self, staff_idx: usize, clef: ClefType) {
        let mut current = self.clef_type(staff_idx);
        current.concert = clef;
        self.set_clef_type(staff_idx, current);
    }

    pub fn set_transposing_clef(&mut self, staff_idx: usize, clef: ClefType) {
        let mut current = self.clef_type(staff_idx);
        current.transposing = clef;
        self.set_clef_type(staff_idx, current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clefs_without_list() {
        let piano = Instrument::new("Piano");
        assert_eq!(piano.clef_type(0), StaffClef::from(ClefType::G));
        assert_eq!(piano.clef_type(1), StaffClef::from(ClefType::F));
        assert_eq!(piano.clef_type(2), StaffClef::from(ClefType::G));
    }

    #[test]
    fn test_extra_staves_reuse_first_clef() {
        let viola = Instrument::new("Viola").with_clef(0, ClefType::C3);
        assert_eq!(viola.clef_type(0).transposing, ClefType::C3);
        assert_eq!(viola.clef_type(3).concert, ClefType::C3);
    }

    #[test]
    fn test_set_clef_beyond_list_fills_gap() {
        let mut harp = Instrument::new("Harp");
        harp.set_clef_type(1, StaffClef::from(ClefType::F));
        assert_eq!(harp.clefs.len(), 2);
        assert_eq!(harp.clefs[0], StaffClef::from(ClefType::G));
        assert_eq!(harp.clefs[1], StaffClef::from(ClefType::F));
    }

    #[test]
    fn test_separate_concert_and_transposing_clefs() {
        let mut bass_clarinet = Instrument::new("Bass Clarinet").with_transpose(Interval::new(-8, -14));
        bass_clarinet.set_concert_clef(0, ClefType::F);
        assert_eq!(bass_clarinet.clef_type(0), StaffClef::new(ClefType::F, ClefType::G));
        bass_clarinet.set_transposing_clef(0, ClefType::G8vb);
        assert_eq!(bass_clarinet.clef_type(0), StaffClef::new(ClefType::F, ClefType::G8vb));
    }

    #[test]
    fn test_clones_are_independent() {
        let original = Instrument::new("Flute").with_transpose(Interval::new(0, 0));
        let mut copy = original.clone();
        copy.set_transpose(Interval::new(7, 12));
        copy.track_name.push_str(" (Piccolo)");
        assert_eq!(original.transpose(), Interval::default());
        assert_eq!(original.track_name, "Flute");
    }
}
