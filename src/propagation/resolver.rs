//! Decide which clefs and key signatures an instrument change needs
//!
//! Both resolvers work per staff of the part and return one slot per staff;
//! `None` means that staff needs nothing.

use crate::models::{ClefType, Instrument, InstrumentChange, KeySigEvent, Part, Score, Tick};
use crate::transposition::{transpose_key, Interval};
use crate::undo::ClefHost;

/// Clef each staff must switch to when `old` is replaced by `new`
///
/// Only a different *symbol* counts: swapping between clef types that draw
/// the same glyph emits nothing.
pub fn resolve_clefs(
    part: &Part,
    old: &Instrument,
    new: &Instrument,
    concert_pitch: bool,
) -> Vec<Option<ClefType>> {
    (0..part.n_staves())
        .map(|idx| {
            let old_clef = old.clef_type(idx).for_mode(concert_pitch);
            let new_clef = new.clef_type(idx).for_mode(concert_pitch);
            (!old_clef.same_symbol(new_clef)).then_some(new_clef)
        })
        .collect()
}

/// Key signature each staff must receive at `tick_start`
///
/// Pure octave transpositions never change the key. Atonal staves are
/// skipped. Outside concert pitch the staff's key is transposed by the old
/// interval to compensate for its existing transposed display.
pub fn resolve_key_sigs(
    part: &Part,
    tick_start: Tick,
    old_interval: Interval,
    new_interval: Interval,
    concert_pitch: bool,
) -> Vec<Option<KeySigEvent>> {
    if (new_interval - old_interval).is_octave_only() {
        return vec![None; part.n_staves()];
    }

    part.staves
        .iter()
        .map(|staff| {
            if staff.key_sig_event(tick_start).is_atonal() {
                return None;
            }
            let mut key = staff.key(tick_start);
            if !concert_pitch {
                key = transpose_key(key, old_interval);
            }
            Some(KeySigEvent::generated(key))
        })
        .collect()
}

/// Where a clef change for `ic` is attached
///
/// At the very start of a measure the clef belongs to the measure so that it
/// is drawn before the barline; anywhere else it belongs to the element.
pub fn clef_host(score: &Score, ic: &InstrumentChange) -> ClefHost {
    match score.measure_index_at(ic.tick) {
        Some(idx) if score.measures[idx].tick == ic.tick => ClefHost::Measure(idx),
        _ => ClefHost::Element(ic.id),
    }
}
