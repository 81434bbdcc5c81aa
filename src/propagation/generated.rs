//! Find the clefs and key signatures an instrument change generated

use crate::models::{Clef, InstrumentChange, KeySig, Score, Segment, SegmentKey, SegmentType, StaffId};
use crate::undo::Command;

fn nearest_prior<'a>(score: &'a Score, ic: &InstrumentChange, segment_type: SegmentType) -> Option<&'a Segment> {
    score.prev_segment(SegmentKey::new(ic.tick, SegmentType::ChordRest), segment_type)
}

fn part_staves(score: &Score, ic: &InstrumentChange) -> impl Iterator<Item = StaffId> {
    let part = ic.part();
    let n_staves = score.part(part).map(|p| p.n_staves()).unwrap_or(0);
    (0..n_staves).map(move |staff| StaffId::new(part, staff))
}

/// Generated clefs on the part's staves at exactly `ic`'s tick
///
/// Looks only at the nearest clef segment before the element. Generated
/// clefs at any other tick belong to some other instrument change.
pub fn generated_clefs<'a>(score: &'a Score, ic: &InstrumentChange) -> Vec<&'a Clef> {
    let Some(segment) = nearest_prior(score, ic, SegmentType::Clef) else {
        return Vec::new();
    };
    part_staves(score, ic)
        .filter_map(|staff| segment.clef(staff))
        .filter(|clef| clef.for_instrument_change && clef.tick == ic.tick)
        .collect()
}

/// Generated key signatures on the part's staves at exactly `ic`'s tick
pub fn generated_key_sigs<'a>(score: &'a Score, ic: &InstrumentChange) -> Vec<&'a KeySig> {
    let Some(segment) = nearest_prior(score, ic, SegmentType::KeySig) else {
        return Vec::new();
    };
    part_staves(score, ic)
        .filter_map(|staff| segment.key_sig(staff))
        .filter(|key_sig| key_sig.for_instrument_change() && key_sig.tick == ic.tick)
        .collect()
}

/// Commands that take `ic`'s generated clefs and key signatures off the score
///
/// Each position gets back the user clef or key signature the generated one
/// was placed over, or is left empty.
pub fn generated_removals(score: &Score, ic: &InstrumentChange) -> Vec<Command> {
    let clefs = generated_clefs(score, ic).into_iter().map(|clef| Command::RestoreClef {
        score: score.id,
        staff: clef.staff,
        tick: clef.tick,
        clef: clef.restored(),
    });
    let key_sigs = generated_key_sigs(score, ic).into_iter().map(|key_sig| Command::RestoreKeySig {
        score: score.id,
        staff: key_sig.staff,
        tick: key_sig.tick,
        key_sig: key_sig.restored(),
    });
    clefs.chain(key_sigs).collect()
}
