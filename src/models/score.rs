//! Scores and the master score that owns linked excerpts

use super::ids::{ElementId, ElementRef, ScoreId};
use super::instrument::Instrument;
use super::instrument_change::InstrumentChange;
use super::part::Part;
use super::segment::{Clef, KeySig, Measure, Segment, SegmentElement, SegmentKey, SegmentType};
use super::staff::{Staff, StaffId};
use super::Tick;
use crate::config::EngravingStyle;
use crate::errors::{EngravingError, Result};
use crate::links::{LinkRegistry, LinkResolver};
use std::collections::BTreeMap;

/// Current score file format version
pub const MSC_VERSION: u32 = 400;

#[derive(Clone, Debug)]
pub struct Score {
    pub id: ScoreId,
    pub style: EngravingStyle,
    /// Format version the score was read from
    pub msc_version: u32,
    pub measures: Vec<Measure>,
    pub parts: Vec<Part>,
    segments: BTreeMap<SegmentKey, Segment>,
    instrument_changes: BTreeMap<ElementId, InstrumentChange>,
    next_element_id: u32,
}

impl Score {
    pub fn new(style: EngravingStyle) -> Self {
        Self {
            id: ScoreId::default(),
            style,
            msc_version: MSC_VERSION,
            measures: Vec::new(),
            parts: Vec::new(),
            segments: BTreeMap::new(),
            instrument_changes: BTreeMap::new(),
            next_element_id: 1,
        }
    }

    /// Append a measure of `ticks` length after the last one
    pub fn append_measure(&mut self, ticks: Tick) -> usize {
        let tick = self.measures.last().map(Measure::end_tick).unwrap_or(0);
        self.measures.push(Measure { tick, ticks });
        self.measures.len() - 1
    }

    /// Index of the measure containing `tick`
    pub fn measure_index_at(&self, tick: Tick) -> Option<usize> {
        self.measures.iter().position(|m| m.contains(tick))
    }

    pub fn measure_at(&self, tick: Tick) -> Option<&Measure> {
        self.measure_index_at(tick).map(|idx| &self.measures[idx])
    }

    pub fn measure(&self, idx: usize) -> Result<&Measure> {
        self.measures
            .get(idx)
            .ok_or(EngravingError::MeasureNotFound(idx))
    }

    pub fn add_part(&mut self, part: Part) -> usize {
        self.parts.push(part);
        self.parts.len() - 1
    }

    pub fn part(&self, idx: usize) -> Result<&Part> {
        self.parts.get(idx).ok_or(EngravingError::PartNotFound(idx))
    }

    pub fn part_mut(&mut self, idx: usize) -> Result<&mut Part> {
        self.parts.get_mut(idx).ok_or(EngravingError::PartNotFound(idx))
    }

    pub fn staff(&self, id: StaffId) -> Result<&Staff> {
        self.part(id.part)?
            .staff(id.staff)
            .ok_or(EngravingError::StaffNotFound { part: id.part, staff: id.staff })
    }

    pub fn staff_mut(&mut self, id: StaffId) -> Result<&mut Staff> {
        self.part_mut(id.part)?
            .staff_mut(id.staff)
            .ok_or(EngravingError::StaffNotFound { part: id.part, staff: id.staff })
    }

    fn element_ref(&self, id: ElementId) -> ElementRef {
        ElementRef::new(self.id, id)
    }

    /// Insert an instrument change at `tick` on `staff`
    ///
    /// Without an explicit instrument the element starts as a copy of the
    /// instrument already active there. Either way the part's timeline gets
    /// an entry at `tick`.
    pub fn add_instrument_change(
        &mut self,
        staff: StaffId,
        tick: Tick,
        instrument: Option<Instrument>,
    ) -> Result<ElementId> {
        self.staff(staff)?;
        let instrument = match instrument {
            Some(instrument) => instrument,
            None => self.part(staff.part)?.instrument_at(tick).clone(),
        };
        let ic = InstrumentChange::new(staff, tick, instrument, &self.style);
        self.insert_instrument_change(ic)
    }

    /// Insert a fully built element (e.g. one read from a file), assigning it an id
    pub fn insert_instrument_change(&mut self, mut ic: InstrumentChange) -> Result<ElementId> {
        self.staff(ic.staff)?;
        let id = ElementId(self.next_element_id);
        self.next_element_id += 1;
        ic.id = id;
        self.place_instrument_change(ic)?;
        Ok(id)
    }

    /// Put a removed element back under its own id
    pub fn restore_instrument_change(&mut self, ic: InstrumentChange) -> Result<()> {
        self.staff(ic.staff)?;
        if self.instrument_changes.contains_key(&ic.id) {
            return Err(EngravingError::DuplicateElement(self.element_ref(ic.id)));
        }
        self.next_element_id = self.next_element_id.max(ic.id.0 + 1);
        self.place_instrument_change(ic)
    }

    fn place_instrument_change(&mut self, ic: InstrumentChange) -> Result<()> {
        self.part_mut(ic.part())?
            .set_instrument(ic.tick, ic.instrument().clone());
        self.ensure_segment(SegmentKey::new(ic.tick, SegmentType::ChordRest));
        log::trace!("Inserted instrument change {} in score {}", ic.id.0, self.id);
        self.instrument_changes.insert(ic.id, ic);
        Ok(())
    }

    /// Drop the element and its timeline entry
    ///
    /// Generated clefs and key signatures stay where they are; deleting an
    /// element from the document goes through
    /// [`crate::propagation::remove_instrument_change`].
    pub fn remove_instrument_change(&mut self, id: ElementId) -> Result<InstrumentChange> {
        let ic = self
            .instrument_changes
            .remove(&id)
            .ok_or(EngravingError::ElementNotFound(self.element_ref(id)))?;
        self.part_mut(ic.part())?.remove_instrument(ic.tick);
        Ok(ic)
    }

    pub fn instrument_change(&self, id: ElementId) -> Result<&InstrumentChange> {
        self.instrument_changes
            .get(&id)
            .ok_or(EngravingError::ElementNotFound(self.element_ref(id)))
    }

    pub fn instrument_change_mut(&mut self, id: ElementId) -> Result<&mut InstrumentChange> {
        let element = self.element_ref(id);
        self.instrument_changes
            .get_mut(&id)
            .ok_or(EngravingError::ElementNotFound(element))
    }

    pub fn instrument_changes(&self) -> impl Iterator<Item = &InstrumentChange> {
        self.instrument_changes.values()
    }

    /// Replace an element's instrument and the matching timeline entry
    pub fn replace_instrument(&mut self, id: ElementId, instrument: Instrument) -> Result<Instrument> {
        let (part, tick) = {
            let ic = self.instrument_change(id)?;
            (ic.part(), ic.tick)
        };
        self.part_mut(part)?.set_instrument(tick, instrument.clone());
        let ic = self.instrument_change_mut(id)?;
        Ok(ic.set_instrument(instrument))
    }

    pub fn segment(&self, key: SegmentKey) -> Option<&Segment> {
        self.segments.get(&key)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    fn ensure_segment(&mut self, key: SegmentKey) -> &mut Segment {
        self.segments.entry(key).or_insert_with(|| Segment::new(key))
    }

    /// Nearest segment of `segment_type` strictly before `from`
    pub fn prev_segment(&self, from: SegmentKey, segment_type: SegmentType) -> Option<&Segment> {
        self.segments
            .range(..from)
            .rev()
            .map(|(_, segment)| segment)
            .find(|segment| segment.segment_type() == segment_type)
    }

    fn remove_segment_element(&mut self, key: SegmentKey, staff: StaffId) -> Option<SegmentElement> {
        let segment = self.segments.get_mut(&key)?;
        let removed = segment.remove(staff);
        if segment.is_empty() {
            self.segments.remove(&key);
        }
        removed
    }

    /// Clef drawn on `staff` exactly at `tick`
    pub fn clef_at(&self, staff: StaffId, tick: Tick) -> Option<&Clef> {
        self.segment(SegmentKey::new(tick, SegmentType::Clef))
            .and_then(|segment| segment.clef(staff))
    }

    /// Place a clef, returning the clef it replaces
    pub fn set_clef(&mut self, clef: Clef) -> Result<Option<Clef>> {
        self.staff_mut(clef.staff)?.set_clef(clef.tick, clef.clef_type);
        let previous = self
            .ensure_segment(SegmentKey::new(clef.tick, SegmentType::Clef))
            .add(clef.staff, SegmentElement::Clef(clef));
        Ok(match previous {
            Some(SegmentElement::Clef(previous)) => Some(previous),
            _ => None,
        })
    }

    pub fn remove_clef(&mut self, staff: StaffId, tick: Tick) -> Result<Option<Clef>> {
        self.staff_mut(staff)?.remove_clef(tick);
        let removed = self.remove_segment_element(SegmentKey::new(tick, SegmentType::Clef), staff);
        Ok(match removed {
            Some(SegmentElement::Clef(clef)) => Some(clef),
            _ => None,
        })
    }

    /// Key signature drawn on `staff` exactly at `tick`
    pub fn key_sig_at(&self, staff: StaffId, tick: Tick) -> Option<&KeySig> {
        self.segment(SegmentKey::new(tick, SegmentType::KeySig))
            .and_then(|segment| segment.key_sig(staff))
    }

    /// Place a key signature, returning the one it replaces
    pub fn set_key_sig(&mut self, key_sig: KeySig) -> Result<Option<KeySig>> {
        self.staff_mut(key_sig.staff)?.set_key(key_sig.tick, key_sig.event);
        let previous = self
            .ensure_segment(SegmentKey::new(key_sig.tick, SegmentType::KeySig))
            .add(key_sig.staff, SegmentElement::KeySig(key_sig));
        Ok(match previous {
            Some(SegmentElement::KeySig(previous)) => Some(previous),
            _ => None,
        })
    }

    pub fn remove_key_sig(&mut self, staff: StaffId, tick: Tick) -> Result<Option<KeySig>> {
        self.staff_mut(staff)?.remove_key(tick);
        let removed = self.remove_segment_element(SegmentKey::new(tick, SegmentType::KeySig), staff);
        Ok(match removed {
            Some(SegmentElement::KeySig(key_sig)) => Some(key_sig),
            _ => None,
        })
    }
}

/// A main score together with its linked excerpts
#[derive(Clone, Debug)]
pub struct MasterScore {
    scores: Vec<Score>,
    pub links: LinkRegistry,
}

impl MasterScore {
    pub fn new(mut main: Score) -> Self {
        main.id = ScoreId(0);
        Self {
            scores: vec![main],
            links: LinkRegistry::default(),
        }
    }

    pub fn main_score(&self) -> &Score {
        &self.scores[0]
    }

    pub fn scores(&self) -> impl Iterator<Item = &Score> {
        self.scores.iter()
    }

    pub fn score(&self, id: ScoreId) -> Result<&Score> {
        self.scores.get(id.0).ok_or(EngravingError::ScoreNotFound(id))
    }

    pub fn score_mut(&mut self, id: ScoreId) -> Result<&mut Score> {
        self.scores.get_mut(id.0).ok_or(EngravingError::ScoreNotFound(id))
    }

    pub fn add_score(&mut self, mut score: Score) -> ScoreId {
        let id = ScoreId(self.scores.len());
        score.id = id;
        self.scores.push(score);
        id
    }

    /// Copy `source` into a new excerpt and link each instrument change to its copy
    pub fn add_linked_excerpt(&mut self, source: ScoreId) -> Result<ScoreId> {
        let copy = self.score(source)?.clone();
        let id = self.add_score(copy);
        let element_ids: Vec<ElementId> = self
            .score(id)?
            .instrument_changes()
            .map(|ic| ic.id)
            .collect();
        for element in element_ids {
            self.links
                .link(ElementRef::new(source, element), ElementRef::new(id, element));
        }
        log::debug!("Created linked excerpt {} from score {}", id, source);
        Ok(id)
    }

    pub fn instrument_change(&self, element: ElementRef) -> Result<&InstrumentChange> {
        self.score(element.score)?.instrument_change(element.element)
    }

    pub fn instrument_change_mut(&mut self, element: ElementRef) -> Result<&mut InstrumentChange> {
        self.score_mut(element.score)?
            .instrument_change_mut(element.element)
    }

    /// Take an element out of its score and its link group
    ///
    /// Returns the element together with the peers it was linked to.
    pub fn remove_instrument_change(
        &mut self,
        element: ElementRef,
    ) -> Result<(InstrumentChange, Vec<ElementRef>)> {
        let ic = self
            .score_mut(element.score)?
            .remove_instrument_change(element.element)?;
        let peers: Vec<ElementRef> = self
            .links
            .linked_elements_of(element)
            .into_iter()
            .filter(|peer| *peer != element)
            .collect();
        self.links.unlink(element);
        Ok((ic, peers))
    }

    /// Put a removed element back and relink it to `peers`
    pub fn restore_instrument_change(
        &mut self,
        score: ScoreId,
        ic: InstrumentChange,
        peers: &[ElementRef],
    ) -> Result<ElementRef> {
        let element = ElementRef::new(score, ic.id);
        self.score_mut(score)?.restore_instrument_change(ic)?;
        for peer in peers {
            self.links.link(element, *peer);
        }
        Ok(element)
    }
}
