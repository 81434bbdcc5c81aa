use crate::errors::{EngravingError, Result};
use crate::models::{
    Clef, ClefType, ElementId, ElementRef, Instrument, InstrumentChange, KeySig, KeySigEvent,
    MasterScore, Pid, PropertyValue, ScoreId, StaffId, Tick,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Element a clef change is attached to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClefHost {
    /// Start of the measure with this index; the clef goes ahead of its barline
    Measure(usize),
    /// An instrument change in the middle of a measure
    Element(ElementId),
}

/// Represents a reversible document edit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Place a clef at the host's position
    ChangeClef {
        score: ScoreId,
        staff: StaffId,
        host: ClefHost,
        clef_type: ClefType,
        /// Generated by an instrument change
        generated: bool,
    },
    /// Put back (or remove, when `None`) whatever clef was at `tick`
    RestoreClef {
        score: ScoreId,
        staff: StaffId,
        tick: Tick,
        clef: Option<Clef>,
    },
    ChangeKeySig {
        score: ScoreId,
        staff: StaffId,
        tick: Tick,
        event: KeySigEvent,
    },
    /// Put back (or remove, when `None`) whatever key signature was at `tick`
    RestoreKeySig {
        score: ScoreId,
        staff: StaffId,
        tick: Tick,
        key_sig: Option<KeySig>,
    },
    /// Give an instrument change its own copy of `instrument`
    ChangeInstrument {
        element: ElementRef,
        instrument: Instrument,
    },
    ChangeProperty {
        element: ElementRef,
        property: Pid,
        value: PropertyValue,
    },
    /// Delete an instrument change and drop it from its link group
    RemoveInstrumentChange { element: ElementRef },
    /// Put a deleted instrument change back under its old id
    InsertInstrumentChange {
        score: ScoreId,
        instrument_change: Box<InstrumentChange>,
        /// Link peers to rejoin
        linked: Vec<ElementRef>,
    },
    /// Commands applied together and undone together
    Batch { commands: Vec<Command> },
}

impl Command {
    /// Apply this command and return the command that reverses it
    pub fn execute(&self, master: &mut MasterScore) -> Result<Command> {
        match self {
            Command::ChangeClef { score, staff, host, clef_type, generated } => {
                let target = master.score_mut(*score)?;
                let (tick, before_barline) = match host {
                    ClefHost::Measure(idx) => (target.measure(*idx)?.tick, true),
                    ClefHost::Element(id) => (target.instrument_change(*id)?.tick, false),
                };
                let replaced = if *generated {
                    target.clef_at(*staff, tick).and_then(Clef::user_clef)
                } else {
                    None
                };
                let previous = target.set_clef(Clef {
                    staff: *staff,
                    tick,
                    clef_type: *clef_type,
                    for_instrument_change: *generated,
                    before_barline,
                    replaced,
                })?;
                Ok(Command::RestoreClef { score: *score, staff: *staff, tick, clef: previous })
            }
            Command::RestoreClef { score, staff, tick, clef } => {
                let target = master.score_mut(*score)?;
                let current = target.remove_clef(*staff, *tick)?;
                if let Some(clef) = clef {
                    target.set_clef(*clef)?;
                }
                Ok(Command::RestoreClef { score: *score, staff: *staff, tick: *tick, clef: current })
            }
            Command::ChangeKeySig { score, staff, tick, event } => {
                let target = master.score_mut(*score)?;
                let replaced = if event.for_instrument_change {
                    target.key_sig_at(*staff, *tick).and_then(KeySig::user_event)
                } else {
                    None
                };
                let previous = target.set_key_sig(KeySig {
                    staff: *staff,
                    tick: *tick,
                    event: *event,
                    replaced,
                })?;
                Ok(Command::RestoreKeySig { score: *score, staff: *staff, tick: *tick, key_sig: previous })
            }
            Command::RestoreKeySig { score, staff, tick, key_sig } => {
                let target = master.score_mut(*score)?;
                let current = target.remove_key_sig(*staff, *tick)?;
                if let Some(key_sig) = key_sig {
                    target.set_key_sig(*key_sig)?;
                }
                Ok(Command::RestoreKeySig { score: *score, staff: *staff, tick: *tick, key_sig: current })
            }
            Command::ChangeInstrument { element, instrument } => {
                let old = master
                    .score_mut(element.score)?
                    .replace_instrument(element.element, instrument.clone())?;
                Ok(Command::ChangeInstrument { element: *element, instrument: old })
            }
            Command::ChangeProperty { element, property, value } => {
                let old = master
                    .instrument_change_mut(*element)?
                    .set_property(*property, value.clone())?;
                Ok(Command::ChangeProperty { element: *element, property: *property, value: old })
            }
            Command::RemoveInstrumentChange { element } => {
                let (ic, linked) = master.remove_instrument_change(*element)?;
                Ok(Command::InsertInstrumentChange {
                    score: element.score,
                    instrument_change: Box::new(ic),
                    linked,
                })
            }
            Command::InsertInstrumentChange { score, instrument_change, linked } => {
                let element =
                    master.restore_instrument_change(*score, (**instrument_change).clone(), linked)?;
                Ok(Command::RemoveInstrumentChange { element })
            }
            Command::Batch { commands } => {
                let mut inverses = Vec::with_capacity(commands.len());
                for cmd in commands {
                    match cmd.execute(master) {
                        Ok(inverse) => inverses.push(inverse),
                        Err(err) => {
                            // Roll back what already ran
                            for inverse in inverses.iter().rev() {
                                inverse.execute(master)?;
                            }
                            return Err(err);
                        }
                    }
                }
                inverses.reverse();
                Ok(Command::Batch { commands: inverses })
            }
        }
    }

    /// Short human-readable name, for undo menus and logs
    pub fn description(&self) -> &'static str {
        match self {
            Command::ChangeClef { .. } | Command::RestoreClef { .. } => "Change clef",
            Command::ChangeKeySig { .. } | Command::RestoreKeySig { .. } => "Change key signature",
            Command::ChangeInstrument { .. } => "Change instrument",
            Command::ChangeProperty { .. } => "Change property",
            Command::RemoveInstrumentChange { .. } => "Delete instrument change",
            Command::InsertInstrumentChange { .. } => "Add instrument change",
            Command::Batch { .. } => "Edit",
        }
    }
}

/// Where document edits are submitted
///
/// Implementations apply the command to the document before returning.
pub trait CommandSink {
    fn submit(&mut self, master: &mut MasterScore, command: Command) -> Result<()>;
}

/// A command together with the command that undoes it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UndoEntry {
    pub command: Command,
    pub inverse: Command,
}

/// Linear undo/redo history with macro grouping
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UndoStack {
    entries: VecDeque<UndoEntry>,
    /// Current position in the stack (for redo support)
    current_index: usize,
    /// Maximum number of entries to keep in history
    max_size: usize,
    /// Entries of the macro being recorded (if any)
    #[serde(skip)]
    current_macro: Option<Vec<UndoEntry>>,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PartialEq for UndoStack {
    fn eq(&self, other: &Self) -> bool {
        // Only compare serialized fields (skip transient fields)
        self.entries == other.entries
            && self.current_index == other.current_index
            && self.max_size == other.max_size
    }
}

impl UndoStack {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            current_index: 0,
            max_size,
            current_macro: None,
        }
    }

    /// Start grouping submissions into one undo step
    pub fn begin_macro(&mut self) {
        if self.current_macro.is_none() {
            self.current_macro = Some(Vec::new());
        }
    }

    /// Close the open macro and add it to the history
    pub fn end_macro(&mut self) {
        let Some(mut recorded) = self.current_macro.take() else {
            return;
        };
        let entry = match recorded.len() {
            0 => return,
            1 => recorded.remove(0),
            _ => {
                let mut inverses: Vec<Command> =
                    recorded.iter().map(|entry| entry.inverse.clone()).collect();
                inverses.reverse();
                UndoEntry {
                    command: Command::Batch {
                        commands: recorded.into_iter().map(|entry| entry.command).collect(),
                    },
                    inverse: Command::Batch { commands: inverses },
                }
            }
        };
        self.commit(entry);
    }

    pub fn in_macro(&self) -> bool {
        self.current_macro.is_some()
    }

    fn record(&mut self, entry: UndoEntry) {
        match self.current_macro.as_mut() {
            Some(recorded) => recorded.push(entry),
            None => self.commit(entry),
        }
    }

    fn commit(&mut self, entry: UndoEntry) {
        // Truncate any redo history when new command is added
        self.entries.truncate(self.current_index);
        self.entries.push_back(entry);
        self.current_index = self.entries.len();

        // Enforce max size
        if self.entries.len() > self.max_size {
            self.entries.pop_front();
            self.current_index = self.current_index.saturating_sub(1);
        }
    }

    /// Undo the last step
    pub fn undo(&mut self, master: &mut MasterScore) -> Result<()> {
        self.end_macro();

        if !self.can_undo() {
            return Err(EngravingError::NothingToUndo);
        }

        self.current_index -= 1;
        let entry = &self.entries[self.current_index];
        log::debug!("Undo: {}", entry.command.description());
        entry.inverse.execute(master)?;
        Ok(())
    }

    /// Redo the last undone step
    pub fn redo(&mut self, master: &mut MasterScore) -> Result<()> {
        if !self.can_redo() {
            return Err(EngravingError::NothingToRedo);
        }

        let entry = &mut self.entries[self.current_index];
        log::debug!("Redo: {}", entry.command.description());
        entry.inverse = entry.command.execute(master)?;
        self.current_index += 1;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_index = 0;
        self.current_macro = None;
    }

    pub fn undo_count(&self) -> usize {
        self.current_index
    }

    pub fn redo_count(&self) -> usize {
        self.entries.len() - self.current_index
    }

    /// Commands of the steps that can currently be undone, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Command> {
        self.entries
            .iter()
            .take(self.current_index)
            .map(|entry| &entry.command)
    }
}

impl CommandSink for UndoStack {
    fn submit(&mut self, master: &mut MasterScore, command: Command) -> Result<()> {
        let inverse = command.execute(master)?;
        log::trace!("Applied {}", command.description());
        self.record(UndoEntry { command, inverse });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngravingStyle;
    use crate::models::{Key, Part, Score};

    const STAFF: StaffId = StaffId { part: 0, staff: 0 };

    fn create_test_master() -> (MasterScore, ElementId) {
        let mut score = Score::new(EngravingStyle::default());
        score.append_measure(1920);
        score.append_measure(1920);
        score.add_part(Part::new("P1", Instrument::new("Flute"), 1));
        let id = score.add_instrument_change(STAFF, 2400, None).unwrap();
        (MasterScore::new(score), id)
    }

    fn change_clef(host: ClefHost, clef_type: ClefType) -> Command {
        Command::ChangeClef { score: ScoreId(0), staff: STAFF, host, clef_type, generated: true }
    }

    #[test]
    fn test_change_clef_execute_and_undo() {
        let (mut master, _) = create_test_master();
        let cmd = change_clef(ClefHost::Measure(1), ClefType::F);

        let inverse = cmd.execute(&mut master).unwrap();
        let clef = *master.main_score().clef_at(STAFF, 1920).unwrap();
        assert_eq!(clef.clef_type, ClefType::F);
        assert!(clef.before_barline);
        assert!(clef.for_instrument_change);

        inverse.execute(&mut master).unwrap();
        assert!(master.main_score().clef_at(STAFF, 1920).is_none());
    }

    #[test]
    fn test_change_clef_on_element_uses_element_tick() {
        let (mut master, id) = create_test_master();
        change_clef(ClefHost::Element(id), ClefType::C3)
            .execute(&mut master)
            .unwrap();
        let clef = master.main_score().clef_at(STAFF, 2400).unwrap();
        assert!(!clef.before_barline);
    }

    #[test]
    fn test_key_sig_undo_restores_previous() {
        let (mut master, _) = create_test_master();
        let first = Command::ChangeKeySig {
            score: ScoreId(0),
            staff: STAFF,
            tick: 0,
            event: KeySigEvent::new(Key::G),
        };
        let second = Command::ChangeKeySig {
            score: ScoreId(0),
            staff: STAFF,
            tick: 0,
            event: KeySigEvent::new(Key::A),
        };
        first.execute(&mut master).unwrap();
        let inverse = second.execute(&mut master).unwrap();
        assert_eq!(master.main_score().staff(STAFF).unwrap().key(0), Key::A);

        inverse.execute(&mut master).unwrap();
        assert_eq!(master.main_score().staff(STAFF).unwrap().key(0), Key::G);
    }

    #[test]
    fn test_change_instrument_undo() {
        let (mut master, id) = create_test_master();
        let element = ElementRef::new(ScoreId(0), id);
        let cmd = Command::ChangeInstrument { element, instrument: Instrument::new("Piccolo") };

        let inverse = cmd.execute(&mut master).unwrap();
        assert_eq!(master.instrument_change(element).unwrap().instrument().track_name, "Piccolo");
        assert_eq!(master.main_score().part(0).unwrap().instrument_at(2400).track_name, "Piccolo");

        inverse.execute(&mut master).unwrap();
        assert_eq!(master.instrument_change(element).unwrap().instrument().track_name, "Flute");
    }

    #[test]
    fn test_remove_instrument_change_undo() {
        let (mut master, id) = create_test_master();
        let element = ElementRef::new(ScoreId(0), id);
        let excerpt = master.add_linked_excerpt(ScoreId(0)).unwrap();
        let copy = ElementRef::new(excerpt, id);

        let inverse = Command::RemoveInstrumentChange { element }.execute(&mut master).unwrap();
        assert!(master.instrument_change(element).is_err());
        assert!(!master.links.is_linked(element, copy));
        assert!(matches!(
            &inverse,
            Command::InsertInstrumentChange { linked, .. } if linked == &vec![copy]
        ));

        let redo = inverse.execute(&mut master).unwrap();
        assert_eq!(redo, Command::RemoveInstrumentChange { element });
        assert_eq!(master.instrument_change(element).unwrap().tick, 2400);
        assert!(master.links.is_linked(element, copy));
    }

    #[test]
    fn test_generated_key_sig_remembers_user_key() {
        let (mut master, _) = create_test_master();
        let user = Command::ChangeKeySig {
            score: ScoreId(0),
            staff: STAFF,
            tick: 1920,
            event: KeySigEvent::new(Key::E),
        };
        let generated = Command::ChangeKeySig {
            score: ScoreId(0),
            staff: STAFF,
            tick: 1920,
            event: KeySigEvent::generated(Key::F),
        };
        user.execute(&mut master).unwrap();
        generated.execute(&mut master).unwrap();
        // A second generated key keeps pointing at the user key underneath
        generated.execute(&mut master).unwrap();

        let key_sig = master.main_score().key_sig_at(STAFF, 1920).unwrap();
        assert_eq!(key_sig.replaced, Some(KeySigEvent::new(Key::E)));
    }

    #[test]
    fn test_batch_rolls_back_on_failure() {
        let (mut master, _) = create_test_master();
        let batch = Command::Batch {
            commands: vec![
                change_clef(ClefHost::Measure(1), ClefType::F),
                change_clef(ClefHost::Measure(9), ClefType::F),
            ],
        };
        let err = batch.execute(&mut master).unwrap_err();
        assert_eq!(err, EngravingError::MeasureNotFound(9));
        assert!(master.main_score().clef_at(STAFF, 1920).is_none());
    }

    #[test]
    fn test_undo_stack_basic() {
        let (mut master, _) = create_test_master();
        let mut stack = UndoStack::new(10);

        stack
            .submit(&mut master, change_clef(ClefHost::Measure(1), ClefType::F))
            .unwrap();
        assert!(stack.can_undo());
        assert!(!stack.can_redo());

        stack.undo(&mut master).unwrap();
        assert!(master.main_score().clef_at(STAFF, 1920).is_none());
        assert!(!stack.can_undo());
        assert!(stack.can_redo());

        stack.redo(&mut master).unwrap();
        assert!(master.main_score().clef_at(STAFF, 1920).is_some());
        assert!(stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_macro_groups_into_one_step() {
        let (mut master, _) = create_test_master();
        let mut stack = UndoStack::new(10);

        stack.begin_macro();
        stack
            .submit(&mut master, change_clef(ClefHost::Measure(0), ClefType::C3))
            .unwrap();
        stack
            .submit(&mut master, change_clef(ClefHost::Measure(1), ClefType::F))
            .unwrap();
        stack.end_macro();
        assert_eq!(stack.undo_count(), 1);

        stack.undo(&mut master).unwrap();
        assert!(master.main_score().clef_at(STAFF, 0).is_none());
        assert!(master.main_score().clef_at(STAFF, 1920).is_none());
        assert_eq!(stack.redo_count(), 1);
    }

    #[test]
    fn test_nothing_to_undo() {
        let (mut master, _) = create_test_master();
        let mut stack = UndoStack::default();
        assert_eq!(stack.undo(&mut master).unwrap_err(), EngravingError::NothingToUndo);
        assert_eq!(stack.redo(&mut master).unwrap_err(), EngravingError::NothingToRedo);
    }

    #[test]
    fn test_max_size_enforcement() {
        let (mut master, _) = create_test_master();
        let mut stack = UndoStack::new(3);

        for _ in 0..5 {
            stack
                .submit(&mut master, change_clef(ClefHost::Measure(1), ClefType::F))
                .unwrap();
        }

        assert_eq!(stack.undo_count(), 3);
    }

    #[test]
    fn test_history_serializes_to_json() {
        let (mut master, _) = create_test_master();
        let mut stack = UndoStack::new(10);
        stack
            .submit(&mut master, change_clef(ClefHost::Measure(1), ClefType::F))
            .unwrap();

        let json = serde_json::to_string(&stack).unwrap();
        let restored: UndoStack = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, stack);
    }
}
