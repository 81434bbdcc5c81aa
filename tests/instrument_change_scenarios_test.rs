// End-to-end instrument assignment scenarios
//
// Each test builds a small score, inserts an instrument change, assigns a
// new instrument and inspects what was submitted to the command layer.

use score_engraving::models::{
    Clef, ClefType, ElementRef, Instrument, Key, KeySig, KeySigEvent, MasterScore, Part, Score,
    ScoreId, StaffId, TickEnd,
};
use score_engraving::propagation::{apply_instrument_assignment, SetupOutcome, TranspositionChange};
use score_engraving::undo::{ClefHost, Command, CommandSink, UndoStack};
use score_engraving::{EngravingStyle, Interval, Result};

const STAFF: StaffId = StaffId { part: 0, staff: 0 };

/// Records every submission while applying it through an undo stack
#[derive(Default)]
struct Recorder {
    stack: UndoStack,
    submitted: Vec<Command>,
}

impl CommandSink for Recorder {
    fn submit(&mut self, master: &mut MasterScore, command: Command) -> Result<()> {
        self.submitted.push(command.clone());
        self.stack.submit(master, command)
    }
}

impl Recorder {
    fn clef_changes(&self) -> Vec<&Command> {
        self.submitted
            .iter()
            .filter(|cmd| matches!(cmd, Command::ChangeClef { .. }))
            .collect()
    }

    fn key_sig_changes(&self) -> Vec<KeySigEvent> {
        self.submitted
            .iter()
            .filter_map(|cmd| match cmd {
                Command::ChangeKeySig { event, .. } => Some(*event),
                _ => None,
            })
            .collect()
    }
}

fn one_staff_score(instrument: Instrument, key: KeySigEvent) -> Score {
    let mut score = Score::new(EngravingStyle::default());
    for _ in 0..2 {
        score.append_measure(1920);
    }
    score.add_part(Part::new("P1", instrument, 1));
    score
        .set_key_sig(KeySig::new(STAFF, 0, key))
        .expect("key signature should be placed");
    score
}

fn insert_change(mut score: Score, tick: i32) -> (MasterScore, ElementRef) {
    let id = score
        .add_instrument_change(STAFF, tick, None)
        .expect("instrument change should be inserted");
    (MasterScore::new(score), ElementRef::new(ScoreId(0), id))
}

#[test]
fn test_octave_change_on_atonal_staff() {
    let score = one_staff_score(Instrument::new("Flute"), KeySigEvent::atonal());
    let (mut master, element) = insert_change(score, 480);
    let piccolo = Instrument::new("Piccolo").with_transpose(Interval::new(7, 12));

    let mut sink = Recorder::default();
    let mut changes = Vec::new();
    let outcome = apply_instrument_assignment(&mut master, element, &piccolo, &mut sink, &mut changes)
        .expect("assignment should succeed");

    assert!(matches!(outcome, SetupOutcome::Applied(_)));
    assert!(sink.key_sig_changes().is_empty());
    assert!(sink.clef_changes().is_empty());
    assert_eq!(
        changes,
        vec![TranspositionChange {
            score: ScoreId(0),
            part: 0,
            old_interval: Interval::default(),
            tick_start: 480,
            tick_end: TickEnd::Open,
        }]
    );
}

#[test]
fn test_octave_change_range_ends_at_next_change() {
    let mut score = one_staff_score(Instrument::new("Flute"), KeySigEvent::atonal());
    score
        .add_instrument_change(STAFF, 2400, Some(Instrument::new("Alto Flute")))
        .expect("instrument change should be inserted");
    let (mut master, element) = insert_change(score, 480);
    let piccolo = Instrument::new("Piccolo").with_transpose(Interval::new(7, 12));

    let mut changes = Vec::new();
    apply_instrument_assignment(&mut master, element, &piccolo, &mut Recorder::default(), &mut changes)
        .expect("assignment should succeed");

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].tick_end, TickEnd::At(2400));
}

#[test]
fn test_semitone_change_emits_one_generated_key() {
    let score = one_staff_score(Instrument::new("Trumpet in C"), KeySigEvent::new(Key::G));
    let (mut master, element) = insert_change(score, 480);
    let trumpet = Instrument::new("Trumpet in B").with_transpose(Interval::new(0, 1));

    let mut sink = Recorder::default();
    apply_instrument_assignment(&mut master, element, &trumpet, &mut sink, &mut Vec::new())
        .expect("assignment should succeed");

    assert_eq!(sink.key_sig_changes(), vec![KeySigEvent::generated(Key::G)]);
    let placed = master
        .main_score()
        .key_sig_at(STAFF, 480)
        .expect("generated key signature should be placed");
    assert!(placed.for_instrument_change());
}

#[test]
fn test_key_transposed_by_old_interval_when_not_in_concert_pitch() {
    let clarinet = Instrument::new("Clarinet in B♭").with_transpose(Interval::new(-1, -2));
    let score = one_staff_score(clarinet, KeySigEvent::new(Key::D));
    let (mut master, element) = insert_change(score, 480);
    let clarinet_in_a = Instrument::new("Clarinet in A").with_transpose(Interval::new(-2, -3));

    let mut sink = Recorder::default();
    let mut changes = Vec::new();
    apply_instrument_assignment(&mut master, element, &clarinet_in_a, &mut sink, &mut changes)
        .expect("assignment should succeed");

    assert_eq!(sink.key_sig_changes(), vec![KeySigEvent::generated(Key::C)]);
    assert_eq!(changes[0].old_interval, Interval::new(-1, -2));
}

#[test]
fn test_key_not_transposed_in_concert_pitch() {
    let clarinet = Instrument::new("Clarinet in B♭").with_transpose(Interval::new(-1, -2));
    let mut score = one_staff_score(clarinet, KeySigEvent::new(Key::D));
    score.style.concert_pitch = true;
    let (mut master, element) = insert_change(score, 480);
    let clarinet_in_a = Instrument::new("Clarinet in A").with_transpose(Interval::new(-2, -3));

    let mut sink = Recorder::default();
    apply_instrument_assignment(&mut master, element, &clarinet_in_a, &mut sink, &mut Vec::new())
        .expect("assignment should succeed");

    assert_eq!(sink.key_sig_changes(), vec![KeySigEvent::generated(Key::D)]);
}

#[test]
fn test_clef_host_mid_measure_is_the_element() {
    let score = one_staff_score(Instrument::new("Flute"), KeySigEvent::new(Key::C));
    let (mut master, element) = insert_change(score, 2400);
    let bassoon = Instrument::new("Bassoon").with_clef(0, ClefType::F);

    let mut sink = Recorder::default();
    apply_instrument_assignment(&mut master, element, &bassoon, &mut sink, &mut Vec::new())
        .expect("assignment should succeed");

    let clefs = sink.clef_changes();
    assert_eq!(clefs.len(), 1);
    assert!(matches!(
        clefs[0],
        Command::ChangeClef { host: ClefHost::Element(id), clef_type: ClefType::F, generated: true, .. }
            if *id == element.element
    ));
    let placed: &Clef = master.main_score().clef_at(STAFF, 2400).expect("clef should be placed");
    assert!(!placed.before_barline);
}

#[test]
fn test_clef_host_at_measure_start_is_the_measure() {
    let score = one_staff_score(Instrument::new("Flute"), KeySigEvent::new(Key::C));
    let (mut master, element) = insert_change(score, 1920);
    let bassoon = Instrument::new("Bassoon").with_clef(0, ClefType::F);

    let mut sink = Recorder::default();
    apply_instrument_assignment(&mut master, element, &bassoon, &mut sink, &mut Vec::new())
        .expect("assignment should succeed");

    let clefs = sink.clef_changes();
    assert_eq!(clefs.len(), 1);
    assert!(matches!(clefs[0], Command::ChangeClef { host: ClefHost::Measure(1), .. }));
    let placed = master.main_score().clef_at(STAFF, 1920).expect("clef should be placed");
    assert!(placed.before_barline);
    assert!(placed.for_instrument_change);
}

#[test]
fn test_submission_order() {
    let score = one_staff_score(Instrument::new("Flute"), KeySigEvent::new(Key::F));
    let (mut master, element) = insert_change(score, 480);
    let horn = Instrument::new("Horn in F")
        .with_transpose(Interval::new(-4, -7))
        .with_clef(0, ClefType::F);

    let mut sink = Recorder::default();
    apply_instrument_assignment(&mut master, element, &horn, &mut sink, &mut Vec::new())
        .expect("assignment should succeed");

    let kinds: Vec<&str> = sink
        .submitted
        .iter()
        .map(|cmd| match cmd {
            Command::ChangeClef { .. } => "clef",
            Command::ChangeKeySig { .. } => "key",
            Command::ChangeInstrument { .. } => "instrument",
            Command::ChangeProperty { .. } => "text",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["clef", "key", "instrument", "text"]);
    assert_eq!(
        master.instrument_change(element).expect("element exists").plain_text(),
        "To Horn in F"
    );
}
