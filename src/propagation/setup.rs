//! Instrument assignment on an instrument change
//!
//! Assigning an instrument to an [`InstrumentChange`] ripples through the
//! score: clefs and key signatures may need to change on every staff of the
//! part, linked copies get their own copy of the instrument, the new
//! transposition is announced and the label is regenerated. All document
//! edits go through a [`CommandSink`] so that the host can undo them.
//!
//! [`InstrumentChange`]: crate::models::InstrumentChange

use super::generated::generated_removals;
use super::linked::propagate_instrument;
use super::notify::{TranspositionChange, TranspositionNotifier};
use super::resolver::{clef_host, resolve_clefs, resolve_key_sigs};
use crate::errors::Result;
use crate::links::LinkResolver;
use crate::models::{plain_to_xml_text, ElementRef, Instrument, MasterScore, Pid, PropertyValue, StaffId};
use crate::undo::{Command, CommandSink};

/// What a propagation run submitted
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropagationReport {
    /// Stale generated clefs and key signatures removed first
    pub removed_generated: usize,
    pub clef_changes: usize,
    pub key_sig_changes: usize,
    /// Linked elements (the origin included) that received the instrument
    pub linked_copies: usize,
    pub transposition: Option<TranspositionChange>,
    /// The regenerated label, as plain text
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SetupOutcome {
    Applied(PropagationReport),
    /// The element had already been set up; nothing was submitted
    AlreadyInitialized,
    /// The element already holds this instrument; nothing was submitted
    Unchanged,
}

impl SetupOutcome {
    pub fn report(&self) -> Option<&PropagationReport> {
        match self {
            SetupOutcome::Applied(report) => Some(report),
            _ => None,
        }
    }
}

/// First assignment of `instrument` to `element`
///
/// Runs the whole propagation exactly once. On an element that is already
/// initialized (set up before, or read from a file with the `init` marker)
/// nothing is submitted and [`SetupOutcome::AlreadyInitialized`] is returned.
pub fn apply_instrument_assignment(
    master: &mut MasterScore,
    element: ElementRef,
    instrument: &Instrument,
    sink: &mut dyn CommandSink,
    notifier: &mut dyn TranspositionNotifier,
) -> Result<SetupOutcome> {
    let ic = master.instrument_change(element)?;
    if ic.is_initialized() {
        log::info!("Instrument change {} already initialized, skipping setup", element);
        return Ok(SetupOutcome::AlreadyInitialized);
    }

    let baseline = master
        .score(element.score)?
        .part(ic.part())?
        .instrument_at(ic.tick)
        .clone();
    let report = propagate(master, element, instrument, &baseline, sink, notifier)?;

    master.instrument_change_mut(element)?.mark_initialized();
    Ok(SetupOutcome::Applied(report))
}

/// Switch an element to a different instrument after its first setup
///
/// The clefs and key signatures generated for the previous instrument are
/// removed, putting back any user clef or key signature they covered, and
/// propagation runs again against the instrument that precedes the element.
/// Re-selecting the instrument the element already holds is a no-op. An
/// element that was never set up gets a first assignment instead.
pub fn reassign_instrument(
    master: &mut MasterScore,
    element: ElementRef,
    instrument: &Instrument,
    sink: &mut dyn CommandSink,
    notifier: &mut dyn TranspositionNotifier,
) -> Result<SetupOutcome> {
    let ic = master.instrument_change(element)?;
    if !ic.is_initialized() {
        return apply_instrument_assignment(master, element, instrument, sink, notifier);
    }
    if ic.instrument() == instrument {
        log::debug!("Instrument change {} already holds {}", element, instrument.track_name);
        return Ok(SetupOutcome::Unchanged);
    }

    let score = master.score(element.score)?;
    let removals = generated_removals(score, ic);
    let baseline = score.part(ic.part())?.instrument_before(ic.tick).clone();

    let removed_generated = removals.len();
    log::debug!("Removing {} generated clefs/key signatures of {}", removed_generated, element);
    for command in removals {
        sink.submit(master, command)?;
    }

    let mut report = propagate(master, element, instrument, &baseline, sink, notifier)?;
    report.removed_generated = removed_generated;
    Ok(SetupOutcome::Applied(report))
}

/// Delete an instrument change together with what it generated
///
/// Generated clefs and key signatures at the element's tick are taken off
/// first (restoring the user elements they covered), then the element and
/// every linked copy of it are deleted. Everything goes through `sink`, so
/// the whole deletion can be undone.
pub fn remove_instrument_change(
    master: &mut MasterScore,
    element: ElementRef,
    sink: &mut dyn CommandSink,
) -> Result<usize> {
    master.instrument_change(element)?;
    let mut targets = master.links.linked_elements_of(element);
    if !targets.contains(&element) {
        targets.insert(0, element);
    }

    let mut commands = Vec::new();
    for target in &targets {
        let score = master.score(target.score)?;
        commands.extend(generated_removals(score, score.instrument_change(target.element)?));
    }
    let removed_generated = commands.len();
    commands.extend(targets.iter().map(|target| Command::RemoveInstrumentChange { element: *target }));

    log::debug!(
        "Deleting {} with {} linked copies and {} generated clefs/key signatures",
        element,
        targets.len() - 1,
        removed_generated
    );
    for command in commands {
        sink.submit(master, command)?;
    }
    Ok(removed_generated)
}

/// The propagation sequence, comparing `instrument` against `baseline`
fn propagate(
    master: &mut MasterScore,
    element: ElementRef,
    instrument: &Instrument,
    baseline: &Instrument,
    sink: &mut dyn CommandSink,
    notifier: &mut dyn TranspositionNotifier,
) -> Result<PropagationReport> {
    let score = master.score(element.score)?;
    let ic = score.instrument_change(element.element)?;
    let part_idx = ic.part();
    let tick_start = ic.tick;
    let part = score.part(part_idx)?;
    let concert_pitch = score.style.concert_pitch;

    let active_interval = part.instrument_at(tick_start).transpose();
    let old_interval = baseline.transpose();
    let new_interval = instrument.transpose();

    let host = clef_host(score, ic);
    let clef_commands: Vec<Command> = resolve_clefs(part, baseline, instrument, concert_pitch)
        .into_iter()
        .enumerate()
        .filter_map(|(staff, clef)| {
            clef.map(|clef_type| Command::ChangeClef {
                score: element.score,
                staff: StaffId::new(part_idx, staff),
                host,
                clef_type,
                generated: true,
            })
        })
        .collect();

    let key_commands: Vec<Command> = if (new_interval - old_interval).is_octave_only() {
        Vec::new()
    } else {
        resolve_key_sigs(part, tick_start, old_interval, new_interval, concert_pitch)
            .into_iter()
            .enumerate()
            .filter_map(|(staff, event)| {
                event.map(|event| Command::ChangeKeySig {
                    score: element.score,
                    staff: StaffId::new(part_idx, staff),
                    tick: tick_start,
                    event,
                })
            })
            .collect()
    };

    let linked = master.links.linked_elements_of(element);
    let instrument_commands = propagate_instrument(element, instrument, &master.links);
    let text = score.style.instrument_change_label(&instrument.track_name);

    let mut report = PropagationReport {
        clef_changes: clef_commands.len(),
        key_sig_changes: key_commands.len(),
        linked_copies: instrument_commands.len(),
        text,
        ..PropagationReport::default()
    };

    log::debug!("{}: {} clef changes at tick {}", element, report.clef_changes, tick_start);
    for command in clef_commands {
        sink.submit(master, command)?;
    }

    log::debug!("{}: {} key signature changes at tick {}", element, report.key_sig_changes, tick_start);
    for command in key_commands {
        sink.submit(master, command)?;
    }

    log::debug!("{}: propagating {} to {} linked elements", element, instrument.track_name, report.linked_copies);
    for command in instrument_commands {
        sink.submit(master, command)?;
    }

    if new_interval != active_interval {
        let tick_end = master
            .score(element.score)?
            .part(part_idx)?
            .next_change_after(tick_start);
        let change = TranspositionChange {
            score: element.score,
            part: part_idx,
            old_interval: active_interval,
            tick_start,
            tick_end,
        };
        log::debug!("{}: transposition {} -> {} from tick {}", element, active_interval, new_interval, tick_start);
        notifier.transposition_changed(change);
        report.transposition = Some(change);
    }

    let value = PropertyValue::Text(plain_to_xml_text(&report.text));
    let mut targets = linked;
    if !targets.contains(&element) {
        targets.insert(0, element);
    }
    for target in targets {
        sink.submit(
            master,
            Command::ChangeProperty { element: target, property: Pid::Text, value: value.clone() },
        )?;
    }

    Ok(report)
}
