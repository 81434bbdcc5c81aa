//! Replicate an instrument assignment across linked score copies

use crate::links::LinkResolver;
use crate::models::{ElementRef, Instrument};
use crate::undo::Command;

/// One `ChangeInstrument` command per element in `origin`'s link group
///
/// Each command carries its own copy of `instrument`, so no two elements
/// ever share an instrument. The origin is always included, even if the
/// resolver does not report it.
pub fn propagate_instrument(
    origin: ElementRef,
    instrument: &Instrument,
    links: &dyn LinkResolver,
) -> Vec<Command> {
    let mut targets = links.linked_elements_of(origin);
    if !targets.contains(&origin) {
        targets.insert(0, origin);
    }

    targets
        .into_iter()
        .map(|element| Command::ChangeInstrument {
            element,
            instrument: instrument.clone(),
        })
        .collect()
}
