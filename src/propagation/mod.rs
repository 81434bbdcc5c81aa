//! Instrument-change propagation
//!
//! Resolving clef and key signature changes, replicating instruments across
//! linked scores, retrieving generated elements, orchestrating a full
//! instrument assignment and deleting an instrument change cleanly.

pub mod generated;
pub mod linked;
pub mod notify;
pub mod resolver;
pub mod setup;

pub use generated::{generated_clefs, generated_key_sigs, generated_removals};
pub use linked::propagate_instrument;
pub use notify::{TranspositionChange, TranspositionNotifier};
pub use resolver::{clef_host, resolve_clefs, resolve_key_sigs};
pub use setup::{
    apply_instrument_assignment, reassign_instrument, remove_instrument_change, PropagationReport,
    SetupOutcome,
};
