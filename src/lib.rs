//! Score Engraving Core
//!
//! Instrument changes for a music notation editor. When a player switches
//! instrument mid-score, the change has to reach the clefs and key
//! signatures of every staff of the part, every linked copy of the score and
//! the transposition of the music that follows. This crate models the
//! document pieces involved and performs that propagation through an
//! undoable command layer.

pub mod config;
pub mod errors;
pub mod io;
pub mod links;
pub mod models;
pub mod propagation;
pub mod transposition;
pub mod undo;

// Re-export commonly used types
pub use config::{EngravingConfig, EngravingStyle, Placement};
pub use errors::{EngravingError, Result};
pub use links::{LinkRegistry, LinkResolver};
pub use models::*;
pub use propagation::{
    apply_instrument_assignment, reassign_instrument, remove_instrument_change, PropagationReport,
    SetupOutcome, TranspositionChange, TranspositionNotifier,
};
pub use transposition::{transpose_key, Interval};
pub use undo::{ClefHost, Command, CommandSink, UndoStack};
