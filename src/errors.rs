//! Error types for document edits

use crate::models::{ElementRef, Pid, ScoreId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngravingError {
    #[error("score {0} not found")]
    ScoreNotFound(ScoreId),
    #[error("part {0} not found")]
    PartNotFound(usize),
    #[error("staff {staff} of part {part} not found")]
    StaffNotFound { part: usize, staff: usize },
    #[error("measure {0} not found")]
    MeasureNotFound(usize),
    #[error("instrument change {0} not found")]
    ElementNotFound(ElementRef),
    #[error("instrument change {0} already exists")]
    DuplicateElement(ElementRef),
    #[error("property {0:?} does not accept this value")]
    PropertyMismatch(Pid),
    #[error("no undo history available")]
    NothingToUndo,
    #[error("no redo history available")]
    NothingToRedo,
}

pub type Result<T> = std::result::Result<T, EngravingError>;
