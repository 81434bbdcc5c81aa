//! Identifiers for scores and elements

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a score within its [`MasterScore`](super::MasterScore); 0 is the main score
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScoreId(pub usize);

/// Identifier of an element, unique within its score
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// An element anywhere in a master score and its excerpts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementRef {
    pub score: ScoreId,
    pub element: ElementId,
}

impl ElementRef {
    pub fn new(score: ScoreId, element: ElementId) -> Self {
        Self { score, element }
    }
}

impl fmt::Display for ScoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.score, self.element.0)
    }
}
