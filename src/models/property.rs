//! Element properties changed through the undo layer

use crate::config::Placement;
use serde::{Deserialize, Serialize};

/// Property identifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pid {
    /// Display text, stored as escaped XML text
    Text,
    TextStyle,
    Placement,
    MinDistance,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextStyleType {
    #[default]
    InstrumentChange,
    Staff,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Text(String),
    TextStyle(TextStyleType),
    Placement(Placement),
    /// Distance in spatium units
    Spatium(f64),
}
