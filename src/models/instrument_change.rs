//! The instrument-change staff text
//!
//! An [`InstrumentChange`] sits at a (staff, tick) position, owns a snapshot
//! of the instrument the player switches to, and displays a label such as
//! "To Clarinet in B♭". Propagating the change into clefs, key signatures
//! and linked scores happens once, the first time an instrument is assigned;
//! [`InitState`] records whether that has already run.

use super::ids::ElementId;
use super::instrument::Instrument;
use super::property::{Pid, PropertyValue, TextStyleType};
use super::staff::StaffId;
use super::Tick;
use crate::config::{EngravingStyle, Placement};
use crate::errors::{EngravingError, Result};
use quick_xml::escape::{escape, unescape};
use serde::{Deserialize, Serialize};

/// Whether propagation has already run for an element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitState {
    /// Newly inserted, or read without an `init` marker
    #[default]
    Uninitialized,
    /// Propagation has run; later edits must not repeat it
    Initialized,
}

impl InitState {
    pub fn is_initialized(&self) -> bool {
        matches!(self, InitState::Initialized)
    }
}

impl From<bool> for InitState {
    fn from(initialized: bool) -> Self {
        if initialized {
            InitState::Initialized
        } else {
            InitState::Uninitialized
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstrumentChange {
    pub id: ElementId,
    pub staff: StaffId,
    pub tick: Tick,
    instrument: Instrument,
    state: InitState,
    /// Escaped XML text
    text: String,
    placement: Placement,
    min_distance: f64,
}

impl InstrumentChange {
    pub fn new(staff: StaffId, tick: Tick, instrument: Instrument, style: &EngravingStyle) -> Self {
        Self {
            id: ElementId::default(),
            staff,
            tick,
            instrument,
            state: InitState::Uninitialized,
            text: String::new(),
            placement: style.instrument_change_placement,
            min_distance: style.instrument_change_min_distance,
        }
    }

    pub fn part(&self) -> usize {
        self.staff.part
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn instrument_mut(&mut self) -> &mut Instrument {
        &mut self.instrument
    }

    /// Replace the snapshot wholesale, returning the old one
    pub fn set_instrument(&mut self, instrument: Instrument) -> Instrument {
        std::mem::replace(&mut self.instrument, instrument)
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// The one allowed transition, `Uninitialized -> Initialized`
    pub fn mark_initialized(&mut self) {
        self.state = InitState::Initialized;
    }

    /// Escaped XML text as stored in the score
    pub fn xml_text(&self) -> &str {
        &self.text
    }

    pub fn set_xml_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Text with XML escapes resolved
    pub fn plain_text(&self) -> String {
        unescape(&self.text)
            .map(|text| text.into_owned())
            .unwrap_or_else(|_| self.text.clone())
    }

    pub fn set_plain_text(&mut self, text: &str) {
        self.text = plain_to_xml_text(text);
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    pub fn get_property(&self, pid: Pid) -> PropertyValue {
        match pid {
            Pid::Text => PropertyValue::Text(self.text.clone()),
            Pid::TextStyle => PropertyValue::TextStyle(TextStyleType::InstrumentChange),
            Pid::Placement => PropertyValue::Placement(self.placement),
            Pid::MinDistance => PropertyValue::Spatium(self.min_distance),
        }
    }

    /// Set a property, returning its previous value
    pub fn set_property(&mut self, pid: Pid, value: PropertyValue) -> Result<PropertyValue> {
        let old = self.get_property(pid);
        match (pid, value) {
            (Pid::Text, PropertyValue::Text(text)) => self.text = text,
            (Pid::Placement, PropertyValue::Placement(placement)) => self.placement = placement,
            (Pid::MinDistance, PropertyValue::Spatium(distance)) => self.min_distance = distance,
            (Pid::TextStyle, PropertyValue::TextStyle(TextStyleType::InstrumentChange)) => {}
            (pid, _) => return Err(EngravingError::PropertyMismatch(pid)),
        }
        Ok(old)
    }

    pub fn property_default(pid: Pid, style: &EngravingStyle) -> PropertyValue {
        match pid {
            Pid::Text => PropertyValue::Text(String::new()),
            Pid::TextStyle => PropertyValue::TextStyle(TextStyleType::InstrumentChange),
            Pid::Placement => PropertyValue::Placement(style.instrument_change_placement),
            Pid::MinDistance => PropertyValue::Spatium(style.instrument_change_min_distance),
        }
    }

    /// True when `pid` differs from its style default
    pub fn is_styled_override(&self, pid: Pid, style: &EngravingStyle) -> bool {
        self.get_property(pid) != Self::property_default(pid, style)
    }

    pub(crate) fn restore_state(&mut self, state: InitState) {
        self.state = state;
    }
}

/// Escape plain text for storage as element text
pub fn plain_to_xml_text(text: &str) -> String {
    escape(text).into_owned()
}
