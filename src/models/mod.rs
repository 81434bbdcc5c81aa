//! Document model: scores, parts, staves and the elements this core edits

pub mod clef;
pub mod ids;
pub mod instrument;
pub mod instrument_change;
pub mod key_sig;
pub mod part;
pub mod property;
pub mod score;
pub mod segment;
pub mod staff;
pub mod timeline;

/// Score-global time position
pub type Tick = i32;

pub use clef::{ClefInfo, ClefType, StaffClef, SymId};
pub use ids::{ElementId, ElementRef, ScoreId};
pub use instrument::Instrument;
pub use instrument_change::{plain_to_xml_text, InitState, InstrumentChange};
pub use key_sig::{Key, KeyMode, KeySigEvent};
pub use part::Part;
pub use property::{Pid, PropertyValue, TextStyleType};
pub use score::{MasterScore, Score, MSC_VERSION};
pub use segment::{Clef, KeySig, Measure, Segment, SegmentElement, SegmentKey, SegmentType, UserClef};
pub use staff::{Staff, StaffId};
pub use timeline::{InstrumentTimeline, TickEnd};
