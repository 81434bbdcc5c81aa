//! Score XML for instrument changes
//!
//! An instrument change is stored as an `<InstrumentChange>` element holding
//! its `<Instrument>` snapshot, an optional `<init>` marker and its text
//! properties. Its position is not part of the element; the surrounding
//! score file supplies it through a [`ReadContext`].
//!
//! ```xml
//! <InstrumentChange>
//!   <Instrument id="a-clarinet">
//!     <longName>Clarinet in A</longName>
//!     <trackName>Clarinet in A</trackName>
//!     <transposeDiatonic>-2</transposeDiatonic>
//!     <transposeChromatic>-3</transposeChromatic>
//!     <clef>G</clef>
//!   </Instrument>
//!   <init>1</init>
//!   <text>To Clarinet in A</text>
//! </InstrumentChange>
//! ```

pub mod compat;
pub mod reader;
pub mod writer;

pub use compat::{migrate, Migration, MIGRATIONS, TRANSPOSITION_FIX_VERSION};
pub use reader::{read_instrument, read_instrument_change};
pub use writer::{write_instrument, write_instrument_change, write_instrument_change_to};

use crate::config::EngravingStyle;
use crate::errors::EngravingError;
use crate::models::{ElementId, Score, StaffId, Tick};
use crate::transposition::Interval;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MscError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid value {value:?} in <{tag}>")]
    Malformed { tag: String, value: String },
    #[error("unknown clef {0:?}")]
    UnknownClef(String),
    #[error("missing <{0}> element")]
    MissingElement(&'static str),
    #[error("document ended inside <{0}>")]
    UnexpectedEof(String),
    #[error(transparent)]
    Engraving(#[from] EngravingError),
}

pub type Result<T> = std::result::Result<T, MscError>;

/// Where an element being read sits in its score
#[derive(Clone, Debug)]
pub struct ReadContext {
    /// Format version of the file being read
    pub msc_version: u32,
    pub staff: StaffId,
    pub tick: Tick,
    /// Transposition in effect on the staff at `tick`, when the staff is known
    pub staff_transpose: Option<Interval>,
    pub style: EngravingStyle,
}

impl ReadContext {
    pub fn for_score(score: &Score, staff: StaffId, tick: Tick) -> Self {
        let staff_transpose = score
            .staff(staff)
            .ok()
            .and_then(|_| score.part(staff.part).ok())
            .map(|part| part.instrument_at(tick).transpose());
        Self {
            msc_version: score.msc_version,
            staff,
            tick,
            staff_transpose,
            style: score.style.clone(),
        }
    }
}

/// Receives tags a reader does not understand
pub trait UnknownElementSink {
    fn unknown_element(&mut self, parent: &str, tag: &str);
}

/// Reports unknown tags through the log
#[derive(Clone, Copy, Debug, Default)]
pub struct LogUnknownElements;

impl UnknownElementSink for LogUnknownElements {
    fn unknown_element(&mut self, parent: &str, tag: &str) {
        log::warn!("Unknown element <{}> in <{}>, skipped", tag, parent);
    }
}

impl UnknownElementSink for Vec<String> {
    fn unknown_element(&mut self, _parent: &str, tag: &str) {
        self.push(tag.to_string());
    }
}

/// Read an `<InstrumentChange>` and insert it into `score` at (`staff`, `tick`)
pub fn load_instrument_change(
    score: &mut Score,
    staff: StaffId,
    tick: Tick,
    xml: &str,
    unknown: &mut dyn UnknownElementSink,
) -> Result<ElementId> {
    let ctx = ReadContext::for_score(score, staff, tick);
    let ic = read_instrument_change(xml, &ctx, unknown)?;
    let id = score.insert_instrument_change(ic)?;
    log::debug!("Loaded instrument change {} at tick {} (version {})", id.0, tick, ctx.msc_version);
    Ok(id)
}
