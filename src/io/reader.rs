//! Reading instrument changes

use super::compat::migrate;
use super::{MscError, ReadContext, Result, UnknownElementSink};
use crate::config::Placement;
use crate::models::{ClefType, InitState, Instrument, InstrumentChange, Pid, PropertyValue};
use crate::transposition::Interval;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::str::FromStr;

const INSTRUMENT_CHANGE: &str = "InstrumentChange";
const INSTRUMENT: &str = "Instrument";

/// Read an `<InstrumentChange>` fragment
///
/// Tags the reader does not know go to `unknown` and are skipped. After the
/// element is read the format migrations for `ctx.msc_version` are applied.
pub fn read_instrument_change(
    xml: &str,
    ctx: &ReadContext,
    unknown: &mut dyn UnknownElementSink,
) -> Result<InstrumentChange> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut ic = InstrumentChange::new(ctx.staff, ctx.tick, Instrument::default(), &ctx.style);
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == INSTRUMENT_CHANGE.as_bytes() => {
                read_instrument_change_body(&mut reader, &mut ic, unknown)?;
                break;
            }
            Event::Empty(e) if e.name().as_ref() == INSTRUMENT_CHANGE.as_bytes() => break,
            Event::Start(_) | Event::Empty(_) | Event::Eof => {
                return Err(MscError::MissingElement(INSTRUMENT_CHANGE));
            }
            _ => {}
        }
    }

    let applied = migrate(&mut ic, ctx);
    log::trace!(
        "Read instrument change to {} ({} migrations)",
        ic.instrument().track_name,
        applied
    );
    Ok(ic)
}

fn read_instrument_change_body(
    reader: &mut Reader<&[u8]>,
    ic: &mut InstrumentChange,
    unknown: &mut dyn UnknownElementSink,
) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"Instrument" => {
                    let instrument = read_instrument_body(reader, &e, unknown)?;
                    ic.set_instrument(instrument);
                }
                b"init" => {
                    let value = read_value(reader, &e)?;
                    ic.restore_state(InitState::from(parse_bool("init", value)?));
                }
                b"text" => {
                    // Kept escaped, as stored
                    let raw = reader.read_text(e.name())?;
                    ic.set_xml_text(raw.into_owned());
                }
                b"placement" => {
                    let value = read_value(reader, &e)?;
                    let placement = Placement::from_str_opt(&value).ok_or_else(|| MscError::Malformed {
                        tag: "placement".to_string(),
                        value,
                    })?;
                    ic.set_property(Pid::Placement, PropertyValue::Placement(placement))?;
                }
                b"minDistance" => {
                    let distance = parse_value("minDistance", read_value(reader, &e)?)?;
                    ic.set_property(Pid::MinDistance, PropertyValue::Spatium(distance))?;
                }
                _ => {
                    unknown.unknown_element(INSTRUMENT_CHANGE, &tag_name(&e));
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"Instrument" => {
                    ic.set_instrument(Instrument::default());
                }
                b"text" => ic.set_xml_text(""),
                _ => unknown.unknown_element(INSTRUMENT_CHANGE, &tag_name(&e)),
            },
            Event::End(e) if e.name().as_ref() == INSTRUMENT_CHANGE.as_bytes() => return Ok(()),
            Event::Eof => return Err(MscError::UnexpectedEof(INSTRUMENT_CHANGE.to_string())),
            _ => {}
        }
    }
}

/// Read a standalone `<Instrument>` fragment
pub fn read_instrument(xml: &str, unknown: &mut dyn UnknownElementSink) -> Result<Instrument> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == INSTRUMENT.as_bytes() => {
                return read_instrument_body(&mut reader, &e, unknown);
            }
            Event::Empty(e) if e.name().as_ref() == INSTRUMENT.as_bytes() => {
                let mut instrument = Instrument::default();
                if let Some(id) = attribute(&e, b"id") {
                    instrument.id = id;
                }
                return Ok(instrument);
            }
            Event::Start(_) | Event::Empty(_) | Event::Eof => {
                return Err(MscError::MissingElement(INSTRUMENT));
            }
            _ => {}
        }
    }
}

fn read_instrument_body(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    unknown: &mut dyn UnknownElementSink,
) -> Result<Instrument> {
    let mut instrument = Instrument::default();
    if let Some(id) = attribute(start, b"id") {
        instrument.id = id;
    }
    let mut transpose = Interval::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"longName" => instrument.long_name = read_value(reader, &e)?,
                b"shortName" => instrument.short_name = read_value(reader, &e)?,
                b"trackName" => instrument.track_name = read_value(reader, &e)?,
                b"transposeDiatonic" => {
                    transpose.diatonic = parse_value("transposeDiatonic", read_value(reader, &e)?)?;
                }
                b"transposeChromatic" => {
                    transpose.chromatic = parse_value("transposeChromatic", read_value(reader, &e)?)?;
                }
                tag @ (b"clef" | b"concertClef" | b"transposingClef") => {
                    let idx = staff_index(&e)?;
                    let name = read_value(reader, &e)?;
                    let clef = ClefType::from_tag(&name).ok_or(MscError::UnknownClef(name))?;
                    match tag {
                        b"clef" => instrument.set_clef_type(idx, clef.into()),
                        b"concertClef" => instrument.set_concert_clef(idx, clef),
                        _ => instrument.set_transposing_clef(idx, clef),
                    }
                }
                _ => {
                    unknown.unknown_element(INSTRUMENT, &tag_name(&e));
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"longName" | b"shortName" | b"trackName" => {}
                _ => unknown.unknown_element(INSTRUMENT, &tag_name(&e)),
            },
            Event::End(e) if e.name().as_ref() == INSTRUMENT.as_bytes() => break,
            Event::Eof => return Err(MscError::UnexpectedEof(INSTRUMENT.to_string())),
            _ => {}
        }
    }

    instrument.set_transpose(transpose);
    Ok(instrument)
}

/// Unescaped, trimmed text content of the element `start` opened
fn read_value(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<String> {
    let raw = reader.read_text(start.name())?;
    let text = unescape(&raw).map_err(quick_xml::Error::from)?;
    Ok(text.trim().to_string())
}

fn parse_value<T: FromStr>(tag: &str, value: String) -> Result<T> {
    value.parse().map_err(|_| MscError::Malformed {
        tag: tag.to_string(),
        value,
    })
}

fn parse_bool(tag: &str, value: String) -> Result<bool> {
    match value.as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(MscError::Malformed {
            tag: tag.to_string(),
            value,
        }),
    }
}

fn attribute(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| String::from_utf8(attr.value.to_vec()).ok())
}

/// 0-based staff index from the 1-based `staff` attribute
fn staff_index(e: &BytesStart) -> Result<usize> {
    let Some(value) = attribute(e, b"staff") else {
        return Ok(0);
    };
    match value.parse::<usize>() {
        Ok(staff) if staff >= 1 => Ok(staff - 1),
        _ => Err(MscError::Malformed {
            tag: tag_name(e),
            value,
        }),
    }
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}
