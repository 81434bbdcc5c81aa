//! Writing instrument changes

use super::Result;
use crate::config::EngravingStyle;
use crate::models::{Instrument, InstrumentChange, Pid, StaffClef};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Serialize `ic` as an indented `<InstrumentChange>` fragment
///
/// `style` decides which text properties are written: placement and minimum
/// distance only appear when they differ from the style defaults.
pub fn write_instrument_change(ic: &InstrumentChange, style: &EngravingStyle) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_instrument_change_to(&mut writer, ic, style)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Append `ic` to an existing writer
pub fn write_instrument_change_to<W: Write>(
    writer: &mut Writer<W>,
    ic: &InstrumentChange,
    style: &EngravingStyle,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("InstrumentChange")))?;
    write_instrument(writer, ic.instrument())?;

    if ic.is_initialized() {
        writer
            .create_element("init")
            .write_text_content(BytesText::new("1"))?;
    }

    if !ic.xml_text().is_empty() {
        // Already escaped
        writer
            .create_element("text")
            .write_text_content(BytesText::from_escaped(ic.xml_text()))?;
    }
    if ic.is_styled_override(Pid::Placement, style) {
        writer
            .create_element("placement")
            .write_text_content(BytesText::new(ic.placement().as_str()))?;
    }
    if ic.is_styled_override(Pid::MinDistance, style) {
        writer
            .create_element("minDistance")
            .write_text_content(BytesText::new(&ic.min_distance().to_string()))?;
    }

    writer.write_event(Event::End(BytesEnd::new("InstrumentChange")))?;
    Ok(())
}

/// Write an `<Instrument>` snapshot
pub fn write_instrument<W: Write>(writer: &mut Writer<W>, instrument: &Instrument) -> Result<()> {
    let mut start = BytesStart::new("Instrument");
    if !instrument.id.is_empty() {
        start.push_attribute(("id", instrument.id.as_str()));
    }
    writer.write_event(Event::Start(start))?;

    for (tag, name) in [
        ("longName", &instrument.long_name),
        ("shortName", &instrument.short_name),
        ("trackName", &instrument.track_name),
    ] {
        if !name.is_empty() {
            writer.create_element(tag).write_text_content(BytesText::new(name))?;
        }
    }

    let transpose = instrument.transpose();
    if transpose.diatonic != 0 {
        writer
            .create_element("transposeDiatonic")
            .write_text_content(BytesText::new(&transpose.diatonic.to_string()))?;
    }
    if transpose.chromatic != 0 {
        writer
            .create_element("transposeChromatic")
            .write_text_content(BytesText::new(&transpose.chromatic.to_string()))?;
    }

    for (idx, clef) in instrument.clefs.iter().enumerate() {
        write_clef(writer, idx, clef)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Instrument")))?;
    Ok(())
}

fn write_clef<W: Write>(writer: &mut Writer<W>, idx: usize, clef: &StaffClef) -> Result<()> {
    // Staff numbers are 1-based in the file; the first staff has no attribute
    let staff = (idx + 1).to_string();
    let mut element = |tag: &str, value: &str| -> Result<()> {
        let mut builder = writer.create_element(tag);
        if idx > 0 {
            builder = builder.with_attribute(("staff", staff.as_str()));
        }
        builder.write_text_content(BytesText::new(value))?;
        Ok(())
    };

    if clef.concert == clef.transposing {
        element("clef", clef.concert.tag())
    } else {
        element("concertClef", clef.concert.tag())?;
        element("transposingClef", clef.transposing.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Placement;
    use crate::models::{ClefType, PropertyValue, StaffId};
    use crate::transposition::Interval;

    fn clarinet_change() -> InstrumentChange {
        let instrument = Instrument::new("Clarinet in A")
            .with_id("a-clarinet")
            .with_transpose(Interval::new(-2, -3))
            .with_clef(0, ClefType::G);
        InstrumentChange::new(StaffId::new(0, 0), 480, instrument, &EngravingStyle::default())
    }

    #[test]
    fn test_init_written_only_when_initialized() {
        let style = EngravingStyle::default();
        let mut ic = clarinet_change();
        let xml = write_instrument_change(&ic, &style).unwrap();
        assert!(!xml.contains("<init>"));

        ic.mark_initialized();
        let xml = write_instrument_change(&ic, &style).unwrap();
        assert!(xml.contains("<init>1</init>"));
    }

    #[test]
    fn test_instrument_fields() {
        let xml = write_instrument_change(&clarinet_change(), &EngravingStyle::default()).unwrap();
        assert!(xml.contains(r#"<Instrument id="a-clarinet">"#));
        assert!(xml.contains("<trackName>Clarinet in A</trackName>"));
        assert!(xml.contains("<transposeDiatonic>-2</transposeDiatonic>"));
        assert!(xml.contains("<transposeChromatic>-3</transposeChromatic>"));
        assert!(xml.contains("<clef>G</clef>"));
        assert!(!xml.contains("<shortName>"));
    }

    #[test]
    fn test_split_clefs_use_staff_attribute() {
        let instrument = Instrument::new("Bass Clarinet")
            .with_clef(0, ClefType::G)
            .with_clef(1, StaffClef::new(ClefType::F, ClefType::G));
        let ic = InstrumentChange::new(StaffId::new(0, 0), 0, instrument, &EngravingStyle::default());
        let xml = write_instrument_change(&ic, &EngravingStyle::default()).unwrap();
        assert!(xml.contains(r#"<concertClef staff="2">F</concertClef>"#));
        assert!(xml.contains(r#"<transposingClef staff="2">G</transposingClef>"#));
    }

    #[test]
    fn test_text_is_not_escaped_twice() {
        let mut ic = clarinet_change();
        ic.set_plain_text("To Oboe & Cor");
        let xml = write_instrument_change(&ic, &EngravingStyle::default()).unwrap();
        assert!(xml.contains("<text>To Oboe &amp; Cor</text>"));
    }

    #[test]
    fn test_style_overrides_only() {
        let style = EngravingStyle::default();
        let mut ic = clarinet_change();
        let xml = write_instrument_change(&ic, &style).unwrap();
        assert!(!xml.contains("<placement>"));
        assert!(!xml.contains("<minDistance>"));

        ic.set_property(Pid::Placement, PropertyValue::Placement(Placement::Below)).unwrap();
        ic.set_property(Pid::MinDistance, PropertyValue::Spatium(1.5)).unwrap();
        let xml = write_instrument_change(&ic, &style).unwrap();
        assert!(xml.contains("<placement>below</placement>"));
        assert!(xml.contains("<minDistance>1.5</minDistance>"));
    }
}
