//! Clef types and the symbols used to draw them
//!
//! Several clef types share one glyph and differ only by the staff line they
//! sit on (the C clefs, baritone/subbass F clefs, French violin G clef).
//! Instrument changes compare clefs by symbol, never by type, so swapping an
//! alto for a tenor clef is not a visible change.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// SMuFL symbols for clefs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymId {
    GClef,
    GClef15mb,
    GClef8vb,
    GClef8va,
    GClef15ma,
    GClef8vbOld,
    GClef8vbParens,
    CClef,
    CClef8vb,
    FClef,
    FClef15mb,
    FClef8vb,
    FClef8va,
    FClef15ma,
    UnpitchedPercussionClef1,
    UnpitchedPercussionClef2,
    SixStringTabClef,
    FourStringTabClef,
}

impl SymId {
    /// The SMuFL name of the symbol
    pub fn name(&self) -> &'static str {
        match self {
            SymId::GClef => "gClef",
            SymId::GClef15mb => "gClef15mb",
            SymId::GClef8vb => "gClef8vb",
            SymId::GClef8va => "gClef8va",
            SymId::GClef15ma => "gClef15ma",
            SymId::GClef8vbOld => "gClef8vbOld",
            SymId::GClef8vbParens => "gClef8vbParens",
            SymId::CClef => "cClef",
            SymId::CClef8vb => "cClef8vb",
            SymId::FClef => "fClef",
            SymId::FClef15mb => "fClef15mb",
            SymId::FClef8vb => "fClef8vb",
            SymId::FClef8va => "fClef8va",
            SymId::FClef15ma => "fClef15ma",
            SymId::UnpitchedPercussionClef1 => "unpitchedPercussionClef1",
            SymId::UnpitchedPercussionClef2 => "unpitchedPercussionClef2",
            SymId::SixStringTabClef => "6stringTabClef",
            SymId::FourStringTabClef => "4stringTabClef",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClefType {
    #[default]
    G,
    G15mb,
    G8vb,
    G8va,
    G15ma,
    G8vbOld,
    G8vbParens,
    /// French violin clef
    G1,
    C1,
    C2,
    C3,
    C4,
    C5,
    /// Tenor clef an octave down
    C4Down8,
    F,
    F15mb,
    F8vb,
    F8va,
    F15ma,
    /// Baritone clef
    FBaritone,
    /// Subbass clef
    FSubbass,
    Perc,
    Perc2,
    Tab,
    Tab4,
}

/// Static description of a clef type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClefInfo {
    /// Name used in score files
    pub tag: &'static str,
    /// Staff line the clef sits on, counted from the bottom (0 for none)
    pub line: u8,
    pub sym: SymId,
    pub name: &'static str,
}

const fn info(tag: &'static str, line: u8, sym: SymId, name: &'static str) -> ClefInfo {
    ClefInfo { tag, line, sym, name }
}

impl ClefType {
    pub const ALL: [ClefType; 25] = [
        ClefType::G,
        ClefType::G15mb,
        ClefType::G8vb,
        ClefType::G8va,
        ClefType::G15ma,
        ClefType::G8vbOld,
        ClefType::G8vbParens,
        ClefType::G1,
        ClefType::C1,
        ClefType::C2,
        ClefType::C3,
        ClefType::C4,
        ClefType::C5,
        ClefType::C4Down8,
        ClefType::F,
        ClefType::F15mb,
        ClefType::F8vb,
        ClefType::F8va,
        ClefType::F15ma,
        ClefType::FBaritone,
        ClefType::FSubbass,
        ClefType::Perc,
        ClefType::Perc2,
        ClefType::Tab,
        ClefType::Tab4,
    ];

    pub fn info(self) -> ClefInfo {
        match self {
            ClefType::G => info("G", 2, SymId::GClef, "Treble clef"),
            ClefType::G15mb => info("G15mb", 2, SymId::GClef15mb, "Treble clef 15mb bassa"),
            ClefType::G8vb => info("G8vb", 2, SymId::GClef8vb, "Treble clef 8vb bassa"),
            ClefType::G8va => info("G8va", 2, SymId::GClef8va, "Treble clef 8va alta"),
            ClefType::G15ma => info("G15ma", 2, SymId::GClef15ma, "Treble clef 15ma alta"),
            ClefType::G8vbOld => info("G8vbo", 2, SymId::GClef8vbOld, "Double treble clef 8vb on 2nd line"),
            ClefType::G8vbParens => info("G8vbp", 2, SymId::GClef8vbParens, "Treble clef optional 8vb"),
            ClefType::G1 => info("G1", 1, SymId::GClef, "French violin clef"),
            ClefType::C1 => info("C1", 1, SymId::CClef, "Soprano clef"),
            ClefType::C2 => info("C2", 2, SymId::CClef, "Mezzo-soprano clef"),
            ClefType::C3 => info("C3", 3, SymId::CClef, "Alto clef"),
            ClefType::C4 => info("C4", 4, SymId::CClef, "Tenor clef"),
            ClefType::C5 => info("C5", 5, SymId::CClef, "Baritone clef (C clef)"),
            ClefType::C4Down8 => info("C4_8vb", 4, SymId::CClef8vb, "Tenor clef 8vb bassa"),
            ClefType::F => info("F", 4, SymId::FClef, "Bass clef"),
            ClefType::F15mb => info("F15mb", 4, SymId::FClef15mb, "Bass clef 15mb bassa"),
            ClefType::F8vb => info("F8vb", 4, SymId::FClef8vb, "Bass clef 8vb bassa"),
            ClefType::F8va => info("F_8va", 4, SymId::FClef8va, "Bass clef 8va alta"),
            ClefType::F15ma => info("F_15ma", 4, SymId::FClef15ma, "Bass clef 15ma alta"),
            ClefType::FBaritone => info("F3", 3, SymId::FClef, "Baritone clef (F clef)"),
            ClefType::FSubbass => info("F5", 5, SymId::FClef, "Subbass clef"),
            ClefType::Perc => info("PERC", 0, SymId::UnpitchedPercussionClef1, "Percussion"),
            ClefType::Perc2 => info("PERC2", 0, SymId::UnpitchedPercussionClef2, "Percussion"),
            ClefType::Tab => info("TAB", 0, SymId::SixStringTabClef, "Tablature"),
            ClefType::Tab4 => info("TAB4", 0, SymId::FourStringTabClef, "Tablature 4 lines"),
        }
    }

    pub fn tag(self) -> &'static str {
        self.info().tag
    }

    pub fn sym_id(self) -> SymId {
        self.info().sym
    }

    /// True when both clef types draw the same glyph
    pub fn same_symbol(self, other: ClefType) -> bool {
        self.sym_id() == other.sym_id()
    }

    /// Look a clef type up by its score-file tag
    pub fn from_tag(tag: &str) -> Option<ClefType> {
        CLEF_BY_TAG.get(tag).copied()
    }
}

impl fmt::Display for ClefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info().name)
    }
}

static CLEF_BY_TAG: Lazy<HashMap<&'static str, ClefType>> = Lazy::new(|| {
    ClefType::ALL
        .iter()
        .map(|clef| (clef.tag(), *clef))
        .collect()
});

/// The clefs an instrument uses on one staff
///
/// Concert-pitch and transposing views can use different clefs (a bass
/// clarinet reads treble clef but sounds in bass range).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffClef {
    pub concert: ClefType,
    pub transposing: ClefType,
}

impl StaffClef {
    pub fn new(concert: ClefType, transposing: ClefType) -> Self {
        Self { concert, transposing }
    }

    /// The clef shown in the given display mode
    pub fn for_mode(&self, concert_pitch: bool) -> ClefType {
        if concert_pitch {
            self.concert
        } else {
            self.transposing
        }
    }
}

impl From<ClefType> for StaffClef {
    fn from(clef: ClefType) -> Self {
        Self::new(clef, clef)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_unique() {
        assert_eq!(CLEF_BY_TAG.len(), ClefType::ALL.len());
        for clef in ClefType::ALL {
            assert_eq!(ClefType::from_tag(clef.tag()), Some(clef));
        }
        assert_eq!(ClefType::from_tag("nonsense"), None);
    }

    #[test]
    fn test_c_clefs_share_a_symbol() {
        assert!(ClefType::C3.same_symbol(ClefType::C4));
        assert!(ClefType::C1.same_symbol(ClefType::C5));
        assert!(!ClefType::C4.same_symbol(ClefType::C4Down8));
    }

    #[test]
    fn test_distinct_types_same_glyph() {
        assert_ne!(ClefType::G, ClefType::G1);
        assert!(ClefType::G.same_symbol(ClefType::G1));
        assert!(ClefType::F.same_symbol(ClefType::FBaritone));
        assert!(ClefType::F.same_symbol(ClefType::FSubbass));
        assert!(!ClefType::G.same_symbol(ClefType::G8vb));
        assert!(!ClefType::G.same_symbol(ClefType::F));
    }

    #[test]
    fn test_staff_clef_mode() {
        let bass_clarinet = StaffClef::new(ClefType::F, ClefType::G);
        assert_eq!(bass_clarinet.for_mode(true), ClefType::F);
        assert_eq!(bass_clarinet.for_mode(false), ClefType::G);
        assert_eq!(StaffClef::from(ClefType::C3).for_mode(false), ClefType::C3);
    }
}
