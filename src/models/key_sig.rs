//! Keys and key signature events

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;

/// A key, stored as its position on the circle of fifths
///
/// Negative values count flats, positive values count sharps.
#[repr(i8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize_repr, Deserialize_repr)]
pub enum Key {
    Cb = -7,
    Gb = -6,
    Db = -5,
    Ab = -4,
    Eb = -3,
    Bb = -2,
    F = -1,
    #[default]
    C = 0,
    G = 1,
    D = 2,
    A = 3,
    E = 4,
    B = 5,
    Fs = 6,
    Cs = 7,
}

impl Key {
    const ALL: [Key; 15] = [
        Key::Cb,
        Key::Gb,
        Key::Db,
        Key::Ab,
        Key::Eb,
        Key::Bb,
        Key::F,
        Key::C,
        Key::G,
        Key::D,
        Key::A,
        Key::E,
        Key::B,
        Key::Fs,
        Key::Cs,
    ];

    /// Key with the given number of sharps (positive) or flats (negative)
    pub fn from_fifths(fifths: i32) -> Option<Key> {
        usize::try_from(fifths + 7)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// Number of sharps (positive) or flats (negative)
    pub fn fifths(self) -> i32 {
        self as i32
    }

    /// Major-key tonic name
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Cb => "Cb",
            Key::Gb => "Gb",
            Key::Db => "Db",
            Key::Ab => "Ab",
            Key::Eb => "Eb",
            Key::Bb => "Bb",
            Key::F => "F",
            Key::C => "C",
            Key::G => "G",
            Key::D => "D",
            Key::A => "A",
            Key::E => "E",
            Key::B => "B",
            Key::Fs => "F#",
            Key::Cs => "C#",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Modal flavour of a key signature
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyMode {
    #[default]
    Unknown,
    /// Atonal: the staff deliberately has no key
    None,
    Major,
    Minor,
}

/// A key signature as recorded on a staff's key map
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySigEvent {
    pub key: Key,
    pub mode: KeyMode,
    /// Created by an instrument change rather than placed by the user
    #[serde(default)]
    pub for_instrument_change: bool,
}

impl KeySigEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ..Default::default()
        }
    }

    /// A key signature generated by an instrument change
    pub fn generated(key: Key) -> Self {
        Self {
            key,
            mode: KeyMode::Unknown,
            for_instrument_change: true,
        }
    }

    pub fn atonal() -> Self {
        Self {
            key: Key::C,
            mode: KeyMode::None,
            for_instrument_change: false,
        }
    }

    pub fn is_atonal(&self) -> bool {
        self.mode == KeyMode::None
    }
}
