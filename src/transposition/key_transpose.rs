//! Key signature transposition
//!
//! Keys live on the circle of fifths. A key is stored as its fifth count
//! (C = 0, G = 1, F = -1, ...) and its tonic spelled as a tonal pitch class
//! (TPC) by adding 14, so that keys with at most seven accidentals occupy
//! TPC 7 (C♭) through 21 (C♯).

use super::interval::{Interval, OCTAVE_SEMITONES};
use crate::models::Key;

const TPC_OFFSET: i32 = 14;
const MIN_KEY_TPC: i32 = 7;
const MAX_KEY_TPC: i32 = 21;

/// Transpose `key` by `interval`
///
/// The tonic is moved by the interval's fifth count and then respelled
/// enharmonically (±12 fifths) until it has no more than seven sharps or
/// seven flats.
pub fn transpose_key(key: Key, interval: Interval) -> Key {
    if interval.is_zero() {
        return key;
    }

    let mut tpc = key.fifths() + TPC_OFFSET + interval.fifths();
    while tpc > MAX_KEY_TPC {
        tpc -= OCTAVE_SEMITONES;
    }
    while tpc < MIN_KEY_TPC {
        tpc += OCTAVE_SEMITONES;
    }

    // Always in range after the wrap above
    Key::from_fifths(tpc - TPC_OFFSET).unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unison_keeps_key() {
        assert_eq!(transpose_key(Key::Fs, Interval::default()), Key::Fs);
        assert_eq!(transpose_key(Key::Cb, Interval::default()), Key::Cb);
    }

    #[test]
    fn test_b_flat_instrument() {
        // Concert C for a B♭ clarinet reads in D; transposing back goes down
        assert_eq!(transpose_key(Key::C, Interval::new(-1, -2)), Key::Bb);
        assert_eq!(transpose_key(Key::D, Interval::new(-1, -2)), Key::C);
        assert_eq!(transpose_key(Key::C, Interval::new(1, 2)), Key::D);
    }

    #[test]
    fn test_e_flat_instrument() {
        assert_eq!(transpose_key(Key::C, Interval::new(-5, -9)), Key::Eb);
        assert_eq!(transpose_key(Key::A, Interval::new(-5, -9)), Key::C);
    }

    #[test]
    fn test_octave_does_not_change_key() {
        assert_eq!(transpose_key(Key::E, Interval::new(7, 12)), Key::E);
        assert_eq!(transpose_key(Key::Ab, Interval::new(-7, -12)), Key::Ab);
    }

    #[test]
    fn test_respelling_stays_within_seven_accidentals() {
        // C♯ major up a minor second would be D major, fine
        assert_eq!(transpose_key(Key::Cs, Interval::new(1, 1)), Key::D);
        // B major up an augmented unison is B♯, respelled as C
        assert_eq!(transpose_key(Key::B, Interval::new(0, 1)), Key::C);
        // G♭ major down a minor second is F major
        assert_eq!(transpose_key(Key::Gb, Interval::new(-1, -1)), Key::F);
        // C♭ down a major second would be B♭♭, respelled as A
        assert_eq!(transpose_key(Key::Cb, Interval::new(-1, -2)), Key::A);
    }
}
