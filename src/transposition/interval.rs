//! Transposition intervals
//!
//! An [`Interval`] is the (diatonic, chromatic) pair an instrument sounds
//! away from its written pitch. A B♭ clarinet is `(-1, -2)`: written C sounds
//! one step and two semitones lower.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Neg, Sub};

/// Semitones in an octave
pub const OCTAVE_SEMITONES: i32 = 12;

/// Diatonic steps in an octave
pub const OCTAVE_STEPS: i32 = 7;

/// A transposition offset in diatonic steps and chromatic semitones
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub diatonic: i32,
    pub chromatic: i32,
}

impl Interval {
    pub const fn new(diatonic: i32, chromatic: i32) -> Self {
        Self { diatonic, chromatic }
    }

    /// True for the unison interval (no transposition)
    pub fn is_zero(&self) -> bool {
        self.diatonic == 0 && self.chromatic == 0
    }

    /// True when the chromatic part is a whole number of octaves
    ///
    /// Octave-only transpositions never alter the pitch class, so they never
    /// call for a different key signature.
    pub fn is_octave_only(&self) -> bool {
        self.chromatic % OCTAVE_SEMITONES == 0
    }

    /// The inverse interval
    pub fn flip(&self) -> Self {
        Self::new(-self.diatonic, -self.chromatic)
    }

    /// Distance travelled around the circle of fifths
    ///
    /// One fifth is four diatonic steps and seven semitones, so the fifth
    /// count `f` satisfies `4f ≡ diatonic (mod 7)` and `7f ≡ chromatic
    /// (mod 12)`. Since 7 and 12 are coprime there is exactly one `f` in any
    /// window of 84; the window is centred on zero so that common intervals
    /// map to small fifth counts (minor second = -5, augmented unison = +7).
    pub fn fifths(&self) -> i32 {
        let steps = self.diatonic.rem_euclid(OCTAVE_STEPS);
        let semitones = self.chromatic.rem_euclid(OCTAVE_SEMITONES);
        (-42..42)
            .find(|f: &i32| {
                (f * 4).rem_euclid(OCTAVE_STEPS) == steps
                    && (f * 7).rem_euclid(OCTAVE_SEMITONES) == semitones
            })
            .unwrap_or(0)
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Interval) -> Interval {
        Interval::new(self.diatonic - rhs.diatonic, self.chromatic - rhs.chromatic)
    }
}

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        self.flip()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}/{:+}", self.diatonic, self.chromatic)
    }
}

/// Componentwise `a - b`
pub fn difference(a: Interval, b: Interval) -> Interval {
    a - b
}

/// True when `delta` moves by whole octaves only
pub fn is_octave_only(delta: Interval) -> bool {
    delta.is_octave_only()
}
