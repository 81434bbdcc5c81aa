//! Transposition arithmetic: intervals and key transposition

pub mod interval;
pub mod key_transpose;

pub use interval::{difference, is_octave_only, Interval};
pub use key_transpose::transpose_key;
