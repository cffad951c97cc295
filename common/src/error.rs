use std::num::ParseIntError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("invalid hex color length (expected 3 or 6 digits)")]
    InvalidLength,

    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),

    #[error("invalid hex digit: {0}")]
    InvalidHex(#[from] ParseIntError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelError {
    #[error("{axis} coordinate {value} is out of range")]
    Coordinate { axis: char, value: i64 },

    #[error("bad color {color:?}: {source}")]
    Color {
        color: String,
        #[source]
        source: ParseColorError,
    },
}

/// The palette had no entries to match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("palette is empty")]
pub struct NoPaletteError;

/// A canvas could not make a palette entry the active color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("selection failed: {0}")]
pub struct SelectionFailure(pub String);
