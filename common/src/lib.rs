use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

mod error;

pub use self::error::{NoPaletteError, ParseColorError, PixelError, SelectionFailure};

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared euclidean distance in RGB space.
    ///
    /// Ordering by this is the same as ordering by the true distance, so the
    /// square root is never taken.
    pub fn distance_sq(self, other: Self) -> u32 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);

        (dr * dr + dg * dg + db * db) as u32
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Accepts `#rrggbb`, `#rgb`, with or without the leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        // from_str_radix alone would let a leading '+' through
        if let Some(bad) = hex.chars().find(|digit| !digit.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidDigit(bad));
        }

        match hex.len() {
            6 => Ok(Self {
                r: u8::from_str_radix(&hex[0..2], 16)?,
                g: u8::from_str_radix(&hex[2..4], 16)?,
                b: u8::from_str_radix(&hex[4..6], 16)?,
            }),
            3 => {
                let digit = |idx: usize| u8::from_str_radix(&hex[idx..=idx], 16).map(|v| v * 17);
                Ok(Self {
                    r: digit(0)?,
                    g: digit(1)?,
                    b: digit(2)?,
                })
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

/// Loose pixel shape as it arrives from callers and JSON documents.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PixelRecord {
    pub x: i64,
    pub y: i64,
    pub color: String,
}

/// A validated pixel, relative to the drawing origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "PixelRecord", into = "PixelRecord")]
pub struct Pixel {
    pub x: u32,
    pub y: u32,
    pub color: Rgb,
}

impl Pixel {
    pub const fn new(x: u32, y: u32, color: Rgb) -> Self {
        Self { x, y, color }
    }
}

impl TryFrom<PixelRecord> for Pixel {
    type Error = PixelError;

    fn try_from(record: PixelRecord) -> Result<Self, Self::Error> {
        let coordinate = |axis, value: i64| {
            u32::try_from(value).map_err(|_| PixelError::Coordinate { axis, value })
        };

        let color = record
            .color
            .parse()
            .map_err(|source| PixelError::Color {
                color: record.color.clone(),
                source,
            })?;

        Ok(Self {
            x: coordinate('x', record.x)?,
            y: coordinate('y', record.y)?,
            color,
        })
    }
}

impl From<Pixel> for PixelRecord {
    fn from(pixel: Pixel) -> Self {
        Self {
            x: i64::from(pixel.x),
            y: i64::from(pixel.y),
            color: pixel.color.to_string(),
        }
    }
}

/// A color the canvas can select, with whatever the canvas needs to select it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteEntry<H> {
    pub rgb: Rgb,
    pub handle: H,
}

/// Finds the palette entry nearest to `target`.
///
/// Ties go to the entry that comes first in the palette.
pub fn closest<H>(
    target: Rgb,
    palette: &[PaletteEntry<H>],
) -> Result<&PaletteEntry<H>, NoPaletteError> {
    let mut best: Option<(&PaletteEntry<H>, u32)> = None;

    for entry in palette {
        let distance = target.distance_sq(entry.rgb);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((entry, distance));
        }
    }

    best.map(|(entry, _)| entry).ok_or(NoPaletteError)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(colors: &[Rgb]) -> Vec<PaletteEntry<usize>> {
        colors
            .iter()
            .enumerate()
            .map(|(handle, &rgb)| PaletteEntry { rgb, handle })
            .collect()
    }

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!("#FF0000".parse(), Ok(Rgb::new(255, 0, 0)));
        assert_eq!("00ff7f".parse(), Ok(Rgb::new(0, 255, 127)));
        assert_eq!("#fa0".parse(), Ok(Rgb::new(0xff, 0xaa, 0x00)));
        assert_eq!(Rgb::new(1, 2, 255).to_string(), "#0102ff");
    }

    #[test]
    fn rejects_bad_hex() {
        assert_eq!("#12345".parse::<Rgb>(), Err(ParseColorError::InvalidLength));
        assert_eq!("#gg0000".parse::<Rgb>(), Err(ParseColorError::InvalidDigit('g')));
        assert_eq!("#ä0000".parse::<Rgb>(), Err(ParseColorError::InvalidLength));

        for signed in ["+f+f+f", "#+1+2+3", "+ff+ff", "#+f0"] {
            assert!(
                matches!(signed.parse::<Rgb>(), Err(ParseColorError::InvalidDigit('+'))),
                "accepted {signed}"
            );
        }
    }

    #[test]
    fn closest_picks_minimum_distance() {
        let palette = palette(&[Rgb::BLACK, Rgb::new(250, 10, 10), Rgb::WHITE]);

        let entry = closest(Rgb::new(200, 0, 30), &palette).unwrap();
        assert_eq!(entry.handle, 1);

        let entry = closest(Rgb::new(240, 240, 230), &palette).unwrap();
        assert_eq!(entry.handle, 2);
    }

    #[test]
    fn closest_breaks_ties_by_scan_order() {
        let palette = palette(&[Rgb::new(0, 0, 10), Rgb::new(0, 0, 30), Rgb::new(0, 0, 10)]);

        let entry = closest(Rgb::new(0, 0, 20), &palette).unwrap();
        assert_eq!(entry.handle, 0);

        let entry = closest(Rgb::new(0, 0, 10), &palette).unwrap();
        assert_eq!(entry.handle, 0);
    }

    #[test]
    fn closest_on_empty_palette() {
        let palette: Vec<PaletteEntry<()>> = Vec::new();
        assert_eq!(closest(Rgb::WHITE, &palette), Err(NoPaletteError));
    }

    #[test]
    fn pixel_validation() {
        let record = |x, y, color: &str| PixelRecord {
            x,
            y,
            color: color.into(),
        };

        assert_eq!(
            Pixel::try_from(record(3, 4, "#00FF00")),
            Ok(Pixel::new(3, 4, Rgb::new(0, 255, 0)))
        );
        assert!(matches!(
            Pixel::try_from(record(-1, 4, "#00FF00")),
            Err(PixelError::Coordinate { axis: 'x', value: -1 })
        ));
        assert!(matches!(
            Pixel::try_from(record(1, i64::MAX, "#00FF00")),
            Err(PixelError::Coordinate { axis: 'y', .. })
        ));
        assert!(matches!(
            Pixel::try_from(record(1, 1, "red")),
            Err(PixelError::Color { .. })
        ));
    }

    #[test]
    fn pixel_json_shape() {
        let pixel: Pixel =
            serde_json::from_str(r##"{"x": 1, "y": 2, "color": "#ABCDEF"}"##).unwrap();
        assert_eq!(pixel, Pixel::new(1, 2, Rgb::new(0xab, 0xcd, 0xef)));

        let json = serde_json::to_value(pixel).unwrap();
        assert_eq!(json, serde_json::json!({"x": 1, "y": 2, "color": "#abcdef"}));

        assert!(serde_json::from_str::<Pixel>(r##"{"y": 2, "color": "#ABCDEF"}"##).is_err());
        assert!(
            serde_json::from_str::<Pixel>(r##"{"x": "1", "y": 2, "color": "#ABCDEF"}"##).is_err()
        );
        assert!(serde_json::from_str::<Pixel>(r#"{"x": 1, "y": 2, "color": 7}"#).is_err());
    }
}
