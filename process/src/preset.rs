use crate::LoadError;
use dabble_common::{Pixel, Rgb};
use std::{fmt, str::FromStr};

const RED: Rgb = Rgb::new(0xff, 0, 0);
const YELLOW: Rgb = Rgb::new(0xff, 0xff, 0);

// w = white, r = red, y = yellow, b = black
const HEART: [&str; 7] = [
    "wrrwrrw", //
    "rrrrrrr",
    "rrrrrrr",
    "rrrrrrr",
    "wrrrrrw",
    "wwrrrww",
    "wwwrwww",
];

const SMILEY: [&str; 7] = [
    "wwyyyww", //
    "wyyyyyw",
    "yybybyy",
    "yyyyyyy",
    "ybyyyby",
    "wybbbyw",
    "wwyyyww",
];

/// Built-in bitmaps that can be drawn without any external input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Heart,
    Smiley,
}

impl Preset {
    fn rows(self) -> &'static [&'static str] {
        match self {
            Self::Heart => &HEART,
            Self::Smiley => &SMILEY,
        }
    }

    /// Row-major pixels of the preset. Every cell is opaque.
    pub fn pixels(self) -> Vec<Pixel> {
        let mut pixels = Vec::new();
        for (y, row) in self.rows().iter().enumerate() {
            for (x, cell) in row.bytes().enumerate() {
                let color = match cell {
                    b'r' => RED,
                    b'y' => YELLOW,
                    b'b' => Rgb::BLACK,
                    _ => Rgb::WHITE,
                };

                pixels.push(Pixel::new(x as u32, y as u32, color));
            }
        }

        pixels
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Heart => "heart",
            Self::Smiley => "smiley",
        })
    }
}

impl FromStr for Preset {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heart" => Ok(Self::Heart),
            "smiley" => Ok(Self::Smiley),
            _ => Err(LoadError::UnknownPreset(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn heart_is_row_major() {
        let pixels = Preset::Heart.pixels();
        assert_eq!(pixels.len(), 49);

        assert_eq!(pixels[0], Pixel::new(0, 0, "#FFFFFF".parse().unwrap()));
        assert_eq!(pixels[1], Pixel::new(1, 0, "#FF0000".parse().unwrap()));
        assert_eq!(pixels[7], Pixel::new(0, 1, RED));
        assert_eq!(pixels[45], Pixel::new(3, 6, RED));
        assert_eq!(pixels[48], Pixel::new(6, 6, Rgb::WHITE));

        let order: Vec<(u32, u32)> = pixels.iter().map(|pixel| (pixel.y, pixel.x)).collect();
        assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(pixels.iter().map(|pixel| pixel.color).unique().count(), 2);
    }

    #[test]
    fn smiley_colors() {
        let pixels = Preset::Smiley.pixels();
        assert_eq!(pixels.len(), 49);

        // eyes
        assert_eq!(pixels[2 * 7 + 2].color, Rgb::BLACK);
        assert_eq!(pixels[2 * 7 + 4].color, Rgb::BLACK);
        assert_eq!(pixels[3 * 7 + 3].color, YELLOW);
        assert_eq!(pixels.iter().map(|pixel| pixel.color).unique().count(), 3);
    }

    #[test]
    fn parses_names() {
        assert_eq!("heart".parse::<Preset>().unwrap(), Preset::Heart);
        assert_eq!(" Smiley ".parse::<Preset>().unwrap(), Preset::Smiley);
        assert!(matches!(
            "star".parse::<Preset>(),
            Err(LoadError::UnknownPreset(name)) if name == "star"
        ));
        assert_eq!(Preset::Smiley.to_string(), "smiley");
    }
}
