#[macro_use]
extern crate tracing;

use dabble_common::{Pixel, PixelRecord, Rgb};
use image::{DynamicImage, GenericImageView, imageops::FilterType};
use itertools::Itertools;
use rand::{Rng, seq::SliceRandom};
use std::path::Path;

mod error;
mod preset;

pub use self::{error::LoadError, preset::Preset};

/// Pixels with an alpha below this are treated as transparent and dropped.
pub const OPACITY_THRESHOLD: u8 = 128;

/// Default bounding box for raster images, in pixels per side.
pub const DEFAULT_MAX_SIZE: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub width: u64,
    pub height: u64,
    pub colors: usize,
}

/// Extent (max x + 1 by max y + 1) and number of distinct colors.
pub fn summarize(pixels: &[Pixel]) -> Summary {
    Summary {
        width: pixels.iter().map(|pixel| u64::from(pixel.x) + 1).max().unwrap_or(0),
        height: pixels.iter().map(|pixel| u64::from(pixel.y) + 1).max().unwrap_or(0),
        colors: pixels.iter().map(|pixel| pixel.color).unique().count(),
    }
}

/// Validates caller supplied records. Either every record is valid or nothing is returned.
pub fn load_pixels(
    records: impl IntoIterator<Item = PixelRecord>,
) -> Result<Vec<Pixel>, LoadError> {
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            Pixel::try_from(record)
                .map_err(|error| LoadError::InvalidPixelFormat(format!("entry {idx}: {error}")))
        })
        .try_collect()
}

/// Parses a JSON array of `{"x": .., "y": .., "color": ".."}` records.
pub fn load_json(text: &str) -> Result<Vec<Pixel>, LoadError> {
    let records: Vec<PixelRecord> = serde_json::from_str(text)
        .map_err(|error| LoadError::InvalidPixelFormat(error.to_string()))?;

    load_pixels(records)
}

pub fn load_image_bytes(
    bytes: &[u8],
    max_width: u32,
    max_height: u32,
) -> Result<Vec<Pixel>, LoadError> {
    let image = image::load_from_memory(bytes)?;
    Ok(rasterize(&image, max_width, max_height))
}

pub fn load_image_path(
    path: &Path,
    max_width: u32,
    max_height: u32,
) -> Result<Vec<Pixel>, LoadError> {
    let image = image::open(path)?;
    Ok(rasterize(&image, max_width, max_height))
}

/// Scales `(width, height)` down to fit the bounding box, keeping the aspect ratio.
///
/// Images that already fit are left alone. Neither side drops below one pixel.
pub fn fit_within((width, height): (u32, u32), (max_width, max_height): (u32, u32)) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let scale = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    )
    .min(1.0);

    let scaled = |side: u32| ((f64::from(side) * scale).floor() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Samples the image row by row, dropping transparent pixels.
pub fn rasterize(image: &DynamicImage, max_width: u32, max_height: u32) -> Vec<Pixel> {
    let (width, height) = fit_within(image.dimensions(), (max_width, max_height));

    let resized;
    let image = if (width, height) == image.dimensions() {
        image
    } else {
        debug!(from = ?image.dimensions(), to = ?(width, height), "downscaling image");
        resized = image.resize_exact(width, height, FilterType::Nearest);
        &resized
    };

    image
        .pixels()
        .filter_map(|(x, y, pixel)| {
            let [r, g, b, a] = pixel.0;
            (a >= OPACITY_THRESHOLD).then(|| Pixel::new(x, y, Rgb::new(r, g, b)))
        })
        .collect()
}

/// Shuffles the order of rows (runs of pixels sharing a `y`), keeping each row intact.
pub fn shuffle_rows<R>(pixels: Vec<Pixel>, rng: &mut R) -> Vec<Pixel>
where
    R: Rng + ?Sized,
{
    let chunks = pixels.into_iter().chunk_by(|pixel| pixel.y);
    let mut rows: Vec<Vec<Pixel>> = chunks.into_iter().map(|(_y, row)| row.collect()).collect();
    rows.shuffle(rng);

    rows.into_iter().flatten().collect()
}
