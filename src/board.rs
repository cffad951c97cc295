//! In-memory canvas backed by an RGB image.

use crate::Canvas;
use dabble_common::{PaletteEntry, Rgb, SelectionFailure};
use image::{ImageResult, RgbImage};
use std::path::Path;

pub const DEFAULT_PALETTE: [Rgb; 31] = [
    Rgb::new(0x00, 0x00, 0x00),
    Rgb::new(0x3c, 0x3c, 0x3c),
    Rgb::new(0x78, 0x78, 0x78),
    Rgb::new(0xd2, 0xd2, 0xd2),
    Rgb::new(0xff, 0xff, 0xff),
    Rgb::new(0x60, 0x00, 0x18),
    Rgb::new(0xed, 0x1c, 0x24),
    Rgb::new(0xff, 0x7f, 0x27),
    Rgb::new(0xf6, 0xaa, 0x09),
    Rgb::new(0xf9, 0xdd, 0x3b),
    Rgb::new(0xff, 0xfa, 0xbc),
    Rgb::new(0x0e, 0xb9, 0x68),
    Rgb::new(0x13, 0xe6, 0x7b),
    Rgb::new(0x87, 0xff, 0x5e),
    Rgb::new(0x0c, 0x81, 0x6e),
    Rgb::new(0x10, 0xae, 0xa6),
    Rgb::new(0x13, 0xe1, 0xbe),
    Rgb::new(0x28, 0x50, 0x9e),
    Rgb::new(0x40, 0x93, 0xe4),
    Rgb::new(0x60, 0xf7, 0xf2),
    Rgb::new(0x6b, 0x50, 0xf6),
    Rgb::new(0x99, 0xb1, 0xfb),
    Rgb::new(0x78, 0x0c, 0x99),
    Rgb::new(0xaa, 0x38, 0xb9),
    Rgb::new(0xe0, 0x9f, 0xf9),
    Rgb::new(0xcb, 0x00, 0x7a),
    Rgb::new(0xec, 0x1f, 0x80),
    Rgb::new(0xf3, 0x8d, 0xa9),
    Rgb::new(0x68, 0x46, 0x34),
    Rgb::new(0x95, 0x68, 0x2a),
    Rgb::new(0xf8, 0xb2, 0x77),
];

pub struct Board {
    image: RgbImage,
    palette: Vec<Rgb>,
    active: Option<usize>,
    placed: usize,
}

impl Board {
    /// A white board of the given size.
    pub fn blank(width: u32, height: u32, palette: Vec<Rgb>) -> Self {
        Self::with_background(RgbImage::from_pixel(width, height, image::Rgb([0xff; 3])), palette)
    }

    pub fn with_background(image: RgbImage, palette: Vec<Rgb>) -> Self {
        Self {
            image,
            palette,
            active: None,
            placed: 0,
        }
    }

    pub fn open(path: &Path, palette: Vec<Rgb>) -> ImageResult<Self> {
        let image = image::open(path)?.to_rgb8();
        Ok(Self::with_background(image, palette))
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Number of clicks that changed a pixel on the board.
    pub fn placed(&self) -> usize {
        self.placed
    }

    pub fn save(&self, path: &Path) -> ImageResult<()> {
        self.image.save(path)
    }

    fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.image.width() && y < self.image.height()
    }
}

impl Canvas for Board {
    type Handle = usize;

    fn palette(&mut self) -> Vec<PaletteEntry<usize>> {
        self.palette
            .iter()
            .enumerate()
            .map(|(handle, &rgb)| PaletteEntry { rgb, handle })
            .collect()
    }

    fn select(&mut self, handle: &usize) -> Result<(), SelectionFailure> {
        if *handle >= self.palette.len() {
            return Err(SelectionFailure(format!("no palette entry {handle}")));
        }

        self.active = Some(*handle);
        Ok(())
    }

    fn click(&mut self, x: u32, y: u32) {
        let Some(color) = self.active.map(|idx| self.palette[idx]) else {
            warn!(x, y, "click without an active color");
            return;
        };

        if !self.in_bounds(x, y) {
            warn!(x, y, "click outside of the board");
            return;
        }

        self.image.put_pixel(x, y, image::Rgb([color.r, color.g, color.b]));
        self.placed += 1;
    }

    fn probe(&mut self, x: u32, y: u32) -> Option<Rgb> {
        self.in_bounds(x, y)
            .then(|| Rgb::from(self.image.get_pixel(x, y).0))
    }
}
