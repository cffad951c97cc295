//! Places a loaded pixel sequence onto a [`Canvas`], one pixel at a time.
//!
//! A run walks the sequence in order. For every pixel it resolves the nearest
//! palette color, selects it, waits for the settle delay, clicks, and then
//! waits for the inter-pixel delay. Stop requests are honoured before each
//! pixel, never halfway through one.

use crate::Canvas;
use dabble_common::{NoPaletteError, PaletteEntry, Pixel, PixelRecord};
use dabble_process::{LoadError, Preset};
use monoio::time::sleep;
use std::{
    mem,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Every pixel was visited.
    Finished,
    /// A stop was requested before the sequence ran out.
    Stopped,
    /// Another run was already in progress; nothing happened.
    AlreadyRunning,
    /// There were no pixels to place; nothing happened.
    NothingLoaded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub status: RunStatus,
    pub cursor: usize,
    pub placed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunReport {
    fn new(status: RunStatus, cursor: usize) -> Self {
        Self {
            status,
            cursor,
            placed: 0,
            skipped: 0,
            failed: 0,
        }
    }
}

/// Requests a running [`Scheduler`] to stop at the next pixel boundary.
#[derive(Clone, Debug)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        if self.0.swap(false, Ordering::AcqRel) {
            info!("stop requested");
        }
    }
}

pub struct Scheduler<H> {
    palette: Vec<PaletteEntry<H>>,
    pixels: Vec<Pixel>,
    origin: (u32, u32),
    delay: Duration,
    settle_delay: Duration,
    skip_present: bool,
    running: Arc<AtomicBool>,
    cursor: AtomicUsize,
}

impl<H> Scheduler<H> {
    pub fn new(palette: Vec<PaletteEntry<H>>) -> Self {
        Self {
            palette,
            pixels: Vec::new(),
            origin: (0, 0),
            delay: DEFAULT_DELAY,
            settle_delay: DEFAULT_SETTLE_DELAY,
            skip_present: false,
            running: Arc::new(AtomicBool::new(false)),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Creates a scheduler using the palette the canvas currently offers.
    pub fn attach<C>(canvas: &mut C) -> Self
    where
        C: Canvas<Handle = H>,
    {
        let palette = canvas.palette();
        info!("found {} colors in the palette", palette.len());

        Self::new(palette)
    }

    pub fn refresh_palette<C>(&mut self, canvas: &mut C)
    where
        C: Canvas<Handle = H>,
    {
        self.palette = canvas.palette();
        info!("palette refreshed, {} colors", self.palette.len());
    }

    pub fn set_origin(&mut self, x: u32, y: u32) {
        self.origin = (x, y);
        info!("origin set to ({x}, {y})");
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
        info!(?delay, "delay set");
    }

    /// Pause between selecting a color and clicking.
    pub fn set_settle_delay(&mut self, delay: Duration) {
        self.settle_delay = delay;
        info!(?delay, "settle delay set");
    }

    /// Skip pixels whose target color the canvas already shows.
    ///
    /// Only has an effect on canvases that implement [`Canvas::probe`].
    pub fn set_skip_present(&mut self, skip: bool) {
        self.skip_present = skip;
        info!(skip, "skip present set");
    }

    pub fn load_preset(&mut self, preset: Preset) {
        self.replace_pixels(&preset.to_string(), preset.pixels());
    }

    pub fn load_from_pixels(
        &mut self,
        records: impl IntoIterator<Item = PixelRecord>,
    ) -> Result<(), LoadError> {
        let pixels = dabble_process::load_pixels(records).inspect_err(log_load_error)?;
        self.replace_pixels("pixel records", pixels);
        Ok(())
    }

    pub fn load_from_json(&mut self, text: &str) -> Result<(), LoadError> {
        let pixels = dabble_process::load_json(text).inspect_err(log_load_error)?;
        self.replace_pixels("pixel document", pixels);
        Ok(())
    }

    pub fn load_from_image_bytes(
        &mut self,
        bytes: &[u8],
        max_width: u32,
        max_height: u32,
    ) -> Result<(), LoadError> {
        let pixels = dabble_process::load_image_bytes(bytes, max_width, max_height)
            .inspect_err(log_load_error)?;
        self.replace_pixels("image", pixels);
        Ok(())
    }

    pub fn load_from_image_path(
        &mut self,
        path: &Path,
        max_width: u32,
        max_height: u32,
    ) -> Result<(), LoadError> {
        let pixels = dabble_process::load_image_path(path, max_width, max_height)
            .inspect_err(log_load_error)?;
        self.replace_pixels(&path.display().to_string(), pixels);
        Ok(())
    }

    /// Randomizes the order rows are drawn in.
    pub fn shuffle_rows(&mut self) {
        let pixels = mem::take(&mut self.pixels);
        self.pixels = dabble_process::shuffle_rows(pixels, &mut rand::thread_rng());
    }

    fn replace_pixels(&mut self, source: &str, pixels: Vec<Pixel>) {
        let summary = dabble_process::summarize(&pixels);
        info!(
            source,
            pixels = pixels.len(),
            width = summary.width,
            height = summary.height,
            colors = summary.colors,
            "image loaded"
        );

        self.pixels = pixels;
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn palette(&self) -> &[PaletteEntry<H>] {
        &self.palette
    }

    pub fn origin(&self) -> (u32, u32) {
        self.origin
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Index of the next pixel to visit.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.running))
    }

    pub fn stop(&self) {
        self.stop_handle().stop();
    }

    /// Runs through the loaded pixels until they are all visited or a stop is requested.
    ///
    /// Calling this while a run is in progress, or with nothing loaded, logs a
    /// warning and returns without touching the canvas.
    pub async fn start<C>(&self, canvas: &mut C) -> Result<RunReport, NoPaletteError>
    where
        C: Canvas<Handle = H>,
    {
        if self.pixels.is_empty() {
            warn!("load an image first!");
            return Ok(RunReport::new(RunStatus::NothingLoaded, self.cursor()));
        }

        if self.palette.is_empty() {
            error!("palette is empty, refusing to start");
            return Err(NoPaletteError);
        }

        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("already running!");
            return Ok(RunReport::new(RunStatus::AlreadyRunning, self.cursor()));
        }

        let guard = RunGuard(&self.running);
        self.cursor.store(0, Ordering::Relaxed);
        info!(pixels = self.pixels.len(), origin = ?self.origin, "starting run");

        let result = self.drive(canvas).await;
        drop(guard);

        let report = result?;
        info!(
            status = ?report.status,
            cursor = report.cursor,
            placed = report.placed,
            skipped = report.skipped,
            failed = report.failed,
            "run ended"
        );

        Ok(report)
    }

    async fn drive<C>(&self, canvas: &mut C) -> Result<RunReport, NoPaletteError>
    where
        C: Canvas<Handle = H>,
    {
        let total = self.pixels.len();
        let mut report = RunReport::new(RunStatus::Finished, 0);

        loop {
            let cursor = self.cursor.load(Ordering::Relaxed);
            let Some(pixel) = self.pixels.get(cursor) else {
                break;
            };

            if !self.running.load(Ordering::Acquire) {
                report.status = RunStatus::Stopped;
                break;
            }

            let x = self.origin.0.saturating_add(pixel.x);
            let y = self.origin.1.saturating_add(pixel.y);
            let entry = dabble_common::closest(pixel.color, &self.palette)?;

            if self.skip_present && canvas.probe(x, y) == Some(entry.rgb) {
                debug!(x, y, color = %entry.rgb, "color already present");
                report.skipped += 1;
                self.cursor.store(cursor + 1, Ordering::Relaxed);
                continue;
            }

            match canvas.select(&entry.handle) {
                Ok(()) => {
                    if !self.settle_delay.is_zero() {
                        sleep(self.settle_delay).await;
                    }
                    canvas.click(x, y);
                    report.placed += 1;
                    info!("pixel {}/{total} placed at ({x}, {y})", cursor + 1);
                }
                Err(error) => {
                    warn!(%error, x, y, color = %entry.rgb, "skipping pixel");
                    report.failed += 1;
                }
            }

            self.cursor.store(cursor + 1, Ordering::Relaxed);
            sleep(self.delay).await;
        }

        report.cursor = self.cursor();
        Ok(report)
    }
}

/// Clears the running flag when a run ends, including when its future is dropped.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn log_load_error(error: &LoadError) {
    error!(%error, "failed to load pixels");
}
