#[macro_use]
extern crate tracing;

pub mod board;
mod canvas;
pub mod scheduler;

pub use self::{
    canvas::Canvas,
    scheduler::{RunReport, RunStatus, Scheduler, StopHandle},
};
pub use dabble_common::{NoPaletteError, PaletteEntry, Pixel, PixelRecord, Rgb, SelectionFailure};
pub use dabble_process::{LoadError, Preset};
