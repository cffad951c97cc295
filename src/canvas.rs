use dabble_common::{PaletteEntry, Rgb, SelectionFailure};

/// Everything the scheduler needs from the surface it draws on.
pub trait Canvas {
    /// Identifies a selectable color on this canvas.
    type Handle;

    /// Enumerates the colors that can currently be selected.
    fn palette(&mut self) -> Vec<PaletteEntry<Self::Handle>>;

    /// Makes the color behind `handle` the active one for following clicks.
    fn select(&mut self, handle: &Self::Handle) -> Result<(), SelectionFailure>;

    /// Places the active color at an absolute coordinate.
    fn click(&mut self, x: u32, y: u32);

    /// Reads the color currently at an absolute coordinate, if the canvas can tell.
    fn probe(&mut self, x: u32, y: u32) -> Option<Rgb> {
        let _ = (x, y);
        None
    }
}
