#[macro_use]
extern crate tracing;

use anyhow::bail;
use dabble::{
    Preset, Rgb, Scheduler,
    board::{Board, DEFAULT_PALETTE},
};
use std::{fs, path::PathBuf, time::Duration};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(argh::FromArgs)]
/// draw small pixel images onto a canvas, one placement at a time
struct Args {
    #[argh(option, default = "0")]
    /// x offset
    x_offset: u32,

    #[argh(option, default = "0")]
    /// y offset
    y_offset: u32,

    #[argh(option, default = "1000")]
    /// milliseconds to wait between pixels
    delay: u64,

    #[argh(option, default = "200")]
    /// milliseconds to wait between selecting a color and clicking
    settle: u64,

    #[argh(option)]
    /// built-in image to draw ("heart" or "smiley")
    preset: Option<Preset>,

    #[argh(option)]
    /// JSON file with a list of {x, y, color} pixels
    pixels: Option<PathBuf>,

    #[argh(option)]
    /// image file to draw
    image: Option<PathBuf>,

    #[argh(option, default = "dabble_process::DEFAULT_MAX_SIZE")]
    /// maximum width the image is scaled down to
    max_width: u32,

    #[argh(option, default = "dabble_process::DEFAULT_MAX_SIZE")]
    /// maximum height the image is scaled down to
    max_height: u32,

    #[argh(option)]
    /// comma separated hex colors available for drawing
    palette: Option<String>,

    #[argh(option)]
    /// image to use as the starting canvas
    canvas: Option<PathBuf>,

    #[argh(option, default = "256")]
    /// width of the blank canvas
    width: u32,

    #[argh(option, default = "256")]
    /// height of the blank canvas
    height: u32,

    #[argh(option)]
    /// where to write the finished canvas
    output: PathBuf,

    #[argh(switch)]
    /// don't click pixels that already have the right color
    skip_present: bool,

    #[argh(switch)]
    /// draw rows in random order
    shuffle_rows: bool,

    #[argh(option)]
    /// stop after this many seconds
    stop_after: Option<u64>,
}

fn parse_palette(list: &str) -> anyhow::Result<Vec<Rgb>> {
    let palette = list
        .split(',')
        .filter(|color| !color.trim().is_empty())
        .map(|color| color.parse::<Rgb>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(palette)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args: Args = argh::from_env();

    let palette = match &args.palette {
        Some(list) => parse_palette(list)?,
        None => DEFAULT_PALETTE.to_vec(),
    };

    let mut board = match &args.canvas {
        Some(path) => Board::open(path, palette)?,
        None => Board::blank(args.width, args.height, palette),
    };

    let mut scheduler = Scheduler::attach(&mut board);
    scheduler.set_origin(args.x_offset, args.y_offset);
    scheduler.set_delay(Duration::from_millis(args.delay));
    scheduler.set_settle_delay(Duration::from_millis(args.settle));
    scheduler.set_skip_present(args.skip_present);

    match (args.preset, &args.pixels, &args.image) {
        (Some(preset), None, None) => scheduler.load_preset(preset),
        (None, Some(path), None) => scheduler.load_from_json(&fs::read_to_string(path)?)?,
        (None, None, Some(path)) => {
            scheduler.load_from_image_path(path, args.max_width, args.max_height)?
        }
        (None, None, None) => bail!("nothing to draw, pass one of --preset, --pixels or --image"),
        _ => bail!("--preset, --pixels and --image are mutually exclusive"),
    }

    if args.shuffle_rows {
        scheduler.shuffle_rows();
    }

    let mut runtime =
        monoio::RuntimeBuilder::<monoio::time::TimeDriver<monoio::LegacyDriver>>::new().build()?;

    let report = runtime.block_on(async {
        if let Some(secs) = args.stop_after {
            let handle = scheduler.stop_handle();
            monoio::spawn(async move {
                monoio::time::sleep(Duration::from_secs(secs)).await;
                info!("stopping after {secs}s");
                handle.stop();
            });
        }

        scheduler.start(&mut board).await
    })?;

    info!(
        status = ?report.status,
        placed = report.placed,
        skipped = report.skipped,
        failed = report.failed,
        "done"
    );

    board.save(&args.output)?;
    info!(output = %args.output.display(), "saved canvas");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_lists() {
        assert_eq!(
            parse_palette("#000000, #fff,ff0000,").unwrap(),
            [Rgb::BLACK, Rgb::WHITE, Rgb::new(255, 0, 0)]
        );
        assert!(parse_palette("#000000,nope").is_err());
    }
}
