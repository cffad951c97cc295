#[macro_use]
extern crate tracing;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(argh::FromArgs)]
/// convert an image into a pixel list to be drawn by dabble
struct Args {
    #[argh(positional)]
    /// path to the image file
    path: PathBuf,

    #[argh(option)]
    /// path to output file
    output: PathBuf,

    #[argh(option, default = "dabble_process::DEFAULT_MAX_SIZE")]
    /// maximum width of the pixel list
    max_width: u32,

    #[argh(option, default = "dabble_process::DEFAULT_MAX_SIZE")]
    /// maximum height of the pixel list
    max_height: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args: Args = argh::from_env();

    info!(path = %args.path.display(), "converting image..");
    let pixels = dabble_process::load_image_path(&args.path, args.max_width, args.max_height)?;

    let summary = dabble_process::summarize(&pixels);
    info!(
        pixels = pixels.len(),
        width = summary.width,
        height = summary.height,
        colors = summary.colors,
        "converted image"
    );

    let file = File::create(&args.output)?;
    let mut file = BufWriter::new(file);
    serde_json::to_writer(&mut file, &pixels)?;
    file.flush()?;

    info!(output = %args.output.display(), "wrote pixel list");

    Ok(())
}
