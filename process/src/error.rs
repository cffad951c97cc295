use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid pixel data: {0}")]
    InvalidPixelFormat(String),

    #[error("unknown preset {0:?} (expected \"heart\" or \"smiley\")")]
    UnknownPreset(String),

    #[error("failed to load image: {0}")]
    ResourceLoad(#[from] image::ImageError),
}
