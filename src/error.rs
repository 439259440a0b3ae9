use thiserror::Error;

/// Errors raised while configuring or running a generator.
#[derive(Error, Debug)]
pub enum WorldgenError {
    #[error("grid size {size} is not 2^n + 1")]
    InvalidSize { size: usize },

    #[error("grids are square, got {width}x{height}")]
    NonSquare { width: usize, height: usize },

    #[error("sea gap should be between 0 and 1, got {0}")]
    SeaGapOutOfRange(f64),

    #[error("at least one plate is required")]
    NoPlates,

    #[error("cannot place {plates} plates on a map of {cells} cells")]
    TooManyPlates { plates: usize, cells: usize },

    #[error("plates have not been generated yet")]
    PlatesNotGenerated,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WorldgenError>;
