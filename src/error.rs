use thiserror::Error;

/// Failures while setting up a puzzle.
///
/// All of these are unrecoverable at the point of detection: the app reports
/// them and waits for the user to pick a different image or grid.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("failed to load image '{path}': {source}")]
    ImageLoad {
        path: String,
        source: image::ImageError,
    },

    #[error("no image selected")]
    NoImageSelected,

    #[error("a {rows}x{cols} grid yields zero-size pieces for a {width}x{height} image")]
    InvalidDimensions {
        rows: u32,
        cols: u32,
        width: u32,
        height: u32,
    },
}
