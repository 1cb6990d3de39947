#![warn(clippy::all, rust_2018_idioms)]

//! Jigsaw puzzle: slice an image into a grid, scatter the pieces on a
//! canvas, and drag them home until they snap into place.

mod app;
mod config;
mod error;
mod factory;
mod piece;
mod session;

pub use app::PuzzleApp;
pub use config::PuzzleConfig;
pub use error::PuzzleError;
pub use factory::{scale_to_fit, slice_image};
pub use piece::Piece;
pub use session::{PointerEvent, PuzzleSession};

use eframe::NativeOptions;

impl PuzzleApp {
    /// Run the app with the provided NativeOptions.
    pub fn run(options: NativeOptions) -> Result<(), eframe::Error> {
        eframe::run_native(
            "jigsaw",
            options,
            Box::new(|cc| Ok(Box::new(PuzzleApp::new(cc)))),
        )
    }
}
