#![warn(clippy::all, rust_2018_idioms)]

//! Desktop entrypoint: logger, window options, run.

use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_title("Jigsaw Puzzle"),
        ..Default::default()
    };
    jigsaw::PuzzleApp::run(options)
}
