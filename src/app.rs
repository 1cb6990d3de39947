use std::path::Path;

use egui::{Color32, ColorImage, Pos2, Rect, Sense, Stroke, StrokeKind, TextureOptions, Vec2};
use image::RgbaImage;
use rfd::FileDialog;

use crate::config::PuzzleConfig;
use crate::error::PuzzleError;
use crate::factory::{scale_to_fit, slice_image};
use crate::session::{PointerEvent, PuzzleSession};

/// We derive Deserialize/Serialize so we can persist app settings on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PuzzleApp {
    config: PuzzleConfig,

    // Persist the last opened image path so a restart picks the same picture.
    image_path: Option<String>,

    #[serde(skip)]
    session: Option<PuzzleSession>,

    // Piece textures, keyed by piece id (render-list order changes, ids do not).
    #[serde(skip)]
    textures: Vec<egui::TextureHandle>,

    // Scaled size of the source image; drives the target outline rectangle.
    #[serde(skip)]
    puzzle_size: Vec2,

    // Scatter needs the canvas rect, which is only known inside a frame.
    #[serde(skip)]
    needs_scatter: bool,

    #[serde(skip)]
    solved_logged: bool,

    #[serde(skip)]
    error: Option<String>,
}

const DEFAULT_IMAGE_PATH: &str = "assets/default.jpg"; // Used until the user picks a file with Open...

const BACKGROUND: Color32 = Color32::from_gray(50);
const OUTLINE_COLOR: Color32 = Color32::from_gray(200);
const OUTLINE_THICKNESS: f32 = 3.0;

impl Default for PuzzleApp {
    fn default() -> Self {
        Self {
            config: PuzzleConfig::default(),
            image_path: Some(DEFAULT_IMAGE_PATH.to_owned()),
            session: None,
            textures: Vec::new(),
            puzzle_size: Vec2::ZERO,
            needs_scatter: false,
            solved_logged: false,
            error: None,
        }
    }
}

impl PuzzleApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load previous app state (if any).
        // Note that you must enable the `persistence` feature for this to work.
        let mut this: Self = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Default::default()
        };

        let path = this
            .image_path
            .clone()
            .unwrap_or_else(|| DEFAULT_IMAGE_PATH.to_owned());
        if let Err(e) = this.start_puzzle(&cc.egui_ctx, Path::new(&path)) {
            log::warn!("could not start puzzle from '{path}': {e}");
            this.error = Some(e.to_string());
        }

        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        this
    }

    fn load_image(path: &Path) -> Result<RgbaImage, PuzzleError> {
        image::open(path)
            .map(|img| img.to_rgba8())
            .map_err(|source| PuzzleError::ImageLoad {
                path: path.to_string_lossy().to_string(),
                source,
            })
    }

    /// Load `path`, scale it down if oversized, slice it into pieces and
    /// build a fresh session. The scatter itself runs on the next frame,
    /// once the canvas rect is known.
    fn start_puzzle(&mut self, ctx: &egui::Context, path: &Path) -> Result<(), PuzzleError> {
        let source = Self::load_image(path)?;
        let scaled = scale_to_fit(&source, self.config.max_dimension);
        let pieces = slice_image(&scaled, self.config.rows, self.config.cols, self.config.origin())?;
        log::info!(
            "sliced '{}' ({}x{}) into {} pieces",
            path.display(),
            scaled.width(),
            scaled.height(),
            pieces.len()
        );

        // Factory order is row-major with id == index, so collecting in
        // order gives an id-keyed texture list.
        self.textures = pieces
            .iter()
            .map(|piece| {
                let sprite = piece.sprite();
                let color_image = ColorImage::from_rgba_unmultiplied(
                    [sprite.width() as usize, sprite.height() as usize],
                    sprite.as_raw(),
                );
                ctx.load_texture(
                    format!("piece_{}", piece.id()),
                    color_image,
                    TextureOptions::NEAREST,
                )
            })
            .collect();

        self.puzzle_size = Vec2::new(scaled.width() as f32, scaled.height() as f32);
        self.session = Some(PuzzleSession::new(pieces, self.config.snap_tolerance));
        self.image_path = Some(path.to_string_lossy().to_string());
        self.needs_scatter = true;
        self.solved_logged = false;
        self.error = None;
        Ok(())
    }

    /// Re-slice the current image, e.g. after a grid change.
    fn rebuild(&mut self, ctx: &egui::Context) {
        if let Some(path) = self.image_path.clone() {
            if let Err(e) = self.start_puzzle(ctx, Path::new(&path)) {
                self.error = Some(e.to_string());
            }
        }
    }

    fn open_image(&mut self, ctx: &egui::Context) {
        match FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "bmp"])
            .pick_file()
        {
            Some(path) => {
                if let Err(e) = self.start_puzzle(ctx, &path) {
                    self.error = Some(e.to_string());
                }
            }
            None => {
                // Chooser dismissed; keep whatever puzzle is on screen.
                log::info!("{}", PuzzleError::NoImageSelected);
            }
        }
    }

    fn scatter_seed() -> u32 {
        // Wall-clock derived; the scatter only has to look random.
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.subsec_nanos() ^ elapsed.as_secs() as u32)
            .unwrap_or(0x5EED)
    }

    /// Grid/tolerance controls and the shuffle button. Returns whether the
    /// grid changed and the puzzle has to be re-sliced.
    fn grid_controls(&mut self, ui: &mut egui::Ui) -> bool {
        ui.label("Grid:");
        let mut rows = i64::from(self.config.rows);
        ui.add(egui::DragValue::new(&mut rows).range(1..=12));
        ui.label("x");
        let mut cols = i64::from(self.config.cols);
        ui.add(egui::DragValue::new(&mut cols).range(1..=12));
        let rows = rows.clamp(1, 12) as u32;
        let cols = cols.clamp(1, 12) as u32;
        let changed = rows != self.config.rows || cols != self.config.cols;
        self.config.rows = rows;
        self.config.cols = cols;

        ui.separator();
        ui.label("Snap:");
        let snap = ui.add(egui::DragValue::new(&mut self.config.snap_tolerance).range(1.0..=100.0));
        if snap.changed() {
            // Applies to the live session; no rebuild needed.
            if let Some(session) = &mut self.session {
                session.set_snap_tolerance(self.config.snap_tolerance);
            }
        }

        ui.separator();
        if ui.button("Shuffle").clicked() {
            self.needs_scatter = true;
            self.solved_logged = false;
        }
        changed
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
        let canvas = response.rect;
        painter.rect_filled(canvas, 0.0, BACKGROUND);

        let Some(session) = &mut self.session else {
            return;
        };

        if self.needs_scatter {
            let bounds = Rect::from_min_size(Pos2::ZERO, canvas.size());
            session.scatter(bounds, Self::scatter_seed());
            self.needs_scatter = false;
        }

        // The session works in canvas-local coordinates; it never sees
        // screen geometry.
        let offset = canvas.min.to_vec2();
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                session.handle_event(PointerEvent::Down(pos - offset));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                session.handle_event(PointerEvent::Move(pos - offset));
            }
        }
        if response.drag_stopped() {
            session.handle_event(PointerEvent::Up);
        }

        // Faint outline of the assembled puzzle area, drawn under the pieces.
        let outline = Rect::from_min_size(
            canvas.min + self.config.origin().to_vec2(),
            self.puzzle_size,
        );
        painter.rect_stroke(
            outline,
            0.0,
            Stroke::new(OUTLINE_THICKNESS, OUTLINE_COLOR),
            StrokeKind::Inside,
        );

        for piece in session.pieces() {
            if let Some(texture) = self.textures.get(piece.id()) {
                piece.paint(&painter, texture, offset);
            }
        }

        if session.is_solved() && !self.solved_logged {
            log::info!("puzzle solved");
            self.solved_logged = true;
        }
    }
}

impl eframe::App for PuzzleApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open...").clicked() {
                        self.open_image(ctx);
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.add_space(16.0);

                egui::widgets::global_theme_preference_buttons(ui);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut rebuild = false;
            ui.horizontal(|ui| {
                rebuild = self.grid_controls(ui);

                if self.session.as_ref().is_some_and(PuzzleSession::is_solved) {
                    ui.separator();
                    ui.strong("Solved!");
                }
            });
            if rebuild {
                self.rebuild(ctx);
            }

            if let Some(err) = self.error.clone() {
                ui.colored_label(Color32::RED, err);
                ui.label("Use File > Open... to pick an image.");
            }

            self.canvas(ui);
        });
    }
}
