use egui::{Color32, Painter, Pos2, Rect, TextureHandle, Vec2};
use image::RgbaImage;

/// One puzzle fragment: its pixel content, where it belongs, and where it
/// currently sits on the canvas.
///
/// The sprite is owned exclusively by the piece and never reassigned, so the
/// current bounds keep the sprite's size for the piece's whole lifetime.
#[derive(Debug)]
pub struct Piece {
    id: usize,
    sprite: RgbaImage,
    target: Pos2,
    rect: Rect,
    dragging: bool,
}

impl Piece {
    pub fn new(id: usize, sprite: RgbaImage, target: Pos2) -> Self {
        let size = Vec2::new(sprite.width() as f32, sprite.height() as f32);
        Self {
            id,
            sprite,
            target,
            rect: Rect::from_min_size(target, size),
            dragging: false,
        }
    }

    /// Stable cell index (row-major), independent of draw order.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn sprite(&self) -> &RgbaImage {
        &self.sprite
    }

    /// The top-left corner the piece must reach to count as placed.
    pub fn target(&self) -> Pos2 {
        self.target
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub(crate) fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.rect.contains(pos)
    }

    pub fn set_top_left(&mut self, pos: Pos2) {
        self.rect = Rect::from_min_size(pos, self.rect.size());
    }

    /// Recenter the piece on `pos`, e.g. to track a pointer regardless of
    /// where inside the piece it was grabbed.
    pub fn center_on(&mut self, pos: Pos2) {
        self.rect = Rect::from_center_size(pos, self.rect.size());
    }

    /// Snap onto the target if both axis deltas are strictly below
    /// `tolerance`; otherwise leave the piece where it is.
    ///
    /// Returns whether the piece now sits exactly on its target, so calling
    /// this again without moving the piece gives the same answer.
    pub fn try_snap(&mut self, tolerance: f32) -> bool {
        let delta = self.rect.min - self.target;
        if delta.x.abs() < tolerance && delta.y.abs() < tolerance {
            self.set_top_left(self.target);
            true
        } else {
            false
        }
    }

    /// Blit the piece texture at its current bounds, shifted by the canvas
    /// offset.
    pub fn paint(&self, painter: &Painter, texture: &TextureHandle, offset: Vec2) {
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        painter.image(texture.id(), self.rect.translate(offset), uv, Color32::WHITE);
    }
}
