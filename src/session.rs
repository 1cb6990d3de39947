use egui::{Pos2, Rect, Vec2};

use crate::piece::Piece;

/// Pointer input as delivered by the canvas, in canvas-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up,
}

/// One running puzzle: the pieces in draw order plus the drag state.
///
/// The vec order is the draw order, and its reverse is the hit-test
/// priority. Picking a piece up moves it to the end of the vec, so the most
/// recently touched piece is drawn on top and hit first.
pub struct PuzzleSession {
    pieces: Vec<Piece>,
    /// Index into `pieces` while a drag is in progress.
    selected: Option<usize>,
    /// Pointer-to-top-left offset captured at pick-up.
    grab_offset: Vec2,
    snap_tolerance: f32,
}

impl PuzzleSession {
    pub fn new(pieces: Vec<Piece>, snap_tolerance: f32) -> Self {
        Self {
            pieces,
            selected: None,
            grab_offset: Vec2::ZERO,
            snap_tolerance,
        }
    }

    /// Pieces in draw order, back to front.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn selected(&self) -> Option<&Piece> {
        self.selected.and_then(|index| self.pieces.get(index))
    }

    /// Adjust the snap tolerance for subsequent releases.
    pub fn set_snap_tolerance(&mut self, tolerance: f32) {
        self.snap_tolerance = tolerance;
    }

    /// True once every piece sits exactly on its target position.
    pub fn is_solved(&self) -> bool {
        self.pieces
            .iter()
            .all(|piece| piece.rect().min == piece.target())
    }

    /// Randomly reposition every piece inside `bounds`. Same seed and bounds
    /// give the same layout. Bounds smaller than a piece degrade to pinning
    /// the piece at the bounds origin rather than failing.
    pub fn scatter(&mut self, bounds: Rect, seed: u32) {
        for (index, piece) in self.pieces.iter_mut().enumerate() {
            let salt = (index as u32) << 1;
            let max_x = (bounds.max.x - piece.rect().width()).max(bounds.min.x);
            let max_y = (bounds.max.y - piece.rect().height()).max(bounds.min.y);
            let x = rand_range(seed, salt, bounds.min.x, max_x);
            let y = rand_range(seed, salt + 1, bounds.min.y, max_y);
            piece.set_top_left(Pos2::new(x, y));
        }
    }

    /// Apply one pointer event. Events must be fed in arrival order; each one
    /// resolves synchronously.
    pub fn handle_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(pos) => self.pointer_down(pos),
            PointerEvent::Move(pos) => self.pointer_move(pos),
            PointerEvent::Up => self.pointer_up(),
        }
    }

    fn pointer_down(&mut self, pos: Pos2) {
        if self.selected.is_some() {
            return;
        }
        // Topmost-drawn piece wins the hit test.
        let Some(hit) = self.pieces.iter().rposition(|piece| piece.contains(pos)) else {
            return;
        };
        // Bring to front: remove-then-append, outside any iteration.
        let mut piece = self.pieces.remove(hit);
        self.grab_offset = pos - piece.rect().min;
        piece.set_dragging(true);
        self.pieces.push(piece);
        self.selected = Some(self.pieces.len() - 1);
    }

    fn pointer_move(&mut self, pos: Pos2) {
        let Some(index) = self.selected else {
            return;
        };
        if let Some(piece) = self.pieces.get_mut(index) {
            // Top-left tracking keeps the exact grab point under the pointer.
            piece.set_top_left(pos - self.grab_offset);
        }
    }

    fn pointer_up(&mut self) {
        let Some(index) = self.selected.take() else {
            return;
        };
        if let Some(piece) = self.pieces.get_mut(index) {
            piece.set_dragging(false);
            if piece.try_snap(self.snap_tolerance) {
                log::debug!("piece {} snapped into place", piece.id());
            }
        }
    }
}

// Stateless seeded RNG: a splitmix32 mix of seed and per-piece salt, mapped
// to the unit interval. Deterministic under test, and plenty for scatter
// layouts.
fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

fn rand_unit(seed: u32, salt: u32) -> f32 {
    let mixed = splitmix32(seed ^ salt);
    (mixed >> 8) as f32 / ((1u32 << 24) as f32)
}

fn rand_range(seed: u32, salt: u32, min: f32, max: f32) -> f32 {
    min + (max - min) * rand_unit(seed, salt)
}
