use egui::{Pos2, Vec2};
use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::error::PuzzleError;
use crate::piece::Piece;

/// Cut `image` into a `rows` x `cols` grid of equally sized pieces.
///
/// Piece size is the floor division of the image size, so remainder pixels on
/// the right/bottom edge are not part of the puzzle. Pieces come out in
/// row-major order, which also fixes the initial draw order. Each piece gets
/// its own copy of the pixels; the source image can be dropped afterwards.
///
/// The target position of the piece in cell `(row, col)` is
/// `origin + (col * piece_width, row * piece_height)`, so the targets tile
/// the assembled puzzle area exactly, without gaps or overlaps.
pub fn slice_image(
    image: &RgbaImage,
    rows: u32,
    cols: u32,
    origin: Pos2,
) -> Result<Vec<Piece>, PuzzleError> {
    let (width, height) = image.dimensions();
    let piece_width = if cols == 0 { 0 } else { width / cols };
    let piece_height = if rows == 0 { 0 } else { height / rows };
    if piece_width == 0 || piece_height == 0 {
        return Err(PuzzleError::InvalidDimensions {
            rows,
            cols,
            width,
            height,
        });
    }

    let mut pieces = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let sprite = imageops::crop_imm(
                image,
                col * piece_width,
                row * piece_height,
                piece_width,
                piece_height,
            )
            .to_image();
            let target = origin
                + Vec2::new((col * piece_width) as f32, (row * piece_height) as f32);
            let id = (row * cols + col) as usize;
            pieces.push(Piece::new(id, sprite, target));
        }
    }
    Ok(pieces)
}

/// Downscale so the longest side is at most `max_dimension`, preserving the
/// aspect ratio. Images already within the limit come back unchanged; this
/// never upscales.
pub fn scale_to_fit(image: &RgbaImage, max_dimension: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if longest <= max_dimension || longest == 0 {
        return image.clone();
    }
    let scale = max_dimension as f32 / longest as f32;
    let new_width = ((width as f32 * scale) as u32).max(1);
    let new_height = ((height as f32 * scale) as u32).max(1);
    imageops::resize(image, new_width, new_height, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn two_by_two_grid_tiles_a_square_image() {
        let image = RgbaImage::new(100, 100);
        let pieces = slice_image(&image, 2, 2, Pos2::ZERO).unwrap();

        assert_eq!(pieces.len(), 4);
        let targets: Vec<Pos2> = pieces.iter().map(|p| p.target()).collect();
        assert_eq!(
            targets,
            vec![
                Pos2::new(0.0, 0.0),
                Pos2::new(50.0, 0.0),
                Pos2::new(0.0, 50.0),
                Pos2::new(50.0, 50.0),
            ]
        );
        for piece in &pieces {
            assert_eq!(piece.sprite().dimensions(), (50, 50));
        }
    }

    #[test]
    fn origin_offsets_every_target() {
        let image = RgbaImage::new(100, 100);
        let origin = Pos2::new(50.0, 50.0);
        let pieces = slice_image(&image, 2, 2, origin).unwrap();

        assert_eq!(pieces[0].target(), Pos2::new(50.0, 50.0));
        assert_eq!(pieces[3].target(), Pos2::new(100.0, 100.0));
    }

    #[test]
    fn targets_tile_the_puzzle_area_disjointly() {
        let image = RgbaImage::new(120, 90);
        let pieces = slice_image(&image, 3, 4, Pos2::ZERO).unwrap();

        assert_eq!(pieces.len(), 12);
        // Every 30x30 cell of the 120x90 area appears exactly once.
        let mut seen = [[false; 4]; 3];
        for piece in &pieces {
            assert_eq!(piece.sprite().dimensions(), (30, 30));
            let col = (piece.target().x / 30.0) as usize;
            let row = (piece.target().y / 30.0) as usize;
            assert!(!seen[row][col], "duplicate target cell ({row}, {col})");
            seen[row][col] = true;
        }
        assert!(seen.iter().flatten().all(|&cell| cell));
    }

    #[test]
    fn remainder_pixels_are_dropped() {
        let image = RgbaImage::new(100, 100);
        let pieces = slice_image(&image, 3, 3, Pos2::ZERO).unwrap();

        for piece in &pieces {
            assert_eq!(piece.sprite().dimensions(), (33, 33));
        }
        // Bottom-right target leaves the remainder column/row uncovered.
        assert_eq!(pieces[8].target(), Pos2::new(66.0, 66.0));
    }

    #[test]
    fn zero_size_pieces_are_rejected() {
        let image = RgbaImage::new(5, 5);
        let err = slice_image(&image, 1, 10, Pos2::ZERO).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidDimensions { .. }));

        let err = slice_image(&image, 0, 1, Pos2::ZERO).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidDimensions { .. }));
    }

    #[test]
    fn sprites_copy_the_matching_region_of_the_source() {
        let mut image = RgbaImage::new(4, 4);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = Rgba([x as u8, y as u8, 0, 255]);
        }
        let pieces = slice_image(&image, 2, 2, Pos2::ZERO).unwrap();

        // Piece id 3 is the bottom-right 2x2 cell.
        assert_eq!(*pieces[3].sprite().get_pixel(0, 0), Rgba([2, 2, 0, 255]));
        assert_eq!(*pieces[3].sprite().get_pixel(1, 1), Rgba([3, 3, 0, 255]));
    }

    #[test]
    fn scale_to_fit_shrinks_oversized_images() {
        let image = RgbaImage::new(800, 400);
        let scaled = scale_to_fit(&image, 400);
        assert_eq!(scaled.dimensions(), (400, 200));
    }

    #[test]
    fn scale_to_fit_never_upscales() {
        let image = RgbaImage::new(300, 200);
        let scaled = scale_to_fit(&image, 400);
        assert_eq!(scaled.dimensions(), (300, 200));
    }
}
