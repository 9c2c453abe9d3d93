//! Spiral tile ordering

use crate::base::*;
use crate::geometry::*;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: usize = 64;

/// Split `bounds` into square tiles of `tile_size` pixels (clipped at the
/// right and bottom edges) and order them along a spiral that starts at the
/// center tile and winds outwards. Finished tiles are therefore spread over
/// the image instead of filling it row by row.
///
/// * `bounds`    - Image bounds.
/// * `tile_size` - Tile edge length; 0 is treated as 1.
pub fn spiral_tiles(bounds: &Bounds2i, tile_size: usize) -> Vec<Bounds2i> {
    if bounds.is_empty() {
        return vec![];
    }

    let tile_size = max(tile_size, 1) as i32;
    let extent = bounds.diagonal();
    let nx = (extent.x + tile_size - 1) / tile_size;
    let ny = (extent.y + tile_size - 1) / tile_size;
    let total = (nx * ny) as usize;

    let tile = |tx: i32, ty: i32| {
        let p0 = Point2i::new(bounds.p_min.x + tx * tile_size, bounds.p_min.y + ty * tile_size);
        let p1 = Point2i::new(
            min(p0.x + tile_size, bounds.p_max.x),
            min(p0.y + tile_size, bounds.p_max.y),
        );
        Bounds2i::new(p0, p1)
    };

    // Directions: right, down, left, up.
    const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

    let mut tiles = Vec::with_capacity(total);
    let (mut x, mut y) = ((nx - 1) / 2, (ny - 1) / 2);
    let mut direction = 0;
    let mut run = 1;
    tiles.push(tile(x, y));

    while tiles.len() < total {
        // Each run length is used twice before growing.
        for _ in 0..2 {
            let (dx, dy) = DIRECTIONS[direction];
            for _ in 0..run {
                x += dx;
                y += dy;
                if x >= 0 && y >= 0 && x < nx && y < ny {
                    tiles.push(tile(x, y));
                }
            }
            direction = (direction + 1) % 4;
        }
        run += 1;
    }

    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_image_has_no_tiles() {
        let b = Bounds2i::new(Point2i::new(0, 0), Point2i::new(0, 10));
        assert!(spiral_tiles(&b, 64).is_empty());
    }

    #[test]
    fn starts_at_center() {
        let b = Bounds2i::new(Point2i::new(0, 0), Point2i::new(5 * 64, 3 * 64));
        let tiles = spiral_tiles(&b, 64);
        assert_eq!(tiles.len(), 15);
        assert_eq!(tiles[0].p_min, Point2i::new(2 * 64, 64));
        assert_eq!(tiles[1].p_min, Point2i::new(3 * 64, 64));
        assert_eq!(tiles[2].p_min, Point2i::new(3 * 64, 2 * 64));
    }

    #[test]
    fn edge_tiles_are_clipped() {
        let b = Bounds2i::new(Point2i::new(0, 0), Point2i::new(100, 70));
        let tiles = spiral_tiles(&b, 64);
        assert_eq!(tiles.len(), 4);
        let area: i64 = tiles.iter().map(|t| t.area()).sum();
        assert_eq!(area, 100 * 70);
    }

    proptest! {
        #[test]
        fn every_pixel_covered_exactly_once(
            w in 1..300_i32,
            h in 1..300_i32,
            size in 1..80_usize,
        ) {
            let b = Bounds2i::new(Point2i::new(0, 0), Point2i::new(w, h));
            let tiles = spiral_tiles(&b, size);
            let mut hits = vec![0_u8; (w * h) as usize];
            for t in tiles.iter() {
                prop_assert!(!t.is_empty());
                for p in *t {
                    hits[(p.y * w + p.x) as usize] += 1;
                }
            }
            prop_assert!(hits.iter().all(|&n| n == 1));
        }
    }
}
