//! Image Block

use super::*;

/// Number of entries in the filter lookup table, not counting the trailing
/// zero entry.
pub const FILTER_TABLE_RESOLUTION: usize = 32;

/// Weighted running sum for one pixel.
#[derive(Copy, Clone, Debug, Default)]
pub struct WeightedPixel {
    /// Sum of `radiance * weight`.
    pub sum: Spectrum,

    /// Sum of filter weights.
    pub weight: Float,
}

impl WeightedPixel {
    /// Returns the normalized value, or black if no weight was accumulated.
    pub fn resolve(&self) -> Spectrum {
        if self.weight > 0.0 {
            self.sum / self.weight
        } else {
            Spectrum::ZERO
        }
    }
}

/// Tile-local accumulation buffer. The block covers `size` pixels starting at
/// `offset` in image space and is surrounded by a border of
/// `ceil(radius - 0.5)` pixels that receives contributions from samples whose
/// filter footprint straddles the tile edge.
#[derive(Clone, Debug)]
pub struct ImageBlock {
    /// Image-space position of the first interior pixel.
    offset: Point2i,

    /// Interior size.
    size: Point2i,

    /// Border width on each side.
    border: i32,

    /// Filter radius.
    radius: Float,

    /// Maps an offset in pixels to a table index.
    lookup_factor: Float,

    /// Filter values at `radius * i / FILTER_TABLE_RESOLUTION`.
    filter_table: Vec<Float>,

    /// Pixels of the bordered region, row by row.
    pixels: Vec<WeightedPixel>,

    /// Scratch space for the horizontal weights.
    weights_x: Vec<Float>,

    /// Scratch space for the vertical weights.
    weights_y: Vec<Float>,
}

impl ImageBlock {
    /// Create a new block.
    ///
    /// * `offset` - Image-space position of the first interior pixel.
    /// * `size`   - Interior size.
    /// * `filter` - Reconstruction filter.
    pub fn new(offset: Point2i, size: Point2i, filter: &dyn Filter) -> Self {
        let radius = filter.radius().max(0.0);
        let border = (radius - 0.5).ceil().max(0.0) as i32;

        let mut filter_table = Vec::with_capacity(FILTER_TABLE_RESOLUTION + 1);
        for i in 0..FILTER_TABLE_RESOLUTION {
            filter_table.push(filter.evaluate(radius * i as Float / FILTER_TABLE_RESOLUTION as Float));
        }
        filter_table.push(0.0);

        let lookup_factor = if radius > 0.0 {
            FILTER_TABLE_RESOLUTION as Float / radius
        } else {
            0.0
        };

        // Widest possible footprint.
        let footprint = (2.0 * radius).ceil() as usize + 1;

        let n = ((size.x + 2 * border) * (size.y + 2 * border)).max(0) as usize;
        Self {
            offset,
            size,
            border,
            radius,
            lookup_factor,
            filter_table,
            pixels: vec![WeightedPixel::default(); n],
            weights_x: vec![0.0; footprint],
            weights_y: vec![0.0; footprint],
        }
    }

    /// Returns the image-space position of the first interior pixel.
    pub fn offset(&self) -> Point2i {
        self.offset
    }

    /// Returns the interior size.
    pub fn size(&self) -> Point2i {
        self.size
    }

    /// Returns the border width.
    pub fn border(&self) -> i32 {
        self.border
    }

    /// Returns the interior region in image space.
    pub fn bounds(&self) -> Bounds2i {
        Bounds2i::from_offset_size(self.offset, self.size)
    }

    /// Returns the size including the border.
    fn bordered_size(&self) -> Point2i {
        Point2i::new(self.size.x + 2 * self.border, self.size.y + 2 * self.border)
    }

    /// Reset all pixels to zero.
    pub fn clear(&mut self) {
        self.pixels.fill(WeightedPixel::default());
    }

    /// Splat a radiance sample. Returns `false` and drops the sample if any
    /// channel is non-finite or negative.
    ///
    /// * `pos`      - Sample position in image-space raster coordinates.
    /// * `radiance` - Sample radiance.
    pub fn add_sample(&mut self, pos: &Point2f, radiance: &Spectrum) -> bool {
        if !radiance.is_valid() {
            error!(
                "Dropping sample with invalid radiance {} at ({}, {})",
                radiance, pos.x, pos.y
            );
            return false;
        }

        // Convert to block coordinates where pixel centers sit at integers.
        let origin = self.offset - Point2i::new(self.border, self.border);
        let px = pos.x - 0.5 - origin.x as Float;
        let py = pos.y - 0.5 - origin.y as Float;
        let bordered = self.bordered_size();

        if self.radius == 0.0 || self.lookup_factor == 0.0 {
            // Nearest pixel with unit weight.
            let x = (px + 0.5).floor() as i32;
            let y = (py + 0.5).floor() as i32;
            if x < 0 || y < 0 || x >= bordered.x || y >= bordered.y {
                return true;
            }
            let pixel = &mut self.pixels[(y * bordered.x + x) as usize];
            pixel.sum += *radiance;
            pixel.weight += 1.0;
            return true;
        }

        // Compute the footprint clipped to the bordered extent.
        let x0 = max((px - self.radius).ceil() as i32, 0);
        let y0 = max((py - self.radius).ceil() as i32, 0);
        let x1 = min((px + self.radius).floor() as i32, bordered.x - 1);
        let y1 = min((py + self.radius).floor() as i32, bordered.y - 1);
        if x0 > x1 || y0 > y1 {
            return true;
        }

        let last = FILTER_TABLE_RESOLUTION;
        for x in x0..=x1 {
            let idx = min(((x as Float - px).abs() * self.lookup_factor) as usize, last);
            self.weights_x[(x - x0) as usize] = self.filter_table[idx];
        }
        for y in y0..=y1 {
            let idx = min(((y as Float - py).abs() * self.lookup_factor) as usize, last);
            self.weights_y[(y - y0) as usize] = self.filter_table[idx];
        }

        for y in y0..=y1 {
            let wy = self.weights_y[(y - y0) as usize];
            let row = (y * bordered.x) as usize;
            for x in x0..=x1 {
                let w = self.weights_x[(x - x0) as usize] * wy;
                let pixel = &mut self.pixels[row + x as usize];
                pixel.sum += *radiance * w;
                pixel.weight += w;
            }
        }
        true
    }

    /// Returns the weighted pixel at bordered block coordinates.
    ///
    /// * `x` - Column in the bordered block.
    /// * `y` - Row in the bordered block.
    pub fn bordered_pixel(&self, x: i32, y: i32) -> &WeightedPixel {
        &self.pixels[(y * self.bordered_size().x + x) as usize]
    }

    /// Visit every pixel including the border with its image-space position.
    ///
    /// * `f` - Visitor.
    pub fn for_each_bordered<F: FnMut(Point2i, &WeightedPixel)>(&self, mut f: F) {
        let bordered = self.bordered_size();
        let origin = self.offset - Point2i::new(self.border, self.border);
        for y in 0..bordered.y {
            for x in 0..bordered.x {
                f(origin + Point2i::new(x, y), &self.pixels[(y * bordered.x + x) as usize]);
            }
        }
    }

    /// Returns the interior as normalized RGB triples, row by row. Border
    /// pixels are never emitted.
    pub fn get_raw(&self) -> Vec<Float> {
        let mut rgb = Vec::with_capacity((self.size.x.max(0) * self.size.y.max(0) * 3) as usize);
        for y in 0..self.size.y {
            for x in 0..self.size.x {
                let v = self.bordered_pixel(x + self.border, y + self.border).resolve();
                rgb.extend_from_slice(&v.to_rgb());
            }
        }
        rgb
    }
}

impl fmt::Display for ImageBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ImageBlock[offset = ({}, {}), size = ({}, {}), border = {}]",
            self.offset.x, self.offset.y, self.size.x, self.size.y, self.border
        )
    }
}
