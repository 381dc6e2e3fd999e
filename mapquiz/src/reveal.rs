//! Reveal compositor: repaints every pixel of one region in the reveal bitmap.
//!
//! Regions are matched on the reference bitmap either by exact RGBA equality
//! or through a color key table, which packs each pixel the same way the
//! resolver does (so RGB-keyed tables also take partly transparent edges).
//! A reveal is a full scan of the image, which is fine for something the
//! player triggers a few times a second at most.

use image::{Rgba, RgbaImage};
use quizdata::{RegionId, RegionTable};

/// Inclusive pixel bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl PixelBounds {
    fn point(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Center of the box in pixel coordinates.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x as f32 + self.max_x as f32 + 1.0) / 2.0,
            (self.min_y as f32 + self.max_y as f32 + 1.0) / 2.0,
        )
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    /// Number of reveal pixels overwritten.
    pub painted: usize,
    /// Box around every matched reference pixel.
    pub bounds: Option<PixelBounds>,
}

/// Overwrites every reveal pixel whose reference pixel equals `target`.
///
/// Returns without touching anything if the two bitmaps differ in size.
pub fn paint_region(
    reveal: &mut RgbaImage,
    reference: &RgbaImage,
    target: Rgba<u8>,
    paint: Rgba<u8>,
) -> PaintStats {
    paint_where(reveal, reference, paint, |pixel| *pixel == target)
}

/// Overwrites every reveal pixel whose reference pixel `table` resolves to
/// `region`.
pub fn paint_table_region(
    reveal: &mut RgbaImage,
    reference: &RgbaImage,
    table: &RegionTable,
    region: RegionId,
    paint: Rgba<u8>,
) -> PaintStats {
    paint_where(reveal, reference, paint, |pixel| {
        table.lookup_pixel(pixel) == Some(region)
    })
}

fn paint_where(
    reveal: &mut RgbaImage,
    reference: &RgbaImage,
    paint: Rgba<u8>,
    matches: impl Fn(&Rgba<u8>) -> bool,
) -> PaintStats {
    if reveal.dimensions() != reference.dimensions() {
        log::warn!(
            "Refusing to paint: reveal {:?} vs reference {:?}",
            reveal.dimensions(),
            reference.dimensions()
        );
        return PaintStats::default();
    }

    let mut stats = PaintStats::default();
    for (x, y, pixel) in reference.enumerate_pixels() {
        if !matches(pixel) {
            continue;
        }
        reveal.put_pixel(x, y, paint);
        stats.painted += 1;
        match stats.bounds.as_mut() {
            Some(b) => b.include(x, y),
            None => stats.bounds = Some(PixelBounds::point(x, y)),
        }
    }
    stats
}

/// Bounding box of every reference pixel equal to `target`.
pub fn region_bounds(reference: &RgbaImage, target: Rgba<u8>) -> Option<PixelBounds> {
    reference
        .enumerate_pixels()
        .filter(|(_, _, p)| **p == target)
        .fold(None, |acc: Option<PixelBounds>, (x, y, _)| {
            Some(match acc {
                Some(mut b) => {
                    b.include(x, y);
                    b
                }
                None => PixelBounds::point(x, y),
            })
        })
}
