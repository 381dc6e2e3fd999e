//! Maps a screen click to a region of the reference bitmap.

use crate::camera::Camera;
use image::{Rgba, RgbaImage};
use quizdata::{RegionId, RegionTable};

/// Where the map image sits in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapLayout {
    /// World position of the image's top-left corner.
    pub origin: (f64, f64),
    /// Display scale applied to the image's pixels.
    pub scale: f64,
    /// Pixel dimensions of the reference bitmap.
    pub image_size: (u32, u32),
}

impl MapLayout {
    /// Centers an image of `image_size` pixels on a `screen`-sized viewport.
    pub fn centered(screen: (u32, u32), image_size: (u32, u32), scale: f64) -> Self {
        let origin = (
            screen.0 as f64 / 2.0 - scale * image_size.0 as f64 / 2.0,
            screen.1 as f64 / 2.0 - scale * image_size.1 as f64 / 2.0,
        );
        Self {
            origin,
            scale,
            image_size,
        }
    }

    /// Displayed rectangle as `(x, y, width, height)` in world space.
    pub fn world_rect(&self) -> (f64, f64, f64, f64) {
        (
            self.origin.0,
            self.origin.1,
            self.scale * self.image_size.0 as f64,
            self.scale * self.image_size.1 as f64,
        )
    }

    pub fn contains(&self, world: (f64, f64)) -> bool {
        let (x, y, w, h) = self.world_rect();
        // Half-open on the far edges so the truncated pixel is always in range
        world.0 >= x && world.0 < x + w && world.1 >= y && world.1 < y + h
    }

    /// Bitmap pixel under a world point, truncating toward the top-left.
    pub fn world_to_pixel(&self, world: (f64, f64)) -> Option<(u32, u32)> {
        if !self.contains(world) || self.scale <= 0.0 {
            return None;
        }
        let px = ((world.0 - self.origin.0) / self.scale) as u32;
        let py = ((world.1 - self.origin.1) / self.scale) as u32;
        // Float error at the far edge can still land one past the end
        if px >= self.image_size.0 || py >= self.image_size.1 {
            return None;
        }
        Some((px, py))
    }

    /// World position of a (fractional) bitmap coordinate.
    pub fn pixel_to_world(&self, pixel: (f32, f32)) -> (f64, f64) {
        (
            self.origin.0 + pixel.0 as f64 * self.scale,
            self.origin.1 + pixel.1 as f64 * self.scale,
        )
    }
}

/// Result of resolving a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The click missed the displayed map entirely.
    OutsideImage,
    /// The click hit a color that is not in the table (border, anti-aliasing).
    Unrecognized { color: Rgba<u8>, pixel: (u32, u32) },
    Region {
        id: RegionId,
        color: Rgba<u8>,
        pixel: (u32, u32),
    },
}

impl Resolution {
    pub fn region(&self) -> Option<RegionId> {
        match self {
            Resolution::Region { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Resolves a screen-space click against the reference bitmap.
pub fn resolve(
    screen_point: (f64, f64),
    camera: &Camera,
    layout: &MapLayout,
    reference: &RgbaImage,
    table: &RegionTable,
) -> Resolution {
    let world = camera.screen_to_world(screen_point.0, screen_point.1);

    let Some((px, py)) = layout.world_to_pixel(world) else {
        log::debug!(
            "Click is outside the image: screen ({:.1}, {:.1}) -> world ({:.1}, {:.1})",
            screen_point.0,
            screen_point.1,
            world.0,
            world.1
        );
        return Resolution::OutsideImage;
    };

    let Some(&color) = reference.get_pixel_checked(px, py) else {
        return Resolution::OutsideImage;
    };

    match table.lookup_pixel(&color) {
        Some(id) => {
            log::debug!("Pixel ({}, {}) color {:?} -> region {:?}", px, py, color.0, id);
            Resolution::Region {
                id,
                color,
                pixel: (px, py),
            }
        }
        None => {
            log::debug!(
                "Region unknown at pixel ({}, {}) color {:?}, possibly a border",
                px,
                py,
                color.0
            );
            Resolution::Unrecognized {
                color,
                pixel: (px, py),
            }
        }
    }
}
