//! 2D camera for panning and zooming over the map.
//!
//! World space is measured in screen pixels at zoom 1.0. The camera shows
//! the world point `target` at the screen point `offset`, scaled by `zoom`.

/// Lower zoom bound (zoomed out).
pub const MIN_ZOOM: f64 = 0.125;
/// Upper zoom bound (zoomed in).
pub const MAX_ZOOM: f64 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World point under `offset`.
    pub target: (f64, f64),
    /// Screen point the target is drawn at.
    pub offset: (f64, f64),
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Identity camera: world and screen coincide.
    pub fn new() -> Self {
        Self {
            target: (0.0, 0.0),
            offset: (0.0, 0.0),
            zoom: 1.0,
        }
    }

    /// Converts a screen point to world space.
    pub fn screen_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.offset.0) / self.zoom + self.target.0,
            (y - self.offset.1) / self.zoom + self.target.1,
        )
    }

    /// Converts a world point to screen space.
    pub fn world_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.target.0) * self.zoom + self.offset.0,
            (y - self.target.1) * self.zoom + self.offset.1,
        )
    }

    /// Pans by a drag delta in screen pixels; the map follows the cursor.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.target.0 -= dx / self.zoom;
        self.target.1 -= dy / self.zoom;
    }

    /// Zooms by `factor` keeping the world point under `pivot` fixed.
    pub fn zoom_at(&mut self, factor: f64, pivot: (f64, f64)) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let anchor = self.screen_to_world(pivot.0, pivot.1);
        self.offset = pivot;
        self.target = anchor;
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Uniform data for drawing the world rectangle `rect` (x, y, w, h).
    pub fn to_uniform(&self, rect: (f64, f64, f64, f64), screen: (u32, u32)) -> ViewUniform {
        ViewUniform {
            target: [self.target.0 as f32, self.target.1 as f32],
            offset: [self.offset.0 as f32, self.offset.1 as f32],
            screen: [screen.0.max(1) as f32, screen.1.max(1) as f32],
            zoom: self.zoom as f32,
            _padding: 0.0,
            rect_origin: [rect.0 as f32, rect.1 as f32],
            rect_size: [rect.2 as f32, rect.3 as f32],
        }
    }
}

/// Uniform data for the quad shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewUniform {
    pub target: [f32; 2],
    pub offset: [f32; 2],
    pub screen: [f32; 2],
    pub zoom: f32,
    pub _padding: f32,
    pub rect_origin: [f32; 2],
    pub rect_size: [f32; 2],
}

impl ViewUniform {
    /// Overlay covering the whole screen, unaffected by the camera.
    pub fn screen_overlay(screen: (u32, u32)) -> Self {
        Camera::new().to_uniform((0.0, 0.0, screen.0 as f64, screen.1 as f64), screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_identity_camera() {
        let cam = Camera::new();
        assert_eq!(cam.screen_to_world(10.0, 20.0), (10.0, 20.0));
    }

    #[test]
    fn test_pan_offsets_world() {
        let mut cam = Camera::new();
        // Dragging right by 30px moves the map right, so the same screen
        // point now sees a world point further left.
        cam.pan(30.0, -10.0);
        assert_eq!(cam.target, (-30.0, 10.0));
        assert!(close(cam.screen_to_world(100.0, 100.0), (70.0, 110.0)));
    }

    #[test]
    fn test_pan_scales_with_zoom() {
        let mut cam = Camera::new();
        cam.zoom = 2.0;
        cam.pan(10.0, 0.0);
        assert!((cam.target.0 + 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip_under_zoom() {
        let cam = Camera {
            target: (120.0, -40.0),
            offset: (300.0, 200.0),
            zoom: 1.75,
        };
        let world = cam.screen_to_world(512.0, 77.0);
        let back = cam.world_to_screen(world.0, world.1);
        assert!(close(back, (512.0, 77.0)));
    }

    #[test]
    fn test_zoom_preserves_pivot() {
        let mut cam = Camera::new();
        cam.pan(-40.0, 25.0);
        let pivot = (320.0, 180.0);
        let before = cam.screen_to_world(pivot.0, pivot.1);
        cam.zoom_at(2.0, pivot);
        let after = cam.screen_to_world(pivot.0, pivot.1);
        assert!(close(before, after), "{:?} vs {:?}", before, after);
        assert!((cam.zoom - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_has_limits() {
        let mut cam = Camera::new();
        for _ in 0..100 {
            cam.zoom_at(0.5, (0.0, 0.0));
        }
        assert_eq!(cam.zoom, MIN_ZOOM);
        for _ in 0..100 {
            cam.zoom_at(2.0, (0.0, 0.0));
        }
        assert_eq!(cam.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_zoom_ignores_bad_factor() {
        let mut cam = Camera::new();
        cam.zoom_at(0.0, (10.0, 10.0));
        cam.zoom_at(f64::NAN, (10.0, 10.0));
        assert_eq!(cam, Camera::new());
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<ViewUniform>(), 48);
        let u = ViewUniform::screen_overlay((1280, 720));
        assert_eq!(u.rect_size, [1280.0, 720.0]);
        assert_eq!(u.zoom, 1.0);
    }
}
