//! Core application logic for the map quiz.
//!
//! This module contains the window-independent state: the catalog, the quiz
//! session and the camera, plus the input handlers the event loop forwards
//! to. It never touches the GPU, so the whole game can be driven from tests.

use crate::camera::{Camera, MIN_ZOOM};
use crate::quiz::{ClickOutcome, Mode, QuizSession};
use crate::resolver::{self, MapLayout};
use crate::settings::Settings;
use image::Rgba;
use quizdata::CountryCatalog;

/// Zoom change per wheel notch.
pub const ZOOM_STEP: f64 = 0.125;

/// Player commands bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reset,
    Learn,
    SwitchCountry(usize),
    NextCountry,
    DebugDump,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    TopLeft,
    /// `position` is the center of the text box.
    Center,
}

/// One line of HUD text, in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct HudText {
    pub text: String,
    pub position: (f32, f32),
    pub size: f32,
    pub color: Rgba<u8>,
    pub align: Align,
}

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const RED: Rgba<u8> = Rgba([230, 41, 55, 255]);
const GREEN: Rgba<u8> = Rgba([0, 228, 48, 255]);
const YELLOW: Rgba<u8> = Rgba([253, 249, 0, 255]);
const GRAY: Rgba<u8> = Rgba([160, 160, 160, 255]);

/// Result of processing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    /// Whether exit was requested.
    pub should_exit: bool,
}

pub struct AppCore {
    pub catalog: CountryCatalog,
    pub session: QuizSession,
    pub camera: Camera,

    // Window dimensions (updated on resize)
    pub size: (u32, u32),

    // Input state
    pub cursor_pos: (f64, f64),
    pub panning: bool,

    image_scale: f64,
    font_size: f32,
    exit_requested: bool,
}

impl AppCore {
    pub fn new(catalog: CountryCatalog, settings: &Settings, seed: Option<u64>) -> Self {
        let mut session = QuizSession::new(settings, seed);
        session.start(&catalog);
        Self {
            catalog,
            session,
            camera: Camera::new(),
            size: settings.window_size,
            cursor_pos: (0.0, 0.0),
            panning: false,
            image_scale: settings.image_scale,
            font_size: settings.font_size,
            exit_requested: false,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.size = (width, height);
            log::debug!("AppCore resized to {}x{}", width, height);
        }
    }

    /// Advances timers by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickResult {
        self.session.tick(dt);
        TickResult {
            should_exit: self.exit_requested,
        }
    }

    /// Where the active map sits in world space.
    pub fn layout(&self) -> MapLayout {
        MapLayout::centered(
            self.size,
            self.catalog.active().dimensions(),
            self.image_scale,
        )
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        if self.panning {
            self.camera.pan(x - self.cursor_pos.0, y - self.cursor_pos.1);
        }
        self.cursor_pos = (x, y);
    }

    pub fn set_panning(&mut self, panning: bool) {
        self.panning = panning;
    }

    /// Zooms around the cursor by `lines` wheel notches.
    pub fn on_scroll(&mut self, lines: f64) {
        if lines == 0.0 {
            return;
        }
        let zoom = (self.camera.zoom + lines * ZOOM_STEP).max(MIN_ZOOM);
        self.camera.zoom_at(zoom / self.camera.zoom, self.cursor_pos);
    }

    /// Resolves a left click at the cursor and feeds it to the session.
    pub fn on_left_click(&mut self) -> ClickOutcome {
        let layout = self.layout();
        let entry = self.catalog.active();
        let resolution = resolver::resolve(
            self.cursor_pos,
            &self.camera,
            &layout,
            &entry.reference,
            &entry.table,
        );
        self.session.handle_click(&mut self.catalog, resolution)
    }

    pub fn on_key(&mut self, action: Action) {
        match action {
            Action::Reset => self.session.reset(&mut self.catalog),
            Action::Learn => self.session.enter_learn(&mut self.catalog),
            Action::SwitchCountry(index) => self.switch_country(index),
            Action::NextCountry => {
                let next = (self.catalog.active_index() + 1) % self.catalog.len();
                self.switch_country(next);
            }
            Action::DebugDump => log::info!("{}", self.debug_summary()),
            Action::Quit => {
                log::info!("Quit requested");
                self.exit_requested = true;
            }
        }
    }

    fn switch_country(&mut self, index: usize) {
        if index == self.catalog.active_index() {
            return;
        }
        match self.catalog.switch_to(index) {
            Ok(()) => self.session.on_country_switched(&self.catalog),
            Err(e) => log::warn!("Cannot switch country: {}", e),
        }
    }

    pub fn debug_summary(&self) -> String {
        let entry = self.catalog.active();
        format!(
            "camera target=({:.5}, {:.5}) offset=({:.1}, {:.1}) zoom={:.3}; {} {:?}; target={}; errors={}; remaining={}/{}",
            self.camera.target.0,
            self.camera.target.1,
            self.camera.offset.0,
            self.camera.offset.1,
            self.camera.zoom,
            entry.label,
            self.session.mode(),
            self.session.target_name(&entry.table).unwrap_or("-"),
            self.session.error_count(),
            entry.table.remaining(),
            entry.table.len()
        )
    }

    /// Text to draw this frame.
    pub fn hud_frame(&self) -> Vec<HudText> {
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);
        let entry = self.catalog.active();
        let hud = self.session.hud();
        let mut items = Vec::new();

        if let Some(name) = self.session.target_name(&entry.table) {
            items.push(HudText {
                text: format!("Find '{}'", name),
                position: (0.2 * w, 0.1 * h),
                size: self.font_size,
                color: WHITE,
                align: Align::TopLeft,
            });
            items.push(HudText {
                text: format!("Error counter: {}", self.session.error_count()),
                position: (0.65 * w, 0.1 * h),
                size: self.font_size,
                color: WHITE,
                align: Align::TopLeft,
            });
        }

        items.push(HudText {
            text: format!("{} - {}", entry.label, self.session.mode().description()),
            position: (0.02 * w, 0.95 * h),
            size: self.font_size * 0.5,
            color: GRAY,
            align: Align::TopLeft,
        });

        if let Some(label) = hud.label(self.catalog.generation()) {
            let world = self.layout().pixel_to_world(label.center);
            let screen = self.camera.world_to_screen(world.0, world.1);
            items.push(HudText {
                text: label.text.clone(),
                position: (screen.0 as f32, screen.1 as f32),
                size: self.font_size * 0.8,
                color: WHITE,
                align: Align::Center,
            });
        }

        if hud.wrong.is_active() {
            items.push(HudText {
                text: "Wrong!".to_string(),
                position: (w / 2.0, h / 2.0),
                size: self.font_size * 1.875,
                color: RED,
                align: Align::Center,
            });
        }

        if hud.warning.is_active() {
            items.push(HudText {
                text: "Click a province".to_string(),
                position: (w / 2.0, 0.1 * h),
                size: self.font_size,
                color: YELLOW,
                align: Align::Center,
            });
        }

        if self.session.mode() == Mode::Victory {
            items.push(HudText {
                text: "Victory!".to_string(),
                position: (w / 2.0, h / 2.0),
                size: self.font_size * 1.875,
                color: GREEN,
                align: Align::Center,
            });
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use quizdata::{CountryEntry, CountryId, KeyFormat, RegionId, RegionTable};

    const NORTH: Rgba<u8> = Rgba([0xff, 0, 0, 0xff]);
    const SOUTH: Rgba<u8> = Rgba([0, 0xff, 0, 0xff]);

    /// 100x100 map: top half North, bottom half South.
    fn entry(id: CountryId) -> CountryEntry {
        let mut reference = RgbaImage::from_pixel(100, 100, NORTH);
        for y in 50..100 {
            for x in 0..100 {
                reference.put_pixel(x, y, SOUTH);
            }
        }
        let reveal = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        let table = RegionTable::from_definitions(
            id.label(),
            KeyFormat::Rgba32,
            &[(0xff0000ff, "North"), (0x00ff00ff, "South")],
            2,
        )
        .unwrap();
        CountryEntry::new(id, reference, reveal, table).unwrap()
    }

    /// Screen 400x300 at scale 1.0: the map covers (150..250, 100..200).
    fn app() -> AppCore {
        let settings = Settings {
            image_scale: 1.0,
            window_size: (400, 300),
            ..Settings::default()
        };
        let catalog = CountryCatalog::from_entries(vec![
            entry(CountryId::Mexico),
            entry(CountryId::Japan),
        ])
        .unwrap();
        AppCore::new(catalog, &settings, Some(42))
    }

    fn click_region(app: &mut AppCore, id: RegionId) -> ClickOutcome {
        let y = if id == RegionId(0) { 120.0 } else { 180.0 };
        app.on_cursor_moved(200.0, y);
        app.on_left_click()
    }

    fn texts(app: &AppCore) -> Vec<String> {
        app.hud_frame().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_layout_is_centered() {
        let app = app();
        assert_eq!(app.layout().world_rect(), (150.0, 100.0, 100.0, 100.0));
    }

    #[test]
    fn test_click_outside_image() {
        let mut app = app();
        app.on_cursor_moved(10.0, 10.0);
        assert_eq!(app.on_left_click(), ClickOutcome::OutsideImage);
        assert_eq!(app.session.error_count(), 0);
    }

    #[test]
    fn test_full_round_reaches_victory() {
        let mut app = app();
        let first = app.session.target().unwrap();
        assert!(texts(&app).iter().any(|t| t.starts_with("Find '")));

        assert!(matches!(
            click_region(&mut app, first),
            ClickOutcome::Correct { first_try: true, .. }
        ));
        let second = app.session.target().unwrap();
        assert_ne!(first, second);
        click_region(&mut app, second);

        assert_eq!(app.session.mode(), Mode::Victory);
        let texts = texts(&app);
        assert!(texts.contains(&"Victory!".to_string()));
        assert!(!texts.iter().any(|t| t.starts_with("Find")));
    }

    #[test]
    fn test_wrong_message_expires() {
        let mut app = app();
        let target = app.session.target().unwrap();
        let other = RegionId(1 - target.0);
        click_region(&mut app, other);

        assert!(texts(&app).contains(&"Wrong!".to_string()));
        assert!(texts(&app).contains(&"Error counter: 1".to_string()));
        app.tick(0.5);
        assert!(texts(&app).contains(&"Wrong!".to_string()));
        app.tick(0.3);
        assert!(!texts(&app).contains(&"Wrong!".to_string()));
    }

    #[test]
    fn test_pan_moves_the_map_under_the_cursor() {
        let mut app = app();
        app.on_cursor_moved(200.0, 120.0);
        app.set_panning(true);
        // Drag the map down by 60px: North now sits under y=180
        app.on_cursor_moved(200.0, 180.0);
        app.set_panning(false);

        let target = app.session.target().unwrap();
        let outcome = app.on_left_click();
        if target == RegionId(0) {
            assert!(matches!(outcome, ClickOutcome::Correct { .. }));
        } else {
            assert!(matches!(outcome, ClickOutcome::Wrong { .. }));
        }
    }

    #[test]
    fn test_scroll_zoom_is_additive_and_clamped() {
        let mut app = app();
        app.on_cursor_moved(200.0, 150.0);
        app.on_scroll(2.0);
        assert!((app.camera.zoom - 1.25).abs() < 1e-9);
        app.on_scroll(-100.0);
        assert!((app.camera.zoom - MIN_ZOOM).abs() < 1e-9);
        // The point under the cursor stays put
        let world = app.camera.screen_to_world(200.0, 150.0);
        assert!((world.0 - 200.0).abs() < 1e-9 && (world.1 - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_learn_label_follows_generation() {
        let mut app = app();
        app.on_key(Action::Learn);
        assert_eq!(
            click_region(&mut app, RegionId(0)),
            ClickOutcome::Revealed { region: RegionId(0) }
        );
        let label = app
            .hud_frame()
            .into_iter()
            .find(|t| t.text == "North")
            .unwrap();
        // Region center (50, 25) in pixels -> screen (200, 125)
        assert_eq!(label.position, (200.0, 125.0));
        assert_eq!(label.align, Align::Center);

        app.on_key(Action::NextCountry);
        assert_eq!(app.catalog.active_index(), 1);
        assert_eq!(app.session.mode(), Mode::Learn);
        assert!(!texts(&app).contains(&"North".to_string()));
    }

    #[test]
    fn test_country_switch_resets_counters() {
        let mut app = app();
        let target = app.session.target().unwrap();
        click_region(&mut app, RegionId(1 - target.0));
        app.on_key(Action::SwitchCountry(1));
        assert_eq!(app.catalog.active_index(), 1);
        assert_eq!(app.session.error_count(), 0);
        assert!(app.catalog.active().reveal.is_pristine());

        // Out of range is logged and ignored
        app.on_key(Action::SwitchCountry(9));
        assert_eq!(app.catalog.active_index(), 1);
    }

    #[test]
    fn test_quit_and_debug_dump() {
        let mut app = app();
        app.on_key(Action::DebugDump);
        assert!(app.debug_summary().contains("zoom=1.000"));
        assert!(!app.tick(0.016).should_exit);
        app.on_key(Action::Quit);
        assert!(app.tick(0.016).should_exit);
    }
}
