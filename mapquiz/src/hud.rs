//! Transient HUD messages and their frame-rate independent timers.

use quizdata::RegionId;

/// Display lifetime of "Wrong!" and warnings, in seconds.
pub const STANDARD_LIFETIME: f32 = 0.7;

/// A visibility timer counted down by elapsed frame time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    lifetime: f32,
    remaining: f32,
    active: bool,
}

impl Countdown {
    pub fn new(lifetime: f32) -> Self {
        Self {
            lifetime,
            remaining: lifetime,
            active: false,
        }
    }

    /// Starts (or restarts) the countdown from its full lifetime.
    pub fn trigger(&mut self) {
        self.remaining = self.lifetime;
        self.active = true;
    }

    /// Advances by `dt` seconds. Returns whether the countdown is still
    /// running; on expiry it rewinds to the full lifetime and goes idle.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining -= dt.max(0.0);
        if self.remaining <= 0.0 {
            self.active = false;
            self.remaining = self.lifetime;
        }
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.remaining = self.lifetime;
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }
}

/// A region name shown over the map in learn mode.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionLabel {
    pub region: RegionId,
    pub text: String,
    /// Center of the region in reference pixel coordinates.
    pub center: (f32, f32),
    /// Catalog generation the label was created under.
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct Hud {
    pub wrong: Countdown,
    pub warning: Countdown,
    label: Option<(RegionLabel, Countdown)>,
    label_lifetime: f32,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new(STANDARD_LIFETIME)
    }
}

impl Hud {
    /// Learn-mode labels stay up three times as long as other messages.
    pub fn new(lifetime: f32) -> Self {
        Self {
            wrong: Countdown::new(lifetime),
            warning: Countdown::new(lifetime),
            label: None,
            label_lifetime: lifetime * 3.0,
        }
    }

    pub fn show_wrong(&mut self) {
        self.wrong.trigger();
    }

    pub fn show_warning(&mut self) {
        self.warning.trigger();
    }

    /// Replaces any label currently on screen.
    pub fn show_label(&mut self, label: RegionLabel) {
        let mut timer = Countdown::new(self.label_lifetime);
        timer.trigger();
        self.label = Some((label, timer));
    }

    pub fn tick(&mut self, dt: f32) {
        self.wrong.tick(dt);
        self.warning.tick(dt);
        if let Some((_, timer)) = self.label.as_mut()
            && !timer.tick(dt)
        {
            self.label = None;
        }
    }

    pub fn clear(&mut self) {
        self.wrong.cancel();
        self.warning.cancel();
        self.label = None;
    }

    /// The label to draw, if it is still alive and belongs to `generation`.
    pub fn label(&self, generation: u64) -> Option<&RegionLabel> {
        self.label
            .as_ref()
            .map(|(label, _)| label)
            .filter(|label| label.generation == generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(generation: u64) -> RegionLabel {
        RegionLabel {
            region: RegionId(3),
            text: "Oaxaca".to_string(),
            center: (10.0, 20.0),
            generation,
        }
    }

    #[test]
    fn test_countdown_expires_and_rewinds() {
        let mut c = Countdown::new(0.7);
        assert!(!c.tick(0.1), "idle countdown never runs");
        c.trigger();
        assert!(c.tick(0.3));
        assert!(c.tick(0.3));
        assert!(!c.tick(0.3));
        assert!(!c.is_active());
        // Retriggering starts from the full lifetime again
        c.trigger();
        assert!(c.tick(0.6));
    }

    #[test]
    fn test_countdown_is_frame_rate_independent() {
        let mut fast = Countdown::new(0.7);
        let mut slow = Countdown::new(0.7);
        fast.trigger();
        slow.trigger();
        for _ in 0..10 {
            fast.tick(1.0 / 60.0);
        }
        slow.tick(10.0 / 60.0);
        assert_eq!(fast.is_active(), slow.is_active());
        for _ in 0..40 {
            fast.tick(1.0 / 60.0);
        }
        slow.tick(40.0 / 60.0);
        assert!(!fast.is_active());
        assert!(!slow.is_active());
    }

    #[test]
    fn test_label_lifetime_is_three_times_standard() {
        let mut hud = Hud::new(0.7);
        hud.show_label(label(0));
        hud.tick(2.0);
        assert!(hud.label(0).is_some());
        hud.tick(0.2);
        assert!(hud.label(0).is_none());
    }

    #[test]
    fn test_stale_label_is_hidden() {
        let mut hud = Hud::default();
        hud.show_label(label(4));
        assert!(hud.label(4).is_some());
        assert!(hud.label(5).is_none());
    }

    #[test]
    fn test_clear() {
        let mut hud = Hud::default();
        hud.show_wrong();
        hud.show_warning();
        hud.show_label(label(0));
        hud.clear();
        assert!(!hud.wrong.is_active());
        assert!(!hud.warning.is_active());
        assert!(hud.label(0).is_none());
    }
}
