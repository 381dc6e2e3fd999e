//! Quiz state machine.
//!
//! A session is either quizzing the player on a random target region,
//! letting them explore region names (learn mode), or showing the victory
//! screen once every region has been found. The session owns no map data:
//! every operation borrows the catalog, paints through the reveal compositor
//! and reads the active color key table.

use crate::hud::{Hud, RegionLabel};
use crate::resolver::Resolution;
use crate::reveal;
use crate::settings::{PaintColors, Settings};
use quizdata::{ColorKey, CountryCatalog, CountryEntry, RegionId, RegionTable};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Find the prompted region.
    #[default]
    Quiz,
    /// Click regions to see their names.
    Learn,
    /// Every region has been found.
    Victory,
}

impl Mode {
    pub fn description(&self) -> &'static str {
        match self {
            Mode::Quiz => "Quiz (L: learn, R: reset)",
            Mode::Learn => "Learn (R: back to quiz)",
            Mode::Victory => "Victory (R: play again)",
        }
    }
}

/// What a click did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    OutsideImage,
    /// The click hit a border or another color missing from the table.
    Unrecognized,
    Correct {
        region: RegionId,
        first_try: bool,
    },
    /// A valid region that is not the target. `forced` holds the target when
    /// this miss exhausted the round and it was revealed as incorrect.
    Wrong {
        clicked: RegionId,
        forced: Option<RegionId>,
    },
    /// Learn mode showed this region's name.
    Revealed { region: RegionId },
    /// Nothing to do in the current mode.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    mode: Mode,
    target: Option<RegionId>,
    error_count: u64,
    misses_this_round: u8,
    miss_threshold: u8,
    colors: PaintColors,
    rng: StdRng,
    hud: Hud,
}

impl QuizSession {
    /// Creates a session. A fixed `seed` makes target selection repeatable.
    pub fn new(settings: &Settings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mode: Mode::Quiz,
            target: None,
            error_count: 0,
            misses_this_round: 0,
            miss_threshold: settings.miss_threshold.max(1),
            colors: settings.colors,
            rng,
            hud: Hud::new(settings.hud_lifetime),
        }
    }

    /// Begins quizzing on the active country as it currently stands.
    pub fn start(&mut self, catalog: &CountryCatalog) {
        self.mode = Mode::Quiz;
        self.misses_this_round = 0;
        self.advance(&catalog.active().table);
    }

    pub fn handle_click(
        &mut self,
        catalog: &mut CountryCatalog,
        resolution: Resolution,
    ) -> ClickOutcome {
        let generation = catalog.generation();
        let entry = catalog.active_mut();

        match resolution {
            Resolution::OutsideImage => ClickOutcome::OutsideImage,
            Resolution::Unrecognized { .. } => {
                if self.mode == Mode::Learn {
                    self.hud.show_warning();
                }
                ClickOutcome::Unrecognized
            }
            Resolution::Region { id, .. } => match self.mode {
                Mode::Quiz => self.guess(entry, id),
                Mode::Learn => self.reveal(entry, id, generation),
                Mode::Victory => ClickOutcome::Ignored,
            },
        }
    }

    fn guess(&mut self, entry: &mut CountryEntry, clicked: RegionId) -> ClickOutcome {
        let Some(target) = self.target else {
            return ClickOutcome::Ignored;
        };
        if entry.table.get(target).is_none() {
            log::warn!("Target {:?} is not in the {} table", target, entry.label);
            return ClickOutcome::Ignored;
        }

        if clicked == target {
            let first_try = self.misses_this_round == 0;
            let paint = if first_try {
                self.colors.perfect
            } else {
                self.colors.with_errors
            };
            paint_and_mark(entry, target, paint);
            log::info!(
                "Correct: {} ({})",
                region_name(&entry.table, target),
                if first_try { "first try" } else { "after misses" }
            );
            self.misses_this_round = 0;
            self.advance(&entry.table);
            return ClickOutcome::Correct {
                region: target,
                first_try,
            };
        }

        self.error_count += 1;
        self.misses_this_round += 1;
        self.hud.show_wrong();
        log::info!(
            "Wrong: clicked {} looking for {} (miss {}/{})",
            region_name(&entry.table, clicked),
            region_name(&entry.table, target),
            self.misses_this_round,
            self.miss_threshold
        );

        if self.misses_this_round < self.miss_threshold {
            return ClickOutcome::Wrong {
                clicked,
                forced: None,
            };
        }

        paint_and_mark(entry, target, self.colors.incorrect);
        log::info!(
            "Revealing {} after {} misses",
            region_name(&entry.table, target),
            self.misses_this_round
        );
        self.misses_this_round = 0;
        self.advance(&entry.table);
        ClickOutcome::Wrong {
            clicked,
            forced: Some(target),
        }
    }

    fn reveal(
        &mut self,
        entry: &mut CountryEntry,
        region: RegionId,
        generation: u64,
    ) -> ClickOutcome {
        let stats = reveal::paint_table_region(
            entry.reveal.image_mut(),
            &entry.reference,
            &entry.table,
            region,
            self.colors.learn.to_pixel(),
        );
        let Some(center) = stats.bounds.map(|b| b.center()) else {
            return ClickOutcome::Ignored;
        };
        let Some(info) = entry.table.get_mut(region) else {
            return ClickOutcome::Ignored;
        };
        info.last_bounding_center = Some(center);
        log::debug!("Learn: {} centered at {:?}", info.name, center);
        self.hud.show_label(RegionLabel {
            region,
            text: info.name.clone(),
            center,
            generation,
        });
        ClickOutcome::Revealed { region }
    }

    /// Picks the next target uniformly among unguessed regions, or ends the
    /// quiz if there are none.
    fn advance(&mut self, table: &RegionTable) {
        let unguessed = table.unguessed();
        self.target = unguessed.choose(&mut self.rng).copied();
        match self.target {
            Some(id) => log::debug!("Next target: {}", region_name(table, id)),
            None => {
                self.mode = Mode::Victory;
                log::info!("Victory! {} errors on {}", self.error_count, table.country());
            }
        }
    }

    /// Switches to learn mode on an unmarked map.
    pub fn enter_learn(&mut self, catalog: &mut CountryCatalog) {
        catalog.reset_active();
        self.mode = Mode::Learn;
        self.target = None;
        self.error_count = 0;
        self.misses_this_round = 0;
        self.hud.clear();
        log::info!("Entered learn mode on {}", catalog.active().label);
    }

    /// Starts a fresh quiz round on the active country.
    pub fn reset(&mut self, catalog: &mut CountryCatalog) {
        catalog.reset_active();
        self.error_count = 0;
        self.hud.clear();
        self.start(catalog);
        log::info!("Quiz reset on {}", catalog.active().label);
    }

    /// Call after the catalog switched its active country.
    pub fn on_country_switched(&mut self, catalog: &CountryCatalog) {
        self.error_count = 0;
        self.misses_this_round = 0;
        self.hud.clear();
        if self.mode == Mode::Learn {
            self.target = None;
        } else {
            self.start(catalog);
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.hud.tick(dt);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn target(&self) -> Option<RegionId> {
        self.target
    }

    pub fn target_name<'a>(&self, table: &'a RegionTable) -> Option<&'a str> {
        self.target
            .and_then(|id| table.get(id))
            .map(|r| r.name.as_str())
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn misses_this_round(&self) -> u8 {
        self.misses_this_round
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    #[cfg(test)]
    fn force_target(&mut self, id: RegionId) {
        self.mode = Mode::Quiz;
        self.target = Some(id);
    }
}

/// Paints every pixel of `id` and marks it guessed.
fn paint_and_mark(entry: &mut CountryEntry, id: RegionId, paint: ColorKey) {
    let stats = reveal::paint_table_region(
        entry.reveal.image_mut(),
        &entry.reference,
        &entry.table,
        id,
        paint.to_pixel(),
    );
    log::debug!("Painted {} pixels with {}", stats.painted, paint);
    if let Some(region) = entry.table.get_mut(id) {
        region.guessed = true;
    }
}

fn region_name(table: &RegionTable, id: RegionId) -> &str {
    table.get(id).map(|r| r.name.as_str()).unwrap_or("?")
}
