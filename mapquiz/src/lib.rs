//! Map quiz: find the prompted region on a country's outline map.
//!
//! The library holds everything that does not need a window: camera math,
//! click resolution, the reveal compositor, the quiz state machine and the
//! HUD. The `mapquiz` binary adds the wgpu renderer and the winit loop.

pub mod app;
pub mod camera;
pub mod hud;
pub mod quiz;
pub mod resolver;
pub mod reveal;
pub mod settings;
pub mod text;

pub use app::{Action, AppCore};
pub use quiz::{ClickOutcome, Mode, QuizSession};
pub use settings::Settings;
