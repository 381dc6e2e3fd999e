//! Static data for the map quiz.
//!
//! Each supported country ships a pair of bitmaps: a flat-color *reference*
//! image where every region is painted in a unique color, and a *reveal*
//! image that is shown to the player and repainted as regions are guessed.
//! This crate owns the color keys, the per-country region datasets, and the
//! catalog that loads and validates both bitmaps.

pub mod catalog;
pub mod color;
pub mod datasets;
pub mod regions;

use std::path::PathBuf;
use thiserror::Error;

pub use catalog::{CountryCatalog, CountryEntry, RevealBitmap};
pub use color::{ColorKey, KeyFormat};
pub use datasets::CountryId;
pub use regions::{Region, RegionId, RegionTable};

/// Errors raised while building tables or loading country assets.
///
/// Everything except `UnknownCountry` indicates corrupted static data and is
/// treated as fatal at startup.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{country}: expected {expected} regions, found {found}")]
    RegionCount {
        country: String,
        expected: usize,
        found: usize,
    },
    #[error("{country}: color {color} is assigned to both '{first}' and '{second}'")]
    DuplicateColor {
        country: String,
        color: ColorKey,
        first: String,
        second: String,
    },
    #[error(
        "{country}: reference image is {reference:?} but reveal image is {reveal:?}"
    )]
    DimensionMismatch {
        country: String,
        reference: (u32, u32),
        reveal: (u32, u32),
    },
    #[error("{country}: image has zero width or height")]
    EmptyImage { country: String },
    #[error("catalog has no countries")]
    EmptyCatalog,
    #[error("unknown country index {0}")]
    UnknownCountry(usize),
}
