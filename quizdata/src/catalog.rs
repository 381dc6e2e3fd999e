//! The country catalog: per-country bitmaps plus the active color key table.

use crate::DataError;
use crate::datasets::CountryId;
use crate::regions::RegionTable;
use image::RgbaImage;
use std::path::Path;

/// The player-visible map image.
///
/// Keeps the pixels it was loaded with so that a reset or a mode change can
/// undo every paint operation. `revision` changes whenever the pixels may
/// have changed; the renderer compares it against the revision it last
/// uploaded to decide when to regenerate the display texture.
#[derive(Debug, Clone)]
pub struct RevealBitmap {
    pristine: RgbaImage,
    current: RgbaImage,
    revision: u64,
}

impl RevealBitmap {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            current: image.clone(),
            pristine: image,
            revision: 0,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.current
    }

    /// Mutable access for painting. Bumps the revision.
    pub fn image_mut(&mut self) -> &mut RgbaImage {
        self.revision += 1;
        &mut self.current
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.current.dimensions()
    }

    /// Restores the pixels the bitmap was loaded with.
    pub fn reset(&mut self) {
        self.current.clone_from(&self.pristine);
        self.revision += 1;
    }

    pub fn is_pristine(&self) -> bool {
        self.current == self.pristine
    }
}

#[derive(Debug, Clone)]
pub struct CountryEntry {
    pub id: CountryId,
    pub label: String,
    /// Flat-color identification image. Never modified after load.
    pub reference: RgbaImage,
    pub reveal: RevealBitmap,
    pub table: RegionTable,
}

impl CountryEntry {
    /// Assembles an entry, checking that both bitmaps share dimensions.
    pub fn new(
        id: CountryId,
        reference: RgbaImage,
        reveal: RgbaImage,
        table: RegionTable,
    ) -> Result<Self, DataError> {
        let label = table.country().to_string();
        if reference.width() == 0 || reference.height() == 0 {
            return Err(DataError::EmptyImage { country: label });
        }
        if reference.dimensions() != reveal.dimensions() {
            return Err(DataError::DimensionMismatch {
                country: label,
                reference: reference.dimensions(),
                reveal: reveal.dimensions(),
            });
        }
        Ok(Self {
            id,
            label,
            reference,
            reveal: RevealBitmap::new(reveal),
            table,
        })
    }

    /// Loads `<slug>-colored.png` and `<slug>-black-white.png` from `dir`.
    pub fn load(dir: &Path, id: CountryId) -> Result<Self, DataError> {
        let reference = load_rgba(&dir.join(format!("{}-colored.png", id.slug())))?;
        let reveal = load_rgba(&dir.join(format!("{}-black-white.png", id.slug())))?;
        log::info!(
            "Loaded {} maps: reference {:?}, reveal {:?}",
            id.label(),
            reference.dimensions(),
            reveal.dimensions()
        );
        Self::new(id, reference, reveal, RegionTable::build(id)?)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.reference.dimensions()
    }

    fn reload(&mut self) -> Result<(), DataError> {
        self.table = self.table.rebuilt()?;
        self.reveal.reset();
        Ok(())
    }
}

fn load_rgba(path: &Path) -> Result<RgbaImage, DataError> {
    if !path.exists() {
        return Err(DataError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| DataError::Image {
            path: path.to_path_buf(),
            source,
        })
}

/// Every loaded country, with exactly one active at a time.
///
/// `generation` increases whenever the active table is replaced or reset, so
/// anything holding a `RegionId` can tell that its handle went stale.
#[derive(Debug)]
pub struct CountryCatalog {
    entries: Vec<CountryEntry>,
    active: usize,
    generation: u64,
}

impl CountryCatalog {
    /// Loads the given countries from an asset directory.
    pub fn load(dir: &Path, countries: &[CountryId]) -> Result<Self, DataError> {
        let entries = countries
            .iter()
            .map(|&id| CountryEntry::load(dir, id))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<CountryEntry>) -> Result<Self, DataError> {
        if entries.is_empty() {
            return Err(DataError::EmptyCatalog);
        }
        Ok(Self {
            entries,
            active: 0,
            generation: 0,
        })
    }

    pub fn active(&self) -> &CountryEntry {
        &self.entries[self.active]
    }

    pub fn active_mut(&mut self) -> &mut CountryEntry {
        &mut self.entries[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn entries(&self) -> &[CountryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn position(&self, id: CountryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Makes `index` the active country with a pristine reveal bitmap and a
    /// freshly built table.
    pub fn switch_to(&mut self, index: usize) -> Result<(), DataError> {
        if index >= self.entries.len() {
            return Err(DataError::UnknownCountry(index));
        }
        self.entries[index].reload()?;
        self.active = index;
        self.generation += 1;
        log::info!("Switched to {}", self.entries[index].label);
        Ok(())
    }

    /// Undoes all paint operations and guesses on the active country.
    pub fn reset_active(&mut self) {
        let entry = &mut self.entries[self.active];
        entry.reveal.reset();
        entry.table.clear_guesses();
        self.generation += 1;
    }
}
