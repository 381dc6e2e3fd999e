//! The color key table: packed reference colors mapped to named regions.

use crate::DataError;
use crate::color::{ColorKey, KeyFormat};
use crate::datasets::CountryId;
use image::Rgba;
use serde::Serialize;
use std::collections::HashMap;

/// Index of a region inside its table.
///
/// Only meaningful for the table that produced it; tables are rebuilt on
/// every country switch, so handles must not be kept across one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegionId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub color_key: ColorKey,
    pub name: String,
    pub guessed: bool,
    /// Center of the region's pixels, recorded the last time it was revealed
    /// in learn mode.
    pub last_bounding_center: Option<(f32, f32)>,
}

#[derive(Debug, Clone)]
pub struct RegionTable {
    country: String,
    format: KeyFormat,
    regions: Vec<Region>,
    by_color: HashMap<ColorKey, RegionId>,
    /// Source `(color literal, name)` pairs and the expected count, kept so
    /// the table can be rebuilt from scratch.
    definitions: Vec<(u32, String)>,
    expected: usize,
}

impl RegionTable {
    /// Builds the table for one of the shipped countries.
    pub fn build(country: CountryId) -> Result<Self, DataError> {
        Self::from_definitions(
            country.label(),
            country.key_format(),
            country.definitions(),
            country.expected_regions(),
        )
    }

    /// Builds a table from raw `(color literal, name)` pairs.
    ///
    /// Fails if two entries share a color or if the number of distinct
    /// regions differs from `expected`.
    pub fn from_definitions(
        country: &str,
        format: KeyFormat,
        definitions: &[(u32, &str)],
        expected: usize,
    ) -> Result<Self, DataError> {
        let mut regions: Vec<Region> = Vec::with_capacity(definitions.len());
        let mut by_color: HashMap<ColorKey, RegionId> = HashMap::with_capacity(definitions.len());

        for &(literal, name) in definitions {
            let key = format.key_from_literal(literal);
            if let Some(existing) = by_color.get(&key) {
                let first: &Region = &regions[existing.0];
                return Err(DataError::DuplicateColor {
                    country: country.to_string(),
                    color: key,
                    first: first.name.clone(),
                    second: name.to_string(),
                });
            }
            by_color.insert(key, RegionId(regions.len()));
            regions.push(Region {
                color_key: key,
                name: name.to_string(),
                guessed: false,
                last_bounding_center: None,
            });
        }

        if regions.len() != expected {
            return Err(DataError::RegionCount {
                country: country.to_string(),
                expected,
                found: regions.len(),
            });
        }

        log::debug!("Built color key table for {} ({} regions)", country, regions.len());

        Ok(Self {
            country: country.to_string(),
            format,
            regions,
            by_color,
            definitions: definitions
                .iter()
                .map(|&(literal, name)| (literal, name.to_string()))
                .collect(),
            expected,
        })
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn key_format(&self) -> KeyFormat {
        self.format
    }

    pub fn lookup(&self, key: ColorKey) -> Option<RegionId> {
        self.by_color.get(&key).copied()
    }

    /// Looks up a sampled reference pixel, packing it per the table's format.
    pub fn lookup_pixel(&self, pixel: &Rgba<u8>) -> Option<RegionId> {
        self.lookup(self.format.key_for(pixel))
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    pub fn get_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.regions.iter().enumerate().map(|(i, r)| (RegionId(i), r))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions still waiting to be guessed, in table order.
    pub fn unguessed(&self) -> Vec<RegionId> {
        self.iter()
            .filter(|(_, r)| !r.guessed)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.regions.iter().filter(|r| !r.guessed).count()
    }

    /// Builds a fresh table from the definitions this one was built from,
    /// repeating the duplicate and count checks.
    pub fn rebuilt(&self) -> Result<Self, DataError> {
        let definitions: Vec<(u32, &str)> = self
            .definitions
            .iter()
            .map(|(literal, name)| (*literal, name.as_str()))
            .collect();
        Self::from_definitions(&self.country, self.format, &definitions, self.expected)
    }

    pub fn clear_guesses(&mut self) {
        for region in &mut self.regions {
            region.guessed = false;
            region.last_bounding_center = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small_table() -> RegionTable {
        RegionTable::from_definitions(
            "Testland",
            KeyFormat::Rgba32,
            &[(0xff0000ff, "North"), (0x00ff00ff, "South"), (0x0000ffff, "East")],
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_every_country_builds() {
        for country in CountryId::ALL {
            let table = RegionTable::build(country).unwrap();
            assert_eq!(table.len(), country.expected_regions());
            assert_eq!(table.remaining(), table.len());
        }
    }

    #[test]
    fn test_documented_counts() {
        let counts: Vec<_> = CountryId::ALL
            .iter()
            .map(|c| RegionTable::build(*c).unwrap().len())
            .collect();
        assert_eq!(counts, vec![32, 27, 47, 11, 16]);
    }

    #[test]
    fn test_mexico_lookup_by_rgb() {
        let table = RegionTable::build(CountryId::Mexico).unwrap();
        let id = table.lookup_pixel(&Rgba([0xe9, 0x4f, 0x37, 0xff])).unwrap();
        assert_eq!(table.get(id).unwrap().name, "Jalisco");
        // Rgb24 tables ignore the sampled alpha
        assert_eq!(table.lookup_pixel(&Rgba([0xe9, 0x4f, 0x37, 0x10])), Some(id));
    }

    #[test]
    fn test_rgba_table_rejects_partial_alpha() {
        let table = small_table();
        assert!(table.lookup_pixel(&Rgba([0xff, 0, 0, 0xff])).is_some());
        assert!(table.lookup_pixel(&Rgba([0xff, 0, 0, 0x80])).is_none());
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let err = RegionTable::from_definitions(
            "Testland",
            KeyFormat::Rgba32,
            &[(0xff0000ff, "North")],
            2,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DataError::RegionCount {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_color_is_rejected() {
        let err = RegionTable::from_definitions(
            "Testland",
            KeyFormat::Rgb24,
            &[(0x123456, "A"), (0x123456, "B")],
            2,
        )
        .unwrap_err();
        match err {
            DataError::DuplicateColor { first, second, .. } => {
                assert_eq!(first, "A");
                assert_eq!(second, "B");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unguessed_and_clear() {
        let mut table = small_table();
        table.get_mut(RegionId(1)).unwrap().guessed = true;
        table.get_mut(RegionId(1)).unwrap().last_bounding_center = Some((1.0, 2.0));
        assert_eq!(table.unguessed(), vec![RegionId(0), RegionId(2)]);
        assert_eq!(table.remaining(), 2);

        table.clear_guesses();
        assert_eq!(table.remaining(), 3);
        assert_eq!(table.get(RegionId(1)).unwrap().last_bounding_center, None);
    }

    #[test]
    fn test_rebuilt_starts_from_definitions() {
        let mut table = RegionTable::build(CountryId::Philippines).unwrap();
        let first = RegionId(0);
        table.get_mut(first).unwrap().guessed = true;
        table.get_mut(first).unwrap().name = "Renamed".to_string();

        let fresh = table.rebuilt().unwrap();
        assert_eq!(fresh.len(), 11);
        assert_eq!(fresh.remaining(), 11);
        assert_eq!(
            fresh.get(first).unwrap().name,
            RegionTable::build(CountryId::Philippines)
                .unwrap()
                .get(first)
                .unwrap()
                .name
        );
    }

    #[test]
    fn test_rebuilt_synthetic_table_keeps_keys() {
        let fresh = small_table().rebuilt().unwrap();
        assert_eq!(fresh.country(), "Testland");
        assert_eq!(fresh.len(), 3);
        assert_eq!(fresh.lookup(ColorKey(0x0000ffff)), Some(RegionId(2)));
    }

    proptest! {
        #[test]
        fn prop_lookup_finds_every_region(index in 0usize..47) {
            let table = RegionTable::build(CountryId::Japan).unwrap();
            let (id, region) = table.iter().nth(index).unwrap();
            prop_assert_eq!(table.lookup(region.color_key), Some(id));
        }

        #[test]
        fn prop_unknown_colors_miss(raw in any::<u32>()) {
            let table = RegionTable::build(CountryId::Brazil).unwrap();
            let key = ColorKey(raw);
            let known = table.iter().any(|(_, r)| r.color_key == key);
            prop_assert_eq!(table.lookup(key).is_some(), known);
        }
    }
}
