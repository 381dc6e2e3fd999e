//! Headless commands: asset checks, table dumps and offline reveals.

use anyhow::{Context, Result, bail};
use mapquiz::reveal;
use mapquiz::settings::Settings;
use quizdata::{CountryEntry, CountryId, RegionId, RegionTable};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Serialize)]
struct RegionDump<'a> {
    index: usize,
    color: String,
    name: &'a str,
}

#[derive(Serialize)]
struct TableDump<'a> {
    country: &'a str,
    format: quizdata::KeyFormat,
    regions: Vec<RegionDump<'a>>,
}

/// Color key table of `country` as pretty-printed JSON.
pub fn dump_regions(country: CountryId) -> Result<String> {
    let table = RegionTable::build(country)?;
    let dump = TableDump {
        country: table.country(),
        format: table.key_format(),
        regions: table
            .iter()
            .map(|(id, region)| RegionDump {
                index: id.0,
                color: region.color_key.to_string(),
                name: &region.name,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&dump)?)
}

/// Regions whose key color appears at least once in the reference bitmap.
pub fn regions_present(entry: &CountryEntry) -> BTreeSet<RegionId> {
    entry
        .reference
        .pixels()
        .filter_map(|p| entry.table.lookup_pixel(p))
        .collect()
}

/// Loads every country and reports its dimensions and region coverage.
pub fn check(assets: &Path, countries: &[CountryId]) -> Result<()> {
    for &country in countries {
        let entry = CountryEntry::load(assets, country)
            .with_context(|| format!("checking {}", country.label()))?;
        let (w, h) = entry.dimensions();
        let present = regions_present(&entry);
        println!(
            "{}: {} regions, {}x{}, {}/{} colors found in reference",
            entry.label,
            entry.table.len(),
            w,
            h,
            present.len(),
            entry.table.len()
        );
        for (id, region) in entry.table.iter() {
            if !present.contains(&id) {
                log::warn!(
                    "{}: no pixel of color {} for '{}'",
                    entry.label,
                    region.color_key,
                    region.name
                );
            }
        }
    }
    Ok(())
}

/// Paints the named regions (or all) of `country` and saves the reveal map.
pub fn reveal(
    assets: &Path,
    country: CountryId,
    names: &[String],
    all: bool,
    output: &Path,
    settings: &Settings,
) -> Result<()> {
    let mut entry = CountryEntry::load(assets, country)?;

    let targets: Vec<RegionId> = if all {
        entry.table.iter().map(|(id, _)| id).collect()
    } else {
        names
            .iter()
            .map(|name| find_region(&entry.table, name))
            .collect::<Result<_>>()?
    };
    if targets.is_empty() {
        bail!("nothing to reveal: pass --region NAME or --all");
    }

    let paint = settings.colors.perfect.to_pixel();
    let mut pixels = 0;
    for &id in &targets {
        let stats = reveal::paint_table_region(
            entry.reveal.image_mut(),
            &entry.reference,
            &entry.table,
            id,
            paint,
        );
        pixels += stats.painted;
    }

    entry
        .reveal
        .image()
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Painted {} regions ({} pixels) into {}",
        targets.len(),
        pixels,
        output.display()
    );
    Ok(())
}

fn find_region(table: &RegionTable, name: &str) -> Result<RegionId> {
    table
        .iter()
        .find(|(_, r)| r.name.eq_ignore_ascii_case(name.trim()))
        .map(|(id, _)| id)
        .with_context(|| format!("{} has no region named '{}'", table.country(), name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    /// Writes a Mexico asset pair with Sonora on the left and Jalisco on
    /// the right.
    fn write_mexico(dir: &Path) {
        let mut reference = RgbaImage::from_pixel(4, 2, Rgba([0x80, 0, 0, 0xff]));
        for y in 0..2 {
            reference.put_pixel(2, y, Rgba([0xe9, 0x4f, 0x37, 0xff]));
            reference.put_pixel(3, y, Rgba([0xe9, 0x4f, 0x37, 0xff]));
        }
        reference.save(dir.join("mexico-colored.png")).unwrap();
        RgbaImage::from_pixel(4, 2, Rgba([0, 0, 0, 0xff]))
            .save(dir.join("mexico-black-white.png"))
            .unwrap();
    }

    #[test]
    fn test_dump_regions_is_json() {
        let json = dump_regions(CountryId::Philippines).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["regions"].as_array().unwrap().len(), 11);
        assert_eq!(value["format"], "Rgba32");
    }

    #[test]
    fn test_regions_present() {
        let dir = tempdir().unwrap();
        write_mexico(dir.path());
        let entry = CountryEntry::load(dir.path(), CountryId::Mexico).unwrap();
        let names: Vec<_> = regions_present(&entry)
            .into_iter()
            .map(|id| entry.table.get(id).unwrap().name.clone())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Sonora".to_string()));
        assert!(names.contains(&"Jalisco".to_string()));
    }

    #[test]
    fn test_reveal_writes_painted_png() {
        let dir = tempdir().unwrap();
        write_mexico(dir.path());
        let out = dir.path().join("out.png");
        reveal(
            dir.path(),
            CountryId::Mexico,
            &["jalisco".to_string()],
            false,
            &out,
            &Settings::default(),
        )
        .unwrap();

        let img = image::open(&out).unwrap().to_rgba8();
        let perfect = Settings::default().colors.perfect.to_pixel();
        assert_eq!(*img.get_pixel(3, 1), perfect);
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 0xff]));
    }

    #[test]
    fn test_reveal_unknown_region_fails() {
        let dir = tempdir().unwrap();
        write_mexico(dir.path());
        let err = reveal(
            dir.path(),
            CountryId::Mexico,
            &["Atlantis".to_string()],
            false,
            &dir.path().join("out.png"),
            &Settings::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Atlantis"));
    }
}
