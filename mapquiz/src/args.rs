use clap::{Parser, Subcommand};
use quizdata::CountryId;
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `<country>-colored.png` and `<country>-black-white.png`
    #[arg(long, default_value = "resources")]
    pub assets: PathBuf,

    /// Countries to load, in switching order (default: all)
    #[arg(long = "country", value_name = "COUNTRY")]
    pub countries: Vec<CountryId>,

    /// JSON settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for target selection, for repeatable rounds
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace). RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The countries to load, defaulting to every shipped dataset.
    pub fn country_list(&self) -> Vec<CountryId> {
        if self.countries.is_empty() {
            CountryId::ALL.to_vec()
        } else {
            self.countries.clone()
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Open the quiz window (default behavior).
    Play,

    /// Load every selected country and validate its assets.
    Check,

    /// Dump a country's color key table as JSON.
    Regions {
        /// Country slug (e.g. mexico, japan).
        country: CountryId,
    },

    /// Paint regions into a country's reveal map and save it (headless).
    Reveal {
        /// Country slug (e.g. mexico, japan).
        country: CountryId,

        /// Region names to paint. Repeat for several.
        #[arg(long = "region", value_name = "NAME")]
        regions: Vec<String>,

        /// Paint every region.
        #[arg(long, conflicts_with = "regions")]
        all: bool,

        /// Output path for the image.
        #[arg(short, long, default_value = "reveal.png")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["mapquiz"]);
        assert_eq!(cli.assets, PathBuf::from("resources"));
        assert_eq!(cli.command, None);
        assert_eq!(cli.country_list(), CountryId::ALL.to_vec());
    }

    #[test]
    fn test_country_order_is_kept() {
        let cli = Cli::parse_from(["mapquiz", "--country", "japan", "--country", "Mexico"]);
        assert_eq!(cli.country_list(), vec![CountryId::Japan, CountryId::Mexico]);
    }

    #[test]
    fn test_reveal_subcommand() {
        let cli = Cli::parse_from([
            "mapquiz",
            "reveal",
            "mexico",
            "--region",
            "Jalisco",
            "--region",
            "Sonora",
            "-o",
            "out.png",
        ]);
        assert_eq!(
            cli.command,
            Some(Commands::Reveal {
                country: CountryId::Mexico,
                regions: vec!["Jalisco".to_string(), "Sonora".to_string()],
                all: false,
                output: PathBuf::from("out.png"),
            })
        );
    }

    #[test]
    fn test_unknown_country_is_rejected() {
        assert!(Cli::try_parse_from(["mapquiz", "regions", "atlantis"]).is_err());
    }
}
