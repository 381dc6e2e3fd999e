use anyhow::{Context, Result};
use clap::Parser;
use mapquiz::AppCore;
use mapquiz::settings::Settings;
use mapquiz::text::TextRenderer;
use quizdata::CountryCatalog;

mod args;
mod ops;
mod render;
mod window;

use args::{Cli, Commands};

fn run(args: Cli) -> Result<()> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match args.command.as_ref().unwrap_or(&Commands::Play) {
        Commands::Play => {
            let catalog = CountryCatalog::load(&args.assets, &args.country_list())
                .context("loading country assets")?;
            let font_data = std::fs::read(&settings.font)
                .with_context(|| format!("reading font {}", settings.font.display()))?;
            let text = TextRenderer::new(font_data)
                .with_context(|| format!("parsing font {}", settings.font.display()))?;

            let core = AppCore::new(catalog, &settings, args.seed);
            window::run(core, text, settings.background)
        }
        Commands::Check => ops::check(&args.assets, &args.country_list()),
        Commands::Regions { country } => {
            println!("{}", ops::dump_regions(*country)?);
            Ok(())
        }
        Commands::Reveal {
            country,
            regions,
            all,
            output,
        } => ops::reveal(&args.assets, *country, regions, *all, output, &settings),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    log::debug!("Starting with {:?}", args);
    run(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizdata::CountryId;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn cli(assets: PathBuf, command: Commands) -> Cli {
        Cli {
            assets,
            countries: Vec::new(),
            config: None,
            seed: Some(1),
            log_level: "info".to_string(),
            command: Some(command),
        }
    }

    #[test]
    fn test_regions_needs_no_assets() {
        let dir = tempdir().unwrap();
        let args = cli(
            dir.path().join("missing"),
            Commands::Regions {
                country: CountryId::Malaysia,
            },
        );
        assert!(run(args).is_ok());
    }

    #[test]
    fn test_check_fails_without_assets() {
        let dir = tempdir().unwrap();
        let err = run(cli(dir.path().to_path_buf(), Commands::Check)).unwrap_err();
        assert!(format!("{:#}", err).contains("mexico-colored.png"));
    }

    #[test]
    fn test_bad_config_is_fatal() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("settings.json");
        std::fs::write(&config, "{ not json").unwrap();
        let mut args = cli(
            dir.path().to_path_buf(),
            Commands::Regions {
                country: CountryId::Japan,
            },
        );
        args.config = Some(config);
        assert!(run(args).is_err());
    }
}
