use std::process::ExitCode;

use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode};
use weatherwise_core::{
    Config, FileStore, KeyValueStore, LAST_CITY_KEY, ProviderId, WeatherLookup, WeatherSession,
    default_weather_service_from_config, geocoder_from_config, remember_city,
    weather_service_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherwise", version, about = "Current weather for a city")]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name: "openweather", "weatherapi" or "visualcrossing".
        provider: String,
    },

    /// Show current weather for a city.
    Show {
        /// City name. When omitted, the last searched city is looked up again.
        city: Option<String>,

        /// Weather provider to use instead of the configured default.
        #[arg(long)]
        provider: Option<String>,

        /// Print the card as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the last searched city.
    Last,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure { provider } => configure(&provider)?,
            Command::Show { city, provider, json } => {
                return show(city, provider.as_deref(), json).await;
            }
            Command::Last => {
                let store = FileStore::new(Config::state_file_path()?);
                match store.get(LAST_CITY_KEY)? {
                    Some(city) => println!("{city}"),
                    None => println!("No city searched yet."),
                }
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(anyhow!("API key must not be empty."));
    }

    config.upsert_provider_api_key(id, api_key.to_string());

    if config.default_provider_id().ok() != Some(id) {
        let make_default = Confirm::new(&format!("Use {id} as the default weather provider?"))
            .with_default(true)
            .prompt()
            .context("Failed to read answer")?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    config.save()?;
    println!("Saved {id} credentials to {}", Config::config_file_path()?.display());

    if !config.is_provider_configured(ProviderId::OpenWeather) {
        println!(
            "Note: city names are resolved through OpenWeather.\n\
             Run `weatherwise configure openweather` before looking up weather."
        );
    }

    Ok(())
}

async fn show(
    city: Option<String>,
    provider: Option<&str>,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let mut store = FileStore::new(Config::state_file_path()?);

    // A submitted city is kept even if the providers below are not set up.
    let (city, result) = match city {
        Some(city) => match remember_city(&mut store, &city).map(str::to_string) {
            Ok(trimmed) => {
                let lookup = build_lookup(provider)?;
                let result = lookup.lookup(&trimmed).await;
                (trimmed, result)
            }
            Err(err) => (city, Err(err)),
        },
        None => {
            let mut session = WeatherSession::new(build_lookup(provider)?, Box::new(store));
            session.startup().await.ok_or_else(|| {
                anyhow!(
                    "No city given and no previous search to repeat.\n\
                     Hint: run `weatherwise show <city>`."
                )
            })?
        }
    };

    match result {
        Ok(view) => {
            render::print_view(&view, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!("lookup for '{city}' failed: {err:?}");
            eprintln!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn build_lookup(provider: Option<&str>) -> anyhow::Result<WeatherLookup> {
    let config = Config::load()?;

    let weather = match provider {
        Some(p) => weather_service_from_config(ProviderId::try_from(p)?, &config)?,
        None => default_weather_service_from_config(&config)?,
    };
    let geocoder = geocoder_from_config(&config)?;

    Ok(WeatherLookup::new(geocoder, weather))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_without_city() {
        let cli = Cli::try_parse_from(["weatherwise", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show { city: None, provider: None, json: false }));
    }

    #[test]
    fn show_with_city_and_flags() {
        let cli = Cli::try_parse_from([
            "weatherwise", "-vv", "show", "New York", "--provider", "weatherapi", "--json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Show { city, provider, json } => {
                assert_eq!(city.as_deref(), Some("New York"));
                assert_eq!(provider.as_deref(), Some("weatherapi"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn configure_requires_provider() {
        assert!(Cli::try_parse_from(["weatherwise", "configure"]).is_err());
    }
}
