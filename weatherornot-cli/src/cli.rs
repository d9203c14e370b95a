use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode, Text};
use weatherornot_core::{
    Config, NewPlace, PlaceId, ProviderId, SavedPlaces, Session, WeatherFacade,
    provider::default_provider_from_config,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherornot", version, about = "Weather, forecasts and what to do about it")]
pub struct Cli {
    /// Skip the provider and use synthetic weather.
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "weatherstack" or "openweather".
        provider: String,
    },

    /// Show current conditions and the 5-day outlook.
    Show {
        /// City or place name.
        #[arg(required_unless_present = "lat", conflicts_with = "lat")]
        city: Option<String>,

        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Also print activity, kids, outfit and gardening suggestions.
        #[arg(long, short)]
        recommendations: bool,
    },

    /// Show the 3-hourly forecast for the next five days.
    Forecast {
        city: String,

        /// One line per day instead of every sample.
        #[arg(long)]
        daily: bool,
    },

    /// Manage saved places.
    Places {
        /// User owning the places; defaults to the configured user.
        #[arg(long, global = true)]
        user: Option<String>,

        #[command(subcommand)]
        action: PlacesAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum PlacesAction {
    List,
    /// Save a place together with its current weather.
    Add { name: String },
    Remove { id: u64 },
    /// New order, as every saved place id.
    Reorder {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<u64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { city, lat, lon, recommendations } => {
                let facade = build_facade(self.offline)?;
                let report = match (city, lat, lon) {
                    (Some(city), _, _) => facade.report_for_city(&city).await?,
                    (None, Some(lat), Some(lon)) => facade.report_for_coordinates(lat, lon).await?,
                    _ => anyhow::bail!("Give a city, or both --lat and --lon"),
                };

                output::print_report(&report);
                if recommendations {
                    output::print_recommendations(&weatherornot_core::recommend(&report.current));
                }
                Ok(())
            }
            Command::Forecast { city, daily } => {
                let facade = build_facade(self.offline)?;
                let series = facade.forecast(&city).await?;

                if daily {
                    output::print_daily(&series);
                } else {
                    output::print_series(&series);
                }
                Ok(())
            }
            Command::Places { user, action } => places(user, action, self.offline).await,
        }
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

    config.upsert_provider_api_key(id, api_key.trim().to_string());

    if config.default_provider_id().ok() != Some(id) {
        let make_default = Confirm::new(&format!("Use {id} as the default provider?"))
            .with_default(true)
            .prompt()
            .context("Failed to read answer")?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    if config.user.is_none() {
        let user = Text::new("User name for saved places (optional):")
            .prompt_skippable()
            .context("Failed to read user name")?;
        config.user = user.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Without a usable provider every report is synthetic.
fn build_facade(offline: bool) -> anyhow::Result<WeatherFacade> {
    if offline {
        return Ok(WeatherFacade::offline());
    }

    let config = Config::load()?;
    match default_provider_from_config(&config) {
        Ok(provider) => Ok(WeatherFacade::new(provider)),
        Err(err) => {
            tracing::warn!("{err:#}");
            Ok(WeatherFacade::offline())
        }
    }
}

async fn places(user: Option<String>, action: PlacesAction, offline: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let session = match user.or(config.user) {
        Some(user) => Session::for_user(user),
        None => Session::anonymous(),
    };
    let mut store = SavedPlaces::load(Config::places_file_path()?)?;

    match action {
        PlacesAction::List => {
            output::print_places(&store.list(&session)?);
        }
        PlacesAction::Add { name } => {
            // auth before any provider call
            session.user()?;
            let report = build_facade(offline)?.report_for_city(&name).await?;
            let place = NewPlace { name, ..NewPlace::from_report(&report) };
            let saved = store.add(&session, place)?;
            println!("Saved {} as #{} (position {})", saved.name, saved.id, saved.order + 1);
        }
        PlacesAction::Remove { id } => {
            let removed = store.remove(&session, PlaceId(id))?;
            println!("Removed {}", removed.name);
        }
        PlacesAction::Reorder { ids } => {
            let ids: Vec<PlaceId> = ids.into_iter().map(PlaceId).collect();
            store.reorder(&session, &ids)?;
            output::print_places(&store.list(&session)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["weatherornot", "show", "--lat", "-33.87", "--lon", "151.2"])
            .expect("parse");
        match cli.command {
            Command::Show { city, lat, lon, .. } => {
                assert_eq!(city, None);
                assert_eq!(lat, Some(-33.87));
                assert_eq!(lon, Some(151.2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_needs_a_city_or_coordinates() {
        assert!(Cli::try_parse_from(["weatherornot", "show"]).is_err());
        assert!(Cli::try_parse_from(["weatherornot", "show", "--lat", "10"]).is_err());
    }

    #[test]
    fn offline_flag_is_global() {
        let cli = Cli::try_parse_from(["weatherornot", "forecast", "Paris", "--daily", "--offline"])
            .expect("parse");
        assert!(cli.offline);
        assert!(matches!(cli.command, Command::Forecast { daily: true, .. }));
    }

    #[test]
    fn places_reorder_takes_ids() {
        let cli = Cli::try_parse_from(["weatherornot", "places", "--user", "alice", "reorder", "3", "1", "2"])
            .expect("parse");
        match cli.command {
            Command::Places { user, action: PlacesAction::Reorder { ids } } => {
                assert_eq!(user.as_deref(), Some("alice"));
                assert_eq!(ids, vec![3, 1, 2]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
