use anyhow::Context;
use clap::{Parser, Subcommand};
use skycast_core::{Config, Coordinator};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API credential and default city.
    Configure,

    /// Show the dashboard for a city (or the default city).
    Show {
        /// City name; falls back to the cached or default city if absent.
        city: Option<String>,
    },

    /// Interactive dashboard: search cities, select forecast days.
    Dashboard,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => show(city).await,
            Command::Dashboard => dashboard().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Text::new("API key:")
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let default_city = inquire::Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;
    config.default_city = default_city;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut coord = Coordinator::from_config(&config)?;

    match city {
        Some(city) => {
            coord
                .fetch_data(&city)
                .await
                .with_context(|| format!("Could not fetch weather for '{city}'"))?;
        }
        None => {
            coord.start().await.context("Could not fetch weather")?;
        }
    }

    render::dashboard(&coord);
    Ok(())
}

async fn dashboard() -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut coord = Coordinator::from_config(&config)?;

    if let Err(err) = coord.start().await {
        render::fetch_error(&err);
    }

    loop {
        render::dashboard(&coord);

        let action = inquire::Select::new(
            "What next?",
            vec!["Search city", "Select forecast day", "Toggle recent searches", "Quit"],
        )
        .prompt()
        .context("Failed to read menu choice")?;

        match action {
            "Search city" => {
                let city = inquire::Text::new("City:")
                    .prompt()
                    .context("Failed to read city")?;
                if city.trim().is_empty() {
                    continue;
                }
                // A failed search keeps the previous dashboard on screen.
                if let Err(err) = coord.fetch_data(city.trim()).await {
                    render::fetch_error(&err);
                }
            }
            "Select forecast day" => {
                let Some(bundle) = coord.bundle() else {
                    println!("No forecast loaded yet.");
                    continue;
                };

                let options: Vec<String> = bundle
                    .forecast
                    .iter()
                    .map(|day| render::day_option(day, coord.selected_day()))
                    .collect();
                if options.is_empty() {
                    println!("No forecast days available.");
                    continue;
                }

                let picked = inquire::Select::new("Forecast day:", options)
                    .prompt()
                    .context("Failed to read day choice")?;
                // The date key is the first token of the option label.
                if let Some(datetime) = picked.split_whitespace().next() {
                    let datetime = datetime.to_string();
                    coord.select_day(&datetime);
                }
            }
            "Toggle recent searches" => coord.toggle_show_all_recents(),
            _ => break,
        }
    }

    Ok(())
}
