//! skycast command-line client
//!
//! Each subcommand drives one dashboard workflow against the weather
//! service and prints how it ended.
//!
//! ```sh
//! skycast weather Warsaw
//! skycast subscribe --email me@example.com --city Warsaw --frequency hourly
//! skycast confirm <TOKEN>
//! SKYCAST_API_BASE_URL=https://weather.example.com skycast unsubscribe <TOKEN>
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use skycast::config::{BASE_URL_ENV, DEFAULT_BASE_URL};
use skycast::{ClientConfig, Dashboard, HttpWeatherApi, Status, TokenAction};

#[derive(Parser, Debug)]
#[command(name = "skycast")]
#[command(about = "Look up current weather and manage weather notification subscriptions")]
struct Args {
    /// Base address of the weather service
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current weather for a city
    Weather { city: String },

    /// Subscribe an email address to weather notifications
    Subscribe {
        #[arg(long)]
        email: String,

        #[arg(long)]
        city: String,

        /// hourly or daily
        #[arg(long, default_value = "daily")]
        frequency: String,
    },

    /// Confirm a subscription with the token from the confirmation email
    Confirm { token: String },

    /// Cancel a subscription with the token from a notification email
    Unsubscribe { token: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid --log-level filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::new(&args.base_url)?;
    let api = HttpWeatherApi::new(&config).context("failed to set up the API client")?;
    tracing::debug!(base_url = api.base_url(), "using weather service");

    let mut dashboard = Dashboard::new(Arc::new(api));

    let teardown = dashboard.teardown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            teardown.cancel();
        }
    });

    let ok = match args.command {
        Command::Weather { city } => {
            dashboard.run_search(city);
            dashboard.settle().await;
            report_search(&dashboard)
        }
        Command::Subscribe {
            email,
            city,
            frequency,
        } => {
            dashboard.set_email(email);
            dashboard.set_subscription_city(city);
            dashboard.set_frequency(frequency);
            dashboard.submit_subscription();
            dashboard.settle().await;
            report_subscription(&dashboard)
        }
        Command::Confirm { token } => {
            dashboard.run_token_action(TokenAction::Confirm, token);
            dashboard.settle().await;
            report_token(&dashboard)
        }
        Command::Unsubscribe { token } => {
            dashboard.run_token_action(TokenAction::Unsubscribe, token);
            dashboard.settle().await;
            report_token(&dashboard)
        }
    };

    if dashboard.is_torn_down() {
        eprintln!("Interrupted.");
        return Ok(ExitCode::from(130));
    }
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn report_search(dashboard: &Dashboard) -> bool {
    let search = &dashboard.state().search;
    let city = search.result_city.as_deref().unwrap_or_default();
    match (&search.status, &search.reading, &search.error) {
        (Status::Success, Some(reading), _) => {
            println!("Weather in {city}");
            println!("  Temperature: {:.1}°C", reading.temperature);
            println!("  Humidity:    {:.0}%", reading.humidity);
            println!("  Conditions:  {}", reading.description);
            true
        }
        (_, _, Some(error)) => {
            eprintln!("No data for {city}: {}", error.message);
            false
        }
        _ => {
            eprintln!("Nothing to search for.");
            false
        }
    }
}

fn report_subscription(dashboard: &Dashboard) -> bool {
    let sub = &dashboard.state().subscription;
    match (&sub.success_message, &sub.error) {
        (Some(message), _) => {
            println!("{message}");
            true
        }
        (_, Some(error)) => {
            eprintln!("Error: {}", error.message);
            false
        }
        _ => false,
    }
}

fn report_token(dashboard: &Dashboard) -> bool {
    let link = &dashboard.state().token;
    match (&link.success_message, &link.error) {
        (Some(message), _) => {
            println!("{message}");
            true
        }
        (_, Some(error)) => {
            eprintln!("Error: {}", error.message);
            false
        }
        _ => false,
    }
}
