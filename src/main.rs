use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use itinerary_planner::api::AppState;
use itinerary_planner::config::PlannerConfig;
use itinerary_planner::planner::Planner;
use itinerary_planner::{http, telemetry, web};

#[derive(Parser, Debug)]
#[command(name = "itinerary-planner", version, about = "Trip itinerary planner web service")]
struct Args {
    /// Config file, defaults to the per-user config directory
    #[arg(long, env = "PLANNER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = PlannerConfig::load_from_path(args.config)?;
    let _telemetry = telemetry::init(&config.logging)?;

    tracing::info!(
        version = itinerary_planner::VERSION,
        "Starting itinerary planner"
    );
    let status = itinerary_planner::api::ProviderStatus::from(&config);
    tracing::info!(?status, "Provider keys");

    let client = http::build_client(&config.http)?;
    let planner = Planner::new(client, &config);
    let state = AppState::new(planner, &config);

    web::run(state, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_config_flag_forms() {
        let args = Args::try_parse_from(["itinerary-planner", "--config", "/etc/planner.toml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/etc/planner.toml")));

        let args = Args::try_parse_from(["itinerary-planner", "--config=trip.toml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("trip.toml")));

        assert!(Args::try_parse_from(["itinerary-planner", "--port", "80"]).is_err());
    }
}
