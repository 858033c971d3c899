use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};

use travel_recommender::estimate::TransportMode;
use travel_recommender::models::query::{SIGNIFICANCES, ZONES, parse_airport_flag};
use travel_recommender::trip::{DistanceFlow, FlowState};
use travel_recommender::{Query, RecommenderConfig, RecommenderError, TravelEngine, logging, web};

#[derive(Parser)]
#[command(
    name = "travel-recommender",
    author,
    version,
    about = "Discover top travel destinations in India and estimate trip costs",
    long_about = None
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "TRAVELREC_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend the top destinations for a zone and significance
    Recommend {
        #[arg(long, value_parser = PossibleValuesParser::new(ZONES))]
        zone: String,
        #[arg(long, value_parser = PossibleValuesParser::new(SIGNIFICANCES))]
        significance: String,
        /// Airport within 50 km (yes/no)
        #[arg(long, default_value = "yes")]
        airport: String,
    },
    /// Estimate distance and travel cost between two places
    Estimate {
        #[arg(long = "from")]
        source: String,
        #[arg(long = "to")]
        destination: String,
    },
    /// List the accepted zones and significances
    Options,
    /// Serve the JSON API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<RecommenderError>() {
                Some(err) => eprintln!("❌ {}", err.user_message()),
                None => eprintln!("❌ {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = RecommenderConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging, cli.verbose)?;

    if let Some(path) = &cli.config {
        tracing::debug!("Using config from: {}", path.display());
    }

    let engine = TravelEngine::from_config(&config)?;

    match cli.command {
        Commands::Recommend {
            zone,
            significance,
            airport,
        } => {
            let query = Query::new(zone, significance, parse_airport_flag(&airport)?);
            let recommendations = engine.recommend(&query)?;

            println!("🎉 Top {} Recommended Destinations", recommendations.len());
            for recommendation in recommendations {
                let destination = &recommendation.destination;
                println!();
                println!(
                    "{}. {} ({})",
                    recommendation.rank, destination.name, destination.place_type
                );
                println!("   📍 Location: {}", destination.location_label());
                println!("   🏛️ Significance: {}", destination.significance);
                println!("   💰 Entrance Fee: ₹{}", destination.entrance_fee);
                println!("   ⭐ Rating: {}/5.0", destination.rating);
                println!("   📌 {}", destination.map_url());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Estimate {
            source,
            destination,
        } => {
            let mut flow = DistanceFlow::new();
            match flow.submit(engine.planner(), &source, &destination).await {
                FlowState::Resolved(trip) => {
                    println!("📏 Distance: {} km", trip.cost.distance_km);
                    println!("💸 Estimated Travel Cost:");
                    for (mode, cost) in trip.cost.breakdown() {
                        println!("   {} {}: ₹{}", mode_icon(mode), mode.label(), cost);
                    }
                    Ok(ExitCode::SUCCESS)
                }
                FlowState::NotFound(query) => {
                    eprintln!("❌ {}", RecommenderError::not_found(query.as_str()).user_message());
                    Ok(ExitCode::FAILURE)
                }
                FlowState::Failed(err) => {
                    eprintln!("⚠️ {}", err.user_message());
                    Ok(ExitCode::FAILURE)
                }
                FlowState::AwaitingInput | FlowState::Resolving => {
                    eprintln!("⚠️ Please fill in both Start Location and Destination.");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Options => {
            let options = engine.options();
            println!("🌍 Zones: {}", options.zones.join(", "));
            println!("🏛️ Significances: {}", options.significances.join(", "));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            web::run(engine, &config.server).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn mode_icon(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Car => "🚗",
        TransportMode::Bus => "🚌",
        TransportMode::Train => "🚆",
    }
}
