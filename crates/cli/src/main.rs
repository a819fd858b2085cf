//! Bloodlink operator entry point.

use std::sync::Arc;

use anyhow::Context;
use bloodlink_common::{Config, IdGenerator, LoggingConfig};
use bloodlink_core::{
    DonationRequestService, SearchService, compatible_donor_types, compatible_recipient_types,
};
use bloodlink_db::{entities::BloodType, repositories::DonorProfileRepository};
use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "bloodlink", version, about = "Blood donor coordination operator tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending database migrations.
    Migrate,
    /// Mark an active donation request as expired.
    ExpireRequest {
        /// Request ID
        #[arg(value_parser = parse_id)]
        id: String,
    },
    /// Print who can give to whom, for one blood type or all of them.
    Compatibility {
        /// Blood type, e.g. `O-` or `A_POSITIVE`
        blood_type: Option<BloodType>,
    },
    /// Print eligible donor counts per blood type as JSON.
    DonorSummary {
        /// City or postal code
        #[arg(long)]
        location: Option<String>,
    },
}

fn parse_id(id: &str) -> Result<String, String> {
    let id = id.trim().to_lowercase();
    if IdGenerator::is_valid_id(&id) {
        Ok(id)
    } else {
        Err(format!("not a valid ID: {id}"))
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect(config: &Config) -> anyhow::Result<Arc<DatabaseConnection>> {
    let db = bloodlink_db::init(config)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");
    Ok(Arc::new(db))
}

fn print_compatibility(blood_type: BloodType) {
    let donors: Vec<_> = compatible_donor_types(blood_type)
        .iter()
        .copied()
        .map(BloodType::display)
        .collect();
    let recipients: Vec<_> = compatible_recipient_types(blood_type)
        .iter()
        .copied()
        .map(BloodType::display)
        .collect();
    println!(
        "{:<4} receives from: {:<28} gives to: {}",
        blood_type.display(),
        donors.join(", "),
        recipients.join(", ")
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    match cli.command {
        Command::Migrate => {
            let db = connect(&config).await?;
            info!("Running database migrations...");
            bloodlink_db::migrate(&db).await?;
            info!("Migrations completed");
        }
        Command::ExpireRequest { id } => {
            let db = connect(&config).await?;
            let service = DonationRequestService::new(db, config.matching.clone());
            let request = service.expire_request(&id).await?;
            println!("{} {}", request.id, request.status.as_str());
        }
        Command::Compatibility { blood_type } => match blood_type {
            Some(blood_type) => print_compatibility(blood_type),
            None => BloodType::ALL.into_iter().for_each(print_compatibility),
        },
        Command::DonorSummary { location } => {
            let db = connect(&config).await?;
            let service = SearchService::new(DonorProfileRepository::new(db));
            let summary = service.donor_summary(location.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_expire_request_accepts_generated_id() {
        let id = IdGenerator::new().generate();
        let cli = Cli::try_parse_from(["bloodlink", "expire-request", &id]).unwrap();

        assert!(matches!(cli.command, Command::ExpireRequest { id: parsed } if parsed == id));
    }

    #[test]
    fn test_expire_request_normalizes_case() {
        let id = IdGenerator::new().generate();
        let cli =
            Cli::try_parse_from(["bloodlink", "expire-request", &id.to_uppercase()]).unwrap();

        assert!(matches!(cli.command, Command::ExpireRequest { id: parsed } if parsed == id));
    }

    #[test]
    fn test_expire_request_rejects_malformed_id() {
        assert!(Cli::try_parse_from(["bloodlink", "expire-request", "req-1"]).is_err());
        assert!(Cli::try_parse_from(["bloodlink", "expire-request", ""]).is_err());
    }

    #[test]
    fn test_compatibility_parses_blood_type() {
        let cli = Cli::try_parse_from(["bloodlink", "compatibility", "O-"]).unwrap();

        assert!(matches!(
            cli.command,
            Command::Compatibility {
                blood_type: Some(BloodType::ONegative)
            }
        ));
    }
}
