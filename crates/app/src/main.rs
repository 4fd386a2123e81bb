//! Timeart Application CLI

use std::{process, sync::Arc};

use clap::{Args, Parser, Subcommand};
use timeart_app::{
    calendar::RotationCalendar,
    database,
    domain::{
        photos::PgPhotosRepository,
        rotation::{DailyRotationService, RotationOutcome, RotationService},
        settings::PgSettingsRepository,
    },
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "timeart-app", about = "Timeart CLI", long_about = None)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    /// IANA time zone the featured photo changes in
    #[arg(long, env = "ROTATION_TIME_ZONE", default_value = "UTC", global = true)]
    rotation_time_zone: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Bring the featured photo in line with today's selection
    Rotate,

    /// Report whether the featured photo is stale, without changing it
    Status,

    /// List the photos scheduled for the coming days
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
struct PreviewArgs {
    /// Number of days to show
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=366))]
    days: u32,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let database_url = cli
        .database_url
        .ok_or_else(|| "DATABASE_URL must be set".to_string())?;

    let pool = database::connect(&database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    if matches!(cli.command, Commands::Migrate) {
        database::migrate(&pool)
            .await
            .map_err(|error| format!("failed to apply migrations: {error}"))?;

        println!("migrations applied");

        return Ok(());
    }

    let calendar = RotationCalendar::from_zone_name(&cli.rotation_time_zone)
        .map_err(|error| format!("invalid rotation time zone: {error}"))?;

    let today = calendar.today();

    let service = DailyRotationService::new(
        Arc::new(PgPhotosRepository::new(pool.clone())),
        Arc::new(PgSettingsRepository::new(pool)),
    );

    match cli.command {
        Commands::Migrate => Ok(()),
        Commands::Rotate => rotate(&service, today).await,
        Commands::Status => status(&service, today).await,
        Commands::Preview(args) => preview(&service, today, args.days).await,
    }
}

async fn rotate(service: &DailyRotationService, today: jiff::civil::Date) -> Result<(), String> {
    let outcome = service.reconcile(today).await;

    match &outcome {
        RotationOutcome::Rotated { photo, slug } => println!("rotated to {slug} ({photo})"),
        RotationOutcome::AlreadyCurrent { photo } => println!("already current ({photo})"),
        RotationOutcome::NoPhotoAvailable => println!("no active photos to feature"),
        RotationOutcome::Failed => return Err("rotation failed; see logs".to_string()),
    }

    Ok(())
}

async fn status(service: &DailyRotationService, today: jiff::civil::Date) -> Result<(), String> {
    let needs_rotation = service
        .needs_rotation_today(today)
        .await
        .map_err(|error| format!("failed to check rotation status: {error}"))?;

    println!("date: {today}");
    println!("needs_rotation: {needs_rotation}");

    Ok(())
}

async fn preview(
    service: &DailyRotationService,
    today: jiff::civil::Date,
    days: u32,
) -> Result<(), String> {
    let upcoming = service
        .upcoming_photos(today, days)
        .await
        .map_err(|error| format!("failed to load photos: {error}"))?;

    if upcoming.is_empty() {
        println!("no active photos to feature");
    }

    for scheduled in upcoming {
        println!(
            "{}  {}  {}",
            scheduled.date, scheduled.photo.slug, scheduled.photo.title
        );
    }

    Ok(())
}
