//! taskdeck - terminal dashboard for job queues
//!
//! Composition root: loads configuration, wires the data source into the
//! dashboard store and renders its snapshots.

mod listing;
mod render;
mod settings;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskdeck_core::application::{CreateJobRequest, DashboardStore};
use taskdeck_core::config::DashboardConfig;
use taskdeck_core::port::id_provider::UuidProvider;
use taskdeck_core::port::time_provider::SystemTimeProvider;
use taskdeck_core::port::{DataSource, TimeProvider};
use taskdeck_core::VERSION;
use taskdeck_infra_system::{HostStatsSampler, MockSampler};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Job queue dashboard", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (toml, yaml or json)
    #[arg(long, global = true, env = "TASKDECK_CONFIG")]
    config: Option<PathBuf>,

    /// Seed for reproducible mock data
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Report real CPU and memory of this host
    #[arg(long, global = true)]
    host_stats: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Keep refreshing and redraw on every new snapshot
    Watch {
        /// Stop after this many snapshots
        #[arg(long)]
        ticks: Option<usize>,

        #[command(flatten)]
        listing: listing::ListingArgs,
    },

    /// Sample once and print the snapshot as JSON
    Snapshot {
        #[arg(long)]
        pretty: bool,
    },

    /// Create a job in one of the sampled queues
    CreateJob {
        #[arg(short, long)]
        queue: String,

        #[arg(short, long)]
        name: String,

        /// Payload as JSON text
        #[arg(long, default_value = "")]
        data: String,

        /// Priority (higher = more urgent)
        #[arg(short, long, default_value = "0")]
        priority: i32,

        /// Delay in ms
        #[arg(long, default_value = "0")]
        delay: u64,
    },
}

fn init_logging() -> Result<()> {
    let log_format = std::env::var("TASKDECK_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("taskdeck=info"))
        .context("Failed to create env filter")?;

    // stdout carries the dashboard itself
    match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

fn data_source(cli: &Cli, time_provider: Arc<dyn TimeProvider>) -> Arc<dyn DataSource> {
    let mock = match cli.seed {
        Some(seed) => MockSampler::with_seed(time_provider, seed),
        None => MockSampler::new(time_provider),
    };

    if cli.host_stats {
        Arc::new(HostStatsSampler::new(mock))
    } else {
        Arc::new(mock)
    }
}

fn build_store(cli: &Cli, config: &DashboardConfig) -> Result<Arc<DashboardStore>> {
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let store = DashboardStore::new(
        config.store.clone(),
        data_source(cli, time_provider.clone()),
        Arc::new(UuidProvider),
        time_provider,
    )?;
    Ok(Arc::new(store))
}

async fn watch(
    store: Arc<DashboardStore>,
    ticks: Option<usize>,
    listing: render::Listing,
) -> Result<()> {
    // subscribe first so the initial refresh is not missed
    let mut snapshots = store.subscribe();
    let handle = store.start()?;
    let mut drawn = 0;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                changed.context("Store closed")?;
                let data = snapshots.borrow_and_update().clone();
                println!(
                    "{}\n",
                    render::dashboard(
                        store.is_connected(),
                        &data,
                        &store.notifications(),
                        &listing
                    )
                );

                drawn += 1;
                if ticks.is_some_and(|n| drawn >= n) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    handle.stop().await;
    Ok(())
}

async fn snapshot(store: Arc<DashboardStore>, pretty: bool) -> Result<()> {
    store.refresh().await;
    if !store.is_connected() {
        bail!("Data source unavailable");
    }

    let data = store.snapshot();
    let json = if pretty {
        serde_json::to_string_pretty(&*data)?
    } else {
        serde_json::to_string(&*data)?
    };
    println!("{}", json);
    Ok(())
}

async fn create_job(store: Arc<DashboardStore>, req: CreateJobRequest) -> Result<()> {
    store.refresh().await;

    match store.create_job(req).await {
        Ok(job) => {
            for notification in store.notifications() {
                println!("{}", render::notification_line(&notification));
            }
            println!();
            println!("{}", render::job_table(std::slice::from_ref(&job)));
            Ok(())
        }
        Err(e) => {
            match e.field() {
                Some(field) => {
                    eprintln!("{} {}: {}", "✗".red(), field.to_string().as_str().bold(), e)
                }
                None => eprintln!("{} {}", "✗".red(), e),
            }
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;
    info!("taskdeck v{} starting...", VERSION);

    let config = settings::load(cli.config.as_deref())?;
    info!(
        redis_url = %config.endpoints.redis_url,
        api_base_url = %config.endpoints.api_base_url,
        websocket_url = %config.endpoints.websocket_url,
        "Configuration loaded"
    );

    let store = build_store(&cli, &config)?;

    match cli.command {
        Commands::Watch { ticks, listing } => {
            let listing = render::Listing {
                jobs: listing.job_query(),
                queues: listing.queue_query(),
            };
            watch(store, ticks, listing).await
        }
        Commands::Snapshot { pretty } => snapshot(store, pretty).await,
        Commands::CreateJob {
            queue,
            name,
            data,
            priority,
            delay,
        } => {
            let req = CreateJobRequest {
                queue_name: queue,
                job_name: name,
                data,
                priority,
                delay,
            };
            create_job(store, req).await
        }
    }
}
