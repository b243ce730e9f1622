//! CLI for managed-volume operations

use clap::{Parser, Subcommand};
use mvctl::common::parse_duration;
use mvctl::ops::{self, ExportOptions, ExportOutcome, ShareType, SlaChoice};
use mvctl::{ClientConfig, Outcome, Resolution, Session, TimeQuery};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mvctl")]
#[command(about = "Managed volume operations against a storage appliance")]
#[command(version)]
struct Cli {
    /// Config file (TOML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Appliance address
    #[arg(long)]
    node: Option<String>,

    /// Basic auth user
    #[arg(long)]
    username: Option<String>,

    /// Per-call timeout (e.g. "15s"); defaults depend on the command
    #[arg(long, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the writable state and SLA of a managed volume
    State {
        /// Managed volume name
        name: String,
    },

    /// Open a managed volume for writes
    Begin {
        /// Managed volume name
        name: String,
    },

    /// Close a managed volume for writes and take a snapshot
    End {
        /// Managed volume name
        name: String,

        /// SLA Domain for the snapshot ("current" keeps the assigned one)
        #[arg(long, default_value = "current")]
        sla: String,
    },

    /// List the channels of a managed volume's main export
    Channels {
        /// Managed volume name
        name: String,
    },

    /// Find the snapshot covering a point in time
    Snapshot {
        /// Managed volume name
        name: String,

        /// MM-DD-YYYY, or "latest"
        #[arg(long, default_value = "latest")]
        date: String,

        /// HH:MM, or "latest"
        #[arg(long, default_value = "latest")]
        time: String,
    },

    /// Export a snapshot as a network share
    Export {
        /// Snapshot id
        snapshot_id: String,

        /// Hosts allowed to mount the share (repeatable)
        #[arg(long = "host-pattern", default_value = "*")]
        host_patterns: Vec<String>,

        /// NFS or SMB
        #[arg(long, default_value = "NFS")]
        share_type: ShareType,

        /// Refuse to export snapshots that live only in the cloud
        #[arg(long)]
        no_cloud: bool,
    },

    /// List live exports of a snapshot
    Exports {
        /// Snapshot id
        snapshot_id: String,
    },
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(node) = &cli.node {
        config.node = node.clone();
    }
    if let Some(username) = &cli.username {
        config.username = Some(username.clone());
    }
    Ok(config)
}

fn print_outcome(name: &str, outcome: &Outcome<serde_json::Value>) -> anyhow::Result<()> {
    match outcome {
        Outcome::Applied(response) => println!("{}", serde_json::to_string_pretty(response)?),
        Outcome::NoopAlready(reason) => {
            println!("No change required. The managed volume '{}' is {}.", name, reason)
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let session = Session::connect(&config)?;
    // --timeout, then timeout_secs, then 30s for begin/end and 15s for lookups
    let long = Some(config.timeout_or(cli.timeout, Duration::from_secs(30)));
    let short = Some(config.timeout_or(cli.timeout, Duration::from_secs(15)));

    match cli.command {
        Commands::State { name } => {
            let state = ops::volume_state(&session, &name, short).await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }

        Commands::Begin { name } => {
            let outcome = ops::begin_snapshot(&session, &name, long).await?;
            print_outcome(&name, &outcome)?;
        }

        Commands::End { name, sla } => {
            let sla = SlaChoice::from_name(&sla);
            let outcome = ops::end_snapshot(&session, &name, &sla, long).await?;
            print_outcome(&name, &outcome)?;
        }

        Commands::Channels { name } => {
            for channel in ops::channels(&session, &name, short).await? {
                println!("{}\t{}", channel.ip_address, channel.mount_point);
            }
        }

        Commands::Snapshot { name, date, time } => {
            let query = TimeQuery::parse(&date, &time)?;
            match ops::get_snapshot(&session, &name, &query, short).await? {
                Resolution::Found(id) => println!("{}", id),
                Resolution::NotFound => {
                    eprintln!("No snapshot found");
                    std::process::exit(1);
                }
            }
        }

        Commands::Export {
            snapshot_id,
            host_patterns,
            share_type,
            no_cloud,
        } => {
            let options = ExportOptions {
                host_patterns,
                share_type,
                allow_cloud: !no_cloud,
            };
            match ops::export_snapshot(&session, &snapshot_id, &options, short).await? {
                ExportOutcome::Exported(response) => {
                    println!("{}", serde_json::to_string_pretty(&response)?)
                }
                ExportOutcome::SnapshotNotFound(message) => {
                    eprintln!("Could not find snapshot '{}': {}", snapshot_id, message);
                    std::process::exit(1);
                }
                ExportOutcome::CloudExportDisallowed => {
                    eprintln!(
                        "Snapshot '{}' is in the cloud and cloud exports were disallowed.",
                        snapshot_id
                    );
                    std::process::exit(1);
                }
            }
        }

        Commands::Exports { snapshot_id } => {
            let exports = ops::snapshot_exports(&session, &snapshot_id, short).await?;
            println!("{}", serde_json::to_string_pretty(&exports)?);
        }
    }

    Ok(())
}
