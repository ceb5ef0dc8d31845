mod commands;
mod mirror;
mod serve;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use migsafe_storage::JsonStorage;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Which collection a `list` invocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Collection {
    Workers,
    Complaints,
    Renewals,
}

/// MigSafe migrant worker registration portal.
#[derive(Parser)]
#[command(name = "migsafe", version, about = "MigSafe worker registration portal")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Data directory holding the JSON collections
    #[arg(long, global = true, default_value = "migsafe-data")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new worker (enters the pending approval queue)
    Register(commands::register::RegisterArgs),

    /// Approve a pending registration and assign its registration number
    Approve {
        /// Worker record id
        id: String,
    },

    /// Reject a pending registration
    Reject {
        /// Worker record id
        id: String,
        /// Reason shown to the applicant (required, non-empty)
        #[arg(long)]
        reason: String,
    },

    /// Set a risk flag on a worker of any status
    Flag {
        /// Worker record id
        id: String,
        /// Reason for the flag (required, non-empty)
        #[arg(long)]
        reason: String,
    },

    /// Clear a worker's risk flag
    Unflag {
        /// Worker record id
        id: String,
    },

    /// List a collection, optionally filtered by status
    List {
        #[arg(value_enum)]
        collection: Collection,
        /// Status filter; omit or pass `all` for no filtering
        #[arg(long)]
        status: Option<String>,
    },

    /// List approved workers whose stay validity expires soon
    Expiring {
        /// Horizon in days
        #[arg(long, default_value_t = 30)]
        days: i64,
    },

    /// Show dashboard statistics
    Stats,

    /// Start the HTTP JSON API server (admin + e-sevai kiosk surfaces)
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 8090)]
        port: u16,
    },
}

/// Print an error in the requested output format.
pub(crate) fn report_error(message: &str, output: OutputFormat) {
    match output {
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": message })),
        OutputFormat::Text => eprintln!("error: {}", message),
    }
}

fn main() {
    let cli = Cli::parse();

    let storage = match JsonStorage::open(&cli.store) {
        Ok(s) => s,
        Err(e) => {
            report_error(
                &format!("could not open store '{}': {}", cli.store.display(), e),
                cli.output,
            );
            process::exit(1);
        }
    };

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");

    match cli.command {
        Commands::Register(args) => {
            commands::register::cmd_register(&rt, &storage, args, cli.output);
        }
        Commands::Approve { id } => {
            commands::review::cmd_approve(&rt, &storage, &id, cli.output);
        }
        Commands::Reject { id, reason } => {
            commands::review::cmd_reject(&rt, &storage, &id, &reason, cli.output);
        }
        Commands::Flag { id, reason } => {
            commands::review::cmd_flag(&rt, &storage, &id, &reason, cli.output);
        }
        Commands::Unflag { id } => {
            commands::review::cmd_unflag(&rt, &storage, &id, cli.output);
        }
        Commands::List { collection, status } => {
            commands::list::cmd_list(&rt, &storage, collection, status.as_deref(), cli.output);
        }
        Commands::Expiring { days } => {
            commands::list::cmd_expiring(&rt, &storage, days, cli.output);
        }
        Commands::Stats => {
            commands::stats::cmd_stats(&rt, &storage, cli.output);
        }
        Commands::Serve { port } => {
            if let Err(e) = rt.block_on(serve::start_server(storage, port)) {
                eprintln!("server error: {}", e);
                process::exit(1);
            }
        }
    }
}
