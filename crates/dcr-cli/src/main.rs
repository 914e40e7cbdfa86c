use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::OrderFormat;

#[derive(Parser)]
#[command(name = "dcr")]
#[command(about = "Diagnostic center revenue CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split one amount between hospital, doctor and broker
    Split {
        /// Order amount in Taka (e.g. 1000 or 1250.50)
        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        /// A referring/consulting doctor is attached
        #[arg(long, default_value_t = false)]
        doctor: bool,

        /// A referring broker/agent is attached
        #[arg(long, visible_alias = "agent", default_value_t = false)]
        broker: bool,

        /// Layered config paths in merge order (falls back to DCR_CONFIG)
        #[arg(long = "config")]
        config_paths: Vec<String>,
    },

    /// Aggregate an order file into a revenue report
    Report {
        /// Path to a JSON array of orders or a CSV file
        #[arg(long)]
        orders: String,

        /// Input format; inferred from the file extension when omitted
        #[arg(long, value_enum)]
        format: Option<OrderFormat>,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Only orders attributed to this doctor
        #[arg(long = "doctor")]
        doctor_name: Option<String>,

        /// Breakdown order: insertion | revenue_desc (overrides /report/sort)
        #[arg(long)]
        sort: Option<String>,

        /// Layered config paths in merge order (falls back to DCR_CONFIG)
        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// Fail instead of warning when the config has keys nothing reads
        #[arg(long, default_value_t = false)]
        strict_config: bool,

        /// Write the report here instead of stdout
        #[arg(long)]
        out: Option<String>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> site -> local)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Load .env.local if present (dev convenience).
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Split {
            amount,
            doctor,
            broker,
            config_paths,
        } => commands::split::run(&amount, doctor, broker, &config_paths),

        Commands::Report {
            orders,
            format,
            from,
            to,
            doctor_name,
            sort,
            config_paths,
            strict_config,
            out,
        } => commands::report::run(commands::report::ReportArgs {
            orders_path: orders,
            format,
            from,
            to,
            doctor_name,
            sort,
            config_paths,
            strict_config,
            out,
        }),

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = dcr_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable JSON.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
