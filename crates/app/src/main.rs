use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod dry_run;

#[derive(Parser)]
#[command(name = "almoner")]
#[command(about = "Match contribution uploads to directory people and funds")]
#[command(version)]
struct Cli {
    /// Log matching decisions at debug level
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Path to almoner.toml (default: ./almoner.toml if present)
    #[arg(long, global = true, env = "ALMONER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the contribution upload template
    #[command(after_help = "\
Examples:
  almoner template
  almoner template --out contributions.csv")]
    Template {
        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Reconcile an upload and report the three partitions
    #[command(after_help = "\
Examples:
  almoner reconcile --records upload.csv --people people.csv --funds funds.csv
  almoner reconcile --records upload.csv --people people.json --funds funds.json --out-dir results --json")]
    Reconcile {
        #[command(flatten)]
        inputs: RunInputs,

        /// Write matched / manual_review / excluded / all_contributions CSVs here
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Print the full result as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Reconcile, then send every auto-loadable record to the loader
    #[command(after_help = "\
Examples:
  almoner load --records upload.csv --people people.csv --funds funds.csv --payments payments.jsonl")]
    Load {
        #[command(flatten)]
        inputs: RunInputs,

        /// Dry-run loader output, one JSON payload per line
        #[arg(long)]
        payments: PathBuf,

        /// Batch name (overrides [loader] batch_name)
        #[arg(long)]
        batch_name: Option<String>,
    },
}

#[derive(Args)]
struct RunInputs {
    /// Contribution upload (CSV)
    #[arg(long)]
    records: PathBuf,

    /// Directory people (CSV or .json)
    #[arg(long)]
    people: PathBuf,

    /// Directory funds (CSV or .json)
    #[arg(long)]
    funds: PathBuf,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = config::AppConfig::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Template { out } => commands::cmd_template(out.as_deref()),
        Commands::Reconcile { inputs, out_dir, json } => {
            commands::cmd_reconcile(&config, &inputs.into(), out_dir.as_deref(), json)
        }
        Commands::Load { inputs, payments, batch_name } => {
            commands::cmd_load(&config, &inputs.into(), &payments, batch_name.as_deref())
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

impl From<RunInputs> for commands::Inputs {
    fn from(args: RunInputs) -> Self {
        commands::Inputs {
            records: args.records,
            people: args.people,
            funds: args.funds,
        }
    }
}
