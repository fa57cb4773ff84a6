//! Catobase command-line interface
//!
//! Tags files with categories from a reference listing and queries the
//! resulting registry by path pattern and category.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

mod cli;

use cli::category::CategoryAction;
use cli::context::CliContext;

#[derive(Parser, Debug)]
#[command(name = "catobase", version, about = "Tag files with categories and query them")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Registry file (overrides catobase.toml)
    #[arg(long = "registry", global = true, env = "CATOBASE_REGISTRY")]
    registry_file: Option<PathBuf>,

    /// Reference category listing (overrides catobase.toml)
    #[arg(long = "categories", global = true, env = "CATOBASE_CATEGORIES")]
    categories_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the registry file (existing registries are left untouched)
    Init {
        /// Also write catobase.toml in the working directory
        #[arg(long)]
        write_config: bool,

        #[arg(long)]
        json: bool,
    },

    /// Manage category listings
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Register one file under the given categories
    Register {
        /// File to register
        path: PathBuf,

        /// Categories to attach (each must be in the reference listing)
        categories: Vec<String>,

        /// Copy the file to <PATH>.copy before recording it
        #[arg(short, long)]
        snapshot: bool,

        #[arg(long)]
        json: bool,
    },

    /// Register every file under DIR whose name matches PATTERN, using the
    /// file's own lines as its categories
    RegisterDir {
        /// Directory to walk
        dir: PathBuf,

        /// Regular expression matched against base file names
        pattern: String,

        /// Record per-file failures and continue instead of stopping
        #[arg(long)]
        keep_going: bool,

        #[arg(long)]
        json: bool,
    },

    /// List registered paths matching PATTERN and carrying every CATEGORY
    Get {
        /// Regular expression matched against the full registered path
        pattern: String,

        /// Categories every result must carry
        categories: Vec<String>,

        /// Show categories and registration time
        #[arg(short, long)]
        long: bool,

        #[arg(long)]
        json: bool,
    },
}

fn command_wants_json(command: &Commands) -> bool {
    match command {
        Commands::Init { json, .. } => *json,
        Commands::Category { action } => action.wants_json(),
        Commands::Register { json, .. } => *json,
        Commands::RegisterDir { json, .. } => *json,
        Commands::Get { json, .. } => *json,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = command_wants_json(&cli.command);

    if let Err(err) = catobase_logging::init_logging(catobase_logging::LogConfig {
        app_name: "catobase",
        verbose: cli.verbose,
    }) {
        eprintln!("Warning: failed to initialize logging: {:#}", err);
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                eprintln!("{:#}", err);
            }
            ExitCode::from(1)
        }
    }
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    let ctx = CliContext::resolve(cli.registry_file, cli.categories_file)?;
    debug!(
        registry = %ctx.config.registry_path.display(),
        categories = %ctx.config.categories_path.display(),
        "Resolved paths"
    );

    match cli.command {
        Commands::Init { write_config, json } => {
            cli::init::run(cli::init::InitArgs { write_config, json }, &ctx)
        }
        Commands::Category { action } => cli::category::run(action, &ctx),
        Commands::Register {
            path,
            categories,
            snapshot,
            json,
        } => cli::register::run(
            cli::register::RegisterArgs {
                path,
                categories,
                snapshot,
                json,
            },
            &ctx,
        ),
        Commands::RegisterDir {
            dir,
            pattern,
            keep_going,
            json,
        } => cli::register::run_dir(
            cli::register::RegisterDirArgs {
                dir,
                pattern,
                keep_going,
                json,
            },
            &ctx,
        ),
        Commands::Get {
            pattern,
            categories,
            long,
            json,
        } => cli::get::run(
            cli::get::GetArgs {
                pattern,
                categories,
                long,
                json,
            },
            &ctx,
        ),
    }
}
