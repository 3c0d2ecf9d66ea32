use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use popforge::config::Config;
use popforge::loader::{load_sample_pool, load_target_table};
use popforge::PopForgeError;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Target table: AreaID,Value0Count,Value1Count
    #[arg(global = true, short, long, default_value = "data/targets.csv")]
    targets: String,

    /// Sample of individuals: PersonID,Value
    #[arg(global = true, short, long, default_value = "data/sample.csv")]
    sample: String,

    /// JSON file with optimizer settings; command-line flags take precedence.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synthesize a population for every area and write it out.
    Run(cmd::run::RunArgs),
    /// Show the inputs and flag areas the sample cannot satisfy.
    Inspect(cmd::inspect::InspectArgs),
}

fn fail(e: PopForgeError) -> ! {
    error!("❌ {}", e);
    process::exit(1);
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚀 Initializing PopForge...");

    let target = load_target_table(&cli.targets).unwrap_or_else(|e| fail(e));
    let pool = load_sample_pool(&cli.sample).unwrap_or_else(|e| fail(e));

    let result = match cli.command {
        Commands::Run(args) => {
            let config = match (&cli.config, matches.subcommand_matches("run")) {
                (Some(path), Some(sub)) => {
                    info!("⚙️  Loading config from: {}", path);
                    let mut file_config = Config::load_from_file(path).unwrap_or_else(|e| fail(e));
                    file_config.merge_from_cli(&args.config, sub);
                    file_config
                }
                _ => args.config.clone(),
            };
            config.validate().and_then(|_| cmd::run::run(args, config, target, pool))
        }
        Commands::Inspect(args) => {
            cmd::inspect::run(&args, &target, &pool);
            Ok(())
        }
    };

    if let Err(e) = result {
        fail(e);
    }
}
