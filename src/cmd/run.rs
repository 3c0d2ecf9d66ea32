use crate::reports;
use clap::Args;
use popforge::config::Config;
use popforge::optimizer::{
    AreaOutcome, OptimizationOptions, Optimizer, ProgressCallback, Termination,
};
use popforge::output::{build_records, save_records};
use popforge::sample::SamplePool;
use popforge::table::AttributeTable;
use popforge::{PfResult, SynthesisContext};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long, default_value = "synthetic_population.csv")]
    pub output: String,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Also write the per-area outcomes as JSON.
    #[arg(long)]
    pub summary: Option<String>,

    /// Rows shown in the outcome table.
    #[arg(long, default_value_t = 25)]
    pub rows: usize,
}

#[derive(Default)]
struct CliLogger {
    done: AtomicUsize,
}

impl ProgressCallback for CliLogger {
    fn on_area_complete(&self, outcome: &AreaOutcome) -> bool {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if outcome.termination != Termination::Converged {
            warn!(
                "Area #{} stopped at error {} (best {}) [{}]",
                outcome.area, outcome.final_error, outcome.min_error, outcome.termination
            );
        }
        if done % 100 == 0 {
            info!("... {} areas done", done);
        }
        true
    }
}

pub fn run(
    args: RunArgs,
    config: Config,
    target: AttributeTable,
    pool: SamplePool,
) -> PfResult<()> {
    let mut ctx = SynthesisContext::new(pool, target, args.seed);
    let optimizer = Optimizer::new(OptimizationOptions::from(&config));

    let report = optimizer.run(&mut ctx, args.seed, CliLogger::default())?;

    reports::print_outcome_table(&ctx, &report, args.rows);

    let records = build_records(&ctx);
    save_records(&records, &args.output)?;

    if let Some(path) = &args.summary {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!("📝 Summary written to {}", path);
    }

    info!("=== 🏆 FINAL RESULT ===");
    info!(
        "Total error: {} -> {}",
        report.total_initial_error(),
        report.total_final_error()
    );
    for termination in Termination::iter() {
        let n = report.count(termination);
        if n > 0 {
            info!("  {:<18} {} / {} areas", termination, n, report.outcomes.len());
        }
    }
    Ok(())
}
