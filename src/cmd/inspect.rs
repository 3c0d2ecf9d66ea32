use crate::reports;
use clap::Args;
use popforge::sample::SamplePool;
use popforge::table::AttributeTable;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Rows shown in the target table.
    #[arg(long, default_value_t = 25)]
    pub rows: usize,
}

pub fn run(args: &InspectArgs, target: &AttributeTable, pool: &SamplePool) {
    println!("\n🔎 === INPUT AUDIT === 🔎");
    reports::print_target_table(target, args.rows);
    reports::print_sample_summary(pool);

    let infeasible: Vec<usize> = (0..target.num_areas())
        .filter(|&area| !pool.can_match_exactly(target.counts(area)))
        .collect();
    if infeasible.is_empty() {
        info!("✅ Every area can be matched exactly from this sample.");
    } else {
        for &area in &infeasible {
            warn!(
                "⚠️  {} cannot be matched exactly: the sample lacks a required value",
                target.area(area)
            );
        }
        warn!(
            "{} of {} areas will keep a residual error",
            infeasible.len(),
            target.num_areas()
        );
    }
}
