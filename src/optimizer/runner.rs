use crate::config::{AnnealParams, Config};
use crate::context::SynthesisContext;
use crate::error::PfResult;
use crate::optimizer::{AreaAnnealer, AreaOutcome, SwapBudget, Termination};
use crate::world::{tally, Population};
use fastrand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct OptimizationOptions {
    pub anneal: AnnealParams,
    pub num_threads: usize,
    pub max_swaps_per_area: Option<u64>,
    pub max_time: Option<Duration>,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for OptimizationOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            anneal: cfg.anneal.clone(),
            num_threads: cfg.limits.threads.max(1),
            max_swaps_per_area: cfg.limits.max_swaps_per_area,
            max_time: cfg.limits.max_time(),
        }
    }
}

/// A trait for receiving updates as areas finish.
/// Returning false stops the run: areas not yet started are left as filled.
pub trait ProgressCallback: Send + Sync {
    fn on_area_complete(&self, outcome: &AreaOutcome) -> bool;
}

pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_area_complete(&self, _outcome: &AreaOutcome) -> bool {
        true
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisReport {
    pub outcomes: Vec<AreaOutcome>,
    pub elapsed_ms: u128,
}

impl SynthesisReport {
    pub fn total_initial_error(&self) -> u64 {
        self.outcomes.iter().map(|o| o.initial_error as u64).sum()
    }

    pub fn total_final_error(&self) -> u64 {
        self.outcomes.iter().map(|o| o.final_error as u64).sum()
    }

    pub fn count(&self, termination: Termination) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.termination == termination)
            .count()
    }
}

/// Independent stream for `area`. Areas never share random state, which keeps
/// seeded runs identical whatever the thread count.
pub fn area_rng(seed: Option<u64>, area: usize) -> Rng {
    match seed {
        Some(s) => Rng::with_seed(s.wrapping_add(1).wrapping_add(area as u64)),
        None => Rng::new(),
    }
}

pub struct Optimizer {
    options: OptimizationOptions,
}

impl Optimizer {
    pub fn new(options: OptimizationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    /// Anneals every area of `ctx` in place, then refreshes its current table.
    pub fn run<CB: ProgressCallback>(
        &self,
        ctx: &mut SynthesisContext,
        seed: Option<u64>,
        callback: CB,
    ) -> PfResult<SynthesisReport> {
        let opts = &self.options;
        let start_time = Instant::now();
        let budget = SwapBudget {
            max_swaps: opts.max_swaps_per_area,
            deadline: opts.max_time.map(|limit| start_time + limit),
        };
        let stop = AtomicBool::new(false);

        info!(
            "Annealing {} areas (threads={}, steps={}, runs/step={}, margin={})",
            ctx.num_areas(),
            opts.num_threads,
            opts.anneal.max_temperature,
            opts.anneal.max_runs,
            opts.anneal.error_margin
        );

        let (pool, target, world) = ctx.parts_mut();

        let process = |(area, population): (usize, &mut Population)| -> AreaOutcome {
            let target_counts = target.counts(area);
            if stop.load(Ordering::Relaxed) {
                return AreaOutcome::cancelled(area, target_counts, tally(population, pool));
            }

            let outcome = AreaAnnealer::new(
                area,
                pool,
                target_counts,
                population,
                &opts.anneal,
                budget,
                area_rng(seed, area),
            )
            .run();

            debug!(
                "Area {} ({}): error {} -> {} [{}] after {} swaps",
                area,
                target.id(area),
                outcome.initial_error,
                outcome.final_error,
                outcome.termination,
                outcome.attempts
            );

            if !callback.on_area_complete(&outcome) {
                stop.store(true, Ordering::Relaxed);
            }
            outcome
        };

        let outcomes: Vec<AreaOutcome> = if opts.num_threads > 1 {
            let thread_pool = rayon::ThreadPoolBuilder::new()
                .num_threads(opts.num_threads)
                .build()?;
            thread_pool.install(|| {
                world
                    .populations_mut()
                    .par_iter_mut()
                    .enumerate()
                    .map(&process)
                    .collect()
            })
        } else {
            world
                .populations_mut()
                .iter_mut()
                .enumerate()
                .map(&process)
                .collect()
        };

        ctx.rebuild_all();

        let report = SynthesisReport {
            outcomes,
            elapsed_ms: start_time.elapsed().as_millis(),
        };

        info!(
            "Done: total error {} -> {} | converged {} / {} areas in {} ms",
            report.total_initial_error(),
            report.total_final_error(),
            report.count(Termination::Converged),
            report.outcomes.len(),
            report.elapsed_ms
        );

        Ok(report)
    }
}
