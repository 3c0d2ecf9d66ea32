pub mod runner;

pub use self::runner::{
    NoProgress, OptimizationOptions, Optimizer, ProgressCallback, SynthesisReport,
};

use crate::config::AnnealParams;
use crate::sample::SamplePool;
use crate::table::{l1_error, Counts};
use crate::world::{tally, Population};
use fastrand::Rng;
use serde::Serialize;
use std::time::Instant;
use strum_macros::{Display, EnumIter};
use tracing::trace;

/// Why an area stopped being optimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Error reached the margin.
    Converged,
    /// Every temperature step ran out of attempts.
    Exhausted,
    SwapCapReached,
    DeadlineReached,
    /// Never started: the run was cancelled by its progress callback.
    Cancelled,
}

/// Position of an area in its cooling schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnealPhase {
    Init,
    /// About to run temperature step `step` (counts down to 1).
    Cooling { step: u32 },
    /// `attempt` swaps already made at `step`.
    Swapping { step: u32, attempt: u32 },
    Done(Termination),
}

impl AnnealPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnnealPhase::Done(_))
    }
}

/// Limits shared by every area of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapBudget {
    pub max_swaps: Option<u64>,
    pub deadline: Option<Instant>,
}

impl SwapBudget {
    fn check(&self, attempts: u64) -> Option<Termination> {
        if let Some(cap) = self.max_swaps {
            if attempts >= cap {
                return Some(Termination::SwapCapReached);
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Some(Termination::DeadlineReached);
            }
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaOutcome {
    pub area: usize,
    pub target_counts: Counts,
    pub initial_counts: Counts,
    pub final_counts: Counts,
    pub initial_error: u32,
    pub min_error: u32,
    pub final_error: u32,
    pub attempts: u64,
    pub accepted: u64,
    pub termination: Termination,
}

impl AreaOutcome {
    pub(crate) fn cancelled(area: usize, target: Counts, current: Counts) -> Self {
        let error = l1_error(target, current);
        Self {
            area,
            target_counts: target,
            initial_counts: current,
            final_counts: current,
            initial_error: error,
            min_error: error,
            final_error: error,
            attempts: 0,
            accepted: 0,
            termination: Termination::Cancelled,
        }
    }
}

/// Probability of keeping a move from `current` to `candidate` error.
pub fn acceptance_probability(current: u32, candidate: u32, temperature: f64) -> f64 {
    if candidate <= current {
        1.0
    } else {
        (-((candidate - current) as f64) / temperature).exp()
    }
}

/// Metropolis rule. `roll` is a uniform sample in `[0, 1)`; it is only
/// consulted for worsening moves.
#[inline]
pub fn metropolis_accepts(current: u32, candidate: u32, temperature: f64, roll: f64) -> bool {
    candidate <= current || roll < acceptance_probability(current, candidate, temperature)
}

/// Simulated annealing over a single area's population.
///
/// Each call to [`AreaAnnealer::advance`] performs one transition of the
/// schedule, so the acceptance rule and the cooling loop can be driven and
/// inspected step by step. The population is only ever replaced member by
/// member; its length never changes.
pub struct AreaAnnealer<'a> {
    area: usize,
    pool: &'a SamplePool,
    target: Counts,
    population: &'a mut Population,
    params: &'a AnnealParams,
    budget: SwapBudget,
    rng: Rng,

    phase: AnnealPhase,
    temperature: f64,
    current: Counts,
    error: u32,

    initial_counts: Counts,
    initial_error: u32,
    min_error: u32,
    best: Population,

    attempts: u64,
    accepted: u64,
}

impl<'a> AreaAnnealer<'a> {
    pub fn new(
        area: usize,
        pool: &'a SamplePool,
        target: Counts,
        population: &'a mut Population,
        params: &'a AnnealParams,
        budget: SwapBudget,
        rng: Rng,
    ) -> Self {
        Self {
            area,
            pool,
            target,
            population,
            params,
            budget,
            rng,
            phase: AnnealPhase::Init,
            temperature: 0.0,
            current: [0, 0],
            error: 0,
            initial_counts: [0, 0],
            initial_error: 0,
            min_error: 0,
            best: Vec::new(),
            attempts: 0,
            accepted: 0,
        }
    }

    pub fn phase(&self) -> AnnealPhase {
        self.phase
    }

    pub fn error(&self) -> u32 {
        self.error
    }

    pub fn min_error(&self) -> u32 {
        self.min_error
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn current_counts(&self) -> Counts {
        self.current
    }

    pub fn population(&self) -> &[usize] {
        self.population.as_slice()
    }

    /// Recounts the population and returns its error.
    fn rebuild(&mut self) -> u32 {
        self.current = tally(&*self.population, self.pool);
        l1_error(self.target, self.current)
    }

    /// Moves the schedule forward by one transition and returns the new phase.
    pub fn advance(&mut self) -> AnnealPhase {
        let margin = self.params.error_margin;

        let phase = self.phase;
        self.phase = match phase {
            AnnealPhase::Init => {
                self.error = self.rebuild();
                self.initial_counts = self.current;
                self.initial_error = self.error;
                self.min_error = self.error;
                self.best = self.population.clone();

                if self.error <= margin {
                    self.finish(Termination::Converged)
                } else if self.params.max_temperature == 0 {
                    self.finish(Termination::Exhausted)
                } else {
                    AnnealPhase::Cooling {
                        step: self.params.max_temperature,
                    }
                }
            }
            AnnealPhase::Cooling { step } => {
                self.temperature = self.params.temperature_at(step);
                AnnealPhase::Swapping { step, attempt: 0 }
            }
            AnnealPhase::Swapping { step, attempt } => {
                if self.error <= margin {
                    self.finish(Termination::Converged)
                } else if attempt >= self.params.max_runs {
                    if step > 1 {
                        AnnealPhase::Cooling { step: step - 1 }
                    } else {
                        self.finish(Termination::Exhausted)
                    }
                } else if let Some(reason) = self.budget.check(self.attempts) {
                    self.finish(reason)
                } else {
                    self.try_swap(step, attempt);
                    AnnealPhase::Swapping {
                        step,
                        attempt: attempt + 1,
                    }
                }
            }
            done @ AnnealPhase::Done(_) => done,
        };

        self.phase
    }

    /// Replaces one random member with a fresh draw and keeps or reverts it.
    fn try_swap(&mut self, step: u32, attempt: u32) {
        let len = self.population.len();
        if len == 0 {
            return;
        }

        let slot = self.rng.usize(0..len);
        let old = self.population.remove(slot);
        let new = self.pool.draw_index(&mut self.rng);
        self.population.push(new);

        let previous_counts = self.current;
        let candidate = self.rebuild();
        self.attempts += 1;

        let accept = if candidate <= self.error {
            true
        } else {
            let roll = self.rng.f64();
            metropolis_accepts(self.error, candidate, self.temperature, roll)
        };

        trace!(
            area = self.area,
            step,
            attempt,
            error = self.error,
            candidate,
            accept,
            "swap"
        );

        if accept {
            self.error = candidate;
            self.accepted += 1;
            if self.error < self.min_error {
                self.min_error = self.error;
                self.best.clone_from(&*self.population);
            }
        } else {
            self.population.pop();
            self.population.insert(slot, old);
            self.current = previous_counts;
        }
    }

    /// Restores the best population seen if the live one is worse.
    fn finish(&mut self, termination: Termination) -> AnnealPhase {
        if self.error > self.min_error {
            self.population.clone_from(&self.best);
            self.error = self.rebuild();
        }
        AnnealPhase::Done(termination)
    }

    /// Runs the schedule to completion.
    pub fn run(mut self) -> AreaOutcome {
        loop {
            if let AnnealPhase::Done(termination) = self.advance() {
                return AreaOutcome {
                    area: self.area,
                    target_counts: self.target,
                    initial_counts: self.initial_counts,
                    final_counts: self.current,
                    initial_error: self.initial_error,
                    min_error: self.min_error,
                    final_error: self.error,
                    attempts: self.attempts,
                    accepted: self.accepted,
                    termination,
                };
            }
        }
    }
}
