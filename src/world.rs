use crate::sample::{MemberIdx, SamplePool};
use crate::table::{AttributeTable, Counts};
use fastrand::Rng;

/// Synthetic population of one area: references into the sample pool.
/// The same individual may appear several times, and in several areas.
pub type Population = Vec<MemberIdx>;

/// The synthetic world: one population per area of the target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldState {
    populations: Vec<Population>,
}

impl WorldState {
    pub fn from_populations(populations: Vec<Population>) -> Self {
        Self { populations }
    }

    /// Fills every area with `target.total_population(area)` uniform draws,
    /// ignoring the attribute split.
    pub fn random_fill(pool: &SamplePool, target: &AttributeTable, rng: &mut Rng) -> Self {
        let populations = (0..target.num_areas())
            .map(|area| {
                (0..target.total_population(area))
                    .map(|_| pool.draw_index(rng))
                    .collect()
            })
            .collect();
        Self { populations }
    }

    pub fn num_areas(&self) -> usize {
        self.populations.len()
    }

    pub fn population(&self, area: usize) -> &[MemberIdx] {
        &self.populations[area]
    }

    pub fn population_mut(&mut self, area: usize) -> &mut Population {
        &mut self.populations[area]
    }

    pub fn populations(&self) -> &[Population] {
        &self.populations
    }

    pub fn populations_mut(&mut self) -> &mut [Population] {
        &mut self.populations
    }
}

/// Counts of value 0 and value 1 among `members`.
#[inline]
pub fn tally(members: &[MemberIdx], pool: &SamplePool) -> Counts {
    let mut counts = [0u32; 2];
    for &m in members {
        counts[pool.get(m).column()] += 1;
    }
    counts
}
