use crate::error::{PfResult, PopForgeError};
use crate::sample::SamplePool;
use crate::table::{l1_error, AttributeTable, Counts};
use crate::world::WorldState;
use fastrand::Rng;
use tracing::{debug, info};

/// Everything one synthesis run works on: the read-only inputs, the mutable
/// world, and the table of counts observed in that world.
pub struct SynthesisContext {
    pool: SamplePool,
    target: AttributeTable,
    current: AttributeTable,
    world: WorldState,
}

impl SynthesisContext {
    /// Builds the starting world by random fill. With `seed` set, the fill is
    /// reproducible.
    pub fn new(pool: SamplePool, target: AttributeTable, seed: Option<u64>) -> Self {
        let mut rng = if let Some(s) = seed {
            Rng::with_seed(s)
        } else {
            Rng::new()
        };

        let world = WorldState::random_fill(&pool, &target, &mut rng);
        Self::assemble(pool, target, world)
    }

    /// Wraps an existing world. It needs one population per area, each of its
    /// area's target size, holding only indices into `pool`.
    pub fn with_world(
        pool: SamplePool,
        target: AttributeTable,
        world: WorldState,
    ) -> PfResult<Self> {
        if world.num_areas() != target.num_areas() {
            return Err(PopForgeError::Validation(format!(
                "world has {} areas, target table has {}",
                world.num_areas(),
                target.num_areas()
            )));
        }
        for area in 0..target.num_areas() {
            let members = world.population(area);
            let expected = target.total_population(area);
            if members.len() != expected {
                return Err(PopForgeError::Validation(format!(
                    "{} holds {} members, expected {}",
                    target.area(area),
                    members.len(),
                    expected
                )));
            }
            if let Some(&bad) = members.iter().find(|&&m| m >= pool.size()) {
                return Err(PopForgeError::Validation(format!(
                    "{} references member {} but the sample has {} individuals",
                    target.area(area),
                    bad,
                    pool.size()
                )));
            }
        }
        Ok(Self::assemble(pool, target, world))
    }

    fn assemble(pool: SamplePool, target: AttributeTable, world: WorldState) -> Self {
        let current = AttributeTable::zeroed_like(&target);

        let mut ctx = Self {
            pool,
            target,
            current,
            world,
        };
        ctx.rebuild_all();

        info!(
            "Initial fill: {} areas, {} members drawn from {} individuals",
            ctx.target.num_areas(),
            ctx.target.grand_total(),
            ctx.pool.size()
        );
        for area in 0..ctx.target.num_areas() {
            debug!(
                "{} | start 0: {} 1: {}",
                ctx.target.area(area),
                ctx.current.get(area, 0),
                ctx.current.get(area, 1)
            );
        }

        ctx
    }

    /// Zeroes the area's current counts, then counts every member.
    pub fn rebuild_current(&mut self, area: usize) {
        self.current.set(area, 0, 0);
        self.current.set(area, 1, 0);
        for &m in self.world.population(area) {
            let col = self.pool.get(m).column();
            self.current.increment(area, col);
        }
    }

    pub fn rebuild_all(&mut self) {
        for area in 0..self.target.num_areas() {
            self.rebuild_current(area);
        }
    }

    /// L1 distance between target and freshly rebuilt current counts.
    pub fn error(&mut self, area: usize) -> u32 {
        self.rebuild_current(area);
        l1_error(self.target.counts(area), self.current.counts(area))
    }

    pub fn total_error(&mut self) -> u64 {
        (0..self.target.num_areas())
            .map(|area| self.error(area) as u64)
            .sum()
    }

    pub fn current_counts(&self, area: usize) -> Counts {
        self.current.counts(area)
    }

    pub fn pool(&self) -> &SamplePool {
        &self.pool
    }

    pub fn target(&self) -> &AttributeTable {
        &self.target
    }

    pub fn current(&self) -> &AttributeTable {
        &self.current
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn num_areas(&self) -> usize {
        self.target.num_areas()
    }

    /// Split borrow for the optimizer: shared inputs, exclusive world.
    pub(crate) fn parts_mut(&mut self) -> (&SamplePool, &AttributeTable, &mut WorldState) {
        (&self.pool, &self.target, &mut self.world)
    }
}
