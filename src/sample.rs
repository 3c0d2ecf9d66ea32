use crate::error::{PfResult, PopForgeError};
use crate::table::Counts;
use fastrand::Rng;
use serde::Serialize;

/// Index of an individual inside its `SamplePool`.
pub type MemberIdx = usize;

/// A sampled unit carrying one binary attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Individual {
    pub id: String,
    value: u8,
}

impl Individual {
    pub fn new(id: impl Into<String>, value: u8) -> PfResult<Self> {
        let id = id.into();
        if value > 1 {
            return Err(PopForgeError::Validation(format!(
                "individual '{}' has value {}, expected 0 or 1",
                id, value
            )));
        }
        Ok(Self { id, value })
    }

    #[inline(always)]
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Attribute column this individual counts towards.
    #[inline(always)]
    pub fn column(&self) -> usize {
        self.value as usize
    }
}

/// Read-only pool that areas are filled from, with replacement.
#[derive(Debug, Clone)]
pub struct SamplePool {
    people: Vec<Individual>,
}

impl SamplePool {
    pub fn new(people: Vec<Individual>) -> PfResult<Self> {
        if people.is_empty() {
            return Err(PopForgeError::EmptySample);
        }
        Ok(Self { people })
    }

    pub fn size(&self) -> usize {
        self.people.len()
    }

    #[inline(always)]
    pub fn get(&self, idx: MemberIdx) -> &Individual {
        &self.people[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.people.iter()
    }

    /// Uniform draw. The pool is never empty, so this cannot fail.
    #[inline(always)]
    pub fn draw_index(&self, rng: &mut Rng) -> MemberIdx {
        rng.usize(0..self.people.len())
    }

    pub fn draw(&self, rng: &mut Rng) -> &Individual {
        self.get(self.draw_index(rng))
    }

    /// Number of individuals holding value 0 and value 1.
    pub fn composition(&self) -> [u32; 2] {
        let mut counts = [0u32; 2];
        for p in &self.people {
            counts[p.column()] += 1;
        }
        counts
    }

    /// Whether some population drawn from this pool can hit `target` exactly.
    /// Draws are with replacement, so one individual of each needed value suffices.
    pub fn can_match_exactly(&self, target: Counts) -> bool {
        let available = self.composition();
        (target[0] == 0 || available[0] > 0) && (target[1] == 0 || available[1] > 0)
    }
}
