use crate::error::{PfResult, PopForgeError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Two-column counts for one area: how many members hold value 0 and value 1.
pub type Counts = [u32; 2];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub counts: Counts,
}

impl Area {
    pub fn new(id: impl Into<String>, count0: u32, count1: u32) -> Self {
        Self {
            id: id.into(),
            counts: [count0, count1],
        }
    }

    pub fn total(&self) -> usize {
        self.counts[0] as usize + self.counts[1] as usize
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id.is_empty() {
            write!(f, "0: {} | 1: {}", self.counts[0], self.counts[1])
        } else {
            write!(
                f,
                "Area {} | 0: {} | 1: {}",
                self.id, self.counts[0], self.counts[1]
            )
        }
    }
}

/// Ordered per-area counts. Used both for the targets being fitted and for
/// the counts observed in the synthetic population.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeTable {
    areas: Vec<Area>,
}

impl AttributeTable {
    pub fn from_areas(areas: Vec<Area>) -> PfResult<Self> {
        if areas.is_empty() {
            return Err(PopForgeError::EmptyAreaSet);
        }
        // Output rows are keyed by id, so ids must tell areas apart.
        let mut seen = HashSet::with_capacity(areas.len());
        for area in &areas {
            if !seen.insert(area.id.as_str()) {
                return Err(PopForgeError::Validation(format!(
                    "duplicate area id '{}'",
                    area.id
                )));
            }
        }
        Ok(Self { areas })
    }

    /// `size` areas with no ids and zeroed counts.
    pub fn with_size(size: usize) -> Self {
        Self {
            areas: (0..size).map(|_| Area::new("", 0, 0)).collect(),
        }
    }

    /// Same ids as `other`, zeroed counts.
    pub fn zeroed_like(other: &AttributeTable) -> Self {
        Self {
            areas: other.areas.iter().map(|a| Area::new(a.id.clone(), 0, 0)).collect(),
        }
    }

    pub fn num_areas(&self) -> usize {
        self.areas.len()
    }

    pub fn area(&self, area: usize) -> &Area {
        &self.areas[area]
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn id(&self, area: usize) -> &str {
        &self.areas[area].id
    }

    #[inline(always)]
    pub fn counts(&self, area: usize) -> Counts {
        self.areas[area].counts
    }

    pub fn total_population(&self, area: usize) -> usize {
        self.areas[area].total()
    }

    #[inline(always)]
    pub fn get(&self, area: usize, col: usize) -> u32 {
        self.areas[area].counts[col]
    }

    #[inline(always)]
    pub fn set(&mut self, area: usize, col: usize, value: u32) {
        self.areas[area].counts[col] = value;
    }

    #[inline(always)]
    pub fn increment(&mut self, area: usize, col: usize) {
        self.areas[area].counts[col] += 1;
    }

    pub fn set_counts(&mut self, area: usize, counts: Counts) {
        self.areas[area].counts = counts;
    }

    /// Sum of every area's target population.
    pub fn grand_total(&self) -> usize {
        self.areas.iter().map(Area::total).sum()
    }
}

/// L1 distance between two count vectors.
#[inline(always)]
pub fn l1_error(target: Counts, current: Counts) -> u32 {
    target[0].abs_diff(current[0]) + target[1].abs_diff(current[1])
}
