#![allow(dead_code)]

use popforge::sample::{Individual, SamplePool};
use popforge::table::{Area, AttributeTable};
use std::io::Write;
use tempfile::NamedTempFile;

/// Pool from `(id, value)` pairs.
pub fn pool(people: &[(&str, u8)]) -> SamplePool {
    SamplePool::new(
        people
            .iter()
            .map(|&(id, v)| Individual::new(id, v).unwrap())
            .collect(),
    )
    .unwrap()
}

/// Target table from `(id, count0, count1)` rows.
pub fn table(rows: &[(&str, u32, u32)]) -> AttributeTable {
    AttributeTable::from_areas(
        rows.iter()
            .map(|&(id, c0, c1)| Area::new(id, c0, c1))
            .collect(),
    )
    .unwrap()
}

/// A balanced pool of `n` people alternating value 0 / 1.
pub fn mixed_pool(n: usize) -> SamplePool {
    SamplePool::new(
        (0..n)
            .map(|i| Individual::new(format!("P{}", i), (i % 2) as u8).unwrap())
            .collect(),
    )
    .unwrap()
}

/// Writes `lines` to a temp file, one per line.
pub fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}
