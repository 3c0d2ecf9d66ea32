use crate::error::{PfResult, PopForgeError};
use crate::sample::{Individual, SamplePool};
use crate::table::{Area, AttributeTable};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

fn reader_for<R: Read>(rdr: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(rdr)
}

fn line_of(rec: &StringRecord) -> u64 {
    rec.position().map(|p| p.line()).unwrap_or(0)
}

fn parse_count(rec: &StringRecord, idx: usize, what: &str) -> PfResult<u32> {
    let raw = &rec[idx];
    raw.parse::<u32>().map_err(|_| {
        PopForgeError::parse(
            line_of(rec),
            format!("{} must be a non-negative integer, got '{}'", what, raw),
        )
    })
}

/// Reads `AreaID,Value0Count,Value1Count` rows. The header line is skipped.
pub fn read_target_table<R: Read>(rdr: R) -> PfResult<AttributeTable> {
    let mut rdr = reader_for(rdr);
    let mut areas = Vec::new();
    let mut first_seen: HashMap<String, u64> = HashMap::new();

    for result in rdr.records() {
        let rec = result?;
        if rec.len() < 3 {
            return Err(PopForgeError::parse(
                line_of(&rec),
                format!("expected 3 fields (id,count0,count1), found {}", rec.len()),
            ));
        }

        let count0 = parse_count(&rec, 1, "count0")?;
        let count1 = parse_count(&rec, 2, "count1")?;

        let line = line_of(&rec);
        if let Some(first) = first_seen.insert(rec[0].to_string(), line) {
            return Err(PopForgeError::parse(
                line,
                format!("duplicate area id '{}' (first on line {})", &rec[0], first),
            ));
        }
        areas.push(Area::new(&rec[0], count0, count1));
    }

    debug!("Parsed {} target rows", areas.len());
    AttributeTable::from_areas(areas)
}

/// Reads `PersonID,Value` rows with value 0 or 1. The header line is skipped.
pub fn read_sample_pool<R: Read>(rdr: R) -> PfResult<SamplePool> {
    let mut rdr = reader_for(rdr);
    let mut people = Vec::new();

    for result in rdr.records() {
        let rec = result?;
        if rec.len() < 2 {
            return Err(PopForgeError::parse(
                line_of(&rec),
                format!("expected 2 fields (id,value), found {}", rec.len()),
            ));
        }

        let value = match &rec[1] {
            "0" => 0,
            "1" => 1,
            other => {
                return Err(PopForgeError::parse(
                    line_of(&rec),
                    format!("value must be 0 or 1, got '{}'", other),
                ))
            }
        };
        people.push(Individual::new(&rec[0], value)?);
    }

    debug!("Parsed {} sample rows", people.len());
    SamplePool::new(people)
}

pub fn load_target_table<P: AsRef<Path>>(path: P) -> PfResult<AttributeTable> {
    let path = path.as_ref();
    info!("📂 Loading targets: {}", path.display());
    let table = read_target_table(File::open(path)?)?;
    info!(
        "   -> {} areas, {} people to place",
        table.num_areas(),
        table.grand_total()
    );
    Ok(table)
}

pub fn load_sample_pool<P: AsRef<Path>>(path: P) -> PfResult<SamplePool> {
    let path = path.as_ref();
    info!("📂 Loading sample: {}", path.display());
    let pool = read_sample_pool(File::open(path)?)?;
    let [zeros, ones] = pool.composition();
    info!(
        "   -> {} individuals (value 0: {}, value 1: {})",
        pool.size(),
        zeros,
        ones
    );
    Ok(pool)
}
