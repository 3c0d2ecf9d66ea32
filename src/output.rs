use crate::context::SynthesisContext;
use crate::error::{PfResult, PopForgeError};
use crate::table::Counts;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// One synthetic person placed in one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "Area")]
    pub area_id: String,
    #[serde(rename = "Person")]
    pub person_id: String,
    #[serde(rename = "Value")]
    pub value: u8,
}

/// Flattens the world: areas in table order, members in population order.
pub fn build_records(ctx: &SynthesisContext) -> Vec<OutputRecord> {
    let pool = ctx.pool();
    let target = ctx.target();
    let world = ctx.world();

    let mut records = Vec::with_capacity(target.grand_total());
    for area in 0..target.num_areas() {
        let area_id = target.id(area);
        for &m in world.population(area) {
            let person = pool.get(m);
            records.push(OutputRecord {
                area_id: area_id.to_string(),
                person_id: person.id.clone(),
                value: person.value(),
            });
        }
    }
    records
}

/// Writes `Area,Person,Value` csv.
pub fn write_records<W: Write>(records: &[OutputRecord], writer: W) -> PfResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if records.is_empty() {
        wtr.write_record(["Area", "Person", "Value"])?;
    }
    for rec in records {
        wtr.serialize(rec)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_records<P: AsRef<Path>>(records: &[OutputRecord], path: P) -> PfResult<()> {
    let path = path.as_ref();
    write_records(records, File::create(path)?)?;
    info!("💾 Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Per-area counts recovered from emitted records, keyed by area id.
pub fn counts_from_records(records: &[OutputRecord]) -> PfResult<HashMap<String, Counts>> {
    let mut counts: HashMap<String, Counts> = HashMap::new();
    for rec in records {
        if rec.value > 1 {
            return Err(PopForgeError::Validation(format!(
                "record {},{} has value {}; expected 0 or 1",
                rec.area_id, rec.person_id, rec.value
            )));
        }
        counts.entry(rec.area_id.clone()).or_insert([0, 0])[rec.value as usize] += 1;
    }
    Ok(counts)
}
