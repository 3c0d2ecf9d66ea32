use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use popforge::optimizer::{SynthesisReport, Termination};
use popforge::sample::SamplePool;
use popforge::table::AttributeTable;
use popforge::SynthesisContext;

fn new_table(headers: Vec<Cell>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let n = headers.len();
    table.set_header(headers);
    for i in 1..n {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

fn print_truncation(shown: usize, total: usize) {
    if total > shown {
        println!("  ... {} more rows not shown", total - shown);
    }
}

pub fn print_target_table(target: &AttributeTable, max_rows: usize) {
    println!("\nTarget table ({} areas)", target.num_areas());
    let mut table = new_table(vec![
        Cell::new("Area").add_attribute(Attribute::Bold),
        Cell::new("Value 0"),
        Cell::new("Value 1"),
        Cell::new("Total").fg(Color::Cyan),
    ]);

    for area in target.areas().iter().take(max_rows) {
        table.add_row(vec![
            Cell::new(&area.id),
            Cell::new(area.counts[0]),
            Cell::new(area.counts[1]),
            Cell::new(area.total()),
        ]);
    }
    println!("{}", table);
    print_truncation(max_rows, target.num_areas());
}

pub fn print_sample_summary(pool: &SamplePool) {
    let [zeros, ones] = pool.composition();
    println!("\nSample ({} individuals)", pool.size());
    let mut table = new_table(vec![
        Cell::new("Value").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("Share"),
    ]);
    let size = pool.size() as f32;
    for (value, count) in [(0, zeros), (1, ones)] {
        table.add_row(vec![
            Cell::new(value),
            Cell::new(count),
            Cell::new(format!("{:.1}%", 100.0 * count as f32 / size)),
        ]);
    }
    println!("{}", table);
}

/// Target, starting and final counts per area.
pub fn print_outcome_table(ctx: &SynthesisContext, report: &SynthesisReport, max_rows: usize) {
    println!("\nSynthesis results");
    let mut table = new_table(vec![
        Cell::new("Area").add_attribute(Attribute::Bold),
        Cell::new("Target"),
        Cell::new("Start"),
        Cell::new("Final").fg(Color::Cyan),
        Cell::new("Error"),
        Cell::new("Swaps"),
        Cell::new("Status"),
    ]);

    for o in report.outcomes.iter().take(max_rows) {
        let status_color = match o.termination {
            Termination::Converged => Color::Green,
            Termination::Exhausted => Color::Yellow,
            _ => Color::Red,
        };
        table.add_row(vec![
            Cell::new(ctx.target().id(o.area)),
            Cell::new(format!("{} / {}", o.target_counts[0], o.target_counts[1])),
            Cell::new(format!("{} / {}", o.initial_counts[0], o.initial_counts[1])),
            Cell::new(format!("{} / {}", o.final_counts[0], o.final_counts[1])),
            Cell::new(format!("{} -> {}", o.initial_error, o.final_error)),
            Cell::new(format!("{} ({} kept)", o.attempts, o.accepted)),
            Cell::new(o.termination).fg(status_color),
        ]);
    }
    println!("{}", table);
    print_truncation(max_rows, report.outcomes.len());
}
