//! Terminal rendering of mapping results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use fieldmap_engine::{ColumnScore, ConfidenceLevel, ConfidenceThresholds, MappingOutcome};
use fieldmap_model::{Assignment, ConflictState, SummaryStats};

/// One row per source column, in input order.
pub fn assignment_table(outcome: &MappingOutcome, thresholds: &ConfidenceThresholds) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Confidence"),
        header_cell("Kind"),
        header_cell("Phase"),
        header_cell("Rationale"),
    ]);
    apply_assignment_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for entry in &outcome.assignments {
        table.add_row(vec![
            Cell::new(&entry.source_column)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            field_cell(entry),
            confidence_cell(entry, thresholds),
            Cell::new(entry.kind),
            entry
                .phase
                .map_or_else(|| dim_cell("-"), |phase| Cell::new(phase.as_str())),
            Cell::new(&entry.rationale),
        ]);
    }
    table
}

/// Coverage and bucket counts.
pub fn summary_table(summary: &SummaryStats) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows: [(&str, Cell); 9] = [
        ("Columns", Cell::new(summary.total_columns)),
        ("Mapped", Cell::new(summary.mapped).fg(Color::Green)),
        ("Unmapped", count_cell(summary.unmapped, Color::Yellow)),
        ("High confidence", Cell::new(summary.high_confidence)),
        ("Medium confidence", Cell::new(summary.medium_confidence)),
        ("Low confidence", count_cell(summary.low_confidence, Color::Yellow)),
        ("Forced", count_cell(summary.forced, Color::Yellow)),
        (
            "Unresolved conflicts",
            count_cell(summary.unresolved_conflicts, Color::Red),
        ),
        (
            "Mean confidence",
            Cell::new(format!("{:.2}", summary.mean_confidence)),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), value]);
    }
    table.add_row(vec![
        Cell::new("Coverage")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{:.0}%", summary.coverage() * 100.0)).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Per-strategy breakdown of one pair score.
pub fn explain_table(score: &ColumnScore) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Component"),
        header_cell("Value"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for component in &score.explanation {
        let value = if component.kind.is_some() {
            format!("{:.3}", component.value)
        } else {
            format!("x{:.3}", component.value)
        };
        table.add_row(vec![
            Cell::new(component.name),
            Cell::new(value),
            Cell::new(&component.description),
        ]);
    }
    table.add_row(vec![
        Cell::new("Final")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{:.3}", score.confidence)).add_attribute(Attribute::Bold),
        Cell::new(score.kind),
    ]);
    table
}

pub fn print_outcome(outcome: &MappingOutcome, thresholds: &ConfidenceThresholds) {
    println!("{}", assignment_table(outcome, thresholds));
    println!();
    println!("{}", summary_table(&outcome.summary));
}

fn field_cell(entry: &Assignment) -> Cell {
    match (entry.target_name(), &entry.conflict) {
        (None, _) => dim_cell("(none)"),
        (Some(name), ConflictState::Unresolved) => {
            Cell::new(format!("{name} (conflict)")).fg(Color::Red)
        }
        (Some(name), ConflictState::Reassigned { previous }) => {
            Cell::new(format!("{name} (was {previous})")).fg(Color::Yellow)
        }
        (Some(name), ConflictState::None) => Cell::new(name),
    }
}

fn confidence_cell(entry: &Assignment, thresholds: &ConfidenceThresholds) -> Cell {
    let text = format!("{:.2}", entry.confidence);
    if !entry.is_mapped() {
        return dim_cell(text);
    }
    match thresholds.categorize(entry.confidence) {
        ConfidenceLevel::High => Cell::new(text).fg(Color::Green),
        ConfidenceLevel::Medium => Cell::new(text).fg(Color::Yellow),
        ConfidenceLevel::Low => Cell::new(text).fg(Color::Red),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_assignment_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Percentage(20)),
        ColumnConstraint::UpperBoundary(Width::Percentage(20)),
        ColumnConstraint::LowerBoundary(Width::Fixed(10)),
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ColumnConstraint::LowerBoundary(Width::Fixed(9)),
        ColumnConstraint::UpperBoundary(Width::Percentage(45)),
    ]);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
