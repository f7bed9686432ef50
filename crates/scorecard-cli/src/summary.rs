use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use scorecard_cli::pipeline::{CardStatus, LookupResult, PipelineRun};
use scorecard_model::{Diagnostic, DiagnosticReport, Severity};

pub fn print_summary(run: &PipelineRun) {
    println!("Spreadsheet: {}", run.files.spreadsheet.display());
    println!("Schema: {}", run.files.schema.display());
    println!("PMML files: {}", run.files.pmml.len());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Card"),
        header_cell("Source"),
        header_cell("Declared"),
        header_cell("Combined"),
        header_cell("Ambiguous"),
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 7, CellAlignment::Center);

    let mut total_declared = 0usize;
    let mut total_combined = 0usize;
    let mut total_ambiguous = 0usize;
    for card in &run.cards {
        total_declared += card.declared;
        total_combined += card.combined.unwrap_or_default();
        total_ambiguous += card.ambiguous;
        let source = card
            .source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| card.source.display().to_string());
        table.add_row(vec![
            Cell::new(&card.score_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            dim_cell(source),
            Cell::new(card.declared),
            match card.combined {
                Some(count) => Cell::new(count),
                None => dim_cell("-"),
            },
            count_cell(Some(card.ambiguous), Color::Yellow),
            count_cell(Some(card.errors), Color::Red),
            count_cell(Some(card.warnings), Color::Yellow),
            status_cell(card.status),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} cards", run.cards.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_declared).add_attribute(Attribute::Bold),
        Cell::new(total_combined).add_attribute(Attribute::Bold),
        count_cell(Some(total_ambiguous), Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(Some(run.report.error_count()), Color::Red).add_attribute(Attribute::Bold),
        count_cell(Some(run.report.warning_count()), Color::Yellow)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_diagnostic_table(&run.report);
}

/// Errors first, then by code; reporting order is kept within a code.
pub fn print_diagnostic_table(report: &DiagnosticReport) {
    if report.is_empty() {
        return;
    }
    let mut diagnostics: Vec<&Diagnostic> = report.diagnostics.iter().collect();
    diagnostics.sort_by_key(|diagnostic| (diagnostic.severity, diagnostic.kind));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Card"),
        header_cell("Parameter"),
        header_cell("Location"),
        header_cell("Message"),
    ]);
    apply_diagnostic_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 1, CellAlignment::Center);
    for diagnostic in diagnostics {
        table.add_row(vec![
            severity_cell(diagnostic.severity),
            Cell::new(diagnostic.kind.code()),
            optional_cell(diagnostic.card.as_deref()),
            optional_cell(diagnostic.parameter.as_deref()),
            optional_cell(diagnostic.location().as_deref()),
            Cell::new(&diagnostic.message),
        ]);
    }
    println!();
    println!("Diagnostics:");
    println!("{table}");
}

pub fn print_lookup(result: &LookupResult) {
    println!("Parameter: {}", result.name);

    let mut schema = Table::new();
    schema.set_header(vec![
        header_cell("Schema name"),
        header_cell("Type"),
        header_cell("Line"),
    ]);
    apply_table_style(&mut schema);
    align_column(&mut schema, 2, CellAlignment::Right);
    for (index, declaration) in result.declarations.iter().enumerate() {
        // Only the first declaration is used when combining.
        let name = if index == 0 {
            Cell::new(&declaration.name).add_attribute(Attribute::Bold)
        } else {
            dim_cell(format!("{} (ignored)", declaration.name))
        };
        schema.add_row(vec![
            name,
            Cell::new(declaration.param_type.as_str()),
            Cell::new(declaration.line),
        ]);
    }
    if result.declarations.is_empty() {
        println!("Schema: not declared");
    } else {
        println!("{schema}");
    }

    if result.rows.is_empty() {
        println!("Spreadsheet: no matching rows");
        return;
    }
    let mut rows = Table::new();
    let mut header = vec![header_cell("Row")];
    header.extend(result.headers.iter().map(|label| header_cell(label)));
    rows.set_header(header);
    apply_table_style(&mut rows);
    align_column(&mut rows, 0, CellAlignment::Right);
    for row in &result.rows {
        let mut cells = vec![dim_cell(row.row_number)];
        cells.extend(row.cells.iter().map(|value| {
            if value.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(value)
            }
        }));
        rows.add_row(cells);
    }
    println!("{rows}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 8 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(13)),
        ]);
    }
}

fn apply_diagnostic_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(180);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(15)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn status_cell(status: CardStatus) -> Cell {
    let cell = Cell::new(status.as_str());
    match status {
        CardStatus::Rendered => cell.fg(Color::Green).add_attribute(Attribute::Bold),
        CardStatus::Rejected | CardStatus::RenderFailed => {
            cell.fg(Color::Red).add_attribute(Attribute::Bold)
        }
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) if !value.is_empty() => Cell::new(value),
        _ => dim_cell("-"),
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
