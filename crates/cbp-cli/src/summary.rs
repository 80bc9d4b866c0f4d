use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cbp_cli::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Study: {}", result.study_id);
    println!("Output: {}", result.output.display());
    println!("{}", summary_table(result));
}

fn summary_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Study"),
        header_cell("Name"),
        header_cell("Samples"),
        header_cell("Patients"),
        header_cell("Unmatched"),
        header_cell("Rows written"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(&result.study_id).add_attribute(Attribute::Bold),
        match &result.study_name {
            Some(name) => Cell::new(name),
            None => dim_cell("-"),
        },
        Cell::new(result.sample_rows),
        Cell::new(result.patient_rows),
        count_cell(result.unmatched_samples, Color::Yellow),
        Cell::new(result.output_rows).add_attribute(Attribute::Bold),
        Cell::new(result.output.display()),
    ]);
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
