use std::io::{self, IsTerminal};

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use retail_model::{FACT_TABLE, RunSummary};

/// Print the run summary; piped output gets the plain markdown table.
pub fn print_summary(summary: &RunSummary) {
    println!("Database: {}", summary.database.display());
    if io::stdout().is_terminal() {
        let mut table = summary_table(summary);
        apply_summary_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        align_column(&mut table, 2, CellAlignment::Right);
        println!("{table}");
    } else {
        println!("{}", plain_summary(summary));
    }
    if summary.table(FACT_TABLE).is_none() {
        println!("{FACT_TABLE} was not built: join keys missing (see log)");
    }
}

/// Unstyled markdown rendering of the summary table.
pub fn plain_summary(summary: &RunSummary) -> String {
    let mut table = summary_table(summary);
    table.load_preset(ASCII_MARKDOWN).force_no_tty();
    table.to_string()
}

fn summary_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    for entry in &summary.tables {
        let name = if entry.name == FACT_TABLE {
            Cell::new(&entry.name).fg(Color::Green)
        } else {
            Cell::new(&entry.name)
        };
        table.add_row(vec![name, Cell::new(entry.rows), Cell::new(entry.columns)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.total_rows()).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

pub fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use retail_model::TableSummary;

    fn table(name: &str, rows: usize, columns: usize) -> TableSummary {
        TableSummary {
            name: name.to_string(),
            rows,
            columns,
        }
    }

    #[test]
    fn plain_summary_lists_every_table() {
        let summary = RunSummary {
            database: "retail.db".into(),
            tables: vec![
                table("customers", 1, 2),
                table("products", 1, 2),
                table("orders", 1, 3),
                table("order_items", 1, 5),
                table(FACT_TABLE, 1, 11),
            ],
        };
        insta::assert_snapshot!(plain_summary(&summary), @r"
        | Table            | Rows | Columns |
        |------------------|------|---------|
        | customers        | 1    | 2       |
        | products         | 1    | 2       |
        | orders           | 1    | 3       |
        | order_items      | 1    | 5       |
        | fact_order_items | 1    | 11      |
        | TOTAL            | 5    | -       |
        ");
    }

    #[test]
    fn plain_summary_without_fact() {
        let summary = RunSummary {
            database: "retail.db".into(),
            tables: vec![table("customers", 12, 4), table("order_items", 0, 3)],
        };
        insta::assert_snapshot!(plain_summary(&summary), @r"
        | Table       | Rows | Columns |
        |-------------|------|---------|
        | customers   | 12   | 4       |
        | order_items | 0    | 3       |
        | TOTAL       | 12   | -       |
        ");
    }
}
