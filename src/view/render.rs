use serde_json::Value;

use crate::types::{display_text, Position};

pub const PLACEHOLDER: &str = "N/A";
pub const NO_POSITIONS: &str = "No open positions";

pub const POSITION_COLUMNS: [&str; 10] = [
    "ID",
    "Symbol",
    "Size",
    "Leverage",
    "Avg Price",
    "Mark Price",
    "Side",
    "Stop Loss",
    "Take Profit",
    "Unrealised PnL",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Cells(Vec<String>),
    /// Single cell spanning every column.
    Notice(String),
}

/// Display text for one position field. Missing, null, false, empty and
/// zero values all fall back to the placeholder.
pub fn cell_text(value: Option<&Value>) -> String {
    value
        .and_then(display_text)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn position_row(position: &Position) -> TableRow {
    TableRow::Cells(position.fields().into_iter().map(cell_text).collect())
}

pub fn position_rows(positions: &[Position]) -> Vec<TableRow> {
    positions.iter().map(position_row).collect()
}

pub fn no_positions_row() -> TableRow {
    TableRow::Notice(NO_POSITIONS.to_string())
}

/// Lays rows out as a fixed-width text table under the position headers.
pub fn format_table(rows: &[TableRow]) -> String {
    let mut widths: Vec<usize> = POSITION_COLUMNS.iter().map(|h| h.len()).collect();
    for row in rows {
        if let TableRow::Cells(cells) = row {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(POSITION_COLUMNS.to_vec())];
    let total: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    out.push("-".repeat(total));
    for row in rows {
        match row {
            TableRow::Cells(cells) => out.push(line(cells.iter().map(String::as_str).collect())),
            TableRow::Notice(text) => out.push(text.clone()),
        }
    }
    out.join("\n")
}
