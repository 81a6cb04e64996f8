use std::fmt::Write;

use crate::model::StockRecord;
use crate::screener::Column;
use crate::sort::{SortDirection, SortState};

/// Plain-text table with right-aligned cells and a sort marker on the active header.
pub fn render(rows: &[StockRecord], columns: &[Column], sort: SortState) -> String {
    let headers: Vec<String> = columns
        .iter()
        .map(|column| {
            let marker = column
                .sort_field()
                .and_then(|field| sort.direction_for(field))
                .map(|direction| match direction {
                    SortDirection::Ascending => " ^",
                    SortDirection::Descending => " v",
                })
                .unwrap_or("");
            format!("{}{marker}", column.label())
        })
        .collect();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|column| column.cell(row)).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            cells
                .iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "{}", line.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortField;

    #[test]
    fn renders_header_marker_and_missing_cells() {
        let rows = vec![
            StockRecord {
                price: Some(12.5),
                ..StockRecord::new("ab")
            },
            StockRecord::new("LONGER"),
        ];
        let table = render(
            &rows,
            &[Column::Symbol, Column::Price],
            SortState::new(SortField::Price, SortDirection::Descending),
        );

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Symbol | Price v");
        assert_eq!(lines[1], "------ | -------");
        assert_eq!(lines[2], "    AB |   12.50");
        assert_eq!(lines[3], "LONGER |       -");
    }
}
