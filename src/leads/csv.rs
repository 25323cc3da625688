// src/leads/csv.rs

use super::{Row, Table};

/// Quote a field only when it contains a comma, doubling inner quotes.
/// Quotes or line breaks without a comma pass through untouched.
pub fn escape_field(field: &str) -> String {
    if field.contains(',') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn encode_row(row: &Row) -> String {
    row.iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header line, `\n`, then data rows joined by `\n`. No trailing newline.
pub fn encode(table: &Table) -> String {
    let header = encode_row(&table.header);
    let data = table
        .rows
        .iter()
        .map(encode_row)
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n{}", header, data)
}
