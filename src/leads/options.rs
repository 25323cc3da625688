// src/leads/options.rs

use serde::Serialize;
use std::collections::HashSet;

use super::{
    cell,
    columns::{ColumnBinding, CNAE, COUNTRY, FILTER_COLUMNS, INDUSTRY, ROLE},
    Table,
};

/// Distinct values per filterable column, as served by `GET /filter-options`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub roles: Vec<String>,
    pub industries: Vec<String>,
    pub countries: Vec<String>,
    pub cnaes: Vec<String>,
}

/// Collect the distinct values of one column in first-seen order. Cells
/// missing from short rows are skipped; an unresolved column yields nothing.
fn distinct(table: &Table, index: Option<usize>) -> Vec<String> {
    let Some(index) = index else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    table
        .rows
        .iter()
        .filter_map(|row| cell(row, index))
        .filter(|v| seen.insert(*v))
        .map(String::from)
        .collect()
}

/// Tolerant counterpart of the download path: a header lacking one of the
/// columns just leaves that list empty.
pub fn collect_filter_options(table: &Table) -> FilterOptions {
    let binding = ColumnBinding::resolve(&table.header, &FILTER_COLUMNS);
    FilterOptions {
        roles: distinct(table, binding.index_of(ROLE)),
        industries: distinct(table, binding.index_of(INDUSTRY)),
        countries: distinct(table, binding.index_of(COUNTRY)),
        cnaes: distinct(table, binding.index_of(CNAE)),
    }
}
