// src/leads/columns.rs

use crate::error::LeadError;

pub const ROLE: &str = "Role";
pub const INDUSTRY: &str = "industry";
pub const COUNTRY: &str = "country";
pub const CNAE: &str = "CNAE";
pub const DOWNLOAD_COUNT: &str = "DownloadCount";

/// Columns a client can filter on, in response order.
pub const FILTER_COLUMNS: [&str; 4] = [ROLE, INDUSTRY, COUNTRY, CNAE];

/// Everything the download path needs before it may touch a row.
pub const REQUIRED_COLUMNS: [&str; 5] = [ROLE, INDUSTRY, COUNTRY, CNAE, DOWNLOAD_COUNT];

/// Logical column name → position in a live header row.
///
/// Names are matched exactly against the header; the first occurrence wins.
/// A name absent from the header is kept with `None` so callers decide
/// whether that is fatal (download) or just an empty result (options).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBinding {
    entries: Vec<(&'static str, Option<usize>)>,
}

impl ColumnBinding {
    pub fn resolve(header: &[String], names: &[&'static str]) -> Self {
        let entries = names
            .iter()
            .map(|&name| (name, header.iter().position(|h| h == name)))
            .collect();
        Self { entries }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, idx)| *idx)
    }

    /// Names that did not appear in the header, in the order they were asked for.
    pub fn missing(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, idx)| idx.is_none())
            .map(|(n, _)| *n)
            .collect()
    }
}

/// All five lead columns, every one present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadColumns {
    pub role: usize,
    pub industry: usize,
    pub country: usize,
    pub cnae: usize,
    pub download_count: usize,
}

impl LeadColumns {
    /// Strict resolution: any absent column fails with the list of missing names.
    pub fn resolve(header: &[String]) -> Result<Self, LeadError> {
        let binding = ColumnBinding::resolve(header, &REQUIRED_COLUMNS);
        match (
            binding.index_of(ROLE),
            binding.index_of(INDUSTRY),
            binding.index_of(COUNTRY),
            binding.index_of(CNAE),
            binding.index_of(DOWNLOAD_COUNT),
        ) {
            (Some(role), Some(industry), Some(country), Some(cnae), Some(download_count)) => {
                Ok(Self {
                    role,
                    industry,
                    country,
                    cnae,
                    download_count,
                })
            }
            _ => Err(LeadError::MissingColumns(
                binding.missing().into_iter().map(String::from).collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::fixtures::row;

    #[test]
    fn resolves_positions() {
        let header = row(&["DownloadCount", "CNAE", "country", "industry", "Role"]);
        let cols = LeadColumns::resolve(&header).unwrap();
        assert_eq!(cols.role, 4);
        assert_eq!(cols.industry, 3);
        assert_eq!(cols.country, 2);
        assert_eq!(cols.cnae, 1);
        assert_eq!(cols.download_count, 0);
    }

    #[test]
    fn missing_columns_are_named() {
        let header = row(&["Role", "Industry", "country"]);
        match LeadColumns::resolve(&header) {
            Err(LeadError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["industry", "CNAE", "DownloadCount"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn match_is_case_sensitive() {
        let header = row(&["role", "industry", "country", "CNAE", "DownloadCount"]);
        assert!(LeadColumns::resolve(&header).is_err());
    }

    #[test]
    fn first_duplicate_wins() {
        let header = row(&["Role", "Role"]);
        let binding = ColumnBinding::resolve(&header, &[ROLE]);
        assert_eq!(binding.index_of(ROLE), Some(0));
    }

    #[test]
    fn tolerant_binding_keeps_unresolved() {
        let header = row(&["Role", "country"]);
        let binding = ColumnBinding::resolve(&header, &FILTER_COLUMNS);
        assert_eq!(binding.index_of(ROLE), Some(0));
        assert_eq!(binding.index_of(COUNTRY), Some(1));
        assert_eq!(binding.index_of(INDUSTRY), None);
        assert_eq!(binding.missing(), vec![INDUSTRY, CNAE]);
    }
}
