// src/leads/filter.rs

use serde::{Deserialize, Serialize};

use super::{cell, LeadColumns, Row, Table};

/// Optional per-column equality constraints, as posted by the client.
///
/// Field names on the wire are `Role`, `Industry`, `Country`, `CNAE`.
/// A missing or empty value places no constraint on its column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(rename = "Role", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "Industry", default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(rename = "Country", default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "CNAE", default, skip_serializing_if = "Option::is_none")]
    pub cnae: Option<String>,
}

impl FilterCriteria {
    /// `(column, value)` for each criterion that actually constrains.
    fn active(&self, cols: &LeadColumns) -> Vec<(usize, &str)> {
        [
            (cols.role, &self.role),
            (cols.industry, &self.industry),
            (cols.country, &self.country),
            (cols.cnae, &self.cnae),
        ]
        .into_iter()
        .filter_map(|(idx, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((idx, v)),
            _ => None,
        })
        .collect()
    }

    /// Exact, case-sensitive match on every active criterion. A row too short
    /// to reach a constrained column never matches it.
    pub fn matches(&self, row: &Row, cols: &LeadColumns) -> bool {
        self.active(cols)
            .iter()
            .all(|&(idx, want)| cell(row, idx) == Some(want))
    }
}

/// Header plus every data row satisfying `criteria`, original order kept.
pub fn filter_rows(table: &Table, cols: &LeadColumns, criteria: &FilterCriteria) -> Table {
    let rows = table
        .rows
        .iter()
        .filter(|row| criteria.matches(row, cols))
        .cloned()
        .collect();

    Table {
        header: table.header.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::fixtures::{row, sample_rows};

    fn sample() -> (Table, LeadColumns) {
        let table = Table::from_rows(sample_rows()).unwrap();
        let cols = LeadColumns::resolve(&table.header).unwrap();
        (table, cols)
    }

    fn criteria(role: Option<&str>, industry: Option<&str>) -> FilterCriteria {
        FilterCriteria {
            role: role.map(String::from),
            industry: industry.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn empty_criteria_keep_everything_in_order() {
        let (table, cols) = sample();
        let out = filter_rows(&table, &cols, &FilterCriteria::default());
        assert_eq!(out, table);
    }

    #[test]
    fn empty_strings_do_not_constrain() {
        let (table, cols) = sample();
        let c = FilterCriteria {
            role: Some(String::new()),
            industry: Some(String::new()),
            country: Some(String::new()),
            cnae: Some(String::new()),
        };
        assert_eq!(filter_rows(&table, &cols, &c).rows.len(), 2);
    }

    #[test]
    fn single_criterion() {
        let (table, cols) = sample();
        let out = filter_rows(&table, &cols, &criteria(Some("CEO"), None));
        assert_eq!(out.header, table.header);
        assert_eq!(out.rows, vec![row(&["CEO", "Tech", "US", "6201", "0"])]);
    }

    #[test]
    fn criteria_are_conjunctive() {
        let (table, cols) = sample();
        assert_eq!(
            filter_rows(&table, &cols, &criteria(Some("CTO"), Some("Tech")))
                .rows
                .len(),
            1
        );
        assert!(filter_rows(&table, &cols, &criteria(Some("CTO"), Some("Retail")))
            .is_empty());
    }

    #[test]
    fn no_trimming_or_case_folding() {
        let (table, cols) = sample();
        assert!(filter_rows(&table, &cols, &criteria(Some("ceo"), None)).is_empty());
        assert!(filter_rows(&table, &cols, &criteria(Some(" CEO"), None)).is_empty());
    }

    #[test]
    fn short_rows_fail_active_criteria_only() {
        let (mut table, cols) = sample();
        table.rows.push(row(&["CFO"]));

        let by_country = FilterCriteria {
            country: Some("US".into()),
            ..Default::default()
        };
        let out = filter_rows(&table, &cols, &by_country);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0][0], "CEO");

        let by_role = filter_rows(&table, &cols, &criteria(Some("CFO"), None));
        assert_eq!(by_role.rows, vec![row(&["CFO"])]);
    }

    #[test]
    fn inclusion_matches_hand_checked_rows() {
        let (mut table, cols) = sample();
        table.rows.push(row(&["CEO", "Retail", "US", "4711", ""]));
        table.rows.push(row(&["CEO", "Tech", "ES", "6201", "7"]));

        let cases: Vec<(FilterCriteria, Vec<&str>)> = vec![
            (criteria(Some("CEO"), None), vec!["6201", "4711", "6201"]),
            (criteria(None, Some("Tech")), vec!["6201", "6202", "6201"]),
            (criteria(Some("CEO"), Some("Tech")), vec!["6201", "6201"]),
            (
                FilterCriteria {
                    country: Some("US".into()),
                    cnae: Some("6201".into()),
                    ..Default::default()
                },
                vec!["6201"],
            ),
        ];

        for (c, want_cnaes) in cases {
            let out = filter_rows(&table, &cols, &c);
            let got: Vec<&str> = out.rows.iter().map(|r| r[cols.cnae].as_str()).collect();
            assert_eq!(got, want_cnaes, "criteria {:?}", c);
        }
    }

    #[test]
    fn deserializes_wire_names() {
        let c: FilterCriteria =
            serde_json::from_str(r#"{"Role":"CEO","CNAE":"6201"}"#).unwrap();
        assert_eq!(c.role.as_deref(), Some("CEO"));
        assert_eq!(c.cnae.as_deref(), Some("6201"));
        assert!(c.industry.is_none());
        assert!(c.country.is_none());
    }

    #[test]
    fn serializes_only_set_fields() {
        let json = serde_json::to_value(criteria(Some("CEO"), None)).unwrap();
        assert_eq!(json, serde_json::json!({"Role": "CEO"}));
    }
}
