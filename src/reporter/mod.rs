//! Reporter module for output formatting

pub mod console;
pub mod html;
pub mod json;

pub use console::ConsoleReporter;
pub use html::HtmlReporter;
pub use json::JsonReporter;

use crate::classify::classify;
use crate::page::ReportPage;
use crate::summary::{summarize, CollectionSummary};
use crate::table::{SectionBody, TableType};
use crate::{CellValue, CollectionItem};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated view of a rendered report, shared by the text and JSON reporters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub tables: Vec<TableSummary>,
    /// Control results per `data-state`, plus `unclassified`
    pub results: BTreeMap<String, usize>,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub table: TableType,
    pub title: String,
    pub rows: usize,
    /// Collection columns summarized over every row of the table
    pub columns: Vec<ColumnSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    pub column: String,
    pub summary: CollectionSummary,
}

impl ReportSummary {
    pub fn from_page(page: &ReportPage) -> Self {
        let now = page.ctx().now;
        let tables = page
            .sections()
            .iter()
            .map(|section| {
                let rows = page.dataset(section.table()).unwrap_or(&[]);
                let columns = section
                    .descriptor
                    .columns
                    .iter()
                    .filter(|col| col.collection.is_some())
                    .map(|col| {
                        let items: Vec<CollectionItem> = rows
                            .iter()
                            .flat_map(|row| match row.get(col.name) {
                                CellValue::Collection(items) => items.clone(),
                                _ => Vec::new(),
                            })
                            .collect();
                        ColumnSummary {
                            column: col.name.to_string(),
                            summary: summarize(col.collection, &items, now),
                        }
                    })
                    .collect();
                TableSummary {
                    table: section.table(),
                    title: section.title.clone(),
                    rows: match &section.body {
                        SectionBody::NoData => 0,
                        SectionBody::Rows { view, .. } => view.len(),
                    },
                    columns,
                }
            })
            .collect();

        let mut results = BTreeMap::new();
        for control in page.controls() {
            let key = classify(control)
                .map(|s| s.data_state().to_string())
                .unwrap_or_else(|| "unclassified".to_string());
            *results.entry(key).or_insert(0) += 1;
        }

        Self {
            tables,
            results,
            diagnostics: page
                .diagnostics()
                .entries()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ReportInput;
    use crate::page::PageOptions;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_summary_aggregates_collection_columns() {
        let input = ReportInput::from_json_str(
            r#"{
                "riskyApps": [
                    {"DisplayName": "A", "Permissions": [{"RoleType": "Application", "IsRisky": true}]},
                    {"DisplayName": "B", "Permissions": [{"RoleType": "Delegated", "IsRisky": false}], "KeyCredentials": null},
                    "broken"
                ],
                "controls": [
                    {"Requirement": "r", "Result": "Pass", "Criticality": "Shall"},
                    {"Requirement": "r", "Result": "Pass", "Criticality": "Shall"},
                    {"Requirement": "r", "Result": "???", "Criticality": "Shall"}
                ]
            }"#,
        )
        .unwrap();
        let page = ReportPage::from_input(
            &input,
            &PageOptions::new(Utc.timestamp_millis_opt(0).unwrap()),
        );
        let summary = ReportSummary::from_page(&page);

        assert_eq!(summary.tables.len(), 1);
        let apps = &summary.tables[0];
        assert_eq!(apps.rows, 3);
        assert_eq!(apps.columns.len(), 4);
        let permissions = apps.columns.iter().find(|c| c.column == "Permissions").unwrap();
        assert_eq!(permissions.summary.total(), 2);

        assert_eq!(summary.results["pass"], 2);
        assert_eq!(summary.results["unclassified"], 1);
        assert_eq!(summary.diagnostics.len(), 1);
    }
}
