//! Report input document
//!
//! The report generator writes one JSON document per report. Every section is
//! read as raw JSON and converted leniently: a table dataset may be missing or
//! `null` (the table does not apply), a section of the wrong shape is reported
//! and skipped, and a row that is not an object still occupies its position
//! but renders as empty. Only a document that is not JSON at all is an error.

use crate::classify::ControlRow;
use crate::table::TableType;
use crate::{value_to_display, Diagnostics, RenderError, Row};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// One DNS query log shown under the SPF/DMARC controls
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DnsLog {
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub title: Option<String>,
    /// Header labels, rendered above the rows
    #[serde(default, deserialize_with = "lenient_texts")]
    pub columns: Vec<String>,
    #[serde(default, deserialize_with = "lenient_rows")]
    pub rows: Vec<Value>,
}

impl DnsLog {
    /// Rows as display cells. Arrays become one cell per element, objects one per value.
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| match row {
                Value::Array(values) => values.iter().map(value_to_display).collect(),
                Value::Object(map) => map.values().map(value_to_display).collect(),
                other => vec![value_to_display(other)],
            })
            .collect()
    }
}

/// Parsed report input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    #[serde(default)]
    pub caps: Option<Value>,
    #[serde(default)]
    pub risky_apps: Option<Value>,
    #[serde(default, rename = "riskyThirdPartySPs")]
    pub risky_third_party_sps: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub dark_mode: Option<bool>,
    #[serde(default)]
    pub controls: Option<Value>,
    #[serde(default)]
    pub spf_domains: Option<Value>,
    #[serde(default)]
    pub dns_logs: Option<Value>,
}

/// Text form of any JSON value: strings as-is, `null` as empty
fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => value_to_display(other),
    }
}

/// Accepts any JSON value for a text field
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_of(&Value::deserialize(deserializer)?))
}

fn lenient_opt_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(text_of(&Value::deserialize(deserializer)?)).filter(|s| !s.is_empty()))
}

/// A list of labels; a lone value is a one-element list
fn lenient_texts<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(values) => values.iter().map(text_of).collect(),
        other => vec![text_of(&other)],
    })
}

fn lenient_rows<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(values) => values,
        other => vec![other],
    })
}

/// `true`/`false` as booleans or as the strings the report generator writes.
/// Anything else leaves the default in place.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(s) => Some(s.eq_ignore_ascii_case("true")),
        _ => None,
    })
}

/// The array inside an optional section. `null` and absent are `None` without a
/// report; any other non-array is reported and also `None`.
fn section_array<'a>(
    section: &str,
    value: Option<&'a Value>,
    diagnostics: &mut Diagnostics,
) -> Option<&'a [Value]> {
    match value? {
        Value::Null => None,
        Value::Array(values) => Some(values.as_slice()),
        other => {
            diagnostics.report(RenderError::MalformedSection {
                section: section.to_string(),
                reason: format!("expected an array, found {}", json_kind(other)),
            });
            None
        }
    }
}

impl ReportInput {
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse report input JSON")
    }

    fn raw_dataset(&self, table: TableType) -> Option<&Value> {
        match table {
            TableType::Caps => self.caps.as_ref(),
            TableType::RiskyApps => self.risky_apps.as_ref(),
            TableType::RiskyThirdPartySps => self.risky_third_party_sps.as_ref(),
        }
    }

    /// Raw dataset for a table, `None` when the table does not apply or is not an array
    pub fn dataset(&self, table: TableType) -> Option<&[Value]> {
        self.raw_dataset(table)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// Converted rows for every table present in the input. A dataset that is
    /// not an array is reported and only that table is skipped.
    pub fn datasets(&self, diagnostics: &mut Diagnostics) -> BTreeMap<TableType, Vec<Row>> {
        TableType::ALL
            .into_iter()
            .filter_map(|table| {
                section_array(table.key(), self.raw_dataset(table), diagnostics)
                    .map(|values| (table, rows_from_json(table, values, diagnostics)))
            })
            .collect()
    }

    /// Control result rows. Field values of any type are read as text;
    /// entries that are not objects are reported and skipped.
    pub fn controls(&self, diagnostics: &mut Diagnostics) -> Vec<ControlRow> {
        let values = section_array("controls", self.controls.as_ref(), diagnostics).unwrap_or(&[]);
        values
            .iter()
            .enumerate()
            .filter_map(|(idx, value)| {
                let parsed = match value {
                    Value::Object(_) => ControlRow::deserialize(value).map_err(|e| e.to_string()),
                    other => Err(format!("expected an object, found {}", json_kind(other))),
                };
                parsed
                    .map_err(|reason| {
                        diagnostics.report(RenderError::MalformedRow {
                            table: "controls".to_string(),
                            row: idx,
                            reason,
                        })
                    })
                    .ok()
            })
            .collect()
    }

    /// SPF domain names, non-string entries in their display form
    pub fn spf_domains(&self, diagnostics: &mut Diagnostics) -> Option<Vec<String>> {
        section_array("spfDomains", self.spf_domains.as_ref(), diagnostics)
            .map(|values| values.iter().map(value_to_display).collect())
    }

    /// DNS query logs; entries that are not objects are reported and skipped
    pub fn dns_logs(&self, diagnostics: &mut Diagnostics) -> Vec<DnsLog> {
        let values = section_array("dnsLogs", self.dns_logs.as_ref(), diagnostics).unwrap_or(&[]);
        values
            .iter()
            .enumerate()
            .filter_map(|(idx, value)| {
                let parsed = match value {
                    Value::Object(_) => DnsLog::deserialize(value).map_err(|e| e.to_string()),
                    other => Err(format!("expected an object, found {}", json_kind(other))),
                };
                parsed
                    .map_err(|reason| {
                        diagnostics.report(RenderError::MalformedRow {
                            table: "dnsLogs".to_string(),
                            row: idx,
                            reason,
                        })
                    })
                    .ok()
            })
            .collect()
    }
}

/// Convert raw rows, keeping positions stable for malformed entries
pub fn rows_from_json(table: TableType, values: &[Value], diagnostics: &mut Diagnostics) -> Vec<Row> {
    values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            Row::from_json(value.clone()).unwrap_or_else(|| {
                diagnostics.report(RenderError::MalformedRow {
                    table: table.key().to_string(),
                    row: idx,
                    reason: format!("expected an object, found {}", json_kind(value)),
                });
                Row::new()
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read and parse an input file
pub fn load_input(path: &Path) -> Result<ReportInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    ReportInput::from_json_str(&content)
        .with_context(|| format!("Invalid report input: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_absent_and_null_datasets_do_not_apply() {
        let input = ReportInput::from_json_str(r#"{"caps": null}"#).unwrap();
        assert!(input.dataset(TableType::Caps).is_none());
        assert!(input.dataset(TableType::RiskyApps).is_none());
        let mut diag = Diagnostics::new();
        assert!(input.datasets(&mut diag).is_empty());
    }

    #[test]
    fn test_empty_dataset_is_present() {
        let input = ReportInput::from_json_str(r#"{"riskyApps": []}"#).unwrap();
        let mut diag = Diagnostics::new();
        let sets = input.datasets(&mut diag);
        assert_eq!(sets.get(&TableType::RiskyApps).map(Vec::len), Some(0));
    }

    #[test]
    fn test_dark_mode_accepts_bool_and_string() {
        for (doc, expected) in [
            (r#"{"darkMode": true}"#, Some(true)),
            (r#"{"darkMode": "true"}"#, Some(true)),
            (r#"{"darkMode": "false"}"#, Some(false)),
            (r#"{"darkMode": null}"#, None),
            (r#"{}"#, None),
        ] {
            assert_eq!(ReportInput::from_json_str(doc).unwrap().dark_mode, expected, "{}", doc);
        }
    }

    #[test]
    fn test_malformed_rows_keep_their_position() {
        let input = ReportInput::from_json_str(
            r#"{"caps": [{"Name": "A"}, "oops", {"Name": "C"}]}"#,
        )
        .unwrap();
        let mut diag = Diagnostics::new();
        let sets = input.datasets(&mut diag);
        let rows = &sets[&TableType::Caps];
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], Row::new());
        assert_eq!(rows[2].scalar("Name"), Some("C"));
        assert_eq!(diag.len(), 1);
        assert!(diag.entries()[0].to_string().contains("found a string"));
    }

    #[test]
    fn test_dns_log_cells() {
        let log: DnsLog = serde_json::from_str(
            r#"{"title": "SPF", "rows": [["example.com", 1], {"q": "x", "r": null}, "plain"]}"#,
        )
        .unwrap();
        assert_eq!(
            log.cells(),
            vec![
                vec!["example.com".to_string(), "1".to_string()],
                vec!["x".to_string(), "null".to_string()],
                vec!["plain".to_string()],
            ]
        );
    }

    #[test]
    fn test_load_input_reports_path_on_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_input(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid report input"));

        let missing = load_input(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(missing.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_null_control_fields_do_not_discard_the_report() {
        let input = ReportInput::from_json_str(
            r#"{
                "caps": [{"Name": "A"}],
                "controls": [
                    {"Control ID": "MS.AAD.1.1v1", "Requirement": "r", "Result": "Pass", "Criticality": "Shall", "Details": null},
                    "not a row",
                    {"Control ID": "MS.AAD.2.1v1", "Requirement": "r", "Result": 3, "Criticality": "Shall"}
                ]
            }"#,
        )
        .unwrap();
        let mut diag = Diagnostics::new();
        let controls = input.controls(&mut diag);
        assert_eq!(controls.len(), 2);
        assert_eq!(controls[0].details, "");
        assert_eq!(controls[1].result, "3");
        assert_eq!(diag.len(), 1);
        assert!(diag.entries()[0].to_string().contains("Malformed row 1 in controls"));
        assert_eq!(input.datasets(&mut diag)[&TableType::Caps].len(), 1);
    }

    #[test]
    fn test_non_string_spf_domains_are_stringified() {
        let input = ReportInput::from_json_str(r#"{"spfDomains": ["a.example.com", 7, null]}"#).unwrap();
        let mut diag = Diagnostics::new();
        assert_eq!(
            input.spf_domains(&mut diag),
            Some(vec!["a.example.com".to_string(), "7".to_string(), "null".to_string()])
        );
        assert!(diag.is_empty());
    }

    #[test]
    fn test_non_array_dataset_skips_only_that_table() {
        let input = ReportInput::from_json_str(
            r#"{
                "caps": {"Name": "not a list"},
                "riskyApps": [{"DisplayName": "Contoso"}],
                "spfDomains": "example.com"
            }"#,
        )
        .unwrap();
        let mut diag = Diagnostics::new();
        let sets = input.datasets(&mut diag);
        assert!(!sets.contains_key(&TableType::Caps));
        assert_eq!(sets[&TableType::RiskyApps].len(), 1);
        assert!(input.spf_domains(&mut diag).is_none());

        let messages: Vec<String> = diag.entries().iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Malformed caps in report input: expected an array, found an object",
                "Malformed spfDomains in report input: expected an array, found a string",
            ]
        );
    }

    #[test]
    fn test_malformed_dns_logs_are_skipped() {
        let input = ReportInput::from_json_str(
            r#"{"dnsLogs": [{"title": 5, "columns": ["Query", "Response"], "rows": "single"}, 42], "darkMode": 1}"#,
        )
        .unwrap();
        assert_eq!(input.dark_mode, None);
        let mut diag = Diagnostics::new();
        let logs = input.dns_logs(&mut diag);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].title.as_deref(), Some("5"));
        assert_eq!(logs[0].columns, vec!["Query", "Response"]);
        assert_eq!(logs[0].cells(), vec![vec!["single".to_string()]]);
        assert_eq!(diag.len(), 1);
        assert!(diag.entries()[0].to_string().contains("found a number"));
    }
}
