//! JSON reporter for machine-readable output

use super::ReportSummary;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a summary as JSON
    pub fn report(&self, summary: &ReportSummary) -> String {
        if self.pretty {
            serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(summary).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::{ColumnSummary, TableSummary};
    use crate::summary::{CollectionSummary, CredentialSummary};
    use crate::table::TableType;
    use std::collections::BTreeMap;

    fn summary() -> ReportSummary {
        ReportSummary {
            tables: vec![TableSummary {
                table: TableType::RiskyThirdPartySps,
                title: "Risky Third-Party Service Principals".into(),
                rows: 2,
                columns: vec![ColumnSummary {
                    column: "KeyCredentials".into(),
                    summary: CollectionSummary::Credentials(CredentialSummary {
                        total: 3,
                        active: 1,
                        expired: 2,
                    }),
                }],
            }],
            results: BTreeMap::from([("fail".to_string(), 4)]),
            diagnostics: vec![],
        }
    }

    #[test]
    fn test_json_uses_input_keys_and_camel_case() {
        let json = JsonReporter::new().report(&summary());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tables"][0]["table"], "riskyThirdPartySPs");
        assert_eq!(value["tables"][0]["columns"][0]["summary"]["kind"], "credentials");
        assert_eq!(value["tables"][0]["columns"][0]["summary"]["expired"], 2);
        assert_eq!(value["results"]["fail"], 4);
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let json = JsonReporter::new().pretty().report(&summary());
        assert!(json.contains('\n'));
        assert!(json.contains("  \"tables\""));
    }
}
