//! Control result classification
//!
//! Each row of a control results table gets a `data-state` attribute that the
//! stylesheet uses for row coloring.

use crate::dom::Element;
use crate::input::lenient_text;
use serde::{Deserialize, Serialize};

/// One control result as it appears in the report input. Non-string values
/// are read as their display text, `null` as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRow {
    #[serde(default, alias = "Control ID", deserialize_with = "lenient_text")]
    pub control_id: String,
    #[serde(default, alias = "Requirement", deserialize_with = "lenient_text")]
    pub requirement: String,
    #[serde(default, alias = "Result", deserialize_with = "lenient_text")]
    pub result: String,
    #[serde(default, alias = "Criticality", deserialize_with = "lenient_text")]
    pub criticality: String,
    #[serde(default, alias = "Details", deserialize_with = "lenient_text")]
    pub details: String,
}

/// Visual state of a control result row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultState {
    Deleted,
    Bug,
    Fail,
    Warning,
    Pass,
    Omitted,
    NotApplicable,
    IncorrectShall,
    IncorrectShould,
    NotImplemented,
    ThirdParty,
    Error,
}

impl ResultState {
    /// Value of the `data-state` attribute
    pub fn data_state(self) -> &'static str {
        match self {
            ResultState::Deleted => "deleted",
            ResultState::Bug => "bug",
            ResultState::Fail => "fail",
            ResultState::Warning => "warning",
            ResultState::Pass => "pass",
            ResultState::Omitted => "omitted",
            ResultState::NotApplicable => "notapplicable",
            ResultState::IncorrectShall => "incorrect-shall",
            ResultState::IncorrectShould => "incorrect-should",
            ResultState::NotImplemented => "notimplemented",
            ResultState::ThirdParty => "thirdparty",
            ResultState::Error => "error",
        }
    }
}

impl std::fmt::Display for ResultState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data_state())
    }
}

/// Classify a control row. The first matching rule wins.
pub fn classify(row: &ControlRow) -> Option<ResultState> {
    let result = row.result.as_str();
    let criticality = row.criticality.as_str();

    if row.requirement.starts_with("[DELETED]") {
        return Some(ResultState::Deleted);
    }
    if result.starts_with("Bug") {
        return Some(ResultState::Bug);
    }
    let exact = match result {
        "Fail" => Some(ResultState::Fail),
        "Warning" => Some(ResultState::Warning),
        "Pass" => Some(ResultState::Pass),
        "Omitted" => Some(ResultState::Omitted),
        "N/A" => Some(ResultState::NotApplicable),
        "Incorrect result" => {
            return match criticality {
                "Shall" => Some(ResultState::IncorrectShall),
                "Should" => Some(ResultState::IncorrectShould),
                other => {
                    log::warn!("Unexpected criticality for incorrect result: {}", other);
                    None
                }
            }
        }
        _ => None,
    };
    if exact.is_some() {
        return exact;
    }
    if criticality.contains("Not-Implemented") {
        return Some(ResultState::NotImplemented);
    }
    if criticality.contains("3rd Party") {
        return Some(ResultState::ThirdParty);
    }
    if result.contains("Error") {
        return Some(ResultState::Error);
    }
    None
}

/// `<table class="policy-data">` with one classified row per control
pub fn render_control_table(rows: &[ControlRow]) -> Element {
    let header = Element::new("tr").children(
        ["Control ID", "Requirement", "Result", "Criticality", "Details"]
            .into_iter()
            .map(|h| Element::new("th").attr("scope", "col").text(h)),
    );

    let body = rows.iter().map(|row| {
        let tr = Element::new("tr").children(
            [
                &row.control_id,
                &row.requirement,
                &row.result,
                &row.criticality,
                &row.details,
            ]
            .into_iter()
            .map(|v| Element::new("td").text(v.clone())),
        );
        match classify(row) {
            Some(state) => tr.attr("data-state", state.data_state()),
            None => tr,
        }
    });

    Element::new("table")
        .class("policy-data")
        .child(Element::new("thead").child(header))
        .child(Element::new("tbody").children(body))
}
