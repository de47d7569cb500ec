//! Static table descriptors, one per table type

use crate::RenderError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a multi-valued cell is revealed when its row is expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    /// The full list is written into the cell
    Inline,
    /// The cell shows a summary and a button opening the detail overlay
    Modal,
}

/// Semantic kind of a collection column, used for summaries and grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Credentials,
    Permissions,
}

/// Table types known to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TableType {
    #[serde(rename = "caps")]
    Caps,
    #[serde(rename = "riskyApps")]
    RiskyApps,
    #[serde(rename = "riskyThirdPartySPs")]
    RiskyThirdPartySps,
}

impl TableType {
    pub const ALL: [TableType; 3] = [
        TableType::Caps,
        TableType::RiskyApps,
        TableType::RiskyThirdPartySps,
    ];

    /// Key used in input JSON, config and `data-table` attributes
    pub fn key(self) -> &'static str {
        match self {
            TableType::Caps => "caps",
            TableType::RiskyApps => "riskyApps",
            TableType::RiskyThirdPartySps => "riskyThirdPartySPs",
        }
    }

    pub fn descriptor(self) -> &'static TableDescriptor {
        match self {
            TableType::Caps => &CAPS,
            TableType::RiskyApps => &RISKY_APPS,
            TableType::RiskyThirdPartySps => &RISKY_THIRD_PARTY_SPS,
        }
    }
}

impl std::fmt::Display for TableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for TableType {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableType::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| RenderError::UnknownTableType(s.to_string()))
    }
}

/// One column of an expandable table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Field name in the row data, also the header label. Empty for the action column.
    pub name: &'static str,
    pub css_class: Option<&'static str>,
    pub collection: Option<CollectionKind>,
}

impl ColumnDescriptor {
    const fn plain(name: &'static str) -> Self {
        Self {
            name,
            css_class: None,
            collection: None,
        }
    }

    const fn classed(name: &'static str, css_class: &'static str) -> Self {
        Self {
            name,
            css_class: Some(css_class),
            collection: None,
        }
    }

    const fn collection(name: &'static str, kind: CollectionKind) -> Self {
        Self {
            name,
            css_class: None,
            collection: Some(kind),
        }
    }

    /// Name columns always render in full
    pub fn never_truncates(&self) -> bool {
        self.name == "Name" || self.name == "DisplayName"
    }

    /// Human-readable label used in detail overlay titles
    pub fn friendly_name(&self) -> &'static str {
        match self.name {
            "KeyCredentials" => "Key credentials",
            "PasswordCredentials" => "Password credentials",
            "FederatedCredentials" => "Federated credentials",
            other => other,
        }
    }
}

/// Static description of an expandable table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDescriptor {
    pub table: TableType,
    pub title: &'static str,
    pub section_id: &'static str,
    pub columns: &'static [ColumnDescriptor],
    pub presentation: PresentationMode,
}

const ACTION_COLUMN: ColumnDescriptor = ColumnDescriptor::plain("");

static CAPS: TableDescriptor = TableDescriptor {
    table: TableType::Caps,
    title: "Conditional Access Policies",
    section_id: "caps",
    columns: &[
        ACTION_COLUMN,
        ColumnDescriptor::plain("Name"),
        ColumnDescriptor::classed("State", "state"),
        ColumnDescriptor::classed("Users", "users"),
        ColumnDescriptor::classed("Apps/Actions", "apps_actions"),
        ColumnDescriptor::classed("Conditions", "conditions"),
        ColumnDescriptor::plain("Block/Grant Access"),
        ColumnDescriptor::plain("Session Controls"),
    ],
    presentation: PresentationMode::Inline,
};

static RISKY_APPS: TableDescriptor = TableDescriptor {
    table: TableType::RiskyApps,
    title: "Risky Applications",
    section_id: "risky-apps",
    columns: &[
        ACTION_COLUMN,
        ColumnDescriptor::plain("DisplayName"),
        ColumnDescriptor::plain("IsMultiTenantEnabled"),
        ColumnDescriptor::collection("KeyCredentials", CollectionKind::Credentials),
        ColumnDescriptor::collection("PasswordCredentials", CollectionKind::Credentials),
        ColumnDescriptor::collection("FederatedCredentials", CollectionKind::Credentials),
        ColumnDescriptor::collection("Permissions", CollectionKind::Permissions),
    ],
    presentation: PresentationMode::Modal,
};

static RISKY_THIRD_PARTY_SPS: TableDescriptor = TableDescriptor {
    table: TableType::RiskyThirdPartySps,
    title: "Risky Third-Party Service Principals",
    section_id: "risky-third-party-sps",
    columns: &[
        ACTION_COLUMN,
        ColumnDescriptor::plain("DisplayName"),
        ColumnDescriptor::collection("KeyCredentials", CollectionKind::Credentials),
        ColumnDescriptor::collection("PasswordCredentials", CollectionKind::Credentials),
        ColumnDescriptor::collection("FederatedCredentials", CollectionKind::Credentials),
        ColumnDescriptor::collection("Permissions", CollectionKind::Permissions),
    ],
    presentation: PresentationMode::Modal,
};
