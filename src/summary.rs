//! Numeric summaries for credential and permission collections

use crate::dates::parse_date_value;
use crate::table::CollectionKind;
use crate::{CollectionItem, Record};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Lifecycle state of a single credential relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CredentialState {
    Active,
    Expired,
    /// Start date is still in the future
    Inactive,
    /// Dates are missing or unparseable
    Unknown,
}

impl CredentialState {
    pub fn label(self) -> &'static str {
        match self {
            CredentialState::Active => "Active",
            CredentialState::Expired => "Expired",
            CredentialState::Inactive => "Inactive",
            CredentialState::Unknown => "Unknown",
        }
    }
}

/// Classify a credential record by its `StartDateTime` / `EndDateTime`
pub fn credential_state(record: &Record, now: DateTime<Utc>) -> CredentialState {
    let start = record.get("StartDateTime").and_then(parse_date_value);
    let end = record.get("EndDateTime").and_then(parse_date_value);

    match (start, end) {
        (_, Some(end)) if now >= end => CredentialState::Expired,
        (Some(start), Some(_)) if now < start => CredentialState::Inactive,
        (Some(_), Some(_)) => CredentialState::Active,
        _ => CredentialState::Unknown,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSummary {
    pub total: usize,
    pub application: usize,
    pub delegated: usize,
    pub admin_consented: usize,
    pub not_admin_consented: usize,
    pub risky: usize,
}

/// Summary shown in an expanded modal-mode cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CollectionSummary {
    Credentials(CredentialSummary),
    Permissions(PermissionSummary),
    /// Column without a known semantic kind
    Count { total: usize },
}

impl CollectionSummary {
    pub fn total(&self) -> usize {
        match self {
            CollectionSummary::Credentials(s) => s.total,
            CollectionSummary::Permissions(s) => s.total,
            CollectionSummary::Count { total } => *total,
        }
    }

    /// Label/count pairs in display order
    pub fn lines(&self) -> Vec<(&'static str, usize)> {
        match self {
            CollectionSummary::Credentials(s) => vec![
                ("Total", s.total),
                ("Active", s.active),
                ("Expired", s.expired),
            ],
            CollectionSummary::Permissions(s) => vec![
                ("Total", s.total),
                ("Application", s.application),
                ("Delegated", s.delegated),
                ("Admin consented", s.admin_consented),
                ("Not admin consented", s.not_admin_consented),
                ("Risky", s.risky),
            ],
            CollectionSummary::Count { total } => vec![("Total", *total)],
        }
    }
}

pub fn summarize_credentials(items: &[CollectionItem], now: DateTime<Utc>) -> CredentialSummary {
    let mut summary = CredentialSummary {
        total: items.len(),
        ..Default::default()
    };
    for record in items.iter().filter_map(CollectionItem::as_record) {
        match credential_state(record, now) {
            CredentialState::Active => summary.active += 1,
            CredentialState::Expired => summary.expired += 1,
            CredentialState::Inactive | CredentialState::Unknown => {}
        }
    }
    summary
}

pub fn summarize_permissions(items: &[CollectionItem]) -> PermissionSummary {
    let mut summary = PermissionSummary {
        total: items.len(),
        ..Default::default()
    };
    for record in items.iter().filter_map(CollectionItem::as_record) {
        match record.get("RoleType").and_then(Value::as_str) {
            Some("Application") => summary.application += 1,
            Some("Delegated") => summary.delegated += 1,
            _ => {}
        }
        match record.get("IsAdminConsented").and_then(Value::as_bool) {
            Some(true) => summary.admin_consented += 1,
            Some(false) => summary.not_admin_consented += 1,
            None => {}
        }
        if record.get("IsRisky").and_then(Value::as_bool) == Some(true) {
            summary.risky += 1;
        }
    }
    summary
}

/// Summarize a collection according to its column kind
pub fn summarize(
    kind: Option<CollectionKind>,
    items: &[CollectionItem],
    now: DateTime<Utc>,
) -> CollectionSummary {
    match kind {
        Some(CollectionKind::Credentials) => {
            CollectionSummary::Credentials(summarize_credentials(items, now))
        }
        Some(CollectionKind::Permissions) => {
            CollectionSummary::Permissions(summarize_permissions(items))
        }
        None => CollectionSummary::Count { total: items.len() },
    }
}
