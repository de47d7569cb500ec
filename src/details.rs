//! Detail overlay: key/value lists for multi-valued cells
//!
//! The overlay is a single host surface. Opening it while it is already open
//! replaces the content; closing it hands focus back to the control that opened it.

use crate::dates::format_dotnet_date;
use crate::dom::Element;
use crate::summary::{credential_state, CredentialState};
use crate::table::CollectionKind;
use crate::{value_to_display, CollectionItem};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Fields whose values are serialized .NET dates
const DATE_FIELDS: &[&str] = &["StartDateTime", "EndDateTime"];

/// One rendered list entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    /// `label: value` pairs in source order
    Fields(Vec<(String, String)>),
    Text(String),
}

impl ListEntry {
    pub fn from_item(item: &CollectionItem, date_format: &str) -> Self {
        match item {
            CollectionItem::Scalar(s) => ListEntry::Text(s.clone()),
            CollectionItem::Record(map) => ListEntry::Fields(
                map.iter()
                    .map(|(k, v)| (k.clone(), field_display(k, v, date_format)))
                    .collect(),
            ),
        }
    }

    /// `<li class="kv-item"><strong>Key:</strong> value<br>...</li>`
    pub fn to_element(&self) -> Element {
        let li = Element::new("li").class("kv-item");
        match self {
            ListEntry::Text(t) => li.text(t.clone()),
            ListEntry::Fields(fields) => {
                let mut li = li;
                for (idx, (key, value)) in fields.iter().enumerate() {
                    li = li
                        .child(Element::new("strong").text(format!("{}:", key)))
                        .text(format!(" {}", value));
                    if idx + 1 < fields.len() {
                        li = li.child(Element::new("br"));
                    }
                }
                li
            }
        }
    }
}

fn field_display(key: &str, value: &Value, date_format: &str) -> String {
    match value {
        Value::String(s) if DATE_FIELDS.contains(&key) => format_dotnet_date(s, date_format),
        other => value_to_display(other),
    }
}

/// Grouping applied to permission lists in the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupBy {
    #[default]
    None,
    RoleType,
    AdminConsent,
    Risk,
}

impl GroupBy {
    pub const ALL: [GroupBy; 4] = [
        GroupBy::None,
        GroupBy::RoleType,
        GroupBy::AdminConsent,
        GroupBy::Risk,
    ];

    /// Value used in the `<select>` control
    pub fn key(self) -> &'static str {
        match self {
            GroupBy::None => "none",
            GroupBy::RoleType => "RoleType",
            GroupBy::AdminConsent => "IsAdminConsented",
            GroupBy::Risk => "IsRisky",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupBy::None => "No grouping",
            GroupBy::RoleType => "Role type",
            GroupBy::AdminConsent => "Admin consent",
            GroupBy::Risk => "Risk",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        GroupBy::ALL.into_iter().find(|g| g.key() == key)
    }

    fn group_name(self, item: &CollectionItem) -> String {
        let record = match item.as_record() {
            Some(r) => r,
            None => return "Unknown".to_string(),
        };
        let flag = |field: &str, yes: &str, no: &str| match record.get(field).and_then(Value::as_bool) {
            Some(true) => yes.to_string(),
            Some(false) => no.to_string(),
            None => "Unknown".to_string(),
        };
        match self {
            GroupBy::None => "All".to_string(),
            GroupBy::AdminConsent => flag("IsAdminConsented", "Admin consented", "Not admin consented"),
            GroupBy::Risk => flag("IsRisky", "Risky", "Not risky"),
            GroupBy::RoleType => match record.get("RoleType") {
                None | Some(Value::Null) => "Unknown".to_string(),
                Some(Value::String(s)) if s.is_empty() => "Unknown".to_string(),
                Some(v) => value_to_display(v),
            },
        }
    }
}

/// User-controlled view state of the overlay list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailView {
    pub search: String,
    pub group_by: GroupBy,
}

/// A titled group of items in the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct DetailGroup {
    pub title: String,
    pub items: Vec<CollectionItem>,
}

/// Separates values in the `data-search` attribute. Search terms are single-line.
pub const SEARCH_SEPARATOR: &str = "\n";

/// Lowercased values an item is searched by. Field labels are not searchable.
pub fn search_values(item: &CollectionItem) -> Vec<String> {
    match item {
        CollectionItem::Scalar(s) => vec![s.to_lowercase()],
        CollectionItem::Record(map) => map
            .values()
            .map(|v| value_to_display(v).to_lowercase())
            .collect(),
    }
}

/// Case-insensitive match against every field value
pub fn matches_search(item: &CollectionItem, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    search_values(item).iter().any(|v| v.contains(&needle))
}

/// Filter and group items for display
pub fn group_items(
    kind: Option<CollectionKind>,
    items: &[CollectionItem],
    view: &DetailView,
    now: DateTime<Utc>,
) -> Vec<DetailGroup> {
    let filtered: Vec<&CollectionItem> = items
        .iter()
        .filter(|i| matches_search(i, &view.search))
        .collect();

    match kind {
        Some(CollectionKind::Credentials) => {
            let state_of = |item: &CollectionItem| {
                item.as_record()
                    .map(|r| credential_state(r, now))
                    .unwrap_or(CredentialState::Unknown)
            };
            let mut groups = Vec::new();
            for state in [
                CredentialState::Active,
                CredentialState::Expired,
                CredentialState::Inactive,
                CredentialState::Unknown,
            ] {
                let members: Vec<CollectionItem> = filtered
                    .iter()
                    .filter(|i| state_of(**i) == state)
                    .map(|i| (*i).clone())
                    .collect();
                let always_shown = matches!(state, CredentialState::Active | CredentialState::Expired);
                if always_shown || !members.is_empty() {
                    groups.push(DetailGroup {
                        title: state.label().to_string(),
                        items: members,
                    });
                }
            }
            groups
        }
        Some(CollectionKind::Permissions) if view.group_by != GroupBy::None => {
            let mut groups: Vec<DetailGroup> = Vec::new();
            for item in filtered {
                let name = view.group_by.group_name(item);
                match groups.iter_mut().find(|g| g.title == name) {
                    Some(group) => group.items.push(item.clone()),
                    None => groups.push(DetailGroup {
                        title: name,
                        items: vec![item.clone()],
                    }),
                }
            }
            groups
        }
        _ => vec![DetailGroup {
            title: "All".to_string(),
            items: filtered.into_iter().cloned().collect(),
        }],
    }
}

/// `<section class="kv-group"><h4>Title (n)</h4><ul>...</ul></section>` per group
pub fn render_groups(groups: &[DetailGroup], date_format: &str) -> Element {
    Element::new("div").class("kv-results").children(groups.iter().map(|g| {
        Element::new("section")
            .class("kv-group")
            .attr("data-title", g.title.clone())
            .child(Element::new("h4").text(format!("{} ({})", g.title, g.items.len())))
            .child(
                Element::new("ul").children(
                    g.items
                        .iter()
                        .map(|i| {
                            let values = search_values(i);
                            ListEntry::from_item(i, date_format)
                                .to_element()
                                .attr("data-search", values.join(SEARCH_SEPARATOR))
                        }),
                ),
            )
    }))
}

/// Search box and, for permissions, the group-by select
pub fn render_controls(kind: Option<CollectionKind>, view: &DetailView) -> Element {
    let mut controls = Element::new("div").class("kv-controls").child(
        Element::new("input")
            .attr("type", "search")
            .attr("id", "modal-search")
            .attr("placeholder", "Search...")
            .attr("value", view.search.clone()),
    );
    if kind == Some(CollectionKind::Permissions) {
        controls = controls
            .child(
                Element::new("label")
                    .attr("for", "modal-group-by")
                    .text(" Group by"),
            )
            .child(Element::new("select").attr("id", "modal-group-by").children(
                GroupBy::ALL.into_iter().map(|g| {
                    let option = Element::new("option").attr("value", g.key()).text(g.label());
                    if g == view.group_by {
                        option.attr("selected", "selected")
                    } else {
                        option
                    }
                }),
            ));
    }
    controls
}

/// Overlay host: dialog, title, content and close control
#[derive(Debug, Clone, Default)]
pub struct DetailOverlay {
    content: Option<OverlayContent>,
}

/// What the overlay currently shows
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayContent {
    pub title: String,
    pub kind: Option<CollectionKind>,
    pub items: Vec<CollectionItem>,
    pub view: DetailView,
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&OverlayContent> {
        self.content.as_ref()
    }

    /// Show the overlay, replacing whatever it currently holds
    pub fn open(&mut self, title: &str, kind: Option<CollectionKind>, items: Vec<CollectionItem>) {
        let title = if title.is_empty() { "Details" } else { title };
        self.content = Some(OverlayContent {
            title: title.to_string(),
            kind,
            items,
            view: DetailView::default(),
        });
    }

    /// Returns false when nothing was open
    pub fn close(&mut self) -> bool {
        self.content.take().is_some()
    }

    /// Mutable view state of the open overlay
    pub fn view_mut(&mut self) -> Option<&mut DetailView> {
        self.content.as_mut().map(|c| &mut c.view)
    }

    /// Render the dialog. A closed overlay renders as an empty dialog without `open`.
    pub fn render(&self, now: DateTime<Utc>, date_format: &str) -> Element {
        let mut dialog = Element::new("dialog")
            .attr("id", "details-dialog")
            .attr("aria-labelledby", "details-title");
        let mut title = Element::new("h2").attr("id", "details-title");
        let mut content = Element::new("div").attr("id", "details-content");

        if let Some(c) = &self.content {
            dialog = dialog.attr("open", "open");
            title = title.text(c.title.clone());
            content = content
                .child(
                    Element::new("div")
                        .class("kv-advanced")
                        .child(render_controls(c.kind, &c.view))
                        .child(render_groups(
                            &group_items(c.kind, &c.items, &c.view, now),
                            date_format,
                        )),
                );
        }

        dialog
            .child(
                Element::new("div")
                    .class("details-header")
                    .child(title)
                    .child(
                        Element::new("button")
                            .attr("type", "button")
                            .attr("id", "details-close")
                            .attr("data-action", "close-details")
                            .text("Close"),
                    ),
            )
            .child(content)
    }
}
