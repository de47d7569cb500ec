//! Collapsed and expanded cell rendering

use super::descriptor::{ColumnDescriptor, PresentationMode, TableDescriptor, TableType};
use super::RenderContext;
use crate::details::ListEntry;
use crate::dom::Element;
use crate::summary::{summarize, CollectionSummary};
use crate::{CellValue, CollectionItem, Row};

const NONE_TEXT: &str = "None";

/// Rendered content of one cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// Expand/collapse control in the action column
    Control { expanded: bool },
    /// Complete value, no affordance
    Text(String),
    /// Cut-off text followed by the "..." affordance
    Truncated { preview: String },
    /// "Total: N" followed by the "..." affordance
    Count { total: usize },
    /// Every element written into the cell
    List(Vec<ListEntry>),
    /// Summary plus a button that opens the detail overlay
    Details {
        summary: CollectionSummary,
        label: String,
    },
}

impl CellContent {
    /// Whether the cell carries the row-expansion affordance
    pub fn has_affordance(&self) -> bool {
        matches!(self, CellContent::Truncated { .. } | CellContent::Count { .. })
    }

    /// Build the `<td>` for this content at the given position
    pub fn to_element(&self, table: TableType, row: usize, col: usize) -> Element {
        let td = Element::new("td");
        match self {
            CellContent::Control { expanded } => td
                .attr("scope", "row")
                .child(chevron_button(table, row, *expanded)),
            CellContent::Text(text) => td.text(text.clone()),
            CellContent::Truncated { preview } => td
                .text(preview.clone())
                .child(dots_button(table, row)),
            CellContent::Count { total } => td
                .text(format!("Total: {}", total))
                .child(dots_button(table, row)),
            CellContent::List(entries) => td.child(
                Element::new("ul")
                    .class("kv-list")
                    .children(entries.iter().map(ListEntry::to_element)),
            ),
            CellContent::Details { summary, label } => td
                .child(
                    Element::new("ul").class("kv-summary").children(
                        summary
                            .lines()
                            .into_iter()
                            .map(|(name, n)| Element::new("li").text(format!("{}: {}", name, n))),
                    ),
                )
                .child(
                    Element::new("button")
                        .attr("type", "button")
                        .class("view-details-button")
                        .attr("data-action", "open-details")
                        .attr("data-table", table.key())
                        .attr("data-row", row.to_string())
                        .attr("data-col", col.to_string())
                        .text(label.clone()),
                ),
        }
    }
}

fn chevron_button(table: TableType, row: usize, expanded: bool) -> Element {
    let (action, title, src, alt, width) = if expanded {
        (
            "collapse-row",
            format!("Show less info for row {}", row + 1),
            "images/angle-down-solid.svg",
            "Chevron arrow pointing down",
            "14px",
        )
    } else {
        (
            "expand-row",
            format!("Show more info for row {}", row + 1),
            "images/angle-right-solid.svg",
            "Chevron arrow pointing right",
            "10px",
        )
    };
    Element::new("button")
        .attr("type", "button")
        .class("chevron")
        .attr("title", title)
        .attr("data-action", action)
        .attr("data-table", table.key())
        .attr("data-row", row.to_string())
        .child(
            Element::new("img")
                .attr("src", src)
                .attr("alt", alt)
                .attr("style", format!("width:{}", width)),
        )
}

fn dots_button(table: TableType, row: usize) -> Element {
    Element::new("button")
        .attr("type", "button")
        .class("truncated-dots")
        .attr("title", format!("Expand row {}", row + 1))
        .attr("data-action", "expand-row")
        .attr("data-table", table.key())
        .attr("data-row", row.to_string())
        .child(Element::new("span").text("..."))
}

/// First `limit` characters, or `None` when the text already fits
fn truncate_chars(text: &str, limit: usize) -> Option<String> {
    if text.chars().count() > limit {
        Some(text.chars().take(limit).collect())
    } else {
        None
    }
}

/// Untruncated string form used by name columns
fn full_text(value: &CellValue) -> String {
    match value {
        CellValue::Null => NONE_TEXT.to_string(),
        CellValue::Scalar(s) => s.clone(),
        CellValue::Collection(items) if items.is_empty() => NONE_TEXT.to_string(),
        CellValue::Collection(items) => items
            .iter()
            .map(CollectionItem::display)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Collapsed (truncated) content of a cell
pub fn render_collapsed(
    row: &Row,
    column: &ColumnDescriptor,
    presentation: PresentationMode,
    ctx: &RenderContext,
) -> CellContent {
    if column.name.is_empty() {
        return CellContent::Control { expanded: false };
    }
    let value = row.get(column.name);
    if column.never_truncates() {
        return CellContent::Text(full_text(value));
    }

    match value {
        CellValue::Null => CellContent::Text(NONE_TEXT.to_string()),
        CellValue::Scalar(s) => match truncate_chars(s, ctx.char_limit) {
            Some(preview) => CellContent::Truncated { preview },
            None => CellContent::Text(s.clone()),
        },
        CellValue::Collection(items) if items.is_empty() => CellContent::Text(NONE_TEXT.to_string()),
        CellValue::Collection(items) => match presentation {
            PresentationMode::Modal => CellContent::Count { total: items.len() },
            PresentationMode::Inline => {
                let first = items[0].display();
                let preview = truncate_chars(&first, ctx.char_limit).unwrap_or(first);
                CellContent::Truncated { preview }
            }
        },
    }
}

/// Expanded (full) content of a cell
pub fn render_expanded(
    row: &Row,
    column: &ColumnDescriptor,
    presentation: PresentationMode,
    ctx: &RenderContext,
) -> CellContent {
    if column.name.is_empty() {
        return CellContent::Control { expanded: true };
    }
    let value = row.get(column.name);
    if column.never_truncates() {
        return CellContent::Text(full_text(value));
    }

    match value {
        CellValue::Null => CellContent::Text(NONE_TEXT.to_string()),
        CellValue::Scalar(s) => CellContent::Text(s.clone()),
        CellValue::Collection(items) if items.is_empty() => CellContent::Text(NONE_TEXT.to_string()),
        CellValue::Collection(items) => match presentation {
            PresentationMode::Modal => CellContent::Details {
                summary: summarize(column.collection, items, ctx.now),
                label: column.friendly_name().to_string(),
            },
            PresentationMode::Inline => CellContent::List(
                items
                    .iter()
                    .map(|i| ListEntry::from_item(i, &ctx.date_format))
                    .collect(),
            ),
        },
    }
}

/// All cells of a row, one per descriptor column, in column order
pub fn render_row(
    row: &Row,
    descriptor: &TableDescriptor,
    expanded: bool,
    ctx: &RenderContext,
) -> Vec<CellContent> {
    descriptor
        .columns
        .iter()
        .map(|col| {
            if expanded {
                render_expanded(row, col, descriptor.presentation, ctx)
            } else {
                render_collapsed(row, col, descriptor.presentation, ctx)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CollectionKind;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn ctx() -> RenderContext {
        RenderContext::new(Utc.timestamp_millis_opt(1_704_067_200_000).unwrap())
    }

    fn col(name: &'static str) -> ColumnDescriptor {
        ColumnDescriptor {
            name,
            css_class: None,
            collection: None,
        }
    }

    fn row(v: serde_json::Value) -> Row {
        Row::from_json(v).unwrap()
    }

    #[test]
    fn test_null_and_absent_render_none() {
        let r = row(json!({"State": null}));
        for mode in [PresentationMode::Inline, PresentationMode::Modal] {
            assert_eq!(
                render_collapsed(&r, &col("State"), mode, &ctx()),
                CellContent::Text("None".into())
            );
            assert_eq!(
                render_expanded(&r, &col("Users"), mode, &ctx()),
                CellContent::Text("None".into())
            );
        }
    }

    #[test]
    fn test_long_scalar_truncates_to_limit() {
        let long = "x".repeat(51);
        let r = row(json!({ "Conditions": long }));
        let collapsed = render_collapsed(&r, &col("Conditions"), PresentationMode::Inline, &ctx());
        assert_eq!(
            collapsed,
            CellContent::Truncated {
                preview: "x".repeat(50)
            }
        );
        assert!(collapsed.has_affordance());
        assert_eq!(
            render_expanded(&r, &col("Conditions"), PresentationMode::Inline, &ctx()),
            CellContent::Text(long)
        );
    }

    #[test]
    fn test_exactly_limit_is_not_truncated() {
        let r = row(json!({ "State": "y".repeat(50) }));
        let c = render_collapsed(&r, &col("State"), PresentationMode::Modal, &ctx());
        assert_eq!(c, CellContent::Text("y".repeat(50)));
        assert!(!c.has_affordance());
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(60);
        let r = row(json!({ "Users": text }));
        match render_collapsed(&r, &col("Users"), PresentationMode::Inline, &ctx()) {
            CellContent::Truncated { preview } => assert_eq!(preview.chars().count(), 50),
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_name_columns_render_in_full() {
        let long = "n".repeat(200);
        let r = row(json!({ "Name": long, "DisplayName": long }));
        for name in ["Name", "DisplayName"] {
            let c = render_collapsed(&r, &col(name), PresentationMode::Modal, &ctx());
            assert_eq!(c, CellContent::Text("n".repeat(200)));
            assert!(!c.has_affordance());
        }
    }

    #[test]
    fn test_collection_collapsed_modal_shows_count() {
        let r = row(json!({"Permissions": [{"RoleType": "Application"}, {"RoleType": "Delegated"}]}));
        let c = render_collapsed(&r, &col("Permissions"), PresentationMode::Modal, &ctx());
        assert_eq!(c, CellContent::Count { total: 2 });
        assert!(c.has_affordance());
    }

    #[test]
    fn test_collection_collapsed_inline_shows_first_element() {
        let r = row(json!({"Users": ["All users", "Exclude: break-glass"]}));
        let c = render_collapsed(&r, &col("Users"), PresentationMode::Inline, &ctx());
        assert_eq!(
            c,
            CellContent::Truncated {
                preview: "All users".into()
            }
        );
    }

    #[test]
    fn test_empty_collection_renders_none_both_ways() {
        let r = row(json!({"Users": []}));
        assert_eq!(
            render_collapsed(&r, &col("Users"), PresentationMode::Inline, &ctx()),
            CellContent::Text("None".into())
        );
        assert_eq!(
            render_expanded(&r, &col("Users"), PresentationMode::Modal, &ctx()),
            CellContent::Text("None".into())
        );
    }

    #[test]
    fn test_expanded_inline_lists_every_element() {
        let r = row(json!({"Users": ["a", "b", "c"]}));
        assert_eq!(
            render_expanded(&r, &col("Users"), PresentationMode::Inline, &ctx()),
            CellContent::List(vec![
                ListEntry::Text("a".into()),
                ListEntry::Text("b".into()),
                ListEntry::Text("c".into()),
            ])
        );
    }

    #[test]
    fn test_expanded_modal_summarizes_by_column_kind() {
        let column = ColumnDescriptor {
            name: "Permissions",
            css_class: None,
            collection: Some(CollectionKind::Permissions),
        };
        let r = row(json!({"Permissions": [
            {"RoleType": "Application", "IsAdminConsented": true, "IsRisky": false},
            {"RoleType": "Delegated", "IsAdminConsented": false, "IsRisky": true}
        ]}));
        match render_expanded(&r, &column, PresentationMode::Modal, &ctx()) {
            CellContent::Details { summary, label } => {
                assert_eq!(label, "Permissions");
                assert_eq!(summary.total(), 2);
            }
            other => panic!("expected details, got {:?}", other),
        }
    }

    #[test]
    fn test_action_column_mirrors_state() {
        let r = Row::new();
        assert_eq!(
            render_collapsed(&r, &col(""), PresentationMode::Inline, &ctx()),
            CellContent::Control { expanded: false }
        );
        assert_eq!(
            render_expanded(&r, &col(""), PresentationMode::Inline, &ctx()),
            CellContent::Control { expanded: true }
        );
    }

    #[test]
    fn test_render_row_has_one_cell_per_column() {
        let desc = TableType::RiskyApps.descriptor();
        let cells = render_row(&Row::new(), desc, false, &ctx());
        assert_eq!(cells.len(), desc.columns.len());
    }

    #[test]
    fn test_cell_html_wires_affordance_to_row_expand() {
        let html = CellContent::Truncated {
            preview: "abc".into(),
        }
        .to_element(TableType::Caps, 4, 2)
        .to_html();
        assert!(html.contains(r#"data-action="expand-row""#));
        assert!(html.contains(r#"data-row="4""#));
        assert!(html.contains(r#"title="Expand row 5""#));
    }

    #[test]
    fn test_control_html_direction() {
        let down = CellContent::Control { expanded: true }
            .to_element(TableType::RiskyApps, 0, 0)
            .to_html();
        assert!(down.contains("angle-down-solid.svg"));
        assert!(down.contains(r#"data-action="collapse-row""#));
        let right = CellContent::Control { expanded: false }
            .to_element(TableType::RiskyApps, 0, 0)
            .to_html();
        assert!(right.contains("angle-right-solid.svg"));
    }
}
