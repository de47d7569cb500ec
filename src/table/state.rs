//! Row view state and expand/collapse transitions
//!
//! Every transition receives the dataset and section explicitly, updates the
//! view-state side table first and then re-renders the row from it.

use super::builder::{SectionBody, TableSection};
use super::cell::render_row;
use super::RenderContext;
use crate::{RenderError, Row};

/// Per-row view state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowViewState {
    pub expanded: bool,
}

fn set_row(
    section: &mut TableSection,
    data: &[Row],
    row: usize,
    expanded: bool,
    ctx: &RenderContext,
) -> Result<(), RenderError> {
    let descriptor = section.descriptor;
    let out_of_range = || RenderError::RowOutOfRange {
        table: descriptor.table.key().to_string(),
        row,
    };
    let source = data.get(row).ok_or_else(out_of_range)?;

    match &mut section.body {
        SectionBody::NoData => Err(out_of_range()),
        SectionBody::Rows { view, cells } => {
            let (state, rendered) = match (view.get_mut(row), cells.get_mut(row)) {
                (Some(state), Some(rendered)) => (state, rendered),
                _ => return Err(out_of_range()),
            };
            state.expanded = expanded;
            *rendered = render_row(source, descriptor, state.expanded, ctx);
            Ok(())
        }
    }
}

/// Show the full content of one row
pub fn expand_row(
    section: &mut TableSection,
    data: &[Row],
    row: usize,
    ctx: &RenderContext,
) -> Result<(), RenderError> {
    set_row(section, data, row, true, ctx)
}

/// Return one row to its truncated form
pub fn collapse_row(
    section: &mut TableSection,
    data: &[Row],
    row: usize,
    ctx: &RenderContext,
) -> Result<(), RenderError> {
    set_row(section, data, row, false, ctx)
}

/// Expand every rendered row in order. Rows without data are skipped and returned as errors.
pub fn expand_all(section: &mut TableSection, data: &[Row], ctx: &RenderContext) -> Vec<RenderError> {
    (0..section.row_count())
        .filter_map(|row| expand_row(section, data, row, ctx).err())
        .collect()
}

/// Collapse every rendered row in order
pub fn collapse_all(section: &mut TableSection, data: &[Row], ctx: &RenderContext) -> Vec<RenderError> {
    (0..section.row_count())
        .filter_map(|row| collapse_row(section, data, row, ctx).err())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{build_table, CellContent, TableType};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn ctx() -> RenderContext {
        RenderContext::new(Utc.timestamp_millis_opt(1_704_067_200_000).unwrap())
    }

    fn apps() -> Vec<Row> {
        vec![
            Row::from_json(json!({
                "DisplayName": "Contoso Sync",
                "IsMultiTenantEnabled": true,
                "KeyCredentials": [
                    {"KeyId": "a", "StartDateTime": "/Date(1672531200000)/", "EndDateTime": "/Date(1767225600000)/"},
                    {"KeyId": "b", "StartDateTime": "/Date(1640995200000)/", "EndDateTime": "/Date(1672531200000)/"}
                ],
                "PasswordCredentials": null,
                "FederatedCredentials": [],
                "Permissions": [{"RoleType": "Application", "IsAdminConsented": true, "IsRisky": true}]
            }))
            .unwrap(),
            Row::from_json(json!({"DisplayName": "Fabrikam Reader"})).unwrap(),
        ]
    }

    fn section(data: &[Row]) -> TableSection {
        build_table(Some(data), TableType::RiskyApps.descriptor(), None, &ctx()).unwrap()
    }

    #[test]
    fn test_expand_updates_state_and_control() {
        let data = apps();
        let mut s = section(&data);
        expand_row(&mut s, &data, 0, &ctx()).unwrap();
        assert!(s.row_state(0).unwrap().expanded);
        assert!(!s.row_state(1).unwrap().expanded);
        let cells = s.row_cells(0).unwrap();
        assert_eq!(cells[0], CellContent::Control { expanded: true });
        assert!(matches!(cells[3], CellContent::Details { .. }));
        assert_eq!(cells[4], CellContent::Text("None".into()));
        assert_eq!(cells[5], CellContent::Text("None".into()));
    }

    #[test]
    fn test_expand_is_idempotent() {
        let data = apps();
        let mut s = section(&data);
        expand_row(&mut s, &data, 0, &ctx()).unwrap();
        let once = s.clone();
        expand_row(&mut s, &data, 0, &ctx()).unwrap();
        assert_eq!(s, once);
    }

    #[test]
    fn test_collapse_restores_initial_render() {
        let data = apps();
        let initial = section(&data);
        let mut s = initial.clone();
        expand_row(&mut s, &data, 0, &ctx()).unwrap();
        collapse_row(&mut s, &data, 0, &ctx()).unwrap();
        assert_eq!(s, initial);
        assert_eq!(s.to_element().to_html(), initial.to_element().to_html());
    }

    #[test]
    fn test_expand_all_then_collapse_all_round_trips() {
        let data = apps();
        let initial = section(&data);
        let mut s = initial.clone();
        assert!(expand_all(&mut s, &data, &ctx()).is_empty());
        assert!((0..2).all(|r| s.row_state(r).unwrap().expanded));
        assert!(collapse_all(&mut s, &data, &ctx()).is_empty());
        assert_eq!(s.to_element().to_html(), initial.to_element().to_html());
    }

    #[test]
    fn test_out_of_range_row_is_an_error_not_a_panic() {
        let data = apps();
        let mut s = section(&data);
        let err = expand_row(&mut s, &data, 7, &ctx()).unwrap_err();
        assert_eq!(
            err,
            RenderError::RowOutOfRange {
                table: "riskyApps".into(),
                row: 7
            }
        );
        // A shorter dataset than rendered rows only fails the missing rows
        let errors = expand_all(&mut s, &data[..1], &ctx());
        assert_eq!(errors.len(), 1);
        assert!(s.row_state(0).unwrap().expanded);
    }

    #[test]
    fn test_no_data_section_rejects_transitions() {
        let mut s = build_table(Some(&[][..]), TableType::Caps.descriptor(), None, &ctx()).unwrap();
        assert!(expand_row(&mut s, &apps(), 0, &ctx()).is_err());
        assert!(expand_all(&mut s, &apps(), &ctx()).is_empty());
    }
}
