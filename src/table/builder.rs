//! Builds a table section from a dataset and its descriptor

use super::cell::{render_row, CellContent};
use super::descriptor::{TableDescriptor, TableType};
use super::state::RowViewState;
use super::RenderContext;
use crate::dom::Element;
use crate::{Diagnostics, Row};

/// A rendered table section
#[derive(Debug, Clone, PartialEq)]
pub struct TableSection {
    pub descriptor: &'static TableDescriptor,
    pub title: String,
    pub body: SectionBody,
}

/// Either a "No data found" message or the rendered rows
#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    NoData,
    Rows {
        /// Side table: row index -> view state
        view: Vec<RowViewState>,
        /// Rendered cells, mirrored from `view`
        cells: Vec<Vec<CellContent>>,
    },
}

impl TableSection {
    pub fn table(&self) -> TableType {
        self.descriptor.table
    }

    /// Number of rendered body rows
    pub fn row_count(&self) -> usize {
        match &self.body {
            SectionBody::NoData => 0,
            SectionBody::Rows { view, .. } => view.len(),
        }
    }

    pub fn row_state(&self, row: usize) -> Option<RowViewState> {
        match &self.body {
            SectionBody::NoData => None,
            SectionBody::Rows { view, .. } => view.get(row).copied(),
        }
    }

    pub fn row_cells(&self, row: usize) -> Option<&[CellContent]> {
        match &self.body {
            SectionBody::NoData => None,
            SectionBody::Rows { cells, .. } => cells.get(row).map(Vec::as_slice),
        }
    }

    /// `<tr>` for one body row
    pub fn row_element(&self, row: usize) -> Option<Element> {
        let state = self.row_state(row)?;
        let cells = self.row_cells(row)?;
        Some(row_element(self.table(), row, state, cells))
    }

    /// Full `<section>` element
    pub fn to_element(&self) -> Element {
        let desc = self.descriptor;
        let section = Element::new("section")
            .attr("id", desc.section_id)
            .child(Element::new("hr"))
            .child(Element::new("h2").text(self.title.clone()));

        let (view, cells) = match &self.body {
            SectionBody::NoData => return section.child(Element::new("p").text("No data found")),
            SectionBody::Rows { view, cells } => (view, cells),
        };

        let buttons = Element::new("div")
            .class("buttons")
            .child(
                Element::new("button")
                    .attr("type", "button")
                    .attr("title", "Expands all rows in the table below")
                    .attr("data-action", "expand-all")
                    .attr("data-table", desc.table.key())
                    .text("+ Expand all"),
            )
            .child(
                Element::new("button")
                    .attr("type", "button")
                    .attr("title", "Collapses all rows in the table below")
                    .attr("data-action", "collapse-all")
                    .attr("data-table", desc.table.key())
                    .text("\u{2212} Collapse all"),
            );

        let header = Element::new("tr").children(desc.columns.iter().map(|col| {
            let th = Element::new("th").attr("scope", "col").text(col.name);
            match col.css_class {
                Some(class) => th.class(class),
                None => th,
            }
        }));

        let tbody = Element::new("tbody").children(
            view.iter()
                .zip(cells)
                .enumerate()
                .map(|(i, (state, cells))| row_element(desc.table, i, *state, cells)),
        );

        section.child(buttons).child(
            Element::new("table")
                .class(&format!("{}_table", desc.table.key()))
                .child(Element::new("thead").child(header))
                .child(tbody),
        )
    }
}

/// `<tr>` for a row given its state and rendered cells
pub fn row_element(table: TableType, row: usize, state: RowViewState, cells: &[CellContent]) -> Element {
    Element::new("tr")
        .attr("data-row", row.to_string())
        .attr("data-expanded", state.expanded.to_string())
        .children(
            cells
                .iter()
                .enumerate()
                .map(|(col, cell)| cell.to_element(table, row, col)),
        )
}

/// Build a table section.
///
/// Returns `None` when the dataset is absent: the table does not apply to this report.
pub fn build_table(
    data: Option<&[Row]>,
    descriptor: &'static TableDescriptor,
    title: Option<&str>,
    ctx: &RenderContext,
) -> Option<TableSection> {
    let data = data?;
    let title = title.unwrap_or(descriptor.title).to_string();

    if data.is_empty() {
        return Some(TableSection {
            descriptor,
            title,
            body: SectionBody::NoData,
        });
    }

    let cells = data
        .iter()
        .map(|row| render_row(row, descriptor, false, ctx))
        .collect();

    Some(TableSection {
        descriptor,
        title,
        body: SectionBody::Rows {
            view: vec![RowViewState::default(); data.len()],
            cells,
        },
    })
}

/// Build a table by its type key, reporting unknown keys to diagnostics
pub fn build_table_named(
    data: Option<&[Row]>,
    table_key: &str,
    title: Option<&str>,
    ctx: &RenderContext,
    diagnostics: &mut Diagnostics,
) -> Option<TableSection> {
    match table_key.parse::<TableType>() {
        Ok(table) => build_table(data, table.descriptor(), title, ctx),
        Err(e) => {
            diagnostics.report(e);
            None
        }
    }
}
