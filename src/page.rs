//! Report page: rendered sections, the detail overlay host and action dispatch
//!
//! Actions are plain data keyed by table type and row index. Handlers receive
//! the dataset for the table they act on and update the view-state side
//! tables before re-rendering. Failures go to the page's diagnostics and leave
//! the page unchanged.

use crate::classify::{render_control_table, ControlRow};
use crate::details::{DetailOverlay, DetailView, GroupBy, OverlayContent};
use crate::dom::Element;
use crate::input::ReportInput;
use crate::show_more::{ShowMoreList, DEFAULT_MAX_LIST_ENTRIES, DEFAULT_SHOW_MORE_INCREMENT};
use crate::table::{
    build_table, collapse_all, collapse_row, expand_all, expand_row, render_row, row_element,
    ColumnDescriptor, RenderContext, RowViewState, TableSection, TableType,
};
use crate::theme::{self, SessionStore, Theme};
use crate::{CellValue, CollectionItem, Diagnostics, RenderError, Row};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A user action, as wired through `data-action` attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ExpandRow { table: TableType, row: usize },
    CollapseRow { table: TableType, row: usize },
    ExpandAll { table: TableType },
    CollapseAll { table: TableType },
    OpenDetails { table: TableType, row: usize, column: usize },
    CloseDetails,
    SearchDetails(String),
    GroupDetails(GroupBy),
    ToggleTheme,
    ShowMore { list: String },
}

impl Action {
    /// Read the action wired to an element. Returns `None` for elements
    /// without a recognized `data-action` or with incomplete attributes.
    pub fn from_element(el: &Element) -> Option<Action> {
        let table = || el.get_attr("data-table")?.parse::<TableType>().ok();
        let index = |name: &str| el.get_attr(name)?.parse::<usize>().ok();

        let action = match el.get_attr("data-action")? {
            "expand-row" => Action::ExpandRow {
                table: table()?,
                row: index("data-row")?,
            },
            "collapse-row" => Action::CollapseRow {
                table: table()?,
                row: index("data-row")?,
            },
            "expand-all" => Action::ExpandAll { table: table()? },
            "collapse-all" => Action::CollapseAll { table: table()? },
            "open-details" => Action::OpenDetails {
                table: table()?,
                row: index("data-row")?,
                column: index("data-col")?,
            },
            "close-details" => Action::CloseDetails,
            "toggle-theme" => Action::ToggleTheme,
            "show-more" => Action::ShowMore {
                list: el.get_attr("data-list")?.to_string(),
            },
            _ => return None,
        };
        Some(action)
    }
}

/// Which control currently has focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    /// The element that dispatched this action
    Control(Action),
    /// The overlay's close button
    CloseButton,
}

/// Page-level rendering options
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub ctx: RenderContext,
    /// Overrides the input document's dark-mode default when set
    pub dark_mode: Option<bool>,
    pub max_list_entries: usize,
    pub show_more_increment: usize,
    pub titles: BTreeMap<TableType, String>,
    /// Whether the page carries the detail dialog host
    pub overlay_host: bool,
}

impl PageOptions {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ctx: RenderContext::new(now),
            dark_mode: None,
            max_list_entries: DEFAULT_MAX_LIST_ENTRIES,
            show_more_increment: DEFAULT_SHOW_MORE_INCREMENT,
            titles: BTreeMap::new(),
            overlay_host: true,
        }
    }
}

/// The interactive report
#[derive(Debug, Clone)]
pub struct ReportPage {
    ctx: RenderContext,
    datasets: BTreeMap<TableType, Vec<Row>>,
    sections: Vec<TableSection>,
    overlay: Option<DetailOverlay>,
    focus: Option<Focus>,
    opener: Option<Action>,
    theme: Theme,
    store: SessionStore,
    lists: Vec<ShowMoreList>,
    controls: Vec<ControlRow>,
    show_more_increment: usize,
    diagnostics: Diagnostics,
}

impl ReportPage {
    pub fn from_input(input: &ReportInput, options: &PageOptions) -> Self {
        Self::with_store(input, options, SessionStore::new())
    }

    /// Build the page against an existing session store
    pub fn with_store(input: &ReportInput, options: &PageOptions, mut store: SessionStore) -> Self {
        let mut diagnostics = Diagnostics::new();
        let datasets = input.datasets(&mut diagnostics);

        let sections = datasets
            .iter()
            .filter_map(|(table, rows)| {
                build_table(
                    Some(rows.as_slice()),
                    table.descriptor(),
                    options.titles.get(table).map(String::as_str),
                    &options.ctx,
                )
            })
            .collect();

        let default_dark = options.dark_mode.or(input.dark_mode).unwrap_or(false);
        let theme = theme::mount_theme(default_dark, &mut store);

        let mut lists = Vec::new();
        if let Some(domains) = input.spf_domains(&mut diagnostics) {
            lists.push(ShowMoreList::spf_domains(domains, options.max_list_entries));
        }
        for (idx, log) in input.dns_logs(&mut diagnostics).into_iter().enumerate() {
            lists.push(ShowMoreList::dns_log(idx, &log, options.max_list_entries));
        }
        let controls = input.controls(&mut diagnostics);

        let overlay = if options.overlay_host {
            Some(DetailOverlay::new())
        } else {
            None
        };

        Self {
            ctx: options.ctx.clone(),
            datasets,
            sections,
            overlay,
            focus: None,
            opener: None,
            theme,
            store,
            lists,
            controls,
            show_more_increment: options.show_more_increment,
            diagnostics,
        }
    }

    pub fn ctx(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn sections(&self) -> &[TableSection] {
        &self.sections
    }

    pub fn section(&self, table: TableType) -> Option<&TableSection> {
        self.sections.iter().find(|s| s.table() == table)
    }

    pub fn dataset(&self, table: TableType) -> Option<&[Row]> {
        self.datasets.get(&table).map(Vec::as_slice)
    }

    pub fn overlay(&self) -> Option<&DetailOverlay> {
        self.overlay.as_ref()
    }

    pub fn focus(&self) -> Option<&Focus> {
        self.focus.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Hand the session store to the next page of the same session
    pub fn into_store(self) -> SessionStore {
        self.store
    }

    pub fn lists(&self) -> &[ShowMoreList] {
        &self.lists
    }

    pub fn list(&self, id: &str) -> Option<&ShowMoreList> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn controls(&self) -> &[ControlRow] {
        &self.controls
    }

    pub fn show_more_increment(&self) -> usize {
        self.show_more_increment
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Simulate the user activating a control: it takes focus, then its action runs
    pub fn activate(&mut self, action: Action) {
        self.focus = Some(Focus::Control(action.clone()));
        self.dispatch(action);
    }

    /// Activate whatever action an element is wired to
    pub fn click(&mut self, el: &Element) {
        if let Some(key) = el.get_attr("data-table") {
            if let Err(e) = key.parse::<TableType>() {
                self.diagnostics.report(e);
                return;
            }
        }
        match Action::from_element(el) {
            Some(action) => self.activate(action),
            None => log::debug!("Element <{}> carries no action", el.tag),
        }
    }

    /// Platform dismissal of the overlay (Escape key, backdrop)
    pub fn dismiss(&mut self) {
        self.dispatch(Action::CloseDetails);
    }

    /// Run one action to completion
    pub fn dispatch(&mut self, action: Action) {
        log::debug!("Dispatching {:?}", action);
        let result = match action {
            Action::ExpandRow { table, row } => self
                .section_parts(table)
                .and_then(|(section, data, ctx)| expand_row(section, data, row, ctx)),
            Action::CollapseRow { table, row } => self
                .section_parts(table)
                .and_then(|(section, data, ctx)| collapse_row(section, data, row, ctx)),
            Action::ExpandAll { table } => self.bulk(table, true),
            Action::CollapseAll { table } => self.bulk(table, false),
            Action::OpenDetails { table, row, column } => self.open_details(table, row, column),
            Action::CloseDetails => self.close_details(),
            Action::SearchDetails(term) => self.update_view(|view| view.search = term),
            Action::GroupDetails(group_by) => self.update_view(|view| view.group_by = group_by),
            Action::ToggleTheme => {
                self.theme = theme::toggle(self.theme, &mut self.store);
                Ok(())
            }
            Action::ShowMore { list } => {
                match self.lists.iter_mut().find(|l| l.id == list) {
                    Some(l) => {
                        l.show_more(self.show_more_increment);
                    }
                    None => log::debug!("No list {} on this page", list),
                }
                Ok(())
            }
        };
        if let Err(e) = result {
            self.diagnostics.report(e);
        }
    }

    fn section_parts(
        &mut self,
        table: TableType,
    ) -> Result<(&mut TableSection, &[Row], &RenderContext), RenderError> {
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.table() == table)
            .ok_or_else(|| RenderError::TableNotRendered(table.key().to_string()))?;
        let data = self.datasets.get(&table).map(Vec::as_slice).unwrap_or(&[]);
        Ok((section, data, &self.ctx))
    }

    fn bulk(&mut self, table: TableType, expand: bool) -> Result<(), RenderError> {
        let (section, data, ctx) = self.section_parts(table)?;
        let errors = if expand {
            expand_all(section, data, ctx)
        } else {
            collapse_all(section, data, ctx)
        };
        for e in errors {
            self.diagnostics.report(e);
        }
        Ok(())
    }

    /// What the overlay would show for a cell, without opening it
    pub fn details_content(
        &self,
        table: TableType,
        row: usize,
        column: usize,
    ) -> Result<OverlayContent, RenderError> {
        let section = self
            .section(table)
            .ok_or_else(|| RenderError::TableNotRendered(table.key().to_string()))?;
        let data = self
            .dataset(table)
            .and_then(|rows| rows.get(row))
            .ok_or_else(|| RenderError::RowOutOfRange {
                table: table.key().to_string(),
                row,
            })?;
        let col = section
            .descriptor
            .columns
            .get(column)
            .filter(|c| !c.name.is_empty())
            .ok_or_else(|| RenderError::ColumnOutOfRange {
                table: table.key().to_string(),
                column,
            })?;

        let items = match data.get(col.name) {
            CellValue::Collection(items) => items.clone(),
            CellValue::Scalar(s) => vec![CollectionItem::Scalar(s.clone())],
            CellValue::Null => Vec::new(),
        };

        Ok(OverlayContent {
            title: details_title(col, data, row),
            kind: col.collection,
            items,
            view: DetailView::default(),
        })
    }

    fn open_details(&mut self, table: TableType, row: usize, column: usize) -> Result<(), RenderError> {
        if self.overlay.is_none() {
            return Err(RenderError::MissingHostElement("details-dialog"));
        }
        let content = self.details_content(table, row, column)?;
        let overlay = self
            .overlay
            .as_mut()
            .ok_or(RenderError::MissingHostElement("details-dialog"))?;
        overlay.open(&content.title, content.kind, content.items);

        if let Some(Focus::Control(opener)) = self.focus.take() {
            self.opener = Some(opener);
        }
        self.focus = Some(Focus::CloseButton);
        Ok(())
    }

    fn close_details(&mut self) -> Result<(), RenderError> {
        let overlay = self
            .overlay
            .as_mut()
            .ok_or(RenderError::MissingHostElement("details-dialog"))?;
        if overlay.close() {
            self.focus = self.opener.take().map(Focus::Control);
        }
        Ok(())
    }

    fn update_view(&mut self, apply: impl FnOnce(&mut DetailView)) -> Result<(), RenderError> {
        let overlay = self
            .overlay
            .as_mut()
            .ok_or(RenderError::MissingHostElement("details-dialog"))?;
        match overlay.view_mut() {
            Some(view) => apply(view),
            None => log::debug!("Details overlay is closed, ignoring view change"),
        }
        Ok(())
    }

    /// A body row rendered in the given state, independent of its current state
    pub fn row_fragment(&self, table: TableType, row: usize, expanded: bool) -> Option<Element> {
        let section = self.section(table)?;
        let data = self.dataset(table)?.get(row)?;
        let cells = render_row(data, section.descriptor, expanded, &self.ctx);
        Some(row_element(table, row, RowViewState { expanded }, &cells))
    }

    /// `<main>` with everything but the overlay
    pub fn to_element(&self) -> Element {
        let mut main = Element::new("main")
            .attr("id", "report")
            .child(theme::render_toggle(self.theme));

        if !self.controls.is_empty() {
            main = main.child(render_control_table(&self.controls));
        }
        main = main.children(self.lists.iter().map(ShowMoreList::to_element));
        main.children(self.sections.iter().map(TableSection::to_element))
    }

    /// The dialog host, when the page has one
    pub fn overlay_element(&self) -> Option<Element> {
        self.overlay
            .as_ref()
            .map(|o| o.render(self.ctx.now, &self.ctx.date_format))
    }
}

/// `"<column> - <DisplayName | Name | Row N>"`
fn details_title(column: &ColumnDescriptor, data: &Row, row: usize) -> String {
    let subject = data
        .scalar("DisplayName")
        .or_else(|| data.scalar("Name"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Row {}", row + 1));
    format!("{} - {}", column.friendly_name(), subject)
}
