//! Long lists that reveal their entries in increments

use crate::dom::Element;
use crate::input::DnsLog;

pub const DEFAULT_MAX_LIST_ENTRIES: usize = 20;
pub const DEFAULT_SHOW_MORE_INCREMENT: usize = 10;

/// What a list holds, which decides its markup and hidden-count wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `<ul id="spf-domains">` of domain names
    SpfDomains,
    /// `<div class="dns-logs">` holding a table of query results
    DnsLog,
}

impl ListKind {
    fn noun(self) -> &'static str {
        match self {
            ListKind::SpfDomains => "domains",
            ListKind::DnsLog => "rows",
        }
    }
}

/// A list with a visible prefix and a "Show more." control
#[derive(Debug, Clone, PartialEq)]
pub struct ShowMoreList {
    pub id: String,
    pub kind: ListKind,
    pub title: Option<String>,
    /// Header labels; only DNS logs have them
    pub columns: Vec<String>,
    pub items: Vec<Vec<String>>,
    visible: usize,
}

impl ShowMoreList {
    /// SPF domain list, one entry per domain
    pub fn spf_domains(domains: Vec<String>, max_entries: usize) -> Self {
        Self {
            id: "spf-domains".to_string(),
            kind: ListKind::SpfDomains,
            title: None,
            columns: Vec::new(),
            items: domains.into_iter().map(|d| vec![d]).collect(),
            visible: max_entries,
        }
    }

    /// One DNS log table; each item is a row of cells
    pub fn dns_log(index: usize, log: &DnsLog, max_entries: usize) -> Self {
        Self {
            id: format!("dns-log-{}", index),
            kind: ListKind::DnsLog,
            title: log.title.clone(),
            columns: log.columns.clone(),
            items: log.cells(),
            visible: max_entries,
        }
    }

    /// Number of entries currently shown
    pub fn visible(&self) -> usize {
        self.visible.min(self.items.len())
    }

    pub fn hidden(&self) -> usize {
        self.items.len() - self.visible()
    }

    /// Reveal `increment` more entries. Returns false when nothing was hidden.
    pub fn show_more(&mut self, increment: usize) -> bool {
        if self.hidden() == 0 {
            return false;
        }
        self.visible = self.visible().saturating_add(increment);
        true
    }

    fn show_more_message(&self) -> Option<Element> {
        let hidden = self.hidden();
        if hidden == 0 {
            return None;
        }
        Some(
            Element::new("p")
                .class("show-more")
                .text(format!("{} {} hidden. ", hidden, self.kind.noun()))
                .child(
                    Element::new("button")
                        .attr("type", "button")
                        .class("show-more")
                        .attr("data-action", "show-more")
                        .attr("data-list", self.id.clone())
                        .attr("data-noun", self.kind.noun())
                        .text("Show more."),
                ),
        )
    }

    pub fn to_element(&self) -> Element {
        let visible = self.visible();
        let hidden_attr = |el: Element, idx: usize| {
            if idx >= visible {
                el.attr("hidden", "hidden")
            } else {
                el
            }
        };

        let list = match self.kind {
            ListKind::SpfDomains => Element::new("ul").attr("id", self.id.clone()).children(
                self.items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| hidden_attr(Element::new("li").text(item.join(" ")), i)),
            ),
            ListKind::DnsLog => {
                let body = Element::new("tbody").children(self.items.iter().enumerate().map(|(i, row)| {
                    hidden_attr(
                        Element::new("tr").children(row.iter().map(|c| Element::new("td").text(c.clone()))),
                        i,
                    )
                }));
                let mut table = Element::new("table");
                if !self.columns.is_empty() {
                    table = table.child(Element::new("thead").child(Element::new("tr").children(
                        self.columns
                            .iter()
                            .map(|c| Element::new("th").attr("scope", "col").text(c.clone())),
                    )));
                }
                let table = table.child(body);
                let mut wrapper = Element::new("div").class("dns-logs").attr("id", self.id.clone());
                if let Some(title) = &self.title {
                    wrapper = wrapper.child(Element::new("h3").text(title.clone()));
                }
                wrapper.child(table)
            }
        };

        match self.show_more_message() {
            Some(message) => list.child(message),
            None => list,
        }
    }
}
