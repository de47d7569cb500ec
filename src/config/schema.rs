//! Config schema and deserialization

use crate::dates::DEFAULT_DATE_FORMAT;
use crate::page::PageOptions;
use crate::show_more::{DEFAULT_MAX_LIST_ENTRIES, DEFAULT_SHOW_MORE_INCREMENT};
use crate::table::{RenderContext, TableType, DEFAULT_CHAR_LIMIT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Root config structure for .report-tables.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Characters shown before a cell is truncated. Default: 50
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_limit: Option<usize>,

    /// Entries shown before a long list collapses behind "Show more." Default: 20
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_list_entries: Option<usize>,

    /// Entries revealed per "Show more." activation. Default: 10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_more_increment: Option<usize>,

    /// Dark-mode default, overriding the report input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,

    /// chrono format string for credential dates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,

    /// Section titles keyed by table type (`caps`, `riskyApps`, `riskyThirdPartySPs`)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub titles: HashMap<String, String>,
}

impl Config {
    /// Config written by `init`, with every default spelled out
    pub fn starter() -> Self {
        Self {
            extends: None,
            char_limit: Some(DEFAULT_CHAR_LIMIT),
            max_list_entries: Some(DEFAULT_MAX_LIST_ENTRIES),
            show_more_increment: Some(DEFAULT_SHOW_MORE_INCREMENT),
            dark_mode: Some(false),
            date_format: Some(DEFAULT_DATE_FORMAT.to_string()),
            titles: TableType::ALL
                .into_iter()
                .map(|t| (t.key().to_string(), t.descriptor().title.to_string()))
                .collect(),
        }
    }

    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_dark_mode: Option<bool>, cli_char_limit: Option<usize>) -> Self {
        if cli_dark_mode.is_some() {
            self.dark_mode = cli_dark_mode;
        }
        if cli_char_limit.is_some() {
            self.char_limit = cli_char_limit;
        }
        self
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.char_limit.is_none() {
            self.char_limit = base.char_limit;
        }
        if self.max_list_entries.is_none() {
            self.max_list_entries = base.max_list_entries;
        }
        if self.show_more_increment.is_none() {
            self.show_more_increment = base.show_more_increment;
        }
        if self.dark_mode.is_none() {
            self.dark_mode = base.dark_mode;
        }
        if self.date_format.is_none() {
            self.date_format = base.date_format;
        }
        for (table, title) in base.titles {
            self.titles.entry(table).or_insert(title);
        }
    }

    /// Title overrides for known table types. Unknown keys are skipped with a warning.
    pub fn table_titles(&self) -> BTreeMap<TableType, String> {
        self.titles
            .iter()
            .filter_map(|(key, title)| match key.parse::<TableType>() {
                Ok(table) => Some((table, title.clone())),
                Err(e) => {
                    log::warn!("Ignoring title in config: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Page options with defaults filled in
    pub fn page_options(&self, now: DateTime<Utc>) -> PageOptions {
        let mut ctx = RenderContext::new(now).with_char_limit(self.char_limit.unwrap_or(DEFAULT_CHAR_LIMIT));
        if let Some(format) = &self.date_format {
            ctx = ctx.with_date_format(format);
        }
        PageOptions {
            ctx,
            dark_mode: self.dark_mode,
            max_list_entries: self.max_list_entries.unwrap_or(DEFAULT_MAX_LIST_ENTRIES),
            show_more_increment: self.show_more_increment.unwrap_or(DEFAULT_SHOW_MORE_INCREMENT),
            titles: self.table_titles(),
            overlay_host: true,
        }
    }
}
