//! Light/dark theme backed by a session-scoped key/value store

use crate::dom::Element;
use std::collections::HashMap;

/// Session storage key holding "true" or "false"
pub const DARK_MODE_KEY: &str = "darkMode";

/// Minimal session storage surface
pub trait ThemeStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store that lives as long as the page session
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    values: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ThemeStore for SessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Value of the `data-theme` attribute on `<html>`
    pub fn data_theme(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Text next to the toggle
    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light Mode",
            Theme::Dark => "Dark Mode",
        }
    }

    fn stored(self) -> &'static str {
        if self.is_dark() {
            "true"
        } else {
            "false"
        }
    }
}

/// Apply the stored theme, seeding the store from `default_dark` when the key is absent
pub fn mount_theme(default_dark: bool, store: &mut dyn ThemeStore) -> Theme {
    let stored = match store.get(DARK_MODE_KEY) {
        Some(value) => value,
        None => {
            let seeded = Theme::from_dark(default_dark).stored();
            store.set(DARK_MODE_KEY, seeded);
            seeded.to_string()
        }
    };
    set_theme(Theme::from_dark(stored == "true"), store)
}

/// Persist and return the given theme
pub fn set_theme(theme: Theme, store: &mut dyn ThemeStore) -> Theme {
    store.set(DARK_MODE_KEY, theme.stored());
    theme
}

/// Flip the current theme and persist it
pub fn toggle(current: Theme, store: &mut dyn ThemeStore) -> Theme {
    let next = match current {
        Theme::Light => Theme::Dark,
        Theme::Dark => Theme::Light,
    };
    log::debug!("Theme toggled to {}", next.data_theme());
    set_theme(next, store)
}

/// Checkbox toggle and its label
pub fn render_toggle(theme: Theme) -> Element {
    let mut input = Element::new("input")
        .attr("type", "checkbox")
        .attr("id", "toggle")
        .attr("data-action", "toggle-theme");
    if theme.is_dark() {
        input = input.attr("checked", "checked");
    }
    Element::new("div")
        .class("dark-mode-toggle")
        .child(
            Element::new("label")
                .class("switch")
                .attr("for", "toggle")
                .child(input)
                .child(Element::new("span").class("slider")),
        )
        .child(Element::new("span").attr("id", "toggle-text").text(theme.label()))
}
