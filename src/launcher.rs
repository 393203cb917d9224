//! Launcher script-filter output
//!
//! The launcher expects `{"items": [{title, subtitle, arg, autocomplete}, ...]}`
//! on stdout. The first item always triggers the automatic switch; one item
//! follows per stored template.

use serde::Serialize;

use crate::constants::launcher::{AUTO_ARG, AUTO_AUTOCOMPLETE, AUTO_SUBTITLE, AUTO_TITLE};
use crate::store::TemplateEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LauncherItem {
    pub title: String,
    pub subtitle: String,
    pub arg: String,
    pub autocomplete: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LauncherList {
    pub items: Vec<LauncherItem>,
}

impl LauncherItem {
    fn auto_switch() -> Self {
        Self {
            title: AUTO_TITLE.to_string(),
            subtitle: AUTO_SUBTITLE.to_string(),
            arg: AUTO_ARG.to_string(),
            autocomplete: AUTO_AUTOCOMPLETE.to_string(),
        }
    }
}

impl From<&TemplateEntry> for LauncherItem {
    fn from(entry: &TemplateEntry) -> Self {
        Self {
            title: entry.name.clone(),
            subtitle: entry.command.clone(),
            arg: entry.command.clone(),
            autocomplete: entry.name.clone(),
        }
    }
}

impl LauncherList {
    pub fn from_entries(entries: &[TemplateEntry]) -> Self {
        let items = std::iter::once(LauncherItem::auto_switch())
            .chain(entries.iter().map(LauncherItem::from))
            .collect();
        Self { items }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
