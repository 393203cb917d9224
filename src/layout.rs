//! Layouts: the full set of display placements for one desktop arrangement
//!
//! A layout is read from the display tool's listing (or a stored template),
//! written back as a single tool command line, and identified by its
//! [`Footprint`].

use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::display::{DisplayConfig, Origin, UnknownKeyPolicy};
use crate::error::Result;

/// How layouts look on a display tool command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSyntax {
    /// Leading word of a command line, e.g. `displayplacer`
    pub command: String,
    pub unknown_keys: UnknownKeyPolicy,
}

impl CommandSyntax {
    /// Syntax for the given tool; a path is reduced to its file name since
    /// the tool prints bare command lines
    pub fn for_tool(tool: &str, unknown_keys: UnknownKeyPolicy) -> Self {
        let command = Path::new(tool)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(tool)
            .to_string();
        Self { command, unknown_keys }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    pub name: Option<String>,
    pub configs: Vec<DisplayConfig>,
}

impl Layout {
    pub fn new(configs: Vec<DisplayConfig>) -> Self {
        Self { name: None, configs }
    }

    pub fn named(name: impl Into<String>, configs: Vec<DisplayConfig>) -> Self {
        Self {
            name: Some(name.into()),
            configs,
        }
    }

    /// Collect every quoted descriptor on lines that start with the tool's
    /// command name. Other lines (headers, per-display details) are skipped.
    pub fn parse(raw: &str, syntax: &CommandSyntax) -> Result<Self> {
        let mut configs = Vec::new();
        for line in raw.lines().filter(|l| l.starts_with(syntax.command.as_str())) {
            for descriptor in quoted_segments(line) {
                configs.push(DisplayConfig::decode(descriptor, syntax.unknown_keys)?);
            }
        }
        debug!(displays = configs.len(), "Parsed layout");
        Ok(Self::new(configs))
    }

    /// Encoded descriptors, one per display, unquoted
    pub fn descriptors(&self) -> Vec<String> {
        self.configs.iter().map(ToString::to_string).collect()
    }

    /// Command line that applies this layout; also the stored template form
    pub fn to_command(&self, syntax: &CommandSyntax) -> String {
        std::iter::once(syntax.command.clone())
            .chain(self.descriptors().into_iter().map(|d| format!("\"{d}\"")))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::of(self)
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Name for logs and diagnostics
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed layout")
    }
}

/// Non-empty substrings enclosed in double quotes; an unterminated trailing
/// quote is ignored
fn quoted_segments(line: &str) -> impl Iterator<Item = &str> {
    let parts: Vec<&str> = line.split('"').collect();
    let closed = parts.len().saturating_sub(1);
    parts
        .into_iter()
        .enumerate()
        .filter(move |(i, part)| i % 2 == 1 && *i < closed && !part.is_empty())
        .map(|(_, part)| part)
}

/// Order-independent identity of a layout: which displays exist and where
/// each one sits. Rotation, resolution, refresh rate and scaling are not part
/// of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint(Vec<(String, Origin)>);

impl Footprint {
    pub fn of(layout: &Layout) -> Self {
        let mut entries: Vec<(String, Origin)> = layout
            .configs
            .iter()
            .map(|c| (c.id.clone(), c.origin))
            .collect();
        entries.sort();
        Self(entries)
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(id, origin)| format!("{id}@{origin}")).collect();
        write!(f, "[{}]", parts.join(" "))
    }
}
