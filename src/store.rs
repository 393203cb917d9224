//! Flat-file template store
//!
//! One template per line: `name|command` or a bare `command`. Lines are only
//! ever appended; removing a template means editing the file by hand.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::store::{DEFAULT_NAME_PREFIX, NAME_SEPARATOR};
use crate::error::{LayoutError, Result};
use crate::layout::{CommandSyntax, Layout};

/// A stored line split into its display name and raw command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub name: String,
    pub command: String,
}

pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the layout's command line, prefixed with `name|` when given.
    /// Creates the file and its parent directories on first use.
    pub fn save(&self, layout: &Layout, name: Option<&str>, syntax: &CommandSyntax) -> Result<()> {
        let command = layout.to_command(syntax);
        let line = match name {
            Some(name) => {
                validate_name(name)?;
                format!("{name}{NAME_SEPARATOR}{command}\n")
            }
            None => format!("{command}\n"),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        // Single write so one process never leaves a partial line behind
        file.write_all(line.as_bytes())
            .map_err(|source| self.io_error(source))?;

        info!(path = %self.path.display(), name = ?name, displays = layout.configs.len(), "Saved template");
        Ok(())
    }

    /// Every non-blank line in file order. A missing file is an empty store.
    pub fn load_raw(&self) -> Result<Vec<TemplateEntry>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Template store does not exist yet");
                return Ok(Vec::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };
        let entries: Vec<TemplateEntry> = parse_entries(&contents).collect();
        debug!(path = %self.path.display(), count = entries.len(), "Loaded template entries");
        Ok(entries)
    }

    /// Stored templates parsed into named layouts
    pub fn load(&self, syntax: &CommandSyntax) -> Result<Vec<Layout>> {
        self.load_raw()?
            .into_iter()
            .map(|entry| {
                let parsed = Layout::parse(&entry.command, syntax)?;
                Ok(Layout::named(entry.name, parsed.configs))
            })
            .collect()
    }

    fn io_error(&self, source: std::io::Error) -> LayoutError {
        LayoutError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Split store contents into entries. Unnamed lines get `Layout <n>`, where
/// `n` counts non-blank lines from zero.
pub fn parse_entries(contents: &str) -> impl Iterator<Item = TemplateEntry> + '_ {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            let (name, command) = match line.split_once(NAME_SEPARATOR) {
                Some((name, command)) if !name.trim().is_empty() => (name.trim().to_string(), command),
                Some((_, command)) => (default_name(index), command),
                None => (default_name(index), line),
            };
            TemplateEntry {
                name,
                command: command.trim().to_string(),
            }
        })
}

fn default_name(index: usize) -> String {
    format!("{DEFAULT_NAME_PREFIX} {index}")
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.contains(NAME_SEPARATOR) || name.contains(['\n', '\r']) {
        return Err(LayoutError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DisplayConfig, Origin, Resolution, UnknownKeyPolicy};

    fn syntax() -> CommandSyntax {
        CommandSyntax::for_tool("displayplacer", UnknownKeyPolicy::Reject)
    }

    /// Fresh store path under the system temp dir; removed on drop
    struct TempStore {
        dir: PathBuf,
        store: TemplateStore,
    }

    impl TempStore {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("dp-store-{}-{tag}", std::process::id()));
            let _ = fs::remove_dir_all(&dir);
            let store = TemplateStore::new(dir.join("nested").join("templates.txt"));
            Self { dir, store }
        }
    }

    impl Drop for TempStore {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }

    fn layout(width: u32, x: i32) -> Layout {
        Layout::new(vec![
            DisplayConfig::new("1", Resolution::new(width, 1080)),
            DisplayConfig {
                origin: Origin::new(x, 0),
                ..DisplayConfig::new("2", Resolution::new(1920, 1080))
            },
        ])
    }

    #[test]
    fn test_parse_entries_names_and_defaults() {
        let contents = "Home|displayplacer \"id:1 res:1920x1080\"\n\
                        \n\
                        displayplacer \"id:1 res:800x600\"\n\
                        \x20 Office |displayplacer \"id:1 res:2560x1440\"\n\
                        |displayplacer \"id:2 res:800x600\"\n";
        let entries: Vec<TemplateEntry> = parse_entries(contents).collect();

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].name, "Home");
        assert_eq!(entries[0].command, "displayplacer \"id:1 res:1920x1080\"");
        assert_eq!(entries[1].name, "Layout 1");
        assert_eq!(entries[1].command, "displayplacer \"id:1 res:800x600\"");
        assert_eq!(entries[2].name, "Office");
        assert_eq!(entries[3].name, "Layout 3");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let tmp = TempStore::new("missing");
        assert!(tmp.store.load_raw().unwrap().is_empty());
        assert!(tmp.store.load(&syntax()).unwrap().is_empty());
        assert!(!tmp.store.path().exists());
    }

    #[test]
    fn test_save_appends_in_order() {
        let tmp = TempStore::new("append");
        let first = layout(1920, 1920);
        let second = layout(2560, -1920);

        tmp.store.save(&first, None, &syntax()).unwrap();
        tmp.store.save(&second, None, &syntax()).unwrap();

        let raw = tmp.store.load_raw().unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].command, first.to_command(&syntax()));
        assert_eq!(raw[1].command, second.to_command(&syntax()));

        let loaded = tmp.store.load(&syntax()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].configs, first.configs);
        assert_eq!(loaded[1].configs, second.configs);
        assert_eq!(loaded[0].name.as_deref(), Some("Layout 0"));
        assert_eq!(loaded[1].name.as_deref(), Some("Layout 1"));
    }

    #[test]
    fn test_save_with_name() {
        let tmp = TempStore::new("named");
        tmp.store.save(&layout(1920, 1920), Some("Desk"), &syntax()).unwrap();

        let contents = fs::read_to_string(tmp.store.path()).unwrap();
        assert!(contents.starts_with("Desk|displayplacer \"id:1 "));
        assert!(contents.ends_with('\n'));

        let loaded = tmp.store.load(&syntax()).unwrap();
        assert_eq!(loaded[0].name.as_deref(), Some("Desk"));
    }

    #[test]
    fn test_save_rejects_bad_names() {
        let tmp = TempStore::new("badname");
        for name in ["a|b", "", "  ", "two\nlines"] {
            let err = tmp.store.save(&layout(1920, 1920), Some(name), &syntax()).unwrap_err();
            assert!(matches!(err, LayoutError::InvalidName(_)));
        }
        assert!(!tmp.store.path().exists());
    }

    #[test]
    fn test_load_propagates_malformed_template() {
        let tmp = TempStore::new("malformed");
        fs::create_dir_all(tmp.store.path().parent().unwrap()).unwrap();
        fs::write(tmp.store.path(), "Broken|displayplacer \"id:1 res:axb\"\n").unwrap();

        assert_eq!(tmp.store.load_raw().unwrap().len(), 1);
        assert!(matches!(
            tmp.store.load(&syntax()),
            Err(LayoutError::MalformedConfig { .. })
        ));
    }
}
