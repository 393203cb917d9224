//! Runtime configuration, resolved once at startup
//!
//! Precedence for the template store path: CLI argument, then `DP_TEMPLATES`,
//! then `~/.config/dp/templates.txt`. The display tool and unknown-key policy
//! come from the environment only.

use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::{env as env_vars, store, tool};
use crate::display::UnknownKeyPolicy;
use crate::layout::CommandSyntax;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store_path: PathBuf,
    /// Display tool executable (name on PATH or absolute path)
    pub tool: String,
    pub unknown_keys: UnknownKeyPolicy,
}

impl AppConfig {
    pub fn load(cli_path: Option<PathBuf>) -> Self {
        Self::from_sources(cli_path, |key| env::var(key).ok(), dirs::home_dir())
    }

    /// Resolve from explicit sources; `lookup` stands in for the environment
    pub fn from_sources(
        cli_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Self {
        let home = home.unwrap_or_else(|| PathBuf::from("."));
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_path = cli_path
            .or_else(|| non_empty(env_vars::TEMPLATES).map(PathBuf::from))
            .map(|p| expand_home(&p, &home))
            .unwrap_or_else(|| home.join(store::APP_DIR).join(store::FILENAME));

        let tool = non_empty(env_vars::TOOL).unwrap_or_else(|| tool::DEFAULT_NAME.to_string());

        let unknown_keys = match non_empty(env_vars::UNKNOWN_KEYS) {
            Some(raw) => raw.parse::<UnknownKeyPolicy>().unwrap_or_else(|e| {
                warn!(var = env_vars::UNKNOWN_KEYS, error = %e, "Invalid value, using reject");
                UnknownKeyPolicy::Reject
            }),
            None => UnknownKeyPolicy::Reject,
        };

        let config = Self {
            store_path,
            tool,
            unknown_keys,
        };
        info!(store = %config.store_path.display(), tool = %config.tool, unknown_keys = ?config.unknown_keys, "Resolved configuration");
        config
    }

    pub fn syntax(&self) -> CommandSyntax {
        CommandSyntax::for_tool(&self.tool, self.unknown_keys)
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
