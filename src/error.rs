//! Error taxonomy for descriptor parsing, template switching and the
//! external display tool.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    /// A descriptor token has no `key:value` shape, or a field is missing or invalid
    #[error("malformed display descriptor \"{descriptor}\": {reason}")]
    MalformedConfig { descriptor: String, reason: String },

    #[error("need 2 saved templates to switch, found {found}; run with --save on each layout first")]
    NoTemplates { found: usize },

    /// The display tool could not be started or exited non-zero
    #[error("`{command}` failed: {reason}")]
    ExternalTool { command: String, reason: String },

    /// Template names share a line with the command, split on `|`
    #[error("invalid template name '{0}': must be non-empty and contain no '|' or line breaks")]
    InvalidName(String),

    #[error("template store {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LayoutError {
    pub(crate) fn malformed(descriptor: &str, reason: impl Into<String>) -> Self {
        Self::MalformedConfig {
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;
