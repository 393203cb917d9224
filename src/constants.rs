//! Application-wide constants
//!
//! String literals shared between the descriptor codec, the template store,
//! the launcher output and the CLI.

/// External display tool
pub mod tool {
    /// Default executable name, also the prefix of a command line in its output
    pub const DEFAULT_NAME: &str = "displayplacer";

    /// Argument that makes the tool print the current arrangement
    pub const LIST_ARG: &str = "list";
}

/// Display descriptor keys (`key:value` tokens)
pub mod keys {
    pub const ID: &str = "id";
    pub const RESOLUTION: &str = "res";
    pub const REFRESH_HZ: &str = "hz";
    pub const COLOR_DEPTH: &str = "color_depth";
    pub const SCALING: &str = "scaling";
    pub const ORIGIN: &str = "origin";
    pub const DEGREE: &str = "degree";

    /// Emitted by newer tool versions; validated and dropped
    pub const ENABLED: &str = "enabled";

    pub const SCALING_ON: &str = "on";
    pub const SCALING_OFF: &str = "off";
}

/// Template store location and line format
pub mod store {
    /// Directory under the home directory
    pub const APP_DIR: &str = ".config/dp";

    pub const FILENAME: &str = "templates.txt";

    /// Separates an optional entry name from the raw command
    pub const NAME_SEPARATOR: char = '|';

    /// Label prefix for entries saved without a name
    pub const DEFAULT_NAME_PREFIX: &str = "Layout";
}

/// Launcher script-filter contract
pub mod launcher {
    pub const AUTO_TITLE: &str = "Auto Switch";
    pub const AUTO_SUBTITLE: &str = "Auto switch based on the current config";

    /// `arg` of the auto entry; also accepted by `--apply`
    pub const AUTO_ARG: &str = "!";
    pub const AUTO_AUTOCOMPLETE: &str = "auto";
}

/// Environment variables read once at startup
pub mod env {
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const TEMPLATES: &str = "DP_TEMPLATES";
    pub const TOOL: &str = "DP_TOOL";
    pub const UNKNOWN_KEYS: &str = "DP_UNKNOWN_KEYS";
}
