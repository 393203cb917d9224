//! External display tool
//!
//! The tool prints the current arrangement for `<tool> list` and applies one
//! when given a quoted descriptor per display. Descriptors are passed as
//! separate arguments, so no shell is involved.

use std::process::{Command, Output};
use tracing::{debug, info};

use crate::constants::tool::LIST_ARG;
use crate::error::{LayoutError, Result};
use crate::layout::Layout;

pub struct DisplayTool {
    program: String,
}

impl DisplayTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    /// Raw listing output; blocks until the tool exits
    pub fn list(&self) -> Result<String> {
        let output = self.run(&[LIST_ARG.to_string()])?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(bytes = stdout.len(), "Captured display listing");
        Ok(stdout)
    }

    pub fn apply(&self, layout: &Layout) -> Result<()> {
        let args = layout.descriptors();
        info!(program = %self.program, displays = args.len(), layout = layout.label(), "Applying layout");
        let output = self.run(&args)?;
        if !output.stdout.is_empty() {
            debug!(stdout = %String::from_utf8_lossy(&output.stdout).trim_end(), "Display tool output");
        }
        Ok(())
    }

    fn run(&self, args: &[String]) -> Result<Output> {
        let command = self.describe(args);
        debug!(command = %command, "Running display tool");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| LayoutError::ExternalTool {
                command: command.clone(),
                reason: format!("could not start: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"));
            let reason = match stderr.trim() {
                "" => code,
                msg => format!("{code}: {msg}"),
            };
            return Err(LayoutError::ExternalTool { command, reason });
        }
        Ok(output)
    }

    fn describe(&self, args: &[String]) -> String {
        std::iter::once(self.program.clone())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
