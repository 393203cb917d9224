#![forbid(unsafe_code)]

mod config;
mod constants;
mod display;
mod error;
mod launcher;
mod layout;
mod placer;
mod store;
mod switch;

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level as TraceLevel, debug, info, warn};
use tracing_subscriber::FmtSubscriber;

use config::AppConfig;
use constants::launcher::AUTO_ARG;
use launcher::LauncherList;
use layout::{CommandSyntax, Layout};
use placer::DisplayTool;
use store::TemplateStore;
use switch::{Slot, TemplatePair, next_layout};

/// Toggle between two saved display layouts
#[derive(Parser, Debug)]
#[command(name = "dp", version)]
struct Cli {
    /// Append the current layout to the template store instead of switching
    #[arg(short, long, conflicts_with_all = ["launcher", "apply"])]
    save: bool,

    /// Name to store with --save (shown in the launcher list)
    #[arg(short, long, requires = "save")]
    name: Option<String>,

    /// Print the template list as launcher script-filter JSON
    #[arg(short = 'a', long, visible_alias = "alfred", conflicts_with = "apply")]
    launcher: bool,

    /// Print the target command without applying it
    #[arg(short, long)]
    print_only: bool,

    /// Apply a stored command line (a launcher item's arg); "!" switches automatically
    #[arg(long, value_name = "COMMAND")]
    apply: Option<String>,

    /// Template store file [default: ~/.config/dp/templates.txt]
    template_file: Option<PathBuf>,
}

enum Mode {
    Switch,
    Save(Option<String>),
    Launcher,
    Apply(String),
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.save {
            Mode::Save(self.name.clone())
        } else if self.launcher {
            Mode::Launcher
        } else {
            match &self.apply {
                Some(raw) if raw.trim() != AUTO_ARG => Mode::Apply(raw.clone()),
                _ => Mode::Switch,
            }
        }
    }
}

struct App {
    config: AppConfig,
    syntax: CommandSyntax,
    store: TemplateStore,
    tool: DisplayTool,
    print_only: bool,
}

impl App {
    fn new(config: AppConfig, print_only: bool) -> Self {
        Self {
            syntax: config.syntax(),
            store: TemplateStore::new(config.store_path.clone()),
            tool: DisplayTool::new(config.tool.clone()),
            config,
            print_only,
        }
    }

    fn live_layout(&self) -> Result<Layout> {
        let listing = self
            .tool
            .list()
            .context("Failed to read the current display layout")?;
        Layout::parse(&listing, &self.syntax).context("Failed to parse the display tool listing")
    }

    /// Template to apply next; an unrecognized or empty live layout picks the first
    fn next_template(&self) -> Result<(Slot, Layout)> {
        let live = self.live_layout()?;
        if live.is_empty() {
            warn!(tool = %self.config.tool, "Display listing has no command line, treating live layout as unrecognized");
        }
        let templates = self
            .store
            .load(&self.syntax)
            .with_context(|| format!("Failed to load templates from {}", self.store.path().display()))?;
        let pair = TemplatePair::from_templates(templates)?;

        let decision = next_layout(&live, &pair);
        eprintln!("{}", decision.report());
        Ok((decision.slot, decision.layout.clone()))
    }

    fn switch(&self) -> Result<()> {
        let (_, layout) = self.next_template()?;
        self.apply(&layout)
    }

    fn save(&self, name: Option<&str>) -> Result<()> {
        let live = self.live_layout()?;
        if live.is_empty() {
            bail!(
                "`{} list` printed no line starting with '{}', nothing to save",
                self.config.tool,
                self.syntax.command
            );
        }
        self.store
            .save(&live, name, &self.syntax)
            .with_context(|| format!("Failed to save template to {}", self.store.path().display()))
    }

    fn launcher(&self) -> Result<()> {
        let entries = self.store.load_raw()?;
        let json = LauncherList::from_entries(&entries)
            .to_json()
            .context("Failed to serialize launcher items")?;
        println!("{json}");
        Ok(())
    }

    fn apply_command(&self, raw: &str) -> Result<()> {
        let layout = Layout::parse(raw, &self.syntax).context("Failed to parse command to apply")?;
        if layout.is_empty() {
            bail!("no display descriptors found in '{raw}'");
        }
        self.apply(&layout)
    }

    /// Print the command line, then run it unless --print-only
    fn apply(&self, layout: &Layout) -> Result<()> {
        println!("{}", layout.to_command(&self.syntax));
        if self.print_only {
            debug!(layout = layout.label(), "Print-only, not applying");
            return Ok(());
        }
        self.tool.apply(layout)?;
        info!(layout = layout.label(), "Layout applied");
        Ok(())
    }
}

fn init_logging() -> Result<()> {
    // stdout carries the command line or launcher JSON, so logs go to stderr
    let log_level = match std::env::var(constants::env::LOG_LEVEL)
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "info" => TraceLevel::INFO,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.template_file.clone());
    let app = App::new(config, cli.print_only);

    match cli.mode() {
        Mode::Switch => app.switch(),
        Mode::Save(name) => app.save(name.as_deref()),
        Mode::Launcher => app.launcher(),
        Mode::Apply(raw) => app.apply_command(&raw),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
