//! webui-replay - Replay recorded navigation and state scripts
//!
//! Feeds a script of router steps or Files app actions through libwebui and
//! prints where it ends up.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::TryRecvError;

use libwebui::config::Config;
use libwebui::events::{EventBus, EventReceiver};
use libwebui::files::{self, Action, State};
use libwebui::logging::LoggingConfig;
use libwebui::router::{MemoryHistory, PasswordManagerPage, QueryParams, Router};
use libwebui::{StoreAction, WebUiError};

#[derive(Parser, Debug)]
#[command(name = "webui-replay")]
#[command(version)]
#[command(about = "Replay navigation and state scripts")]
#[command(long_about = "\
webui-replay - Replay navigation and state scripts

DESCRIPTION:
    Replays a recorded script against the password manager router or the
    Files app store and prints the final route or state.

COMMANDS:
    route   Drive the router with navigate/params/back/forward steps
    state   Fold Files app actions through the store

SCRIPT FORMAT:
    One JSON object per line. Blank lines are skipped.

    route steps:
        {\"step\":\"navigate\",\"page\":\"checkup\"}
        {\"step\":\"params\",\"params\":{\"q\":\"bank\"}}
        {\"step\":\"back\"}
        {\"step\":\"forward\"}
        {\"step\":\"go\",\"delta\":-2}

    state actions:
        {\"type\":\"search\",\"query\":\"report\",\"status\":\"STARTED\"}
        {\"type\":\"clear-stale-cached-entries\"}

USAGE EXAMPLES:
    webui-replay route --script steps.jsonl
    webui-replay route --script steps.jsonl --url /settings --format json
    webui-replay state --actions actions.jsonl --initial state.json
    webui-replay --trace state --actions actions.jsonl

CONFIGURATION:
    Configuration file: ~/.config/webui/config.toml
    Override with WEBUI_CONFIG or --config.

EXIT CODES:
    0 - Success
    1 - Operation failed (unreadable file, bad configuration)
    3 - Invalid input (malformed script line, unknown page, bad URL)
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Print bus events as JSON lines before the result
    #[arg(long, global = true)]
    trace: bool,

    /// Path to a config file
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay router steps
    Route {
        /// JSONL file of steps
        #[arg(short, long, value_name = "FILE")]
        script: PathBuf,

        /// Initial location (defaults to router.initial_path)
        #[arg(short, long, value_name = "PATH")]
        url: Option<String>,
    },

    /// Replay Files app actions
    State {
        /// JSONL file of actions
        #[arg(short, long, value_name = "FILE")]
        actions: PathBuf,

        /// JSON file with the initial state
        #[arg(short, long, value_name = "FILE")]
        initial: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// One line of a route script
#[derive(Debug, Deserialize)]
#[serde(tag = "step", rename_all = "lowercase")]
enum Step {
    Navigate { page: PasswordManagerPage },
    Params { params: QueryParams },
    Back,
    Forward,
    Go { delta: isize },
}

#[derive(Debug, Serialize)]
struct RouteReport {
    page: PasswordManagerPage,
    query: QueryParams,
    url: String,
    history_length: usize,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let logging = LoggingConfig::from_section(&config.logging, cli.verbose);
    if let Err(e) = logging.try_init() {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    tracing::debug!(?cli, "webui-replay started");

    if let Err(e) = run(&cli, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<WebUiError>()
        .map(WebUiError::exit_code)
        .unwrap_or(1)
}

fn load_config(path: Option<&Path>) -> libwebui::Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load_or_default(),
    }
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    let bus = EventBus::new(config.events.capacity);
    let mut trace = cli.trace.then(|| bus.subscribe());

    let output = match &cli.command {
        Commands::Route { script, url } => {
            let initial = url.as_deref().unwrap_or(&config.router.initial_path);
            replay_route(script, &config.router.origin, initial, bus, trace.as_mut(), cli.format)?
        }
        Commands::State { actions, initial } => {
            replay_state(actions, initial.as_deref(), bus, trace.as_mut(), cli.format)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn replay_route(
    script: &Path,
    origin: &str,
    initial: &str,
    bus: EventBus,
    mut trace: Option<&mut EventReceiver>,
    format: OutputFormat,
) -> Result<String> {
    let steps: Vec<Step> = read_jsonl(script)?;
    let history = MemoryHistory::new(origin, initial)
        .with_context(|| format!("Invalid initial location '{}'", initial))?;
    let router = Router::<PasswordManagerPage>::with_event_bus(Rc::new(history.clone()), bus);
    flush_trace(trace.as_deref_mut())?;

    for step in steps {
        tracing::debug!(?step, "applying step");
        match step {
            Step::Navigate { page } => router.navigate_to(page),
            Step::Params { params } => router.update_router_params(params),
            Step::Back => go(&history, -1),
            Step::Forward => go(&history, 1),
            Step::Go { delta } => go(&history, delta),
        }
        flush_trace(trace.as_deref_mut())?;
    }

    let route = router.current_route();
    let report = RouteReport {
        page: route.page,
        query: route.query_parameters.clone(),
        url: history.current_url(),
        history_length: history.len(),
    };

    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&report).context("Failed to serialize route")
        }
        OutputFormat::Text => Ok(format!(
            "page: {}\nquery: {}\nurl: {}",
            report.page, report.query, report.url
        )),
    }
}

fn go(history: &MemoryHistory, delta: isize) {
    if !history.go(delta) {
        tracing::warn!(delta, index = history.index(), "history step out of range, skipped");
    }
}

fn replay_state(
    actions_path: &Path,
    initial: Option<&Path>,
    bus: EventBus,
    mut trace: Option<&mut EventReceiver>,
    format: OutputFormat,
) -> Result<String> {
    let actions: Vec<Action> = read_jsonl(actions_path)?;
    let initial_state = match initial {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read initial state {}", path.display()))?;
            serde_json::from_str::<State>(&content).map_err(|e| {
                WebUiError::InvalidInput(format!("{}: {}", path.display(), e))
            })?
        }
        None => State::new(),
    };

    let store = files::create_store(initial_state).with_event_bus(bus);
    let count = actions.len();
    for action in actions {
        tracing::debug!(action = action.name(), "applying action");
        store.dispatch(action);
        // Drain after every action; the bus only buffers events.capacity events.
        flush_trace(trace.as_deref_mut())?;
    }

    tracing::info!(actions = count, sequence = store.sequence(), "state replayed");
    let state = store.get_state();

    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&*state).context("Failed to serialize state")
        }
        OutputFormat::Text => {
            let mut lines = vec![
                format!("actions: {}", count),
                format!("entries: {}", state.all_entries.len()),
            ];
            match &state.current_directory {
                Some(current) => lines.push(format!(
                    "directory: {} ({:?})",
                    current.key, current.status
                )),
                None => lines.push("directory: -".to_string()),
            }
            match state.search.as_ref().and_then(|s| s.query.as_deref()) {
                Some(query) => lines.push(format!("search: {}", query)),
                None => lines.push("search: -".to_string()),
            }
            Ok(lines.join("\n"))
        }
    }
}

/// Parse one value per non-blank line
fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;

    let mut items = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item = serde_json::from_str(line).map_err(|e| {
            WebUiError::InvalidInput(format!("{}:{}: {}", path.display(), index + 1, e))
        })?;
        items.push(item);
    }
    Ok(items)
}

fn flush_trace(trace: Option<&mut EventReceiver>) -> Result<()> {
    let Some(receiver) = trace else {
        return Ok(());
    };
    loop {
        match receiver.try_recv() {
            Ok(event) => {
                println!("{}", event.to_json_line().context("Failed to serialize event")?)
            }
            Err(TryRecvError::Lagged(missed)) => {
                tracing::warn!(missed, "trace fell behind, raise events.capacity");
            }
            Err(_) => return Ok(()),
        }
    }
}
