//! Interactive mode command
//!
//! A line-oriented navigation shell: each input line is one navigation
//! event, handled to completion before the next line is read.

use crate::config::CliConfigLoader;
use crate::output::{format_rendered, format_table};
use crate::pages::shell_builder;
use anyhow::Result;
use sheetnav_core::analytics::{MemorySink, PageView, PageViewSink, TracingSink};
use sheetnav_core::{Params, PageViewTracker, SiteShell};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const HELP: &str = "\
Commands:
  go <path>                 navigate to a path (a bare /path works too)
  open <name> [key=value]…  navigate to a named route
  back                      return to the previous page
  current                   show the current route
  routes                    list the route table
  stats                     page views recorded this session
  help                      show this help
  quit                      leave the shell";

/// Logs page views and keeps them for the `stats` command
#[derive(Clone, Default)]
struct SessionSink {
    memory: MemorySink,
}

impl PageViewSink for SessionSink {
    fn send(&self, view: &PageView) -> anyhow::Result<()> {
        TracingSink.send(view)?;
        self.memory.send(view)
    }
}

/// A parsed shell line
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Go(String),
    Open(String, Params),
    Back,
    Current,
    Routes,
    Stats,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_line(line: &str) -> ShellCommand {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return ShellCommand::Empty;
    };

    match first {
        path if path.starts_with('/') => ShellCommand::Go(path.to_string()),
        "go" => match words.next() {
            Some(path) => ShellCommand::Go(path.to_string()),
            None => ShellCommand::Unknown("go needs a path".into()),
        },
        "open" => match words.next() {
            Some(name) => {
                let mut params = Params::new();
                for pair in words {
                    match pair.split_once('=') {
                        Some((key, value)) => {
                            params.insert(key.to_string(), value.to_string());
                        }
                        None => {
                            return ShellCommand::Unknown(format!(
                                "expected key=value, got '{}'",
                                pair
                            ))
                        }
                    }
                }
                ShellCommand::Open(name.to_string(), params)
            }
            None => ShellCommand::Unknown("open needs a route name".into()),
        },
        "back" => ShellCommand::Back,
        "current" => ShellCommand::Current,
        "routes" => ShellCommand::Routes,
        "stats" => ShellCommand::Stats,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => ShellCommand::Unknown(format!("unknown command '{}'", other)),
    }
}

/// Start interactive mode
pub async fn interactive_command(loader: CliConfigLoader, start: Option<String>) -> Result<()> {
    let loaded = loader.load().await?;
    debug!("Using configuration from {}", loaded.source);

    let site = loaded.site;
    let sink = SessionSink::default();
    let tracker = PageViewTracker::from_config(&site.analytics, Box::new(sink.clone()))?;
    let tracking = tracker.is_some();

    let title = site.title.clone();
    let router = site.into_router()?;
    let mut builder = shell_builder(router, &title);
    if let Some(tracker) = tracker {
        info!("Page-view analytics enabled");
        builder = builder.observe(Box::new(tracker));
    }
    let shell = builder.build();

    println!("{} - type `help` for commands", title);
    println!("{}", format_rendered(&shell.visit(start.as_deref().unwrap_or("/"))));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !run_line(&shell, &sink, tracking, &line) {
            break;
        }
    }

    Ok(())
}

/// Handle one line; returns `false` when the shell should exit
fn run_line(shell: &SiteShell, sink: &SessionSink, tracking: bool, line: &str) -> bool {
    match parse_line(line) {
        ShellCommand::Go(path) => println!("{}", format_rendered(&shell.visit(&path))),
        ShellCommand::Open(name, params) => match shell.open(&name, &params) {
            Ok(rendered) => println!("{}", format_rendered(&rendered)),
            Err(error) => println!("error: {}", error),
        },
        ShellCommand::Back => match shell.back() {
            Some(rendered) => println!("{}", format_rendered(&rendered)),
            None => println!("Nothing to go back to"),
        },
        ShellCommand::Current => match shell.handle().current_route() {
            Some(route) => println!("{} ({}) {}", route.full_path, route.name, route.page),
            None => println!("No current route"),
        },
        ShellCommand::Routes => println!("{}", format_table(shell.handle().table().records())),
        ShellCommand::Stats => {
            if tracking {
                println!("Page views this session: {}", sink.memory.len());
            } else {
                println!("Analytics disabled");
            }
        }
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => return false,
        ShellCommand::Empty => {}
        ShellCommand::Unknown(message) => println!("{} (try `help`)", message),
    }
    true
}
