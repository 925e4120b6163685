//! memlist command-line front-end.
//!
//! Wires config → logging → store → seed → live list controller and renders
//! the applied snapshot to stdout.

mod terminal;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use memlist_core::{
    init_logging, seed_if_needed, AppConfig, DetailViewer, GroupedQuery, Memory, MemoryId,
    MemoryListController, MemoryStore, OverflowPolicy, SectionLayout,
};
use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use terminal::{render, TerminalNavigator, TerminalSurface};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "memlist")]
#[command(version)]
#[command(about = "Browse a sectioned list of saved memory links", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, default_value = "memlist.toml")]
    config: PathBuf,

    /// Override the database path
    #[arg(long)]
    db: Option<PathBuf>,

    /// Override the log directory (absolute path)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Override the log level
    #[arg(long)]
    log_level: Option<String>,

    /// Section layout: single | grouped
    #[arg(long, value_parser = parse_layout)]
    layout: Option<SectionLayout>,

    /// Overflow policy: drop | reject | merge_into_last
    #[arg(long, value_parser = parse_overflow)]
    overflow: Option<OverflowPolicy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the sectioned list
    List,
    /// Open the memory at a section/row position
    Open { section: usize, row: usize },
    /// Add a memory and print the updated list
    Add {
        title: String,
        category: String,
        url: String,
    },
    /// Remove a memory by id and print the updated list
    Remove { id: String },
    /// Open the database and print core health and version
    Ping,
}

fn parse_layout(value: &str) -> Result<SectionLayout, String> {
    SectionLayout::parse(value).ok_or_else(|| format!("unknown layout `{value}`"))
}

fn parse_overflow(value: &str) -> Result<OverflowPolicy, String> {
    OverflowPolicy::parse(value).ok_or_else(|| format!("unknown overflow policy `{value}`"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args)?;
    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(config.effective_log_level(), log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    let mut store = MemoryStore::open(&config.db_path)
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
    seed_if_needed(&mut store);

    let controller = Rc::new(RefCell::new(MemoryListController::new(
        TerminalSurface::default(),
        config.list.layout,
        config.list.overflow,
    )));
    store.subscribe(GroupedQuery::all(), controller.clone());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::List => {}
        Command::Open { section, row } => {
            let url = controller.borrow().select(&store, section, row)?;
            let mut viewer = DetailViewer::new(url);
            viewer.activate(&mut TerminalNavigator::new(&mut out));
            return Ok(());
        }
        Command::Add {
            title,
            category,
            url,
        } => {
            let url = Url::parse(&url).with_context(|| format!("invalid url `{url}`"))?;
            let id = store.insert(&Memory::new(title, category, url))?;
            writeln!(out, "added {id}")?;
        }
        Command::Remove { id } => {
            let id = MemoryId::parse_str(&id).map_err(|err| anyhow!("invalid id `{id}`: {err}"))?;
            store.delete(id)?;
            writeln!(out, "removed {id}")?;
        }
        Command::Ping => {
            writeln!(out, "memlist_core ping={}", memlist_core::ping())?;
            writeln!(out, "memlist_core version={}", memlist_core::core_version())?;
            return Ok(());
        }
    }

    render(&mut out, &controller.borrow(), &store)?;
    Ok(())
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = AppConfig::load_or_default(&args.config)?;
    if let Some(db) = &args.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &args.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &args.log_level {
        config.log_level = Some(level.clone());
    }
    if let Some(layout) = args.layout {
        config.list.layout = layout;
    }
    if let Some(overflow) = args.overflow {
        config.list.overflow = overflow;
    }
    Ok(config)
}
