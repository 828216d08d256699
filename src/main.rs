//! vdfkit: inspect VDF files and manage the family-sharing device order.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use vdfkit::catalog::{app, index, package};
use vdfkit::config::Config;
use vdfkit::shares::ShareSet;
use vdfkit::{Error, IdFilter, TextDocument};

#[derive(Parser)]
#[command(name = "vdfkit")]
#[command(about = "Inspect VDF files and reorder family-sharing lenders", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Steam data directory (overrides vdfkit.toml)
    #[arg(long, global = true, value_name = "DIR")]
    steam_path: Option<String>,

    /// File holding disabled shares (overrides vdfkit.toml)
    #[arg(long, global = true, value_name = "FILE")]
    disabled_file: Option<String>,

    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print a text VDF file as JSON
    Dump {
        /// File to read
        path: PathBuf,
        /// Slash-separated section path to print instead of the whole tree
        #[arg(long, value_name = "KEYS")]
        at: Option<String>,
    },
    /// Decode the app catalog (appinfo)
    Apps {
        /// Catalog file (defaults to the Steam appcache)
        path: Option<PathBuf>,
        /// Only decode these app ids
        #[arg(long = "id", value_name = "APPID")]
        ids: Vec<u32>,
    },
    /// Decode the package catalog (packageinfo)
    Packages {
        /// Catalog file (defaults to the Steam appcache)
        path: Option<PathBuf>,
        /// Only keep these package ids
        #[arg(long = "id", value_name = "PACKAGEID")]
        ids: Vec<u32>,
    },
    /// Show or change which lenders are enabled and in what order
    Shares {
        #[command(subcommand)]
        action: ShareAction,
    },
    /// Show which lenders' packages grant the given apps
    Locate {
        /// App ids to look up
        #[arg(required = true, value_name = "APPID")]
        apps: Vec<u32>,
    },
}

#[derive(Subcommand)]
enum ShareAction {
    /// List shares in priority order
    List,
    /// Enable, disable or reorder shares and rewrite both files
    Set {
        /// Shares to enable
        #[arg(long, short = 'e', value_name = "SHARE", num_args = 1..)]
        enable: Vec<String>,
        /// Shares to disable
        #[arg(long, short = 'd', value_name = "SHARE", num_args = 1..)]
        disable: Vec<String>,
        /// Enable all shares not explicitly disabled
        #[arg(long, short = 'E', conflicts_with = "disable_others")]
        enable_others: bool,
        /// Disable all shares not explicitly enabled
        #[arg(long, short = 'D')]
        disable_others: bool,
        /// Shares to put on top of the priority list
        #[arg(long, short = 'H', value_name = "SHARE", num_args = 1..)]
        high: Vec<String>,
        /// Shares to put at the bottom of the priority list
        #[arg(long, short = 'L', value_name = "SHARE", num_args = 1..)]
        low: Vec<String>,
        /// Print the edit plans as JSON instead of writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Serialize)]
struct Located<'a> {
    app: u32,
    name: Option<&'a str>,
    sources: Vec<index::Source>,
}

fn init_logging(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: logging was already initialised");
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> vdfkit::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{json}");
    Ok(())
}

fn refs(ids: &[String]) -> Vec<&str> {
    ids.iter().map(String::as_str).collect()
}

fn run(args: Args) -> vdfkit::Result<()> {
    let mut cfg = Config::load();

    // Override config with command line args
    if let Some(steam_path) = args.steam_path {
        cfg.steam_path = steam_path;
    }
    if let Some(disabled_file) = args.disabled_file {
        cfg.disabled_file = disabled_file;
    }

    match args.command {
        Command::Dump { path, at } => {
            let doc = TextDocument::load(&path)?;
            match at {
                None => print_json(doc.root()),
                Some(keys) => {
                    let keys: Vec<&str> = keys.split('/').filter(|k| !k.is_empty()).collect();
                    let section = doc
                        .root()
                        .path(&keys)
                        .ok_or_else(|| Error::MissingSection(keys.join("/")))?;
                    print_json(section)
                }
            }
        }
        Command::Apps { path, ids } => {
            let path = path.unwrap_or_else(|| cfg.appinfo_vdf());
            print_json(&app::read_path(path, &IdFilter::only(ids))?)
        }
        Command::Packages { path, ids } => {
            let path = path.unwrap_or_else(|| cfg.packageinfo_vdf());
            print_json(&package::read_path(path, &IdFilter::only(ids))?)
        }
        Command::Shares { action } => {
            let mut set = ShareSet::load(cfg.config_vdf(), cfg.disabled_vdf())?;
            match action {
                ShareAction::List => print_json(set.shares()),
                ShareAction::Set {
                    enable,
                    disable,
                    enable_others,
                    disable_others,
                    high,
                    low,
                    dry_run,
                } => {
                    if enable_others || disable_others {
                        set.set_all(enable_others);
                    }
                    set.enable(&refs(&enable))?;
                    set.disable(&refs(&disable))?;
                    set.prioritize(&refs(&high), &refs(&low))?;
                    if dry_run {
                        let (config_plan, disabled_plan) = set.plans()?;
                        print_json(&serde_json::json!({
                            "config": config_plan,
                            "disabled": disabled_plan,
                        }))
                    } else {
                        set.write()?;
                        let set = ShareSet::load(cfg.config_vdf(), cfg.disabled_vdf())?;
                        print_json(set.shares())
                    }
                }
            }
        }
        Command::Locate { apps } => {
            let set = ShareSet::load(cfg.config_vdf(), cfg.disabled_vdf())?;
            let owners = set.licenses(|id| cfg.localconfig_vdf(id));
            let packages = package::read_path(cfg.packageinfo_vdf(), &IdFilter::all())?;
            let by_app = index::app_packages(&packages);
            let catalog = app::read_path(cfg.appinfo_vdf(), &IdFilter::only(apps.iter().copied()))?;
            let located: Vec<Located> = apps
                .iter()
                .map(|&id| Located {
                    app: id,
                    name: catalog.records.get(&id).and_then(index::app_name),
                    sources: index::sources(&by_app, &owners, id),
                })
                .collect();
            print_json(&located)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error ({}): {e}", e.category());
            ExitCode::FAILURE
        }
    }
}
