//! Padlight - command-line front end
//!
//! Inspects and edits named button-grid configurations, and simulates button
//! presses against an in-memory strip bank.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use padlight::command::{self, split_fields, FallbackEvaluator};
use padlight::core::error::{PadError, Result};
use padlight::core::types::{GridPos, SystemClock, GRID_SIZE};
use padlight::core::PadConfig;
use padlight::grid::{self, palette, ApplyContext, ConfigStore, EditorForm, StripTab};
use padlight::lighting::StripBank;
use padlight::namespace::{FxCatalog, Namespace};
use padlight::trigger::{HttpTrigger, LoggedExecutor, LoggedTrigger, ReqwestTrigger};

#[derive(Parser, Debug)]
#[command(name = "padlight")]
#[command(about = "Configure and test button-grid lighting commands")]
struct Args {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse command text and print its canonical form
    Parse {
        text: String,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Evaluate text with the fallback evaluator (display only)
    Eval { text: String },
    /// List saved configurations
    List,
    /// Create a new configuration
    New { name: String },
    /// Show a configuration's colors, or one button's strip tabs
    Show {
        name: String,
        #[arg(requires = "col")]
        row: Option<usize>,
        col: Option<usize>,
    },
    /// Set one strip's binding on a button
    Set {
        name: String,
        row: usize,
        col: usize,
        #[arg(long)]
        strip: usize,
        #[arg(long)]
        effect: Option<String>,
        /// Comma-separated argument tokens
        #[arg(long)]
        effect_args: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        color_args: Option<String>,
        #[arg(long)]
        misc: Option<String>,
    },
    /// Remove one strip's binding from a button
    Clear {
        name: String,
        row: usize,
        col: usize,
        #[arg(long)]
        strip: usize,
    },
    /// Press a button and print the resulting strip bindings
    Press {
        name: String,
        row: usize,
        col: usize,
        /// Send HTTP triggers instead of only logging them
        #[arg(long)]
        http: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "padlight=debug" } else { "padlight=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = match &args.config {
        Some(path) => PadConfig::load(path)?,
        None => PadConfig::new(),
    };
    let namespace = load_namespace(&config)?;
    let store = ConfigStore::new(&config.config_dir);

    match args.command {
        Cmd::Parse { text, format } => cmd_parse(&text, &format, &namespace),
        Cmd::Eval { text } => {
            let evaluated = FallbackEvaluator::new(&namespace, &SystemClock).evaluate(&text)?;
            if evaluated.expr.is_time_dependent() {
                println!("{}  (reads the clock; display only)", evaluated.value);
            } else {
                println!("{}", evaluated.value);
            }
            for name in &evaluated.self_bound {
                println!("  unknown identifier bound to itself: {}", name);
            }
            Ok(())
        }
        Cmd::List => {
            for name in store.list_names()? {
                println!("{}", name);
            }
            Ok(())
        }
        Cmd::New { name } => {
            store.create(&name, config.grid_init)?;
            println!("Created {}", store.path_for(name.trim()).display());
            Ok(())
        }
        Cmd::Show { name, row, col } => cmd_show(&store, &name, row.zip(col), &namespace),
        Cmd::Set {
            name,
            row,
            col,
            strip,
            effect,
            effect_args,
            color,
            color_args,
            misc,
        } => {
            let edit = |tab: &mut StripTab| -> Result<()> {
                if let Some(effect) = &effect {
                    tab.effect = effect.clone();
                }
                if let Some(args) = &effect_args {
                    tab.effect_args = split_arg_list(args)?;
                }
                if let Some(color) = &color {
                    tab.color = color.clone();
                }
                if let Some(args) = &color_args {
                    tab.color_args = split_arg_list(args)?;
                }
                if let Some(misc) = &misc {
                    tab.misc = misc.clone();
                }
                Ok(())
            };
            cmd_edit(&store, &name, GridPos::new(row, col), &namespace, |form| {
                edit(form.entry(strip).or_default())
            })
        }
        Cmd::Clear { name, row, col, strip } => {
            cmd_edit(&store, &name, GridPos::new(row, col), &namespace, |form| {
                if form.remove(&strip).is_none() {
                    tracing::warn!("Strip {} had no binding on this button", strip);
                }
                Ok(())
            })
        }
        Cmd::Press { name, row, col, http } => {
            let mut trigger: Box<dyn HttpTrigger> = if http {
                Box::new(ReqwestTrigger::from_config(&config)?)
            } else {
                Box::new(LoggedTrigger::new())
            };
            cmd_press(&store, &name, GridPos::new(row, col), &config, &namespace, trigger.as_mut())
        }
    }
}

fn load_namespace(config: &PadConfig) -> Result<Namespace> {
    match &config.catalog_path {
        Some(path) => {
            let catalog = FxCatalog::load_from_toml(path).map_err(|e| PadError::Config(e.to_string()))?;
            tracing::info!(
                "Loaded {} effects and {} colors from {}",
                catalog.effects().len(),
                catalog.colors().len(),
                path.display()
            );
            Ok(Namespace::from_provider(&catalog))
        }
        None => Ok(Namespace::builtin()),
    }
}

fn split_arg_list(text: &str) -> Result<Vec<String>> {
    let text = text.trim();
    let body = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(text);
    Ok(split_fields(body)?.into_iter().map(String::from).collect())
}

fn cmd_parse(text: &str, format: &str, namespace: &Namespace) -> Result<()> {
    let outcome = command::parse_command_list(text, namespace, &SystemClock);
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome.commands)?),
        _ => {
            println!("path: {:?}", outcome.path);
            println!("{}", command::serialize(&outcome.commands));
        }
    }
    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}

fn cmd_show(
    store: &ConfigStore,
    name: &str,
    pos: Option<(usize, usize)>,
    namespace: &Namespace,
) -> Result<()> {
    let grid = store.load(name)?;

    let Some((row, col)) = pos else {
        for row in (0..GRID_SIZE).rev() {
            let line: Vec<String> = (0..GRID_SIZE)
                .filter_map(|col| grid.cell(GridPos::new(row, col)))
                .map(|cell| {
                    let mark = if cell.command_text.is_some() { '*' } else { ' ' };
                    format!("{}{}", palette::display_hex(cell), mark)
                })
                .collect();
            println!("{}", line.join(" "));
        }
        return Ok(());
    };

    let cell = grid
        .cell(GridPos::new(row, col))
        .ok_or(PadError::InvalidPosition { row, col })?;
    println!("color: {} ({})", cell.color(), palette::hex_for(cell.color()));
    println!("active: {}", cell.active);
    println!("http: {}", cell.aux_trigger.as_deref().unwrap_or("-"));
    println!("misc: {}", cell.legacy_misc.as_deref().unwrap_or("-"));
    println!("commands: {}", cell.command_text.as_deref().unwrap_or("-"));

    for (strip, tab) in grid::load_into_editor(cell, namespace) {
        println!("strip {}:", strip);
        println!("  effect {}", if tab.effect.is_empty() { "-" } else { &tab.effect });
        for slot in tab.effect_slots(namespace) {
            println!("    {} = {} (default {})", slot.name, slot.value, slot.default.as_deref().unwrap_or("-"));
        }
        println!("  color {}", if tab.color.is_empty() { "-" } else { &tab.color });
        for slot in tab.color_slots(namespace) {
            println!("    {} = {} (default {})", slot.name, slot.value, slot.default.as_deref().unwrap_or("-"));
        }
        if !tab.misc.is_empty() {
            println!("  misc {}", tab.misc);
        }
    }
    Ok(())
}

fn cmd_edit(
    store: &ConfigStore,
    name: &str,
    pos: GridPos,
    namespace: &Namespace,
    edit: impl FnOnce(&mut EditorForm) -> Result<()>,
) -> Result<()> {
    let mut grid = store.load(name)?;
    let cell = grid
        .cell(pos)
        .ok_or(PadError::InvalidPosition { row: pos.row, col: pos.col })?;
    let mut form = grid::load_into_editor(cell, namespace);
    edit(&mut form)?;

    let text = grid::commit_from_editor(&form, &mut grid, pos, store, name)?;
    println!("{}", text.as_deref().unwrap_or("(no commands)"));
    Ok(())
}

fn cmd_press(
    store: &ConfigStore,
    name: &str,
    pos: GridPos,
    config: &PadConfig,
    namespace: &Namespace,
    http: &mut dyn HttpTrigger,
) -> Result<()> {
    let mut grid = store.load(name)?;
    let mut bank = StripBank::from_config(config);
    let mut exec = LoggedExecutor::new();
    let clock = SystemClock;
    let ctx = ApplyContext::new(namespace, config.tempo(), &clock);

    let report = grid::press_button(&mut grid, pos, &ctx, &mut bank, http, &mut exec)?;

    println!("path: {:?}, strips bound: {}", report.path, report.strips_bound);
    for (i, strip) in bank.strips().iter().enumerate() {
        println!(
            "strip {}: {}{:?} / {}{:?}",
            i, strip.effect, strip.effect_args, strip.color, strip.color_args
        );
    }
    for text in exec.received() {
        println!("misc: {}", text);
    }
    for problem in &report.problems {
        eprintln!("problem: {}", problem);
    }
    Ok(())
}
