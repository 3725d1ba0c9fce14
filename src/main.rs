//! Lotsift CLI application entry point
//!
//! Runs the result pipeline over item pages saved as JSON and prints the
//! view list, statistics or tag counts.
//!
//! # Usage
//!
//! ```bash
//! # Canon listings without junk, cheapest first
//! lotsift filter page1.json page2.json -i canon --no-junk --sort price-asc
//!
//! # Price histogram for one band, as JSON
//! lotsift stats page1.json --band 0-10000 --format json
//!
//! # Tag counts over a search
//! lotsift tags page1.json
//! ```
//!
//! # Configuration
//!
//! Settings are read from the user's config directory
//! (`~/.config/lotsift/config.toml` on Linux) and `LOTSIFT_*` variables.
//! Logging goes to stderr; raise it with `-v` or `LOTSIFT_LOG`.

use clap::CommandFactory;
use lotsift::{
    LotsiftError,
    cli::{Cli, Commands, ConfigCommands, FilterArgs, OutputFormat, load_pages},
    config::LotsiftConfig,
    explorer::Explorer,
    logging, output,
    taxonomy::{Tag, TagSource},
};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;

type Result<T> = std::result::Result<T, LotsiftError>;

/// Settings resolved from config file, environment and global flags
struct Context {
    config: LotsiftConfig,
    format: OutputFormat,
    quiet: bool,
}

impl Context {
    fn explorer(&self) -> Result<Explorer> {
        Explorer::from_config(&self.config)
    }
}

fn handle_filter_command(
    ctx: &Context,
    files: &[PathBuf],
    filter_args: &FilterArgs,
    limit: Option<usize>,
    selected_only: bool,
) -> Result<()> {
    let mut explorer = ctx.explorer()?;
    let loaded = load_pages(&mut explorer, files)?;
    filter_args.apply_to(&mut explorer);

    let view = explorer.view();
    let items = if selected_only {
        explorer.selected_items()
    } else {
        view.to_vec()
    };
    let shown = &items[..limit.map_or(items.len(), |n| n.min(items.len()))];

    if !ctx.quiet && ctx.format == OutputFormat::Text {
        let badges: Vec<String> = explorer.active_filters().iter().map(output::badge).collect();
        if !badges.is_empty() {
            println!("{}", badges.join(" "));
        }
        println!(
            "{} of {loaded} items ({} selected)",
            view.len(),
            explorer.selection().len()
        );
    }

    let mut stdout = io::stdout().lock();
    output::write_items(
        &mut stdout,
        shown,
        explorer.tag_index(),
        explorer.currency(),
        ctx.format,
        ctx.quiet,
    )?;

    if !ctx.quiet && ctx.format == OutputFormat::Text && explorer.filter().is_active() {
        writeln!(stdout, "\n{}", explorer.filter())?;
    }
    Ok(())
}

fn handle_stats_command(ctx: &Context, files: &[PathBuf], filter_args: &FilterArgs) -> Result<()> {
    let mut explorer = ctx.explorer()?;
    load_pages(&mut explorer, files)?;
    filter_args.apply_to(&mut explorer);

    let baseline = explorer.baseline_stats();
    let filtered = explorer.filtered_stats();
    output::write_stats(
        &mut io::stdout().lock(),
        baseline.as_deref(),
        filtered.as_deref(),
        &explorer.active_filters(),
        explorer.currency(),
        ctx.format,
    )
}

fn handle_tags_command(ctx: &Context, files: &[PathBuf]) -> Result<()> {
    let mut explorer = ctx.explorer()?;
    load_pages(&mut explorer, files)?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in explorer.items() {
        for tag in explorer.tag_index().tags_for(item) {
            *counts.entry(tag.keyword.as_str()).or_default() += 1;
        }
    }

    let rows: Vec<(&Tag, usize)> = explorer
        .taxonomy()
        .tags
        .iter()
        .map(|tag| (tag, counts.get(tag.keyword.as_str()).copied().unwrap_or(0)))
        .collect();

    output::write_tag_counts(&mut io::stdout().lock(), &rows, ctx.format, ctx.quiet)
}

fn handle_config_command(ctx: &Context, path: Option<PathBuf>, command: &ConfigCommands) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => LotsiftConfig::config_path()?,
    };

    match command {
        ConfigCommands::Show => {
            let text = toml::to_string_pretty(&ctx.config)
                .map_err(|e| LotsiftError::InvalidInput(format!("Failed to serialize config: {e}")))?;
            print!("{text}");
        }
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                return Err(LotsiftError::InvalidInput(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            LotsiftConfig::default().save_to(&path)?;
            if !ctx.quiet {
                println!("Wrote {}", path.display());
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let mut config = match &cli.config {
        Some(path) => LotsiftConfig::load_from(path)?,
        None => LotsiftConfig::load()?,
    };
    if let Some(taxonomy) = &cli.taxonomy {
        config.taxonomy_path = Some(taxonomy.clone());
    }
    if let Some(currency) = &cli.currency {
        config.currency_symbol.clone_from(currency);
    }

    let quiet = cli.quiet || config.quiet;
    if let Err(e) = logging::init_tracing(cli.verbose, quiet) {
        eprintln!("Failed to initialise logging: {e}");
    }

    let ctx = Context {
        config,
        format: cli.format,
        quiet,
    };

    match &cli.command {
        Commands::Filter {
            files,
            filter_args,
            limit,
            selected,
        } => handle_filter_command(&ctx, files, filter_args, *limit, *selected)?,
        Commands::Stats { files, filter_args } => handle_stats_command(&ctx, files, filter_args)?,
        Commands::Tags { files } => handle_tags_command(&ctx, files)?,
        Commands::Config { command } => handle_config_command(&ctx, cli.config.clone(), command)?,
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "lotsift", &mut io::stdout());
        }
    }

    Ok(())
}
