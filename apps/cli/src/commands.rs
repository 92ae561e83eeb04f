//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use coursegraph_core::pipeline::{
    BatchReport, CategoryOutcome, GenerateConfig, ProgressReporter, build_category, generate_all,
};
use coursegraph_core::{Assembler, AssemblerOptions, find_orphans, validate};
use coursegraph_shared::{
    AppConfig, CONFIG_FILE_NAME, Document, config_dir, init_config, load_config,
};
use coursegraph_tables::{TableStore, missing_files};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// coursegraph: structured data for course category pages.
#[derive(Parser)]
#[command(
    name = "coursegraph",
    version,
    about = "Generate schema.org JSON-LD documents for course category pages from CSV tables.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./coursegraph.toml, then ~/.coursegraph/coursegraph.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate a document for every category page.
    Generate {
        /// Directory holding the eight CSV tables.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Output directory for the documents.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Exit non-zero when any category fails or has validation warnings.
        #[arg(long)]
        strict: bool,
    },

    /// Generate the document for a single category.
    Category {
        /// Category identifier from the category pages table.
        category_id: String,

        /// Directory holding the eight CSV tables.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Write the document here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Validate existing JSON-LD documents.
    Validate {
        /// Documents to check.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check the source tables: presence, row counts, orphan references.
    Check {
        /// Directory holding the eight CSV tables.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Create the data and output directories named in config.
    Init,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init {
        /// Write ./coursegraph.toml instead of the user config file.
        #[arg(long)]
        local: bool,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "coursegraph=info",
        1 => "coursegraph=debug",
        _ => "coursegraph=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Generate {
            data_dir,
            out,
            strict,
        } => cmd_generate(config_path, data_dir, out, strict),
        Command::Category {
            category_id,
            data_dir,
            out,
        } => cmd_category(config_path, &category_id, data_dir, out.as_deref()),
        Command::Validate { files } => cmd_validate(&files),
        Command::Check { data_dir } => cmd_check(config_path, data_dir),
        Command::Init => cmd_init(config_path),
        Command::Config { action } => match action {
            ConfigAction::Init { local } => cmd_config_init(local),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_generate(
    config_path: Option<&Path>,
    data_dir: Option<PathBuf>,
    out: Option<PathBuf>,
    strict: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let data_dir = data_dir.unwrap_or_else(|| PathBuf::from(&config.paths.data_dir));
    let output_dir = out.unwrap_or_else(|| PathBuf::from(&config.paths.output_dir));
    let strict = strict || config.generation.strict;

    info!(
        data_dir = %data_dir.display(),
        output_dir = %output_dir.display(),
        strict,
        "generating category documents"
    );

    let store = TableStore::load(&data_dir, &config.tables)?;
    let assembler = assembler_for(&config);
    let generate_config = GenerateConfig::new(&output_dir)
        .with_suffix(config.generation.file_suffix.clone())
        .with_generator(format!("coursegraph {}", env!("CARGO_PKG_VERSION")));

    let reporter = CliProgress::new();
    let report = generate_all(&store, &assembler, &generate_config, &reporter)?;

    print_summary(&report, &output_dir);

    if strict && !report.is_clean() {
        return Err(eyre!(
            "strict mode: {} categories failed, {} validation warnings",
            report.failures().count(),
            report.validation_warning_count()
        ));
    }

    Ok(())
}

fn print_summary(report: &BatchReport, output_dir: &Path) {
    let written = report.written().count();

    println!();
    println!(
        "  Generated {written} of {} categories",
        report.outcomes.len()
    );
    println!("  Output:    {}", output_dir.display());
    println!("  Index:     {}", report.index_path.display());
    println!("  Warnings:  {}", report.validation_warning_count());
    println!("  Orphans:   {}", report.orphans.len());
    println!("  Time:      {:.1}s", report.elapsed.as_secs_f64());

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!();
        println!("  Failed:");
        for (category_id, error) in failures {
            println!("    {category_id}: {error}");
        }
    }

    if !report.orphans.is_empty() {
        println!();
        println!("  Orphan rows (excluded from every document):");
        for orphan in &report.orphans {
            println!("    {orphan}");
        }
    }

    if !report.duplicate_categories.is_empty() {
        println!();
        println!(
            "  Duplicate category ids skipped: {}",
            report.duplicate_categories.join(", ")
        );
    }
    println!();
}

fn cmd_category(
    config_path: Option<&Path>,
    category_id: &str,
    data_dir: Option<PathBuf>,
    out: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let data_dir = data_dir.unwrap_or_else(|| PathBuf::from(&config.paths.data_dir));

    let store = TableStore::load(&data_dir, &config.tables)?;
    let build = build_category(&store, &assembler_for(&config), category_id)?;
    let json = build.document.to_pretty_json()?;

    match out {
        Some(path) => {
            std::fs::write(path, &json)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            info!(
                category_id,
                path = %path.display(),
                warnings = build.validation.len(),
                "document written"
            );
        }
        None => print!("{json}"),
    }

    Ok(())
}

fn cmd_validate(files: &[PathBuf]) -> Result<()> {
    let mut problems = 0;

    for path in files {
        let document = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))
            .and_then(|content| {
                serde_json::from_str::<Document>(&content)
                    .wrap_err_with(|| format!("{} is not a category document", path.display()))
            });

        let document = match document {
            Ok(document) => document,
            Err(e) => {
                println!("✗ {}: {e:#}", path.display());
                problems += 1;
                continue;
            }
        };

        let warnings = validate(&document);
        if warnings.is_empty() {
            println!("✓ {}", path.display());
        } else {
            println!("✗ {} ({} warnings)", path.display(), warnings.len());
            for warning in &warnings {
                println!("    {warning}");
            }
            problems += warnings.len();
        }
    }

    if problems > 0 {
        return Err(eyre!("{problems} problems in {} files", files.len()));
    }
    Ok(())
}

fn cmd_check(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let data_dir = data_dir.unwrap_or_else(|| PathBuf::from(&config.paths.data_dir));

    println!("Data directory: {}", data_dir.display());
    let missing = missing_files(&data_dir, &config.tables);
    for name in config.tables.all() {
        let mark = if missing.iter().any(|m| m.ends_with(name)) {
            "✗"
        } else {
            "✓"
        };
        println!("  {mark} {name}");
    }

    if !missing.is_empty() {
        return Err(eyre!("{} of 8 table files are missing", missing.len()));
    }

    let store = TableStore::load(&data_dir, &config.tables)?;

    println!();
    println!("Row counts:");
    for (table, rows) in store.summary() {
        println!("  {table:<24} {rows}");
    }

    let orphans = find_orphans(&store);
    println!();
    if orphans.is_empty() {
        println!("No orphan references.");
    } else {
        println!("Orphan references ({}):", orphans.len());
        for orphan in &orphans {
            println!("  {orphan}");
        }
    }

    Ok(())
}

fn cmd_init(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    for dir in [&config.paths.data_dir, &config.paths.output_dir] {
        std::fs::create_dir_all(dir).wrap_err_with(|| format!("failed to create {dir}"))?;
        println!("Created {dir}");
    }

    let missing = missing_files(Path::new(&config.paths.data_dir), &config.tables);
    if !missing.is_empty() {
        warn!(missing = missing.len(), "data directory is missing table files");
        println!();
        println!("Place these tables in {}:", config.paths.data_dir);
        for path in &missing {
            println!("  {}", path.display());
        }
    }

    Ok(())
}

fn cmd_config_init(local: bool) -> Result<()> {
    let dir = if local {
        std::env::current_dir().wrap_err("cannot determine working directory")?
    } else {
        config_dir()?
    };

    let target = dir.join(CONFIG_FILE_NAME);
    if target.exists() {
        return Err(eyre!("{} already exists", target.display()));
    }

    let path = init_config(&dir)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config: AppConfig = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn assembler_for(config: &AppConfig) -> Assembler {
    Assembler::new(AssemblerOptions::from(&config.generation))
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .expect("valid spinner template")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn category_done(&self, outcome: &CategoryOutcome, current: usize, total: usize) {
        let status = match outcome {
            CategoryOutcome::Written(_) => "ok",
            CategoryOutcome::Failed { .. } => "failed",
        };
        self.spinner.set_message(format!(
            "[{current}/{total}] {} {status}",
            outcome.category_id()
        ));
    }

    fn done(&self, _report: &BatchReport) {
        self.spinner.finish_and_clear();
    }
}
