//! report-tables: render expandable compliance report tables

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use report_tables::config::{load_config, write_starter_config, Config};
use report_tables::input::load_input;
use report_tables::reporter::{ConsoleReporter, HtmlReporter, JsonReporter, ReportSummary};
use report_tables::{Action, ReportPage};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Render the interactive tables of a compliance report
#[derive(Parser, Debug)]
#[command(name = "report-tables")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a report input file into a self-contained HTML page
    Render {
        /// Report input JSON
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Start in dark mode
        #[arg(long)]
        dark_mode: bool,

        /// Start in light mode, overriding darkMode from the input or config
        #[arg(long, conflicts_with = "dark_mode")]
        light_mode: bool,

        /// Render every table row expanded
        #[arg(long)]
        expand_all: bool,

        /// Characters shown in a collapsed cell before truncation
        #[arg(long, value_name = "N")]
        char_limit: Option<usize>,

        /// Page title
        #[arg(long)]
        title: Option<String>,

        /// Path to config file (default: search .report-tables.json next to the input and in parents)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print per-table counts and control results
    Summary {
        /// Report input JSON
        input: PathBuf,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create .report-tables.json with the default settings
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    match args.command {
        Commands::Render {
            input,
            output,
            dark_mode,
            light_mode,
            expand_all,
            char_limit,
            title,
            config,
        } => {
            let theme = match (dark_mode, light_mode) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let config = config_for(&input, config.as_deref())?.merge_with_cli(theme, char_limit);
            let mut page = build_page(&input, &config)?;

            if expand_all {
                let tables: Vec<_> = page.sections().iter().map(|s| s.table()).collect();
                for table in tables {
                    page.dispatch(Action::ExpandAll { table });
                }
            }

            let mut reporter = HtmlReporter::new();
            if let Some(title) = title.as_deref() {
                reporter = reporter.with_title(title);
            }
            let html = reporter.report(&page);

            match output {
                Some(path) => {
                    std::fs::write(&path, html)
                        .with_context(|| format!("Failed to write report to {}", path.display()))?;
                    eprintln!("{}: Wrote {}", "Done".green(), path.display());
                }
                None => print!("{}", html),
            }
            print_diagnostics(&page);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Summary { input, json, config } => {
            let config = config_for(&input, config.as_deref())?;
            let page = build_page(&input, &config)?;
            let summary = ReportSummary::from_page(&page);

            if json {
                println!("{}", JsonReporter::new().pretty().report(&summary));
            } else {
                ConsoleReporter::new().report(&summary);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { dir } => run_init(dir.as_deref()),
    }
}

/// Config lookup starts next to the input file. `--config` is relative to the current directory.
fn config_for(input: &Path, custom: Option<&Path>) -> Result<Config> {
    let work_dir = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let custom = match custom {
        Some(p) if p.is_relative() => Some(
            std::env::current_dir()
                .context("Failed to get current directory")?
                .join(p),
        ),
        other => other.map(Path::to_path_buf),
    };
    load_config(work_dir, custom.as_deref())
}

fn build_page(input: &Path, config: &Config) -> Result<ReportPage> {
    let options = config.page_options(Utc::now());
    let input = load_input(input)?;
    Ok(ReportPage::from_input(&input, &options))
}

fn print_diagnostics(page: &ReportPage) {
    for diagnostic in page.diagnostics().entries() {
        eprintln!("{}: {}", "Warning".yellow(), diagnostic);
    }
}

fn run_init(dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);

    match write_starter_config(dir)? {
        Some(path) => {
            eprintln!("{}: Created {}", "Done".green(), path.display());
        }
        None => {
            eprintln!(
                "{}: {} already exists; use --dir to write elsewhere or remove it first",
                "Warning".yellow(),
                dir.join(report_tables::config::CONFIG_FILENAME).display()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}
