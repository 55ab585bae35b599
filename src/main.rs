//! Hindsight - Optimal Trade Schedule Finder
//!
//! Run with: cargo run -- <prices.csv>
//!
//! Builds a DAG of every admissible trade over a minute price series and
//! walks its heaviest path to find the most profitable buy/sell schedule.

use clap::Parser;
use color_eyre::eyre::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hindsight::report::Reporter;
use hindsight::{load_series, plan, BuildProgress, Config, ReportFormat};

#[derive(Debug, Parser)]
#[command(name = "hindsight", version, about = "Find the most profitable trade schedule in a price series")]
struct Cli {
    /// CSV file with a header line and `timestamp,price` rows
    file: PathBuf,

    /// TOML config file (defaults to environment / .env)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the report to this file instead of the console
    #[arg(short, long)]
    output: Option<String>,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,

    /// No banner, summary or progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 📈 HINDSIGHT - Optimal Trade Schedule Finder").cyan().bold()
    );
    println!(
        "{}",
        style("    Trade DAG | Linear Longest Path | Single Position").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn progress_bar(quiet: bool, interval: usize) -> Result<ProgressBar> {
    if quiet || interval == 0 {
        return Ok(ProgressBar::hidden());
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("  {spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} minutes expanded")?
            .progress_chars("=> "),
    );
    Ok(bar)
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hindsight=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env(),
    };
    if let Some(output) = &cli.output {
        config.report_path = Some(output.clone());
    }
    if cli.json {
        config.report_format = ReportFormat::Json;
    }
    config.validate()?;

    if !cli.quiet {
        print_banner();
        config.print_summary();
        println!();
    }

    // =============================================
    // PHASE 0: INGEST
    // =============================================
    info!("Reading {}", cli.file.display());
    let series = load_series(&cli.file)?;

    // =============================================
    // PHASES 1-2: GRAPH + LONGEST PATH
    // =============================================
    let start = Instant::now();
    let bar = progress_bar(cli.quiet, config.progress_interval)?;
    let mut update_bar = |processed: usize, total: usize| {
        bar.set_length(total as u64);
        bar.set_position(processed as u64);
    };
    let observer: &mut dyn BuildProgress = &mut update_bar;

    let strategy = plan(
        &series,
        config.hold_window(),
        Some((config.progress_interval, observer)),
    );
    bar.finish_and_clear();
    let elapsed = start.elapsed();

    if let Some(path) = &strategy.path {
        info!(
            "Heaviest path visits {} nodes, weight {:.prec$}",
            path.len(),
            path.total_weight,
            prec = config.report_precision
        );
    }

    if let Some(shortfall) = strategy.shortfall {
        if !cli.quiet {
            println!("{} {}", style("!").yellow(), style(shortfall).yellow());
        }
    }

    // =============================================
    // PHASE 3: REPORT
    // =============================================
    let reporter = Reporter::new(config.report_precision, config.report_format);
    match &config.report_path {
        Some(path) => reporter.write_to_file(path, &strategy.trades, strategy.total_profit, &series)?,
        None => reporter.write_to(
            std::io::stdout().lock(),
            &strategy.trades,
            strategy.total_profit,
            &series,
        )?,
    }

    if !cli.quiet {
        println!();
        println!(
            "{} {} samples | {} nodes, {} edges ({} trade edges) | solved in {:?}",
            style("✓").green(),
            series.len(),
            strategy.stats.nodes,
            strategy.stats.edges,
            strategy.stats.trade_edges,
            elapsed
        );
        println!(
            "{} {} trades, total profit {:.prec$}",
            style("💰").green(),
            strategy.trades.len(),
            strategy.total_profit,
            prec = config.report_precision
        );
        if let Some(path) = &config.report_path {
            println!("{} Report written to: {}", style("📝").cyan(), path);
        }
    }

    Ok(())
}
