//! ChartLab CLI — render indicator charts for selected instruments.
//!
//! Commands:
//! - `chart` — fetch data, compute indicators, write one PNG per
//!   (instrument, indicator) pair
//! - `catalog` — list the instrument catalog
//!
//! Selection rules match the dashboard: at most 5 instruments, and a
//! single indicator when more than one instrument is chosen.

use anyhow::{bail, Context, Result};
use chartlab_core::catalog::Catalog;
use chartlab_core::data::{QuoteCache, QuoteProvider, SyntheticProvider, YahooProvider};
use chartlab_core::dispatch::dispatch_charts;
use chartlab_core::domain::Instrument;
use chartlab_core::indicators::IndicatorKind;
use chartlab_core::render::PngChartRenderer;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "chartlab",
    about = "ChartLab CLI — indicator charts for funds and equities"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render indicator charts for the selected instruments.
    Chart {
        /// Instrument display names (repeatable, max 5), e.g. "Apple".
        #[arg(short = 'n', long = "name", required = true)]
        names: Vec<String>,

        /// Indicators: sma, macd, trailing-return (repeatable; max 1 when
        /// multiple instruments are selected).
        #[arg(short = 'i', long = "indicator", required = true)]
        indicators: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 2000-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Output directory for PNG files.
        #[arg(long, default_value = "charts")]
        out_dir: PathBuf,

        /// Catalog TOML file overriding the built-in instrument set.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Use the offline synthetic data source instead of Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// List the instrument catalog.
    Catalog {
        /// Catalog TOML file overriding the built-in instrument set.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chart {
            names,
            indicators,
            start,
            end,
            out_dir,
            catalog,
            synthetic,
        } => run_chart(names, indicators, start, end, out_dir, catalog, synthetic),
        Commands::Catalog { catalog } => run_catalog(catalog),
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("loading catalog from {}", path.display())),
        None => Ok(Catalog::default_dashboard()),
    }
}

fn run_chart(
    names: Vec<String>,
    indicator_tokens: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    out_dir: PathBuf,
    catalog_path: Option<PathBuf>,
    synthetic: bool,
) -> Result<()> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    let mut instruments: Vec<Instrument> = Vec::with_capacity(names.len());
    for name in &names {
        match catalog.get(name) {
            Some(inst) => instruments.push(inst.clone()),
            None => bail!(
                "unknown instrument '{name}' — run `chartlab catalog` to list valid names"
            ),
        }
    }

    let mut indicators: Vec<IndicatorKind> = Vec::with_capacity(indicator_tokens.len());
    for token in &indicator_tokens {
        let kind: IndicatorKind = token.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        if !indicators.contains(&kind) {
            indicators.push(kind);
        }
    }

    let start_date = start
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("invalid --start date")?
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());

    let end_date = end
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("invalid --end date")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let cache = QuoteCache::default_dashboard();
    let renderer = PngChartRenderer::default();
    let provider: Box<dyn QuoteProvider> = if synthetic {
        Box::new(SyntheticProvider::default())
    } else {
        Box::new(YahooProvider::new())
    };

    let summary = match dispatch_charts(
        provider.as_ref(),
        &cache,
        &renderer,
        &instruments,
        &indicators,
        start_date,
        end_date,
    ) {
        Ok(summary) => summary,
        Err(validation) => bail!("{validation}"),
    };

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    for result in &summary.results {
        let file_name = format!(
            "{}_{}.png",
            result.instrument.ticker.to_lowercase(),
            result.indicator.token()
        );
        let path = out_dir.join(&file_name);
        std::fs::write(&path, &result.image.png)
            .with_context(|| format!("writing {}", path.display()))?;
        println!(
            "  OK: {} ({}) {} -> {}",
            result.instrument.display_name,
            result.instrument.ticker,
            result.indicator.label(),
            path.display()
        );
    }

    for (request, error) in &summary.failures {
        eprintln!(
            "  FAIL: {} ({}) {}: {error}",
            request.instrument.display_name,
            request.instrument.ticker,
            request.indicator.label()
        );
    }

    println!(
        "\nDone: {} chart(s) written, {} failed",
        summary.results.len(),
        summary.failures.len()
    );

    Ok(())
}

fn run_catalog(catalog_path: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    for inst in catalog.instruments() {
        match inst.fee_percent() {
            Some(fee) => println!(
                "{:<45} {:<6} expense ratio {fee:.2}%",
                inst.display_name, inst.ticker
            ),
            None => println!("{:<45} {:<6} equity", inst.display_name, inst.ticker),
        }
    }

    Ok(())
}
