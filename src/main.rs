//! Benefit Params CLI
//!
//! Projects one parameter set and writes the year-by-year table as CSV
//! (or JSON with `--json`).

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use benefit_params::params::rules::Amendments;
use benefit_params::series::YEAR_79;
use benefit_params::{Alternative, LoadedAssumptions, ParameterRow, ProjectionConfig};

/// Project Social Security benefit-formula parameters
#[derive(Parser)]
#[command(name = "benefit_params", version, about)]
struct Cli {
    /// JSON projection config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// First projected year
    #[arg(long)]
    istart: Option<i32>,

    /// Last projected year
    #[arg(long)]
    max_year: Option<i32>,

    /// Average wage alternative (1-4 Trustees, 5 flat, 6 benefit statement, 7 user)
    #[arg(long)]
    average_wage_alternative: Option<i32>,

    /// Benefit increase alternative (1-4 Trustees, 5 flat, 6 benefit statement, 7 user)
    #[arg(long)]
    benefit_increase_alternative: Option<i32>,

    /// Restrict alternatives to those allowed on a benefit statement
    #[arg(long)]
    benefit_statement: bool,

    /// History CSV instead of the embedded history
    #[arg(long)]
    history: Option<PathBuf>,

    /// Assumption directory instead of the embedded assumptions
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// JSON file of amendments to present law
    #[arg(long)]
    amended: Option<PathBuf>,

    /// First year of the output table
    #[arg(long, default_value_t = YEAR_79)]
    from: i32,

    /// Last year of the output table; defaults to the last projected year
    #[arg(long)]
    to: Option<i32>,

    /// Output file; standard output when absent
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Write JSON instead of CSV
    #[arg(long)]
    json: bool,

    /// Save the history used to this CSV file
    #[arg(long)]
    export_history: Option<PathBuf>,

    /// Save the assumptions for alternatives 1-6 to this directory
    #[arg(long)]
    export_assumptions: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Result<ProjectionConfig> {
        let mut config = match &self.config {
            Some(path) => ProjectionConfig::from_json_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ProjectionConfig::default(),
        };
        if let Some(istart) = self.istart {
            config.istart = istart;
        }
        if let Some(max_year) = self.max_year {
            config.max_year = max_year;
        }
        if let Some(alt) = self.average_wage_alternative {
            config.average_wage_alternative = alt;
        }
        if let Some(alt) = self.benefit_increase_alternative {
            config.benefit_increase_alternative = alt;
        }
        config.benefit_statement |= self.benefit_statement;
        if self.history.is_some() {
            config.history_path = self.history.clone();
        }
        if self.assumptions.is_some() {
            config.assumptions_path = self.assumptions.clone();
        }
        if let Some(path) = &self.amended {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            let amendments: Amendments = serde_json::from_reader(io::BufReader::new(file))
                .with_context(|| format!("parsing amendments {}", path.display()))?;
            config.amendments = Some(amendments);
        }
        Ok(config)
    }
}

fn write_rows(rows: &[ParameterRow], json: bool, out: impl Write) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(out, rows)?;
        return Ok(());
    }
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let (average_wage, benefit_increase) = config.alternatives()?;

    let history = Arc::new(config.load_history().context("loading history")?);
    if let Some(path) = &cli.export_history {
        history.save_csv_path(path)?;
        info!("history written to {}", path.display());
    }

    let source = config.assumption_source().context("loading assumptions")?;
    if let Some(path) = &cli.export_assumptions {
        // every alternative but the user-specified one
        let alternatives = &Alternative::GENERAL[..6];
        LoadedAssumptions::capture(source.as_ref(), alternatives, config.istart, config.max_year)?
            .save_to(path)?;
        info!("assumptions written to {}", path.display());
    }

    let mut engine = config.engine(history)?;
    engine.project(average_wage, benefit_increase, source.as_ref())?;
    info!("{}", engine.average_wage_title());
    info!("{}", engine.benefit_increase_title());

    let rows = engine.parameter_rows(cli.from, cli.to.unwrap_or(engine.max_year()))?;
    match &cli.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_rows(&rows, cli.json, io::BufWriter::new(file))?;
            println!("Benefit Params v{}", env!("CARGO_PKG_VERSION"));
            println!("  {}", engine.average_wage_title());
            println!("  {}", engine.benefit_increase_title());
            println!("  {} years written to {}", rows.len(), path.display());
        }
        None => write_rows(&rows, cli.json, io::stdout().lock())?,
    }
    Ok(())
}
