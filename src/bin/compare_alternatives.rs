//! Compare the Trustees Report alternatives side by side
//!
//! Projects every alternative in parallel from one shared history and prints
//! key parameters at ten-year intervals.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;

use benefit_params::params::TestBracket;
use benefit_params::{Alternative, FixedScenarioEngine, HistoricalInput, ProjectionConfig};

#[derive(Parser)]
#[command(name = "compare_alternatives", about = "Compare Trustees Report alternatives")]
struct Cli {
    /// First projected year
    #[arg(long, default_value_t = 2025)]
    istart: i32,

    /// Last projected year
    #[arg(long, default_value_t = 2100)]
    max_year: i32,

    /// Years between printed rows
    #[arg(long, default_value_t = 10)]
    step: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ProjectionConfig {
        istart: cli.istart,
        max_year: cli.max_year,
        ..Default::default()
    };
    let history: Arc<HistoricalInput> = Arc::new(config.load_history().context("loading history")?);
    let source = config.assumption_source()?;

    let start = Instant::now();
    let scenarios: Vec<FixedScenarioEngine> = Alternative::TRUSTEES
        .par_iter()
        .map(|&alt| FixedScenarioEngine::new(Arc::clone(&history), alt, source.as_ref(), cli.max_year))
        .collect::<benefit_params::Result<_>>()?;
    println!(
        "Projected {} alternatives from {} in {:?}\n",
        scenarios.len(),
        cli.istart,
        start.elapsed()
    );

    println!(
        "{:>5} {:>6} {:>14} {:>8} {:>12} {:>8} {:>8} {:>10}",
        "Year", "Alt", "AvgWage", "COLA", "OASDI Base", "Bend 1", "Bend 2", "Exempt"
    );
    println!("{}", "-".repeat(78));
    for year in (cli.istart..=cli.max_year).step_by(cli.step.max(1)) {
        for scenario in &scenarios {
            let pia = scenario.pia_formula(year)?;
            println!(
                "{:>5} {:>6} {:>14.2} {:>8.2} {:>12.0} {:>8.0} {:>8.0} {:>10.0}",
                year,
                scenario.alternative().label(),
                scenario.average_wage(year)?,
                scenario.benefit_increase(year)?,
                scenario.oasdi_base(year)?,
                pia.bend_points()[0],
                pia.bend_points()[1],
                scenario.exempt_amount(TestBracket::Under, year)?,
            );
        }
    }
    Ok(())
}
