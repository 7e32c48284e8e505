//! CSV-based assumption loader
//!
//! Reads and writes projected assumptions kept in a directory:
//!
//! - `average_wage_increases.csv`: `alternative,year,percent`
//! - `benefit_increases.csv`: `alternative,year,percent`
//! - `titles.csv`: `alternative,kind,title` (optional)
//! - `catchup.csv`: `alternative,eligibility_year,calendar_year,percent` (optional)
//!
//! Rates for an alternative must be consecutive years; the last rate given is
//! carried forward through the last projected year.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::alternative::Alternative;
use super::catchup::CatchupTable;
use super::source::{extend_rates, AssumptionSeries, AssumptionSource, BenefitIncreaseAssumption};
use crate::error::{AssumptionKind, ParamsError, Result};
use crate::series::AnnualSeries;

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

const AVERAGE_WAGE_FILE: &str = "average_wage_increases.csv";
const BENEFIT_INCREASE_FILE: &str = "benefit_increases.csv";
const TITLES_FILE: &str = "titles.csv";
const CATCHUP_FILE: &str = "catchup.csv";

#[derive(Debug, Serialize, Deserialize)]
struct RateRow {
    alternative: i32,
    year: i32,
    percent: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct TitleRow {
    alternative: i32,
    kind: String,
    title: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatchupRow {
    alternative: i32,
    eligibility_year: i32,
    calendar_year: i32,
    percent: f64,
}

fn kind_key(kind: AssumptionKind) -> &'static str {
    match kind {
        AssumptionKind::AverageWage => "average_wage",
        AssumptionKind::BenefitIncrease => "benefit_increase",
    }
}

fn parse_kind(key: &str) -> Option<AssumptionKind> {
    match key {
        "average_wage" => Some(AssumptionKind::AverageWage),
        "benefit_increase" => Some(AssumptionKind::BenefitIncrease),
        _ => None,
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|source| ParamsError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::Reader::from_reader(file))
}

fn parse_alternative(path: &Path, kind: AssumptionKind, code: i32) -> Result<Alternative> {
    Alternative::check_general(kind, code).map_err(|e| ParamsError::read(path, e))
}

/// Load one rate file into a contiguous series per alternative
fn load_rates(path: &Path, kind: AssumptionKind) -> Result<BTreeMap<Alternative, AnnualSeries>> {
    let mut reader = open_reader(path)?;
    let mut by_alt: BTreeMap<Alternative, BTreeMap<i32, f64>> = BTreeMap::new();

    for result in reader.deserialize() {
        let row: RateRow = result.map_err(|e| ParamsError::read(path, e))?;
        let alt = parse_alternative(path, kind, row.alternative)?;
        if by_alt.entry(alt).or_default().insert(row.year, row.percent).is_some() {
            return Err(ParamsError::read(
                path,
                format!("duplicate year {} for alternative {}", row.year, alt),
            ));
        }
    }

    let mut out = BTreeMap::new();
    for (alt, years) in by_alt {
        let first = *years.keys().next().unwrap_or(&0);
        let values: Vec<f64> = years.values().copied().collect();
        let last = first + values.len() as i32 - 1;
        if years.keys().next_back() != Some(&last) {
            return Err(ParamsError::read(
                path,
                format!("years for alternative {} are not consecutive", alt),
            ));
        }
        out.insert(alt, AnnualSeries::from_values(first, values));
    }
    Ok(out)
}

fn load_titles(path: &Path) -> Result<BTreeMap<(Alternative, AssumptionKind), String>> {
    let mut titles = BTreeMap::new();
    if !path.exists() {
        return Ok(titles);
    }
    let mut reader = open_reader(path)?;
    for result in reader.deserialize() {
        let row: TitleRow = result.map_err(|e| ParamsError::read(path, e))?;
        let kind = parse_kind(&row.kind)
            .ok_or_else(|| ParamsError::read(path, format!("unknown kind '{}'", row.kind)))?;
        let alt = parse_alternative(path, kind, row.alternative)?;
        titles.insert((alt, kind), row.title);
    }
    Ok(titles)
}

fn load_catchup(path: &Path) -> Result<BTreeMap<Alternative, Vec<(i32, i32, f64)>>> {
    let mut catchup: BTreeMap<Alternative, Vec<(i32, i32, f64)>> = BTreeMap::new();
    if !path.exists() {
        return Ok(catchup);
    }
    let mut reader = open_reader(path)?;
    for result in reader.deserialize() {
        let row: CatchupRow = result.map_err(|e| ParamsError::read(path, e))?;
        let alt = parse_alternative(path, AssumptionKind::BenefitIncrease, row.alternative)?;
        if row.eligibility_year >= row.calendar_year {
            return Err(ParamsError::read(
                path,
                format!(
                    "eligibility year {} is not before calendar year {}",
                    row.eligibility_year, row.calendar_year
                ),
            ));
        }
        if !row.percent.is_finite() || row.percent < 0.0 {
            return Err(ParamsError::read(
                path,
                format!(
                    "catch-up percentage {} for {}/{} is not a non-negative increase",
                    row.percent, row.eligibility_year, row.calendar_year
                ),
            ));
        }
        catchup
            .entry(alt)
            .or_default()
            .push((row.eligibility_year, row.calendar_year, row.percent));
    }
    Ok(catchup)
}

/// Assumptions read from (or captured for) a directory of CSV files
#[derive(Debug, Clone, Default)]
pub struct LoadedAssumptions {
    pub average_wage: BTreeMap<Alternative, AnnualSeries>,
    pub benefit_increase: BTreeMap<Alternative, AnnualSeries>,
    pub titles: BTreeMap<(Alternative, AssumptionKind), String>,
    pub catchup: BTreeMap<Alternative, Vec<(i32, i32, f64)>>,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let loaded = Self {
            average_wage: load_rates(&path.join(AVERAGE_WAGE_FILE), AssumptionKind::AverageWage)?,
            benefit_increase: load_rates(
                &path.join(BENEFIT_INCREASE_FILE),
                AssumptionKind::BenefitIncrease,
            )?,
            titles: load_titles(&path.join(TITLES_FILE))?,
            catchup: load_catchup(&path.join(CATCHUP_FILE))?,
        };
        info!(
            "loaded assumptions from {}: {} wage and {} benefit alternatives",
            path.display(),
            loaded.average_wage.len(),
            loaded.benefit_increase.len()
        );
        Ok(loaded)
    }

    /// Capture what `source` serves for each alternative, e.g. to save the
    /// embedded rates as an editable starting point
    pub fn capture(
        source: &dyn AssumptionSource,
        alternatives: &[Alternative],
        istart: i32,
        max_year: i32,
    ) -> Result<Self> {
        let mut captured = Self::default();
        for &alt in alternatives {
            let aw = source.average_wage_increases(alt, istart, max_year)?;
            let bi = source.benefit_increases(alt, istart, max_year)?;
            captured.titles.insert((alt, AssumptionKind::AverageWage), aw.title);
            captured
                .titles
                .insert((alt, AssumptionKind::BenefitIncrease), bi.series.title);
            captured.average_wage.insert(alt, aw.values);
            captured.benefit_increase.insert(alt, bi.series.values);
            if !bi.catchup.is_empty() {
                captured.catchup.insert(alt, bi.catchup.iter().collect());
            }
        }
        Ok(captured)
    }

    /// Write all four files into `path`, creating the directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| ParamsError::write(path, e))?;

        for (file, rates) in [
            (AVERAGE_WAGE_FILE, &self.average_wage),
            (BENEFIT_INCREASE_FILE, &self.benefit_increase),
        ] {
            let file_path = path.join(file);
            let mut writer =
                csv::Writer::from_path(&file_path).map_err(|e| ParamsError::write(&file_path, e))?;
            for (alt, series) in rates {
                for (year, percent) in series.iter() {
                    writer
                        .serialize(RateRow {
                            alternative: alt.code(),
                            year,
                            percent,
                        })
                        .map_err(|e| ParamsError::write(&file_path, e))?;
                }
            }
            writer.flush().map_err(|e| ParamsError::write(&file_path, e))?;
        }

        let file_path = path.join(TITLES_FILE);
        let mut writer =
            csv::Writer::from_path(&file_path).map_err(|e| ParamsError::write(&file_path, e))?;
        for ((alt, kind), title) in &self.titles {
            writer
                .serialize(TitleRow {
                    alternative: alt.code(),
                    kind: kind_key(*kind).to_string(),
                    title: title.clone(),
                })
                .map_err(|e| ParamsError::write(&file_path, e))?;
        }
        writer.flush().map_err(|e| ParamsError::write(&file_path, e))?;

        let file_path = path.join(CATCHUP_FILE);
        let mut writer =
            csv::Writer::from_path(&file_path).map_err(|e| ParamsError::write(&file_path, e))?;
        // csv writes no header for an empty file; emit it so the file reads back
        writer
            .write_record(["alternative", "eligibility_year", "calendar_year", "percent"])
            .map_err(|e| ParamsError::write(&file_path, e))?;
        for (alt, entries) in &self.catchup {
            for &(elig, cal, pct) in entries {
                writer
                    .write_record([
                        alt.code().to_string(),
                        elig.to_string(),
                        cal.to_string(),
                        pct.to_string(),
                    ])
                    .map_err(|e| ParamsError::write(&file_path, e))?;
            }
        }
        writer.flush().map_err(|e| ParamsError::write(&file_path, e))?;

        info!("saved assumptions to {}", path.display());
        Ok(())
    }

    fn title(&self, alt: Alternative, kind: AssumptionKind, istart: i32) -> String {
        self.titles
            .get(&(alt, kind))
            .cloned()
            .unwrap_or_else(|| alt.title(kind, istart))
    }

    fn rates<'a>(
        map: &'a BTreeMap<Alternative, AnnualSeries>,
        alt: Alternative,
        kind: AssumptionKind,
    ) -> Result<&'a AnnualSeries> {
        map.get(&alt).ok_or_else(|| {
            ParamsError::Precondition(format!("no {} assumptions loaded for alternative {}", kind, alt))
        })
    }
}

impl AssumptionSource for LoadedAssumptions {
    fn average_wage_increases(
        &self,
        alternative: Alternative,
        istart: i32,
        max_year: i32,
    ) -> Result<AssumptionSeries> {
        let kind = AssumptionKind::AverageWage;
        let rates = Self::rates(&self.average_wage, alternative, kind)?;
        Ok(AssumptionSeries {
            title: self.title(alternative, kind, istart),
            values: extend_rates(rates, istart - 1, max_year, "average wage")?,
        })
    }

    fn benefit_increases(
        &self,
        alternative: Alternative,
        istart: i32,
        max_year: i32,
    ) -> Result<BenefitIncreaseAssumption> {
        let kind = AssumptionKind::BenefitIncrease;
        let rates = Self::rates(&self.benefit_increase, alternative, kind)?;
        let mut catchup = CatchupTable::new(istart);
        if let Some(entries) = self.catchup.get(&alternative) {
            for &(elig, cal, pct) in entries {
                if cal < istart || cal > max_year {
                    warn!(
                        "catch-up increase for {} in {} is outside {}-{}, skipped",
                        elig, cal, istart, max_year
                    );
                    continue;
                }
                catchup.insert(elig, cal, pct)?;
            }
        }
        Ok(BenefitIncreaseAssumption {
            series: AssumptionSeries {
                title: self.title(alternative, kind, istart),
                values: extend_rates(rates, istart, max_year, "benefit increase")?,
            },
            catchup,
        })
    }
}
