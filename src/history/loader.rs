//! Load historical input from history.csv
//!
//! Columns: `year,benefit_increase,average_wage,oasdi_base,old_law_base,hi_base`.
//! Cells may be blank outside the years a series needs. A blank HI base from
//! 1994 on means no HI taxable maximum.

use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;

use csv::Reader;
use log::info;
use serde::{Deserialize, Serialize};

use super::{HistoricalInput, HI_UNCAPPED, YEAR_HI_UNCAPPED};
use crate::error::{ParamsError, Result};
use crate::series::{AnnualSeries, YEAR_37, YEAR_51};

/// Default path to the history file
pub const DEFAULT_HISTORY_PATH: &str = "data/history.csv";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CsvRow {
    year: i32,
    benefit_increase: Option<f64>,
    average_wage: Option<f64>,
    oasdi_base: Option<f64>,
    old_law_base: Option<f64>,
    hi_base: Option<f64>,
}

fn required(
    rows: &BTreeMap<i32, CsvRow>,
    path: &Path,
    first: i32,
    last: i32,
    column: &str,
    field: impl Fn(&CsvRow) -> Option<f64>,
) -> Result<AnnualSeries> {
    let mut series = AnnualSeries::new(first, last);
    for year in first..=last {
        let value = rows
            .get(&year)
            .and_then(&field)
            .ok_or_else(|| ParamsError::read(path, format!("missing {} for {}", column, year)))?;
        series[year] = value;
    }
    Ok(series)
}

fn row_for(rows: &mut BTreeMap<i32, CsvRow>, year: i32) -> &mut CsvRow {
    rows.entry(year).or_insert_with(|| CsvRow {
        year,
        ..Default::default()
    })
}

impl HistoricalInput {
    /// Load history from the default path
    pub fn load_default(last_year: i32) -> Result<Self> {
        Self::from_csv_path(Path::new(DEFAULT_HISTORY_PATH), last_year)
    }

    /// Load history from a CSV file, keeping values through `last_year`
    pub fn from_csv_path(path: &Path, last_year: i32) -> Result<Self> {
        let file = File::open(path).map_err(|source| ParamsError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file, path, last_year)
    }

    /// Load history from any CSV source; `path` only labels errors
    pub fn from_csv_reader<R: io::Read>(rdr: R, path: &Path, last_year: i32) -> Result<Self> {
        let mut reader = Reader::from_reader(rdr);
        let mut rows = BTreeMap::new();
        for result in reader.deserialize() {
            let row: CsvRow = result.map_err(|e| ParamsError::read(path, e))?;
            if rows.insert(row.year, row).is_some() {
                return Err(ParamsError::read(path, "duplicate year"));
            }
        }

        let base_last = last_year + 1;
        let benefit_increases =
            required(&rows, path, YEAR_51, last_year, "benefit_increase", |r| r.benefit_increase)?;
        let average_wages =
            required(&rows, path, YEAR_51, last_year - 1, "average_wage", |r| r.average_wage)?;
        let oasdi = required(&rows, path, YEAR_37, base_last, "oasdi_base", |r| r.oasdi_base)?;
        let old_law = required(&rows, path, YEAR_37, base_last, "old_law_base", |r| r.old_law_base)?;
        let hi = required(&rows, path, YEAR_37, base_last, "hi_base", |r| {
            if r.year >= YEAR_HI_UNCAPPED {
                Some(r.hi_base.unwrap_or(HI_UNCAPPED))
            } else {
                r.hi_base
            }
        })?;

        let input = Self::new(last_year, &benefit_increases, &average_wages, &oasdi, &old_law, &hi)?;
        info!("loaded history from {} through {}", path.display(), last_year);
        Ok(input)
    }

    /// Write this history in the format `from_csv_path` reads
    pub fn save_csv_path(&self, path: &Path) -> Result<()> {
        let mut rows: BTreeMap<i32, CsvRow> = BTreeMap::new();
        for (year, v) in self.benefit_increases.iter() {
            row_for(&mut rows, year).benefit_increase = Some(v);
        }
        for (year, v) in self.average_wages.iter() {
            row_for(&mut rows, year).average_wage = Some(v);
        }
        for (year, v) in self.oasdi_bases.iter() {
            row_for(&mut rows, year).oasdi_base = Some(v);
        }
        for (year, v) in self.old_law_bases.iter() {
            row_for(&mut rows, year).old_law_base = Some(v);
        }
        for (year, v) in self.hi_bases.iter() {
            row_for(&mut rows, year).hi_base = v.is_finite().then_some(v);
        }

        let mut writer = csv::Writer::from_path(path).map_err(|e| ParamsError::write(path, e))?;
        for row in rows.values() {
            writer.serialize(row).map_err(|e| ParamsError::write(path, e))?;
        }
        writer.flush().map_err(|e| ParamsError::write(path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_is_open_error() {
        let path = std::env::temp_dir().join("benefit_params_missing_history.csv");
        let _ = fs::remove_file(&path);
        assert!(matches!(
            HistoricalInput::from_csv_path(&path, 2024),
            Err(ParamsError::Open { .. })
        ));
    }

    #[test]
    fn test_missing_field_is_read_error() {
        let csv = "year,benefit_increase,average_wage,oasdi_base,old_law_base,hi_base\n\
                   1951,0,2799.16,3600,3600,3600\n";
        match HistoricalInput::from_csv_reader(csv.as_bytes(), Path::new("history.csv"), 1978) {
            Err(ParamsError::Read { reason, .. }) => {
                assert!(reason.contains("benefit_increase for 1952"), "{}", reason)
            }
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_number_is_read_error() {
        let csv = "year,benefit_increase,average_wage,oasdi_base,old_law_base,hi_base\n\
                   1951,x,2799.16,3600,3600,3600\n";
        assert!(matches!(
            HistoricalInput::from_csv_reader(csv.as_bytes(), Path::new("history.csv"), 1978),
            Err(ParamsError::Read { .. })
        ));
    }

    #[test]
    fn test_saved_history_reads_back() {
        let path = std::env::temp_dir().join(format!(
            "benefit_params_history_{}.csv",
            std::process::id()
        ));
        let embedded = HistoricalInput::embedded(2024).unwrap();
        embedded.save_csv_path(&path).unwrap();

        let loaded = HistoricalInput::from_csv_path(&path, 2024).unwrap();
        assert_eq!(loaded, embedded);

        // a shorter history can be cut from the same file
        let earlier = HistoricalInput::from_csv_path(&path, 2010).unwrap();
        assert_eq!(earlier.oasdi_bases()[2011], 106800.0);
        assert_eq!(earlier, HistoricalInput::embedded(2010).unwrap());
        let _ = fs::remove_file(&path);
    }
}
