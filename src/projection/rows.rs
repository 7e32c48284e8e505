//! Year-by-year parameter table written by the binaries

use serde::{Deserialize, Serialize};

use super::engine::ParameterEngine;
use crate::error::{ParamsError, Result};
use crate::params::ret_test::TestBracket;

/// Special minimum column: 20 years of coverage over 10 (30 years in all)
const SPECIAL_MINIMUM_COLUMN_YEARS: u32 = 20;

/// All parameters for one year. Columns a year has no value for are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRow {
    pub year: i32,
    pub projected: bool,

    // Wages and increases
    pub average_wage: Option<f64>,
    pub average_wage_increase: Option<f64>,
    pub benefit_increase: Option<f64>,

    // Taxable maximums; HI is empty once uncapped
    pub oasdi_base: Option<f64>,
    pub old_law_base: Option<f64>,
    pub hi_base: Option<f64>,

    // Formulas by eligibility year
    pub pia_bend_1: Option<f64>,
    pub pia_bend_2: Option<f64>,
    pub mfb_bend_1: Option<f64>,
    pub mfb_bend_2: Option<f64>,
    pub mfb_bend_3: Option<f64>,

    // Retirement earnings test
    pub exempt_under_annual: Option<f64>,
    pub exempt_over_annual: Option<f64>,

    pub special_minimum_pia: Option<f64>,
}

/// `None` for years a table does not cover; other errors propagate
fn covered<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ParamsError::YearOutOfRange { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

impl ParameterEngine {
    /// Snapshot of `first..=last`. Fails with `NotProjected` if the range
    /// reaches years not yet projected.
    pub fn parameter_rows(&self, first: i32, last: i32) -> Result<Vec<ParameterRow>> {
        let mut rows = Vec::with_capacity((last - first + 1).max(0) as usize);
        for year in first..=last {
            let pia = covered(self.pia_formula(year))?;
            let mfb = covered(self.mfb_formula(year))?;
            let bend = |points: Option<&[f64]>, k: usize| points.and_then(|p| p.get(k).copied());
            let pia_points = pia.as_ref().map(|f| f.bend_points());
            let mfb_points = mfb.as_ref().map(|f| f.bend_points());

            rows.push(ParameterRow {
                year,
                projected: year >= self.istart(),
                average_wage: covered(self.average_wage(year))?,
                average_wage_increase: covered(self.average_wage_increase(year))?,
                benefit_increase: covered(self.benefit_increase(year))?,
                oasdi_base: covered(self.oasdi_base(year))?,
                old_law_base: covered(self.old_law_base(year))?,
                hi_base: covered(self.hi_base(year))?.filter(|b| b.is_finite()),
                pia_bend_1: bend(pia_points, 0),
                pia_bend_2: bend(pia_points, 1),
                mfb_bend_1: bend(mfb_points, 0),
                mfb_bend_2: bend(mfb_points, 1),
                mfb_bend_3: bend(mfb_points, 2),
                exempt_under_annual: covered(self.exempt_amount(TestBracket::Under, year))?,
                exempt_over_annual: covered(self.exempt_amount(TestBracket::Over, year))?,
                special_minimum_pia: covered(
                    self.special_minimum_entry(SPECIAL_MINIMUM_COLUMN_YEARS, year),
                )?
                .map(|e| e.pia()),
            });
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{Alternative, EmbeddedAssumptions};
    use crate::history::HistoricalInput;
    use std::sync::Arc;

    #[test]
    fn test_rows_cover_history_and_projection() {
        let history = Arc::new(HistoricalInput::embedded(2024).unwrap());
        let mut engine = ParameterEngine::present_law(history, 2050).unwrap();
        let rows = engine.parameter_rows(1970, 2023).unwrap();
        assert_eq!(rows.len(), 54);
        assert_eq!(rows[0].year, 1970);
        assert_eq!(rows[0].pia_bend_1, None);
        assert_eq!(rows[0].benefit_increase, Some(15.0));
        assert_eq!(rows[0].exempt_over_annual, Some(1680.0));
        assert_eq!(rows[0].special_minimum_pia, None);

        // the 2024 average wage is not history
        assert!(matches!(engine.parameter_rows(2020, 2024), Err(ParamsError::NotProjected)));

        engine
            .project(Alternative::TrusteesIIB, Alternative::TrusteesIIB, &EmbeddedAssumptions::new())
            .unwrap();
        let rows = engine.parameter_rows(2020, 2050).unwrap();
        let last = rows.last().unwrap();
        assert!(last.projected);
        assert!(!rows[0].projected);
        assert_eq!(last.hi_base, None);
        assert_eq!(rows[0].oasdi_base, Some(137_700.0));
        assert!(last.pia_bend_2.is_some());
        assert!(last.mfb_bend_3.is_some());
        assert!(last.special_minimum_pia.is_some());
    }

    #[test]
    fn test_rows_serialize_blank_cells() {
        let history = Arc::new(HistoricalInput::embedded(2024).unwrap());
        let engine = ParameterEngine::present_law(history, 2050).unwrap();
        let rows = engine.parameter_rows(1960, 1960).unwrap();
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&rows[0]).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("year,projected,average_wage,"));
        assert!(lines.next().unwrap().starts_with("1960,false,4007.12,"));
    }
}
