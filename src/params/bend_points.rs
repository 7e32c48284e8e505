//! PIA and MFB formula bend points and percentages
//!
//! The 1979 formula amounts are indexed by the ratio of the average wage two
//! years before eligibility to the 1977 average wage, rounded to the dollar.

use log::debug;
use serde::Serialize;

use crate::error::{ParamsError, Result};
use crate::rounding::round_dollar;
use crate::series::{AnnualSeries, YEAR_79};

/// Most bend points any formula uses
pub const MAX_BEND_POINTS: usize = 4;

/// 1979 PIA bend points
pub const PIA_BASE_BEND_POINTS: [f64; 2] = [180.0, 1085.0];

/// PIA formula percentages
pub const PIA_PERCENTAGES: [f64; 3] = [0.90, 0.32, 0.15];

/// 1979 MFB bend points
pub const MFB_BASE_BEND_POINTS: [f64; 3] = [230.0, 332.0, 433.0];

/// MFB formula percentages
pub const MFB_PERCENTAGES: [f64; 4] = [1.50, 2.72, 1.34, 1.75];

/// Reference year for indexing bend points
const INDEX_BASE_YEAR: i32 = 1977;

/// Bend points and percentages of one formula in one year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Formula {
    bend_points: [f64; MAX_BEND_POINTS],
    percentages: [f64; MAX_BEND_POINTS + 1],
    count: usize,
}

impl Formula {
    /// `percentages` must have one more entry than `bend_points`
    pub fn new(bend_points: &[f64], percentages: &[f64]) -> Result<Self> {
        if bend_points.len() > MAX_BEND_POINTS || percentages.len() != bend_points.len() + 1 {
            return Err(ParamsError::InvalidArgument {
                what: "formula shape",
                reason: format!(
                    "{} bend points with {} percentages",
                    bend_points.len(),
                    percentages.len()
                ),
            });
        }
        let mut formula = Self {
            count: bend_points.len(),
            ..Default::default()
        };
        formula.bend_points[..bend_points.len()].copy_from_slice(bend_points);
        formula.percentages[..percentages.len()].copy_from_slice(percentages);
        Ok(formula)
    }

    /// Number of bend points
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn bend_points(&self) -> &[f64] {
        &self.bend_points[..self.count]
    }

    pub fn percentages(&self) -> &[f64] {
        &self.percentages[..=self.count]
    }

    /// Apply the formula to a monthly amount, e.g. AIME for the PIA formula
    /// or PIA for the MFB formula. The result is not rounded.
    pub fn apply(&self, amount: f64) -> f64 {
        let mut total = 0.0;
        let mut lower = 0.0;
        for (k, &pct) in self.percentages().iter().enumerate() {
            let upper = self.bend_points().get(k).copied().unwrap_or(f64::INFINITY);
            if amount <= lower {
                break;
            }
            total += pct * (amount.min(upper) - lower);
            lower = upper;
        }
        total
    }
}

/// Index base bend points to an eligibility year
pub fn project_bend_points(base: &[f64], elig_year: i32, average_wages: &AnnualSeries) -> Result<Vec<f64>> {
    let reference = average_wages.get(INDEX_BASE_YEAR)?;
    if reference == 0.0 {
        return Err(ParamsError::Precondition(format!(
            "average wage for {} is zero",
            INDEX_BASE_YEAR
        )));
    }
    let ratio = average_wages.get(elig_year - 2)? / reference;
    Ok(base.iter().map(|&b| round_dollar(b * ratio)).collect())
}

/// First PIA percentage for a worker subject to windfall elimination
pub fn windfall_percentage(elig_year: i32, years_of_coverage: u32, benefit_year: i32) -> f64 {
    let standard = PIA_PERCENTAGES[0];
    if elig_year < 1985 || years_of_coverage >= 30 {
        return standard;
    }
    let interim = if elig_year > 1989 {
        0.40
    } else {
        standard - 0.10 * f64::from(elig_year - 1985)
    };
    let annual_rate = if benefit_year >= 1989 { 0.05 } else { 0.10 };
    let guarantee = standard - annual_rate * f64::from(30 - years_of_coverage);
    interim.max(guarantee)
}

/// PIA and MFB formulas by eligibility year, 1979 onward
#[derive(Debug, Clone, PartialEq)]
pub struct BendPointTable {
    pia: AnnualSeries<Formula>,
    mfb: AnnualSeries<Formula>,
}

impl BendPointTable {
    pub fn new(max_year: i32) -> Self {
        Self {
            pia: AnnualSeries::new(YEAR_79, max_year),
            mfb: AnnualSeries::new(YEAR_79, max_year),
        }
    }

    pub fn last_year(&self) -> i32 {
        self.pia.last_year()
    }

    /// Recompute both formulas for eligibility years `first..=last`
    pub fn project(&mut self, average_wages: &AnnualSeries, first: i32, last: i32) -> Result<()> {
        let first = first.max(self.pia.base_year());
        let last = last.min(self.pia.last_year());
        for elig in first..=last {
            let pia = project_bend_points(&PIA_BASE_BEND_POINTS, elig, average_wages)?;
            let mfb = project_bend_points(&MFB_BASE_BEND_POINTS, elig, average_wages)?;
            self.pia[elig] = Formula::new(&pia, &PIA_PERCENTAGES)?;
            self.mfb[elig] = Formula::new(&mfb, &MFB_PERCENTAGES)?;
        }
        debug!("bend points projected for {}-{}", first, last);
        Ok(())
    }

    pub fn pia(&self, elig_year: i32) -> Result<Formula> {
        self.pia.get(elig_year)
    }

    pub fn mfb(&self, elig_year: i32) -> Result<Formula> {
        self.mfb.get(elig_year)
    }
}
