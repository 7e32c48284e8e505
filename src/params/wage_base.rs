//! Contribution and benefit bases
//!
//! Three families are kept: the present-law OASDI base, the old-law base (what
//! the base would have been under the 1972 automatic provisions), and the HI
//! base. A base is recomputed only in years following a benefit increase;
//! otherwise the prior year's base carries forward. No base ever decreases.

use log::debug;

use crate::error::{ParamsError, Result};
use crate::history::{HI_UNCAPPED, YEAR_HI_UNCAPPED};
use crate::rounding::round_to_multiple;
use crate::series::{AnnualSeries, YEAR_37, YEAR_79};

/// Bases are rounded to a multiple of this amount
pub const BASE_ROUNDING: f64 = 300.0;

/// Benefit increases below this do not trigger a new base
pub const MIN_TRIGGERING_INCREASE: f64 = 0.1;

/// Legislated OASDI bases for 1979-1981
const LEGISLATED_1979_1981: [f64; 3] = [22900.0, 25900.0, 29700.0];

/// Deferred compensation corrections for 1990-1992
const DEFERRED_COMPENSATION: [f64; 3] = [1.0255, 1.0269, 1.0201];

/// Legislated HI bases for 1991-1993
const HI_LEGISLATED_1991_1993: [f64; 3] = [125000.0, 130200.0, 135000.0];

/// A base series that never decreases
#[derive(Debug, Clone, PartialEq)]
pub struct WageBaseSeries {
    values: AnnualSeries,
}

impl WageBaseSeries {
    pub fn new(max_year: i32) -> Self {
        Self {
            values: AnnualSeries::new(YEAR_37, max_year),
        }
    }

    pub fn series(&self) -> &AnnualSeries {
        &self.values
    }

    pub fn get(&self, year: i32) -> Result<f64> {
        self.values.get(year)
    }

    /// Copy known bases; these are taken as given
    pub fn set_history(&mut self, source: &AnnualSeries, first: i32, last: i32) -> usize {
        self.values.assign(source, first, last)
    }

    /// Store a projected base, raised to the prior year's base if lower.
    /// Returns the stored value.
    pub fn set_projected(&mut self, year: i32, base: f64) -> Result<f64> {
        let previous = self.values.get(year - 1)?;
        let stored = base.max(previous);
        self.values.set(year, stored)?;
        Ok(stored)
    }

    /// Keep the prior year's base
    pub fn carry_forward(&mut self, year: i32) -> Result<f64> {
        let previous = self.values.get(year - 1)?;
        self.values.set(year, previous)?;
        Ok(previous)
    }
}

fn wage_ratio(average_wages: &AnnualSeries, year: i32, base_year: i32) -> Result<f64> {
    let denominator = average_wages.get(base_year)?;
    if denominator == 0.0 {
        return Err(ParamsError::Precondition(format!(
            "average wage for {} is zero",
            base_year
        )));
    }
    Ok(average_wages.get(year)? / denominator)
}

fn no_increase(benefit_increases: &AnnualSeries, year: i32) -> Result<bool> {
    Ok(benefit_increases.get(year - 1)? < MIN_TRIGGERING_INCREASE)
}

fn check_projectable(first: i32) -> Result<()> {
    if first < YEAR_79 {
        return Err(ParamsError::YearOutOfRange {
            year: first,
            first: YEAR_79,
            last: crate::series::MAX_YEAR,
        });
    }
    Ok(())
}

/// Project the present-law OASDI base for `first..=last`
pub fn project_present_law(
    bases: &mut WageBaseSeries,
    average_wages: &AnnualSeries,
    benefit_increases: &AnnualSeries,
    first: i32,
    last: i32,
) -> Result<()> {
    check_projectable(first)?;
    for year in first..=last {
        if no_increase(benefit_increases, year)? {
            bases.carry_forward(year)?;
            continue;
        }
        let unrounded = match year {
            1979..=1981 => LEGISLATED_1979_1981[(year - 1979) as usize],
            1982..=1989 => 29700.0 * wage_ratio(average_wages, year - 2, 1979)?,
            1990..=1992 => {
                29700.0
                    * wage_ratio(average_wages, year - 2, 1979)?
                    * DEFERRED_COMPENSATION[(year - 1990) as usize]
            }
            _ => 60600.0 * wage_ratio(average_wages, year - 2, 1992)?,
        };
        bases.set_projected(year, round_to_multiple(unrounded, BASE_ROUNDING))?;
    }
    debug!("present-law bases projected for {}-{}", first, last);
    Ok(())
}

/// Project the old-law base for `first..=last`
pub fn project_old_law(
    bases: &mut WageBaseSeries,
    average_wages: &AnnualSeries,
    benefit_increases: &AnnualSeries,
    first: i32,
    last: i32,
) -> Result<()> {
    check_projectable(first)?;
    for year in first..=last {
        if no_increase(benefit_increases, year)? {
            bases.carry_forward(year)?;
            continue;
        }
        let unrounded = if year <= 1992 {
            bases.get(year - 1)? * wage_ratio(average_wages, year - 2, year - 3)?
        } else {
            45000.0 * wage_ratio(average_wages, year - 2, 1992)?
        };
        bases.set_projected(year, round_to_multiple(unrounded, BASE_ROUNDING))?;
    }
    debug!("old-law bases projected for {}-{}", first, last);
    Ok(())
}

/// Project the HI base for `first..=last` from the OASDI base
pub fn project_hi(hi: &mut WageBaseSeries, oasdi: &WageBaseSeries, first: i32, last: i32) -> Result<()> {
    check_projectable(first)?;
    for year in first..=last {
        let base = if year <= 1990 {
            oasdi.get(year)?
        } else if year < YEAR_HI_UNCAPPED {
            HI_LEGISLATED_1991_1993[(year - 1991) as usize]
        } else {
            HI_UNCAPPED
        };
        hi.set_projected(year, base)?;
    }
    Ok(())
}

/// Continue a base series by wage indexing after a last ad hoc year.
/// Only years in `first..=last` after `last_ad_hoc` are written.
pub fn project_after_ad_hoc(
    bases: &mut WageBaseSeries,
    average_wages: &AnnualSeries,
    benefit_increases: &AnnualSeries,
    last_ad_hoc: i32,
    first: i32,
    last: i32,
) -> Result<()> {
    let anchor = bases.get(last_ad_hoc)?;
    let start = first.max(last_ad_hoc + 1);
    for year in start..=last {
        if no_increase(benefit_increases, year)? {
            bases.carry_forward(year)?;
            continue;
        }
        let unrounded = anchor * wage_ratio(average_wages, year - 2, last_ad_hoc - 2)?;
        bases.set_projected(year, round_to_multiple(unrounded, BASE_ROUNDING))?;
    }
    debug!("bases continued after ad hoc year {} for {}-{}", last_ad_hoc, start, last);
    Ok(())
}

/// The three base families
#[derive(Debug, Clone, PartialEq)]
pub struct WageBases {
    pub oasdi: WageBaseSeries,
    pub old_law: WageBaseSeries,
    pub hi: WageBaseSeries,
}

impl WageBases {
    pub fn new(max_year: i32) -> Self {
        Self {
            oasdi: WageBaseSeries::new(max_year),
            old_law: WageBaseSeries::new(max_year),
            hi: WageBaseSeries::new(max_year),
        }
    }
}
