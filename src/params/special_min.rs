//! Special minimum PIA and MFB by years of coverage over 10
//!
//! Amounts start at $11.50 per year of coverage over 10 and are raised by
//! every benefit increase from June 1979, or by average wages where an
//! amended rule says so. The December 1999 increase was paid 0.1 point short
//! and corrected effective August 2001, so lookups for August through
//! November 2001 read a separate track holding the corrected amounts.

use chrono::Month;
use log::debug;
use serde::Serialize;

use super::cola::{apply_cola, apply_cola_mfb, unapply_cola, unapply_cola_mfb};
use super::rules::{SpecialMinimumRule, SPECIAL_MINIMUM_PER_YEAR};
use crate::error::{ParamsError, Result};
use crate::rounding::{floor_dime, mfb_floor};
use crate::series::AnnualSeries;

/// Most years of coverage over 10 that count
pub const MAX_YEARS_OVER_10: u32 = 20;

/// Index year of the seed amounts
pub const SEED_YEAR: i32 = 1978;

/// First year benefit increases are effective in December
pub const FIRST_DECEMBER_COLA_YEAR: i32 = 1983;

/// Increase that was paid short
const SHORT_PAID_YEAR: i32 = 1999;

/// Points the short-paid increase was short by
const SHORTFALL: f64 = 0.1;

/// Year the shortfall was made good
const CORRECTION_YEAR: i32 = 2001;

/// PIA and MFB for one years-of-coverage count in one index year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SpecialMinimumEntry {
    pia: f64,
    mfb: f64,
}

impl SpecialMinimumEntry {
    /// The MFB is raised to 150% of the PIA if below it
    pub fn new(pia: f64, mfb: f64) -> Self {
        Self {
            pia,
            mfb: mfb.max(mfb_floor(pia)),
        }
    }

    pub fn pia(&self) -> f64 {
        self.pia
    }

    pub fn mfb(&self) -> f64 {
        self.mfb
    }

    fn seed(years_over_10: u32) -> Self {
        Self::new(f64::from(years_over_10) * SPECIAL_MINIMUM_PER_YEAR, 0.0)
    }

    fn raised(self, percent: f64, year: i32) -> Self {
        let pia = apply_cola(self.pia, percent, year);
        Self::new(pia, apply_cola_mfb(self.mfb, percent, year, pia))
    }

    fn lowered(self, percent: f64, year: i32) -> Self {
        let pia = unapply_cola(self.pia, percent, year);
        Self::new(pia, unapply_cola_mfb(self.mfb, percent, year, pia))
    }

    fn wage_indexed(self, factor: f64) -> Self {
        Self::new(floor_dime(self.pia * factor), floor_dime(self.mfb * factor))
    }
}

/// Benefit-increase year in force in `month` of `year`: increases took
/// effect in June through 1982 and in December from 1983
pub fn index_year(month: Month, year: i32) -> i32 {
    let cola_month = if year < FIRST_DECEMBER_COLA_YEAR {
        Month::June
    } else {
        Month::December
    };
    if month.number_from_month() >= cola_month.number_from_month() {
        year
    } else {
        year - 1
    }
}

fn check_years(years_over_10: u32) -> Result<usize> {
    if (1..=MAX_YEARS_OVER_10).contains(&years_over_10) {
        Ok((years_over_10 - 1) as usize)
    } else {
        Err(ParamsError::InvalidYearsOfCoverage(years_over_10))
    }
}

/// Special minimum amounts for 1 through 20 years of coverage over 10
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialMinimumTable {
    regular: Vec<AnnualSeries<SpecialMinimumEntry>>,
    corrected_2001: Vec<SpecialMinimumEntry>,
}

impl SpecialMinimumTable {
    /// Seeded table spanning 1978 through `max_year`
    pub fn new(max_year: i32) -> Self {
        let regular = (1..=MAX_YEARS_OVER_10)
            .map(|n| {
                let mut series = AnnualSeries::new(SEED_YEAR, max_year);
                series[SEED_YEAR] = SpecialMinimumEntry::seed(n);
                series
            })
            .collect();
        Self {
            regular,
            corrected_2001: vec![SpecialMinimumEntry::default(); MAX_YEARS_OVER_10 as usize],
        }
    }

    pub fn last_year(&self) -> i32 {
        self.regular[0].last_year()
    }

    /// Project `first..=last` from the amounts for `first - 1`
    pub fn project(
        &mut self,
        benefit_increases: &AnnualSeries,
        average_wages: &AnnualSeries,
        rule: &dyn SpecialMinimumRule,
        first: i32,
        last: i32,
    ) -> Result<()> {
        if first <= SEED_YEAR || last > self.last_year() {
            return Err(ParamsError::YearOutOfRange {
                year: if first <= SEED_YEAR { first } else { last },
                first: SEED_YEAR + 1,
                last: self.last_year(),
            });
        }

        for year in first..=last {
            let factor = rule.wage_factor(year, average_wages)?;
            let mut percent = benefit_increases.get(year)?;
            if year == SHORT_PAID_YEAR {
                percent = (percent - SHORTFALL).max(0.0);
            }
            for (k, series) in self.regular.iter_mut().enumerate() {
                let prior = if year == CORRECTION_YEAR {
                    self.corrected_2001[k]
                } else {
                    series.get(year - 1)?
                };
                series[year] = match factor {
                    Some(f) => prior.wage_indexed(f),
                    None => prior.raised(percent, year),
                };
            }
            if year == CORRECTION_YEAR - 1 {
                self.correct_short_increase(benefit_increases)?;
            }
        }
        debug!("special minimum projected for {}-{}", first, last);
        Ok(())
    }

    /// Rebuild the 2000 amounts as if the 1999 increase had been paid in full
    fn correct_short_increase(&mut self, benefit_increases: &AnnualSeries) -> Result<()> {
        let paid = benefit_increases.get(SHORT_PAID_YEAR)?;
        let short = (paid - SHORTFALL).max(0.0);
        let following = benefit_increases.get(SHORT_PAID_YEAR + 1)?;
        for (k, series) in self.regular.iter().enumerate() {
            self.corrected_2001[k] = series
                .get(SHORT_PAID_YEAR + 1)?
                .lowered(following, SHORT_PAID_YEAR + 1)
                .lowered(short, SHORT_PAID_YEAR)
                .raised(paid, SHORT_PAID_YEAR)
                .raised(following, SHORT_PAID_YEAR + 1);
        }
        Ok(())
    }

    /// Amounts in force in `month` of `year`
    pub fn lookup(&self, years_over_10: u32, month: Month, year: i32) -> Result<SpecialMinimumEntry> {
        let k = check_years(years_over_10)?;
        let indexed = index_year(month, year);
        if indexed == CORRECTION_YEAR - 1
            && year == CORRECTION_YEAR
            && month.number_from_month() >= Month::August.number_from_month()
        {
            return Ok(self.corrected_2001[k]);
        }
        self.regular[k].get(indexed)
    }

    /// Amounts after the increase effective in `year`
    pub fn entry(&self, years_over_10: u32, year: i32) -> Result<SpecialMinimumEntry> {
        self.regular[check_years(years_over_10)?].get(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoricalInput;
    use crate::params::rules::{PresentLawSpecialMinimum, WageIndexedSpecialMinimum};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::{prop_assert, proptest};

    fn projected_through_2024() -> SpecialMinimumTable {
        let history = HistoricalInput::embedded(2024).unwrap();
        let mut table = SpecialMinimumTable::new(2030);
        table
            .project(
                history.benefit_increases(),
                history.average_wages(),
                &PresentLawSpecialMinimum,
                1979,
                2024,
            )
            .unwrap();
        table
    }

    #[test]
    fn test_index_year() {
        assert_eq!(index_year(Month::May, 1980), 1979);
        assert_eq!(index_year(Month::June, 1980), 1980);
        assert_eq!(index_year(Month::November, 1983), 1982);
        assert_eq!(index_year(Month::December, 1983), 1983);
        assert_eq!(index_year(Month::July, 2001), 2000);
    }

    #[test]
    fn test_first_increase() {
        let table = projected_through_2024();
        // 230.00 * 1.099 = 252.77, rounded up before 1982
        assert_abs_diff_eq!(table.entry(20, 1979).unwrap().pia(), 252.8, epsilon = 1e-9);
        assert_abs_diff_eq!(table.entry(20, 1978).unwrap().pia(), 230.0, epsilon = 1e-9);
        assert_abs_diff_eq!(table.entry(1, 1978).unwrap().mfb(), 17.25, epsilon = 1e-9);
        assert_eq!(
            table.lookup(20, Month::May, 1979).unwrap(),
            table.entry(20, 1978).unwrap()
        );
    }

    #[test]
    fn test_august_2001_track() {
        let table = projected_through_2024();
        let july = table.lookup(15, Month::July, 2001).unwrap();
        let august = table.lookup(15, Month::August, 2001).unwrap();
        let november = table.lookup(15, Month::November, 2001).unwrap();
        let december = table.lookup(15, Month::December, 2001).unwrap();

        assert_eq!(july, table.entry(15, 2000).unwrap());
        assert!(august.pia() > july.pia());
        assert_eq!(august, november);
        assert_eq!(december, table.entry(15, 2001).unwrap());
        assert_abs_diff_eq!(december.pia(), apply_cola(august.pia(), 2.6, 2001), epsilon = 1e-9);
        // the track only exists in 2001
        assert_eq!(
            table.lookup(15, Month::August, 2000).unwrap(),
            table.entry(15, 1999).unwrap()
        );
    }

    #[test]
    fn test_invalid_years_of_coverage() {
        let table = projected_through_2024();
        assert!(matches!(
            table.lookup(0, Month::January, 2010),
            Err(ParamsError::InvalidYearsOfCoverage(0))
        ));
        assert!(matches!(table.entry(21, 2010), Err(ParamsError::InvalidYearsOfCoverage(21))));
    }

    #[test]
    fn test_projection_range_is_checked() {
        let history = HistoricalInput::embedded(2024).unwrap();
        let mut table = SpecialMinimumTable::new(2030);
        let result = table.project(
            history.benefit_increases(),
            history.average_wages(),
            &PresentLawSpecialMinimum,
            1978,
            2000,
        );
        assert!(matches!(result, Err(ParamsError::YearOutOfRange { .. })));
    }

    #[test]
    fn test_wage_indexing_replaces_increases() {
        let mut table = projected_through_2024();
        let mut fq = AnnualSeries::new(1951, 2030);
        for year in 1951..=2030 {
            fq[year] = 1000.0 * 1.05_f64.powi(year - 1951);
        }
        let bi = AnnualSeries::filled(1951, 2030, 2.0);
        let rule = WageIndexedSpecialMinimum { effective_year: 2026 };
        table.project(&bi, &fq, &rule, 2025, 2030).unwrap();

        let before = table.entry(10, 2025).unwrap();
        let after = table.entry(10, 2026).unwrap();
        assert_abs_diff_eq!(after.pia(), floor_dime(before.pia() * 1.05), epsilon = 1e-9);
        assert_abs_diff_eq!(before.pia(), apply_cola(table.entry(10, 2024).unwrap().pia(), 2.0, 2025), epsilon = 1e-9);
    }

    proptest! {
        #[test]
        fn prop_mfb_floor_holds(rates in proptest::collection::vec(0u32..120, 50)) {
            let mut bi = AnnualSeries::new(1951, 2028);
            for (i, r) in rates.iter().enumerate() {
                bi[1979 + i as i32] = f64::from(*r) / 10.0;
            }
            let fq = AnnualSeries::filled(1951, 2028, 1000.0);
            let mut table = SpecialMinimumTable::new(2028);
            table.project(&bi, &fq, &PresentLawSpecialMinimum, 1979, 2028).unwrap();
            for n in 1..=MAX_YEARS_OVER_10 {
                for year in SEED_YEAR..=2028 {
                    let entry = table.entry(n, year).unwrap();
                    prop_assert!(entry.mfb() >= 1.5 * entry.pia() - 1e-9);
                }
                let corrected = table.lookup(n, Month::September, 2001).unwrap();
                prop_assert!(corrected.mfb() >= 1.5 * corrected.pia() - 1e-9);
            }
        }
    }
}
