//! Rule families that differ between present law and amended law
//!
//! The engine holds one implementation of each trait. Present-law rules are
//! unit structs; amended rules carry their parameters and deserialize from the
//! `amendments` block of a projection config.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::wage_base::{self, WageBaseSeries};
use crate::error::{ParamsError, Result};
use crate::series::AnnualSeries;

/// Age in whole years and months
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgeYm {
    pub years: u32,
    pub months: u32,
}

impl AgeYm {
    pub const fn new(years: u32, months: u32) -> Self {
        Self { years, months }
    }

    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }

    pub fn from_months(months: u32) -> Self {
        Self {
            years: months / 12,
            months: months % 12,
        }
    }
}

impl fmt::Display for AgeYm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}y{}m", self.years, self.months)
    }
}

/// Turns an assumed CPI increase into the benefit increase paid
pub trait ColaRule: Send + Sync + fmt::Debug {
    fn benefit_increase(&self, year: i32, cpi_increase: f64) -> f64;
}

/// Projects the OASDI base
pub trait WageBaseRule: Send + Sync + fmt::Debug {
    fn project_oasdi(
        &self,
        bases: &mut WageBaseSeries,
        average_wages: &AnnualSeries,
        benefit_increases: &AnnualSeries,
        first: i32,
        last: i32,
    ) -> Result<()>;
}

/// Indexes the special minimum PIA
pub trait SpecialMinimumRule: Send + Sync + fmt::Debug {
    /// Wage-indexing factor for `year`, or `None` to apply the benefit increase
    fn wage_factor(&self, year: i32, average_wages: &AnnualSeries) -> Result<Option<f64>>;
}

/// Full retirement age by year of birth
pub trait RetirementAgeRule: Send + Sync + fmt::Debug {
    fn full_retirement_age(&self, birth_year: i32) -> AgeYm;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PresentLawCola;

impl ColaRule for PresentLawCola {
    fn benefit_increase(&self, _year: i32, cpi_increase: f64) -> f64 {
        cpi_increase
    }
}

/// CPI increase less a fixed number of points from an effective year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReducedCola {
    pub effective_year: i32,
    pub reduction: f64,
}

impl ColaRule for ReducedCola {
    fn benefit_increase(&self, year: i32, cpi_increase: f64) -> f64 {
        if year >= self.effective_year {
            (cpi_increase - self.reduction).max(0.0)
        } else {
            cpi_increase
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PresentLawWageBase;

impl WageBaseRule for PresentLawWageBase {
    fn project_oasdi(
        &self,
        bases: &mut WageBaseSeries,
        average_wages: &AnnualSeries,
        benefit_increases: &AnnualSeries,
        first: i32,
        last: i32,
    ) -> Result<()> {
        wage_base::project_present_law(bases, average_wages, benefit_increases, first, last)
    }
}

/// Fixed OASDI bases through a last ad hoc year, wage indexed after
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdHocWageBase {
    /// First year an ad hoc base applies
    pub first_year: i32,

    /// Bases from `first_year` on, one per year
    pub bases: Vec<f64>,
}

impl AdHocWageBase {
    pub fn last_ad_hoc_year(&self) -> i32 {
        self.first_year + self.bases.len() as i32 - 1
    }
}

impl WageBaseRule for AdHocWageBase {
    fn project_oasdi(
        &self,
        bases: &mut WageBaseSeries,
        average_wages: &AnnualSeries,
        benefit_increases: &AnnualSeries,
        first: i32,
        last: i32,
    ) -> Result<()> {
        if self.bases.is_empty() {
            return Err(ParamsError::InvalidArgument {
                what: "ad hoc wage bases",
                reason: "no bases given".to_string(),
            });
        }
        let last_ad_hoc = self.last_ad_hoc_year();
        // present law up to the first ad hoc year
        let present_last = last.min(self.first_year - 1);
        if first <= present_last {
            wage_base::project_present_law(bases, average_wages, benefit_increases, first, present_last)?;
        }
        let ad_hoc = AnnualSeries::from_values(self.first_year, self.bases.clone());
        for year in first.max(self.first_year)..=last.min(last_ad_hoc) {
            bases.set_projected(year, ad_hoc[year])?;
        }
        if last > last_ad_hoc {
            wage_base::project_after_ad_hoc(
                bases,
                average_wages,
                benefit_increases,
                last_ad_hoc,
                first,
                last,
            )?;
        }
        Ok(())
    }
}

/// Amount per year of coverage over 10 in the special minimum seed year
pub const SPECIAL_MINIMUM_PER_YEAR: f64 = 11.50;

#[derive(Debug, Clone, Copy, Default)]
pub struct PresentLawSpecialMinimum;

impl SpecialMinimumRule for PresentLawSpecialMinimum {
    fn wage_factor(&self, _year: i32, _average_wages: &AnnualSeries) -> Result<Option<f64>> {
        Ok(None)
    }
}

/// Special minimum indexed by average wages from an effective year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WageIndexedSpecialMinimum {
    pub effective_year: i32,
}

impl SpecialMinimumRule for WageIndexedSpecialMinimum {
    fn wage_factor(&self, year: i32, average_wages: &AnnualSeries) -> Result<Option<f64>> {
        if year < self.effective_year {
            return Ok(None);
        }
        let denominator = average_wages.get(year - 3)?;
        if denominator == 0.0 {
            return Err(ParamsError::Precondition(format!(
                "average wage for {} is zero",
                year - 3
            )));
        }
        Ok(Some(average_wages.get(year - 2)? / denominator))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PresentLawRetirementAge;

impl RetirementAgeRule for PresentLawRetirementAge {
    fn full_retirement_age(&self, birth_year: i32) -> AgeYm {
        match birth_year {
            y if y <= 1937 => AgeYm::new(65, 0),
            y if y <= 1942 => AgeYm::new(65, (2 * (y - 1937)) as u32),
            y if y <= 1954 => AgeYm::new(66, 0),
            y if y <= 1959 => AgeYm::new(66, (2 * (y - 1954)) as u32),
            _ => AgeYm::new(67, 0),
        }
    }
}

/// Present law through age 67, then rising by a number of months per
/// birth cohort up to a cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RisingRetirementAge {
    /// First birth year past age 67
    pub first_cohort: i32,

    pub months_per_cohort: u32,

    pub cap: AgeYm,
}

impl RetirementAgeRule for RisingRetirementAge {
    fn full_retirement_age(&self, birth_year: i32) -> AgeYm {
        if birth_year < self.first_cohort {
            return PresentLawRetirementAge.full_retirement_age(birth_year);
        }
        let cohorts = (birth_year - self.first_cohort + 1) as u32;
        let months = AgeYm::new(67, 0).total_months() + cohorts * self.months_per_cohort;
        AgeYm::from_months(months.min(self.cap.total_months()))
    }
}

/// Amendments to present law; any field left out keeps present law
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Amendments {
    pub cola: Option<ReducedCola>,
    pub wage_base: Option<AdHocWageBase>,
    pub special_minimum: Option<WageIndexedSpecialMinimum>,
    pub retirement_age: Option<RisingRetirementAge>,
}

/// The rule implementations an engine runs with
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub cola: Arc<dyn ColaRule>,
    pub wage_base: Arc<dyn WageBaseRule>,
    pub special_minimum: Arc<dyn SpecialMinimumRule>,
    pub retirement_age: Arc<dyn RetirementAgeRule>,
}

impl RuleSet {
    pub fn present_law() -> Self {
        Self {
            cola: Arc::new(PresentLawCola),
            wage_base: Arc::new(PresentLawWageBase),
            special_minimum: Arc::new(PresentLawSpecialMinimum),
            retirement_age: Arc::new(PresentLawRetirementAge),
        }
    }

    pub fn amended(amendments: &Amendments) -> Self {
        let mut rules = Self::present_law();
        if let Some(cola) = amendments.cola {
            rules.cola = Arc::new(cola);
        }
        if let Some(wage_base) = &amendments.wage_base {
            rules.wage_base = Arc::new(wage_base.clone());
        }
        if let Some(special_minimum) = amendments.special_minimum {
            rules.special_minimum = Arc::new(special_minimum);
        }
        if let Some(retirement_age) = amendments.retirement_age {
            rules.retirement_age = Arc::new(retirement_age);
        }
        rules
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::present_law()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoricalInput;
    use crate::series::YEAR_37;

    #[test]
    fn test_present_law_full_retirement_age() {
        let rule = PresentLawRetirementAge;
        assert_eq!(rule.full_retirement_age(1930), AgeYm::new(65, 0));
        assert_eq!(rule.full_retirement_age(1938), AgeYm::new(65, 2));
        assert_eq!(rule.full_retirement_age(1942), AgeYm::new(65, 10));
        assert_eq!(rule.full_retirement_age(1950), AgeYm::new(66, 0));
        assert_eq!(rule.full_retirement_age(1957), AgeYm::new(66, 6));
        assert_eq!(rule.full_retirement_age(1960), AgeYm::new(67, 0));
        assert_eq!(rule.full_retirement_age(1990), AgeYm::new(67, 0));
    }

    #[test]
    fn test_rising_retirement_age_caps() {
        let rule = RisingRetirementAge {
            first_cohort: 1970,
            months_per_cohort: 2,
            cap: AgeYm::new(68, 0),
        };
        assert_eq!(rule.full_retirement_age(1969), AgeYm::new(67, 0));
        assert_eq!(rule.full_retirement_age(1970), AgeYm::new(67, 2));
        assert_eq!(rule.full_retirement_age(1974), AgeYm::new(67, 10));
        assert_eq!(rule.full_retirement_age(1975), AgeYm::new(68, 0));
        assert_eq!(rule.full_retirement_age(2000), AgeYm::new(68, 0));
        assert_eq!(rule.full_retirement_age(1957), AgeYm::new(66, 6));
    }

    #[test]
    fn test_reduced_cola_floors_at_zero() {
        let rule = ReducedCola {
            effective_year: 2030,
            reduction: 1.0,
        };
        assert_eq!(rule.benefit_increase(2029, 2.4), 2.4);
        assert!((rule.benefit_increase(2030, 2.4) - 1.4).abs() < 1e-12);
        assert_eq!(rule.benefit_increase(2031, 0.6), 0.0);
    }

    #[test]
    fn test_ad_hoc_wage_base_switches_regimes() {
        let h = HistoricalInput::embedded(2024).unwrap();
        let mut fq = AnnualSeries::new(1951, 2040);
        fq.assign(h.average_wages(), 1951, 2023);
        for year in 2024..=2040 {
            fq[year] = fq[year - 1] * 1.035;
        }
        let bi = AnnualSeries::filled(1951, 2040, 2.4);
        let rule = AdHocWageBase {
            first_year: 2028,
            bases: vec![250_000.0, 275_000.0],
        };
        assert_eq!(rule.last_ad_hoc_year(), 2029);

        let mut bases = WageBaseSeries::new(2040);
        bases.set_history(h.oasdi_bases(), YEAR_37, 2025);
        rule.project_oasdi(&mut bases, &fq, &bi, 2026, 2040).unwrap();

        let mut present = WageBaseSeries::new(2040);
        present.set_history(h.oasdi_bases(), YEAR_37, 2025);
        PresentLawWageBase.project_oasdi(&mut present, &fq, &bi, 2026, 2027).unwrap();

        assert_eq!(bases.get(2027).unwrap(), present.get(2027).unwrap());
        assert_eq!(bases.get(2028).unwrap(), 250_000.0);
        assert_eq!(bases.get(2029).unwrap(), 275_000.0);
        assert!(bases.get(2030).unwrap() > 275_000.0);
        assert!(bases.series().is_non_decreasing(2025, 2040));
    }

    #[test]
    fn test_wage_indexed_special_minimum_factor() {
        let fq = AnnualSeries::from_values(2030, vec![100.0, 104.0, 108.16]);
        let rule = WageIndexedSpecialMinimum { effective_year: 2033 };
        assert_eq!(rule.wage_factor(2032, &fq).unwrap(), None);
        let factor = rule.wage_factor(2033, &fq).unwrap().unwrap();
        assert!((factor - 1.04).abs() < 1e-12);
    }

    #[test]
    fn test_amendments_deserialize_with_defaults() {
        let amendments: Amendments =
            serde_json::from_str(r#"{"cola": {"effective_year": 2030, "reduction": 0.5}}"#).unwrap();
        assert_eq!(amendments.cola.map(|c| c.reduction), Some(0.5));
        assert!(amendments.wage_base.is_none());
        let rules = RuleSet::amended(&amendments);
        assert_eq!(rules.cola.benefit_increase(2031, 2.0), 1.5);
    }
}
