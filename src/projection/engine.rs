//! Parameter projection engine
//!
//! `ParameterEngine` owns every projected table and keeps them consistent:
//! historical prefixes come from a shared `HistoricalInput`, projected years
//! come from an assumption alternative or from caller-supplied series, and
//! any change to average wages or benefit increases re-runs the tables that
//! depend on them.
//!
//! Years before the first projected year (`istart`) are history. Reading a
//! projected year before the corresponding update has run fails with
//! `ParamsError::NotProjected`.

use std::sync::Arc;

use chrono::Month;
use log::{debug, info, warn};

use crate::assumptions::{Alternative, AssumptionSource, CatchupTable, CurrentYear};
use crate::error::{AssumptionKind, ParamsError, Result};
use crate::history::HistoricalInput;
use crate::params::bend_points::{self, BendPointTable, Formula};
use crate::params::cola;
use crate::params::ret_test::{self, RetirementTestAmounts, TestBracket};
use crate::params::rules::{AgeYm, Amendments, RuleSet};
use crate::params::special_min::{self, SpecialMinimumEntry, SpecialMinimumTable, SEED_YEAR};
use crate::params::wage_base::{self, WageBases};
use crate::rounding::round_cents;
use crate::series::{AnnualSeries, YEAR_37, YEAR_51, YEAR_79};

/// Title of a projected series and whether the caller supplied it
#[derive(Debug, Clone, Default, PartialEq)]
struct Title {
    text: String,
    user: bool,
}

/// Engine holding one coherent set of benefit parameters
#[derive(Debug, Clone)]
pub struct ParameterEngine {
    anchor: CurrentYear,
    history: Arc<HistoricalInput>,
    rules: RuleSet,

    /// Average wage levels, 1951 on
    average_wages: AnnualSeries,

    /// Average wage increases in percent; 1951 holds zero
    average_wage_increases: AnnualSeries,

    /// Assumed CPI increases before any amended COLA rule
    cpi_increases: AnnualSeries,

    /// Benefit increases paid
    benefit_increases: AnnualSeries,

    catchup: CatchupTable,

    alternatives: Option<(Alternative, Alternative)>,
    average_wage_title: Title,
    benefit_increase_title: Title,

    bend_points: BendPointTable,
    wage_bases: WageBases,
    ret_test: RetirementTestAmounts,
    special_minimum: SpecialMinimumTable,

    wages_projected: bool,
    increases_projected: bool,
}

impl ParameterEngine {
    /// Engine under present law, anchored on the year after `history`
    pub fn present_law(history: Arc<HistoricalInput>, max_year: i32) -> Result<Self> {
        Self::with_rules(history, max_year, RuleSet::present_law())
    }

    /// Engine with `amendments` replacing the matching present-law rules
    pub fn amended_law(history: Arc<HistoricalInput>, max_year: i32, amendments: &Amendments) -> Result<Self> {
        Self::with_rules(history, max_year, RuleSet::amended(amendments))
    }

    pub fn with_rules(history: Arc<HistoricalInput>, max_year: i32, rules: RuleSet) -> Result<Self> {
        let anchor = CurrentYear::new(history.istart(), max_year)?;
        let mut engine = Self {
            anchor,
            history: Arc::clone(&history),
            rules,
            average_wages: AnnualSeries::new(YEAR_51, max_year),
            average_wage_increases: AnnualSeries::new(YEAR_51, max_year),
            cpi_increases: AnnualSeries::new(YEAR_51, max_year),
            benefit_increases: AnnualSeries::new(YEAR_51, max_year),
            catchup: CatchupTable::new(anchor.year()),
            alternatives: None,
            average_wage_title: Title::default(),
            benefit_increase_title: Title::default(),
            bend_points: BendPointTable::new(max_year),
            wage_bases: WageBases::new(max_year),
            ret_test: RetirementTestAmounts::new(max_year, anchor.year()),
            special_minimum: SpecialMinimumTable::new(max_year),
            wages_projected: false,
            increases_projected: false,
        };
        engine.set_data(history)?;
        Ok(engine)
    }

    /// Replace the historical input and move the anchor to the year after it.
    /// Projected years must be updated again afterwards.
    pub fn set_data(&mut self, history: Arc<HistoricalInput>) -> Result<()> {
        self.anchor.set(history.istart())?;
        self.history = history;
        self.load_history()?;
        info!(
            "historical data loaded through {}, first projected year {}",
            self.history.last_year(),
            self.istart()
        );
        Ok(())
    }

    /// Move the first projected year. History must reach the year before it.
    /// Projected years must be updated again afterwards.
    pub fn set_istart(&mut self, year: i32) -> Result<()> {
        if year > self.history.istart() {
            return Err(ParamsError::InvalidStartYear {
                year,
                max: self.history.istart(),
            });
        }
        self.anchor.set(year)?;
        self.load_history()?;
        info!("first projected year set to {}", year);
        Ok(())
    }

    /// Copy history before the anchor into every table and clear projections
    fn load_history(&mut self) -> Result<()> {
        let istart = self.istart();
        let max_year = self.max_year();
        let history = Arc::clone(&self.history);

        self.benefit_increases.assign(history.benefit_increases(), YEAR_51, istart - 1);
        self.cpi_increases.assign(history.benefit_increases(), YEAR_51, istart - 1);
        self.average_wages.assign(history.average_wages(), YEAR_51, istart - 2);
        self.average_wage_increases[YEAR_51] = 0.0;
        for year in YEAR_51 + 1..=istart - 2 {
            self.average_wage_increases[year] = increase(&self.average_wages, year)?;
        }

        self.wage_bases.oasdi.set_history(history.oasdi_bases(), YEAR_37, istart);
        self.wage_bases.old_law.set_history(history.old_law_bases(), YEAR_37, istart);
        self.wage_bases.hi.set_history(history.hi_bases(), YEAR_37, istart);

        self.ret_test = RetirementTestAmounts::new(max_year, RetirementTestAmounts::last_known_year(istart));
        self.special_minimum = SpecialMinimumTable::new(max_year);
        self.special_minimum.project(
            &self.benefit_increases,
            &self.average_wages,
            self.rules.special_minimum.as_ref(),
            SEED_YEAR + 1,
            istart - 1,
        )?;
        self.bend_points = BendPointTable::new(max_year);
        self.bend_points.project(&self.average_wages, YEAR_79, istart)?;

        self.catchup.set_start_year(istart);
        self.retitle();
        self.wages_projected = false;
        self.increases_projected = false;
        Ok(())
    }

    /// Re-derive titles that were not supplied by the caller
    fn retitle(&mut self) {
        let istart = self.istart();
        if let Some((aw, bi)) = self.alternatives {
            if !self.average_wage_title.user {
                self.average_wage_title.text = aw.title(AssumptionKind::AverageWage, istart);
            }
            if !self.benefit_increase_title.user {
                self.benefit_increase_title.text = bi.title(AssumptionKind::BenefitIncrease, istart);
            }
        }
    }

    /// Project every table from one pair of assumption alternatives
    pub fn project(
        &mut self,
        average_wage: Alternative,
        benefit_increase: Alternative,
        source: &dyn AssumptionSource,
    ) -> Result<()> {
        let istart = self.istart();
        let max_year = self.max_year();
        let wages = source.average_wage_increases(average_wage, istart, max_year)?;
        let increases = source.benefit_increases(benefit_increase, istart, max_year)?;

        self.alternatives = Some((average_wage, benefit_increase));
        self.average_wage_title = Title {
            user: wages.title != average_wage.title(AssumptionKind::AverageWage, istart),
            text: wages.title,
        };

        self.update_fqinc(&wages.values, istart - 1, max_year)?;
        self.update_cpiinc(&increases.series.values, increases.catchup, None, istart, max_year)?;
        self.benefit_increase_title = Title {
            user: increases.series.title != benefit_increase.title(AssumptionKind::BenefitIncrease, istart),
            text: increases.series.title,
        };

        info!(
            "projected average wages ({}) and benefit increases ({}) from {} through {}",
            average_wage, benefit_increase, istart, max_year
        );
        Ok(())
    }

    fn check_update_range(
        &self,
        what: &'static str,
        first: i32,
        last: i32,
        first_projected: i32,
        done: bool,
    ) -> Result<()> {
        if first < first_projected || first > last {
            return Err(ParamsError::InvalidArgument {
                what,
                reason: format!(
                    "{}-{} must start no earlier than {} and not be empty",
                    first, last, first_projected
                ),
            });
        }
        if first > first_projected && !done {
            return Err(ParamsError::Precondition(format!(
                "{} from {} must be set before later years",
                what, first_projected
            )));
        }
        Ok(())
    }

    /// Set projected average wage levels for `first..=last`, deriving the
    /// increases from them. Levels after `last` are rebuilt from the stored
    /// increases, so the first update must run through the last projected year.
    pub fn update_fq(&mut self, levels: &AnnualSeries, first: i32, last: i32) -> Result<()> {
        self.check_update_range("average wages", first, last, self.istart() - 1, self.wages_projected)?;
        let max_year = self.max_year();
        if !self.wages_projected && last < max_year {
            return Err(ParamsError::Precondition(format!(
                "average wages through {} must be set before a partial update",
                max_year
            )));
        }
        let copied = self.average_wages.assign(levels, first, last);
        if copied < (last - first + 1) as usize {
            warn!("average wages {}-{}: only {} years supplied", first, last, copied);
        }
        let through = last.min(max_year);
        for year in first..=through {
            self.average_wage_increases[year] = increase(&self.average_wages, year)?;
        }
        for year in through + 1..=max_year {
            let rate = self.average_wage_increases[year];
            self.average_wages[year] = round_cents(self.average_wages[year - 1] * (1.0 + rate / 100.0));
        }
        self.wages_projected = true;
        debug!("average wage levels updated for {}-{}", first, last);
        self.project_dependents()
    }

    /// Set projected average wage increases for `first..=last`; levels are
    /// rebuilt from `first` through the last projected year
    pub fn update_fqinc(&mut self, increases: &AnnualSeries, first: i32, last: i32) -> Result<()> {
        self.check_update_range("average wage increases", first, last, self.istart() - 1, self.wages_projected)?;
        let copied = self.average_wage_increases.assign(increases, first, last);
        if copied < (last - first + 1) as usize {
            warn!("average wage increases {}-{}: only {} years supplied", first, last, copied);
        }
        for year in first..=self.max_year() {
            let rate = self.average_wage_increases[year];
            self.average_wages[year] = round_cents(self.average_wages.get(year - 1)? * (1.0 + rate / 100.0));
        }
        self.wages_projected = true;
        debug!("average wage increases updated for {}-{}", first, last);
        self.project_dependents()
    }

    /// Set projected CPI increases for `first..=last`, convert them to
    /// benefit increases under the COLA rule, and replace the catch-up table.
    /// `title` replaces the benefit increase title when given.
    pub fn update_cpiinc(
        &mut self,
        increases: &AnnualSeries,
        catchup: CatchupTable,
        title: Option<String>,
        first: i32,
        last: i32,
    ) -> Result<()> {
        self.check_update_range("benefit increases", first, last, self.istart(), self.increases_projected)?;
        let copied = self.cpi_increases.assign(increases, first, last);
        if copied < (last - first + 1) as usize {
            warn!("benefit increases {}-{}: only {} years supplied", first, last, copied);
        }
        for year in first..=last.min(self.max_year()) {
            self.benefit_increases[year] = self.rules.cola.benefit_increase(year, self.cpi_increases[year]);
        }

        self.catchup = catchup;
        self.catchup.set_start_year(self.istart());
        if let Some(text) = title {
            self.benefit_increase_title = Title { text, user: true };
        }
        self.increases_projected = true;
        debug!(
            "benefit increases updated for {}-{} with {} catch-up increases",
            first,
            last,
            self.catchup.len()
        );
        self.project_dependents()
    }

    /// Re-run every table that reads average wages or benefit increases
    fn project_dependents(&mut self) -> Result<()> {
        if !self.wages_projected {
            return Ok(());
        }
        let istart = self.istart();
        let max_year = self.max_year();
        self.bend_points.project(&self.average_wages, YEAR_79, max_year)?;
        if !self.increases_projected {
            return Ok(());
        }

        let fq = &self.average_wages;
        let bi = &self.benefit_increases;
        let bases = &mut self.wage_bases;
        self.rules.wage_base.project_oasdi(&mut bases.oasdi, fq, bi, istart + 1, max_year)?;
        wage_base::project_old_law(&mut bases.old_law, fq, bi, istart + 1, max_year)?;
        wage_base::project_hi(&mut bases.hi, &bases.oasdi, istart + 1, max_year)?;

        let first_exempt = RetirementTestAmounts::last_known_year(istart) + 1;
        if first_exempt <= max_year {
            self.ret_test.project(fq, bi, first_exempt, max_year)?;
        }
        self.special_minimum
            .project(bi, fq, self.rules.special_minimum.as_ref(), istart, max_year)?;
        debug!("dependent tables projected for {}-{}", istart, max_year);
        Ok(())
    }

    fn check_projected(&self, year: i32, last_known: i32, projected: bool) -> Result<()> {
        if year > last_known && !projected {
            return Err(ParamsError::NotProjected);
        }
        Ok(())
    }

    fn check_fully_projected(&self, year: i32, last_known: i32) -> Result<()> {
        self.check_projected(year, last_known, self.wages_projected && self.increases_projected)
    }

    pub fn istart(&self) -> i32 {
        self.anchor.year()
    }

    pub fn max_year(&self) -> i32 {
        self.anchor.max_year()
    }

    pub fn history(&self) -> &Arc<HistoricalInput> {
        &self.history
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Alternatives of the last `project` call
    pub fn alternatives(&self) -> Option<(Alternative, Alternative)> {
        self.alternatives
    }

    pub fn average_wage_title(&self) -> &str {
        &self.average_wage_title.text
    }

    pub fn benefit_increase_title(&self) -> &str {
        &self.benefit_increase_title.text
    }

    pub fn is_projected(&self) -> bool {
        self.wages_projected && self.increases_projected
    }

    pub fn average_wage(&self, year: i32) -> Result<f64> {
        self.check_projected(year, self.istart() - 2, self.wages_projected)?;
        self.average_wages.get(year)
    }

    pub fn average_wage_increase(&self, year: i32) -> Result<f64> {
        self.check_projected(year, self.istart() - 2, self.wages_projected)?;
        self.average_wage_increases.get(year)
    }

    pub fn cpi_increase(&self, year: i32) -> Result<f64> {
        self.check_projected(year, self.istart() - 1, self.increases_projected)?;
        self.cpi_increases.get(year)
    }

    pub fn benefit_increase(&self, year: i32) -> Result<f64> {
        self.check_projected(year, self.istart() - 1, self.increases_projected)?;
        self.benefit_increases.get(year)
    }

    /// Average wage levels; projected years are meaningful once projected
    pub fn average_wages(&self) -> &AnnualSeries {
        &self.average_wages
    }

    pub fn benefit_increases(&self) -> &AnnualSeries {
        &self.benefit_increases
    }

    pub fn catchup(&self) -> &CatchupTable {
        &self.catchup
    }

    pub fn wage_bases(&self) -> &WageBases {
        &self.wage_bases
    }

    pub fn oasdi_base(&self, year: i32) -> Result<f64> {
        self.check_fully_projected(year, self.istart())?;
        self.wage_bases.oasdi.get(year)
    }

    pub fn old_law_base(&self, year: i32) -> Result<f64> {
        self.check_fully_projected(year, self.istart())?;
        self.wage_bases.old_law.get(year)
    }

    /// HI base; `HI_UNCAPPED` from 1994
    pub fn hi_base(&self, year: i32) -> Result<f64> {
        self.check_fully_projected(year, self.istart())?;
        self.wage_bases.hi.get(year)
    }

    pub fn pia_formula(&self, elig_year: i32) -> Result<Formula> {
        self.check_projected(elig_year, self.istart(), self.wages_projected)?;
        self.bend_points.pia(elig_year)
    }

    pub fn mfb_formula(&self, elig_year: i32) -> Result<Formula> {
        self.check_projected(elig_year, self.istart(), self.wages_projected)?;
        self.bend_points.mfb(elig_year)
    }

    /// First PIA formula percentage under windfall elimination
    pub fn windfall_percentage(&self, elig_year: i32, years_of_coverage: u32, benefit_year: i32) -> f64 {
        bend_points::windfall_percentage(elig_year, years_of_coverage, benefit_year)
    }

    pub fn retirement_test(&self) -> &RetirementTestAmounts {
        &self.ret_test
    }

    /// Annual exempt amount for a bracket
    pub fn exempt_amount(&self, bracket: TestBracket, year: i32) -> Result<f64> {
        self.check_fully_projected(year, RetirementTestAmounts::last_known_year(self.istart()))?;
        self.ret_test.annual_exempt(bracket, year)
    }

    pub fn full_retirement_age(&self, birth_year: i32) -> AgeYm {
        self.rules.retirement_age.full_retirement_age(birth_year)
    }

    /// Months of `benefit` withheld from a beneficiary aged `age` earning
    /// `earnings` during `year`
    pub fn months_withheld(&self, age: u32, earnings: f64, year: i32, benefit: f64) -> Result<u32> {
        self.check_fully_projected(year, RetirementTestAmounts::last_known_year(self.istart()))?;
        ret_test::months_withheld(
            &self.ret_test,
            self.rules.retirement_age.as_ref(),
            age,
            earnings,
            year,
            benefit,
        )
    }

    /// Special minimum amounts in force in `month` of `year`
    pub fn special_minimum(&self, years_over_10: u32, month: Month, year: i32) -> Result<SpecialMinimumEntry> {
        let indexed = special_min::index_year(month, year);
        self.check_fully_projected(indexed, self.istart() - 1)?;
        self.special_minimum.lookup(years_over_10, month, year)
    }

    /// Special minimum amounts after the increase effective in `year`
    pub fn special_minimum_entry(&self, years_over_10: u32, year: i32) -> Result<SpecialMinimumEntry> {
        self.check_fully_projected(year, self.istart() - 1)?;
        self.special_minimum.entry(years_over_10, year)
    }

    /// Increase `amount` by the benefit increase effective in `year`
    pub fn apply_cola(&self, amount: f64, year: i32) -> Result<f64> {
        Ok(cola::apply_cola(amount, self.benefit_increase(year)?, year))
    }

    pub fn unapply_cola(&self, amount: f64, year: i32) -> Result<f64> {
        Ok(cola::unapply_cola(amount, self.benefit_increase(year)?, year))
    }

    /// Increase an amount for a worker eligible in `elig_year`, including any
    /// catch-up increase for that year pair
    pub fn apply_cola_for(&self, amount: f64, year: i32, elig_year: i32) -> Result<f64> {
        let raised = self.apply_cola(amount, year)?;
        Ok(self.catchup.apply(raised, elig_year, year))
    }

    pub fn unapply_cola_for(&self, amount: f64, year: i32, elig_year: i32) -> Result<f64> {
        let lowered = self.catchup.unapply(amount, elig_year, year);
        self.unapply_cola(lowered, year)
    }

    /// Increase an MFB; `pia` is the PIA after the same increase
    pub fn apply_cola_mfb(&self, mfb: f64, year: i32, pia: f64) -> Result<f64> {
        Ok(cola::apply_cola_mfb(mfb, self.benefit_increase(year)?, year, pia))
    }

    /// Undo `apply_cola_mfb`; `pia` is the PIA before the increase
    pub fn unapply_cola_mfb(&self, mfb: f64, year: i32, pia: f64) -> Result<f64> {
        Ok(cola::unapply_cola_mfb(mfb, self.benefit_increase(year)?, year, pia))
    }
}

/// Percentage increase in `series` from `year - 1` to `year`
fn increase(series: &AnnualSeries, year: i32) -> Result<f64> {
    let previous = series.get(year - 1)?;
    if previous == 0.0 {
        return Err(ParamsError::Precondition(format!("average wage for {} is zero", year - 1)));
    }
    Ok((series.get(year)? / previous - 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::EmbeddedAssumptions;
    use crate::history::HI_UNCAPPED;
    use crate::params::rules::{AdHocWageBase, ReducedCola};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::{prop_assert, proptest};

    fn history(last_year: i32) -> Arc<HistoricalInput> {
        Arc::new(HistoricalInput::embedded(last_year).unwrap())
    }

    fn projected(max_year: i32) -> ParameterEngine {
        let mut engine = ParameterEngine::present_law(history(2024), max_year).unwrap();
        engine
            .project(Alternative::TrusteesIIB, Alternative::TrusteesIIB, &EmbeddedAssumptions::new())
            .unwrap();
        engine
    }

    #[test]
    fn test_history_is_readable_before_projection() {
        let engine = ParameterEngine::present_law(history(2024), 2100).unwrap();
        assert_eq!(engine.istart(), 2025);
        assert_eq!(engine.benefit_increase(2024).unwrap(), 2.5);
        assert_eq!(engine.average_wage(2023).unwrap(), 66621.80);
        assert_eq!(engine.oasdi_base(2025).unwrap(), 176_100.0);
        assert_eq!(engine.hi_base(2025).unwrap(), HI_UNCAPPED);
        assert_eq!(engine.exempt_amount(TestBracket::Under, 2025).unwrap(), 23_400.0);
        assert_eq!(engine.pia_formula(2025).unwrap().bend_points(), &[1226.0, 7391.0]);
        assert!(engine.special_minimum_entry(20, 2024).is_ok());

        assert!(matches!(engine.benefit_increase(2025), Err(ParamsError::NotProjected)));
        assert!(matches!(engine.average_wage(2024), Err(ParamsError::NotProjected)));
        assert!(matches!(engine.oasdi_base(2026), Err(ParamsError::NotProjected)));
        assert!(matches!(engine.pia_formula(2026), Err(ParamsError::NotProjected)));
        assert!(!engine.is_projected());
    }

    #[test]
    fn test_projection_fills_every_table() {
        let engine = projected(2100);
        assert!(engine.is_projected());
        assert_abs_diff_eq!(engine.benefit_increase(2030).unwrap(), 2.4, epsilon = 1e-12);
        assert_abs_diff_eq!(
            engine.average_wage(2024).unwrap(),
            round_cents(66621.80 * 1.0357),
            epsilon = 1e-9
        );
        assert!(engine.average_wage(2100).unwrap() > engine.average_wage(2099).unwrap());
        assert!(engine.oasdi_base(2026).unwrap() >= 176_100.0);
        assert!(engine.wage_bases().oasdi.series().is_non_decreasing(2025, 2100));
        assert!(engine.wage_bases().old_law.series().is_non_decreasing(2025, 2100));
        assert_eq!(engine.hi_base(2050).unwrap(), HI_UNCAPPED);
        assert!(
            engine.exempt_amount(TestBracket::Over, 2040).unwrap()
                > engine.exempt_amount(TestBracket::Under, 2040).unwrap()
        );
        assert_eq!(engine.pia_formula(2060).unwrap().count(), 2);
        assert!(engine.special_minimum_entry(20, 2100).is_ok());
        assert_eq!(
            engine.average_wage_title(),
            "Alternative II-B average wage increases, projected from 2025"
        );
    }

    #[test]
    fn test_bend_points_match_the_wage_ratio() {
        let engine = projected(2040);
        let fq = engine.average_wages();
        let expected = (180.0 * fq[2028] / fq[1977] + 0.5_f64).floor();
        assert_eq!(engine.pia_formula(2030).unwrap().bend_points()[0], expected);
    }

    #[test]
    fn test_zero_increase_freezes_wage_base() {
        let mut engine = ParameterEngine::present_law(history(2019), 2030).unwrap();
        engine
            .project(Alternative::Flat, Alternative::Flat, &EmbeddedAssumptions::new())
            .unwrap();
        assert_eq!(engine.oasdi_base(2020).unwrap(), 137_700.0);
        assert_eq!(engine.benefit_increase(2020).unwrap(), 0.0);
        assert_eq!(engine.oasdi_base(2021).unwrap(), 137_700.0);
        assert_eq!(engine.oasdi_base(2030).unwrap(), 137_700.0);
        assert_eq!(
            engine.exempt_amount(TestBracket::Under, 2025).unwrap(),
            engine.exempt_amount(TestBracket::Under, 2020).unwrap()
        );
    }

    #[test]
    fn test_set_istart_requires_reprojection() {
        let mut engine = projected(2060);
        engine.set_istart(2020).unwrap();
        assert_eq!(engine.istart(), 2020);
        assert!(matches!(engine.benefit_increase(2020), Err(ParamsError::NotProjected)));
        assert_eq!(engine.benefit_increase(2019).unwrap(), 1.6);
        assert_eq!(
            engine.average_wage_title(),
            "Alternative II-B average wage increases, projected from 2020"
        );

        engine
            .project(Alternative::TrusteesIII, Alternative::TrusteesIII, &EmbeddedAssumptions::new())
            .unwrap();
        assert_abs_diff_eq!(engine.benefit_increase(2020).unwrap(), 1.8, epsilon = 1e-12);
        assert!(engine.wage_bases().oasdi.series().is_non_decreasing(2020, 2060));

        assert!(matches!(
            engine.set_istart(2026),
            Err(ParamsError::InvalidStartYear { year: 2026, max: 2025 })
        ));
        assert!(matches!(engine.set_istart(1978), Err(ParamsError::InvalidStartYear { .. })));
        assert_eq!(engine.istart(), 2020);
    }

    #[test]
    fn test_partial_update_needs_first_year() {
        let mut engine = ParameterEngine::present_law(history(2024), 2040).unwrap();
        let rates = AnnualSeries::filled(2030, 2040, 2.0);
        assert!(matches!(
            engine.update_cpiinc(&rates, CatchupTable::new(2025), None, 2030, 2040),
            Err(ParamsError::Precondition(_))
        ));
        assert!(matches!(
            engine.update_fqinc(&rates, 2020, 2040),
            Err(ParamsError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_update_fq_backfills_increases() {
        let mut engine = ParameterEngine::present_law(history(2024), 2030).unwrap();
        let mut levels = AnnualSeries::new(2024, 2030);
        levels[2024] = 70_000.0;
        for year in 2025..=2030 {
            levels[year] = levels[year - 1] * 1.04;
        }
        engine.update_fq(&levels, 2024, 2030).unwrap();
        assert_abs_diff_eq!(
            engine.average_wage_increase(2024).unwrap(),
            (70_000.0 / 66_621.80 - 1.0) * 100.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(engine.average_wage_increase(2027).unwrap(), 4.0, epsilon = 1e-9);
        assert!(engine.pia_formula(2030).is_ok());
        // wage bases wait for benefit increases
        assert!(matches!(engine.oasdi_base(2026), Err(ParamsError::NotProjected)));
    }

    #[test]
    fn test_partial_update_fq_keeps_later_years_in_step() {
        let mut engine = projected(2040);
        let before_2031 = engine.average_wage_increase(2031).unwrap();
        let mut levels = AnnualSeries::new(2024, 2030);
        for year in 2024..=2030 {
            levels[year] = round_cents(engine.average_wage(year).unwrap() * 1.10);
        }
        engine.update_fq(&levels, 2024, 2030).unwrap();

        assert_abs_diff_eq!(engine.average_wage(2030).unwrap(), levels[2030], epsilon = 1e-9);
        assert_abs_diff_eq!(engine.average_wage_increase(2031).unwrap(), before_2031, epsilon = 1e-12);
        for year in 2031..=2040 {
            let implied = (engine.average_wage(year).unwrap() / engine.average_wage(year - 1).unwrap() - 1.0) * 100.0;
            assert_abs_diff_eq!(engine.average_wage_increase(year).unwrap(), implied, epsilon = 1e-4);
        }
        assert!(engine.average_wage(2040).unwrap() > levels[2030]);
    }

    #[test]
    fn test_first_update_fq_must_reach_max_year() {
        let mut engine = ParameterEngine::present_law(history(2024), 2050).unwrap();
        let levels = AnnualSeries::filled(2024, 2030, 70_000.0);
        assert!(matches!(
            engine.update_fq(&levels, 2024, 2030),
            Err(ParamsError::Precondition(_))
        ));
        assert!(matches!(engine.average_wage(2040), Err(ParamsError::NotProjected)));
        assert!(matches!(engine.pia_formula(2050), Err(ParamsError::NotProjected)));
    }

    #[test]
    fn test_user_title_survives_istart_change() {
        let mut engine = ParameterEngine::present_law(history(2024), 2040).unwrap();
        engine
            .project(Alternative::TrusteesI, Alternative::TrusteesI, &EmbeddedAssumptions::new())
            .unwrap();
        let rates = AnnualSeries::filled(2025, 2040, 3.0);
        engine
            .update_cpiinc(&rates, CatchupTable::new(2025), Some("CPI plus 0.6".to_string()), 2025, 2040)
            .unwrap();
        engine.set_istart(2023).unwrap();
        assert_eq!(engine.benefit_increase_title(), "CPI plus 0.6");
        assert_eq!(
            engine.average_wage_title(),
            "Alternative I average wage increases, projected from 2023"
        );
    }

    #[test]
    fn test_catchup_applies_only_to_its_year_pair() {
        let mut engine = ParameterEngine::present_law(history(2024), 2040).unwrap();
        engine
            .project(Alternative::TrusteesIIB, Alternative::TrusteesIIB, &EmbeddedAssumptions::new())
            .unwrap();
        let mut catchup = CatchupTable::new(2025);
        catchup.insert(2020, 2026, 1.5).unwrap();
        let rates = AnnualSeries::filled(2025, 2040, 2.4);
        engine.update_cpiinc(&rates, catchup, None, 2025, 2040).unwrap();

        let plain = engine.apply_cola(1000.0, 2026).unwrap();
        assert_abs_diff_eq!(plain, 1024.0, epsilon = 1e-9);
        assert_abs_diff_eq!(engine.apply_cola_for(1000.0, 2026, 2020).unwrap(), 1039.36, epsilon = 1e-9);
        assert_eq!(engine.apply_cola_for(1000.0, 2026, 2021).unwrap(), plain);
        assert_abs_diff_eq!(engine.unapply_cola_for(1039.36, 2026, 2020).unwrap(), 1000.0, epsilon = 1e-9);
        assert!(matches!(engine.apply_cola(1000.0, 1950), Err(ParamsError::YearOutOfRange { .. })));
    }

    #[test]
    fn test_amended_rules_change_results() {
        let amendments = Amendments {
            cola: Some(ReducedCola { effective_year: 2030, reduction: 1.0 }),
            wage_base: Some(AdHocWageBase { first_year: 2027, bases: vec![200_000.0] }),
            ..Default::default()
        };
        let mut engine = ParameterEngine::amended_law(history(2024), 2040, &amendments).unwrap();
        engine
            .project(Alternative::TrusteesIIB, Alternative::TrusteesIIB, &EmbeddedAssumptions::new())
            .unwrap();
        assert_abs_diff_eq!(engine.benefit_increase(2029).unwrap(), 2.4, epsilon = 1e-12);
        assert_abs_diff_eq!(engine.benefit_increase(2030).unwrap(), 1.4, epsilon = 1e-12);
        assert_abs_diff_eq!(engine.cpi_increase(2030).unwrap(), 2.4, epsilon = 1e-12);
        assert_eq!(engine.oasdi_base(2027).unwrap(), 200_000.0);
        assert!(engine.oasdi_base(2028).unwrap() > 200_000.0);
    }

    #[test]
    fn test_months_withheld_uses_projected_amounts() {
        let engine = projected(2040);
        let exempt = engine.exempt_amount(TestBracket::Under, 2030).unwrap();
        assert_eq!(engine.months_withheld(63, exempt, 2030, 1500.0).unwrap(), 0);
        assert_eq!(engine.months_withheld(63, exempt + 6000.0, 2030, 1500.0).unwrap(), 2);
        assert_eq!(engine.months_withheld(63, exempt + 100_000.0, 2030, 1500.0).unwrap(), 12);
        assert_eq!(engine.months_withheld(68, 500_000.0, 2030, 1500.0).unwrap(), 0);
        assert_eq!(engine.full_retirement_age(1963), AgeYm::new(67, 0));
    }

    #[test]
    fn test_special_minimum_through_engine() {
        let engine = projected(2040);
        let july = engine.special_minimum(15, Month::July, 2001).unwrap();
        let august = engine.special_minimum(15, Month::August, 2001).unwrap();
        assert!(august.pia() > july.pia());
        let june = engine.special_minimum(10, Month::June, 2030).unwrap();
        assert_eq!(june, engine.special_minimum_entry(10, 2029).unwrap());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_cola_round_trip(dimes in 1u32..50_000, year in 1951i32..2040) {
            let engine = projected(2040);
            let amount = f64::from(dimes) / 10.0;
            let raised = engine.apply_cola(amount, year).unwrap();
            let back = engine.unapply_cola(raised, year).unwrap();
            prop_assert!((back - amount).abs() < 1e-9);
        }
    }
}
