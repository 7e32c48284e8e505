//! Where projected assumption series come from
//!
//! A source hands the engine percentage increases for the projected years of
//! one alternative. Average wage increases cover `istart - 1` through the last
//! projected year (the average wage for the year before the anchor is not yet
//! known when the anchor's benefit increase is); benefit increases cover
//! `istart` through the last projected year.

use log::debug;

use super::alternative::Alternative;
use super::catchup::CatchupTable;
use crate::error::{AssumptionKind, ParamsError, Result, ValidityDomain};
use crate::series::AnnualSeries;

/// A titled series of percentage increases
#[derive(Debug, Clone, PartialEq)]
pub struct AssumptionSeries {
    pub title: String,
    pub values: AnnualSeries,
}

/// Projected benefit increases plus the catch-up increases that go with them
#[derive(Debug, Clone, PartialEq)]
pub struct BenefitIncreaseAssumption {
    pub series: AssumptionSeries,
    pub catchup: CatchupTable,
}

/// Supplier of projected assumptions for an alternative
pub trait AssumptionSource: Send + Sync {
    /// Average wage increases for `istart - 1..=max_year`
    fn average_wage_increases(
        &self,
        alternative: Alternative,
        istart: i32,
        max_year: i32,
    ) -> Result<AssumptionSeries>;

    /// Benefit increases for `istart..=max_year`, with catch-up increases keyed from `istart`
    fn benefit_increases(
        &self,
        alternative: Alternative,
        istart: i32,
        max_year: i32,
    ) -> Result<BenefitIncreaseAssumption>;
}

/// Extend a rate series to `first..=last`, carrying its last value forward.
/// The series must hold `first`.
pub(crate) fn extend_rates(
    rates: &AnnualSeries,
    first: i32,
    last: i32,
    what: &str,
) -> Result<AnnualSeries> {
    if !rates.contains(first) {
        return Err(ParamsError::Precondition(format!(
            "{} series {}-{} does not cover {}",
            what,
            rates.base_year(),
            rates.last_year(),
            first
        )));
    }
    let mut out = AnnualSeries::new(first, last);
    let copied = out.assign(rates, first, last);
    if rates.last_year() < last {
        let carried = rates[rates.last_year()];
        out.fill(carried, rates.last_year() + 1, last);
        debug!(
            "{}: {} years supplied, {:.2}% carried through {}",
            what, copied, carried, last
        );
    }
    Ok(out)
}

/// User-registered series for `Alternative::Other`
#[derive(Debug, Clone)]
struct OtherScenario {
    average_wage: AssumptionSeries,
    benefit_increase: AssumptionSeries,
    catchup: Vec<(i32, i32, f64)>,
}

/// Ultimate assumption rates compiled into the crate
///
/// Trustees alternatives use a level ultimate rate in every projected year.
/// The flat alternative has no increases. The legacy benefit-statement
/// alternative lets average wages grow at the intermediate rate for the two
/// years not yet published and freezes everything after.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedAssumptions {
    other: Option<OtherScenario>,
}

/// (average wage increase, benefit increase) ultimate rates in percent
fn ultimate_rates(alternative: Alternative) -> Option<(f64, f64)> {
    match alternative {
        Alternative::TrusteesI => Some((4.80, 3.00)),
        Alternative::TrusteesIIB => Some((3.57, 2.40)),
        Alternative::TrusteesIII => Some((2.33, 1.80)),
        Alternative::TrusteesIIA => Some((4.00, 2.80)),
        Alternative::Flat => Some((0.0, 0.0)),
        _ => None,
    }
}

fn invalid(kind: AssumptionKind, alternative: Alternative) -> ParamsError {
    ParamsError::InvalidAlternative {
        kind,
        domain: ValidityDomain::General,
        value: alternative.code(),
    }
}

impl EmbeddedAssumptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the user-specified series served for `Alternative::Other`
    pub fn with_other(
        mut self,
        average_wage: AssumptionSeries,
        benefit_increase: AssumptionSeries,
        catchup: Vec<(i32, i32, f64)>,
    ) -> Self {
        self.other = Some(OtherScenario {
            average_wage,
            benefit_increase,
            catchup,
        });
        self
    }

    fn other(&self) -> Result<&OtherScenario> {
        self.other.as_ref().ok_or_else(|| {
            ParamsError::Precondition("no user-specified assumptions registered".to_string())
        })
    }
}

impl AssumptionSource for EmbeddedAssumptions {
    fn average_wage_increases(
        &self,
        alternative: Alternative,
        istart: i32,
        max_year: i32,
    ) -> Result<AssumptionSeries> {
        let kind = AssumptionKind::AverageWage;
        let first = istart - 1;
        let values = match alternative {
            Alternative::Other => {
                let other = self.other()?;
                return Ok(AssumptionSeries {
                    title: other.average_wage.title.clone(),
                    values: extend_rates(&other.average_wage.values, first, max_year, "average wage")?,
                });
            }
            Alternative::LegacyStatement => {
                let (intermediate, _) =
                    ultimate_rates(Alternative::TrusteesIIB).ok_or_else(|| invalid(kind, alternative))?;
                let mut values = AnnualSeries::new(first, max_year);
                values.fill(intermediate, first, istart);
                values
            }
            alt => {
                let (rate, _) = ultimate_rates(alt).ok_or_else(|| invalid(kind, alt))?;
                AnnualSeries::filled(first, max_year, rate)
            }
        };
        Ok(AssumptionSeries {
            title: alternative.title(kind, istart),
            values,
        })
    }

    fn benefit_increases(
        &self,
        alternative: Alternative,
        istart: i32,
        max_year: i32,
    ) -> Result<BenefitIncreaseAssumption> {
        let kind = AssumptionKind::BenefitIncrease;
        match alternative {
            Alternative::Other => {
                let other = self.other()?;
                let mut catchup = CatchupTable::new(istart);
                for &(elig, cal, pct) in &other.catchup {
                    if cal >= istart {
                        catchup.insert(elig, cal, pct)?;
                    }
                }
                Ok(BenefitIncreaseAssumption {
                    series: AssumptionSeries {
                        title: other.benefit_increase.title.clone(),
                        values: extend_rates(
                            &other.benefit_increase.values,
                            istart,
                            max_year,
                            "benefit increase",
                        )?,
                    },
                    catchup,
                })
            }
            Alternative::LegacyStatement => Ok(BenefitIncreaseAssumption {
                series: AssumptionSeries {
                    title: alternative.title(kind, istart),
                    values: AnnualSeries::new(istart, max_year),
                },
                catchup: CatchupTable::new(istart),
            }),
            alt => {
                let (_, rate) = ultimate_rates(alt).ok_or_else(|| invalid(kind, alt))?;
                Ok(BenefitIncreaseAssumption {
                    series: AssumptionSeries {
                        title: alt.title(kind, istart),
                        values: AnnualSeries::filled(istart, max_year, rate),
                    },
                    catchup: CatchupTable::new(istart),
                })
            }
        }
    }
}
