//! Historical input: known benefit increases, average wages, and wage bases
//!
//! A `HistoricalInput` is immutable once built. Engines share it through an
//! `Arc` and copy the prefixes they need into their own series.

mod embedded;
pub mod loader;

use log::info;

use crate::error::{ParamsError, Result};
use crate::series::{AnnualSeries, YEAR_37, YEAR_51, YEAR_79};

/// HI base for years with no HI taxable maximum
pub const HI_UNCAPPED: f64 = f64::INFINITY;

/// First year without an HI taxable maximum
pub const YEAR_HI_UNCAPPED: i32 = 1994;

/// Known values through a last historical year
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalInput {
    last_year: i32,
    /// Benefit increases, 1951 through `last_year`
    benefit_increases: AnnualSeries,
    /// Average wages, 1951 through `last_year - 1`
    average_wages: AnnualSeries,
    /// OASDI bases, 1937 through `last_year + 1`
    oasdi_bases: AnnualSeries,
    /// Old-law bases, 1937 through `last_year + 1`
    old_law_bases: AnnualSeries,
    /// HI bases, 1937 through `last_year + 1`
    hi_bases: AnnualSeries,
}

/// Copy `source` into a series spanning exactly `first..=last`, failing if it
/// does not cover that span
fn exact_span(source: &AnnualSeries, first: i32, last: i32, what: &'static str) -> Result<AnnualSeries> {
    if !source.contains(first) || !source.contains(last) {
        return Err(ParamsError::InvalidArgument {
            what,
            reason: format!(
                "{}-{} does not cover {}-{}",
                source.base_year(),
                source.last_year(),
                first,
                last
            ),
        });
    }
    let mut out = AnnualSeries::new(first, last);
    out.assign(source, first, last);
    Ok(out)
}

impl HistoricalInput {
    /// Earliest last historical year; the first projected year is never before 1979
    pub const FIRST_LAST_YEAR: i32 = YEAR_79 - 1;

    /// Build from series covering at least the spans documented on each field
    pub fn new(
        last_year: i32,
        benefit_increases: &AnnualSeries,
        average_wages: &AnnualSeries,
        oasdi_bases: &AnnualSeries,
        old_law_bases: &AnnualSeries,
        hi_bases: &AnnualSeries,
    ) -> Result<Self> {
        if last_year < Self::FIRST_LAST_YEAR {
            return Err(ParamsError::InvalidArgument {
                what: "last historical year",
                reason: format!("{} is before {}", last_year, Self::FIRST_LAST_YEAR),
            });
        }
        let base_last = last_year + 1;
        Ok(Self {
            last_year,
            benefit_increases: exact_span(benefit_increases, YEAR_51, last_year, "benefit increases")?,
            average_wages: exact_span(average_wages, YEAR_51, last_year - 1, "average wages")?,
            oasdi_bases: exact_span(oasdi_bases, YEAR_37, base_last, "OASDI bases")?,
            old_law_bases: exact_span(old_law_bases, YEAR_37, base_last, "old-law bases")?,
            hi_bases: exact_span(hi_bases, YEAR_37, base_last, "HI bases")?,
        })
    }

    /// Values compiled into the crate, truncated at `last_year`
    pub fn embedded(last_year: i32) -> Result<Self> {
        let last_known = embedded::LAST_BENEFIT_INCREASE_YEAR;
        if !(Self::FIRST_LAST_YEAR..=last_known).contains(&last_year) {
            return Err(ParamsError::YearOutOfRange {
                year: last_year,
                first: Self::FIRST_LAST_YEAR,
                last: last_known,
            });
        }

        let benefit_increases = AnnualSeries::from_values(YEAR_51, embedded::BENEFIT_INCREASES.to_vec());
        let average_wages = AnnualSeries::from_values(YEAR_51, embedded::AVERAGE_WAGES.to_vec());

        let base_last = last_known + 1;
        let mut oasdi = AnnualSeries::new(YEAR_37, base_last);
        for &(first, last, amount) in &embedded::BASES_BEFORE_1979 {
            oasdi.fill(amount, first, last);
        }
        let mut old_law = oasdi.clone();
        oasdi.assign(
            &AnnualSeries::from_values(YEAR_79, embedded::OASDI_BASES_FROM_1979.to_vec()),
            YEAR_79,
            base_last,
        );
        old_law.assign(
            &AnnualSeries::from_values(YEAR_79, embedded::OLD_LAW_BASES_FROM_1979.to_vec()),
            YEAR_79,
            base_last,
        );
        let mut hi = oasdi.clone();
        hi.assign(
            &AnnualSeries::from_values(1991, embedded::HI_BASES_1991_1993.to_vec()),
            1991,
            1993,
        );
        hi.fill(HI_UNCAPPED, YEAR_HI_UNCAPPED, base_last);

        let input = Self::new(last_year, &benefit_increases, &average_wages, &oasdi, &old_law, &hi)?;
        info!("using embedded history through {}", last_year);
        Ok(input)
    }

    /// Last year with a known benefit increase
    pub fn last_year(&self) -> i32 {
        self.last_year
    }

    /// First projected year implied by this history
    pub fn istart(&self) -> i32 {
        self.last_year + 1
    }

    pub fn benefit_increases(&self) -> &AnnualSeries {
        &self.benefit_increases
    }

    pub fn average_wages(&self) -> &AnnualSeries {
        &self.average_wages
    }

    pub fn oasdi_bases(&self) -> &AnnualSeries {
        &self.oasdi_bases
    }

    pub fn old_law_bases(&self) -> &AnnualSeries {
        &self.old_law_bases
    }

    pub fn hi_bases(&self) -> &AnnualSeries {
        &self.hi_bases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_spans() {
        let h = HistoricalInput::embedded(2024).unwrap();
        assert_eq!(h.istart(), 2025);
        assert_eq!(h.benefit_increases().last_year(), 2024);
        assert_eq!(h.average_wages().last_year(), 2023);
        assert_eq!(h.oasdi_bases().base_year(), 1937);
        assert_eq!(h.oasdi_bases().last_year(), 2025);
        assert_eq!(h.oasdi_bases()[2025], 176100.0);
        assert_eq!(h.old_law_bases()[2025], 130800.0);
        assert_eq!(h.average_wages()[1977], 9779.44);
        assert_eq!(h.benefit_increases()[2022], 8.7);
    }

    #[test]
    fn test_embedded_truncates() {
        let h = HistoricalInput::embedded(1999).unwrap();
        assert_eq!(h.benefit_increases().last_year(), 1999);
        assert_eq!(h.average_wages().last_year(), 1998);
        assert_eq!(h.oasdi_bases().last_year(), 2000);
        assert_eq!(h.oasdi_bases()[2000], 76200.0);
    }

    #[test]
    fn test_embedded_hi_bases() {
        let h = HistoricalInput::embedded(2024).unwrap();
        assert_eq!(h.hi_bases()[1990], h.oasdi_bases()[1990]);
        assert_eq!(h.hi_bases()[1992], 130200.0);
        assert!(h.hi_bases()[1994].is_infinite());
        assert_eq!(h.old_law_bases()[1978], h.oasdi_bases()[1978]);
    }

    #[test]
    fn test_embedded_range() {
        assert!(HistoricalInput::embedded(1977).is_err());
        assert!(HistoricalInput::embedded(1978).is_ok());
        assert!(matches!(
            HistoricalInput::embedded(2025),
            Err(ParamsError::YearOutOfRange { year: 2025, .. })
        ));
    }

    #[test]
    fn test_new_requires_full_span() {
        let h = HistoricalInput::embedded(2024).unwrap();
        let short = AnnualSeries::filled(1951, 2020, 1.0);
        let err = HistoricalInput::new(
            2024,
            &short,
            h.average_wages(),
            h.oasdi_bases(),
            h.old_law_bases(),
            h.hi_bases(),
        );
        assert!(matches!(
            err,
            Err(ParamsError::InvalidArgument { what: "benefit increases", .. })
        ));
    }
}
