//! Year-indexed series with a fixed span
//!
//! Every table in the crate is one or more `AnnualSeries` keyed by calendar
//! year. Point access is checked (`get`/`set` return a typed error outside the
//! span); `Index`/`IndexMut` are the unchecked fast path and panic instead of
//! reading or writing out of range. Range assignment silently truncates to the
//! overlap of the target span and the requested years, which lets callers ask
//! for "from year X through the end" without clamping first.

use std::ops::{Add, Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{ParamsError, Result};

/// Values indexed by calendar year, from `base_year` through `last_year()`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualSeries<T = f64> {
    base_year: i32,
    values: Vec<T>,
}

impl<T: Copy + Default> AnnualSeries<T> {
    /// Create a series spanning `base_year..=last_year`, filled with `T::default()`
    pub fn new(base_year: i32, last_year: i32) -> Self {
        Self::filled(base_year, last_year, T::default())
    }
}

impl<T: Copy> AnnualSeries<T> {
    /// Create a series spanning `base_year..=last_year` with every year set to `value`
    pub fn filled(base_year: i32, last_year: i32, value: T) -> Self {
        let len = (last_year - base_year + 1).max(0) as usize;
        Self {
            base_year,
            values: vec![value; len],
        }
    }

    /// Create a series from consecutive values starting at `base_year`
    pub fn from_values(base_year: i32, values: Vec<T>) -> Self {
        Self { base_year, values }
    }

    pub fn base_year(&self) -> i32 {
        self.base_year
    }

    /// Last year held; `base_year - 1` for an empty series
    pub fn last_year(&self) -> i32 {
        self.base_year + self.values.len() as i32 - 1
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.base_year && year <= self.last_year()
    }

    fn index_of(&self, year: i32) -> Result<usize> {
        if self.contains(year) {
            Ok((year - self.base_year) as usize)
        } else {
            Err(ParamsError::YearOutOfRange {
                year,
                first: self.base_year,
                last: self.last_year(),
            })
        }
    }

    /// Checked read
    pub fn get(&self, year: i32) -> Result<T> {
        self.index_of(year).map(|i| self.values[i])
    }

    /// Checked write
    pub fn set(&mut self, year: i32, value: T) -> Result<()> {
        let i = self.index_of(year)?;
        self.values[i] = value;
        Ok(())
    }

    /// Checked mutable access
    pub fn get_mut(&mut self, year: i32) -> Result<&mut T> {
        let i = self.index_of(year)?;
        Ok(&mut self.values[i])
    }

    /// Intersection of the requested years with this series' span
    pub fn overlap(&self, first: i32, last: i32) -> Option<(i32, i32)> {
        let lo = first.max(self.base_year);
        let hi = last.min(self.last_year());
        (lo <= hi).then_some((lo, hi))
    }

    /// Copy `source` into this series for `first..=last`, touching only years
    /// held by both series. Returns the number of years copied.
    pub fn assign(&mut self, source: &AnnualSeries<T>, first: i32, last: i32) -> usize {
        let Some((lo, hi)) = self.overlap(first, last) else {
            return 0;
        };
        let Some((lo, hi)) = source.overlap(lo, hi) else {
            return 0;
        };
        let dst = (lo - self.base_year) as usize;
        let src = (lo - source.base_year) as usize;
        let n = (hi - lo + 1) as usize;
        self.values[dst..dst + n].copy_from_slice(&source.values[src..src + n]);
        n
    }

    /// Set every year in `first..=last` held by this series to `value`.
    /// Returns the number of years written.
    pub fn fill(&mut self, value: T, first: i32, last: i32) -> usize {
        let Some((lo, hi)) = self.overlap(first, last) else {
            return 0;
        };
        let start = (lo - self.base_year) as usize;
        let end = (hi - self.base_year) as usize;
        self.values[start..=end].fill(value);
        end - start + 1
    }

    /// Raw values, oldest year first
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// `(year, value)` pairs, oldest year first
    pub fn iter(&self) -> impl Iterator<Item = (i32, T)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, v)| (self.base_year + i as i32, *v))
    }
}

impl<T: Copy + Add<Output = T>> AnnualSeries<T> {
    /// Sum of the values in `first..=last`, added to `start`
    pub fn accumulate(&self, first: i32, last: i32, start: T) -> Result<T> {
        if first > last {
            return Err(ParamsError::InvalidArgument {
                what: "accumulation range",
                reason: format!("{} is after {}", first, last),
            });
        }
        let lo = self.index_of(first)?;
        let hi = self.index_of(last)?;
        Ok(self.values[lo..=hi].iter().fold(start, |acc, v| acc + *v))
    }
}

impl AnnualSeries<f64> {
    /// True when no year in `first..=last` (clipped to the span) is below its predecessor
    pub fn is_non_decreasing(&self, first: i32, last: i32) -> bool {
        match self.overlap(first, last) {
            Some((lo, hi)) => (lo + 1..=hi).all(|y| self[y] >= self[y - 1]),
            None => true,
        }
    }
}

impl<T: Copy> Index<i32> for AnnualSeries<T> {
    type Output = T;

    fn index(&self, year: i32) -> &T {
        assert!(
            self.contains(year),
            "year {} outside series {}-{}",
            year,
            self.base_year,
            self.last_year()
        );
        &self.values[(year - self.base_year) as usize]
    }
}

impl<T: Copy> IndexMut<i32> for AnnualSeries<T> {
    fn index_mut(&mut self, year: i32) -> &mut T {
        assert!(
            self.contains(year),
            "year {} outside series {}-{}",
            year,
            self.base_year,
            self.last_year()
        );
        &mut self.values[(year - self.base_year) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    #[test]
    fn test_checked_access() {
        let mut s: AnnualSeries = AnnualSeries::new(1951, 2000);
        assert_eq!(s.len(), 50);
        assert_eq!(s.last_year(), 2000);

        s.set(1977, 9779.44).unwrap();
        assert_eq!(s.get(1977).unwrap(), 9779.44);
        assert_eq!(s[1977], 9779.44);

        match s.get(1950) {
            Err(ParamsError::YearOutOfRange { year, first, last }) => {
                assert_eq!((year, first, last), (1950, 1951, 2000));
            }
            other => panic!("expected range error, got {:?}", other),
        }
        assert!(s.set(2001, 1.0).is_err());
    }

    #[test]
    #[should_panic(expected = "outside series")]
    fn test_unchecked_access_panics() {
        let s: AnnualSeries = AnnualSeries::new(1951, 2000);
        let _ = s[2001];
    }

    #[test]
    fn test_accumulate() {
        let s = AnnualSeries::from_values(2000, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.accumulate(2001, 2002, 10.0).unwrap(), 15.0);
        assert_eq!(s.accumulate(2000, 2003, 0.0).unwrap(), 10.0);
        assert!(s.accumulate(2002, 2001, 0.0).is_err());
        assert!(s.accumulate(1999, 2001, 0.0).is_err());
    }

    #[test]
    fn test_assign_only_touches_overlap() {
        let mut target = AnnualSeries::filled(1937, 2021, -1.0);
        let source = AnnualSeries::filled(1990, 2000, 5.0);

        let copied = target.assign(&source, 1980, 2010);
        assert_eq!(copied, 11);

        for (year, value) in target.iter() {
            if (1990..=2000).contains(&year) {
                assert_eq!(value, 5.0, "year {}", year);
            } else {
                assert_eq!(value, -1.0, "year {}", year);
            }
        }
    }

    #[test]
    fn test_fill_truncates() {
        let mut s: AnnualSeries = AnnualSeries::new(2000, 2005);
        assert_eq!(s.fill(7.0, 2003, 2100), 3);
        assert_eq!(s.values(), &[0.0, 0.0, 0.0, 7.0, 7.0, 7.0]);
        assert_eq!(s.fill(1.0, 1900, 1990), 0);
    }

    #[test]
    fn test_non_decreasing() {
        let s = AnnualSeries::from_values(2000, vec![1.0, 2.0, 2.0, 1.5]);
        assert!(s.is_non_decreasing(2000, 2002));
        assert!(!s.is_non_decreasing(2000, 2003));
        assert!(s.is_non_decreasing(2010, 2020));
    }

    proptest! {
        #[test]
        fn prop_assign_is_local(
            src_first in 1930i32..2030,
            src_len in 0i32..40,
            req_first in 1920i32..2040,
            req_len in 0i32..80
        ) {
            let mut target = AnnualSeries::filled(1937, 2021, -1.0);
            let source = AnnualSeries::filled(src_first, src_first + src_len - 1, 3.0);
            let req_last = req_first + req_len - 1;
            let copied = target.assign(&source, req_first, req_last);

            let mut changed = 0;
            for (year, value) in target.iter() {
                let inside = year >= req_first && year <= req_last && source.contains(year);
                if inside {
                    prop_assert_eq!(value, 3.0);
                    changed += 1;
                } else {
                    prop_assert_eq!(value, -1.0);
                }
            }
            prop_assert!(changed == copied);
        }
    }
}
