//! Catch-up benefit increases
//!
//! Sparse percentage corrections keyed by (eligibility year, calendar year)
//! applied on top of an already-increased benefit. A missing entry means no
//! correction, which is different from a zero correction only in that
//! `exists` reports it.

use std::collections::BTreeMap;

use log::warn;

use crate::error::{ParamsError, Result};
use crate::rounding::round_cents;
use crate::series::MAX_YEAR;

/// Catch-up increases starting with calendar year `start_year`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatchupTable {
    start_year: i32,
    entries: BTreeMap<(i32, i32), f64>,
}

impl CatchupTable {
    pub fn new(start_year: i32) -> Self {
        Self {
            start_year,
            entries: BTreeMap::new(),
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Re-key to a new first calendar year, dropping entries before it
    pub fn set_start_year(&mut self, start_year: i32) {
        let before = self.entries.len();
        self.entries.retain(|&(_, cal), _| cal >= start_year);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            warn!(
                "dropped {} catch-up increases before {} when re-keying",
                dropped, start_year
            );
        }
        self.start_year = start_year;
    }

    /// Add or replace the catch-up increase for an eligibility year in a
    /// calendar year. Negative corrections are rejected; `unapply` is only an
    /// exact inverse for increases.
    pub fn insert(&mut self, elig_year: i32, cal_year: i32, percent: f64) -> Result<()> {
        if cal_year < self.start_year || cal_year > MAX_YEAR {
            return Err(ParamsError::YearOutOfRange {
                year: cal_year,
                first: self.start_year,
                last: MAX_YEAR,
            });
        }
        if elig_year >= cal_year {
            return Err(ParamsError::InvalidArgument {
                what: "catch-up eligibility year",
                reason: format!("{} is not before calendar year {}", elig_year, cal_year),
            });
        }
        if !percent.is_finite() || percent < 0.0 {
            return Err(ParamsError::InvalidArgument {
                what: "catch-up percentage",
                reason: format!("{} is not a finite non-negative increase", percent),
            });
        }
        self.entries.insert((elig_year, cal_year), percent);
        Ok(())
    }

    pub fn exists(&self, elig_year: i32, cal_year: i32) -> bool {
        self.entries.contains_key(&(elig_year, cal_year))
    }

    pub fn get(&self, elig_year: i32, cal_year: i32) -> Option<f64> {
        self.entries.get(&(elig_year, cal_year)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(eligibility year, calendar year, percent)` in key order
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, f64)> + '_ {
        self.entries.iter().map(|(&(e, c), &p)| (e, c, p))
    }

    /// Increase `amount` by the catch-up for the pair, if any
    pub fn apply(&self, amount: f64, elig_year: i32, cal_year: i32) -> f64 {
        match self.get(elig_year, cal_year) {
            Some(pct) => round_cents(amount * (1.0 + pct / 100.0)),
            None => amount,
        }
    }

    /// Exact inverse of `apply` for cent amounts
    pub fn unapply(&self, amount: f64, elig_year: i32, cal_year: i32) -> f64 {
        match self.get(elig_year, cal_year) {
            Some(pct) => round_cents(amount / (1.0 + pct / 100.0)),
            None => amount,
        }
    }
}
