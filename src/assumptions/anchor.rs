//! First projected year
//!
//! Everything before the anchor is authoritative history; everything from
//! the anchor on depends on the assumption alternative.

use serde::{Deserialize, Serialize};

use crate::error::{ParamsError, Result};
use crate::series::YEAR_79;

/// Year after the last known benefit increase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentYear {
    year: i32,
    max_year: i32,
}

impl CurrentYear {
    pub fn new(year: i32, max_year: i32) -> Result<Self> {
        Self::validate(year, max_year)?;
        Ok(Self { year, max_year })
    }

    fn validate(year: i32, max_year: i32) -> Result<()> {
        if year < YEAR_79 || year > max_year {
            return Err(ParamsError::InvalidStartYear { year, max: max_year });
        }
        Ok(())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    /// Last year with a known benefit increase
    pub fn last_historical_year(&self) -> i32 {
        self.year - 1
    }

    /// Move the anchor; the previous value is kept if `year` is invalid
    pub fn set(&mut self, year: i32) -> Result<()> {
        Self::validate(year, self.max_year)?;
        self.year = year;
        Ok(())
    }
}
