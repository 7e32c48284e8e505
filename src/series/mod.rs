//! Year-indexed series and the year constants shared by every table

mod annual;

pub use annual::AnnualSeries;

/// First year of the wage-base and coverage tables
pub const YEAR_37: i32 = 1937;

/// First year of the average wage and benefit increase series
pub const YEAR_51: i32 = 1951;

/// First year the bend-point formula applies
pub const YEAR_79: i32 = 1979;

/// Last year any table is projected through
pub const MAX_YEAR: i32 = 2100;
