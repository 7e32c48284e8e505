//! Benefit Params - projection engine for Social Security benefit-formula parameters
//!
//! This library provides:
//! - Year-indexed series of average wages, benefit increases, and wage bases
//! - Assumption alternatives (Trustees Report, flat, benefit statement, user-specified)
//! - PIA and MFB bend points and the windfall elimination percentage
//! - Retirement earnings test exempt amounts and withholding
//! - The special minimum table
//! - Present-law, amended-law, and fixed-scenario engines

pub mod assumptions;
pub mod error;
pub mod history;
pub mod params;
pub mod projection;
pub mod rounding;
pub mod series;

// Re-export commonly used types
pub use assumptions::{Alternative, AssumptionSource, CatchupTable, EmbeddedAssumptions, LoadedAssumptions};
pub use error::{ParamsError, Result};
pub use history::HistoricalInput;
pub use projection::{FixedScenarioEngine, ParameterEngine, ParameterRow, ProjectionConfig};
pub use series::AnnualSeries;
