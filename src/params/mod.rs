//! Benefit formula parameters: increases, bend points, wage bases, the
//! retirement earnings test, and the special minimum

pub mod bend_points;
pub mod cola;
pub mod rules;
pub mod special_min;
pub mod wage_base;

pub use bend_points::{BendPointTable, Formula};
pub use ret_test::{RetirementTestAmounts, TestBracket};
pub use rules::{AgeYm, Amendments, RuleSet};
pub use special_min::{SpecialMinimumEntry, SpecialMinimumTable};
pub use wage_base::{WageBaseSeries, WageBases};
