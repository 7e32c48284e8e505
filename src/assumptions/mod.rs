//! Economic assumptions: alternatives, the first projected year, catch-up
//! increases, and the sources that supply projected rates

mod alternative;
mod anchor;
mod catchup;
mod source;
pub mod loader;

pub use alternative::Alternative;
pub use anchor::CurrentYear;
pub use catchup::CatchupTable;
pub use loader::LoadedAssumptions;
pub use source::{AssumptionSeries, AssumptionSource, BenefitIncreaseAssumption, EmbeddedAssumptions};
