//! Parameter projection engine and its fixed-scenario variant

mod config;
mod engine;
mod rows;
mod variants;

pub use config::ProjectionConfig;
pub use engine::ParameterEngine;
pub use rows::ParameterRow;
pub use variants::FixedScenarioEngine;
