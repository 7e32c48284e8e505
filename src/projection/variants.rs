//! Engine fixed to one Trustees Report alternative
//!
//! The engine is projected once when built and exposes only read access, so
//! a scenario can be shared between threads without further coordination.

use std::ops::Deref;
use std::sync::Arc;

use log::info;

use super::engine::ParameterEngine;
use crate::assumptions::{Alternative, AssumptionSource};
use crate::error::{ParamsError, Result};
use crate::history::HistoricalInput;

/// Present-law parameters under one Trustees Report alternative
#[derive(Debug, Clone)]
pub struct FixedScenarioEngine {
    alternative: Alternative,
    engine: ParameterEngine,
}

impl FixedScenarioEngine {
    /// Project `alternative` for both average wages and benefit increases
    pub fn new(
        history: Arc<HistoricalInput>,
        alternative: Alternative,
        source: &dyn AssumptionSource,
        max_year: i32,
    ) -> Result<Self> {
        if !alternative.is_trustees_report() {
            return Err(ParamsError::InvalidArgument {
                what: "fixed scenario alternative",
                reason: format!("{} is not a Trustees Report alternative", alternative),
            });
        }
        let mut engine = ParameterEngine::present_law(history, max_year)?;
        engine.project(alternative, alternative, source)?;
        info!("fixed scenario {} ready through {}", alternative, max_year);
        Ok(Self { alternative, engine })
    }

    pub fn alternative(&self) -> Alternative {
        self.alternative
    }
}

impl Deref for FixedScenarioEngine {
    type Target = ParameterEngine;

    fn deref(&self) -> &ParameterEngine {
        &self.engine
    }
}
