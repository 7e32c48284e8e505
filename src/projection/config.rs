//! Settings for one projection run

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::engine::ParameterEngine;
use crate::assumptions::{Alternative, AssumptionSource, EmbeddedAssumptions, LoadedAssumptions};
use crate::error::{AssumptionKind, ParamsError, Result};
use crate::history::HistoricalInput;
use crate::params::rules::Amendments;
use crate::series::MAX_YEAR;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// First projected year; history runs through the year before
    pub istart: i32,

    /// Last projected year
    pub max_year: i32,

    /// Average wage alternative code, 1-7
    pub average_wage_alternative: i32,

    /// Benefit increase alternative code, 1-7
    pub benefit_increase_alternative: i32,

    /// Benefit statement run: only the flat (5) and legacy (6) alternatives are allowed
    pub benefit_statement: bool,

    /// History CSV; embedded history when absent
    pub history_path: Option<PathBuf>,

    /// Assumption directory; embedded assumptions when absent
    pub assumptions_path: Option<PathBuf>,

    /// Amended-law rules; present law when absent
    pub amendments: Option<Amendments>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            istart: 2025,
            max_year: MAX_YEAR,
            average_wage_alternative: Alternative::TrusteesIIB.code(),
            benefit_increase_alternative: Alternative::TrusteesIIB.code(),
            benefit_statement: false,
            history_path: None,
            assumptions_path: None,
            amendments: None,
        }
    }
}

impl ProjectionConfig {
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ParamsError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| ParamsError::read(path, e))
    }

    /// Validated (average wage, benefit increase) alternatives
    pub fn alternatives(&self) -> Result<(Alternative, Alternative)> {
        let check = if self.benefit_statement {
            Alternative::check_benefit_statement
        } else {
            Alternative::check_general
        };
        Ok((
            check(AssumptionKind::AverageWage, self.average_wage_alternative)?,
            check(AssumptionKind::BenefitIncrease, self.benefit_increase_alternative)?,
        ))
    }

    /// History through `istart - 1`
    pub fn load_history(&self) -> Result<HistoricalInput> {
        match &self.history_path {
            Some(path) => HistoricalInput::from_csv_path(path, self.istart - 1),
            None => HistoricalInput::embedded(self.istart - 1),
        }
    }

    pub fn assumption_source(&self) -> Result<Box<dyn AssumptionSource>> {
        Ok(match &self.assumptions_path {
            Some(path) => Box::new(LoadedAssumptions::load_from(path)?),
            None => Box::new(EmbeddedAssumptions::new()),
        })
    }

    /// Engine for these rules, not yet projected
    pub fn engine(&self, history: Arc<HistoricalInput>) -> Result<ParameterEngine> {
        match &self.amendments {
            Some(amendments) => ParameterEngine::amended_law(history, self.max_year, amendments),
            None => ParameterEngine::present_law(history, self.max_year),
        }
    }

    /// Load history and assumptions, then build and project the engine
    pub fn run(&self) -> Result<ParameterEngine> {
        let (average_wage, benefit_increase) = self.alternatives()?;
        let history = Arc::new(self.load_history()?);
        let source = self.assumption_source()?;
        let mut engine = self.engine(history)?;
        engine.project(average_wage, benefit_increase, source.as_ref())?;
        Ok(engine)
    }
}
