//! Economic assumption alternatives and their validity checks

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AssumptionKind, ParamsError, Result, ValidityDomain};

/// One of the assumption scenarios a projection can be run under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Alternative {
    /// No alternative selected
    None,
    /// Trustees Report alternative I (low cost)
    TrusteesI,
    /// Trustees Report alternative II-B (intermediate)
    TrusteesIIB,
    /// Trustees Report alternative III (high cost)
    TrusteesIII,
    /// Trustees Report alternative II-A
    TrusteesIIA,
    /// No future increases
    Flat,
    /// Fixed assumptions used by the legacy benefit statement
    LegacyStatement,
    /// User-specified series
    Other,
}

impl Alternative {
    /// All alternatives in the general domain, in code order
    pub const GENERAL: [Alternative; 7] = [
        Alternative::TrusteesI,
        Alternative::TrusteesIIB,
        Alternative::TrusteesIII,
        Alternative::TrusteesIIA,
        Alternative::Flat,
        Alternative::LegacyStatement,
        Alternative::Other,
    ];

    /// The four Trustees Report alternatives
    pub const TRUSTEES: [Alternative; 4] = [
        Alternative::TrusteesI,
        Alternative::TrusteesIIB,
        Alternative::TrusteesIII,
        Alternative::TrusteesIIA,
    ];

    /// Numeric code used in assumption files
    pub fn code(self) -> i32 {
        match self {
            Alternative::None => 0,
            Alternative::TrusteesI => 1,
            Alternative::TrusteesIIB => 2,
            Alternative::TrusteesIII => 3,
            Alternative::TrusteesIIA => 4,
            Alternative::Flat => 5,
            Alternative::LegacyStatement => 6,
            Alternative::Other => 7,
        }
    }

    /// Alternative for a numeric code, `None` for anything outside 0-7
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Alternative::None),
            1 => Some(Alternative::TrusteesI),
            2 => Some(Alternative::TrusteesIIB),
            3 => Some(Alternative::TrusteesIII),
            4 => Some(Alternative::TrusteesIIA),
            5 => Some(Alternative::Flat),
            6 => Some(Alternative::LegacyStatement),
            7 => Some(Alternative::Other),
            _ => None,
        }
    }

    pub fn is_trustees_report(self) -> bool {
        matches!(
            self,
            Alternative::TrusteesI
                | Alternative::TrusteesIIB
                | Alternative::TrusteesIII
                | Alternative::TrusteesIIA
        )
    }

    pub fn is_flat_or_legacy(self) -> bool {
        matches!(self, Alternative::Flat | Alternative::LegacyStatement)
    }

    pub fn is_not_trustees_report(self) -> bool {
        !self.is_trustees_report()
    }

    /// Validate a code against the general domain (alternatives 1-7)
    pub fn check_general(kind: AssumptionKind, code: i32) -> Result<Self> {
        match Self::from_code(code) {
            Some(alt) if alt != Alternative::None => Ok(alt),
            _ => Err(ParamsError::InvalidAlternative {
                kind,
                domain: ValidityDomain::General,
                value: code,
            }),
        }
    }

    /// Validate a code against the benefit-statement domain (flat or legacy only)
    pub fn check_benefit_statement(kind: AssumptionKind, code: i32) -> Result<Self> {
        match Self::from_code(code) {
            Some(alt) if alt.is_flat_or_legacy() => Ok(alt),
            _ => Err(ParamsError::InvalidAlternative {
                kind,
                domain: ValidityDomain::BenefitStatement,
                value: code,
            }),
        }
    }

    /// Short label, e.g. "II-B"
    pub fn label(self) -> &'static str {
        match self {
            Alternative::None => "none",
            Alternative::TrusteesI => "I",
            Alternative::TrusteesIIB => "II-B",
            Alternative::TrusteesIII => "III",
            Alternative::TrusteesIIA => "II-A",
            Alternative::Flat => "flat",
            Alternative::LegacyStatement => "legacy statement",
            Alternative::Other => "other",
        }
    }

    /// Title describing the projected series for this alternative
    pub fn title(self, kind: AssumptionKind, istart: i32) -> String {
        let what = match kind {
            AssumptionKind::AverageWage => "average wage increases",
            AssumptionKind::BenefitIncrease => "benefit increases",
        };
        match self {
            a if a.is_trustees_report() => {
                format!("Alternative {} {}, projected from {}", a.label(), what, istart)
            }
            Alternative::Flat => format!("No {} after {}", what, istart - 1),
            Alternative::LegacyStatement => {
                format!("Benefit statement {}, projected from {}", what, istart)
            }
            Alternative::Other => format!("User-specified {}", what),
            _ => String::new(),
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
