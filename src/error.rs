//! Error types shared by every table and the projection engine

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ParamsError>;

/// Which assumption an alternative is being validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssumptionKind {
    /// Average wage increases
    AverageWage,
    /// Benefit increases
    BenefitIncrease,
}

impl fmt::Display for AssumptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssumptionKind::AverageWage => write!(f, "average wage"),
            AssumptionKind::BenefitIncrease => write!(f, "benefit increase"),
        }
    }
}

/// Range of alternatives accepted in a given context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityDomain {
    /// Any alternative from I through user-specified
    General,
    /// Benefit statements: flat or legacy only
    BenefitStatement,
}

impl fmt::Display for ValidityDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidityDomain::General => write!(f, "1 to 7"),
            ValidityDomain::BenefitStatement => write!(f, "5 or 6"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParamsError {
    // ---- Domain/range ----
    #[error("year {year} is outside the range {first}-{last}")]
    YearOutOfRange { year: i32, first: i32, last: i32 },

    #[error("{kind} alternative {value} is invalid, must be {domain}")]
    InvalidAlternative {
        kind: AssumptionKind,
        domain: ValidityDomain,
        value: i32,
    },

    #[error("first projected year {year} is outside the range 1979-{max}")]
    InvalidStartYear { year: i32, max: i32 },

    #[error("years of coverage in excess of 10 must be 1-20, got {0}")]
    InvalidYearsOfCoverage(u32),

    #[error("invalid {what}: {reason}")]
    InvalidArgument { what: &'static str, reason: String },

    // ---- Preconditions ----
    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("parameters have not been projected for the current first projected year")]
    NotProjected,

    // ---- Collaborator I/O ----
    #[error("unable to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("unable to write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

impl ParamsError {
    pub(crate) fn read(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        ParamsError::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        ParamsError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for the open/read/write failures raised by persistence collaborators
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ParamsError::Open { .. } | ParamsError::Read { .. } | ParamsError::Write { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_context() {
        let err = ParamsError::InvalidAlternative {
            kind: AssumptionKind::BenefitIncrease,
            domain: ValidityDomain::BenefitStatement,
            value: 2,
        };
        assert_eq!(
            err.to_string(),
            "benefit increase alternative 2 is invalid, must be 5 or 6"
        );

        let err = ParamsError::YearOutOfRange { year: 1936, first: 1937, last: 2100 };
        assert_eq!(err.to_string(), "year 1936 is outside the range 1937-2100");
    }

    #[test]
    fn test_io_classification() {
        let open = ParamsError::Open {
            path: PathBuf::from("history.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(open.is_io());
        assert!(ParamsError::read("history.csv", "bad number").is_io());
        assert!(!ParamsError::NotProjected.is_io());
    }
}
