use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used across the pricing crate.
pub type Result<T> = std::result::Result<T, PricingErr>;

/// The pricing crate's error type.
#[derive(Debug)]
pub enum PricingErr {
    Io(io::Error),
    Csv(csv::Error),
    Artifact(serde_json::Error),
    MissingColumn {
        column: &'static str,
    },
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
    EmptyDataset,
    MissingFeature {
        feature: &'static str,
    },
    NotNumeric {
        feature: &'static str,
        value: String,
    },
    NotCategorical {
        feature: &'static str,
        value: String,
    },
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    NonFiniteValue {
        what: &'static str,
    },
    UnsupportedVersion {
        got: u32,
        expected: u32,
    },
    SchemaMismatch {
        expected: String,
        got: String,
    },
    UnsortedCategories {
        feature: String,
    },
    InvalidFraction(f64),
    Solver(&'static str),
}

impl Display for PricingErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingErr::Io(e) => write!(f, "io error: {e}"),
            PricingErr::Csv(e) => write!(f, "csv error: {e}"),
            PricingErr::Artifact(e) => write!(f, "malformed model artifact: {e}"),
            PricingErr::MissingColumn { column } => {
                write!(f, "the dataset has no '{column}' column")
            }
            PricingErr::InvalidNumber { row, column, value } => write!(
                f,
                "row {row}: cannot parse '{value}' in column '{column}' as a number"
            ),
            PricingErr::EmptyDataset => write!(f, "the dataset has no rows"),
            PricingErr::MissingFeature { feature } => {
                write!(f, "the record has no '{feature}' feature")
            }
            PricingErr::NotNumeric { feature, value } => {
                write!(f, "could not convert {value} to a number for feature '{feature}'")
            }
            PricingErr::NotCategorical { feature, value } => {
                write!(f, "expected a string category for feature '{feature}', got {value}")
            }
            PricingErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            PricingErr::NonFiniteValue { what } => write!(f, "{what} is not a finite number"),
            PricingErr::UnsupportedVersion { got, expected } => write!(
                f,
                "unsupported artifact format version {got}, expected {expected}"
            ),
            PricingErr::SchemaMismatch { expected, got } => write!(
                f,
                "the artifact expects features [{got}] but this build uses [{expected}]"
            ),
            PricingErr::UnsortedCategories { feature } => write!(
                f,
                "the categories of feature '{feature}' are not sorted and unique"
            ),
            PricingErr::InvalidFraction(value) => {
                write!(f, "the holdout fraction must be in (0, 1), got {value}")
            }
            PricingErr::Solver(msg) => write!(f, "least squares solver failed: {msg}"),
        }
    }
}

impl Error for PricingErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PricingErr::Io(e) => Some(e),
            PricingErr::Csv(e) => Some(e),
            PricingErr::Artifact(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PricingErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for PricingErr {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_json::Error> for PricingErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Artifact(value)
    }
}
