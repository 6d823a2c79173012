use std::fmt::{self, Display};

/// Errors from the core disease model.
///
/// The outer layers wrap these in `anyhow` with context; tests match on the
/// variants directly.
#[derive(Debug, Clone, PartialEq)]
pub enum SpreadError {
    /// An individual was used in a role its current status does not allow.
    TypeMismatch { name: String, expected: &'static str },
    /// An exhausted or recovered individual was asked to transmit or countdown.
    AlreadyRecovered(String),
    /// An infected individual was reclassified to recovered too early.
    NotFullyRecovered(String),
    /// A required run parameter was never set.
    MissingConfiguration(&'static str),
    /// A transmission probability outside `[0.0, 1.0]`.
    InvalidProbability(f64),
}

impl Display for SpreadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SpreadError::TypeMismatch { name, expected } => {
                write!(f, "{name} is not {expected}")
            }
            SpreadError::AlreadyRecovered(name) => write!(f, "{name} has already recovered"),
            SpreadError::NotFullyRecovered(name) => write!(f, "{name} has not fully recovered"),
            SpreadError::MissingConfiguration(what) => write!(f, "you have not set the {what}"),
            SpreadError::InvalidProbability(prob) => {
                write!(f, "probability must be in [0.0, 1.0], but is {prob}")
            }
        }
    }
}

impl std::error::Error for SpreadError {}
