use core::fmt;

/// Result alias for `fedfuzz`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the optimizer, the metric utility and the validators.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Shape mismatch between inputs (string description).
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// Metric name not recognised.
    UnknownMetric(String),

    /// Required shared state is missing or inconsistent.
    PreconditionViolation(String),

    /// Two cluster centers coincide, so their separation is zero.
    DegenerateCenters {
        /// Lower cluster index of the pair.
        first: usize,
        /// Higher cluster index of the pair.
        second: usize,
    },

    /// Centers were requested before any `fit` or `set_centers`.
    NotFitted,

    /// I/O failure while reading benchmark data.
    Io(String),

    /// Malformed line in a benchmark data file.
    Parse {
        /// 1-based line number.
        line: usize,
        /// Error message.
        message: String,
    },
}

impl Error {
    pub(crate) fn shape(expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Error::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected}, actual {actual}")
            }
            Error::UnknownMetric(name) => write!(f, "unknown metric '{name}'"),
            Error::PreconditionViolation(msg) => write!(f, "precondition violated: {msg}"),
            Error::DegenerateCenters { first, second } => {
                write!(f, "centers {first} and {second} coincide")
            }
            Error::NotFitted => write!(f, "model has no centers; call fit or set_centers first"),
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Parse { line, message } => write!(f, "parse error on line {line}: {message}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::InvalidParameter {
            name: "fuzziness",
            message: "must be > 1",
        };
        assert_eq!(err.to_string(), "invalid parameter 'fuzziness': must be > 1");

        let err = Error::DegenerateCenters { first: 0, second: 2 };
        assert_eq!(err.to_string(), "centers 0 and 2 coincide");

        let err = Error::shape("3 columns", "2 columns");
        assert_eq!(
            err.to_string(),
            "shape mismatch: expected 3 columns, actual 2 columns"
        );
    }
}
