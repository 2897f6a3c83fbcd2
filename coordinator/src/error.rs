use std::{fmt, io};

use matrix::MatrixError;

/// All errors that can doom a job on the coordinator.
///
/// Every variant is recovered at the job boundary: a failed job is
/// reported and the coordinator stays available for the next one.
#[derive(Debug)]
pub enum CoordinatorError {
    /// No idle worker connection is available to dispatch to.
    NoWorkers,
    /// A shape failure: incompatible multiply dimensions or an
    /// unsatisfiable partition. Caught before any block is dispatched.
    Matrix(MatrixError),
    /// Fewer result blocks were collected than were dispatched. Carries
    /// the per-block failure reasons; no reconstruction is attempted and
    /// nothing is redispatched.
    PartialResults {
        expected: usize,
        received: usize,
        failed: Vec<(usize, String)>,
    },
    /// An underlying I/O error not covered by the above variants.
    Io(io::Error),
}

impl fmt::Display for CoordinatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWorkers => write!(f, "no idle workers connected"),
            Self::Matrix(e) => write!(f, "matrix error: {e}"),
            Self::PartialResults {
                expected,
                received,
                failed,
            } => {
                write!(
                    f,
                    "partial results: received {received} of {expected} block(s)"
                )?;
                for (index, reason) in failed {
                    write!(f, "; block {index}: {reason}")?;
                }
                Ok(())
            }
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for CoordinatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Matrix(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MatrixError> for CoordinatorError {
    fn from(e: MatrixError) -> Self {
        Self::Matrix(e)
    }
}

impl From<io::Error> for CoordinatorError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
