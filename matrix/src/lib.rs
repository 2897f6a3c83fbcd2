mod error;
mod generate;
mod matrix;
mod partition;

pub use error::MatrixError;
pub use generate::generate;
pub use matrix::Matrix;
pub use partition::{Block, split};

/// The matrix module's result type.
pub type Result<T> = std::result::Result<T, MatrixError>;
