use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("similarity matrix is empty")]
    EmptyMatrix,

    #[error("damping must lie in [0.5, 1), got {0}")]
    InvalidDamping(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
