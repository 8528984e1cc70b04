use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("m_range must lie in (0, 1), got {0}")]
    InvalidMRange(f64),

    #[error("time window is invalid: t_min ({0}) must be < t_max ({1})")]
    InvalidWindow(f64, f64),

    #[error("golden-section search received an empty group")]
    EmptyGroup,

    #[error("failed to construct the standard normal distribution: {0}")]
    Normal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
