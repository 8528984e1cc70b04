use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("empty passenger list")]
    EmptyPassengers,

    #[error(transparent)]
    Model(#[from] yatry_model::Error),

    #[error(transparent)]
    Time(#[from] yatry_time::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
