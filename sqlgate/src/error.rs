use sqlgate_core::{ConfigError, ConnectError};
use sqlgate_data::DataError;

/// Any failure surfaced by [`Client`](crate::Client) or its repository.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Data(#[from] DataError),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Connect(ConnectError::Config(err))
    }
}
