use core::fmt::{self, Display};

use crate::{
    mem::ContainerError,
    log::LogError,
};

#[derive(Debug)]
pub enum Error {
    ContainerError(ContainerError),
    LogError(LogError),
}

impl Display for Error {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContainerError(err) => write!(f, "container error: {err}"),
            Self::LogError(err) => write!(f, "log error: {err}"),
        }
    }
}

impl core::error::Error for Error {

    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::ContainerError(err) => Some(err),
            Self::LogError(err) => Some(err),
        }
    }
}

impl From<ContainerError> for Error {

    fn from(value: ContainerError) -> Self {
        Self::ContainerError(value)
    }
}

impl From<LogError> for Error {

    fn from(value: LogError) -> Self {
        Self::LogError(value)
    }
}
