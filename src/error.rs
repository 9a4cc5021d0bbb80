//! Error type of the study driver

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] survey_core::Error),

    #[error(transparent)]
    Io(#[from] survey_io::Error),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
