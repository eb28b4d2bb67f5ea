use std::io;
use thiserror::Error;
use vp9dsp_dispatch::CapabilityParseError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] CapabilityParseError),
}
