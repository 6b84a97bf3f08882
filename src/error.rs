use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("usage: decipher <cipher_file> <reference_file> <keyout_file> <textout_file>")]
    Usage,

    /// Beam width from the environment was not a positive integer.
    #[error("invalid beam width {0:?}: expected a positive integer")]
    BeamWidth(String),

    /// Covers unreadable files as well as files that are not valid UTF-8.
    #[error("unable to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("unable to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}
