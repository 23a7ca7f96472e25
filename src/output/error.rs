//! Output-related errors

use std::fmt;
use std::error::Error;
use std::path::PathBuf;

pub enum OutputError {
    Directory(PathBuf, String),
    Write(PathBuf, String),
    Revision,
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutputError::Directory(p, cause) => write!(f, "failed to create output directory '{}' because {}", p.display(), cause),
            OutputError::Write(p, cause) => write!(f, "failed to write rate table to '{}' because {}", p.display(), cause),
            OutputError::Revision => write!(f, "git revision was not recorded at build time"),
        }
    }
}

impl fmt::Debug for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for OutputError {}

impl OutputError {
    pub fn directory(path: &std::path::Path, cause: &std::io::Error) -> Self {
        Self::Directory(path.to_owned(), cause.to_string())
    }

    pub fn write(path: &std::path::Path, cause: &std::io::Error) -> Self {
        Self::Write(path.to_owned(), cause.to_string())
    }
}
