use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures while bringing the application up
#[derive(Debug)]
pub enum InitError {
    Io(std::io::Error),
    Log(sloggers::Error),
}

impl Error for InitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InitError::Io(e) => Some(e),
            InitError::Log(e) => Some(e),
        }
    }
}

impl Display for InitError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            InitError::Io(e) => write!(f, "i/o error: {}", e),
            InitError::Log(e) => write!(f, "cannot initialize logger: {}", e),
        }
    }
}

impl From<std::io::Error> for InitError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<sloggers::Error> for InitError {
    fn from(e: sloggers::Error) -> Self {
        Self::Log(e)
    }
}
