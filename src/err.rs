use hyper::StatusCode;
use std::fmt::{self, Debug, Display};
use std::io;

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Lets `main` return errors that print like `Display` instead of `Debug`.
pub struct DisplayError(Error);

impl Debug for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<T: Into<Error>> From<T> for DisplayError {
    fn from(display: T) -> Self {
        DisplayError(display.into())
    }
}

pub trait IoErrorExt {
    fn applies_to(&self) -> AppliesTo;

    /// Status to answer with when opening a file to serve fails.
    fn file_status(&self) -> StatusCode;
}

impl IoErrorExt for io::Error {
    fn applies_to(&self) -> AppliesTo {
        match self.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset => AppliesTo::Connection,
            _ => AppliesTo::Listener,
        }
    }

    fn file_status(&self) -> StatusCode {
        match self.kind() {
            io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            _ => StatusCode::NOT_FOUND,
        }
    }
}

pub enum AppliesTo {
    Connection,
    Listener,
}
