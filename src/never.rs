use std::error::Error;
use std::fmt;

/// The error type for readers that cannot fail, such as [`crate::StringReader`].
///
/// Equivalent to [`std::convert::Infallible`], but implements `std::error::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Never {}

impl fmt::Display for Never {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl Error for Never {}
