//! Unified error type.

use std::fmt;

/// The error type returned by linelog's fallible operations.
///
/// Request outcomes (404, 500, etc.) are status codes written through a
/// [`ResponseWriter`](crate::ResponseWriter), and a failed access-log write
/// goes to the [`AccessLog`](crate::AccessLog) error hook. This type only
/// surfaces hosting failures: binding to a port or accepting a connection.
#[derive(Debug)]
pub struct Error(std::io::Error);

impl Error {
    /// The underlying I/O error.
    pub fn io(&self) -> &std::io::Error {
        &self.0
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "io: {}", self.0)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_io() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken"));
        assert_eq!(err.to_string(), "io: port taken");
        assert_eq!(err.io().kind(), std::io::ErrorKind::AddrInUse);
    }
}
