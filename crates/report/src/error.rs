//! Report Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The report file couldn't be created (missing parent, permissions…).
    #[display("could not create report: {}", _0.display())]
    Create(#[error(not(source))] PathBuf),
    #[display("could not write report: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Reports are written once at the end of a run; nothing is retried.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::Create(PathBuf::from("/out/json.csv")).to_string(),
            "could not create report: /out/json.csv"
        );
        assert!(!ErrorKind::Write(PathBuf::from("x")).is_retryable());
    }
}
