//! Configuration Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A config file was named explicitly but doesn't exist.
    #[display("config file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The config file's extension isn't one of `toml`, `yaml`, `yml`, `json`.
    #[display("unsupported config format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// The merged configuration doesn't fit [`Config`](crate::Config).
    #[display("invalid configuration: {_0}")]
    Extract(#[error(not(source))] String),
    #[display("no export root configured")]
    MissingRoot,
}

impl ErrorKind {
    /// Configuration problems need a human; retrying won't help.
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
            ErrorKind::UnsupportedFormat("ini".to_string()).to_string(),
            "unsupported config format: ini"
        );
        assert_eq!(ErrorKind::MissingRoot.to_string(), "no export root configured");
        assert!(!ErrorKind::NotFound(PathBuf::from("x.toml")).is_retryable());
    }
}
