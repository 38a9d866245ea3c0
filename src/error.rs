use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

/// Which stage of a run gave up.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not match the export")]
    Library,
    #[display("could not export reports")]
    Report,
}
