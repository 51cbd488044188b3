mod pattern;

pub use pattern::PatternBuildError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Pattern(#[from] PatternBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
