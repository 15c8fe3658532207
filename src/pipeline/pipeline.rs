//! Pipeline trait.
use crate::error::Error;

/// Implemented by runnable pipelines,
/// generic over the return type so that a pipeline can report what it did.
pub trait Pipeline<T> {
    fn run(&self) -> Result<T, Error>;
}
