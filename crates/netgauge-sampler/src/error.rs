//! Error types for the sampling loop.

use netgauge_core::{BoxError, Command};
use thiserror::Error;

/// Failure that prevents a tick from being sampled.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("counter read failed: {0}")]
    Read(BoxError),
}

/// A display command within a publish cycle failed.
///
/// The remaining commands of that cycle are skipped.
#[derive(Debug, Error)]
#[error("display command {command} failed: {source}")]
pub struct PublishError {
    pub command: Command,
    pub source: BoxError,
}
