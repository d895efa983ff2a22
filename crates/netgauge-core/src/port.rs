//! Collaborator traits driven by the sampler.
//!
//! Boxed futures keep both traits object-safe and let tests inject
//! in-process fakes in place of the SNMP agent and the display.

use std::future::Future;
use std::pin::Pin;

use crate::types::Command;

/// Type-erased error returned by collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future alias for collaborator calls.
pub type PortFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BoxError>> + Send + 'a>>;

/// Source of a monotonically increasing octet counter.
pub trait CounterSource: Send {
    /// Read the current counter value.
    fn read_counter(&mut self) -> PortFuture<'_, u64>;
}

/// Remote display accepting path-addressed commands.
pub trait Actuator: Send {
    /// Deliver one command. Only transport success matters.
    fn send(&mut self, command: Command) -> PortFuture<'_, ()>;
}
