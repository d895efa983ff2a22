//! Error types for SNMP reads.

use std::time::Duration;

use thiserror::Error;

use crate::oid::Oid;

/// Result type alias for SNMP operations.
pub type SnmpResult<T> = Result<T, SnmpError>;

/// Errors that can occur while querying an agent.
#[derive(Debug, Error)]
pub enum SnmpError {
    #[error("invalid oid {0:?}")]
    InvalidOid(String),

    #[error("could not resolve {0}")]
    Resolve(String),

    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no response from {target} within {timeout:?}")]
    Timeout { target: String, timeout: Duration },

    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("unexpected tag 0x{found:02x}, expected 0x{expected:02x}")]
    UnexpectedTag { expected: u8, found: u8 },

    #[error("agent returned {name} (error-status {status}, index {index})")]
    Agent {
        status: i64,
        index: i64,
        name: &'static str,
    },

    #[error("{oid}: {kind}")]
    NoValue { oid: Oid, kind: &'static str },

    #[error("{oid} holds {kind}, not a counter")]
    NotACounter { oid: Oid, kind: &'static str },

    #[error("response carried {0} varbinds, expected 1")]
    VarBindCount(usize),
}

pub(crate) fn malformed(reason: impl Into<String>) -> SnmpError {
    SnmpError::Malformed(reason.into())
}
