//! netgauge-display: drives the remote gauge/LED board.
//!
//! The board understands bare `GET /<channel>/<value>` requests. Only the
//! transport outcome and status line matter; bodies are ignored.
//!
//! ```text
//! HttpActuator (Actuator)
//!   └── http_get(address, command.path(), timeout)
//!         ├── TCP connect → HTTP/1.1 handshake (hyper)
//!         └── any response → Ok, connect/handshake/send/timeout → DisplayError
//! ```

pub mod actuator;
pub mod client;

pub use actuator::HttpActuator;
pub use client::{http_get, DisplayError};
