//! netgauge-snmp: reads a single interface counter from an SNMP agent.
//!
//! Only what the meter needs is implemented: SNMPv2c `GetRequest` for one
//! OID and decoding of the matching `GetResponse`.
//!
//! # Architecture
//!
//! ```text
//! SnmpCounterSource (CounterSource)
//!   └── SnmpClient::get(oid)
//!         ├── Message::get_request().encode()  → UDP datagram
//!         ├── recv until request-id matches (bounded by timeout)
//!         └── Message::decode() → Value::as_counter()
//! ```

pub mod ber;
pub mod client;
pub mod error;
pub mod oid;
pub mod pdu;
pub mod source;

pub use client::SnmpClient;
pub use error::{SnmpError, SnmpResult};
pub use oid::Oid;
pub use pdu::{Message, Pdu, PduKind, Value, VarBind};
pub use source::SnmpCounterSource;
