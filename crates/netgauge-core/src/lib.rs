//! netgauge-core: shared types for the netgauge traffic meter.
//!
//! Holds the `netgauge.toml` model, the octet → megabit → gauge scaling
//! math, the display command vocabulary, and the two collaborator traits
//! the sampler drives.
//!
//! # Data flow
//!
//! ```text
//! CounterSource::read_counter()  → u64 octets
//!   └── octet_delta() → megabits() → scale_to_gauge()   (per tick)
//! Actuator::send(Command)        ← gauge_value(average) (per cycle)
//! ```

pub mod config;
pub mod duration;
pub mod port;
pub mod scale;
pub mod types;

pub use config::{ConfigError, DisplayConfig, GaugeConfig, SamplerConfig, SnmpConfig, WindowMode};
pub use duration::parse_duration;
pub use port::{Actuator, BoxError, CounterSource, PortFuture};
pub use scale::*;
pub use types::*;
