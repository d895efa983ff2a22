//! netgauge-sampler: the sampling loop behind the traffic meter.
//!
//! Every tick reads the octet counter, turns the difference into a gauge
//! value, and folds it into a running sum. Once a cycle completes, the
//! average goes to the display together with the warn/danger LEDs, and the
//! cycle counters start over.
//!
//! # Cycle
//!
//! ```text
//! tick()
//!   ├── CounterSource::read_counter()      (failure → SampleError::Read, state untouched)
//!   ├── LoopState::record(scaled)
//!   ├── cycle complete?
//!   │     ├── gauge  /<gauge>/<avg>
//!   │     ├── pause → /<warn>/HIGH|LOW
//!   │     ├── pause → /<danger>/HIGH|LOW   (first failure drops the rest)
//!   │     └── LoopState::reset_cycle()     (success or not)
//!   └── last_sample = sample
//! run() = announce() + loop { tick(); sleep(tick_interval) } until shutdown
//! ```
//!
//! A failed publish is logged and dropped, never retried.

pub mod error;
pub mod sampler;
pub mod state;

pub use error::{PublishError, SampleError};
pub use sampler::{Channels, PublishOutcome, Sampler, SamplerSettings, TickReport};
pub use state::LoopState;
