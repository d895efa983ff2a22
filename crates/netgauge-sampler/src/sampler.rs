//! The sampler loop.

use std::time::Duration;

use netgauge_core::{
    gauge_value, megabits, octet_delta, scale_to_gauge, Actuator, Channel, Command,
    CounterSource, GaugeConfig, Level, WindowMode,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{PublishError, SampleError};
use crate::state::LoopState;

/// Display channels the sampler drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channels {
    pub gauge: Channel,
    pub warn: Option<Channel>,
    pub danger: Option<Channel>,
    pub power: Option<Channel>,
}

/// Fixed parameters of the loop, resolved once at startup.
#[derive(Debug, Clone)]
pub struct SamplerSettings {
    /// Megabits per second at full deflection.
    pub gauge_max: f64,
    pub warn_threshold: f64,
    pub danger_threshold: f64,
    /// Ticks per publish cycle; also the averaging divisor.
    pub publish_threshold: u32,
    pub window: WindowMode,
    pub tick_interval: Duration,
    /// Pause between consecutive display commands in one cycle.
    pub pacing: Duration,
    pub channels: Channels,
}

impl SamplerSettings {
    pub fn from_config(config: &GaugeConfig) -> Self {
        Self {
            gauge_max: config.sampler.gauge_max,
            warn_threshold: config.sampler.warn_threshold,
            danger_threshold: config.sampler.danger_threshold,
            publish_threshold: config.sampler.publish_threshold,
            window: config.sampler.window,
            tick_interval: config.sampler.tick_interval(),
            pacing: config.display.pacing(),
            channels: Channels {
                gauge: config.display.gauge_channel,
                warn: config.display.warn_channel,
                danger: config.display.danger_channel,
                power: config.display.power_channel,
            },
        }
    }

    /// Whether a cycle that has seen `tick_count` ticks is due.
    pub fn cycle_complete(&self, tick_count: u32) -> bool {
        match self.window {
            WindowMode::Legacy => tick_count > self.publish_threshold,
            WindowMode::Exact => tick_count >= self.publish_threshold,
        }
    }
}

/// What happened to a cycle's average.
#[derive(Debug)]
pub enum PublishOutcome {
    Published { average: f64 },
    Dropped { average: f64, error: PublishError },
}

impl PublishOutcome {
    pub fn average(&self) -> f64 {
        match self {
            PublishOutcome::Published { average } | PublishOutcome::Dropped { average, .. } => {
                *average
            }
        }
    }
}

/// Observations from one tick.
#[derive(Debug)]
pub struct TickReport {
    pub sample: u64,
    /// Octets since the previous sample; negative on counter reset.
    pub octets: f64,
    pub megabits: f64,
    pub scaled: i64,
    /// Set on ticks that closed a cycle.
    pub publish: Option<PublishOutcome>,
}

/// Owns the loop state and both collaborators.
pub struct Sampler<S, A> {
    source: S,
    actuator: A,
    settings: SamplerSettings,
    state: LoopState,
}

impl<S: CounterSource, A: Actuator> Sampler<S, A> {
    pub fn new(source: S, actuator: A, settings: SamplerSettings) -> Self {
        Self {
            source,
            actuator,
            settings,
            state: LoopState::new(),
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    /// Switch on the power indicator, if one is configured.
    pub async fn announce(&mut self) {
        let Some(channel) = self.settings.channels.power else {
            return;
        };
        let command = Command::Digital {
            channel,
            level: Level::High,
        };
        match self.actuator.send(command).await {
            Ok(()) => info!(%command, "power indicator on"),
            Err(e) => warn!(%command, error = %e, "failed to switch on power indicator"),
        }
    }

    /// Sample once and publish if the cycle is complete.
    ///
    /// Only a failed counter read is returned as an error; the loop state
    /// is left exactly as it was. Publish failures are reported in the
    /// [`TickReport`] and the cycle is reset regardless.
    pub async fn tick(&mut self) -> Result<TickReport, SampleError> {
        let sample = self
            .source
            .read_counter()
            .await
            .map_err(SampleError::Read)?;

        let octets = octet_delta(sample, self.state.last_sample());
        let megabits = megabits(octets);
        let scaled = scale_to_gauge(megabits, self.settings.gauge_max);
        self.state.record(scaled);

        debug!(
            sample,
            octets,
            megabits,
            scaled,
            ticks = self.state.tick_count(),
            "tick sampled"
        );

        let publish = if self.settings.cycle_complete(self.state.tick_count()) {
            let average =
                self.state.accumulator() as f64 / f64::from(self.settings.publish_threshold);
            let outcome = match self.publish(average).await {
                Ok(()) => {
                    info!(
                        octets,
                        megabits,
                        average,
                        gauge = gauge_value(average),
                        "display updated"
                    );
                    PublishOutcome::Published { average }
                }
                Err(error) => {
                    warn!(%error, average, "display update dropped, waiting for next cycle");
                    PublishOutcome::Dropped { average, error }
                }
            };
            self.state.reset_cycle();
            Some(outcome)
        } else {
            None
        };

        self.state.set_last_sample(sample);

        Ok(TickReport {
            sample,
            octets,
            megabits,
            scaled,
            publish,
        })
    }

    /// Send gauge, warn and danger in that order, pausing between calls.
    async fn publish(&mut self, average: f64) -> Result<(), PublishError> {
        let channels = self.settings.channels;
        let mut commands = vec![Command::Analog {
            channel: channels.gauge,
            value: gauge_value(average),
        }];
        if let Some(channel) = channels.warn {
            commands.push(Command::Digital {
                channel,
                level: Level::from_bool(average > self.settings.warn_threshold),
            });
        }
        if let Some(channel) = channels.danger {
            commands.push(Command::Digital {
                channel,
                level: Level::from_bool(average > self.settings.danger_threshold),
            });
        }

        for (i, command) in commands.into_iter().enumerate() {
            if i > 0 && !self.settings.pacing.is_zero() {
                tokio::time::sleep(self.settings.pacing).await;
            }
            self.actuator
                .send(command)
                .await
                .map_err(|source| PublishError { command, source })?;
        }
        Ok(())
    }

    /// Run until `shutdown` flips (or its sender is dropped).
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            publish_threshold = self.settings.publish_threshold,
            window = ?self.settings.window,
            tick_interval = ?self.settings.tick_interval,
            "sampler started"
        );

        self.announce().await;

        loop {
            if let Err(e) = self.tick().await {
                warn!(error = %e, "tick skipped");
            }

            tokio::select! {
                _ = tokio::time::sleep(self.settings.tick_interval) => {}
                _ = shutdown.changed() => {
                    info!("sampler shutting down");
                    break;
                }
            }
        }
    }
}
