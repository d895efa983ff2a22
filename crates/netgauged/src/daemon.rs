//! Daemon wiring: builds the collaborators from config and runs the loop.

use anyhow::Context;
use netgauge_core::GaugeConfig;
use netgauge_display::HttpActuator;
use netgauge_sampler::{Sampler, SamplerSettings};
use netgauge_snmp::{Oid, SnmpClient, SnmpCounterSource};
use tokio::sync::watch;
use tracing::info;

/// Apply command-line overrides and re-validate.
pub fn apply_overrides(
    config: &mut GaugeConfig,
    target: Option<String>,
    display: Option<String>,
) -> anyhow::Result<()> {
    if let Some(target) = target {
        config.snmp.target = target;
    }
    if let Some(display) = display {
        config.display.address = display;
    }
    config.validate()?;
    Ok(())
}

pub async fn connect_source(config: &GaugeConfig) -> anyhow::Result<SnmpCounterSource> {
    let oid: Oid = config.snmp.oid.parse()?;
    let client = SnmpClient::connect(
        &config.snmp.target,
        config.snmp.port(),
        &config.snmp.community,
        config.snmp.timeout(),
    )
    .await
    .with_context(|| format!("connecting to snmp agent {}", config.snmp.target))?;
    Ok(SnmpCounterSource::new(client, oid))
}

/// Run the sampler until Ctrl-C.
pub async fn run(config: GaugeConfig) -> anyhow::Result<()> {
    let source = connect_source(&config).await?;
    let actuator = HttpActuator::new(&config.display.address, config.display.timeout());

    info!(
        agent = %config.snmp.target,
        oid = %source.oid(),
        display = actuator.address(),
        "netgauge daemon starting"
    );

    let sampler = Sampler::new(source, actuator, SamplerSettings::from_config(&config));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sampler_handle = tokio::spawn(sampler.run(shutdown_rx));

    tokio::signal::ctrl_c()
        .await
        .context("failed to install Ctrl-C handler")?;
    info!("shutdown signal received");
    let _ = shutdown_tx.send(true);

    sampler_handle.await?;

    info!("netgauge daemon stopped");
    Ok(())
}

/// Validate everything that can be checked offline and print the config.
pub fn check(config: &GaugeConfig) -> anyhow::Result<()> {
    config.snmp.oid.parse::<Oid>().context("snmp.oid")?;
    let settings = SamplerSettings::from_config(config);

    print!("{}", config.to_toml_string()?);
    println!(
        "# tick every {:?}, publish after {} ticks ({:?} window), {:?} between display commands",
        settings.tick_interval, settings.publish_threshold, settings.window, settings.pacing
    );
    Ok(())
}

/// Read the counter once.
pub async fn probe(config: &GaugeConfig) -> anyhow::Result<()> {
    let mut source = connect_source(config).await?;
    let value = source.read().await?;
    println!("{} = {}", source.oid(), value);
    Ok(())
}
