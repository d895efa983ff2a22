use netgauge_core::{BoxError, CounterSource, PortFuture};
use tracing::trace;

use crate::client::SnmpClient;
use crate::error::{SnmpError, SnmpResult};
use crate::oid::Oid;

/// Reads one interface octet counter per tick.
#[derive(Debug)]
pub struct SnmpCounterSource {
    client: SnmpClient,
    oid: Oid,
}

impl SnmpCounterSource {
    pub fn new(client: SnmpClient, oid: Oid) -> Self {
        Self { client, oid }
    }

    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Fetch the counter and require a numeric type.
    pub async fn read(&mut self) -> SnmpResult<u64> {
        let value = self.client.get(&self.oid).await?;
        let counter = value.as_counter().ok_or_else(|| SnmpError::NotACounter {
            oid: self.oid.clone(),
            kind: value.kind(),
        })?;
        trace!(oid = %self.oid, counter, "counter read");
        Ok(counter)
    }
}

impl CounterSource for SnmpCounterSource {
    fn read_counter(&mut self) -> PortFuture<'_, u64> {
        Box::pin(async move { self.read().await.map_err(|e| Box::new(e) as BoxError) })
    }
}
