use std::time::Duration;

use netgauge_core::{Actuator, BoxError, Command, PortFuture};
use tracing::debug;

use crate::client::{http_get, with_default_port};

/// Display board reachable over plain HTTP.
#[derive(Debug, Clone)]
pub struct HttpActuator {
    address: String,
    timeout: Duration,
}

impl HttpActuator {
    pub fn new(address: &str, timeout: Duration) -> Self {
        Self {
            address: with_default_port(address),
            timeout,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Actuator for HttpActuator {
    fn send(&mut self, command: Command) -> PortFuture<'_, ()> {
        Box::pin(async move {
            debug!(address = %self.address, %command, "sending display command");
            http_get(&self.address, &command.path(), self.timeout)
                .await
                .map(|_| ())
                .map_err(|e| Box::new(e) as BoxError)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::spawn_board;
    use netgauge_core::Level;

    #[test]
    fn address_gets_default_port() {
        let actuator = HttpActuator::new("10.0.1.3", Duration::from_secs(1));
        assert_eq!(actuator.address(), "10.0.1.3:80");
    }

    #[tokio::test]
    async fn commands_become_paths() {
        let (addr, mut requests) = spawn_board("200 OK").await;
        let mut actuator = HttpActuator::new(&addr.to_string(), Duration::from_secs(2));

        actuator
            .send(Command::Analog {
                channel: 5,
                value: 57,
            })
            .await
            .unwrap();
        actuator
            .send(Command::Digital {
                channel: 15,
                level: Level::High,
            })
            .await
            .unwrap();

        assert!(requests.recv().await.unwrap().starts_with("GET /5/57 "));
        assert!(requests.recv().await.unwrap().starts_with("GET /15/HIGH "));
    }

    #[tokio::test]
    async fn any_answer_counts_as_delivered() {
        let (addr, mut requests) = spawn_board("404 Not Found").await;
        let mut actuator = HttpActuator::new(&addr.to_string(), Duration::from_secs(2));

        actuator
            .send(Command::Digital {
                channel: 15,
                level: Level::High,
            })
            .await
            .unwrap();
        assert!(requests.recv().await.unwrap().starts_with("GET /15/HIGH "));
    }

    #[tokio::test]
    async fn unreachable_board_is_reported() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let mut actuator = HttpActuator::new(&addr.to_string(), Duration::from_secs(2));

        let err = actuator
            .send(Command::Digital {
                channel: 16,
                level: Level::Low,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connect"));
    }
}
