//! UDP client for single-OID SNMPv2c GETs.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use tokio::net::UdpSocket;
use tracing::debug;

use crate::error::{SnmpError, SnmpResult};
use crate::oid::Oid;
use crate::pdu::{error_status_name, Message, PduKind, Value};

/// Largest datagram accepted from the agent.
const MAX_DATAGRAM: usize = 65_507;

/// A connected UDP socket talking to one agent with one community.
#[derive(Debug)]
pub struct SnmpClient {
    socket: UdpSocket,
    target: SocketAddr,
    community: String,
    timeout: Duration,
    next_request_id: i32,
}

impl SnmpClient {
    /// Resolve `host:port` and bind a local socket of the matching family.
    pub async fn connect(
        host: &str,
        port: u16,
        community: &str,
        timeout: Duration,
    ) -> SnmpResult<Self> {
        let target = tokio::net::lookup_host((host, port))
            .await?
            .next()
            .ok_or_else(|| SnmpError::Resolve(format!("{host}:{port}")))?;

        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(target).await?;
        debug!(agent = %target, "snmp socket ready");

        Ok(Self {
            socket,
            target,
            community: community.to_string(),
            timeout,
            next_request_id: 1,
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Fetch one OID. The whole exchange is bounded by the client timeout.
    pub async fn get(&mut self, oid: &Oid) -> SnmpResult<Value> {
        let request_id = self.take_request_id();
        let request = Message::get_request(&self.community, request_id, oid.clone());

        let response = match tokio::time::timeout(self.timeout, self.exchange(&request)).await {
            Ok(result) => result?,
            Err(_) => {
                debug!(agent = %self.target, %oid, "snmp get timed out");
                return Err(SnmpError::Timeout {
                    target: self.target.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        single_value(response)
    }

    /// Send the request and wait for the response carrying its request-id.
    ///
    /// Late answers to earlier, timed-out requests and undecodable
    /// datagrams are skipped.
    async fn exchange(&self, request: &Message) -> SnmpResult<Message> {
        self.socket.send(&request.encode()).await?;

        let mut buf = vec![0u8; MAX_DATAGRAM];
        loop {
            let len = self.socket.recv(&mut buf).await?;
            let response = match Message::decode(&buf[..len]) {
                Ok(response) => response,
                Err(e) => {
                    debug!(error = %e, len, "discarding undecodable snmp datagram");
                    continue;
                }
            };
            if response.pdu.kind == PduKind::GetResponse
                && response.pdu.request_id == request.pdu.request_id
            {
                return Ok(response);
            }
            debug!(
                expected = request.pdu.request_id,
                received = response.pdu.request_id,
                "discarding unmatched snmp response"
            );
        }
    }

    fn take_request_id(&mut self) -> i32 {
        let id = self.next_request_id;
        self.next_request_id = if id == i32::MAX { 1 } else { id + 1 };
        id
    }
}

fn single_value(response: Message) -> SnmpResult<Value> {
    let pdu = response.pdu;
    if pdu.error_status != 0 {
        return Err(SnmpError::Agent {
            status: pdu.error_status,
            index: pdu.error_index,
            name: error_status_name(pdu.error_status),
        });
    }

    let mut varbinds = pdu.varbinds;
    if varbinds.len() != 1 {
        return Err(SnmpError::VarBindCount(varbinds.len()));
    }
    let vb = varbinds.remove(0);
    if vb.value.is_exception() {
        return Err(SnmpError::NoValue {
            oid: vb.oid,
            kind: vb.value.kind(),
        });
    }
    Ok(vb.value)
}
