//! One-shot HTTP/1.1 GET against the display board.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use http::StatusCode;
use thiserror::Error;
use tracing::debug;

/// Default port for the display board.
pub const DEFAULT_HTTP_PORT: u16 = 80;

const USER_AGENT: &str = concat!("netgauge/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("connect to {address} failed: {source}")]
    Connect {
        address: String,
        source: std::io::Error,
    },

    #[error("http handshake failed: {0}")]
    Handshake(#[source] hyper::Error),

    #[error("invalid request: {0}")]
    Request(#[from] http::Error),

    #[error("request failed: {0}")]
    Send(#[source] hyper::Error),

    #[error("no answer within {0:?}")]
    Timeout(Duration),
}

/// Append the default port when `address` carries none.
pub fn with_default_port(address: &str) -> String {
    let address = address.trim();
    if address.parse::<SocketAddr>().is_ok() {
        return address.to_string();
    }
    if let Ok(ip) = address.parse::<IpAddr>() {
        return SocketAddr::new(ip, DEFAULT_HTTP_PORT).to_string();
    }
    match address.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.parse::<u16>().is_ok() => {
            address.to_string()
        }
        _ => format!("{address}:{DEFAULT_HTTP_PORT}"),
    }
}

/// Issue `GET <path>` to `address`, bounded by `timeout` end to end.
///
/// Any response counts as delivered; the status is returned for logging.
/// Only transport failures and the timeout are errors.
pub async fn http_get(
    address: &str,
    path: &str,
    timeout: Duration,
) -> Result<StatusCode, DisplayError> {
    let authority = with_default_port(address);

    match tokio::time::timeout(timeout, get(&authority, path)).await {
        Ok(result) => result,
        Err(_) => {
            debug!(%authority, %path, "display request timed out");
            Err(DisplayError::Timeout(timeout))
        }
    }
}

async fn get(authority: &str, path: &str) -> Result<StatusCode, DisplayError> {
    let stream = tokio::net::TcpStream::connect(authority)
        .await
        .map_err(|source| DisplayError::Connect {
            address: authority.to_string(),
            source,
        })?;

    let io = hyper_util::rt::TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(DisplayError::Handshake)?;

    // Drive the connection in the background.
    tokio::spawn(async move {
        let _ = conn.await;
    });

    let req = http::Request::builder()
        .method("GET")
        .uri(path)
        .header("host", authority)
        .header("user-agent", USER_AGENT)
        .body(http_body_util::Empty::<bytes::Bytes>::new())?;

    let resp = sender.send_request(req).await.map_err(DisplayError::Send)?;
    let status = resp.status();
    if status.is_success() {
        debug!(%authority, %path, %status, "display request accepted");
    } else {
        debug!(%authority, %path, %status, "display answered with non-success status");
    }
    Ok(status)
}
