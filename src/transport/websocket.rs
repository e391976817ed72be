//! # WebSocket Transport
//!
//! One short-lived WebSocket session with the printer's SDCP endpoint
//! (`ws://<ip>/websocket`).
//!
//! ## Session Lifecycle
//!
//! ```text
//! connect ──► send ──► recv ──► close
//!    │                  │
//!    └─ refused/failed  └─ closed / timeout / malformed
//! ```
//!
//! The printer handles one request at a time, so a session carries exactly one
//! request and one reply. There is no pooling and no pipelining.
//!
//! ## Cancellation
//!
//! Dropping a [`WebSocketTransport`] (or a future holding one) drops the TCP
//! stream, which tears the session down without a closing handshake.

use std::io;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::CentauriError;

type Stream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// # WebSocket Printer Transport
///
/// ## Example
///
/// ```no_run
/// use centauri::transport::WebSocketTransport;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), centauri::CentauriError> {
/// let mut transport = WebSocketTransport::connect("ws://192.168.1.50/websocket").await?;
/// transport.send_text(r#"{"Id":"","Data":{}}"#).await?;
/// let reply = transport.recv_text(Some(Duration::from_secs(5))).await?;
/// transport.close().await;
/// # Ok(())
/// # }
/// ```
pub struct WebSocketTransport {
    stream: Stream,
    url: String,
}

impl WebSocketTransport {
    /// Open a session.
    ///
    /// ## Errors
    ///
    /// - [`CentauriError::ConnectionRefused`] if nothing listens at the address
    /// - [`CentauriError::ConnectionFailed`] for DNS, handshake or other I/O faults
    pub async fn connect(url: &str) -> Result<Self, CentauriError> {
        log::debug!("Connecting to {}", url);
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|e| connect_error(url, e))?;
        log::debug!("Connected to {}", url);

        Ok(Self {
            stream,
            url: url.to_string(),
        })
    }

    /// Send one text message.
    pub async fn send_text(&mut self, text: &str) -> Result<(), CentauriError> {
        log::debug!("-> {}", text);
        self.stream
            .send(Message::Text(text.to_string()))
            .await
            .map_err(|e| io_error(&self.url, e))
    }

    /// Wait for the next text message.
    ///
    /// Ping/Pong frames are skipped. Binary frames are accepted when they hold
    /// UTF-8. `timeout` of `None` waits indefinitely.
    ///
    /// ## Errors
    ///
    /// - [`CentauriError::ConnectionClosed`] if the printer closes the session
    /// - [`CentauriError::Timeout`] if nothing arrives in time
    /// - [`CentauriError::MalformedResponse`] for non-UTF-8 binary frames
    pub async fn recv_text(&mut self, timeout: Option<Duration>) -> Result<String, CentauriError> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.next_text())
                .await
                .map_err(|_| CentauriError::Timeout(limit))?,
            None => self.next_text().await,
        }
    }

    async fn next_text(&mut self) -> Result<String, CentauriError> {
        loop {
            let message = match self.stream.next().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => return Err(io_error(&self.url, e)),
                None => return Err(CentauriError::ConnectionClosed),
            };

            match message {
                Message::Text(text) => {
                    log::debug!("<- {}", text);
                    return Ok(text);
                }
                Message::Binary(bytes) => {
                    return String::from_utf8(bytes).map_err(|e| {
                        CentauriError::MalformedResponse(format!("binary reply is not UTF-8: {}", e))
                    });
                }
                Message::Close(frame) => {
                    log::debug!("Printer closed the session: {:?}", frame);
                    return Err(CentauriError::ConnectionClosed);
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }

    /// Close the session. Errors during the closing handshake are only logged.
    pub async fn close(mut self) {
        if let Err(e) = self.stream.close(None).await {
            log::debug!("Close handshake with {} failed: {}", self.url, e);
        }
    }
}

fn connect_error(url: &str, err: tungstenite::Error) -> CentauriError {
    match err {
        tungstenite::Error::Io(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
            CentauriError::ConnectionRefused {
                address: host_of(url).to_string(),
            }
        }
        other => CentauriError::ConnectionFailed {
            address: url.to_string(),
            message: other.to_string(),
        },
    }
}

/// `host[:port]` part of a `ws://` URL
fn host_of(url: &str) -> &str {
    let rest = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(url);
    rest.split('/').next().unwrap_or(rest)
}

fn io_error(url: &str, err: tungstenite::Error) -> CentauriError {
    match err {
        tungstenite::Error::ConnectionClosed
        | tungstenite::Error::AlreadyClosed
        | tungstenite::Error::Protocol(
            tungstenite::error::ProtocolError::ResetWithoutClosingHandshake,
        ) => CentauriError::ConnectionClosed,
        tungstenite::Error::Io(e)
            if matches!(
                e.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            ) =>
        {
            CentauriError::ConnectionClosed
        }
        other => CentauriError::ConnectionFailed {
            address: url.to_string(),
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refused_maps_to_refused() {
        let err = tungstenite::Error::Io(io::Error::from(io::ErrorKind::ConnectionRefused));
        let mapped = connect_error("ws://10.0.0.1/websocket", err);
        assert!(matches!(
            &mapped,
            CentauriError::ConnectionRefused { address } if address == "10.0.0.1"
        ));
        assert_eq!(
            mapped.to_string(),
            "Connection refused. Is the printer on at 10.0.0.1?"
        );
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("ws://10.0.0.1/websocket"), "10.0.0.1");
        assert_eq!(host_of("ws://127.0.0.1:8080/websocket"), "127.0.0.1:8080");
        assert_eq!(host_of("10.0.0.1"), "10.0.0.1");
    }

    #[test]
    fn test_other_connect_errors_are_failures() {
        let err = tungstenite::Error::Io(io::Error::from(io::ErrorKind::TimedOut));
        assert!(matches!(
            connect_error("ws://10.0.0.1/websocket", err),
            CentauriError::ConnectionFailed { .. }
        ));
    }

    #[test]
    fn test_reset_maps_to_closed() {
        let err = tungstenite::Error::Io(io::Error::from(io::ErrorKind::ConnectionReset));
        assert!(matches!(
            io_error("ws://10.0.0.1/websocket", err),
            CentauriError::ConnectionClosed
        ));
        assert!(matches!(
            io_error("ws://10.0.0.1/websocket", tungstenite::Error::ConnectionClosed),
            CentauriError::ConnectionClosed
        ));
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("ws://{}/websocket", addr);
        let err = WebSocketTransport::connect(&url).await.err().unwrap();
        assert!(matches!(
            err,
            CentauriError::ConnectionRefused { address } if address == addr.to_string()
        ));
    }
}
