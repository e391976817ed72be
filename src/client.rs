//! # Printer Client
//!
//! Sends a single catalog command to the printer and returns its reply.
//!
//! ## Exchange
//!
//! ```text
//! Idle → Resolving → Connecting → Sending → AwaitingReply → Closing → Done
//!                        │                        │
//!                        └──────► Failed ◄────────┘
//! ```
//!
//! Nothing is retried. Each [`PrinterClient::send`] opens and closes its own
//! session, so concurrent sends from one client are independent.

use serde_json::Value;

use crate::error::CentauriError;
use crate::printer::SessionConfig;
use crate::protocol::catalog::CommandCatalog;
use crate::protocol::envelope::{Envelope, build_envelope};
use crate::protocol::response::{OutputMode, reply_request_id};
use crate::transport::WebSocketTransport;

/// Client bound to one printer and one command catalog.
///
/// ## Example
///
/// ```no_run
/// use centauri::{CommandCatalog, OutputMode, PrinterClient, SessionConfig};
///
/// # async fn example() -> Result<(), centauri::CentauriError> {
/// let client = PrinterClient::new(
///     SessionConfig::from_path("config.json")?,
///     CommandCatalog::builtin()?,
/// );
/// let files = client.send("258", None, OutputMode::Clean).await?;
/// println!("{}", files);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PrinterClient {
    config: SessionConfig,
    catalog: CommandCatalog,
}

impl PrinterClient {
    pub fn new(config: SessionConfig, catalog: CommandCatalog) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    /// Resolve a command and build its request envelope, without any I/O.
    ///
    /// ## Errors
    ///
    /// [`CentauriError::UnknownCommand`] if `command` isn't in the catalog.
    pub fn prepare(&self, command: &str, parameter: Option<&str>) -> Result<Envelope, CentauriError> {
        let definition = self.catalog.lookup(command)?;
        if definition.parameter.is_some() && parameter.is_none() {
            log::warn!(
                "Command {} expects a parameter but none was given; sending defaults",
                command
            );
        }
        let data = definition.payload(parameter);
        Ok(build_envelope(definition.code, data, &self.config.mainboard_id))
    }

    /// Send one command and wait for its reply.
    ///
    /// The session is closed before returning, whatever the outcome of the
    /// exchange.
    ///
    /// ## Errors
    ///
    /// - [`CentauriError::UnknownCommand`] before any connection is attempted
    /// - [`CentauriError::ConnectionRefused`] / [`CentauriError::ConnectionFailed`]
    /// - [`CentauriError::ConnectionClosed`] if the printer hangs up first
    /// - [`CentauriError::Timeout`] if the configured timeout expires
    /// - [`CentauriError::MalformedResponse`] if the reply isn't JSON
    /// - [`CentauriError::ResponseMismatch`] if the reply echoes another RequestID
    pub async fn send(
        &self,
        command: &str,
        parameter: Option<&str>,
        mode: OutputMode,
    ) -> Result<Value, CentauriError> {
        let envelope = self.prepare(command, parameter)?;
        let message = envelope
            .to_json()
            .map_err(|e| CentauriError::Io(e.into()))?;

        let url = self.config.websocket_url();
        let mut transport = WebSocketTransport::connect(&url).await?;
        log::info!(
            "Sending command {} (Cmd {}) to {}",
            command,
            envelope.data.cmd,
            url
        );

        let exchange = async {
            transport.send_text(&message).await?;
            transport.recv_text(self.config.timeout()).await
        }
        .await;
        transport.close().await;

        let reply = parse_reply(&exchange?)?;
        verify_request_id(&envelope, &reply)?;

        Ok(mode.apply(reply))
    }
}

fn parse_reply(text: &str) -> Result<Value, CentauriError> {
    serde_json::from_str(text).map_err(|e| CentauriError::MalformedResponse(e.to_string()))
}

fn verify_request_id(envelope: &Envelope, reply: &Value) -> Result<(), CentauriError> {
    match reply_request_id(reply) {
        Some(actual) if actual != envelope.request_id() => Err(CentauriError::ResponseMismatch {
            expected: envelope.request_id().to_string(),
            actual: actual.to_string(),
        }),
        _ => Ok(()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
