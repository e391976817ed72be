//! # Centauri - ELEGOO Centauri Carbon Control Library
//!
//! Centauri sends SDCP control commands to an ELEGOO Centauri Carbon 3D printer
//! over its local-network WebSocket API. It provides:
//!
//! - **Command catalog**: command keys mapped to SDCP codes and default payloads
//! - **Protocol implementation**: request envelopes and reply handling
//! - **Transport**: one-shot WebSocket sessions
//! - **Client**: resolve, send, await one reply, optionally clean it up
//!
//! ## Quick Start
//!
//! ```no_run
//! use centauri::{CommandCatalog, OutputMode, PrinterClient, SessionConfig};
//!
//! # async fn example() -> Result<(), centauri::CentauriError> {
//! let config = SessionConfig::new("192.168.1.50", "0a1b2c3d4e5f6a7b");
//! let client = PrinterClient::new(config, CommandCatalog::builtin()?);
//!
//! // Start printing /local/benchy.gcode
//! let reply = client.send("128", Some("benchy"), OutputMode::Clean).await?;
//! println!("{}", reply);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Request/reply exchange |
//! | [`protocol`] | Catalog, envelope and reply formats |
//! | [`transport`] | WebSocket sessions |
//! | [`printer`] | Session configuration |
//! | [`error`] | Error types |

pub mod client;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod transport;

// Re-exports for convenience
pub use client::PrinterClient;
pub use error::{CentauriError, LoadError};
pub use printer::SessionConfig;
pub use protocol::{CommandCatalog, CommandDefinition, OutputMode, ParameterSlot};
