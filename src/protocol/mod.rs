//! # SDCP Protocol
//!
//! Message formats for the Smart Device Control Protocol spoken by ELEGOO
//! printers over their local WebSocket API.
//!
//! - [`catalog`]: command keys, codes and default payloads
//! - [`envelope`]: the request message
//! - [`response`]: reply handling and clean output

pub mod catalog;
pub mod envelope;
pub mod response;

pub use catalog::{CommandCatalog, CommandDefinition, ParameterSlot};
pub use envelope::{Envelope, RequestData, build_envelope};
pub use response::{OutputMode, clean_response};
