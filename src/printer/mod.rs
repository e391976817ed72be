//! # Printer Module
//!
//! This module provides printer-specific configuration.
//!
//! ## Modules
//!
//! - [`config`]: Network address and device identity of the printer

pub mod config;

pub use config::{DEFAULT_CONFIG_PATH, SessionConfig};
