//! # Printer Transport Layer
//!
//! This module provides communication backends for talking to printers.
//!
//! ## Available Transports
//!
//! - [`websocket`]: SDCP over WebSocket, one request per session

pub mod websocket;

pub use websocket::WebSocketTransport;
