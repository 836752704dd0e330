//! treesync runtime - editor transports, connection, and connect-with-retry
//!
//! This crate provides the low-level plumbing for talking to a running Neovim
//! instance over its `--listen` endpoint:
//!
//! - **Address**: Parsing socket paths, `host:port` pairs and named pipes
//! - **Transport**: Byte stream plus msgpack frame decoding
//! - **Connection**: Request/response correlation over one transport
//! - **Connector**: Bounded open-with-retry while the editor starts up
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   treesync   │  Session, backends, root resolution
//! └──────┬───────┘
//!        │ Connection::request
//! ┌──────▼───────┐
//! │   runtime    │  This crate
//! │  ┌────────┐  │
//! │  │ Conn   │  │  msgid correlation
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Trans  │  │  Unix socket / TCP / named pipe
//! │  └────────┘  │
//! └──────────────┘
//! ```

pub mod address;
pub mod connection;
pub mod connector;
pub mod error;
pub mod poll;
pub mod transport;

pub use address::Address;
pub use connection::Connection;
pub use connector::connect;
pub use error::{Error, Result};
pub use poll::PollPolicy;
pub use transport::{AsyncStream, BoxedStream, Transport};
