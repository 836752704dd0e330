//! Wire types for the Neovim msgpack-RPC protocol.
//!
//! Every message on the wire is a msgpack array whose first element tags its
//! type:
//!
//! ```text
//! [0, msgid, method, params]   request
//! [1, msgid, error, result]    response
//! [2, method, params]          notification
//! ```
//!
//! Messages are written back to back with no length prefix, so
//! [`FrameDecoder`] buffers partial reads until a complete value is available.
//!
//! # Main Types
//!
//! - [`Message`] - Discriminated union of the three message kinds
//! - [`RemoteError`] - Error payload carried by a failed [`Response`]
//! - [`FrameDecoder`] - Incremental decoder for a byte stream

mod codec;
mod error;
mod message;

pub use codec::{FrameDecoder, encode};
pub use error::{ProtocolError, Result};
pub use message::{Message, Notification, RemoteError, Request, Response};
