//! Byte-stream transports to the editor.
//!
//! A [`Transport`] owns one duplex stream and a [`FrameDecoder`]. msgpack-RPC
//! has no framing of its own, so reads are accumulated until the decoder can
//! produce a whole message.


use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;
use treesync_protocol::{FrameDecoder, Message, encode};

use crate::address::Address;
use crate::error::{Error, Result};

const READ_CHUNK: usize = 16 * 1024;

/// Any bidirectional byte stream usable as a transport.
pub trait AsyncStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> AsyncStream for T {}

pub type BoxedStream = Box<dyn AsyncStream>;

/// Opens the raw stream for `address`.
///
/// Callers check [`Address::is_supported`] first; an unsupported address
/// yields [`io::ErrorKind::Unsupported`].
pub async fn open(address: &Address) -> io::Result<BoxedStream> {
	match address {
		#[cfg(unix)]
		Address::Unix(path) => {
			let stream = tokio::net::UnixStream::connect(path).await?;
			Ok(Box::new(stream))
		}
		Address::Tcp(endpoint) => {
			let stream = tokio::net::TcpStream::connect(endpoint.as_str()).await?;
			stream.set_nodelay(true)?;
			Ok(Box::new(stream))
		}
		#[cfg(windows)]
		Address::NamedPipe(name) => {
			let pipe = tokio::net::windows::named_pipe::ClientOptions::new().open(name)?;
			Ok(Box::new(pipe))
		}
		#[allow(unreachable_patterns)]
		other => Err(io::Error::new(
			io::ErrorKind::Unsupported,
			format!("{} transport is not available on this platform", other.transport_name()),
		)),
	}
}

/// Framed msgpack-RPC transport over a byte stream.
pub struct Transport {
	stream: BoxedStream,
	decoder: FrameDecoder,
}

impl Transport {
	pub fn new(stream: impl AsyncStream + 'static) -> Self {
		Self::from_boxed(Box::new(stream))
	}

	pub fn from_boxed(stream: BoxedStream) -> Self {
		Self {
			stream,
			decoder: FrameDecoder::new(),
		}
	}

	/// Writes one message and flushes it.
	pub async fn send(&mut self, message: &Message) -> Result<()> {
		let bytes = encode(message)?;
		trace!(bytes = bytes.len(), "writing frame");
		self.stream.write_all(&bytes).await?;
		self.stream.flush().await?;
		Ok(())
	}

	/// Reads until one complete message is available.
	///
	/// Returns [`Error::ConnectionClosed`] on EOF, including EOF in the middle
	/// of a partially received message.
	pub async fn recv(&mut self) -> Result<Message> {
		let mut chunk = vec![0u8; READ_CHUNK];
		loop {
			if let Some(message) = self.decoder.next_message()? {
				return Ok(message);
			}

			let read = self.stream.read(&mut chunk).await?;
			if read == 0 {
				if self.decoder.buffered() > 0 {
					trace!(pending = self.decoder.buffered(), "stream closed mid-frame");
				}
				return Err(Error::ConnectionClosed);
			}
			self.decoder.extend(&chunk[..read]);
		}
	}
}
