use std::cell::Cell;
use std::fmt;
use std::io::{Cursor, ErrorKind};

use serde::de::{DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};

use crate::error::{ProtocolError, Result};
use crate::message::Message;

/// Serializes a message into its msgpack wire form.
pub fn encode(message: &Message) -> Result<Vec<u8>> {
	Ok(rmp_serde::to_vec(message)?)
}

/// Incremental decoder for a stream of concatenated msgpack values.
///
/// Feed raw bytes with [`extend`](Self::extend) and drain complete messages
/// with [`next_message`](Self::next_message). A value split across reads stays
/// buffered until the rest arrives.
#[derive(Debug, Default)]
pub struct FrameDecoder {
	buffer: Vec<u8>,
}

impl FrameDecoder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn extend(&mut self, bytes: &[u8]) {
		self.buffer.extend_from_slice(bytes);
	}

	/// Number of bytes received but not yet consumed by a decoded message.
	pub fn buffered(&self) -> usize {
		self.buffer.len()
	}

	/// Returns the next complete message, or `None` if more bytes are needed.
	///
	/// A complete frame that is not a usable message is consumed before its
	/// error is returned, so the following frames still decode.
	pub fn next_message(&mut self) -> Result<Option<Message>> {
		if self.buffer.is_empty() {
			return Ok(None);
		}

		let invalid_utf8 = Cell::new(false);
		let mut cursor = Cursor::new(self.buffer.as_slice());
		let decoded = {
			let mut de = rmp_serde::Deserializer::new(&mut cursor);
			LossyValue { invalid_utf8: &invalid_utf8 }.deserialize(&mut de)
		};

		match decoded {
			Ok(value) => {
				let consumed = cursor.position() as usize;
				self.buffer.drain(..consumed);
				let message = Message::from_value(value)?;
				if invalid_utf8.get() {
					let response_id = match message {
						Message::Response(response) => Some(response.id),
						_ => None,
					};
					return Err(ProtocolError::InvalidUtf8 { response_id });
				}
				Ok(Some(message))
			}
			Err(err) if is_incomplete(&err) => Ok(None),
			Err(err) => Err(err.into()),
		}
	}
}

/// Decodes any msgpack value into JSON, replacing invalid UTF-8 in strings
/// and noting that it did so.
///
/// rmp-serde hands a str whose bytes are not UTF-8 to `visit_bytes`, which
/// lets the whole frame be consumed instead of failing midway.
#[derive(Clone, Copy)]
struct LossyValue<'a> {
	invalid_utf8: &'a Cell<bool>,
}

impl LossyValue<'_> {
	fn text(self, bytes: &[u8]) -> Value {
		match std::str::from_utf8(bytes) {
			Ok(text) => Value::from(text),
			Err(_) => {
				self.invalid_utf8.set(true);
				Value::String(String::from_utf8_lossy(bytes).into_owned())
			}
		}
	}
}

impl<'de> DeserializeSeed<'de> for LossyValue<'_> {
	type Value = Value;

	fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Value, D::Error> {
		deserializer.deserialize_any(self)
	}
}

impl<'de> Visitor<'de> for LossyValue<'_> {
	type Value = Value;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("a msgpack value")
	}

	fn visit_bool<E>(self, v: bool) -> std::result::Result<Value, E> {
		Ok(Value::Bool(v))
	}

	fn visit_i64<E>(self, v: i64) -> std::result::Result<Value, E> {
		Ok(Value::from(v))
	}

	fn visit_u64<E>(self, v: u64) -> std::result::Result<Value, E> {
		Ok(Value::from(v))
	}

	fn visit_f64<E>(self, v: f64) -> std::result::Result<Value, E> {
		Ok(Number::from_f64(v).map_or(Value::Null, Value::Number))
	}

	fn visit_str<E>(self, v: &str) -> std::result::Result<Value, E> {
		Ok(Value::from(v))
	}

	fn visit_string<E>(self, v: String) -> std::result::Result<Value, E> {
		Ok(Value::String(v))
	}

	fn visit_bytes<E>(self, v: &[u8]) -> std::result::Result<Value, E> {
		Ok(self.text(v))
	}

	fn visit_none<E>(self) -> std::result::Result<Value, E> {
		Ok(Value::Null)
	}

	fn visit_unit<E>(self) -> std::result::Result<Value, E> {
		Ok(Value::Null)
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Value, D::Error> {
		self.deserialize(deserializer)
	}

	// Ext values (buffer, window and tabpage handles) arrive as a
	// `[tag, bytes]` pair whose payload is binary, never text.
	fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Value, D::Error> {
		let binary = Cell::new(false);
		LossyValue { invalid_utf8: &binary }.deserialize(deserializer)
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
		let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
		while let Some(item) = seq.next_element_seed(self)? {
			items.push(item);
		}
		Ok(Value::Array(items))
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Value, A::Error> {
		let mut object = Map::new();
		while let Some(key) = map.next_key_seed(self)? {
			let key = match key {
				Value::String(key) => key,
				other => other.to_string(),
			};
			object.insert(key, map.next_value_seed(self)?);
		}
		Ok(Value::Object(object))
	}
}

/// A truncated value surfaces as an EOF while reading a marker or payload.
fn is_incomplete(err: &rmp_serde::decode::Error) -> bool {
	use rmp_serde::decode::Error;

	match err {
		Error::InvalidMarkerRead(io) | Error::InvalidDataRead(io) => io.kind() == ErrorKind::UnexpectedEof,
		_ => false,
	}
}
