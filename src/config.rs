//! Conversion options.

use std::borrow::Borrow;

use prost_reflect::{DescriptorPool, DynamicMessage, MessageDescriptor, ReflectMessage};
use serde_json::{Map, Value as JsonValue};

use crate::builder::MessageBuilder;
use crate::error::ConversionError;
use crate::message::Walker;
use crate::slot::json_type;

/// Default limit on nested message levels.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Options for converting between JSON and messages.
///
/// The free functions [`decode`](crate::decode) and [`encode`](crate::encode)
/// use `Config::default()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Nested message levels allowed below the top-level message.
    pub(crate) max_depth: usize,

    /// Reject integers that do not fit the field's type exactly.
    pub(crate) strict_numbers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strict_numbers: false,
        }
    }
}

impl Config {
    /// Create a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how many levels of nested messages may appear below the
    /// top-level message. Deeper input fails with a type mismatch.
    pub fn max_depth(&mut self, depth: usize) -> &mut Self {
        self.max_depth = depth;
        self
    }

    /// When enabled, decoding an integer field fails unless the JSON number is
    /// a whole number inside the field's range, and a `float` field rejects
    /// finite numbers beyond the `f32` range. When disabled, numbers narrow
    /// like an `as` cast.
    pub fn strict_numbers(&mut self, strict: bool) -> &mut Self {
        self.strict_numbers = strict;
        self
    }

    /// Decode `object` as a message of type `descriptor`.
    pub fn decode(
        &self,
        object: &Map<String, JsonValue>,
        descriptor: &MessageDescriptor,
    ) -> Result<DynamicMessage, ConversionError> {
        let _span = tracing::debug_span!("decode", message = descriptor.full_name()).entered();
        Walker::new(self).decode_message(MessageBuilder::new(descriptor.clone()), object)
    }

    /// Decode any JSON value; only objects are accepted.
    pub fn decode_value(
        &self,
        value: &JsonValue,
        descriptor: &MessageDescriptor,
    ) -> Result<DynamicMessage, ConversionError> {
        match value {
            JsonValue::Object(object) => self.decode(object, descriptor),
            other => Err(ConversionError::type_mismatch(format!(
                "expected object, found {}",
                json_type(other)
            ))),
        }
    }

    /// Resolve `message_name` in `pool`, then decode `object` as that type.
    pub fn decode_named(
        &self,
        object: &Map<String, JsonValue>,
        pool: &DescriptorPool,
        message_name: &str,
    ) -> Result<DynamicMessage, ConversionError> {
        let descriptor = pool.get_message_by_name(message_name).ok_or_else(|| {
            ConversionError::type_mismatch(format!("unknown message type '{message_name}'"))
        })?;
        self.decode(object, &descriptor)
    }

    /// Encode the populated fields of a message or builder.
    pub fn encode<M>(&self, message: &M) -> Result<Map<String, JsonValue>, ConversionError>
    where
        M: Borrow<DynamicMessage> + ?Sized,
    {
        let message: &DynamicMessage = message.borrow();
        let descriptor = message.descriptor();
        let _span = tracing::debug_span!("encode", message = descriptor.full_name()).entered();
        Walker::new(self).encode_message(message)
    }
}
