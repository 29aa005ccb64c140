//! `protojson` converts between `serde_json` trees and protobuf messages whose
//! types are only known at runtime.
//!
//! The conversion walks the fields a [`MessageDescriptor`] declares and
//! dispatches on each field's [`Kind`](prost_reflect::Kind):
//!
//! - singular scalars are bare JSON values, and unset fields are omitted
//! - repeated fields are arrays, and empty ones are omitted
//! - map fields are arrays of `{"key": .., "value": ..}` objects ordered by key
//! - nested messages are nested objects
//! - `bytes` are lowercase hex strings
//! - enums are their symbol names
//! - 64-bit integers are JSON numbers
//!
//! JSON keys are the proto field names. Keys that name no field are ignored
//! when decoding. Group fields are rejected in both directions.
//!
//! Schemas come from [`prost_reflect::DescriptorPool`], which is re-exported.
//!
//! # Example
//!
//! ```rust
//! use prost_types::field_descriptor_proto::{Label, Type};
//! use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet};
//! use protojson::prost_reflect::DescriptorPool;
//! use serde_json::json;
//!
//! let field = |name: &str, number, label: Label, ty: Type| FieldDescriptorProto {
//!     name: Some(name.into()),
//!     number: Some(number),
//!     label: Some(label as i32),
//!     r#type: Some(ty as i32),
//!     ..Default::default()
//! };
//! let file = FileDescriptorProto {
//!     name: Some("demo.proto".into()),
//!     package: Some("demo".into()),
//!     message_type: vec![DescriptorProto {
//!         name: Some("Blob".into()),
//!         field: vec![
//!             field("data", 1, Label::Optional, Type::Bytes),
//!             field("tags", 2, Label::Repeated, Type::String),
//!         ],
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//! let pool = DescriptorPool::from_file_descriptor_set(FileDescriptorSet { file: vec![file] })?;
//!
//! let input = json!({"data": "0aff", "tags": ["a", "b"]});
//! let object = input.as_object().unwrap();
//! let message = protojson::decode_named(object, &pool, "demo.Blob")?;
//! assert_eq!(serde_json::Value::Object(protojson::encode(&message)?), input);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod config;
mod error;
mod message;
mod scalar;

pub mod hex;
pub mod slot;

pub use builder::MessageBuilder;
pub use config::{Config, DEFAULT_MAX_DEPTH};
pub use error::{ConversionError, ErrorKind};
pub use prost_reflect;

use std::borrow::Borrow;

use prost_reflect::{DescriptorPool, DynamicMessage, MessageDescriptor};
use serde_json::{Map, Value as JsonValue};

/// Decode `object` as a message of type `descriptor` with the default
/// [`Config`].
pub fn decode(
    object: &Map<String, JsonValue>,
    descriptor: &MessageDescriptor,
) -> Result<DynamicMessage, ConversionError> {
    Config::default().decode(object, descriptor)
}

/// Like [`decode`], but accepts any JSON value and fails unless it is an
/// object.
pub fn decode_value(
    value: &JsonValue,
    descriptor: &MessageDescriptor,
) -> Result<DynamicMessage, ConversionError> {
    Config::default().decode_value(value, descriptor)
}

/// Decode `object` as the message named `message_name` in `pool`.
///
/// An unknown name fails with [`ErrorKind::TypeMismatch`].
pub fn decode_named(
    object: &Map<String, JsonValue>,
    pool: &DescriptorPool,
    message_name: &str,
) -> Result<DynamicMessage, ConversionError> {
    Config::default().decode_named(object, pool, message_name)
}

/// Encode a message, or a builder still under construction, into a JSON
/// object with the default [`Config`].
pub fn encode<M>(message: &M) -> Result<Map<String, JsonValue>, ConversionError>
where
    M: Borrow<DynamicMessage> + ?Sized,
{
    Config::default().encode(message)
}
