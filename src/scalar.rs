//! Per-kind conversion of a single field value through a slot.

use bytes::Bytes;
use prost_reflect::{FieldDescriptor, Kind, Value};
use serde_json::{Number, Value as JsonValue};

use crate::builder::MessageBuilder;
use crate::error::ConversionError;
use crate::hex::{decode_hex, encode_hex};
use crate::message::Walker;
use crate::slot::{Slot, SlotMut};

impl Walker<'_> {
    /// Read one value of `field`'s kind from `slot`.
    ///
    /// For repeated fields this reads a single element.
    pub(crate) fn decode_value(
        &mut self,
        builder: &MessageBuilder,
        field: &FieldDescriptor,
        slot: Slot<'_>,
    ) -> Result<Value, ConversionError> {
        if field.is_group() {
            return Err(unsupported_group());
        }
        let strict = self.config.strict_numbers;
        let value = match field.kind() {
            Kind::Bool => Value::Bool(slot.read_bool()?),
            Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => {
                Value::I32(integer(slot.read_number()?, strict)?)
            }
            Kind::Uint32 | Kind::Fixed32 => Value::U32(integer(slot.read_number()?, strict)?),
            Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => {
                Value::I64(integer(slot.read_number()?, strict)?)
            }
            Kind::Uint64 | Kind::Fixed64 => Value::U64(integer(slot.read_number()?, strict)?),
            Kind::Float => Value::F32(single(slot.read_number()?, strict)?),
            Kind::Double => Value::F64(float(slot.read_number()?)?),
            Kind::String => Value::String(slot.read_string()?.to_string()),
            Kind::Bytes => Value::Bytes(Bytes::from(decode_hex(slot.read_string()?)?)),
            Kind::Enum(enumeration) => {
                let name = slot.read_string()?;
                let symbol = enumeration.get_value_by_name(name).ok_or_else(|| {
                    ConversionError::type_mismatch(format!(
                        "unknown symbol '{name}' for enum {}",
                        enumeration.full_name()
                    ))
                })?;
                Value::EnumNumber(symbol.number())
            }
            Kind::Message(_) => {
                let object = slot.read_object()?;
                let child = builder.child_builder(field)?;
                Value::Message(self.decode_message(child, object)?)
            }
        };
        Ok(value)
    }

    /// Write one value of `field`'s kind into `slot`.
    pub(crate) fn encode_value(
        &mut self,
        field: &FieldDescriptor,
        value: &Value,
        slot: SlotMut<'_>,
    ) -> Result<(), ConversionError> {
        if field.is_group() {
            return Err(unsupported_group());
        }
        let kind = field.kind();
        match (&kind, value) {
            (Kind::Bool, Value::Bool(v)) => slot.write_bool(*v),
            (Kind::Int32 | Kind::Sint32 | Kind::Sfixed32, Value::I32(v)) => slot.write_number(*v),
            (Kind::Uint32 | Kind::Fixed32, Value::U32(v)) => slot.write_number(*v),
            (Kind::Int64 | Kind::Sint64 | Kind::Sfixed64, Value::I64(v)) => slot.write_number(*v),
            (Kind::Uint64 | Kind::Fixed64, Value::U64(v)) => slot.write_number(*v),
            (Kind::Float, Value::F32(v)) => slot.write_number(finite(f64::from(*v))?),
            (Kind::Double, Value::F64(v)) => slot.write_number(finite(*v)?),
            (Kind::String, Value::String(v)) => slot.write_string(v.as_str()),
            (Kind::Bytes, Value::Bytes(v)) => slot.write_string(encode_hex(v)),
            (Kind::Enum(enumeration), Value::EnumNumber(number)) => {
                let symbol = enumeration.get_value(*number).ok_or_else(|| {
                    ConversionError::type_mismatch(format!(
                        "enum {} has no symbol for number {number}",
                        enumeration.full_name()
                    ))
                })?;
                slot.write_string(symbol.name());
            }
            (Kind::Message(_), Value::Message(message)) => {
                let object = self.encode_message(message)?;
                slot.write_value(JsonValue::Object(object));
            }
            (kind, value) => {
                return Err(ConversionError::type_mismatch(format!(
                    "{} field holds a {} value",
                    kind_name(kind),
                    value_name(value)
                )));
            }
        }
        Ok(())
    }
}

fn unsupported_group() -> ConversionError {
    ConversionError::type_mismatch("group fields are not supported")
}

fn kind_name(kind: &Kind) -> &'static str {
    match kind {
        Kind::Double => "double",
        Kind::Float => "float",
        Kind::Int32 => "int32",
        Kind::Int64 => "int64",
        Kind::Uint32 => "uint32",
        Kind::Uint64 => "uint64",
        Kind::Sint32 => "sint32",
        Kind::Sint64 => "sint64",
        Kind::Fixed32 => "fixed32",
        Kind::Fixed64 => "fixed64",
        Kind::Sfixed32 => "sfixed32",
        Kind::Sfixed64 => "sfixed64",
        Kind::Bool => "bool",
        Kind::String => "string",
        Kind::Bytes => "bytes",
        Kind::Message(_) => "message",
        Kind::Enum(_) => "enum",
    }
}

fn value_name(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "bool",
        Value::I32(_) => "i32",
        Value::I64(_) => "i64",
        Value::U32(_) => "u32",
        Value::U64(_) => "u64",
        Value::F32(_) => "f32",
        Value::F64(_) => "f64",
        Value::String(_) => "string",
        Value::Bytes(_) => "bytes",
        Value::EnumNumber(_) => "enum",
        Value::Message(_) => "message",
        Value::List(_) => "list",
        Value::Map(_) => "map",
    }
}

/// Round a JSON number to the nearest `f32`.
///
/// In strict mode a finite number that overflows `f32` is rejected instead of
/// becoming an infinity.
fn single(number: &Number, strict: bool) -> Result<f32, ConversionError> {
    let value = float(number)?;
    let narrowed = value as f32;
    if strict && value.is_finite() && narrowed.is_infinite() {
        return Err(ConversionError::type_mismatch(format!(
            "{number} is out of range for f32"
        )));
    }
    Ok(narrowed)
}

fn float(number: &Number) -> Result<f64, ConversionError> {
    number
        .as_f64()
        .ok_or_else(|| ConversionError::type_mismatch(format!("number {number} is not representable")))
}

fn finite(value: f64) -> Result<Number, ConversionError> {
    Number::from_f64(value).ok_or_else(|| {
        ConversionError::type_mismatch(format!("{value} has no JSON representation"))
    })
}

/// Narrow a JSON number to an integer field type.
///
/// Lenient mode behaves like an `as` cast: integers wrap, fractions truncate
/// toward zero and saturate. Strict mode requires the number to be an integer
/// within the target range.
fn integer<T: Narrow>(number: &Number, strict: bool) -> Result<T, ConversionError> {
    let whole = number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from));

    match whole {
        Some(value) if strict => T::exact(value).ok_or_else(|| out_of_range::<T>(number)),
        Some(value) => Ok(T::wrap(value)),
        None => {
            let value = float(number)?;
            if !strict {
                Ok(T::saturate(value))
            } else if value.fract() != 0.0 {
                Err(ConversionError::type_mismatch(format!(
                    "{number} is not an integer"
                )))
            } else {
                T::exact(value as i128).ok_or_else(|| out_of_range::<T>(number))
            }
        }
    }
}

fn out_of_range<T: Narrow>(number: &Number) -> ConversionError {
    ConversionError::type_mismatch(format!("{number} is out of range for {}", T::NAME))
}

trait Narrow: Sized {
    const NAME: &'static str;

    fn wrap(value: i128) -> Self;
    fn saturate(value: f64) -> Self;
    fn exact(value: i128) -> Option<Self>;
}

macro_rules! impl_narrow {
    ($($ty:ty),*) => {
        $(
            impl Narrow for $ty {
                const NAME: &'static str = stringify!($ty);

                fn wrap(value: i128) -> Self {
                    value as $ty
                }

                fn saturate(value: f64) -> Self {
                    value as $ty
                }

                fn exact(value: i128) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }
            }
        )*
    };
}

impl_narrow!(i32, i64, u32, u64);
