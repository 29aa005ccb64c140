//! Positions inside a JSON tree that a single field value is read from or
//! written to.
//!
//! A [`Slot`] borrows one position for reading: a key of an object or an
//! index of an array. A [`SlotMut`] borrows one position for writing: a key of
//! an object, or the end of an array where each write appends. Neither owns
//! its container, and both live only for one field conversion.

use serde_json::{Map, Number, Value as JsonValue};

use crate::error::ConversionError;

/// Read access to one value inside a JSON object or array.
#[derive(Debug, Clone, Copy)]
pub enum Slot<'a> {
    Object {
        object: &'a Map<String, JsonValue>,
        key: &'a str,
    },
    Array {
        array: &'a [JsonValue],
        index: usize,
    },
}

impl<'a> Slot<'a> {
    pub fn object(object: &'a Map<String, JsonValue>, key: &'a str) -> Self {
        Slot::Object { object, key }
    }

    pub fn array(array: &'a [JsonValue], index: usize) -> Self {
        Slot::Array { array, index }
    }

    /// Whether the key is present, or the index is in bounds.
    pub fn has(&self) -> bool {
        self.get().is_some()
    }

    pub fn read_bool(&self) -> Result<bool, ConversionError> {
        match self.require()? {
            JsonValue::Bool(value) => Ok(*value),
            other => Err(mismatch("boolean", other)),
        }
    }

    pub fn read_number(&self) -> Result<&'a Number, ConversionError> {
        match self.require()? {
            JsonValue::Number(number) => Ok(number),
            other => Err(mismatch("number", other)),
        }
    }

    pub fn read_string(&self) -> Result<&'a str, ConversionError> {
        match self.require()? {
            JsonValue::String(value) => Ok(value),
            other => Err(mismatch("string", other)),
        }
    }

    pub fn read_object(&self) -> Result<&'a Map<String, JsonValue>, ConversionError> {
        match self.require()? {
            JsonValue::Object(object) => Ok(object),
            other => Err(mismatch("object", other)),
        }
    }

    pub fn read_array(&self) -> Result<&'a [JsonValue], ConversionError> {
        match self.require()? {
            JsonValue::Array(array) => Ok(array),
            other => Err(mismatch("array", other)),
        }
    }

    fn get(&self) -> Option<&'a JsonValue> {
        match *self {
            Slot::Object { object, key } => object.get(key),
            Slot::Array { array, index } => array.get(index),
        }
    }

    fn require(&self) -> Result<&'a JsonValue, ConversionError> {
        self.get()
            .ok_or_else(|| ConversionError::type_mismatch("expected a value, found nothing"))
    }
}

/// Write access to one position inside a JSON object or array.
///
/// Array slots never address an existing element: every write appends.
#[derive(Debug)]
pub enum SlotMut<'a> {
    Object {
        object: &'a mut Map<String, JsonValue>,
        key: &'a str,
    },
    Append(&'a mut Vec<JsonValue>),
}

impl<'a> SlotMut<'a> {
    pub fn object(object: &'a mut Map<String, JsonValue>, key: &'a str) -> Self {
        SlotMut::Object { object, key }
    }

    pub fn append(array: &'a mut Vec<JsonValue>) -> Self {
        SlotMut::Append(array)
    }

    pub fn write_bool(self, value: bool) {
        self.write_value(JsonValue::Bool(value));
    }

    pub fn write_number(self, value: impl Into<Number>) {
        self.write_value(JsonValue::Number(value.into()));
    }

    pub fn write_string(self, value: impl Into<String>) {
        self.write_value(JsonValue::String(value.into()));
    }

    /// Store an arbitrary JSON value, typically a nested object or array.
    pub fn write_value(self, value: JsonValue) {
        match self {
            SlotMut::Object { object, key } => {
                object.insert(key.to_string(), value);
            }
            SlotMut::Append(array) => array.push(value),
        }
    }
}

fn mismatch(expected: &str, found: &JsonValue) -> ConversionError {
    ConversionError::type_mismatch(format!("expected {expected}, found {}", json_type(found)))
}

/// Name of a JSON value's runtime type.
pub(crate) fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
