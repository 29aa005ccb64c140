//! Field walker: iterates a message's fields in both directions and hands
//! each value to the scalar dispatcher.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;

use prost_reflect::{DynamicMessage, FieldDescriptor, MapKey, Value};
use serde_json::{Map, Value as JsonValue};

use crate::builder::MessageBuilder;
use crate::config::Config;
use crate::error::ConversionError;
use crate::slot::{Slot, SlotMut};

/// State for one top-level conversion.
pub(crate) struct Walker<'c> {
    pub(crate) config: &'c Config,
    depth: usize,
}

impl<'c> Walker<'c> {
    pub(crate) fn new(config: &'c Config) -> Self {
        Self { config, depth: 0 }
    }

    /// Fill `builder` from `object` and finalize it.
    ///
    /// Keys that name no field are ignored.
    pub(crate) fn decode_message(
        &mut self,
        mut builder: MessageBuilder,
        object: &Map<String, JsonValue>,
    ) -> Result<DynamicMessage, ConversionError> {
        self.enter()?;
        let descriptor = builder.descriptor();
        for field in descriptor.fields() {
            self.decode_field(&mut builder, &field, object)
                .map_err(|err| err.at_field(field.name()))?;
        }
        self.depth -= 1;
        Ok(builder.finish())
    }

    fn decode_field(
        &mut self,
        builder: &mut MessageBuilder,
        field: &FieldDescriptor,
        object: &Map<String, JsonValue>,
    ) -> Result<(), ConversionError> {
        let slot = Slot::object(object, field.name());
        if !slot.has() {
            return Ok(());
        }
        tracing::trace!(field = field.name(), list = field.is_list(), "decode field");

        if field.is_map() {
            let entries = slot.read_array()?;
            let mut map = HashMap::with_capacity(entries.len());
            for index in 0..entries.len() {
                let (key, value) = self
                    .decode_entry(field, Slot::array(entries, index))
                    .map_err(|err| err.at_index(index))?;
                map.insert(key, value);
            }
            if !map.is_empty() {
                builder.set(field, Value::Map(map))?;
            }
        } else if field.is_list() {
            let elements = slot.read_array()?;
            for index in 0..elements.len() {
                self.decode_value(builder, field, Slot::array(elements, index))
                    .and_then(|value| builder.append(field, value))
                    .map_err(|err| err.at_index(index))?;
            }
        } else {
            let value = self.decode_value(builder, field, slot)?;
            builder.set(field, value)?;
        }
        Ok(())
    }

    /// Decode one `{"key": .., "value": ..}` object of a map field.
    fn decode_entry(
        &mut self,
        field: &FieldDescriptor,
        slot: Slot<'_>,
    ) -> Result<(MapKey, Value), ConversionError> {
        let object = slot.read_object()?;
        let kind = field.kind();
        let Some(entry) = kind.as_message() else {
            return Err(ConversionError::type_mismatch("map field without an entry type"));
        };
        let message = self.decode_message(MessageBuilder::new(entry.clone()), object)?;

        let key_field = entry.map_entry_key_field();
        let value_field = entry.map_entry_value_field();
        let key = map_key(message.get_field(&key_field).into_owned())?;
        let value = message.get_field(&value_field).into_owned();
        Ok((key, value))
    }

    /// Convert every populated field of `message` into a JSON object.
    pub(crate) fn encode_message<M>(
        &mut self,
        message: &M,
    ) -> Result<Map<String, JsonValue>, ConversionError>
    where
        M: Borrow<DynamicMessage> + ?Sized,
    {
        self.enter()?;
        let mut object = Map::new();
        let message: &DynamicMessage = message.borrow();
        for (field, value) in message.fields() {
            tracing::trace!(field = field.name(), list = field.is_list(), "encode field");
            self.encode_field(&field, value, &mut object)
                .map_err(|err| err.at_field(field.name()))?;
        }
        self.depth -= 1;
        Ok(object)
    }

    fn encode_field(
        &mut self,
        field: &FieldDescriptor,
        value: &Value,
        object: &mut Map<String, JsonValue>,
    ) -> Result<(), ConversionError> {
        let array = if field.is_map() {
            let entries = value.as_map().ok_or_else(|| {
                ConversionError::type_mismatch("map field holds a non-map value")
            })?;
            self.encode_entries(field, entries)?
        } else if field.is_list() {
            let elements = value.as_list().ok_or_else(|| {
                ConversionError::type_mismatch("repeated field holds a non-list value")
            })?;
            let mut array = Vec::with_capacity(elements.len());
            for (index, element) in elements.iter().enumerate() {
                self.encode_value(field, element, SlotMut::append(&mut array))
                    .map_err(|err| err.at_index(index))?;
            }
            array
        } else {
            return self.encode_value(field, value, SlotMut::object(object, field.name()));
        };
        SlotMut::object(object, field.name()).write_value(JsonValue::Array(array));
        Ok(())
    }

    /// Map entries become `{"key": .., "value": ..}` objects ordered by key.
    fn encode_entries(
        &mut self,
        field: &FieldDescriptor,
        entries: &HashMap<MapKey, Value>,
    ) -> Result<Vec<JsonValue>, ConversionError> {
        let kind = field.kind();
        let Some(entry) = kind.as_message() else {
            return Err(ConversionError::type_mismatch("map field without an entry type"));
        };
        let key_field = entry.map_entry_key_field();
        let value_field = entry.map_entry_value_field();

        let mut sorted: Vec<_> = entries.iter().collect();
        sorted.sort_by(|(a, _), (b, _)| compare_keys(a, b));

        let mut array = Vec::with_capacity(sorted.len());
        for (index, (key, value)) in sorted.into_iter().enumerate() {
            let mut object = Map::new();
            let slot = SlotMut::object(&mut object, key_field.name());
            self.encode_value(&key_field, &key_value(key), slot)
                .map_err(|err| err.at_field(key_field.name()).at_index(index))?;
            let slot = SlotMut::object(&mut object, value_field.name());
            self.encode_value(&value_field, value, slot)
                .map_err(|err| err.at_field(value_field.name()).at_index(index))?;
            array.push(JsonValue::Object(object));
        }
        Ok(array)
    }

    fn enter(&mut self) -> Result<(), ConversionError> {
        if self.depth > self.config.max_depth {
            return Err(ConversionError::type_mismatch("recursion limit exceeded"));
        }
        self.depth += 1;
        Ok(())
    }
}

fn map_key(value: Value) -> Result<MapKey, ConversionError> {
    match value {
        Value::Bool(v) => Ok(MapKey::Bool(v)),
        Value::I32(v) => Ok(MapKey::I32(v)),
        Value::I64(v) => Ok(MapKey::I64(v)),
        Value::U32(v) => Ok(MapKey::U32(v)),
        Value::U64(v) => Ok(MapKey::U64(v)),
        Value::String(v) => Ok(MapKey::String(v)),
        _ => Err(ConversionError::type_mismatch("map key must be an integer, bool or string")),
    }
}

fn key_value(key: &MapKey) -> Value {
    match key {
        MapKey::Bool(v) => Value::Bool(*v),
        MapKey::I32(v) => Value::I32(*v),
        MapKey::I64(v) => Value::I64(*v),
        MapKey::U32(v) => Value::U32(*v),
        MapKey::U64(v) => Value::U64(*v),
        MapKey::String(v) => Value::String(v.clone()),
    }
}

/// Keys of one map always share a variant.
fn compare_keys(a: &MapKey, b: &MapKey) -> Ordering {
    match (a, b) {
        (MapKey::Bool(a), MapKey::Bool(b)) => a.cmp(b),
        (MapKey::I32(a), MapKey::I32(b)) => a.cmp(b),
        (MapKey::I64(a), MapKey::I64(b)) => a.cmp(b),
        (MapKey::U32(a), MapKey::U32(b)) => a.cmp(b),
        (MapKey::U64(a), MapKey::U64(b)) => a.cmp(b),
        (MapKey::String(a), MapKey::String(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
