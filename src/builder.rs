//! Incremental construction of a [`DynamicMessage`].

use std::borrow::Borrow;

use prost_reflect::{DynamicMessage, FieldDescriptor, MessageDescriptor, ReflectMessage, Value};

use crate::error::ConversionError;

/// Mutable accumulator for one message, finalized once by [`finish`].
///
/// Every value is checked against the field's declared kind before it is
/// stored.
///
/// [`finish`]: MessageBuilder::finish
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    message: DynamicMessage,
}

impl MessageBuilder {
    /// An empty builder for `descriptor`.
    pub fn new(descriptor: MessageDescriptor) -> Self {
        Self {
            message: DynamicMessage::new(descriptor),
        }
    }

    /// Reopen a finished message.
    pub fn from_message(message: DynamicMessage) -> Self {
        Self { message }
    }

    pub fn descriptor(&self) -> MessageDescriptor {
        self.message.descriptor()
    }

    /// Set a singular field, or replace a repeated field with a
    /// [`Value::List`].
    pub fn set(&mut self, field: &FieldDescriptor, value: Value) -> Result<(), ConversionError> {
        self.check_owner(field)?;
        self.message.try_set_field(field, value)?;
        Ok(())
    }

    /// Append one element to a list field.
    pub fn append(&mut self, field: &FieldDescriptor, value: Value) -> Result<(), ConversionError> {
        self.check_owner(field)?;
        if !field.is_list() {
            return Err(ConversionError::type_mismatch(format!(
                "cannot append to non-list field '{}'",
                field.name()
            )));
        }

        let element = Value::List(vec![value]);
        if !element.is_valid_for_field(field) {
            return Err(ConversionError::type_mismatch(format!(
                "invalid element for list field '{}'",
                field.name()
            )));
        }
        if let (Value::List(items), Value::List(element)) =
            (self.message.get_field_mut(field), element)
        {
            items.extend(element);
        }
        Ok(())
    }

    /// A builder for the message type of `field`.
    ///
    /// For a populated singular field the builder starts from the current
    /// value, so storing the finished child merges into it.
    pub fn child_builder(&self, field: &FieldDescriptor) -> Result<MessageBuilder, ConversionError> {
        self.check_owner(field)?;
        let kind = field.kind();
        let Some(child) = kind.as_message() else {
            return Err(ConversionError::type_mismatch(format!(
                "field '{}' is not a message field",
                field.name()
            )));
        };

        if !field.is_list() && !field.is_map() && self.message.has_field(field) {
            if let Some(current) = self.message.get_field(field).as_message() {
                return Ok(MessageBuilder::from_message(current.clone()));
            }
        }
        Ok(MessageBuilder::new(child.clone()))
    }

    /// Finalize into an immutable message.
    pub fn finish(self) -> DynamicMessage {
        self.message
    }

    fn check_owner(&self, field: &FieldDescriptor) -> Result<(), ConversionError> {
        let descriptor = self.message.descriptor();
        if field.parent_message() != &descriptor {
            return Err(ConversionError::type_mismatch(format!(
                "field '{}' does not belong to message '{}'",
                field.full_name(),
                descriptor.full_name()
            )));
        }
        Ok(())
    }
}

impl Borrow<DynamicMessage> for MessageBuilder {
    fn borrow(&self) -> &DynamicMessage {
        &self.message
    }
}
