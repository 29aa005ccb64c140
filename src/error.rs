//! Error types for protojson.

use std::fmt;

use prost_reflect::SetFieldError;

/// The cause of a [`ConversionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A JSON value has the wrong shape for the field's declared kind, or the
    /// message type cannot be converted at all.
    TypeMismatch,
    /// A bytes field holds a string that is not valid hex.
    MalformedEncoding,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch => write!(f, "type mismatch"),
            Self::MalformedEncoding => write!(f, "malformed encoding"),
        }
    }
}

/// Error returned by every conversion in this crate.
///
/// Any error aborts the whole conversion; no partial message or JSON object is
/// returned alongside it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}{}: {message}", display_path(.path))]
pub struct ConversionError {
    kind: ErrorKind,
    message: String,
    path: String,
}

impl ConversionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: String::new(),
        }
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, message)
    }

    pub fn malformed_encoding(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedEncoding, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Location of the failing value, e.g. `items[2].name`. Empty when the
    /// failure concerns the top-level object.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Prefix the path with a field name.
    pub(crate) fn at_field(mut self, name: &str) -> Self {
        if self.path.is_empty() || self.path.starts_with('[') {
            self.path.insert_str(0, name);
        } else {
            self.path.insert(0, '.');
            self.path.insert_str(0, name);
        }
        self
    }

    /// Prefix the path with an array index.
    pub(crate) fn at_index(mut self, index: usize) -> Self {
        let segment = format!("[{index}]");
        if !self.path.is_empty() && !self.path.starts_with('[') {
            self.path.insert(0, '.');
        }
        self.path.insert_str(0, &segment);
        self
    }
}

impl From<SetFieldError> for ConversionError {
    fn from(err: SetFieldError) -> Self {
        Self::type_mismatch(err.to_string())
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at `{path}`")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments_compose() {
        let err = ConversionError::type_mismatch("expected string, found number")
            .at_field("name")
            .at_index(2)
            .at_field("items")
            .at_field("order");
        assert_eq!(err.path(), "order.items[2].name");
        assert_eq!(
            err.to_string(),
            "type mismatch at `order.items[2].name`: expected string, found number"
        );
    }

    #[test]
    fn test_nested_indexes() {
        let err = ConversionError::malformed_encoding("bad").at_index(1).at_index(0);
        assert_eq!(err.path(), "[0][1]");

        let err = ConversionError::malformed_encoding("bad").at_index(3).at_field("blobs");
        assert_eq!(err.path(), "blobs[3]");
        assert_eq!(err.kind(), ErrorKind::MalformedEncoding);
    }

    #[test]
    fn test_display_without_path() {
        let err = ConversionError::type_mismatch("unknown message type 'x.Y'");
        assert_eq!(err.to_string(), "type mismatch: unknown message type 'x.Y'");
    }

    #[test]
    fn test_set_field_error_is_type_mismatch() {
        use prost_reflect::{DescriptorPool, DynamicMessage, Value};
        use prost_types::field_descriptor_proto::{Label, Type};
        use prost_types::{
            DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet,
        };

        let file = FileDescriptorProto {
            name: Some("clock.proto".into()),
            package: Some("clock".into()),
            message_type: vec![DescriptorProto {
                name: Some("Tick".into()),
                field: vec![FieldDescriptorProto {
                    name: Some("seconds".into()),
                    number: Some(1),
                    label: Some(Label::Optional as i32),
                    r#type: Some(Type::Int64 as i32),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let pool =
            DescriptorPool::from_file_descriptor_set(FileDescriptorSet { file: vec![file] }).unwrap();
        let descriptor = pool.get_message_by_name("clock.Tick").unwrap();
        let seconds = descriptor.get_field_by_name("seconds").unwrap();

        let mut message = DynamicMessage::new(descriptor);
        let err = message
            .try_set_field(&seconds, Value::String("soon".into()))
            .unwrap_err();
        let err = ConversionError::from(err);
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(err.path().is_empty());
    }
}
