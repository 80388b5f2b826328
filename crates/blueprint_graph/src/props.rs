// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node property schemas.
//!
//! Built-in node types carry a known property shape ([`NodeProps`] variants).
//! Nodes without a schema fall back to an open string-keyed map, whose
//! values may be any JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single property value.
///
/// Serialized untagged so the JSON `props` object stays a plain map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// String
    String(String),
    /// 3D vector
    Vector3([f64; 3]),
    /// Any other JSON (null, lists, nested objects); kept verbatim
    Json(serde_json::Value),
}

impl PropValue {
    /// Kind of this value
    pub fn kind(&self) -> PropKind {
        match self {
            Self::Bool(_) => PropKind::Bool,
            Self::Int(_) => PropKind::Int,
            Self::Float(_) => PropKind::Float,
            Self::String(_) => PropKind::String,
            Self::Vector3(_) => PropKind::Vector3,
            Self::Json(_) => PropKind::Json,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Kind of a property value, used by editors to pick a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropKind {
    /// Boolean
    Bool,
    /// Integer
    Int,
    /// Floating point
    Float,
    /// String
    String,
    /// 3D vector
    Vector3,
    /// Opaque JSON, not editable in place
    Json,
}

/// Property shape declared by a node definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropShape {
    /// No properties
    #[default]
    None,
    /// `message: string`
    Message,
    /// `duration: float`
    Duration,
    /// `value: float`
    FloatValue,
    /// `value: string`
    StringValue,
    /// `value: bool`
    BoolValue,
    /// `value: vector3`
    Vector3Value,
    /// `name: string`
    Variable,
    /// Schemaless, any keys
    Custom,
}

/// Property values of a node instance
#[derive(Debug, Clone, PartialEq)]
pub enum NodeProps {
    /// No properties
    None,
    /// Message to print
    Message {
        /// Message text
        message: String,
    },
    /// Delay duration in seconds
    Duration {
        /// Seconds
        duration: f64,
    },
    /// Float constant
    FloatValue {
        /// Value
        value: f64,
    },
    /// String constant
    StringValue {
        /// Value
        value: String,
    },
    /// Bool constant
    BoolValue {
        /// Value
        value: bool,
    },
    /// Vector3 constant
    Vector3Value {
        /// Value
        value: [f64; 3],
    },
    /// Variable reference
    Variable {
        /// Variable name
        name: String,
    },
    /// Schemaless properties
    Custom(IndexMap<String, PropValue>),
}

impl NodeProps {
    /// Default values for a shape
    pub fn defaults(shape: PropShape) -> Self {
        match shape {
            PropShape::None => Self::None,
            PropShape::Message => Self::Message { message: String::new() },
            PropShape::Duration => Self::Duration { duration: 1.0 },
            PropShape::FloatValue => Self::FloatValue { value: 0.0 },
            PropShape::StringValue => Self::StringValue { value: String::new() },
            PropShape::BoolValue => Self::BoolValue { value: false },
            PropShape::Vector3Value => Self::Vector3Value { value: [0.0; 3] },
            PropShape::Variable => Self::Variable { name: String::new() },
            PropShape::Custom => Self::Custom(IndexMap::new()),
        }
    }

    /// Build props of `shape` from a plain map, starting from the defaults.
    ///
    /// Keys the shape does not know are rejected.
    pub fn from_map(
        shape: PropShape,
        map: &IndexMap<String, PropValue>,
    ) -> Result<Self, PropertyError> {
        let mut props = Self::defaults(shape);
        props.apply_patch(map)?;
        Ok(props)
    }

    /// Shape of these props
    pub fn shape(&self) -> PropShape {
        match self {
            Self::None => PropShape::None,
            Self::Message { .. } => PropShape::Message,
            Self::Duration { .. } => PropShape::Duration,
            Self::FloatValue { .. } => PropShape::FloatValue,
            Self::StringValue { .. } => PropShape::StringValue,
            Self::BoolValue { .. } => PropShape::BoolValue,
            Self::Vector3Value { .. } => PropShape::Vector3Value,
            Self::Variable { .. } => PropShape::Variable,
            Self::Custom(_) => PropShape::Custom,
        }
    }

    /// Read a property
    pub fn get(&self, key: &str) -> Option<PropValue> {
        self.entries()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// All properties as `(key, value)` pairs in declaration order
    pub fn entries(&self) -> Vec<(String, PropValue)> {
        match self {
            Self::None => Vec::new(),
            Self::Message { message } => vec![("message".into(), PropValue::String(message.clone()))],
            Self::Duration { duration } => vec![("duration".into(), PropValue::Float(*duration))],
            Self::FloatValue { value } => vec![("value".into(), PropValue::Float(*value))],
            Self::StringValue { value } => vec![("value".into(), PropValue::String(value.clone()))],
            Self::BoolValue { value } => vec![("value".into(), PropValue::Bool(*value))],
            Self::Vector3Value { value } => vec![("value".into(), PropValue::Vector3(*value))],
            Self::Variable { name } => vec![("name".into(), PropValue::String(name.clone()))],
            Self::Custom(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    /// Properties as a plain map (the serialized form)
    pub fn to_map(&self) -> IndexMap<String, PropValue> {
        self.entries().into_iter().collect()
    }

    /// Apply a partial patch.
    ///
    /// Every key is validated before anything is written, so a rejected patch
    /// leaves the props untouched. Keys not named in the patch are preserved.
    pub fn apply_patch(&mut self, patch: &IndexMap<String, PropValue>) -> Result<(), PropertyError> {
        for (key, value) in patch {
            self.check(key, value)?;
        }
        for (key, value) in patch {
            self.write(key, value);
        }
        Ok(())
    }

    fn check(&self, key: &str, value: &PropValue) -> Result<(), PropertyError> {
        let expected = match (self, key) {
            (Self::Custom(_), _) => return Ok(()),
            (Self::Message { .. }, "message")
            | (Self::StringValue { .. }, "value")
            | (Self::Variable { .. }, "name") => PropKind::String,
            (Self::Duration { .. }, "duration") | (Self::FloatValue { .. }, "value") => {
                PropKind::Float
            }
            (Self::BoolValue { .. }, "value") => PropKind::Bool,
            (Self::Vector3Value { .. }, "value") => PropKind::Vector3,
            _ => return Err(PropertyError::UnknownProperty(key.to_string())),
        };

        let accepted = match expected {
            PropKind::Float => value.as_float().is_some(),
            other => value.kind() == other,
        };
        if accepted {
            Ok(())
        } else {
            Err(PropertyError::TypeMismatch {
                key: key.to_string(),
                expected,
                found: value.kind(),
            })
        }
    }

    fn write(&mut self, key: &str, value: &PropValue) {
        match self {
            Self::None => {}
            Self::Message { message } => {
                if let Some(s) = value.as_string() {
                    *message = s.to_string();
                }
            }
            Self::Duration { duration: v } | Self::FloatValue { value: v } => {
                if let Some(f) = value.as_float() {
                    *v = f;
                }
            }
            Self::StringValue { value: v } | Self::Variable { name: v } => {
                if let Some(s) = value.as_string() {
                    *v = s.to_string();
                }
            }
            Self::BoolValue { value: v } => {
                if let PropValue::Bool(b) = value {
                    *v = *b;
                }
            }
            Self::Vector3Value { value: v } => {
                if let PropValue::Vector3(vec) = value {
                    *v = *vec;
                }
            }
            Self::Custom(map) => {
                map.insert(key.to_string(), value.clone());
            }
        }
    }
}

/// Error when reading or patching node properties
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    /// The node's schema has no such key
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Value kind does not match the schema
    #[error("Property {key} expects {expected:?}, got {found:?}")]
    TypeMismatch {
        /// Property key
        key: String,
        /// Kind the schema declares
        expected: PropKind,
        /// Kind that was supplied
        found: PropKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(entries: &[(&str, PropValue)]) -> IndexMap<String, PropValue> {
        entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_patch_known_shape() {
        let mut props = NodeProps::defaults(PropShape::Message);
        props
            .apply_patch(&patch(&[("message", PropValue::String("hello".into()))]))
            .unwrap();
        assert_eq!(props.get("message"), Some(PropValue::String("hello".into())));
    }

    #[test]
    fn test_int_coerces_to_float() {
        let mut props = NodeProps::defaults(PropShape::Duration);
        props.apply_patch(&patch(&[("duration", PropValue::Int(3))])).unwrap();
        assert_eq!(props, NodeProps::Duration { duration: 3.0 });
    }

    #[test]
    fn test_rejected_patch_changes_nothing() {
        let mut props = NodeProps::Message { message: "keep".into() };
        let result = props.apply_patch(&patch(&[
            ("message", PropValue::String("changed".into())),
            ("volume", PropValue::Float(1.0)),
        ]));
        assert_eq!(result, Err(PropertyError::UnknownProperty("volume".into())));
        assert_eq!(props, NodeProps::Message { message: "keep".into() });
    }

    #[test]
    fn test_type_mismatch() {
        let mut props = NodeProps::defaults(PropShape::BoolValue);
        let err = props
            .apply_patch(&patch(&[("value", PropValue::String("yes".into()))]))
            .unwrap_err();
        assert!(matches!(err, PropertyError::TypeMismatch { expected: PropKind::Bool, .. }));
    }

    #[test]
    fn test_custom_patch_preserves_other_keys() {
        let mut props = NodeProps::Custom(patch(&[
            ("speed", PropValue::Float(2.0)),
            ("label", PropValue::String("a".into())),
        ]));
        props.apply_patch(&patch(&[("speed", PropValue::Float(4.0))])).unwrap();
        assert_eq!(props.get("speed"), Some(PropValue::Float(4.0)));
        assert_eq!(props.get("label"), Some(PropValue::String("a".into())));
    }

    #[test]
    fn test_untagged_json_values() {
        let map: IndexMap<String, PropValue> =
            serde_json::from_str(r#"{"a": true, "b": 2, "c": 2.5, "d": "x", "e": [1.0, 2.0, 3.0]}"#)
                .unwrap();
        assert_eq!(map["a"], PropValue::Bool(true));
        assert_eq!(map["b"], PropValue::Int(2));
        assert_eq!(map["c"], PropValue::Float(2.5));
        assert_eq!(map["d"], PropValue::String("x".into()));
        assert_eq!(map["e"], PropValue::Vector3([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_other_json_kept_verbatim() {
        let json = r#"{"target":null,"tags":["a","b"],"spawn":{"count":3},"pair":[1.0,2.0]}"#;
        let map: IndexMap<String, PropValue> = serde_json::from_str(json).unwrap();
        assert_eq!(map["target"], PropValue::Json(serde_json::Value::Null));
        assert_eq!(map["tags"].kind(), PropKind::Json);
        assert_eq!(map["spawn"], PropValue::Json(serde_json::json!({"count": 3})));
        assert_eq!(map["pair"], PropValue::Json(serde_json::json!([1.0, 2.0])));
        assert_eq!(serde_json::to_string(&map).unwrap(), json);
    }

    #[test]
    fn test_json_value_rejected_by_typed_shape() {
        let mut props = NodeProps::defaults(PropShape::Message);
        let err = props
            .apply_patch(&patch(&[("message", PropValue::Json(serde_json::Value::Null))]))
            .unwrap_err();
        assert!(matches!(err, PropertyError::TypeMismatch { found: PropKind::Json, .. }));
    }
}
