// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket definitions for node inputs/outputs.

use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a socket, unique within its node (e.g. `exec_in`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocketId(pub String);

impl SocketId {
    /// Create a socket ID from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SocketId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Socket direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocketDirection {
    /// Input socket
    Input,
    /// Output socket
    Output,
}

impl SocketDirection {
    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// Type tag carried by a socket.
///
/// Serialized as the lowercase tag (`"exec"`, `"float"`, ...). Unknown tags
/// round-trip through [`SocketType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SocketType {
    /// Execution flow
    Exec,
    /// Floating point value
    Float,
    /// Integer value
    Int,
    /// String value
    String,
    /// Boolean value
    Bool,
    /// 3D vector
    Vector3,
    /// Engine object reference
    Object,
    /// Any other tag
    Custom(String),
}

impl SocketType {
    /// The serialized tag
    pub fn tag(&self) -> &str {
        match self {
            Self::Exec => "exec",
            Self::Float => "float",
            Self::Int => "int",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Vector3 => "vector3",
            Self::Object => "object",
            Self::Custom(tag) => tag,
        }
    }

    /// Whether this is a control-flow tag
    pub fn is_exec(&self) -> bool {
        matches!(self, Self::Exec)
    }

    /// Wire and socket color for this tag
    pub fn color(&self) -> Color32 {
        match self {
            Self::Exec => Color32::from_rgb(0xFF, 0xD7, 0x00),
            Self::Bool => Color32::from_rgb(0xFF, 0x6B, 0x6B),
            Self::Int => Color32::from_rgb(0x4E, 0xCD, 0xC4),
            Self::Float => Color32::from_rgb(0x45, 0xB7, 0xD1),
            Self::String => Color32::from_rgb(0x96, 0xCE, 0xB4),
            Self::Vector3 => Color32::from_rgb(0xFF, 0xEA, 0xA7),
            Self::Object => Color32::from_rgb(0xDD, 0xA0, 0xDD),
            Self::Custom(_) => Color32::from_rgb(0x95, 0xA5, 0xA6),
        }
    }

    /// Check if a wire may carry this type into `other`.
    ///
    /// Tags must be identical; there are no implicit conversions.
    pub fn can_connect_to(&self, other: &SocketType) -> bool {
        (self.is_exec() && other.is_exec()) || self == other
    }
}

impl From<String> for SocketType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "exec" => Self::Exec,
            "float" => Self::Float,
            "int" => Self::Int,
            "string" => Self::String,
            "bool" => Self::Bool,
            "vector3" => Self::Vector3,
            "object" => Self::Object,
            _ => Self::Custom(tag),
        }
    }
}

impl From<SocketType> for String {
    fn from(ty: SocketType) -> Self {
        match ty {
            SocketType::Custom(tag) => tag,
            other => other.tag().to_string(),
        }
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A socket on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socket {
    /// Socket ID, unique within the node
    pub id: SocketId,
    /// Display name
    pub name: String,
    /// Type tag
    #[serde(rename = "type")]
    pub socket_type: SocketType,
    /// Socket direction
    pub direction: SocketDirection,
}

impl Socket {
    /// Create a new socket
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        socket_type: SocketType,
        direction: SocketDirection,
    ) -> Self {
        Self {
            id: SocketId::new(id),
            name: name.into(),
            socket_type,
            direction,
        }
    }

    /// Create a new input socket
    pub fn input(id: impl Into<String>, name: impl Into<String>, socket_type: SocketType) -> Self {
        Self::new(id, name, socket_type, SocketDirection::Input)
    }

    /// Create a new output socket
    pub fn output(id: impl Into<String>, name: impl Into<String>, socket_type: SocketType) -> Self {
        Self::new(id, name, socket_type, SocketDirection::Output)
    }

    /// Check if a wire from this socket into `target` is valid
    pub fn can_connect(&self, target: &Socket) -> bool {
        self.direction == SocketDirection::Output
            && target.direction == SocketDirection::Input
            && self.socket_type.can_connect_to(&target.socket_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip_through_json() {
        let json = serde_json::to_string(&SocketType::Vector3).unwrap();
        assert_eq!(json, "\"vector3\"");

        let custom: SocketType = serde_json::from_str("\"texture\"").unwrap();
        assert_eq!(custom, SocketType::Custom("texture".to_string()));
        assert_eq!(serde_json::to_string(&custom).unwrap(), "\"texture\"");
    }

    #[test]
    fn test_compatibility_requires_identical_tags() {
        assert!(SocketType::Exec.can_connect_to(&SocketType::Exec));
        assert!(SocketType::Float.can_connect_to(&SocketType::Float));
        assert!(!SocketType::Int.can_connect_to(&SocketType::Float));
        assert!(!SocketType::Exec.can_connect_to(&SocketType::Bool));
    }

    #[test]
    fn test_socket_direction_rule() {
        let out = Socket::output("value_out", "Value", SocketType::Float);
        let inp = Socket::input("a_in", "A", SocketType::Float);
        assert!(out.can_connect(&inp));
        assert!(!inp.can_connect(&out));
        assert!(!out.can_connect(&out));
    }

    #[test]
    fn test_colors_are_distinct_per_tag() {
        let tags = [
            SocketType::Exec,
            SocketType::Float,
            SocketType::Int,
            SocketType::String,
            SocketType::Bool,
            SocketType::Vector3,
            SocketType::Object,
        ];
        for (i, a) in tags.iter().enumerate() {
            for b in &tags[i + 1..] {
                assert_ne!(a.color(), b.color(), "{a} and {b} share a color");
            }
        }
    }
}
