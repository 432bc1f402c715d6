//! Frame descriptors returned by the catalog
//!
//! A frame is a value: it holds no reference back to the connection that
//! produced it. Pass the connection explicitly to refresh one.

use crate::error::{ClientError, Result};
use crate::schema::{validate_frame_name, FrameSchema};
use serde::{Deserialize, Serialize};
use std::fmt;
use xgraph_proto::{self as proto, RoleEnum};

/// What a frame holds, with the kind-specific attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FrameKind {
    Vertex {
        key: String,
    },
    Edge {
        source: String,
        target: String,
        source_key: String,
        target_key: String,
    },
    Table,
}

/// A named, schema-typed frame on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    name: String,
    schema: FrameSchema,
    kind: FrameKind,
}

impl Frame {
    pub fn new(name: impl Into<String>, schema: FrameSchema, kind: FrameKind) -> Self {
        Self {
            name: name.into(),
            schema,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &FrameSchema {
        &self.schema
    }

    pub fn kind(&self) -> &FrameKind {
        &self.kind
    }

    pub fn is_vertex(&self) -> bool {
        matches!(self.kind, FrameKind::Vertex { .. })
    }

    pub fn is_edge(&self) -> bool {
        matches!(self.kind, FrameKind::Edge { .. })
    }

    pub fn is_table(&self) -> bool {
        matches!(self.kind, FrameKind::Table)
    }

    /// Vertex key column, for vertex frames
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            FrameKind::Vertex { key } => Some(key),
            _ => None,
        }
    }

    /// Source vertex frame name, for edge frames
    pub fn source(&self) -> Option<&str> {
        match &self.kind {
            FrameKind::Edge { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Target vertex frame name, for edge frames
    pub fn target(&self) -> Option<&str> {
        match &self.kind {
            FrameKind::Edge { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn source_key(&self) -> Option<&str> {
        match &self.kind {
            FrameKind::Edge { source_key, .. } => Some(source_key),
            _ => None,
        }
    }

    pub fn target_key(&self) -> Option<&str> {
        match &self.kind {
            FrameKind::Edge { target_key, .. } => Some(target_key),
            _ => None,
        }
    }

    // ========================================================================
    // Wire conversions
    // ========================================================================

    pub(crate) fn from_vertex_proto(data: proto::VertexType) -> Result<Self> {
        let schema = FrameSchema::from_proto(data.schema.as_ref())?;
        let key = data
            .schema
            .as_ref()
            .and_then(|s| {
                s.property
                    .iter()
                    .find(|p| p.role == RoleEnum::VertexKey as i32)
            })
            .map(|p| p.name.clone())
            .ok_or_else(|| {
                ClientError::InvalidPayload(format!("Vertex frame {} has no key column", data.name))
            })?;

        Ok(Self::new(data.name, schema, FrameKind::Vertex { key }))
    }

    pub(crate) fn from_edge_proto(data: proto::EdgeType) -> Result<Self> {
        let schema = FrameSchema::from_proto(data.schema.as_ref())?;
        Ok(Self::new(
            data.name,
            schema,
            FrameKind::Edge {
                source: data.source_vertex,
                target: data.target_vertex,
                source_key: data.source_key,
                target_key: data.target_key,
            },
        ))
    }

    pub(crate) fn from_table_proto(data: proto::TableType) -> Result<Self> {
        let schema = FrameSchema::from_proto(data.schema.as_ref())?;
        Ok(Self::new(data.name, schema, FrameKind::Table))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = self
            .schema
            .columns()
            .iter()
            .map(|c| format!("{}: {}", c.name, c.column_type))
            .collect();

        match &self.kind {
            FrameKind::Vertex { key } => {
                write!(f, "vertex {} [{}] key={}", self.name, columns.join(", "), key)
            }
            FrameKind::Edge {
                source,
                target,
                source_key,
                target_key,
            } => write!(
                f,
                "edge {} [{}] {}.{} -> {}.{}",
                self.name,
                columns.join(", "),
                source,
                source_key,
                target,
                target_key
            ),
            FrameKind::Table => write!(f, "table {} [{}]", self.name, columns.join(", ")),
        }
    }
}

/// A frame given either as a handle or by name
#[derive(Debug, Clone, Copy)]
pub enum FrameRef<'a> {
    Handle(&'a Frame),
    Name(&'a str),
}

impl<'a> FrameRef<'a> {
    /// Resolve to a frame name. Bare names are validated; handles are trusted.
    pub fn resolve(&self) -> Result<String> {
        match self {
            FrameRef::Handle(frame) => Ok(frame.name().to_string()),
            FrameRef::Name(name) => validate_frame_name(name),
        }
    }

    /// Resolve to the name of a vertex frame, rejecting non-vertex handles.
    pub fn resolve_vertex(&self) -> Result<String> {
        match self {
            FrameRef::Handle(frame) if !frame.is_vertex() => Err(ClientError::Type(format!(
                "Frame {} is not a vertex frame",
                frame.name()
            ))),
            _ => self.resolve(),
        }
    }
}

impl<'a> From<&'a Frame> for FrameRef<'a> {
    fn from(frame: &'a Frame) -> Self {
        FrameRef::Handle(frame)
    }
}

impl<'a> From<&'a str> for FrameRef<'a> {
    fn from(name: &'a str) -> Self {
        FrameRef::Name(name)
    }
}

impl<'a> From<&'a String> for FrameRef<'a> {
    fn from(name: &'a String) -> Self {
        FrameRef::Name(name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn person() -> Frame {
        let schema = FrameSchema::new(vec![("id", ColumnType::Int), ("name", ColumnType::Text)]).unwrap();
        Frame::new("Person", schema, FrameKind::Vertex { key: "id".to_string() })
    }

    #[test]
    fn test_kind_accessors() {
        let frame = person();
        assert!(frame.is_vertex());
        assert_eq!(frame.key(), Some("id"));
        assert_eq!(frame.source(), None);
        assert_eq!(frame.to_string(), "vertex Person [id: INT, name: TEXT] key=id");
    }

    #[test]
    fn test_frame_ref_resolution() {
        let frame = person();
        assert_eq!(FrameRef::from(&frame).resolve_vertex().unwrap(), "Person");
        assert_eq!(FrameRef::from("Company").resolve().unwrap(), "Company");
        assert!(matches!(FrameRef::from("bad name").resolve(), Err(ClientError::Name(_))));

        let table = Frame::new("Results", frame.schema().clone(), FrameKind::Table);
        assert!(matches!(
            FrameRef::from(&table).resolve_vertex(),
            Err(ClientError::Type(_))
        ));
        assert_eq!(FrameRef::from(&table).resolve().unwrap(), "Results");
    }

    #[test]
    fn test_vertex_key_recovered_from_role() {
        let frame = person();
        let wire = proto::VertexType {
            name: "Person".to_string(),
            schema: Some(frame.schema().to_proto(|name| {
                if name == "id" {
                    RoleEnum::VertexKey
                } else {
                    RoleEnum::Property
                }
            })),
        };

        assert_eq!(Frame::from_vertex_proto(wire).unwrap(), frame);
    }

    #[test]
    fn test_vertex_without_key_is_invalid_payload() {
        let wire = proto::VertexType {
            name: "Broken".to_string(),
            schema: None,
        };
        assert!(matches!(
            Frame::from_vertex_proto(wire),
            Err(ClientError::InvalidPayload(_))
        ));
    }
}
