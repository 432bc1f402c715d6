//! Frame catalog: create, get and drop vertex, edge and table frames
//!
//! Names, schemas and keys are validated before any request is built, so an
//! invalid argument never costs a round trip.

use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::frame::{Frame, FrameRef};
use crate::schema::{validate_column_name, validate_frame_name, Column, FrameSchema};
use crate::translate::check_response;
use crate::transport::Transport;
use tracing::{debug, info};
use xgraph_proto::{self as proto, RoleEnum};

impl<T: Transport> Connection<T> {
    /// Create a vertex frame whose vertices are identified by `key`.
    ///
    /// `key` must name one of the schema columns.
    pub async fn create_vertex_frame<I, C>(&mut self, name: &str, schema: I, key: &str) -> Result<Frame>
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>,
    {
        let name = validate_frame_name(name)?;
        let schema = FrameSchema::new(schema)?;
        let key = validate_column_name(key)?;
        require_column(&schema, &key, "vertex key")?;

        let request = self.session.stamp(proto::CreateVertexFrameRequest {
            expected_server_id: 0,
            vertex_type: Some(proto::VertexType {
                name: name.clone(),
                schema: Some(schema.to_proto(|column| {
                    if column == key {
                        RoleEnum::VertexKey
                    } else {
                        RoleEnum::Property
                    }
                })),
            }),
        });

        let response = check_response(self.transport.create_vertex_frame(request).await?)?;
        let data = response
            .vertex_type
            .into_iter()
            .next()
            .ok_or_else(|| missing_frame(&name))?;

        info!(frame = %name, key = %key, "Created vertex frame");
        Frame::from_vertex_proto(data)
    }

    /// Create an edge frame between two vertex frames.
    ///
    /// `source` and `target` may be frame handles or bare names; handles are
    /// resolved to their name. `source_key` and `target_key` must name schema
    /// columns.
    pub async fn create_edge_frame<'a, I, C>(
        &mut self,
        name: &str,
        schema: I,
        source: impl Into<FrameRef<'a>>,
        target: impl Into<FrameRef<'a>>,
        source_key: &str,
        target_key: &str,
    ) -> Result<Frame>
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>,
    {
        let name = validate_frame_name(name)?;
        let schema = FrameSchema::new(schema)?;
        let source_key = validate_column_name(source_key)?;
        let target_key = validate_column_name(target_key)?;
        require_column(&schema, &source_key, "source key")?;
        require_column(&schema, &target_key, "target key")?;
        let source = Into::<FrameRef<'a>>::into(source).resolve_vertex()?;
        let target = Into::<FrameRef<'a>>::into(target).resolve_vertex()?;

        let request = self.session.stamp(proto::CreateEdgeFrameRequest {
            expected_server_id: 0,
            edge_type: Some(proto::EdgeType {
                name: name.clone(),
                schema: Some(schema.to_proto(|column| {
                    if column == source_key {
                        RoleEnum::EdgeSourceKey
                    } else if column == target_key {
                        RoleEnum::EdgeTargetKey
                    } else {
                        RoleEnum::Property
                    }
                })),
                source_vertex: source.clone(),
                target_vertex: target.clone(),
                source_key: source_key.clone(),
                target_key: target_key.clone(),
            }),
        });

        let response = check_response(self.transport.create_edge_frame(request).await?)?;
        let data = response
            .edge_type
            .into_iter()
            .next()
            .ok_or_else(|| missing_frame(&name))?;

        info!(frame = %name, source = %source, target = %target, "Created edge frame");
        Frame::from_edge_proto(data)
    }

    /// Create a table frame.
    pub async fn create_table_frame<I, C>(&mut self, name: &str, schema: I) -> Result<Frame>
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>,
    {
        let name = validate_frame_name(name)?;
        let schema = FrameSchema::new(schema)?;

        let request = self.session.stamp(proto::CreateTableFrameRequest {
            expected_server_id: 0,
            table_type: Some(proto::TableType {
                name: name.clone(),
                schema: Some(schema.to_proto(|_| RoleEnum::Property)),
            }),
        });

        let response = check_response(self.transport.create_table_frame(request).await?)?;
        let data = response
            .table_type
            .into_iter()
            .next()
            .ok_or_else(|| missing_frame(&name))?;

        info!(frame = %name, "Created table frame");
        Frame::from_table_proto(data)
    }

    /// Vertex frames on the server.
    ///
    /// With `None`, every vertex frame the server knows about right now. With
    /// names, exactly those frames; an unknown name fails the whole call with
    /// the server's error.
    pub async fn get_vertex_frames(&mut self, names: Option<&[&str]>) -> Result<Vec<Frame>> {
        let request = self.session.stamp(proto::GetVertexFramesRequest {
            expected_server_id: 0,
            name: validated_names(names)?,
        });

        let response = check_response(self.transport.get_vertex_frames(request).await?)?;
        debug!(count = response.vertex_type.len(), "Fetched vertex frames");
        response
            .vertex_type
            .into_iter()
            .map(Frame::from_vertex_proto)
            .collect()
    }

    /// Edge frames on the server; see [`Connection::get_vertex_frames`].
    pub async fn get_edge_frames(&mut self, names: Option<&[&str]>) -> Result<Vec<Frame>> {
        let request = self.session.stamp(proto::GetEdgeFramesRequest {
            expected_server_id: 0,
            name: validated_names(names)?,
        });

        let response = check_response(self.transport.get_edge_frames(request).await?)?;
        debug!(count = response.edge_type.len(), "Fetched edge frames");
        response
            .edge_type
            .into_iter()
            .map(Frame::from_edge_proto)
            .collect()
    }

    /// Table frames on the server; see [`Connection::get_vertex_frames`].
    pub async fn get_table_frames(&mut self, names: Option<&[&str]>) -> Result<Vec<Frame>> {
        let request = self.session.stamp(proto::GetTableFramesRequest {
            expected_server_id: 0,
            name: validated_names(names)?,
        });

        let response = check_response(self.transport.get_table_frames(request).await?)?;
        debug!(count = response.table_type.len(), "Fetched table frames");
        response
            .table_type
            .into_iter()
            .map(Frame::from_table_proto)
            .collect()
    }

    pub async fn get_vertex_frame(&mut self, name: &str) -> Result<Frame> {
        let frames = self.get_vertex_frames(Some(&[name][..])).await?;
        first_frame(frames, name)
    }

    pub async fn get_edge_frame(&mut self, name: &str) -> Result<Frame> {
        let frames = self.get_edge_frames(Some(&[name][..])).await?;
        first_frame(frames, name)
    }

    pub async fn get_table_frame(&mut self, name: &str) -> Result<Frame> {
        let frames = self.get_table_frames(Some(&[name][..])).await?;
        first_frame(frames, name)
    }

    /// Drop a frame of any kind.
    ///
    /// Returns `true` if the frame existed and was removed, `false` if there
    /// was no such frame.
    pub async fn drop_frame<'a>(&mut self, frame: impl Into<FrameRef<'a>>) -> Result<bool> {
        let name = Into::<FrameRef<'a>>::into(frame).resolve()?;

        let request = self.session.stamp(proto::DeleteTypeRequest {
            expected_server_id: 0,
            name: name.clone(),
        });

        let response = check_response(self.transport.delete_type(request).await?)?;
        debug!(frame = %name, dropped = response.found_and_deleted, "Drop frame");
        Ok(response.found_and_deleted)
    }
}

fn require_column(schema: &FrameSchema, column: &str, role: &str) -> Result<()> {
    if schema.contains(column) {
        Ok(())
    } else {
        Err(ClientError::Name(format!(
            "The {} \"{}\" does not match any schema column name in this frame",
            role, column
        )))
    }
}

fn validated_names(names: Option<&[&str]>) -> Result<Vec<String>> {
    names
        .unwrap_or_default()
        .iter()
        .map(|name| validate_frame_name(name))
        .collect()
}

fn first_frame(frames: Vec<Frame>, name: &str) -> Result<Frame> {
    frames.into_iter().next().ok_or_else(|| missing_frame(name))
}

fn missing_frame(name: &str) -> ClientError {
    ClientError::InvalidPayload(format!("Server response carried no frame for {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    #[test]
    fn test_require_column() {
        let schema = FrameSchema::new(vec![("src", ColumnType::Int), ("dst", ColumnType::Int)]).unwrap();
        assert!(require_column(&schema, "src", "source key").is_ok());

        let err = require_column(&schema, "id", "vertex key").unwrap_err();
        assert!(matches!(err, ClientError::Name(_)));
        assert!(err.to_string().contains("vertex key \"id\""));
    }

    #[test]
    fn test_validated_names() {
        assert!(validated_names(None).unwrap().is_empty());
        assert_eq!(
            validated_names(Some(&["Person", "Company"][..])).unwrap(),
            vec!["Person".to_string(), "Company".to_string()]
        );
        assert!(validated_names(Some(&["Person", ""][..])).is_err());
    }
}
