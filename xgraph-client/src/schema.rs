//! Column types, frame schemas and identifier validation
//!
//! Everything here is checked locally, so malformed input never reaches the
//! network.

use crate::error::{ClientError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use xgraph_proto::{self as proto, UvalTypeEnum};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Data type of a frame column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Boolean,
    Int,
    Float,
    Date,
    Time,
    Datetime,
    Ipaddress,
    Text,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        self.to_proto().as_str_name()
    }

    pub fn to_proto(&self) -> UvalTypeEnum {
        match self {
            ColumnType::Boolean => UvalTypeEnum::Boolean,
            ColumnType::Int => UvalTypeEnum::Int,
            ColumnType::Float => UvalTypeEnum::Float,
            ColumnType::Date => UvalTypeEnum::Date,
            ColumnType::Time => UvalTypeEnum::Time,
            ColumnType::Datetime => UvalTypeEnum::Datetime,
            ColumnType::Ipaddress => UvalTypeEnum::Ipaddress,
            ColumnType::Text => UvalTypeEnum::Text,
        }
    }

    pub fn from_proto(value: UvalTypeEnum) -> Self {
        match value {
            UvalTypeEnum::Boolean => ColumnType::Boolean,
            UvalTypeEnum::Int => ColumnType::Int,
            UvalTypeEnum::Float => ColumnType::Float,
            UvalTypeEnum::Date => ColumnType::Date,
            UvalTypeEnum::Time => ColumnType::Time,
            UvalTypeEnum::Datetime => ColumnType::Datetime,
            UvalTypeEnum::Ipaddress => ColumnType::Ipaddress,
            UvalTypeEnum::Text => ColumnType::Text,
        }
    }

    /// Decode a wire type tag, rejecting values outside the closed set.
    pub fn from_wire(value: i32) -> Result<Self> {
        UvalTypeEnum::try_from(value)
            .map(Self::from_proto)
            .map_err(|_| ClientError::Value(format!("Unknown column type tag from server: {}", value)))
    }
}

impl FromStr for ColumnType {
    type Err = ClientError;

    /// Accepts the wire names in any letter case (`"INT"`, `"int"`).
    fn from_str(s: &str) -> Result<Self> {
        UvalTypeEnum::from_str_name(&s.to_ascii_uppercase())
            .map(Self::from_proto)
            .ok_or_else(|| ClientError::Type(format!("Unknown column type: {}", s)))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

impl<N: Into<String>> From<(N, ColumnType)> for Column {
    fn from((name, column_type): (N, ColumnType)) -> Self {
        Column::new(name, column_type)
    }
}

/// Ordered, non-empty list of uniquely named columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSchema {
    columns: Vec<Column>,
}

impl FrameSchema {
    /// Build a schema, validating every column name and rejecting duplicates.
    pub fn new<I, C>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>,
    {
        let columns: Vec<Column> = columns.into_iter().map(Into::into).collect();

        if columns.is_empty() {
            return Err(ClientError::Value("A schema needs at least one column".to_string()));
        }

        let mut seen = HashSet::new();
        for column in &columns {
            validate_column_name(&column.name)?;
            if !seen.insert(column.name.as_str()) {
                return Err(ClientError::Name(format!(
                    "Duplicate column name in schema: {}",
                    column.name
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Build a schema from `(name, type name)` pairs such as `("id", "int")`.
    pub fn from_type_names<I, N, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: AsRef<str>,
    {
        let columns = pairs
            .into_iter()
            .map(|(name, type_name)| Ok(Column::new(name, type_name.as_ref().parse()?)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Encode as wire properties, assigning each column its role.
    pub(crate) fn to_proto(&self, role_of: impl Fn(&str) -> proto::RoleEnum) -> proto::Schema {
        proto::Schema {
            property: self
                .columns
                .iter()
                .map(|column| proto::Property {
                    name: column.name.clone(),
                    data_type: column.column_type.to_proto() as i32,
                    role: role_of(&column.name) as i32,
                })
                .collect(),
        }
    }

    /// Decode a schema sent by the server.
    pub(crate) fn from_proto(schema: Option<&proto::Schema>) -> Result<Self> {
        let properties = schema.map(|s| s.property.as_slice()).unwrap_or_default();
        let columns = properties
            .iter()
            .map(|p| Ok(Column::new(p.name.clone(), ColumnType::from_wire(p.data_type)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { columns })
    }
}

impl IntoIterator for FrameSchema {
    type Item = Column;
    type IntoIter = std::vec::IntoIter<Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

impl<'a> IntoIterator for &'a FrameSchema {
    type Item = Column;
    type IntoIter = std::iter::Cloned<std::slice::Iter<'a, Column>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter().cloned()
    }
}

/// Check a frame name and return it owned.
pub fn validate_frame_name(name: &str) -> Result<String> {
    validate_identifier("frame", name)
}

/// Check a column name and return it owned.
pub fn validate_column_name(name: &str) -> Result<String> {
    validate_identifier("column", name)
}

fn validate_identifier(what: &str, name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(ClientError::Name(format!("The {} name must not be empty", what)));
    }

    if !IDENTIFIER.is_match(name) {
        return Err(ClientError::Name(format!(
            "Invalid {} name \"{}\": use letters, digits and underscores, not starting with a digit",
            what, name
        )));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_parsing() {
        assert_eq!("int".parse::<ColumnType>().unwrap(), ColumnType::Int);
        assert_eq!("TEXT".parse::<ColumnType>().unwrap(), ColumnType::Text);
        assert_eq!("IpAddress".parse::<ColumnType>().unwrap(), ColumnType::Ipaddress);
        assert!(matches!("varchar".parse::<ColumnType>(), Err(ClientError::Type(_))));
    }

    #[test]
    fn test_column_type_wire_tags() {
        assert_eq!(ColumnType::from_wire(UvalTypeEnum::Datetime as i32).unwrap(), ColumnType::Datetime);
        assert!(ColumnType::from_wire(42).is_err());
        assert_eq!(ColumnType::Float.to_string(), "FLOAT");
    }

    #[test]
    fn test_schema_preserves_order() {
        let schema = FrameSchema::new(vec![
            ("id", ColumnType::Int),
            ("name", ColumnType::Text),
            ("joined", ColumnType::Date),
        ])
        .unwrap();

        let names: Vec<&str> = schema.names().collect();
        assert_eq!(names, vec!["id", "name", "joined"]);
        assert!(schema.contains("name"));
        assert!(!schema.contains("age"));
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        let err = FrameSchema::new(vec![("id", ColumnType::Int), ("id", ColumnType::Text)]).unwrap_err();
        assert!(matches!(err, ClientError::Name(_)));
    }

    #[test]
    fn test_schema_rejects_empty() {
        let err = FrameSchema::new(Vec::<Column>::new()).unwrap_err();
        assert!(matches!(err, ClientError::Value(_)));
    }

    #[test]
    fn test_schema_from_type_names() {
        let schema = FrameSchema::from_type_names(vec![("id", "int"), ("ip", "ipaddress")]).unwrap();
        assert_eq!(schema.columns()[1].column_type, ColumnType::Ipaddress);

        let err = FrameSchema::from_type_names(vec![("id", "integer")]).unwrap_err();
        assert!(matches!(err, ClientError::Type(_)));
    }

    #[test]
    fn test_identifier_validation() {
        assert_eq!(validate_frame_name("Person").unwrap(), "Person");
        assert!(validate_frame_name("_tmp_1").is_ok());
        assert!(matches!(validate_frame_name(""), Err(ClientError::Name(_))));
        assert!(validate_frame_name("1st").is_err());
        assert!(validate_frame_name("a.b").is_err());
        assert!(validate_column_name("first name").is_err());
    }

    #[test]
    fn test_proto_round_trip_keeps_roles_out_of_schema() {
        let schema = FrameSchema::new(vec![("id", ColumnType::Int), ("name", ColumnType::Text)]).unwrap();
        let wire = schema.to_proto(|name| {
            if name == "id" {
                proto::RoleEnum::VertexKey
            } else {
                proto::RoleEnum::Property
            }
        });

        assert_eq!(wire.property[0].role, proto::RoleEnum::VertexKey as i32);
        assert_eq!(FrameSchema::from_proto(Some(&wire)).unwrap(), schema);
    }
}
