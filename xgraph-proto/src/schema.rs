//! Schema messages shared by every frame kind

/// Column data types understood by the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum UvalTypeEnum {
    Boolean = 0,
    Int = 1,
    Float = 2,
    Date = 3,
    Time = 4,
    Datetime = 5,
    Ipaddress = 6,
    Text = 7,
}

impl UvalTypeEnum {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            UvalTypeEnum::Boolean => "BOOLEAN",
            UvalTypeEnum::Int => "INT",
            UvalTypeEnum::Float => "FLOAT",
            UvalTypeEnum::Date => "DATE",
            UvalTypeEnum::Time => "TIME",
            UvalTypeEnum::Datetime => "DATETIME",
            UvalTypeEnum::Ipaddress => "IPADDRESS",
            UvalTypeEnum::Text => "TEXT",
        }
    }

    pub fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "BOOLEAN" => Some(Self::Boolean),
            "INT" => Some(Self::Int),
            "FLOAT" => Some(Self::Float),
            "DATE" => Some(Self::Date),
            "TIME" => Some(Self::Time),
            "DATETIME" => Some(Self::Datetime),
            "IPADDRESS" => Some(Self::Ipaddress),
            "TEXT" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Role a column plays inside its frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RoleEnum {
    Property = 0,
    VertexKey = 1,
    EdgeSourceKey = 2,
    EdgeTargetKey = 3,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Property {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(enumeration = "UvalTypeEnum", tag = "2")]
    pub data_type: i32,
    #[prost(enumeration = "RoleEnum", tag = "3")]
    pub role: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Schema {
    #[prost(message, repeated, tag = "1")]
    pub property: Vec<Property>,
}
