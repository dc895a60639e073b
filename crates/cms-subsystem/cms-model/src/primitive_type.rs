// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The storage-level type of a scalar attribute as declared in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Id,
    String,
    Text,
    RichText,
    Blocks,
    Email,
    Password,
    Uid,
    Integer,
    BigInteger,
    Float,
    Decimal,
    Date,
    Time,
    DateTime,
    Timestamp,
    Boolean,
    Json,
    /// A type name we know nothing about (for example, a plugin-provided custom field).
    /// Building fails if such a type reaches the scalar table.
    Custom(String),
}

impl PrimitiveType {
    pub fn from_catalog_name(name: &str) -> PrimitiveType {
        match name {
            "id" => PrimitiveType::Id,
            "string" => PrimitiveType::String,
            "text" => PrimitiveType::Text,
            "richtext" => PrimitiveType::RichText,
            "blocks" => PrimitiveType::Blocks,
            "email" => PrimitiveType::Email,
            "password" => PrimitiveType::Password,
            "uid" => PrimitiveType::Uid,
            "integer" => PrimitiveType::Integer,
            "biginteger" => PrimitiveType::BigInteger,
            "float" => PrimitiveType::Float,
            "decimal" => PrimitiveType::Decimal,
            "date" => PrimitiveType::Date,
            "time" => PrimitiveType::Time,
            "datetime" => PrimitiveType::DateTime,
            "timestamp" => PrimitiveType::Timestamp,
            "boolean" => PrimitiveType::Boolean,
            "json" => PrimitiveType::Json,
            other => PrimitiveType::Custom(other.to_string()),
        }
    }

    pub fn catalog_name(&self) -> &str {
        match self {
            PrimitiveType::Id => "id",
            PrimitiveType::String => "string",
            PrimitiveType::Text => "text",
            PrimitiveType::RichText => "richtext",
            PrimitiveType::Blocks => "blocks",
            PrimitiveType::Email => "email",
            PrimitiveType::Password => "password",
            PrimitiveType::Uid => "uid",
            PrimitiveType::Integer => "integer",
            PrimitiveType::BigInteger => "biginteger",
            PrimitiveType::Float => "float",
            PrimitiveType::Decimal => "decimal",
            PrimitiveType::Date => "date",
            PrimitiveType::Time => "time",
            PrimitiveType::DateTime => "datetime",
            PrimitiveType::Timestamp => "timestamp",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Json => "json",
            PrimitiveType::Custom(name) => name,
        }
    }

    /// Look up the protocol scalar for this type in the association table.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        SCALAR_ASSOCIATIONS
            .iter()
            .find(|(catalog_name, _)| *catalog_name == self.catalog_name())
            .map(|(_, kind)| *kind)
    }
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.catalog_name())
    }
}

/// Scalars exposed through the GraphQL schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Id,
    String,
    Int,
    Long,
    Float,
    Boolean,
    Date,
    Time,
    DateTime,
    Json,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 10] = [
        ScalarKind::Id,
        ScalarKind::String,
        ScalarKind::Int,
        ScalarKind::Long,
        ScalarKind::Float,
        ScalarKind::Boolean,
        ScalarKind::Date,
        ScalarKind::Time,
        ScalarKind::DateTime,
        ScalarKind::Json,
    ];

    /// Name of the scalar in the schema (such as `Int` or `DateTime`)
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Id => "ID",
            ScalarKind::String => "String",
            ScalarKind::Int => "Int",
            ScalarKind::Long => "Long",
            ScalarKind::Float => "Float",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::Date => "Date",
            ScalarKind::Time => "Time",
            ScalarKind::DateTime => "DateTime",
            ScalarKind::Json => "JSON",
        }
    }

    /// Scalars that GraphQL does not define and must be declared by the schema.
    pub fn is_custom(&self) -> bool {
        matches!(
            self,
            ScalarKind::Long
                | ScalarKind::Date
                | ScalarKind::Time
                | ScalarKind::DateTime
                | ScalarKind::Json
        )
    }

    pub fn from_name(name: &str) -> Option<ScalarKind> {
        ScalarKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Catalog type name -> schema scalar
const SCALAR_ASSOCIATIONS: &[(&str, ScalarKind)] = &[
    ("id", ScalarKind::Id),
    ("string", ScalarKind::String),
    ("text", ScalarKind::String),
    ("richtext", ScalarKind::String),
    ("blocks", ScalarKind::Json),
    ("email", ScalarKind::String),
    ("password", ScalarKind::String),
    ("uid", ScalarKind::String),
    ("integer", ScalarKind::Int),
    ("biginteger", ScalarKind::Long),
    ("float", ScalarKind::Float),
    ("decimal", ScalarKind::Float),
    ("date", ScalarKind::Date),
    ("time", ScalarKind::Time),
    ("datetime", ScalarKind::DateTime),
    ("timestamp", ScalarKind::DateTime),
    ("boolean", ScalarKind::Boolean),
    ("json", ScalarKind::Json),
];
