// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Files generated next to a schema: its SDL and TypeScript declarations of its types.

use std::path::Path;

use async_graphql_parser::types::{BaseType, Type, TypeKind};
use cms_graphql_builder::{
    ModelBuildingError,
    definition::{input_fields, object_fields},
    type_registry::TypeRegistry,
};
use cms_model::config::ArtifactsConfig;
use tracing::info;

/// Write the artifacts `config` asks for, if any
pub fn write_artifacts(
    config: &ArtifactsConfig,
    sdl: &str,
    registry: &TypeRegistry,
) -> Result<(), ModelBuildingError> {
    if !config.generate {
        return Ok(());
    }

    write(&config.schema_path(), sdl)?;
    write(&config.typegen_path(), &typescript_declarations(registry))
}

fn write(path: &Path, content: &str) -> Result<(), ModelBuildingError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ModelBuildingError::Generic(format!("Could not create {}: {e}", parent.display()))
        })?;
    }
    std::fs::write(path, content).map_err(|e| {
        ModelBuildingError::Generic(format!("Could not write {}: {e}", path.display()))
    })?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// One declaration per registered type, in registration order
pub fn typescript_declarations(registry: &TypeRegistry) -> String {
    let declarations: Vec<String> = registry
        .iter()
        .map(|entry| {
            let name = &entry.name;
            match &entry.definition.kind {
                TypeKind::Scalar => format!("export type {name} = {};", scalar_alias(name)),
                TypeKind::Enum(enum_type) => {
                    let values: Vec<String> = enum_type
                        .values
                        .iter()
                        .map(|value| format!("'{}'", value.node.value.node))
                        .collect();
                    format!("export type {name} = {};", values.join(" | "))
                }
                TypeKind::Union(union_type) => {
                    let members: Vec<&str> = union_type
                        .members
                        .iter()
                        .map(|member| member.node.as_str())
                        .collect();
                    format!("export type {name} = {};", members.join(" | "))
                }
                TypeKind::Object(_) | TypeKind::Interface(_) => interface(
                    name,
                    object_fields(&entry.definition)
                        .map(|field| (field.name.node.as_str(), &field.ty.node)),
                ),
                TypeKind::InputObject(_) => interface(
                    name,
                    input_fields(&entry.definition)
                        .map(|field| (field.name.node.as_str(), &field.ty.node)),
                ),
            }
        })
        .collect();

    format!("{}\n", declarations.join("\n\n"))
}

fn interface<'a>(name: &str, fields: impl Iterator<Item = (&'a str, &'a Type)>) -> String {
    let fields: String = fields
        .map(|(field_name, typ)| {
            let optional = if typ.nullable { "?" } else { "" };
            format!("  {field_name}{optional}: {};\n", typescript_type(typ))
        })
        .collect();
    format!("export interface {name} {{\n{fields}}}")
}

fn typescript_type(typ: &Type) -> String {
    let base = match &typ.base {
        BaseType::Named(name) => match name.as_str() {
            "String" | "ID" => "string".to_string(),
            "Int" | "Float" => "number".to_string(),
            "Boolean" => "boolean".to_string(),
            other => other.to_string(),
        },
        BaseType::List(inner) => format!("Array<{}>", typescript_type(inner)),
    };
    if typ.nullable {
        format!("{base} | null")
    } else {
        base
    }
}

fn scalar_alias(name: &str) -> &'static str {
    match name {
        "Long" => "string | number",
        "Date" | "Time" | "DateTime" => "string",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_graphql_builder::{
        definition::{
            enum_type, field, list_of, named, non_null, object_type, required, scalar_type,
            union_type,
        },
        type_registry::{RegistryConfig, RegistryKind},
    };
    use multiplatform_test::multiplatform_test;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        let config = || RegistryConfig::new(RegistryKind::Internal);
        registry.register(scalar_type("Long", None), config()).unwrap();
        registry
            .register(enum_type("ENUM_ARTICLE_STATE", ["draft_review", "approved"]), config())
            .unwrap();
        registry
            .register(
                object_type(
                    "Article",
                    vec![
                        field("documentId", non_null("ID"), vec![]),
                        field("title", named("String"), vec![]),
                        field("state", named("ENUM_ARTICLE_STATE"), vec![]),
                        field("tags", required(list_of(named("Tag"))), vec![]),
                    ],
                ),
                config(),
            )
            .unwrap();
        registry
            .register(object_type("Tag", vec![field("label", named("String"), vec![])]), config())
            .unwrap();
        registry
            .register(union_type("Highlight", ["Article", "Tag"]), config())
            .unwrap();
        registry
    }

    #[multiplatform_test]
    fn declarations_follow_registration_order() {
        insta::assert_snapshot!(typescript_declarations(&registry()), @r"
        export type Long = string | number;

        export type ENUM_ARTICLE_STATE = 'draft_review' | 'approved';

        export interface Article {
          documentId: string;
          title?: string | null;
          state?: ENUM_ARTICLE_STATE | null;
          tags: Array<Tag | null>;
        }

        export interface Tag {
          label?: string | null;
        }

        export type Highlight = Article | Tag;
        ");
    }

    #[test]
    fn writes_only_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("out").join("schema.graphql");
        let typegen = dir.path().join("out").join("types.d.ts");

        let mut config = ArtifactsConfig {
            generate: false,
            schema: Some(schema.clone()),
            typegen: Some(typegen.clone()),
        };
        write_artifacts(&config, "type Query { a: Int }", &registry()).unwrap();
        assert!(!schema.exists());

        config.generate = true;
        write_artifacts(&config, "type Query { a: Int }", &registry()).unwrap();
        assert_eq!("type Query { a: Int }", std::fs::read_to_string(&schema).unwrap());
        assert!(
            std::fs::read_to_string(&typegen)
                .unwrap()
                .contains("export interface Tag {")
        );
    }
}
