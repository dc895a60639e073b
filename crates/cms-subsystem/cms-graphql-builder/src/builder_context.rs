// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;

use async_graphql_parser::types::{FieldDefinition, TypeDefinition};
use cms_model::{
    catalog::ContentTypeCatalog,
    config::SchemaConfig,
    content_type::{Attribute, AttributeType, ContentTypeSchema, MEDIA_UID, RelationTarget},
    primitive_type::{PrimitiveType, ScalarKind},
};

use crate::{
    error::ModelBuildingError,
    resolver_spec::{FieldPath, ResolverSpec},
    type_registry::RegistryConfig,
};

/// Everything builders may consult. Passed explicitly to every builder function.
#[derive(Clone, Copy)]
pub struct BuilderContext<'a> {
    pub catalog: &'a ContentTypeCatalog,
    pub config: &'a SchemaConfig,
}

/// Where an attribute's target stands with respect to the generated schema
pub enum TargetState<'a> {
    Enabled(&'a ContentTypeSchema),
    /// Known to the catalog but switched off by configuration (or, for media, absent)
    Disabled,
}

impl<'a> BuilderContext<'a> {
    pub fn new(catalog: &'a ContentTypeCatalog, config: &'a SchemaConfig) -> Self {
        Self { catalog, config }
    }

    pub fn is_enabled(&self, uid: &str) -> bool {
        self.catalog.get(uid).is_some() && self.config.is_type_enabled(uid)
    }

    pub fn enabled_content_types(&self) -> impl Iterator<Item = &'a ContentTypeSchema> {
        let config = self.config;
        self.catalog
            .content_types()
            .filter(move |schema| config.is_type_enabled(&schema.uid))
    }

    pub fn enabled_components(&self) -> impl Iterator<Item = &'a ContentTypeSchema> {
        let config = self.config;
        self.catalog
            .components()
            .filter(move |schema| config.is_type_enabled(&schema.uid))
    }

    /// Attributes that appear on the output type
    pub fn output_attributes<'s>(
        &self,
        schema: &'s ContentTypeSchema,
    ) -> impl Iterator<Item = &'s Attribute> {
        schema
            .public_attributes()
            .filter(|attribute| self.config.is_output_enabled(&schema.uid, &attribute.name))
    }

    /// Attributes that appear on the mutation input type
    pub fn input_attributes<'s>(
        &self,
        schema: &'s ContentTypeSchema,
    ) -> impl Iterator<Item = &'s Attribute> {
        schema.public_attributes().filter(|attribute| {
            attribute.writable && self.config.is_input_enabled(&schema.uid, &attribute.name)
        })
    }

    /// Attributes that appear on the filters input type
    pub fn filter_attributes<'s>(
        &self,
        schema: &'s ContentTypeSchema,
    ) -> impl Iterator<Item = &'s Attribute> {
        schema
            .public_attributes()
            .filter(|attribute| self.config.is_filter_enabled(&schema.uid, &attribute.name))
    }

    /// Resolve the single target of a relation, media or component attribute.
    ///
    /// Unknown targets are fatal, except for media (the upload plugin may not be installed).
    pub fn target(
        &self,
        schema: &ContentTypeSchema,
        attribute: &Attribute,
    ) -> Result<TargetState<'a>, ModelBuildingError> {
        let unknown = |target: &str| match &attribute.typ {
            AttributeType::Component { .. } => ModelBuildingError::UnknownComponent {
                uid: schema.uid.clone(),
                attribute: attribute.name.clone(),
                component: target.to_string(),
            },
            _ => ModelBuildingError::UnknownContentType {
                uid: schema.uid.clone(),
                attribute: attribute.name.clone(),
                target: target.to_string(),
            },
        };

        let target_uid = match &attribute.typ {
            AttributeType::Media { .. } => MEDIA_UID,
            AttributeType::Component { component, .. } => component.as_str(),
            AttributeType::Relation {
                target: RelationTarget::ContentType(uid),
                ..
            } => uid.as_str(),
            _ => {
                return Err(ModelBuildingError::InvalidAttribute {
                    uid: schema.uid.clone(),
                    attribute: attribute.name.clone(),
                    message: "attribute has no single target".to_string(),
                });
            }
        };

        let target = match &attribute.typ {
            AttributeType::Component { .. } => self.catalog.component(target_uid),
            _ => self.catalog.content_type(target_uid),
        };

        match target {
            Some(target) if self.config.is_type_enabled(target_uid) => {
                Ok(TargetState::Enabled(target))
            }
            Some(_) => Ok(TargetState::Disabled),
            None if target_uid == MEDIA_UID => Ok(TargetState::Disabled),
            None => Err(unknown(target_uid)),
        }
    }

    /// Scalar exposed for a scalar attribute
    pub fn scalar_kind(
        &self,
        schema: &ContentTypeSchema,
        attribute: &Attribute,
        primitive_type: &PrimitiveType,
    ) -> Result<ScalarKind, ModelBuildingError> {
        primitive_type
            .scalar_kind()
            .ok_or_else(|| ModelBuildingError::MissingScalarMapping {
                uid: schema.uid.clone(),
                attribute: attribute.name.clone(),
                primitive_type: primitive_type.to_string(),
            })
    }
}

/// A field contributed to an object type, with how it resolves and who may read it
#[derive(Debug, Clone)]
pub struct BuiltField {
    pub definition: FieldDefinition,
    pub resolver: Option<ResolverSpec>,
    pub auth_scope: Option<String>,
}

impl BuiltField {
    pub fn plain(definition: FieldDefinition) -> Self {
        Self {
            definition,
            resolver: None,
            auth_scope: None,
        }
    }

    pub fn resolved(definition: FieldDefinition, resolver: ResolverSpec) -> Self {
        Self {
            definition,
            resolver: Some(resolver),
            auth_scope: None,
        }
    }

    pub fn with_auth_scope(self, scope: String) -> Self {
        Self {
            auth_scope: Some(scope),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        self.definition.name.node.as_str()
    }
}

/// Output of a builder: type descriptors plus the resolver and auth descriptors of their fields.
/// Fragments are combined by value and registered by the system builder.
#[derive(Debug, Default)]
pub struct SchemaFragment {
    pub types: Vec<(TypeDefinition, RegistryConfig)>,
    pub resolvers: Vec<(FieldPath, ResolverSpec)>,
    pub auth_scopes: Vec<(FieldPath, String)>,
}

impl SchemaFragment {
    pub fn with_type(mut self, definition: TypeDefinition, config: RegistryConfig) -> Self {
        self.types.push((definition, config));
        self
    }

    pub fn merge(mut self, other: SchemaFragment) -> Self {
        self.types.extend(other.types);
        self.resolvers.extend(other.resolvers);
        self.auth_scopes.extend(other.auth_scopes);
        self
    }

    /// Record the resolver and auth descriptors of `fields` under `type_name`, returning the
    /// field definitions to build the object type from.
    ///
    /// Field names must be unique within the type: a repeated name fails with
    /// `DuplicateName("<type>.<field>")`.
    pub fn with_fields(
        mut self,
        type_name: &str,
        fields: Vec<BuiltField>,
    ) -> Result<(Self, Vec<FieldDefinition>), ModelBuildingError> {
        let mut seen = HashSet::with_capacity(fields.len());
        let mut definitions = Vec::with_capacity(fields.len());
        for field in fields {
            if !seen.insert(field.name().to_string()) {
                return Err(ModelBuildingError::DuplicateName(format!(
                    "{type_name}.{}",
                    field.name()
                )));
            }
            let path = FieldPath::new(type_name, field.name());
            if let Some(resolver) = field.resolver {
                self.resolvers.push((path.clone(), resolver));
            }
            if let Some(scope) = field.auth_scope {
                self.auth_scopes.push((path, scope));
            }
            definitions.push(field.definition);
        }
        Ok((self, definitions))
    }
}
