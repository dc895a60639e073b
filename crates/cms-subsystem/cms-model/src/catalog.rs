// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Loading the content-type catalog.
//!
//! The catalog arrives as JSON (`{"contentTypes": [...], "components": [...]}`) in the shape
//! content management backends typically export. We deserialize into loose `*Ser` structs and
//! convert them into the strict model, adding the system attributes every record carries.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::content_type::{
    Attribute, AttributeType, ContentKind, ContentTypeInfo, ContentTypeSchema, ModelType,
    RelationKind, RelationTarget,
};
use crate::primitive_type::PrimitiveType;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog '{0}': {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Malformed catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate uid '{0}' in catalog")]
    DuplicateUid(String),

    #[error("'{uid}' uses '{name}' as both its singular and plural name")]
    AmbiguousName { uid: String, name: String },

    #[error("Invalid attribute '{attribute}' in '{uid}': {message}")]
    InvalidAttribute {
        uid: String,
        attribute: String,
        message: String,
    },
}

/// All content types and components known for one build pass.
#[derive(Debug, Clone, Default)]
pub struct ContentTypeCatalog {
    content_types: IndexMap<String, ContentTypeSchema>,
    components: IndexMap<String, ContentTypeSchema>,
}

impl ContentTypeCatalog {
    pub fn new(
        content_types: Vec<ContentTypeSchema>,
        components: Vec<ContentTypeSchema>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = ContentTypeCatalog::default();

        for schema in content_types.into_iter().chain(components) {
            if catalog.get(&schema.uid).is_some() {
                return Err(CatalogError::DuplicateUid(schema.uid));
            }
            let target = match schema.model_type {
                ModelType::ContentType => &mut catalog.content_types,
                ModelType::Component => &mut catalog.components,
            };
            target.insert(schema.uid.clone(), schema);
        }

        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: CatalogSer = serde_json::from_str(json)?;
        catalog.try_into()
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(path.display().to_string(), e))?;
        Self::from_json(&json)
    }

    pub fn get(&self, uid: &str) -> Option<&ContentTypeSchema> {
        self.content_types
            .get(uid)
            .or_else(|| self.components.get(uid))
    }

    pub fn content_type(&self, uid: &str) -> Option<&ContentTypeSchema> {
        self.content_types.get(uid)
    }

    pub fn component(&self, uid: &str) -> Option<&ContentTypeSchema> {
        self.components.get(uid)
    }

    pub fn content_types(&self) -> impl Iterator<Item = &ContentTypeSchema> {
        self.content_types.values()
    }

    pub fn components(&self) -> impl Iterator<Item = &ContentTypeSchema> {
        self.components.values()
    }

    /// Content types followed by components, in declaration order
    pub fn all(&self) -> impl Iterator<Item = &ContentTypeSchema> {
        self.content_types().chain(self.components())
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CatalogSer {
    #[serde(default)]
    content_types: Vec<SchemaSer>,
    #[serde(default)]
    components: Vec<SchemaSer>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SchemaSer {
    uid: String,
    kind: Option<String>,
    category: Option<String>,
    info: InfoSer,
    #[serde(default)]
    options: OptionsSer,
    #[serde(default)]
    attributes: IndexMap<String, AttributeSer>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct InfoSer {
    singular_name: String,
    plural_name: Option<String>,
    display_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct OptionsSer {
    #[serde(default)]
    draft_and_publish: bool,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AttributeSer {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(rename = "enum")]
    enum_values: Option<Vec<String>>,
    #[serde(default)]
    multiple: bool,
    component: Option<String>,
    #[serde(default)]
    repeatable: bool,
    components: Option<Vec<String>>,
    relation: Option<String>,
    target: Option<String>,
    morph_targets: Option<Vec<String>>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    required: bool,
    writable: Option<bool>,
}

impl TryFrom<CatalogSer> for ContentTypeCatalog {
    type Error = CatalogError;

    fn try_from(catalog: CatalogSer) -> Result<Self, Self::Error> {
        let content_types = catalog
            .content_types
            .into_iter()
            .map(|schema| schema.into_schema(ModelType::ContentType))
            .collect::<Result<Vec<_>, _>>()?;
        let components = catalog
            .components
            .into_iter()
            .map(|schema| schema.into_schema(ModelType::Component))
            .collect::<Result<Vec<_>, _>>()?;

        ContentTypeCatalog::new(content_types, components)
    }
}

impl SchemaSer {
    fn into_schema(self, model_type: ModelType) -> Result<ContentTypeSchema, CatalogError> {
        let SchemaSer {
            uid,
            kind,
            category,
            info,
            options,
            attributes,
        } = self;

        let kind = match (model_type, kind.as_deref()) {
            (ModelType::ContentType, Some("singleType")) => ContentKind::Single,
            (ModelType::ContentType, Some("collectionType") | None) | (ModelType::Component, _) => {
                ContentKind::Collection
            }
            (ModelType::ContentType, Some(other)) => {
                return Err(CatalogError::InvalidAttribute {
                    uid,
                    attribute: "kind".to_string(),
                    message: format!("unknown kind '{other}'"),
                });
            }
        };

        // Components are addressed as `<category>.<name>`; fall back to the uid prefix
        let category = match model_type {
            ModelType::Component => category.or_else(|| {
                uid.split_once('.')
                    .map(|(category, _)| category.to_string())
            }),
            ModelType::ContentType => None,
        };

        let plural_name = info
            .plural_name
            .unwrap_or_else(|| pluralize(&info.singular_name));

        // Find and findOne are named after the plural and singular forms
        if model_type == ModelType::ContentType
            && plural_name.eq_ignore_ascii_case(&info.singular_name)
        {
            return Err(CatalogError::AmbiguousName {
                uid,
                name: plural_name,
            });
        }

        let draft_and_publish = model_type == ModelType::ContentType && options.draft_and_publish;

        let mut declared = IndexMap::new();
        for (name, attribute) in attributes {
            let attribute = attribute.into_attribute(&uid, &name)?;
            declared.insert(name, attribute);
        }

        Ok(ContentTypeSchema {
            attributes: with_system_attributes(declared, model_type, draft_and_publish),
            uid,
            model_type,
            kind,
            category,
            info: ContentTypeInfo {
                singular_name: info.singular_name,
                plural_name,
                display_name: info.display_name,
            },
            draft_and_publish,
        })
    }
}

impl AttributeSer {
    fn into_attribute(self, uid: &str, name: &str) -> Result<Attribute, CatalogError> {
        let invalid = |message: &str| CatalogError::InvalidAttribute {
            uid: uid.to_string(),
            attribute: name.to_string(),
            message: message.to_string(),
        };

        let typ = match self.type_name.as_str() {
            "enumeration" => AttributeType::Enumeration(
                self.enum_values
                    .ok_or_else(|| invalid("enumeration without 'enum' values"))?,
            ),
            "media" => AttributeType::Media {
                multiple: self.multiple,
            },
            "component" => AttributeType::Component {
                component: self
                    .component
                    .ok_or_else(|| invalid("component without 'component' uid"))?,
                repeatable: self.repeatable,
            },
            "dynamiczone" => AttributeType::DynamicZone {
                components: self.components.unwrap_or_default(),
            },
            "relation" => {
                let relation_name = self
                    .relation
                    .ok_or_else(|| invalid("relation without 'relation' kind"))?;
                let relation = RelationKind::from_catalog_name(&relation_name)
                    .ok_or_else(|| invalid(&format!("unknown relation '{relation_name}'")))?;

                let target = if relation.is_morph() {
                    RelationTarget::Polymorphic(self.morph_targets)
                } else {
                    RelationTarget::ContentType(
                        self.target
                            .ok_or_else(|| invalid("relation without 'target'"))?,
                    )
                };

                AttributeType::Relation { relation, target }
            }
            other => AttributeType::Scalar(PrimitiveType::from_catalog_name(other)),
        };

        Ok(Attribute {
            name: name.to_string(),
            typ,
            private: self.private,
            required: self.required,
            writable: self.writable.unwrap_or(true),
        })
    }
}

fn system_attribute(name: &str, primitive_type: PrimitiveType) -> Attribute {
    Attribute {
        name: name.to_string(),
        typ: AttributeType::Scalar(primitive_type),
        private: false,
        required: false,
        writable: false,
    }
}

fn with_system_attributes(
    declared: IndexMap<String, Attribute>,
    model_type: ModelType,
    draft_and_publish: bool,
) -> IndexMap<String, Attribute> {
    let (leading, trailing) = match model_type {
        // Component ids are accepted in inputs to update an existing entry in place
        ModelType::Component => (
            vec![Attribute {
                required: true,
                writable: true,
                ..system_attribute("id", PrimitiveType::Id)
            }],
            vec![],
        ),
        ModelType::ContentType => {
            let mut trailing = vec![
                system_attribute("createdAt", PrimitiveType::DateTime),
                system_attribute("updatedAt", PrimitiveType::DateTime),
            ];
            if draft_and_publish {
                trailing.push(system_attribute("publishedAt", PrimitiveType::DateTime));
            }
            let document_id = Attribute {
                required: true,
                ..system_attribute("documentId", PrimitiveType::Id)
            };
            (vec![document_id], trailing)
        }
    };

    let mut attributes = IndexMap::new();
    for attribute in leading {
        if !declared.contains_key(&attribute.name) {
            attributes.insert(attribute.name.clone(), attribute);
        }
    }
    attributes.extend(declared);
    for attribute in trailing {
        if !attributes.contains_key(&attribute.name) {
            attributes.insert(attribute.name.clone(), attribute);
        }
    }
    attributes
}

fn pluralize(name: &str) -> String {
    let plural_name = pluralizer::pluralize(name, 2, false);
    if plural_name == name {
        // Plural and singular names must differ to derive distinct query names
        format!("{name}s")
    } else {
        plural_name
    }
}
