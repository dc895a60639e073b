// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::content_type::{Attribute, AttributeType, RelationTarget};

/// The class that decides which type builder handles an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeClass {
    Scalar,
    Enumeration,
    Media,
    Component,
    DynamicZone,
    PolymorphicRelation,
    Relation,
}

impl AttributeClass {
    pub const ALL: [AttributeClass; 7] = [
        AttributeClass::Scalar,
        AttributeClass::Enumeration,
        AttributeClass::Media,
        AttributeClass::Component,
        AttributeClass::DynamicZone,
        AttributeClass::PolymorphicRelation,
        AttributeClass::Relation,
    ];

    pub fn matches(&self, attribute: &Attribute) -> bool {
        match self {
            AttributeClass::Scalar => is_scalar(attribute),
            AttributeClass::Enumeration => is_enumeration(attribute),
            AttributeClass::Media => is_media(attribute),
            AttributeClass::Component => is_component(attribute),
            AttributeClass::DynamicZone => is_dynamic_zone(attribute),
            AttributeClass::PolymorphicRelation => is_polymorphic_relation(attribute),
            AttributeClass::Relation => is_relation(attribute),
        }
    }
}

/// How an attribute takes part in filter inputs and filter arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    /// Operators over a scalar (`{title: {eq: "a"}}`)
    Operators,
    /// A filter over the target type (`{category: {name: {eq: "News"}}}`)
    Nested,
    Unfilterable,
}

impl AttributeClass {
    pub fn filter_shape(&self) -> FilterShape {
        match self {
            AttributeClass::Scalar | AttributeClass::Enumeration => FilterShape::Operators,
            AttributeClass::Relation | AttributeClass::Component => FilterShape::Nested,
            AttributeClass::Media
            | AttributeClass::DynamicZone
            | AttributeClass::PolymorphicRelation => FilterShape::Unfilterable,
        }
    }
}

pub fn classify(attribute: &Attribute) -> AttributeClass {
    match &attribute.typ {
        AttributeType::Scalar(_) => AttributeClass::Scalar,
        AttributeType::Enumeration(_) => AttributeClass::Enumeration,
        AttributeType::Media { .. } => AttributeClass::Media,
        AttributeType::Component { .. } => AttributeClass::Component,
        AttributeType::DynamicZone { .. } => AttributeClass::DynamicZone,
        AttributeType::Relation {
            target: RelationTarget::Polymorphic(_),
            ..
        } => AttributeClass::PolymorphicRelation,
        AttributeType::Relation { .. } => AttributeClass::Relation,
    }
}

pub fn is_scalar(attribute: &Attribute) -> bool {
    matches!(attribute.typ, AttributeType::Scalar(_))
}

pub fn is_enumeration(attribute: &Attribute) -> bool {
    matches!(attribute.typ, AttributeType::Enumeration(_))
}

pub fn is_media(attribute: &Attribute) -> bool {
    matches!(attribute.typ, AttributeType::Media { .. })
}

pub fn is_component(attribute: &Attribute) -> bool {
    matches!(attribute.typ, AttributeType::Component { .. })
}

pub fn is_dynamic_zone(attribute: &Attribute) -> bool {
    matches!(attribute.typ, AttributeType::DynamicZone { .. })
}

pub fn is_polymorphic_relation(attribute: &Attribute) -> bool {
    matches!(
        attribute.typ,
        AttributeType::Relation {
            target: RelationTarget::Polymorphic(_),
            ..
        }
    )
}

/// A relation with a single declared target
pub fn is_relation(attribute: &Attribute) -> bool {
    matches!(
        attribute.typ,
        AttributeType::Relation {
            target: RelationTarget::ContentType(_),
            ..
        }
    )
}

/// Attributes that hold ids of other records (relations and media)
pub fn is_association(attribute: &Attribute) -> bool {
    is_media(attribute) || is_relation(attribute) || is_polymorphic_relation(attribute)
}

#[cfg(test)]
mod tests {
    use multiplatform_test::multiplatform_test;

    use super::*;
    use crate::catalog::ContentTypeCatalog;

    const CATALOG: &str = r#"{
        "contentTypes": [
            {
                "uid": "api::article.article",
                "kind": "collectionType",
                "info": { "singularName": "article", "pluralName": "articles" },
                "attributes": {
                    "title": { "type": "string" },
                    "state": { "type": "enumeration", "enum": ["open", "closed"] },
                    "cover": { "type": "media", "multiple": false },
                    "seo": { "type": "component", "component": "shared.seo" },
                    "blocks": { "type": "dynamiczone", "components": ["shared.seo"] },
                    "related": { "type": "relation", "relation": "morphToMany" },
                    "author": { "type": "relation", "relation": "manyToOne", "target": "api::article.article" }
                }
            }
        ],
        "components": [
            {
                "uid": "shared.seo",
                "category": "shared",
                "info": { "singularName": "seo" },
                "attributes": { "metaTitle": { "type": "string" } }
            }
        ]
    }"#;

    #[multiplatform_test]
    fn every_attribute_has_exactly_one_class() {
        let catalog = ContentTypeCatalog::from_json(CATALOG).unwrap();

        for schema in catalog.all() {
            for attribute in schema.attributes.values() {
                let matching: Vec<_> = AttributeClass::ALL
                    .into_iter()
                    .filter(|class| class.matches(attribute))
                    .collect();
                assert_eq!(
                    vec![classify(attribute)],
                    matching,
                    "{}.{}",
                    schema.uid,
                    attribute.name
                );
            }
        }
    }

    #[multiplatform_test]
    fn classifies_declared_attributes() {
        let catalog = ContentTypeCatalog::from_json(CATALOG).unwrap();
        let article = catalog.get("api::article.article").unwrap();

        let classes: Vec<_> = ["title", "state", "cover", "seo", "blocks", "related", "author"]
            .into_iter()
            .map(|name| classify(article.attribute(name).unwrap()))
            .collect();

        assert_eq!(
            vec![
                AttributeClass::Scalar,
                AttributeClass::Enumeration,
                AttributeClass::Media,
                AttributeClass::Component,
                AttributeClass::DynamicZone,
                AttributeClass::PolymorphicRelation,
                AttributeClass::Relation,
            ],
            classes
        );
    }

    #[multiplatform_test]
    fn filter_shapes() {
        let catalog = ContentTypeCatalog::from_json(CATALOG).unwrap();
        let article = catalog.get("api::article.article").unwrap();

        let shapes: Vec<_> = ["title", "state", "cover", "seo", "blocks", "related", "author"]
            .into_iter()
            .map(|name| classify(article.attribute(name).unwrap()).filter_shape())
            .collect();

        assert_eq!(
            vec![
                FilterShape::Operators,
                FilterShape::Operators,
                FilterShape::Unfilterable,
                FilterShape::Nested,
                FilterShape::Unfilterable,
                FilterShape::Unfilterable,
                FilterShape::Nested,
            ],
            shapes
        );
    }
}
