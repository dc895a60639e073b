// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Types present in every schema regardless of the catalog.

use cms_model::primitive_type::ScalarKind;

use crate::{
    builder_context::SchemaFragment,
    definition::{
        enum_type, field, input_object_type, input_value, named, non_null, object_type,
        scalar_type,
    },
    filter_builder::build_scalar_filter_type,
    type_registry::{RegistryConfig, RegistryKind},
};

pub const PUBLICATION_STATUS_TYPE: &str = "PublicationStatus";
pub const PUBLICATION_STATUS_DRAFT: &str = "DRAFT";
pub const PUBLICATION_STATUS_PUBLISHED: &str = "PUBLISHED";
pub const PAGINATION_TYPE: &str = "Pagination";
pub const PAGINATION_ARG_TYPE: &str = "PaginationArg";
pub const DELETE_MUTATION_RESPONSE_TYPE: &str = "DeleteMutationResponse";
pub const ERROR_TYPE: &str = "Error";

fn scalar_description(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Long => "A 64-bit signed integer",
        ScalarKind::Date => "A date string, such as 2007-12-03, compliant with the `full-date` format outlined in section 5.6 of the RFC 3339 profile of the ISO 8601 standard for representation of dates and times using the Gregorian calendar.",
        ScalarKind::Time => "A time string with format HH:mm:ss.SSS",
        ScalarKind::DateTime => "A date-time string at UTC, such as 2007-12-03T10:15:30Z, compliant with the `date-time` format outlined in section 5.6 of the RFC 3339 profile of the ISO 8601 standard for representation of dates and times using the Gregorian calendar.",
        ScalarKind::Json => "The `JSON` scalar type represents JSON values as specified by [ECMA-404](http://www.ecma-international.org/publications/files/ECMA-ST/ECMA-404.pdf).",
        _ => "",
    }
}

pub fn build() -> SchemaFragment {
    let mut fragment = SchemaFragment::default();

    for kind in ScalarKind::ALL.into_iter().filter(ScalarKind::is_custom) {
        fragment = fragment.with_type(
            scalar_type(kind.name(), Some(scalar_description(kind))),
            RegistryConfig::new(RegistryKind::Scalar),
        );
    }

    let internal = || RegistryConfig::new(RegistryKind::Internal);

    fragment = fragment
        .with_type(
            enum_type(
                PUBLICATION_STATUS_TYPE,
                [PUBLICATION_STATUS_DRAFT, PUBLICATION_STATUS_PUBLISHED],
            ),
            internal(),
        )
        .with_type(
            object_type(
                PAGINATION_TYPE,
                ["total", "page", "pageSize", "pageCount"]
                    .into_iter()
                    .map(|name| field(name, non_null("Int"), vec![]))
                    .collect(),
            ),
            internal(),
        )
        .with_type(
            input_object_type(
                PAGINATION_ARG_TYPE,
                ["page", "pageSize", "start", "limit"]
                    .into_iter()
                    .map(|name| input_value(name, named("Int")))
                    .collect(),
            ),
            internal(),
        )
        .with_type(
            object_type(
                DELETE_MUTATION_RESPONSE_TYPE,
                vec![field("documentId", non_null("ID"), vec![])],
            ),
            internal(),
        )
        .with_type(
            object_type(
                ERROR_TYPE,
                vec![
                    field("code", non_null("String"), vec![]),
                    field("message", named("String"), vec![]),
                ],
            ),
            internal(),
        );

    for kind in ScalarKind::ALL {
        fragment = fragment.with_type(
            build_scalar_filter_type(kind),
            RegistryConfig::new(RegistryKind::ScalarFilter),
        );
    }

    fragment
}
