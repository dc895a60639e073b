// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Assembly of a built schema into an executable one.
//!
//! Every type of the registry becomes an `async_graphql` dynamic type. Object fields get a
//! resolver: fields the builder attached a resolver spec, an auth scope or a resolver
//! configuration to run through a [`ResolverChain`], and all others read the property of the
//! same name off their parent.

use std::sync::Arc;

use async_graphql::{
    Request, Variables,
    dynamic::{
        Enum, EnumItem, Field, FieldFuture, InputObject, InputValue, Object, ResolverContext,
        Scalar, Schema, TypeRef, Union,
    },
    http::GraphiQLSource,
};
use async_graphql_parser::types::{
    BaseType, FieldDefinition, InputValueDefinition, Type, TypeDefinition, TypeKind,
};
use cms_graphql_builder::{
    BuiltSchema, MUTATION_TYPE, ModelBuildingError, QUERY_TYPE,
    definition::{input_fields, object_fields, underlying_type_name},
    resolver_spec::{FieldPath, ResolverSpec},
    type_registry::{RegistryEntry, RegistryKind},
};
use cms_model::{catalog::ContentTypeCatalog, config::SchemaConfig};
use serde_json::{Map, Value, json};
use tracing::{debug, error, instrument, warn};

use crate::{
    artifacts::write_artifacts,
    association_resolver::{
        AssociationResolver, AssociationTarget, DynamicZoneResolver, EmptyDynamicZoneResolver,
    },
    chain::{FieldResolver, Invocation, ResolverChain, ResolversConfig},
    error::{GRAPHQL_VALIDATION_FAILED, INTERNAL_SERVER_ERROR, ResolverError},
    operation_payload::OperationsPayload,
    operation_resolver::{OperationResolver, PageInfoResolver},
    property_resolver::{EnumerationResolver, PropertyResolver},
    request_context::{AuthContext, RequestContext},
    resolved::{Node, Resolved, resolve_property},
    services::{Runtime, Services},
};

/// An executable schema
pub struct CompiledSchema {
    schema: Schema,
    config: Arc<SchemaConfig>,
}

impl CompiledSchema {
    /// Build the schema of `catalog` and assemble it
    pub fn compile(
        catalog: Arc<ContentTypeCatalog>,
        config: Arc<SchemaConfig>,
        services: Services,
        resolvers_config: &ResolversConfig,
    ) -> Result<Self, ModelBuildingError> {
        let built = cms_graphql_builder::build(&catalog, &config)?;
        Self::assemble(built, catalog, config, services, resolvers_config)
    }

    #[instrument(name = "CompiledSchema::assemble", skip_all)]
    pub fn assemble(
        built: BuiltSchema,
        catalog: Arc<ContentTypeCatalog>,
        config: Arc<SchemaConfig>,
        services: Services,
        resolvers_config: &ResolversConfig,
    ) -> Result<Self, ModelBuildingError> {
        for path in resolvers_config.paths() {
            let known = built.registry.get(&path.type_name).is_some_and(|entry| {
                object_fields(&entry.definition).any(|field| field.name.node == path.field_name)
            });
            if !known {
                warn!("Ignoring the resolver configuration of unknown field {path}");
            }
        }

        let runtime = Arc::new(Runtime {
            catalog,
            config: config.clone(),
            services,
        });
        let assembler = Assembler {
            built: &built,
            runtime: &runtime,
            resolvers_config,
        };

        let mut builder = Schema::build(
            QUERY_TYPE,
            built.has_mutations().then_some(MUTATION_TYPE),
            None,
        );

        for entry in built.registry.iter() {
            let definition = &entry.definition;
            builder = match &definition.kind {
                TypeKind::Scalar => builder.register(scalar(definition)),
                TypeKind::Enum(enum_type) => builder.register(
                    enum_type
                        .values
                        .iter()
                        .fold(Enum::new(&entry.name), |enum_type, value| {
                            enum_type.item(EnumItem::new(value.node.value.node.as_str()))
                        }),
                ),
                TypeKind::Union(union_type) => builder.register(
                    union_type
                        .members
                        .iter()
                        .fold(Union::new(&entry.name), |union_type, member| {
                            union_type.possible_type(member.node.as_str())
                        }),
                ),
                TypeKind::InputObject(_) => builder.register(
                    input_fields(definition)
                        .fold(InputObject::new(&entry.name), |input, field| {
                            input.field(input_value(field))
                        }),
                ),
                TypeKind::Object(_) => builder.register(assembler.object(entry)?),
                TypeKind::Interface(_) => {
                    return Err(ModelBuildingError::Schema(format!(
                        "Unexpected interface type '{}'",
                        entry.name
                    )));
                }
            };
        }

        if let Some(depth_limit) = config.depth_limit {
            builder = builder.limit_depth(depth_limit);
        }

        let schema = builder
            .finish()
            .map_err(|e| ModelBuildingError::Schema(e.to_string()))?;

        write_artifacts(&config.artifacts, &schema.sdl(), &built.registry)?;

        Ok(Self { schema, config })
    }

    /// Run one request and return its response envelope (`data` and `errors`)
    #[instrument(
        name = "CompiledSchema::execute",
        skip_all,
        fields(operation_name = ?payload.operation_name)
    )]
    pub async fn execute(&self, payload: OperationsPayload, auth: AuthContext) -> Value {
        let OperationsPayload {
            operation_name,
            query,
            variables,
        } = payload;

        let mut request = Request::new(query).data(RequestContext::new(auth));
        if let Some(operation_name) = operation_name {
            request = request.operation_name(operation_name);
        }
        if let Some(variables) = variables {
            request = request.variables(Variables::from_json(Value::Object(variables)));
        }

        let response = self.schema.execute(request).await;
        if response.is_err() {
            debug!("Request failed with {} errors", response.errors.len());
        }

        match serde_json::to_value(&response) {
            Ok(mut envelope) => {
                with_error_codes(&mut envelope);
                envelope
            }
            Err(e) => {
                error!("Could not serialize a response: {e}");
                json!({
                    "data": null,
                    "errors": [{
                        "message": "Internal Server Error",
                        "extensions": { "code": INTERNAL_SERVER_ERROR }
                    }]
                })
            }
        }
    }

    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// The explorer page, if the landing page is enabled
    pub fn landing_page(&self, production: bool) -> Option<String> {
        self.config
            .landing_page
            .is_enabled(production)
            .then(|| GraphiQLSource::build().endpoint(&self.config.endpoint).finish())
    }
}

/// Give a code to errors raised by the engine itself (parsing, validation)
fn with_error_codes(envelope: &mut Value) {
    let Some(Value::Array(errors)) = envelope.get_mut("errors") else {
        return;
    };

    for error in errors.iter_mut().filter_map(Value::as_object_mut) {
        let extensions = error
            .entry("extensions")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(extensions) = extensions {
            extensions
                .entry("code")
                .or_insert_with(|| Value::String(GRAPHQL_VALIDATION_FAILED.to_string()));
        }
    }
}

struct Assembler<'a> {
    built: &'a BuiltSchema,
    runtime: &'a Arc<Runtime>,
    resolvers_config: &'a ResolversConfig,
}

impl Assembler<'_> {
    fn object(&self, entry: &RegistryEntry) -> Result<Object, ModelBuildingError> {
        object_fields(&entry.definition).try_fold(Object::new(&entry.name), |object, field| {
            Ok(object.field(self.field(entry, field)?))
        })
    }

    fn field(
        &self,
        entry: &RegistryEntry,
        definition: &FieldDefinition,
    ) -> Result<Field, ModelBuildingError> {
        let path = FieldPath::new(entry.name.as_str(), definition.name.node.as_str());
        let typ = &definition.ty.node;
        let spec = self.built.resolvers.get(&path);
        let scope = self.built.auth_scopes.get(&path).map(String::as_str);
        let config = self.resolvers_config.get(&path);
        let is_root = entry.config.kind == RegistryKind::Root;

        let field = if spec.is_none() && scope.is_none() && config.is_none() && !is_root {
            property_field(path, type_ref(typ), self.is_composite(typ))
        } else {
            let base = self.base_resolver(&path, typ, spec)?;
            let policies = match config {
                Some(config) => self
                    .runtime
                    .services
                    .policy_resolver
                    .resolve(&config.policies)
                    .map_err(|e| ModelBuildingError::Generic(format!("{path}: {e}")))?,
                None => vec![],
            };
            let chain = ResolverChain::new(
                base,
                is_root,
                scope,
                config,
                policies,
                self.runtime.services.auth_verifier.clone(),
            );
            chained_field(path, type_ref(typ), Arc::new(chain))
        };

        Ok(definition
            .arguments
            .iter()
            .fold(field, |field, argument| field.argument(input_value(&argument.node))))
    }

    fn base_resolver(
        &self,
        path: &FieldPath,
        typ: &Type,
        spec: Option<&ResolverSpec>,
    ) -> Result<Arc<dyn FieldResolver>, ModelBuildingError> {
        let runtime = self.runtime.clone();

        Ok(match spec {
            None => Arc::new(PropertyResolver {
                composite: self.is_composite(typ),
            }),
            Some(ResolverSpec::Operation { uid, action }) => {
                Arc::new(OperationResolver::new(uid.clone(), *action, runtime))
            }
            Some(ResolverSpec::PageInfo) => Arc::new(PageInfoResolver::new(runtime)),
            Some(ResolverSpec::Association {
                source_uid,
                attribute,
                unwrap_nodes,
            }) => {
                let source = self.runtime.catalog.get(source_uid).ok_or_else(|| {
                    ModelBuildingError::Generic(format!(
                        "{path}: unknown content type '{source_uid}'"
                    ))
                })?;
                let target = AssociationTarget::of(
                    &self.runtime,
                    source,
                    attribute,
                    &self.union_members(typ),
                )
                .ok_or_else(|| {
                    ModelBuildingError::Generic(format!(
                        "{path}: '{source_uid}.{attribute}' is not an association"
                    ))
                })?;
                Arc::new(AssociationResolver::new(
                    source_uid.clone(),
                    attribute.clone(),
                    *unwrap_nodes,
                    target,
                    runtime,
                ))
            }
            Some(ResolverSpec::DynamicZone {
                source_uid,
                attribute,
            }) => Arc::new(DynamicZoneResolver::new(
                source_uid.clone(),
                attribute.clone(),
                &self.union_members(typ),
                runtime,
            )),
            Some(ResolverSpec::EmptyDynamicZone) => Arc::new(EmptyDynamicZoneResolver),
            Some(ResolverSpec::Enumeration { values }) => Arc::new(EnumerationResolver {
                values: values.clone(),
            }),
        })
    }

    fn type_kind(&self, typ: &Type) -> Option<&TypeKind> {
        self.built
            .registry
            .get(underlying_type_name(typ))
            .map(|entry| &entry.definition.kind)
    }

    /// Whether values of `typ` are objects (or lists of them) rather than leaves
    fn is_composite(&self, typ: &Type) -> bool {
        matches!(
            self.type_kind(typ),
            Some(TypeKind::Object(_) | TypeKind::Union(_))
        )
    }

    fn union_members(&self, typ: &Type) -> Vec<String> {
        match self.type_kind(typ) {
            Some(TypeKind::Union(union_type)) => union_type
                .members
                .iter()
                .map(|member| member.node.to_string())
                .collect(),
            _ => vec![],
        }
    }
}

fn type_ref(typ: &Type) -> TypeRef {
    let base = match &typ.base {
        BaseType::Named(name) => TypeRef::named(name.to_string()),
        BaseType::List(inner) => TypeRef::List(Box::new(type_ref(inner))),
    };
    if typ.nullable {
        base
    } else {
        TypeRef::NonNull(Box::new(base))
    }
}

fn scalar(definition: &TypeDefinition) -> Scalar {
    let scalar = Scalar::new(definition.name.node.as_str());
    match &definition.description {
        Some(description) => scalar.description(description.node.as_str()),
        None => scalar,
    }
}

fn input_value(definition: &InputValueDefinition) -> InputValue {
    let input = InputValue::new(definition.name.node.as_str(), type_ref(&definition.ty.node));
    match &definition.default_value {
        Some(default_value) => input.default_value(default_value.node.clone()),
        None => input,
    }
}

/// Arguments of a field, as JSON
fn arguments(ctx: &ResolverContext<'_>) -> async_graphql::Result<Value> {
    let mut args = Map::new();
    for (name, value) in ctx.args.as_index_map() {
        args.insert(name.to_string(), value.clone().into_json()?);
    }
    Ok(Value::Object(args))
}

fn property_field(path: FieldPath, typ: TypeRef, composite: bool) -> Field {
    let field_name = path.field_name.clone();
    Field::new(field_name, typ, move |ctx| {
        let parent = ctx.parent_value.try_downcast_ref::<Node>().ok();
        let resolved = resolve_property(parent, &path.field_name, composite);
        FieldFuture::new(async move { Ok(resolved.into_field_value()) })
    })
}

fn chained_field(path: FieldPath, typ: TypeRef, chain: Arc<ResolverChain>) -> Field {
    let field_name = path.field_name.clone();
    let path = Arc::new(path);
    Field::new(field_name, typ, move |ctx| {
        let chain = chain.clone();
        let path = path.clone();
        FieldFuture::new(async move {
            let args = arguments(&ctx)?;
            let request = ctx.data::<RequestContext>()?;
            let parent = ctx.parent_value.try_downcast_ref::<Node>().ok();

            let invocation = Invocation {
                field: &path,
                parent,
                args: &args,
                request,
            };
            chain
                .run(&invocation)
                .await
                .map(Resolved::into_field_value)
                .map_err(ResolverError::into_graphql_error)
        })
    })
}
