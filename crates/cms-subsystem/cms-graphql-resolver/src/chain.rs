// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The resolver wrapping pipeline.
//!
//! Every wrapped field runs the same sequence of steps: authorize (when the field requires
//! it), the configured middlewares in order, the configured policies, and finally the base
//! resolver. The steps are laid out once per field when the schema is assembled; a request
//! walks them by index, each middleware receiving a [`Next`] that runs the rest.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use cms_graphql_builder::resolver_spec::FieldPath;
use futures::{FutureExt, future::BoxFuture};
use serde_json::Value;
use tracing::debug;

use crate::{
    auth::AuthVerifier,
    error::ResolverError,
    policy::{PolicyContext, PolicyRef, ResolvedPolicy},
    request_context::RequestContext,
    resolved::{Node, Resolved},
};

/// One call of a field resolver
pub struct Invocation<'a> {
    pub field: &'a FieldPath,
    pub parent: Option<&'a Node>,
    /// Arguments, as JSON
    pub args: &'a Value,
    pub request: &'a RequestContext,
}

/// The resolver at the end of a chain
#[async_trait]
pub trait FieldResolver: Send + Sync {
    async fn resolve(&self, invocation: &Invocation<'_>) -> Result<Resolved, ResolverError>;
}

#[async_trait]
pub trait Middleware: Send + Sync {
    /// Handle an invocation, usually by doing something around `next.run(invocation)`
    async fn handle(
        &self,
        invocation: &Invocation<'_>,
        next: Next<'_>,
    ) -> Result<Resolved, ResolverError>;
}

/// The remaining steps of a chain
pub struct Next<'a> {
    chain: &'a ResolverChain,
    index: usize,
}

impl Next<'_> {
    pub async fn run(self, invocation: &Invocation<'_>) -> Result<Resolved, ResolverError> {
        self.chain.run_step(self.index, invocation).await
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthRequirement {
    /// Root fields and fields the schema guards with a scope are authorized against it
    #[default]
    Default,
    /// Authorize against these scopes instead
    Scopes(Vec<String>),
    /// Never authorize
    Disabled,
}

/// Extra behavior attached to one field
#[derive(Clone, Default)]
pub struct ResolverConfig {
    pub auth: AuthRequirement,
    pub middlewares: Vec<Arc<dyn Middleware>>,
    pub policies: Vec<PolicyRef>,
}

impl ResolverConfig {
    pub fn with_auth(self, auth: AuthRequirement) -> Self {
        Self { auth, ..self }
    }

    pub fn with_middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn with_policy(mut self, policy: PolicyRef) -> Self {
        self.policies.push(policy);
        self
    }
}

/// Resolver configurations, by field
#[derive(Clone, Default)]
pub struct ResolversConfig {
    fields: HashMap<FieldPath, ResolverConfig>,
}

impl ResolversConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, type_name: &str, field_name: &str, config: ResolverConfig) -> Self {
        self.fields
            .insert(FieldPath::new(type_name, field_name), config);
        self
    }

    pub fn get(&self, path: &FieldPath) -> Option<&ResolverConfig> {
        self.fields.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.fields.keys()
    }
}

enum Step {
    Authorize(Vec<String>),
    Middleware(Arc<dyn Middleware>),
    Policies(Vec<ResolvedPolicy>),
    Resolve,
}

pub struct ResolverChain {
    steps: Vec<Step>,
    base: Arc<dyn FieldResolver>,
    auth_verifier: Arc<dyn AuthVerifier>,
}

impl ResolverChain {
    /// Lay out the steps for a field.
    ///
    /// `scope` is the scope the schema guards the field with, if any.
    pub fn new(
        base: Arc<dyn FieldResolver>,
        is_root: bool,
        scope: Option<&str>,
        config: Option<&ResolverConfig>,
        policies: Vec<ResolvedPolicy>,
        auth_verifier: Arc<dyn AuthVerifier>,
    ) -> Self {
        let mut steps = vec![];

        let auth = config.map(|config| &config.auth).unwrap_or(&AuthRequirement::Default);
        match auth {
            AuthRequirement::Default if is_root || scope.is_some() => {
                steps.push(Step::Authorize(scope.map(str::to_string).into_iter().collect()))
            }
            AuthRequirement::Scopes(scopes) => steps.push(Step::Authorize(scopes.clone())),
            AuthRequirement::Default | AuthRequirement::Disabled => {}
        }

        if let Some(config) = config {
            steps.extend(config.middlewares.iter().cloned().map(Step::Middleware));
        }

        steps.push(Step::Policies(policies));
        steps.push(Step::Resolve);

        Self {
            steps,
            base,
            auth_verifier,
        }
    }

    pub async fn run(&self, invocation: &Invocation<'_>) -> Result<Resolved, ResolverError> {
        self.run_step(0, invocation).await
    }

    fn run_step<'a>(
        &'a self,
        index: usize,
        invocation: &'a Invocation<'a>,
    ) -> BoxFuture<'a, Result<Resolved, ResolverError>> {
        async move {
            let next = Next {
                chain: self,
                index: index + 1,
            };

            match self.steps.get(index) {
                Some(Step::Authorize(scopes)) => {
                    if let Err(e) = self
                        .auth_verifier
                        .verify(&invocation.request.auth, scopes)
                    {
                        debug!("Denied access to {}: {e}", invocation.field);
                        return Err(ResolverError::Forbidden("Forbidden access".to_string()));
                    }
                    next.run(invocation).await
                }
                Some(Step::Middleware(middleware)) => middleware.handle(invocation, next).await,
                Some(Step::Policies(policies)) => {
                    for policy in policies {
                        let context = PolicyContext {
                            field: invocation.field,
                            parent: invocation.parent.map(|parent| &parent.value),
                            args: invocation.args,
                            request: invocation.request,
                            config: &policy.config,
                        };
                        // A rejection is a policy failure; a handler error propagates as is
                        if !policy.handler.check(&context).await? {
                            return Err(ResolverError::Policy(policy.name.clone()));
                        }
                    }
                    next.run(invocation).await
                }
                Some(Step::Resolve) | None => self.base.resolve(invocation).await,
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::{
        auth::ScopeAuthVerifier,
        policy::{Policy, PolicyRegistry, PolicyResolver, policy_fn},
        request_context::AuthContext,
    };
    use serde_json::json;

    struct CountingResolver(AtomicUsize);

    #[async_trait]
    impl FieldResolver for CountingResolver {
        async fn resolve(&self, _invocation: &Invocation<'_>) -> Result<Resolved, ResolverError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Resolved::Leaf(json!("resolved")))
        }
    }

    struct Recording {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Middleware for Recording {
        async fn handle(
            &self,
            invocation: &Invocation<'_>,
            next: Next<'_>,
        ) -> Result<Resolved, ResolverError> {
            self.log.lock().unwrap().push(format!("{} before", self.name));
            let result = next.run(invocation).await;
            self.log.lock().unwrap().push(format!("{} after", self.name));
            result
        }
    }

    /// Logs each step it takes part in, in addition to delegating to the scope check
    struct RecordingVerifier(Arc<Mutex<Vec<String>>>);

    impl AuthVerifier for RecordingVerifier {
        fn verify(&self, auth: &AuthContext, scopes: &[String]) -> Result<(), ResolverError> {
            self.0.lock().unwrap().push("authorize".to_string());
            ScopeAuthVerifier.verify(auth, scopes)
        }
    }

    struct RecordingPolicy(Arc<Mutex<Vec<String>>>);

    #[async_trait]
    impl Policy for RecordingPolicy {
        async fn check(&self, _context: &PolicyContext<'_>) -> Result<bool, ResolverError> {
            self.0.lock().unwrap().push("policy".to_string());
            Ok(true)
        }
    }

    struct RecordingResolver(Arc<Mutex<Vec<String>>>);

    #[async_trait]
    impl FieldResolver for RecordingResolver {
        async fn resolve(&self, _invocation: &Invocation<'_>) -> Result<Resolved, ResolverError> {
            self.0.lock().unwrap().push("base".to_string());
            Ok(Resolved::Leaf(json!("resolved")))
        }
    }

    struct BrokenPolicy;

    #[async_trait]
    impl Policy for BrokenPolicy {
        async fn check(&self, _context: &PolicyContext<'_>) -> Result<bool, ResolverError> {
            Err(ResolverError::delegate("database connection reset"))
        }
    }

    struct ShortCircuit;

    #[async_trait]
    impl Middleware for ShortCircuit {
        async fn handle(
            &self,
            _invocation: &Invocation<'_>,
            _next: Next<'_>,
        ) -> Result<Resolved, ResolverError> {
            Ok(Resolved::Leaf(json!("cached")))
        }
    }

    fn field() -> FieldPath {
        FieldPath::new("Query", "articles")
    }

    async fn invoke(chain: &ResolverChain, auth: AuthContext) -> Result<Resolved, ResolverError> {
        let field = field();
        let args = json!({});
        let request = RequestContext::new(auth);
        chain
            .run(&Invocation {
                field: &field,
                parent: None,
                args: &args,
                request: &request,
            })
            .await
    }

    #[tokio::test]
    async fn unauthorized_requests_stop_before_the_resolver() {
        let base = Arc::new(CountingResolver(AtomicUsize::new(0)));
        let chain = ResolverChain::new(
            base.clone(),
            true,
            Some("api::article.article.find"),
            None,
            vec![],
            Arc::new(ScopeAuthVerifier),
        );

        let result = invoke(&chain, AuthContext::anonymous()).await;

        assert!(matches!(result, Err(ResolverError::Forbidden(_))));
        assert_eq!(0, base.0.load(Ordering::SeqCst));

        let result = invoke(&chain, AuthContext::with_scopes(["api::article.article.find"])).await;
        assert_eq!(Resolved::Leaf(json!("resolved")), result.unwrap());
        assert_eq!(1, base.0.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn middlewares_run_in_order_around_the_resolver() {
        let log = Arc::new(Mutex::new(vec![]));
        let config = ResolverConfig::default()
            .with_auth(AuthRequirement::Disabled)
            .with_middleware(Recording {
                name: "outer",
                log: log.clone(),
            })
            .with_middleware(Recording {
                name: "inner",
                log: log.clone(),
            });
        let chain = ResolverChain::new(
            Arc::new(CountingResolver(AtomicUsize::new(0))),
            true,
            None,
            Some(&config),
            vec![],
            Arc::new(ScopeAuthVerifier),
        );

        let result = invoke(&chain, AuthContext::anonymous()).await;

        assert_eq!(Resolved::Leaf(json!("resolved")), result.unwrap());
        assert_eq!(
            vec!["outer before", "inner before", "inner after", "outer after"],
            *log.lock().unwrap()
        );
    }

    #[tokio::test]
    async fn middlewares_can_short_circuit() {
        let base = Arc::new(CountingResolver(AtomicUsize::new(0)));
        let config = ResolverConfig::default()
            .with_auth(AuthRequirement::Disabled)
            .with_middleware(ShortCircuit);
        let chain = ResolverChain::new(
            base.clone(),
            false,
            None,
            Some(&config),
            vec![],
            Arc::new(ScopeAuthVerifier),
        );

        let result = invoke(&chain, AuthContext::anonymous()).await;

        assert_eq!(Resolved::Leaf(json!("cached")), result.unwrap());
        assert_eq!(0, base.0.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn failing_policies_stop_the_chain() {
        let registry = PolicyRegistry::new()
            .register("always", policy_fn(|_| true))
            .register(
                "has-config",
                policy_fn(|context| context.config.get("allowed") == Some(&json!(true))),
            );

        let base = Arc::new(CountingResolver(AtomicUsize::new(0)));
        let policies = registry
            .resolve(&[
                PolicyRef::new("always"),
                PolicyRef::new("has-config").with_config(json!({ "allowed": false })),
            ])
            .unwrap();
        let chain = ResolverChain::new(
            base.clone(),
            false,
            None,
            None,
            policies,
            Arc::new(ScopeAuthVerifier),
        );

        let result = invoke(&chain, AuthContext::anonymous()).await;

        assert!(matches!(result, Err(ResolverError::Policy(name)) if name == "has-config"));
        assert_eq!(0, base.0.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn explicit_scopes_replace_the_default() {
        let config = ResolverConfig::default()
            .with_auth(AuthRequirement::Scopes(vec!["admin".to_string()]));
        let chain = ResolverChain::new(
            Arc::new(CountingResolver(AtomicUsize::new(0))),
            true,
            Some("api::article.article.find"),
            Some(&config),
            vec![],
            Arc::new(ScopeAuthVerifier),
        );

        assert!(
            invoke(&chain, AuthContext::with_scopes(["api::article.article.find"]))
                .await
                .is_err()
        );
        assert!(invoke(&chain, AuthContext::with_scopes(["admin"])).await.is_ok());
    }

    #[tokio::test]
    async fn steps_run_in_order_across_stages() {
        let log = Arc::new(Mutex::new(vec![]));
        let config = ResolverConfig::default()
            .with_middleware(Recording {
                name: "mw1",
                log: log.clone(),
            })
            .with_middleware(Recording {
                name: "mw2",
                log: log.clone(),
            });
        let policies = PolicyRegistry::new()
            .register("recording", RecordingPolicy(log.clone()))
            .resolve(&[PolicyRef::new("recording")])
            .unwrap();
        let chain = ResolverChain::new(
            Arc::new(RecordingResolver(log.clone())),
            true,
            Some("api::article.article.find"),
            Some(&config),
            policies,
            Arc::new(RecordingVerifier(log.clone())),
        );

        let result = invoke(&chain, AuthContext::with_scopes(["api::article.article.find"])).await;

        assert_eq!(Resolved::Leaf(json!("resolved")), result.unwrap());
        assert_eq!(
            vec![
                "authorize",
                "mw1 before",
                "mw2 before",
                "policy",
                "base",
                "mw2 after",
                "mw1 after"
            ],
            *log.lock().unwrap()
        );

        log.lock().unwrap().clear();
        let result = invoke(&chain, AuthContext::anonymous()).await;

        assert!(matches!(result, Err(ResolverError::Forbidden(_))));
        assert_eq!(vec!["authorize"], *log.lock().unwrap());
    }

    #[tokio::test]
    async fn policy_handler_errors_propagate_unchanged() {
        let base = Arc::new(CountingResolver(AtomicUsize::new(0)));
        let policies = PolicyRegistry::new()
            .register("broken", BrokenPolicy)
            .resolve(&[PolicyRef::new("broken")])
            .unwrap();
        let chain = ResolverChain::new(
            base.clone(),
            false,
            None,
            None,
            policies,
            Arc::new(ScopeAuthVerifier),
        );

        let error = invoke(&chain, AuthContext::anonymous()).await.unwrap_err();

        assert!(matches!(error, ResolverError::Delegate(_)));
        assert_eq!(crate::error::INTERNAL_SERVER_ERROR, error.code());
        assert_eq!(0, base.0.load(Ordering::SeqCst));
    }
}
