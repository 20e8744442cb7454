//! Decorator composition for generated endpoints.
//!
//! Callers attach extra framework behavior (middleware layers, fallbacks,
//! additional routes) to individual endpoint methods or to the whole router
//! without subclassing anything: a [`RouteDecorators`] value maps each
//! [`Operation`] to an ordered list of transforms applied at router
//! construction time.
//!
//! ```rust,ignore
//! let decorators = RouteDecorators::new()
//!     .on(Operation::Delete, |route| route.route_layer(require_admin_layer()))
//!     .on_router(|router| router.layer(TraceLayer::new_for_http()));
//! ```

use axum::{routing::MethodRouter, Router};
use std::collections::HashMap;

/// The five generated endpoint methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

type MethodDecorator<S> = Box<dyn Fn(MethodRouter<S>) -> MethodRouter<S> + Send + Sync>;
type RouterDecorator<S> = Box<dyn Fn(Router<S>) -> Router<S> + Send + Sync>;

/// Ordered decorator lists per operation, plus router-level decorators for
/// behavior spanning every endpoint.
pub struct RouteDecorators<S = ()> {
    methods: HashMap<Operation, Vec<MethodDecorator<S>>>,
    router: Vec<RouterDecorator<S>>,
}

impl<S> Default for RouteDecorators<S> {
    fn default() -> Self {
        Self { methods: HashMap::new(), router: Vec::new() }
    }
}

impl<S> RouteDecorators<S>
where
    S: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decorator for one endpoint method. Decorators run in the
    /// order they were added.
    #[must_use]
    pub fn on(
        mut self,
        operation: Operation,
        decorator: impl Fn(MethodRouter<S>) -> MethodRouter<S> + Send + Sync + 'static,
    ) -> Self {
        self.methods.entry(operation).or_default().push(Box::new(decorator));
        self
    }

    /// Append a decorator applied to the assembled router, after all
    /// method-level decorators.
    #[must_use]
    pub fn on_router(
        mut self,
        decorator: impl Fn(Router<S>) -> Router<S> + Send + Sync + 'static,
    ) -> Self {
        self.router.push(Box::new(decorator));
        self
    }

    /// Run the decorators configured for `operation` over a method router.
    /// No entry means the route passes through untouched.
    #[must_use]
    pub fn apply(&self, operation: Operation, route: MethodRouter<S>) -> MethodRouter<S> {
        match self.methods.get(&operation) {
            Some(decorators) => decorators.iter().fold(route, |route, decorate| decorate(route)),
            None => route,
        }
    }

    /// Run the router-level decorators in order.
    #[must_use]
    pub fn apply_router(&self, router: Router<S>) -> Router<S> {
        self.router.iter().fold(router, |router, decorate| decorate(router))
    }
}
