use crate::filter::Filter;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{fmt, future::Future, pin::Pin, sync::Arc};

pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A pre-handler middleware function stored in a [`Config`].
pub type Middleware = Arc<dyn Fn(Request, Next) -> BoxFuture + Send + Sync>;

/// What a registration call attaches to the routes it creates.
///
/// ```rust,ignore
/// let config = Config::new()
///     .middleware(require_api_key)
///     .filter(|request: &Request| tenant_condition(request))
///     .query_params(true);
///
/// let app = autocrud::crud::<dummy::Model, _>(Router::new(), "/dummies", &config);
/// ```
#[derive(Clone, Default)]
pub struct Config {
    pub(crate) middleware: Vec<Middleware>,
    pub(crate) filters: Vec<Arc<dyn Filter>>,
    pub(crate) query_params: bool,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware to the chain run before every handler.
    ///
    /// Middleware runs in the order it was added. Returning without calling
    /// `next.run(request)` short-circuits the chain.
    #[must_use]
    pub fn middleware<F, Fut, R>(mut self, middleware: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.middleware.push(Arc::new(move |request: Request, next: Next| -> BoxFuture {
            let response = middleware(request, next);
            Box::pin(async move { response.await.into_response() })
        }));
        self
    }

    /// Adds a filter restricting which rows every lookup can see.
    #[must_use]
    pub fn filter<F: Filter>(mut self, filter: F) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Accept one query parameter per filterable field on the list endpoint.
    #[must_use]
    pub fn query_params(mut self, enabled: bool) -> Self {
        self.query_params = enabled;
        self
    }

    #[must_use]
    pub fn has_query_params(&self) -> bool {
        self.query_params
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("middleware", &self.middleware.len())
            .field("filters", &self.filters.len())
            .field("query_params", &self.query_params)
            .finish()
    }
}
