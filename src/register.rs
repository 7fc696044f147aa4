//! # Route registration
//!
//! Each function adds the endpoints of one resource to a router and returns
//! it. Registering the same path twice with different methods merges them, so
//! `read` followed by `delete` serves both from one `path/{id}` route.
//!
//! | function | routes                                   |
//! |----------|------------------------------------------|
//! | `read`   | `GET path`, `GET path/{id}`              |
//! | `create` | `POST path`                              |
//! | `update` | `PUT path/{id}`                          |
//! | `delete` | `DELETE path/{id}`                       |
//! | `crud`   | all of the above                         |
//!
//! Every route runs the config's middleware first, in the order it was added,
//! then its filters, then (list only) the query parameter filter.

use crate::{
    config::Config,
    filter::{Filters, apply_filters, query_param_filter},
    routes,
    traits::CrudResource,
};
use axum::{
    Router,
    extract::{FromRef, Request},
    middleware::{Next, from_fn, from_fn_with_state},
    routing::{MethodRouter, delete as delete_method, get, post, put},
};
use sea_orm::DatabaseConnection;

fn item_path(path: &str) -> String {
    format!("{}/{{id}}", path.trim_end_matches('/'))
}

/// Wraps `route` in the filters (when `scoped`) and middleware of `config`.
fn layered<S>(mut route: MethodRouter<S>, config: &Config, scoped: bool) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    if scoped && !config.filters.is_empty() {
        let filters = Filters(config.filters.iter().cloned().collect());
        route = route.layer(from_fn_with_state(filters, apply_filters));
    }
    // Last layer added runs first.
    for middleware in config.middleware.iter().rev() {
        let middleware = middleware.clone();
        route = route.layer(from_fn(move |request: Request, next: Next| {
            middleware(request, next)
        }));
    }
    route
}

/// Registers `GET path` and `GET path/{id}`.
pub fn read<T, S>(router: Router<S>, path: &str, config: &Config) -> Router<S>
where
    T: CrudResource,
    S: Clone + Send + Sync + 'static,
    DatabaseConnection: FromRef<S>,
{
    let mut list = get(routes::get_all::<T>);
    if config.has_query_params() {
        list = list.layer(from_fn(query_param_filter::<T>));
    }
    tracing::debug!(resource = T::RESOURCE_NAME_PLURAL, path, "registered read routes");
    router
        .route(path, layered(list, config, true))
        .route(&item_path(path), layered(get(routes::get_one::<T>), config, true))
}

/// Registers `POST path`.
pub fn create<T, S>(router: Router<S>, path: &str, config: &Config) -> Router<S>
where
    T: CrudResource,
    S: Clone + Send + Sync + 'static,
    DatabaseConnection: FromRef<S>,
{
    tracing::debug!(resource = T::RESOURCE_NAME_PLURAL, path, "registered create route");
    router.route(path, layered(post(routes::create_one::<T>), config, false))
}

/// Registers `PUT path/{id}`.
pub fn update<T, S>(router: Router<S>, path: &str, config: &Config) -> Router<S>
where
    T: CrudResource,
    S: Clone + Send + Sync + 'static,
    DatabaseConnection: FromRef<S>,
{
    tracing::debug!(resource = T::RESOURCE_NAME_PLURAL, path, "registered update route");
    router.route(
        &item_path(path),
        layered(put(routes::update_one::<T>), config, true),
    )
}

/// Registers `DELETE path/{id}`.
pub fn delete<T, S>(router: Router<S>, path: &str, config: &Config) -> Router<S>
where
    T: CrudResource,
    S: Clone + Send + Sync + 'static,
    DatabaseConnection: FromRef<S>,
{
    tracing::debug!(resource = T::RESOURCE_NAME_PLURAL, path, "registered delete route");
    router.route(
        &item_path(path),
        layered(delete_method(routes::delete_one::<T>), config, true),
    )
}

/// Registers all five endpoints with the same config.
pub fn crud<T, S>(router: Router<S>, path: &str, config: &Config) -> Router<S>
where
    T: CrudResource,
    S: Clone + Send + Sync + 'static,
    DatabaseConnection: FromRef<S>,
{
    let router = read::<T, S>(router, path, config);
    let router = create::<T, S>(router, path, config);
    let router = update::<T, S>(router, path, config);
    delete::<T, S>(router, path, config)
}

/// Registers all five endpoints with no middleware, filters or query parameters.
pub fn api<T, S>(router: Router<S>, path: &str) -> Router<S>
where
    T: CrudResource,
    S: Clone + Send + Sync + 'static,
    DatabaseConnection: FromRef<S>,
{
    crud::<T, S>(router, path, &Config::default())
}

/// A stand-alone router serving `T` at `path` from `db`.
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(autocrud::router::<dummy::Model>("/dummies", &db, &Config::default()))
///     .layer(TraceLayer::new_for_http());
/// ```
pub fn router<T: CrudResource>(path: &str, db: &DatabaseConnection, config: &Config) -> Router {
    crud::<T, DatabaseConnection>(Router::new(), path, config).with_state(db.clone())
}
