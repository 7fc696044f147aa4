//! # Row filtering
//!
//! Two ways of narrowing what a request can see, both feeding the request's
//! [`Scope`]:
//!
//! - **Filters** registered on a [`Config`](crate::Config) run for every
//!   lookup (list, get one, and the lookups in front of update and delete).
//!   They receive the request and return the condition to add:
//!
//!   ```rust,ignore
//!   let config = Config::new().filter(|request: &Request| {
//!       let tenant = request.headers().get("x-tenant")?.to_str().ok()?;
//!       Some(Condition::all().add(dummy::Column::Tenant.eq(tenant)))
//!   });
//!   ```
//!
//! - **Query parameters** on the list endpoint, enabled with
//!   `Config::query_params(true)`. Every filterable field present in the
//!   query string adds an equality test; unknown parameters are ignored:
//!
//!   ```text
//!   GET /dummies?name=Dummy%204&value=4
//!   ```

use crate::{
    errors::ApiError,
    session::Scope,
    traits::{ColumnOf, CrudResource},
};
use axum::{
    extract::{Query, Request, State},
    http::Uri,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sea_orm::{
    ColumnTrait, ColumnType, Condition, IdenStatic,
    sea_query::{Alias, Expr, SimpleExpr},
};
use std::sync::Arc;
use uuid::Uuid;

/// Restricts the rows a request may see.
pub trait Filter: Send + Sync + 'static {
    /// Condition to add for this request, or `None` to leave it unrestricted.
    fn condition(&self, request: &Request) -> Option<Condition>;
}

impl<F> Filter for F
where
    F: Fn(&Request) -> Option<Condition> + Send + Sync + 'static,
{
    fn condition(&self, request: &Request) -> Option<Condition> {
        self(request)
    }
}

/// The filters of one registration, shared by its routes.
#[derive(Clone)]
pub(crate) struct Filters(pub(crate) Arc<[Arc<dyn Filter>]>);

/// Middleware running a config's filters into the request scope.
pub(crate) async fn apply_filters(
    State(filters): State<Filters>,
    mut request: Request,
    next: Next,
) -> Response {
    let conditions: Vec<Condition> = filters
        .0
        .iter()
        .filter_map(|filter| filter.condition(&request))
        .collect();
    for condition in conditions {
        Scope::restrict(&mut request, condition);
    }
    next.run(request).await
}

/// Middleware turning query parameters into equality conditions on `T`'s
/// filterable columns.
pub async fn query_param_filter<T: CrudResource>(mut request: Request, next: Next) -> Response {
    match query_param_condition::<T>(request.uri()) {
        Ok(Some(condition)) => Scope::restrict(&mut request, condition),
        Ok(None) => {}
        Err(err) => return err.into_response(),
    }
    next.run(request).await
}

/// Builds the condition for the query string of `uri`.
///
/// Returns `Ok(None)` when no filterable field is present. The first value of
/// a repeated parameter wins.
///
/// # Errors
///
/// Returns a 400 error if the query string is malformed or a value cannot be
/// read as its column's type.
pub fn query_param_condition<T: CrudResource>(uri: &Uri) -> Result<Option<Condition>, ApiError> {
    let Query(params) = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let mut condition = Condition::all();
    let mut matched = false;
    for (name, column) in T::filterable_columns() {
        if let Some((_, raw)) = params.iter().find(|(key, _)| *key == name) {
            condition = condition.add(column_equals::<T>(column, raw)?);
            matched = true;
        }
    }

    Ok(matched.then_some(condition))
}

fn column_equals<T: CrudResource>(column: ColumnOf<T>, raw: &str) -> Result<SimpleExpr, ApiError> {
    let invalid = || {
        ApiError::bad_request(format!(
            "invalid value for query parameter `{}`: {raw}",
            column.as_str()
        ))
    };

    let expr = match column.def().get_column_type() {
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::Integer
        | ColumnType::BigInteger => column.eq(raw.parse::<i64>().map_err(|_| invalid())?),
        ColumnType::TinyUnsigned
        | ColumnType::SmallUnsigned
        | ColumnType::Unsigned
        | ColumnType::BigUnsigned => column.eq(raw.parse::<u64>().map_err(|_| invalid())?),
        ColumnType::Float | ColumnType::Double | ColumnType::Decimal(_) | ColumnType::Money(_) => {
            column.eq(raw.parse::<f64>().map_err(|_| invalid())?)
        }
        ColumnType::Boolean => column.eq(parse_bool(raw).ok_or_else(invalid)?),
        ColumnType::Uuid => column.eq(Uuid::parse_str(raw).map_err(|_| invalid())?),
        ColumnType::String(_) | ColumnType::Text | ColumnType::Char(_) => column.eq(raw),
        // Dates, JSON, enums and the like are compared in their text form, so
        // strict backends accept a string parameter.
        _ => Expr::expr(Expr::col(column.as_column_ref()).cast_as(Alias::new("text"))).eq(raw),
    };
    Ok(expr)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
