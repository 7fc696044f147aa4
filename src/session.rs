//! Per-request database session.
//!
//! Every generated handler works against a [`Session`]: a connection plus the
//! [`Scope`] accumulated by the middleware in front of it. Middleware narrows
//! the scope, handlers only ever see rows inside it.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use sea_orm::{Condition, DatabaseConnection};
use std::convert::Infallible;

/// Conditions a request has been restricted to, combined with AND.
#[derive(Clone, Debug)]
pub struct Scope {
    condition: Condition,
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            condition: Condition::all(),
        }
    }
}

impl Scope {
    /// Narrows the scope of `request`, creating it on first use.
    pub fn restrict<B>(request: &mut axum::http::Request<B>, condition: Condition) {
        match request.extensions_mut().get_mut::<Self>() {
            Some(scope) => {
                scope.condition = std::mem::replace(&mut scope.condition, Condition::all()).add(condition);
            }
            None => {
                request.extensions_mut().insert(Self {
                    condition: Condition::all().add(condition),
                });
            }
        }
    }

    #[must_use]
    pub fn into_condition(self) -> Condition {
        self.condition
    }
}

/// Connection and scope for the current request.
///
/// The connection is taken from a `DatabaseConnection` request extension if
/// one was installed with [`bind_session`], otherwise from router state.
#[derive(Clone, Debug)]
pub struct Session {
    pub db: DatabaseConnection,
    pub condition: Condition,
}

impl<S> FromRequestParts<S> for Session
where
    DatabaseConnection: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let db = parts
            .extensions
            .get::<DatabaseConnection>()
            .cloned()
            .unwrap_or_else(|| DatabaseConnection::from_ref(state));
        let condition = parts
            .extensions
            .get::<Scope>()
            .cloned()
            .unwrap_or_default()
            .into_condition();
        Ok(Self { db, condition })
    }
}

/// Binds every request to the given connection.
///
/// Any scope already restricted by outer middleware is kept.
///
/// Use it to serve a router from a different connection than its state
/// carries, for example one per tenant:
///
/// ```rust,ignore
/// let app = autocrud::crud::<dummy::Model, _>(Router::new(), "/dummies", &Config::default())
///     .layer(axum::middleware::from_fn_with_state(tenant_db, autocrud::bind_session))
///     .with_state(default_db);
/// ```
pub async fn bind_session(
    State(db): State<DatabaseConnection>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(db);
    next.run(request).await
}
