//! # Error responses
//!
//! Every generated endpoint answers failures with one of a small, fixed set of
//! status codes:
//!
//! | failure                                  | status |
//! |------------------------------------------|--------|
//! | body or query parameter fails to bind    | 400    |
//! | the addressed record does not exist      | 404    |
//! | any other persistence failure            | 500    |
//!
//! The body is always `{"error": "<message>"}`. Database errors are logged
//! through `tracing` and replaced by a generic message before they reach the
//! client.
//!
//! ```rust,ignore
//! use autocrud::ApiError;
//!
//! async fn my_handler(db: DatabaseConnection, id: i32) -> Result<Json<Model>, ApiError> {
//!     let model = Entity::find_by_id(id)
//!         .one(&db)
//!         .await?
//!         .ok_or_else(|| ApiError::not_found("dummy"))?;
//!     Ok(Json(model))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

/// Failure of a generated endpoint, rendered as a JSON error response.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - the request body or a query parameter did not bind
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 404 Not Found - no record under the requested key (or outside the request scope)
    NotFound {
        /// Resource name, e.g. "dummy"
        resource: String,
    },

    /// 500 Internal Server Error - database error (details logged, not exposed)
    Database {
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },

    /// 500 Internal Server Error - anything else that went wrong server-side
    Internal {
        /// Internal error details (logged, not sent to user)
        internal: String,
    },
}

impl ApiError {
    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 404 Not Found error for the named resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a 500 Internal Server Error from a database error.
    ///
    /// Unlike `From<DbErr>`, this never turns a missing record into a 404.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database { internal: err }
    }

    /// Create a 500 Internal Server Error with details for the log
    pub fn internal(internal: impl Into<String>) -> Self {
        Self::Internal {
            internal: internal.into(),
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The sanitized message sent to the client
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message } => message.clone(),
            Self::NotFound { resource } => format!("{resource} not found"),
            Self::Database { .. } => "A database error occurred".to_string(),
            Self::Internal { .. } => "Internal Server Error".to_string(),
        }
    }

    fn log(&self) {
        match self {
            Self::Database { internal } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal { internal } => {
                tracing::error!(details = %internal, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database { internal } => Some(internal),
            _ => None,
        }
    }
}

/// `RecordNotFound` and `RecordNotUpdated` become 404; every other `DbErr` is a 500.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => Self::NotFound {
                resource: msg
                    .split_whitespace()
                    .next()
                    .unwrap_or("Resource")
                    .to_string(),
            },
            DbErr::RecordNotUpdated => Self::NotFound {
                resource: "Resource".to_string(),
            },
            _ => Self::Database { internal: err },
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::bad_request(err.to_string())
    }
}
