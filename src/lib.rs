//! Generic CRUD endpoints for Sea-ORM models on an Axum router.
//!
//! ```rust,ignore
//! let app = autocrud::api::<dummy::Model, _>(Router::new(), "/dummies").with_state(db);
//! ```

pub mod config;
pub mod errors;
pub mod filter;
pub mod register;
pub mod routes;
pub mod session;
pub mod traits;

pub use config::Config;
pub use errors::ApiError;
pub use filter::Filter;
pub use register::{api, create, crud, delete, read, router, update};
pub use session::{Scope, Session, bind_session};
pub use traits::CrudResource;
