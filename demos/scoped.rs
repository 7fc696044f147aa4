//! Scoped CRUD API
//!
//! Every request needs an `x-api-key` header, and only sees the notes of the
//! owner named in its `x-owner` header.
//!
//! ```bash
//! cargo run --example scoped
//! curl -H 'x-api-key: demo' -H 'x-owner: alice' localhost:3000/api/notes
//! ```

use autocrud::{Config, CrudResource};
use axum::{
    Json, Router,
    extract::{FromRef, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sea_orm::{Condition, ConnectionTrait, Database, DatabaseConnection, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::env;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notes")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    pub owner: String,
    pub body: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}
impl ActiveModelBehavior for ActiveModel {}

impl CrudResource for Model {
    type EntityType = Entity;
    type ActiveModelType = ActiveModel;
    type Id = i32;

    const RESOURCE_NAME_SINGULAR: &'static str = "note";
    const RESOURCE_NAME_PLURAL: &'static str = "notes";
}

#[derive(Clone, FromRef)]
struct AppState {
    db: DatabaseConnection,
}

async fn require_api_key(request: Request, next: Next) -> Response {
    let expected = env::var("API_KEY").unwrap_or_else(|_| "demo".to_string());
    match request.headers().get("x-api-key") {
        Some(key) if key.as_bytes() == expected.as_bytes() => next.run(request).await,
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "missing or invalid api key" })),
        )
            .into_response(),
    }
}

fn owner_scope(request: &Request) -> Option<Condition> {
    let owner = request.headers().get("x-owner")?.to_str().ok()?;
    Some(Condition::all().add(Column::Owner.eq(owner)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("autocrud=debug,tower_http=info")),
        )
        .init();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let db: DatabaseConnection = Database::connect(&database_url).await?;

    db.execute(sea_orm::Statement::from_string(
        db.get_database_backend(),
        r"CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner TEXT NOT NULL,
            body TEXT NOT NULL
        );"
        .to_owned(),
    ))
    .await?;

    let config = Config::new()
        .middleware(require_api_key)
        .filter(owner_scope)
        .query_params(true);

    let api = autocrud::crud::<Model, AppState>(Router::new(), "/notes", &config);
    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { db });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("API: http://{bind_addr}/api/notes");
    axum::serve(listener, app).await?;
    Ok(())
}
