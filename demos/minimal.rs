//! Minimal CRUD API
//!
//! ```bash
//! cargo run --example minimal
//! ```
//!
//! Then try:
//! - `curl -X POST localhost:3000/dummies -d '{"name": "first", "value": 1}'`
//! - `curl localhost:3000/dummies?value=1`
//!
//! `DATABASE_URL` (default `sqlite::memory:`) and `BIND_ADDR` (default
//! `0.0.0.0:3000`) override the defaults.

use autocrud::{Config, CrudResource};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::env;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dummies")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub value: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}
impl ActiveModelBehavior for ActiveModel {}

impl CrudResource for Model {
    type EntityType = Entity;
    type ActiveModelType = ActiveModel;
    type Id = i32;

    const RESOURCE_NAME_SINGULAR: &'static str = "dummy";
    const RESOURCE_NAME_PLURAL: &'static str = "dummies";
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
        r"CREATE TABLE IF NOT EXISTS dummies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            value INTEGER NOT NULL DEFAULT 0
        );"
        .to_owned(),
    ))
    .await?;

    let app = autocrud::router::<Model>("/dummies", &db, &Config::new().query_params(true))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("API: http://{bind_addr}/dummies");
    axum::serve(listener, app).await?;
    Ok(())
}
