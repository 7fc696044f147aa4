#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;
use serde_json::Value;
use tower::ServiceExt;

pub mod dummy_entity;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// A database holding `count` dummies, `Dummy 1` with value 1 and so on.
pub async fn setup_seeded_db(count: i32) -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;
    for i in 1..=count {
        dummy_entity::ActiveModel {
            name: Set(format!("Dummy {i}")),
            value: Set(i),
            skip: Set(Some(format!("hidden {i}"))),
            ..Default::default()
        }
        .insert(&db)
        .await?;
    }
    Ok(db)
}

/// A database holding dummies with the given values, ids counting up from 1.
pub async fn setup_db_with_values(values: &[i32]) -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;
    for (i, value) in values.iter().enumerate() {
        dummy_entity::ActiveModel {
            name: Set(format!("Dummy {}", i + 1)),
            value: Set(*value),
            ..Default::default()
        }
        .insert(&db)
        .await?;
    }
    Ok(db)
}

/// Sends one request and returns the status and the decoded JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.map_or_else(Body::empty, |body| Body::from(body.to_string())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateDummyTable)]
    }
}

pub struct CreateDummyTable;

#[async_trait::async_trait]
impl MigrationName for CreateDummyTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_dummy_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateDummyTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(DummyEntity)
            .if_not_exists()
            .col(
                ColumnDef::new(DummyColumn::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(DummyColumn::Name).string().not_null())
            .col(
                ColumnDef::new(DummyColumn::Value)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(DummyColumn::Skip).string().null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DummyEntity).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum DummyColumn {
    Id,
    Name,
    Value,
    Skip,
}

impl Iden for DummyColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
                Self::Value => "value",
                Self::Skip => "skip",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct DummyEntity;

impl Iden for DummyEntity {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "dummies").unwrap();
    }
}
