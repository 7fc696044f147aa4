use crate::errors::ApiError;
use crate::session::Session;
use crate::traits::{CrudResource, fill_missing_keys};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, rejection::PathRejection},
    http::StatusCode,
};
use sea_orm::IdenStatic;
use serde_json::{Map, Value};

/// Lists every record in the request's scope.
///
/// # Errors
/// - 500 if the query fails.
pub async fn get_all<T: CrudResource>(session: Session) -> Result<Json<Vec<T>>, ApiError> {
    let items = T::find_all(&session.db, &session.condition)
        .await
        .map_err(ApiError::database)?;
    Ok(Json(items))
}

/// Returns one record by key.
///
/// # Errors
/// - 404 if no record in scope has this key, or the key does not parse.
/// - 500 if the query fails.
pub async fn get_one<T: CrudResource>(
    session: Session,
    id: Result<Path<T::Id>, PathRejection>,
) -> Result<Json<T>, ApiError> {
    let item = lookup::<T>(&session, id).await?;
    Ok(Json(item))
}

/// Creates a record from the JSON body and returns it with `201 Created`.
///
/// # Errors
/// - 400 if the body is not a JSON object or does not bind to `T`.
/// - 500 if the insert fails.
pub async fn create_one<T: CrudResource>(
    session: Session,
    body: Bytes,
) -> Result<(StatusCode, Json<T>), ApiError> {
    let payload = bind_new::<T>(&body)?;
    let created = T::create(&session.db, payload)
        .await
        .map_err(ApiError::database)?;
    tracing::debug!(resource = T::RESOURCE_NAME_SINGULAR, "created record");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Overlays the JSON body onto an existing record and saves it.
///
/// The record is looked up before the body is read, so a missing record is
/// reported as 404 even when the body is invalid.
///
/// # Errors
/// - 404 if no record in scope has this key.
/// - 400 if the body is not a JSON object or the result does not bind to `T`.
/// - 500 if the update fails.
pub async fn update_one<T: CrudResource>(
    session: Session,
    id: Result<Path<T::Id>, PathRejection>,
    body: Bytes,
) -> Result<Json<T>, ApiError> {
    let existing = lookup::<T>(&session, id).await?;
    let payload = bind_onto(&existing, &body)?;
    let updated = T::save(&session.db, existing, payload).await?;
    Ok(Json(updated))
}

/// Deletes one record and answers `204 No Content`.
///
/// # Errors
/// - 404 if no record in scope has this key.
/// - 500 if the delete fails.
pub async fn delete_one<T: CrudResource>(
    session: Session,
    id: Result<Path<T::Id>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let existing = lookup::<T>(&session, id).await?;
    T::remove(&session.db, existing).await?;
    tracing::debug!(resource = T::RESOURCE_NAME_SINGULAR, "deleted record");
    Ok(StatusCode::NO_CONTENT)
}

async fn lookup<T: CrudResource>(
    session: &Session,
    id: Result<Path<T::Id>, PathRejection>,
) -> Result<T, ApiError> {
    // A key that does not parse cannot address a record.
    let Path(id) = id.map_err(|rejection| {
        tracing::debug!(%rejection, "unparsable key");
        ApiError::not_found(T::RESOURCE_NAME_SINGULAR)
    })?;

    T::find_one(&session.db, id.clone(), &session.condition)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| {
            tracing::debug!(resource = T::RESOURCE_NAME_SINGULAR, %id, "record not found");
            ApiError::not_found(T::RESOURCE_NAME_SINGULAR)
        })
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice(body)? {
        Value::Object(object) => Ok(object),
        _ => Err(ApiError::bad_request("request body must be a JSON object")),
    }
}

fn to_object<T: CrudResource>(model: &T) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(model) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(ApiError::internal(format!(
            "{} does not serialize to a JSON object",
            T::RESOURCE_NAME_SINGULAR
        ))),
        Err(err) => Err(ApiError::internal(err.to_string())),
    }
}

/// Binds a create body to `T` and returns the row to insert.
///
/// Every column gets its bound value except primary key columns the client
/// left out, which the database generates.
pub(crate) fn bind_new<T: CrudResource>(body: &[u8]) -> Result<Value, ApiError> {
    let mut payload = parse_object(body)?;
    let missing_keys = fill_missing_keys::<T>(&mut payload);
    let model: T = serde_json::from_value(Value::Object(payload))?;

    let mut row = to_object(&model)?;
    for column in &missing_keys {
        row.remove(column.as_str());
    }
    Ok(Value::Object(row))
}

/// Overlays an update body onto `existing` and returns the resulting row.
pub(crate) fn bind_onto<T: CrudResource>(existing: &T, body: &[u8]) -> Result<Value, ApiError> {
    let payload = parse_object(body)?;
    let mut row = to_object(existing)?;
    row.extend(payload);

    let model: T = serde_json::from_value(Value::Object(row))?;
    Ok(Value::Object(to_object(&model)?))
}
