use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ColumnType, Condition, DatabaseConnection,
    DbErr, EntityTrait, FromQueryResult, IdenStatic, IntoActiveModel, Iterable, ModelTrait,
    PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder, TryIntoModel,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::fmt::Display;
use uuid::Uuid;

/// Column enum of a resource's entity.
pub type ColumnOf<T> = <<T as CrudResource>::EntityType as EntityTrait>::Column;

/// Primary key value type of a resource's entity.
pub type PrimaryKeyOf<T> =
    <<<T as CrudResource>::EntityType as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// A Sea-ORM model that can be served through generated CRUD endpoints.
///
/// The implementing type is the entity's `Model` itself. Its JSON field names
/// must match its column names, which is what `DeriveEntityModel` produces
/// unless serde renames are added.
///
/// A create request may leave out primary key fields; the database assigns
/// them. The model only has to deserialize with the key present, so integer,
/// UUID and string keys need no `#[serde(default)]`.
///
/// ```rust,ignore
/// #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
/// #[sea_orm(table_name = "dummies")]
/// pub struct Model {
///     #[sea_orm(primary_key)]
///     pub id: i32,
///     pub name: String,
/// }
///
/// impl CrudResource for Model {
///     type EntityType = Entity;
///     type ActiveModelType = ActiveModel;
///     type Id = i32;
///
///     const RESOURCE_NAME_SINGULAR: &'static str = "dummy";
///     const RESOURCE_NAME_PLURAL: &'static str = "dummies";
/// }
/// ```
#[async_trait]
pub trait CrudResource:
    Sized + Clone + Send + Sync + Serialize + DeserializeOwned + 'static
where
    Self: IntoActiveModel<Self::ActiveModelType>
        + ModelTrait<Entity = Self::EntityType>
        + FromQueryResult,
{
    type EntityType: EntityTrait<Model = Self> + Sync;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>
        + ActiveModelBehavior
        + TryIntoModel<Self>
        + Send
        + Sync;
    /// Path parameter type addressing one record.
    type Id: Into<PrimaryKeyOf<Self>> + DeserializeOwned + Clone + Display + Send + Sync + 'static;

    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;

    /// Lists the records within `condition`, ordered by primary key.
    async fn find_all(db: &DatabaseConnection, condition: &Condition) -> Result<Vec<Self>, DbErr> {
        let mut query = Self::EntityType::find().filter(condition.clone());
        for key in <<Self::EntityType as EntityTrait>::PrimaryKey as Iterable>::iter() {
            query = query.order_by_asc(key.into_column());
        }
        query.all(db).await
    }

    /// Looks a record up by key, but only within `condition`.
    async fn find_one(
        db: &DatabaseConnection,
        id: Self::Id,
        condition: &Condition,
    ) -> Result<Option<Self>, DbErr> {
        Self::EntityType::find_by_id(id)
            .filter(condition.clone())
            .one(db)
            .await
    }

    /// Inserts a record from a JSON object keyed by column name.
    ///
    /// Columns missing from `payload` stay unset, so auto-increment keys and
    /// column defaults are filled by the database.
    async fn create(db: &DatabaseConnection, payload: serde_json::Value) -> Result<Self, DbErr> {
        let Value::Object(mut payload) = payload else {
            return Err(DbErr::Json("payload must be a JSON object".to_string()));
        };
        let generated = fill_missing_keys::<Self>(&mut payload);
        let mut active_model = Self::ActiveModelType::from_json(Value::Object(payload))?;
        for column in generated {
            active_model.not_set(column);
        }
        active_model.insert(db).await
    }

    /// Writes every column present in `payload` onto the row of `existing`.
    ///
    /// The primary key always comes from `existing`.
    async fn save(
        db: &DatabaseConnection,
        existing: Self,
        payload: serde_json::Value,
    ) -> Result<Self, DbErr> {
        let mut active_model: Self::ActiveModelType = existing.clone().into_active_model();
        active_model.set_from_json(payload)?;
        if !active_model.is_changed() {
            return Ok(existing);
        }
        active_model.update(db).await
    }

    async fn remove(db: &DatabaseConnection, existing: Self) -> Result<(), DbErr> {
        let active_model: Self::ActiveModelType = existing.into_active_model();
        let res = active_model.delete(db).await?;
        match res.rows_affected {
            0 => Err(DbErr::RecordNotFound(format!(
                "{} not found",
                Self::RESOURCE_NAME_SINGULAR
            ))),
            _ => Ok(()),
        }
    }

    /// Fields accepted as query parameters on the list endpoint.
    ///
    /// Defaults to every column under its column name. Override to hide
    /// fields that are not part of the public representation.
    #[must_use]
    fn filterable_columns() -> Vec<(String, ColumnOf<Self>)> {
        <ColumnOf<Self> as Iterable>::iter()
            .map(|column| (column.as_str().to_owned(), column))
            .collect()
    }
}

/// Gives every primary key column missing from `payload` a stand-in value, so
/// the model deserializes without `#[serde(default)]` on its key. Returns the
/// columns filled in; their values must not be stored.
pub(crate) fn fill_missing_keys<T: CrudResource>(payload: &mut Map<String, Value>) -> Vec<ColumnOf<T>> {
    let missing: Vec<ColumnOf<T>> = <<T::EntityType as EntityTrait>::PrimaryKey as Iterable>::iter()
        .map(PrimaryKeyToColumn::into_column)
        .filter(|column| !payload.contains_key(column.as_str()))
        .collect();
    for column in &missing {
        if let Some(placeholder) = key_placeholder(column.def().get_column_type()) {
            payload.insert(column.as_str().to_owned(), placeholder);
        }
    }
    missing
}

fn key_placeholder(column_type: &ColumnType) -> Option<Value> {
    match column_type {
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::Integer
        | ColumnType::BigInteger
        | ColumnType::TinyUnsigned
        | ColumnType::SmallUnsigned
        | ColumnType::Unsigned
        | ColumnType::BigUnsigned => Some(Value::from(0)),
        ColumnType::Uuid => Some(Value::String(Uuid::nil().to_string())),
        ColumnType::String(_) | ColumnType::Text | ColumnType::Char(_) => {
            Some(Value::String(String::new()))
        }
        _ => None,
    }
}
