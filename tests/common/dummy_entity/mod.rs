use autocrud::CrudResource;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dummies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub value: i32,
    // Stored, but never read from or written to JSON.
    #[serde(skip)]
    pub skip: Option<String>,
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

    fn filterable_columns() -> Vec<(String, Column)> {
        vec![
            ("id".to_string(), Column::Id),
            ("name".to_string(), Column::Name),
            ("value".to_string(), Column::Value),
        ]
    }
}

pub type Dummy = Model;
