//! InstanceInfo database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::InstanceInfo;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "instance_info")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub instance_info_name: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for InstanceInfo {
    fn from(model: Model) -> Self {
        InstanceInfo {
            id: Some(model.id),
            instance_info_name: model.instance_info_name,
            description: model.description,
        }
    }
}
