use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crudbase::{CrudResource, MergeIntoActiveModel, Validatable, Violations};

pub mod person {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "person")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub name: String,
        pub age: i64,
        pub status: i64,
        pub ctime: i64,
        pub mtime: i64,
        pub dtime: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// API representation of one person row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub status: i64,
    pub ctime: i64,
    pub mtime: i64,
    pub dtime: i64,
}

impl From<person::Model> for Person {
    fn from(model: person::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            age: model.age,
            status: model.status,
            ctime: model.ctime,
            mtime: model.mtime,
            dtime: model.dtime,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PersonCreate {
    pub name: String,
    pub age: i64,
    #[serde(default)]
    pub status: i64,
}

impl From<PersonCreate> for person::ActiveModel {
    fn from(body: PersonCreate) -> Self {
        person::ActiveModel {
            name: Set(body.name),
            age: Set(body.age),
            status: Set(body.status),
            dtime: Set(0),
            ..Default::default()
        }
    }
}

impl Validatable for PersonCreate {
    fn validate(&self) -> Result<(), Violations> {
        let mut violations = Violations::new();
        if self.name.trim().is_empty() {
            violations.add("name", "name must not be empty");
        }
        if self.age < 0 {
            violations.add("age", "age must not be negative");
        }
        violations.result()
    }
}

#[derive(Debug, Deserialize)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub status: Option<i64>,
}

impl MergeIntoActiveModel<person::ActiveModel> for PersonUpdate {
    fn merge_into_activemodel(
        self,
        mut existing: person::ActiveModel,
    ) -> Result<person::ActiveModel, DbErr> {
        if let Some(name) = self.name {
            existing.name = Set(name);
        }
        if let Some(age) = self.age {
            existing.age = Set(age);
        }
        if let Some(status) = self.status {
            existing.status = Set(status);
        }
        Ok(existing)
    }
}

impl Validatable for PersonUpdate {
    fn validate(&self) -> Result<(), Violations> {
        let mut violations = Violations::new();
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                violations.add("name", "name must not be empty");
            }
        }
        if let Some(age) = self.age {
            if age < 0 {
                violations.add("age", "age must not be negative");
            }
        }
        violations.result()
    }
}

impl CrudResource for Person {
    type EntityType = person::Entity;
    type ColumnType = person::Column;
    type ActiveModelType = person::ActiveModel;
    type CreateModel = PersonCreate;
    type UpdateModel = PersonUpdate;

    const ID_COLUMN: person::Column = person::Column::Id;
    const DELETED_AT_COLUMN: person::Column = person::Column::Dtime;
    const TABLE_NAME: &'static str = "person";
    const RESOURCE_NAME_SINGULAR: &'static str = "person";
    const RESOURCE_NAME_PLURAL: &'static str = "people";

    fn id(&self) -> i64 {
        self.id
    }

    fn filterable_columns() -> Vec<(&'static str, person::Column)> {
        vec![
            ("id", person::Column::Id),
            ("name", person::Column::Name),
            ("age", person::Column::Age),
            ("status", person::Column::Status),
        ]
    }

    fn sortable_columns() -> Vec<(&'static str, person::Column)> {
        vec![
            ("id", person::Column::Id),
            ("name", person::Column::Name),
            ("age", person::Column::Age),
            ("status", person::Column::Status),
        ]
    }

    fn touch_created(model: &mut person::ActiveModel, timestamp: i64) {
        model.ctime = Set(timestamp);
        model.mtime = Set(timestamp);
    }

    fn touch_updated(model: &mut person::ActiveModel, timestamp: i64) {
        model.mtime = Set(timestamp);
    }

    fn mark_deleted(model: &mut person::ActiveModel, timestamp: i64) {
        model.dtime = Set(timestamp);
    }
}
