#![allow(dead_code)]

use axum::Router;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::prelude::*;

use crudbase::{CrudRouter, CrudService, ServiceOptions};

pub mod person_entity;

// Not every test binary touches every payload model.
#[allow(unused_imports)]
pub use person_entity::{person, Person, PersonCreate, PersonUpdate};

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn person_service(db: &DatabaseConnection, options: ServiceOptions) -> CrudService<Person> {
    CrudService::new(db.clone(), options)
}

pub fn setup_app(db: DatabaseConnection, options: ServiceOptions) -> Router {
    let api = CrudRouter::new(CrudService::<Person>::new(db, options)).build();
    Router::new().nest("/people", api)
}

/// Seed rows as `(name, age, status)` with fixed live timestamps.
pub async fn seed_people(
    db: &DatabaseConnection,
    rows: &[(&str, i64, i64)],
) -> Result<(), DbErr> {
    for (name, age, status) in rows {
        person::ActiveModel {
            name: Set((*name).to_string()),
            age: Set(*age),
            status: Set(*status),
            ctime: Set(1_700_000_000),
            mtime: Set(1_700_000_000),
            dtime: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreatePersonTable), Box::new(CreatePersonRemovedTable)]
    }
}

pub struct CreatePersonTable;

impl MigrationName for CreatePersonTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_person_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreatePersonTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(PersonIden::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(PersonIden::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(PersonIden::Name).string().not_null())
            .col(ColumnDef::new(PersonIden::Age).big_integer().not_null())
            .col(
                ColumnDef::new(PersonIden::Status)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(PersonIden::Ctime)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(PersonIden::Mtime)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(PersonIden::Dtime)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .to_owned();
        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PersonIden::Table).to_owned())
            .await
    }
}

/// Pre-provisioned snapshot table for the plain hard-delete policy.
pub struct CreatePersonRemovedTable;

impl MigrationName for CreatePersonRemovedTable {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_person_removed_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreatePersonRemovedTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(PersonRemovedIden::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(PersonRemovedIden::Id)
                    .big_integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(PersonRemovedIden::Name).string().not_null())
            .col(
                ColumnDef::new(PersonRemovedIden::Age)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(PersonRemovedIden::Status)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(PersonRemovedIden::Ctime)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(PersonRemovedIden::Mtime)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(PersonRemovedIden::Dtime)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .to_owned();
        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PersonRemovedIden::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PersonIden {
    #[sea_orm(iden = "person")]
    Table,
    Id,
    Name,
    Age,
    Status,
    Ctime,
    Mtime,
    Dtime,
}

#[derive(DeriveIden)]
enum PersonRemovedIden {
    #[sea_orm(iden = "person_removed")]
    Table,
    Id,
    Name,
    Age,
    Status,
    Ctime,
    Mtime,
    Dtime,
}
