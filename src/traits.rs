//! The resource contract every CRUD-managed entity implements.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, IntoActiveModel,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::validation::Validatable;

/// Shallow merge of an update payload over an existing active model: fields
/// present in the payload overwrite, absent fields keep the stored value.
pub trait MergeIntoActiveModel<ActiveModelType> {
    /// # Errors
    ///
    /// Returns a `DbErr` if the merge fails due to data conversion issues.
    fn merge_into_activemodel(self, existing: ActiveModelType) -> Result<ActiveModelType, DbErr>;
}

/// Implemented once per entity to plug it into [`CrudService`] and the router
/// façade.
///
/// The implementing type is the API representation of one persisted row; it
/// must be constructible from the Sea-ORM model and serializable, since
/// archival delete policies persist its JSON snapshot. Rows follow the shared
/// column convention: integer `id` primary key plus `ctime`/`mtime`/`dtime`
/// Unix-second columns, with `dtime = 0` marking a live row.
///
/// The three `touch_*`/`mark_deleted` methods are the insert/update lifecycle
/// hooks: the service calls them to stamp timestamps on the active model
/// before persisting.
///
/// [`CrudService`]: crate::service::CrudService
pub trait CrudResource: Sized + Send + Sync + Serialize + 'static
where
    Self::EntityType: EntityTrait<Column = Self::ColumnType> + Sync,
    Self::ActiveModelType:
        ActiveModelTrait<Entity = Self::EntityType> + ActiveModelBehavior + Send + Sync,
    <Self::EntityType as EntityTrait>::Model: Sync + IntoActiveModel<Self::ActiveModelType>,
    Self: From<<Self::EntityType as EntityTrait>::Model>,
{
    type EntityType: EntityTrait + Sync;
    type ColumnType: ColumnTrait + Copy + std::fmt::Debug;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>;
    type CreateModel: Into<Self::ActiveModelType> + Validatable + DeserializeOwned + Send + 'static;
    type UpdateModel: MergeIntoActiveModel<Self::ActiveModelType>
        + Validatable
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    const ID_COLUMN: Self::ColumnType;
    /// Tombstone column; zero means the row is live.
    const DELETED_AT_COLUMN: Self::ColumnType;
    const TABLE_NAME: &'static str;
    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;

    /// Identifier of this record.
    fn id(&self) -> i64;

    /// Columns the filter translator accepts. Filters naming anything else
    /// are rejected with a 400.
    #[must_use]
    fn filterable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Columns the sort specification accepts; unknown fields are ignored.
    #[must_use]
    fn sortable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Column used for the deterministic default ordering (descending).
    #[must_use]
    fn default_sort_column() -> Self::ColumnType {
        Self::ID_COLUMN
    }

    /// Stamp creation and modification times on a fresh active model.
    fn touch_created(model: &mut Self::ActiveModelType, timestamp: i64);

    /// Refresh the modification time before an update is persisted.
    fn touch_updated(model: &mut Self::ActiveModelType, timestamp: i64);

    /// Set the tombstone timestamp. Only the tombstone delete policy calls
    /// this; there is no reverse transition.
    fn mark_deleted(model: &mut Self::ActiveModelType, timestamp: i64);
}
