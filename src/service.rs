//! Record lifecycle service: find/find-one/create/update/delete with a
//! configurable soft-delete and delete-completion policy.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseBackend,
    DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Statement,
};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::OnceLock;
use tokio::sync::Mutex;

use crate::filter::apply_filters;
use crate::models::{FindResult, ListQuery, PageInfo};
use crate::pagination::{resolve_page, to_offset_limit, wants_pagination, DEFAULT_PAGE_SIZE};
use crate::sort::parse_sort;
use crate::errors::CrudError;
use crate::traits::{CrudResource, MergeIntoActiveModel};

/// What happens to a row once `delete` resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Set the tombstone timestamp; the row stays in place but disappears
    /// from soft-delete-respecting reads.
    Tombstone,
    /// Remove the row. If [`ServiceOptions::delete_table`] is set, copy the
    /// prior snapshot there first.
    Hard,
    /// Remove the row and copy its prior snapshot into a dated
    /// `log_<table>_<period>` archive table, created on demand.
    HardArchive,
}

/// Naming granularity for archive tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchivePeriod {
    /// `log_<table>_<YYYY>`
    Yearly,
    /// `log_<table>_<YYYYMM>`
    Monthly,
}

impl ArchivePeriod {
    #[must_use]
    pub fn archive_table_name(self, table: &str, at: DateTime<Utc>) -> String {
        let suffix = match self {
            Self::Yearly => at.format("%Y"),
            Self::Monthly => at.format("%Y%m"),
        };
        format!("log_{table}_{suffix}")
    }
}

/// Immutable-after-construction service configuration.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Inject `dtime = 0` into every read. Defaults to true.
    pub find_inject_delete_where: bool,
    /// Delete-completion policy. Defaults to [`DeletePolicy::HardArchive`].
    pub delete_policy: DeletePolicy,
    /// Archive-table naming granularity. Defaults to [`ArchivePeriod::Yearly`].
    pub archive_period: ArchivePeriod,
    /// Page size used when pagination is requested without `pageSize`.
    pub default_page_size: u64,
    /// Snapshot table for the plain [`DeletePolicy::Hard`] policy.
    pub delete_table: Option<String>,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            find_inject_delete_where: true,
            delete_policy: DeletePolicy::HardArchive,
            archive_period: ArchivePeriod::Yearly,
            default_page_size: DEFAULT_PAGE_SIZE,
            delete_table: None,
        }
    }
}

fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Archive tables verified or created by this process. The mutex is held
/// across the idempotent `CREATE TABLE IF NOT EXISTS`, so concurrent
/// first-time deletes for the same period serialize instead of racing.
static VERIFIED_ARCHIVE_TABLES: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

fn verified_archive_tables() -> &'static Mutex<HashSet<String>> {
    VERIFIED_ARCHIVE_TABLES.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Database-backed lifecycle operations for one resource type.
pub struct CrudService<R: CrudResource> {
    db: DatabaseConnection,
    options: ServiceOptions,
    _resource: PhantomData<fn() -> R>,
}

impl<R: CrudResource> CrudService<R> {
    #[must_use]
    pub fn new(db: DatabaseConnection, options: ServiceOptions) -> Self {
        Self { db, options, _resource: PhantomData }
    }

    #[must_use]
    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    fn read_condition(&self, filter: Option<&str>) -> Result<Condition, CrudError> {
        let filtered = apply_filters(filter, &R::filterable_columns())?;
        if self.options.find_inject_delete_where {
            Ok(Condition::all().add(filtered).add(R::DELETED_AT_COLUMN.eq(0)))
        } else {
            Ok(filtered)
        }
    }

    /// List records matching the query.
    ///
    /// Returns the full matching set, or one page plus a pagination block
    /// whose `count` ignores the page bounds.
    ///
    /// # Errors
    ///
    /// `BadRequest` for filter/sort errors and database failures.
    pub async fn find(&self, params: &ListQuery) -> Result<FindResult<R>, CrudError> {
        let condition = self.read_condition(params.filter.as_deref())?;
        let ordering = parse_sort(
            params.sort.as_deref(),
            &R::sortable_columns(),
            R::default_sort_column(),
        )?;

        let mut select = R::EntityType::find().filter(condition.clone());
        for (column, order) in ordering {
            select = select.order_by(column, order);
        }

        if wants_pagination(params) {
            let (page, page_size) = resolve_page(params, self.options.default_page_size);
            let (offset, limit) = to_offset_limit(page, page_size);
            let rows = select.offset(offset).limit(limit).all(&self.db).await?;
            let count = R::EntityType::find().filter(condition).count(&self.db).await?;
            Ok(FindResult::Paginated {
                list: rows.into_iter().map(R::from).collect(),
                pagination: PageInfo { count, page, page_size },
            })
        } else {
            let rows = select.all(&self.db).await?;
            Ok(FindResult::List { list: rows.into_iter().map(R::from).collect() })
        }
    }

    async fn fetch_model(
        &self,
        id: i64,
    ) -> Result<<R::EntityType as EntityTrait>::Model, CrudError> {
        let mut condition = Condition::all().add(R::ID_COLUMN.eq(id));
        if self.options.find_inject_delete_where {
            condition = condition.add(R::DELETED_AT_COLUMN.eq(0));
        }
        R::EntityType::find()
            .filter(condition)
            .one(&self.db)
            .await?
            .ok_or_else(|| CrudError::not_found(R::RESOURCE_NAME_SINGULAR, Some(id.to_string())))
    }

    /// Fetch a single record by identifier.
    ///
    /// # Errors
    ///
    /// `NotFound` when zero rows match, including rows hidden by the
    /// soft-delete read mode.
    pub async fn find_one(&self, id: i64) -> Result<R, CrudError> {
        self.fetch_model(id).await.map(R::from)
    }

    /// Persist a new record, stamping `ctime`/`mtime`.
    ///
    /// Payload validation happens upstream in the endpoint façade.
    ///
    /// # Errors
    ///
    /// `BadRequest` on persistence failure.
    pub async fn create(&self, body: R::CreateModel) -> Result<R, CrudError> {
        let mut active: R::ActiveModelType = body.into();
        R::touch_created(&mut active, unix_now());
        let model = active.insert(&self.db).await?;
        Ok(R::from(model))
    }

    /// Load, shallow-merge, and save.
    ///
    /// The load-merge-save sequence carries no optimistic-concurrency guard;
    /// concurrent writers can overwrite each other's fields.
    ///
    /// # Errors
    ///
    /// `NotFound` when the target does not exist (or is tombstoned under the
    /// soft-delete read mode), `BadRequest` on persistence failure.
    pub async fn update(&self, id: i64, body: R::UpdateModel) -> Result<R, CrudError> {
        let model = self.fetch_model(id).await?;
        let mut merged = body.merge_into_activemodel(model.into_active_model())?;
        R::touch_updated(&mut merged, unix_now());
        let updated = merged.update(&self.db).await?;
        Ok(R::from(updated))
    }

    /// Delete a record according to the configured policy.
    ///
    /// Archival bookkeeping failures are logged and swallowed; the delete
    /// itself still reports success.
    ///
    /// # Errors
    ///
    /// `NotFound` when the record does not exist or was already deleted,
    /// `BadRequest` on persistence failure.
    pub async fn delete(&self, id: i64) -> Result<bool, CrudError> {
        match self.options.delete_policy {
            DeletePolicy::Tombstone => {
                let model = self.fetch_model(id).await?;
                let mut active = model.into_active_model();
                let now = unix_now();
                R::mark_deleted(&mut active, now);
                R::touch_updated(&mut active, now);
                active.update(&self.db).await?;
                Ok(true)
            }
            DeletePolicy::Hard => {
                let snapshot = R::from(self.fetch_model(id).await?);
                self.delete_row(id).await?;
                if let Some(table) = self.options.delete_table.clone() {
                    if let Err(err) = self.insert_snapshot(&table, &snapshot).await {
                        tracing::error!(
                            table = %table,
                            error = %err,
                            "failed to copy deleted {} snapshot",
                            R::RESOURCE_NAME_SINGULAR
                        );
                    }
                }
                Ok(true)
            }
            DeletePolicy::HardArchive => {
                let snapshot = R::from(self.fetch_model(id).await?);
                self.delete_row(id).await?;
                if let Err(err) = self.archive_snapshot(&snapshot).await {
                    tracing::error!(
                        error = %err,
                        "failed to archive deleted {}",
                        R::RESOURCE_NAME_SINGULAR
                    );
                }
                Ok(true)
            }
        }
    }

    async fn delete_row(&self, id: i64) -> Result<(), CrudError> {
        R::EntityType::delete_many()
            .filter(R::ID_COLUMN.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn archive_snapshot(&self, snapshot: &R) -> Result<(), DbErr> {
        let table = self
            .options
            .archive_period
            .archive_table_name(R::TABLE_NAME, Utc::now());
        self.ensure_archive_table(&table).await?;
        self.insert_snapshot(&table, snapshot).await
    }

    async fn ensure_archive_table(&self, table: &str) -> Result<(), DbErr> {
        let mut verified = verified_archive_tables().lock().await;
        if verified.contains(table) {
            return Ok(());
        }
        let sql = match self.db.get_database_backend() {
            DatabaseBackend::MySql => {
                format!("CREATE TABLE IF NOT EXISTS {table} LIKE {}", R::TABLE_NAME)
            }
            _ => format!(
                "CREATE TABLE IF NOT EXISTS {table} AS SELECT * FROM {} WHERE 1 = 0",
                R::TABLE_NAME
            ),
        };
        self.db.execute_unprepared(&sql).await?;
        verified.insert(table.to_string());
        Ok(())
    }

    async fn insert_snapshot(&self, table: &str, snapshot: &R) -> Result<(), DbErr> {
        let json = serde_json::to_value(snapshot).map_err(|err| DbErr::Json(err.to_string()))?;
        let JsonValue::Object(fields) = json else {
            return Err(DbErr::Custom(format!(
                "{} snapshot did not serialize to an object",
                R::RESOURCE_NAME_SINGULAR
            )));
        };

        let mut columns = Vec::new();
        let mut values = Vec::new();
        for (column, value) in &fields {
            // Omitted nulls fall back to the archive table's column defaults.
            if value.is_null() {
                continue;
            }
            columns.push(column.clone());
            values.push(snapshot_value(value));
        }

        let backend = self.db.get_database_backend();
        let placeholders: Vec<String> = (1..=values.len())
            .map(|position| match backend {
                DatabaseBackend::Postgres => format!("${position}"),
                _ => "?".to_string(),
            })
            .collect();
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );
        self.db
            .execute(Statement::from_sql_and_values(backend, sql, values))
            .await?;
        Ok(())
    }
}

fn snapshot_value(value: &JsonValue) -> sea_orm::Value {
    match value {
        JsonValue::Bool(b) => (*b).into(),
        JsonValue::Number(n) => n
            .as_i64()
            .map_or_else(|| n.as_f64().unwrap_or_default().into(), Into::into),
        JsonValue::String(s) => s.clone().into(),
        // Structured fields are stored in serialized form.
        other => other.to_string().into(),
    }
}
