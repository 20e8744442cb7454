//! Endpoint façade: five generic handlers over [`CrudService`] plus the
//! [`CrudRouter`] builder that wires them into an `axum::Router` with
//! decorators and post-processing hooks.

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;

use crate::decorators::{Operation, RouteDecorators};
use crate::errors::CrudError;
use crate::models::{FindResult, ListQuery};
use crate::service::CrudService;
use crate::traits::CrudResource;
use crate::validation::{Validatable, Violations};

/// Optional post-processing applied to each operation's result before it is
/// returned. Every method defaults to the identity.
#[async_trait]
pub trait AfterHooks<R: CrudResource>: Send + Sync {
    async fn after_find(&self, result: FindResult<R>) -> Result<FindResult<R>, CrudError> {
        Ok(result)
    }

    async fn after_find_one(&self, item: R) -> Result<R, CrudError> {
        Ok(item)
    }

    async fn after_create(&self, item: R) -> Result<R, CrudError> {
        Ok(item)
    }

    async fn after_update(&self, item: R) -> Result<R, CrudError> {
        Ok(item)
    }

    async fn after_delete(&self, deleted: bool) -> Result<bool, CrudError> {
        Ok(deleted)
    }
}

/// The no-op hook set.
pub struct NoHooks;

#[async_trait]
impl<R: CrudResource> AfterHooks<R> for NoHooks {}

/// Shared handler state: the lifecycle service plus the configured hooks.
pub struct CrudContext<R: CrudResource> {
    pub service: Arc<CrudService<R>>,
    pub hooks: Arc<dyn AfterHooks<R>>,
}

impl<R: CrudResource> Clone for CrudContext<R> {
    fn clone(&self) -> Self {
        Self { service: Arc::clone(&self.service), hooks: Arc::clone(&self.hooks) }
    }
}

fn check_valid(payload: &impl Validatable) -> Result<(), CrudError> {
    payload
        .validate()
        .map_err(|violations: Violations| CrudError::validation(violations.into_inner()))
}

/// `GET /`: list records matching the query string.
///
/// # Errors
///
/// `400` for filter/sort errors, `400` for persistence failures.
pub async fn list_all<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<FindResult<R>>, CrudError> {
    let result = ctx.service.find(&params).await?;
    let result = ctx.hooks.after_find(result).await?;
    Ok(Json(result))
}

/// `GET /{id}`: fetch one record.
///
/// # Errors
///
/// `404` when the record does not exist or is tombstoned.
pub async fn get_one<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
    Path(id): Path<i64>,
) -> Result<Json<R>, CrudError> {
    let item = ctx.service.find_one(id).await?;
    let item = ctx.hooks.after_find_one(item).await?;
    Ok(Json(item))
}

/// `POST /`: validate and persist a new record.
///
/// # Errors
///
/// `400` enumerating field violations when validation fails.
pub async fn create_one<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
    Json(payload): Json<R::CreateModel>,
) -> Result<(StatusCode, Json<R>), CrudError> {
    check_valid(&payload)?;
    let item = ctx.service.create(payload).await?;
    let item = ctx.hooks.after_create(item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /{id}`: validate a partial payload and merge it over the stored
/// record.
///
/// # Errors
///
/// `400` on validation failure, `404` when the target does not exist.
pub async fn update_one<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
    Path(id): Path<i64>,
    Json(payload): Json<R::UpdateModel>,
) -> Result<Json<R>, CrudError> {
    check_valid(&payload)?;
    let item = ctx.service.update(id, payload).await?;
    let item = ctx.hooks.after_update(item).await?;
    Ok(Json(item))
}

/// `DELETE /{id}`: delete under the configured policy; responds with a JSON
/// boolean success indicator.
///
/// # Errors
///
/// `404` when the record does not exist or was already deleted.
pub async fn delete_one<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
    Path(id): Path<i64>,
) -> Result<Json<bool>, CrudError> {
    let deleted = ctx.service.delete(id).await?;
    let deleted = ctx.hooks.after_delete(deleted).await?;
    Ok(Json(deleted))
}

/// Builder assembling one resource's five endpoints into a router.
///
/// ```rust,ignore
/// let router = CrudRouter::new(CrudService::<Person>::new(db, ServiceOptions::default()))
///     .decorators(decorators)
///     .hooks(AuditHooks)
///     .build();
/// let app = Router::new().nest("/people", router);
/// ```
pub struct CrudRouter<R: CrudResource> {
    service: CrudService<R>,
    decorators: RouteDecorators<CrudContext<R>>,
    hooks: Arc<dyn AfterHooks<R>>,
}

impl<R: CrudResource> CrudRouter<R> {
    #[must_use]
    pub fn new(service: CrudService<R>) -> Self {
        Self { service, decorators: RouteDecorators::default(), hooks: Arc::new(NoHooks) }
    }

    #[must_use]
    pub fn decorators(mut self, decorators: RouteDecorators<CrudContext<R>>) -> Self {
        self.decorators = decorators;
        self
    }

    #[must_use]
    pub fn hooks(mut self, hooks: impl AfterHooks<R> + 'static) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    /// Assemble the router: method-level decorators wrap each endpoint,
    /// router-level decorators wrap the whole, then the context is attached.
    #[must_use]
    pub fn build(self) -> Router {
        let Self { service, decorators, hooks } = self;
        let ctx = CrudContext { service: Arc::new(service), hooks };

        let collection = decorators
            .apply(Operation::List, get(list_all::<R>))
            .merge(decorators.apply(Operation::Create, post(create_one::<R>)));
        let member = decorators
            .apply(Operation::Get, get(get_one::<R>))
            .merge(decorators.apply(Operation::Update, put(update_one::<R>)))
            .merge(decorators.apply(Operation::Delete, delete(delete_one::<R>)));

        let router = Router::new().route("/", collection).route("/{id}", member);
        decorators.apply_router(router).with_state(ctx)
    }
}
