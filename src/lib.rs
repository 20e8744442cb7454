//! Generic CRUD scaffolding for Axum and Sea-ORM.
//!
//! Implement [`CrudResource`] once per entity and get list/get/create/update/
//! delete endpoints backed by [`CrudService`], with encoded-predicate
//! filtering (`{"age": "gte:18"}`), opt-in pagination, a configurable
//! soft-delete / archival delete policy, per-endpoint decorator composition,
//! and post-processing hooks.

pub mod decorators;
pub mod errors;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod service;
pub mod sort;
pub mod traits;
pub mod validation;

pub use decorators::{Operation, RouteDecorators};
pub use errors::CrudError;
pub use models::{FindResult, ListQuery, PageInfo};
pub use routes::{AfterHooks, CrudContext, CrudRouter, NoHooks};
pub use service::{ArchivePeriod, CrudService, DeletePolicy, ServiceOptions};
pub use traits::{CrudResource, MergeIntoActiveModel};
pub use validation::{ConstraintViolation, Validatable, Violations};
