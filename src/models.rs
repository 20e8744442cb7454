use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters accepted by the list endpoint.
///
/// # Filtering
/// The `filter` parameter is a JSON-encoded object mapping a column name to
/// one or more encoded predicates of the form `operator:value` or
/// `or:operator:value`:
/// ```json
/// {"age": "gte:18", "status": ["eq:1", "or:eq:2"]}
/// ```
/// Supported operators are `eq`, `gt`, `gte`, `lt`, `lte` and `in`. Predicates
/// combine with AND unless prefixed with `or:`, in which case they combine
/// with OR against the rest of the filter. Values are parsed as JSON where
/// possible (`in:[1,2,3]`), falling back to the raw string.
///
/// # Sorting
/// The `sort` parameter is a JSON-encoded object mapping a column name to a
/// direction, where `-1` means descending and anything else ascending:
/// ```json
/// {"age": -1}
/// ```
/// When absent, results are ordered by `id` descending.
///
/// # Pagination
/// Pagination applies when `paginate=true` or when both `page` and `pageSize`
/// are present. Both values are clamped to a minimum of 1.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// JSON-encoded filter object, e.g. `{"age": "gte:18"}`.
    #[param(example = json!({"age": "gte:18", "status": ["eq:1", "or:eq:2"]}))]
    pub filter: Option<String>,
    /// JSON-encoded sort object, e.g. `{"age": -1}`.
    #[param(example = json!({"age": -1}))]
    pub sort: Option<String>,
    /// 1-based page number.
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Number of items per page.
    #[param(example = 20)]
    #[serde(rename = "pageSize")]
    pub page_size: Option<u64>,
    /// Force pagination even when `page`/`pageSize` are absent.
    #[param(example = true)]
    pub paginate: Option<bool>,
}

/// Pagination block returned alongside a paginated list.
///
/// `count` is the total number of matching rows ignoring page bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageInfo {
    pub count: u64,
    pub page: u64,
    #[serde(rename = "pageSize")]
    pub page_size: u64,
}

/// Result of a list operation: the full matching set, or one page plus the
/// pagination block when pagination was requested.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum FindResult<T> {
    Paginated { list: Vec<T>, pagination: PageInfo },
    List { list: Vec<T> },
}

impl<T> FindResult<T> {
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Paginated { list, .. } | Self::List { list } => list,
        }
    }

    #[must_use]
    pub fn pagination(&self) -> Option<&PageInfo> {
        match self {
            Self::Paginated { pagination, .. } => Some(pagination),
            Self::List { .. } => None,
        }
    }
}
