//! Sort-specification parsing.
//!
//! The sort parameter is a JSON object mapping a column name to a direction:
//! `-1` sorts descending, any other value ascending. Fields are applied in
//! alphabetical order for determinism; unknown fields are skipped. An absent
//! or empty specification falls back to the identifier column descending so
//! pagination stays reproducible across pages.

use sea_orm::{ColumnTrait, Order};
use serde_json::{Map, Value as JsonValue};

use crate::filter::FilterError;

const DESCENDING: i64 = -1;

/// Parse a JSON-encoded sort object into ordered `(column, direction)` pairs.
///
/// Returns the `default_column` descending when the specification is absent,
/// empty, or names no sortable column.
///
/// # Errors
///
/// Returns [`FilterError::InvalidFilterJson`] when the parameter is not a
/// JSON object.
pub fn parse_sort<C>(
    sort_str: Option<&str>,
    sortable_columns: &[(&str, C)],
    default_column: C,
) -> Result<Vec<(C, Order)>, FilterError>
where
    C: ColumnTrait + Copy,
{
    let Some(raw) = sort_str else {
        return Ok(vec![(default_column, Order::Desc)]);
    };
    let spec: Map<String, JsonValue> =
        serde_json::from_str(raw).map_err(|err| FilterError::InvalidFilterJson(err.to_string()))?;

    let mut ordering = Vec::new();
    for (field, direction) in &spec {
        let Some(column) = find_column(field, sortable_columns) else {
            continue;
        };
        let order = if direction.as_i64() == Some(DESCENDING) {
            Order::Desc
        } else {
            Order::Asc
        };
        ordering.push((column, order));
    }
    if ordering.is_empty() {
        ordering.push((default_column, Order::Desc));
    }
    Ok(ordering)
}

fn find_column<C>(column_name: &str, columns: &[(&str, C)]) -> Option<C>
where
    C: ColumnTrait + Copy,
{
    columns
        .iter()
        .find(|&&(name, _)| name == column_name)
        .map(|&(_, column)| column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{entity::prelude::*, IdenStatic};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "sort_probe")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub age: i64,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    fn sortable() -> Vec<(&'static str, Column)> {
        vec![("id", Column::Id), ("age", Column::Age), ("name", Column::Name)]
    }

    fn names(ordering: &[(Column, Order)]) -> Vec<(String, Order)> {
        ordering
            .iter()
            .map(|&(column, ref order)| (column.as_str().to_string(), order.clone()))
            .collect()
    }

    #[test]
    fn absent_sort_defaults_to_id_descending() {
        let ordering = parse_sort(None, &sortable(), Column::Id).unwrap();
        assert_eq!(names(&ordering), vec![("id".to_string(), Order::Desc)]);
    }

    #[test]
    fn minus_one_means_descending() {
        let ordering = parse_sort(Some(r#"{"age": -1}"#), &sortable(), Column::Id).unwrap();
        assert_eq!(names(&ordering), vec![("age".to_string(), Order::Desc)]);
    }

    #[test]
    fn any_other_direction_means_ascending() {
        let ordering = parse_sort(Some(r#"{"age": 1}"#), &sortable(), Column::Id).unwrap();
        assert_eq!(names(&ordering), vec![("age".to_string(), Order::Asc)]);

        let ordering = parse_sort(Some(r#"{"age": 0}"#), &sortable(), Column::Id).unwrap();
        assert_eq!(names(&ordering), vec![("age".to_string(), Order::Asc)]);
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let ordering =
            parse_sort(Some(r#"{"ghost": -1, "age": -1}"#), &sortable(), Column::Id).unwrap();
        assert_eq!(names(&ordering), vec![("age".to_string(), Order::Desc)]);
    }

    #[test]
    fn all_unknown_fields_fall_back_to_default() {
        let ordering = parse_sort(Some(r#"{"ghost": -1}"#), &sortable(), Column::Id).unwrap();
        assert_eq!(names(&ordering), vec![("id".to_string(), Order::Desc)]);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = parse_sort(Some("not json"), &sortable(), Column::Id).unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterJson(_)));
    }
}
