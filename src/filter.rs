//! Translation of encoded filter predicates into Sea-ORM conditions.
//!
//! A filter specification maps a column name to one or more encoded predicate
//! strings of the form `operator:value` or `or:operator:value`. The value part
//! may itself contain the `:` delimiter and is rejoined verbatim, then
//! opportunistically parsed as JSON so both scalars (`gte:18`) and structured
//! operands (`in:[1,2,3]`) work.

use sea_orm::{sea_query::SimpleExpr, ColumnTrait, Condition};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const DELIMITER: char = ':';
const OR_MARKER: &str = "or";

/// Comparison operators accepted in encoded predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FromStr for FilterOperator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Eq),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            "in" => Ok(Self::In),
            other => Err(FilterError::UnknownOperator(other.to_string())),
        }
    }
}

/// Errors raised while translating a filter specification.
///
/// Unknown operators are rejected rather than silently dropped, keeping the
/// filter layer consistent with the validation-first endpoint surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The `filter` query parameter was not a JSON object of predicates.
    InvalidFilterJson(String),
    /// Operator token not in the supported set.
    UnknownOperator(String),
    /// Predicate string missing an operator or value part.
    MalformedPredicate(String),
    /// Field is not declared filterable by the resource.
    UnknownField(String),
    /// Value cannot be used with the given operator.
    InvalidOperand(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFilterJson(detail) => write!(f, "invalid filter JSON: {detail}"),
            Self::UnknownOperator(op) => write!(f, "unknown filter operator '{op}'"),
            Self::MalformedPredicate(raw) => write!(f, "malformed filter predicate '{raw}'"),
            Self::UnknownField(field) => write!(f, "'{field}' is not a filterable field"),
            Self::InvalidOperand(detail) => write!(f, "invalid filter operand: {detail}"),
        }
    }
}

impl std::error::Error for FilterError {}

/// One decoded predicate: operator, coerced value, and whether it joins the
/// rest of the filter disjunctively.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub operator: FilterOperator,
    pub value: JsonValue,
    pub disjunctive: bool,
}

/// Parse a single encoded predicate string.
///
/// Splits on `:`; a leading `or` token marks the predicate disjunctive and
/// shifts the operator to the second token. Remaining tokens are rejoined with
/// the delimiter so values containing `:` survive intact.
///
/// # Errors
///
/// Returns a [`FilterError`] for unknown operators and for predicates missing
/// an operator or value part.
pub fn parse_predicate(raw: &str) -> Result<Predicate, FilterError> {
    let tokens: Vec<&str> = raw.split(DELIMITER).collect();
    let (op_token, value_tokens, disjunctive) = if tokens[0] == OR_MARKER {
        match tokens.get(1) {
            Some(op) => (*op, &tokens[2..], true),
            None => return Err(FilterError::MalformedPredicate(raw.to_string())),
        }
    } else {
        (tokens[0], &tokens[1..], false)
    };
    if value_tokens.is_empty() {
        return Err(FilterError::MalformedPredicate(raw.to_string()));
    }
    let operator = op_token.parse()?;
    let value = coerce_value(&value_tokens.join(":"));
    Ok(Predicate { operator, value, disjunctive })
}

/// Parse the value substring as a JSON literal, falling back to the raw string.
fn coerce_value(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

fn scalar_value(value: &JsonValue) -> Result<sea_orm::Value, FilterError> {
    match value {
        JsonValue::Bool(b) => Ok((*b).into()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i.into())
            } else if let Some(f) = n.as_f64() {
                Ok(f.into())
            } else {
                Err(FilterError::InvalidOperand(n.to_string()))
            }
        }
        JsonValue::String(s) => Ok(s.clone().into()),
        other => Err(FilterError::InvalidOperand(other.to_string())),
    }
}

fn predicate_expr<C>(column: C, predicate: &Predicate) -> Result<SimpleExpr, FilterError>
where
    C: ColumnTrait + Copy,
{
    match predicate.operator {
        FilterOperator::In => {
            let items = match &predicate.value {
                JsonValue::Array(values) => values
                    .iter()
                    .map(scalar_value)
                    .collect::<Result<Vec<_>, _>>()?,
                // A scalar operand is treated as a one-element set.
                other => vec![scalar_value(other)?],
            };
            Ok(column.is_in(items))
        }
        FilterOperator::Eq if predicate.value.is_null() => Ok(column.is_null()),
        operator => {
            let value = scalar_value(&predicate.value)?;
            Ok(match operator {
                FilterOperator::Eq => column.eq(value),
                FilterOperator::Gt => column.gt(value),
                FilterOperator::Gte => column.gte(value),
                FilterOperator::Lt => column.lt(value),
                FilterOperator::Lte => column.lte(value),
                FilterOperator::In => unreachable!("handled above"),
            })
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FilterEntry {
    One(String),
    Many(Vec<String>),
}

/// Build a [`Condition`] from a JSON-encoded filter specification.
///
/// Conjunctive predicates accumulate into an AND group. If any predicate is
/// marked `or`, the result becomes an OR over the AND group and each
/// disjunctive predicate, so `{"status": ["eq:1", "or:eq:2"]}` reads
/// `status = 1 OR status = 2`.
///
/// # Errors
///
/// Returns a [`FilterError`] for invalid JSON, fields outside
/// `filterable_columns`, and any predicate the parser rejects.
pub fn apply_filters<C>(
    filter_str: Option<&str>,
    filterable_columns: &[(&str, C)],
) -> Result<Condition, FilterError>
where
    C: ColumnTrait + Copy,
{
    let Some(raw) = filter_str else {
        return Ok(Condition::all());
    };
    let spec: HashMap<String, FilterEntry> =
        serde_json::from_str(raw).map_err(|err| FilterError::InvalidFilterJson(err.to_string()))?;

    let mut conjunctive = Condition::all();
    let mut has_conjunctive = false;
    let mut disjunctive: Vec<SimpleExpr> = Vec::new();

    for (field, entry) in &spec {
        let column = filterable_columns
            .iter()
            .find(|(name, _)| *name == field.as_str())
            .map(|(_, column)| *column)
            .ok_or_else(|| FilterError::UnknownField(field.clone()))?;
        let encoded: Vec<&str> = match entry {
            FilterEntry::One(s) => vec![s.as_str()],
            FilterEntry::Many(values) => values.iter().map(String::as_str).collect(),
        };
        for raw_predicate in encoded {
            let predicate = parse_predicate(raw_predicate)?;
            let expr = predicate_expr(column, &predicate)?;
            if predicate.disjunctive {
                disjunctive.push(expr);
            } else {
                conjunctive = conjunctive.add(expr);
                has_conjunctive = true;
            }
        }
    }

    if disjunctive.is_empty() {
        return Ok(conjunctive);
    }
    let mut any = Condition::any();
    if has_conjunctive {
        any = any.add(conjunctive);
    }
    for expr in disjunctive {
        any = any.add(expr);
    }
    Ok(any)
}
