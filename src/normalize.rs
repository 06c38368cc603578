//! Filter normalization.
//!
//! Callers write filters in a compact shorthand: a bare scalar means
//! equality, a `/pattern/` string means a regex match, a bare list means
//! membership, and the reserved `and` / `or` / `any` / `not` keys nest
//! whole sub-filters. The construction protocol only understands one shape,
//! so this module rewrites the shorthand into the canonical form:
//!
//! - every condition is `{field: {operator: operand}}`
//! - combinators are `{"and": [...]}`, `{"or": [...]}`, `{"any": [...]}`,
//!   `{"not": {...}}`
//!
//! Keys are visited in sorted order (filters are [`Map`]s), so the output
//! depends only on the filter's content.
//!
//! # Examples
//!
//! ```
//! use polyquery::{normalize, Map, Value};
//!
//! let mut filter = Map::new();
//! filter.insert("status".to_string(), Value::from("ok"));
//! let canonical = normalize(&Value::Object(filter)).unwrap();
//! // {"status": {"eq": "ok"}}
//! ```

use log::trace;

use crate::error::{Error, Result};
use crate::value::{Map, Value, type_name};

/// Reserved combinator keys recognized at the field-name position.
pub const RESERVED_KEYS: [&str; 4] = ["and", "or", "any", "not"];

/// Rewrites a shorthand filter into canonical boolean-expression form.
///
/// Zero conditions normalize to `{"and": []}`; a single condition is
/// returned unwrapped; several conditions are conjoined under `"and"`.
///
/// # Errors
///
/// [`Error::InvalidQuery`] when the filter is not an object, a field's
/// filter-spec has an unrecognized shape, or a list operand appears under
/// an operator other than `in` / `nin`.
pub fn normalize(filter: &Value) -> Result<Value> {
    let map = filter.as_object().ok_or_else(|| {
        Error::InvalidQuery(format!(
            "a filter must be an object, got {}",
            type_name(filter)
        ))
    })?;
    normalize_map(map)
}

fn normalize_map(filter: &Map) -> Result<Value> {
    let mut exprs: Vec<Value> = Vec::new();

    for (tag, tag_filter) in filter {
        match tag_filter {
            Value::String(s) => {
                if let Some(pattern) = strip_slashes(s) {
                    exprs.push(condition(tag, "regex", Value::from(pattern)));
                } else {
                    exprs.push(condition(tag, "eq", tag_filter.clone()));
                }
            }
            Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::DateTime(_) => {
                exprs.push(condition(tag, "eq", tag_filter.clone()));
            }
            Value::Array(items) => match tag.as_str() {
                // Conjuncts splice straight into the surrounding conjunction.
                "and" => {
                    for item in items {
                        exprs.push(normalize_branch(tag, item)?);
                    }
                }
                "or" | "any" => {
                    let branches = items
                        .iter()
                        .map(|item| normalize_branch(tag, item))
                        .collect::<Result<Vec<_>>>()?;
                    exprs.push(combinator(tag, Value::Array(branches)));
                }
                "not" => {
                    return Err(Error::InvalidQuery(
                        "\"not\" takes a nested filter object, not a list".to_string(),
                    ));
                }
                _ => {
                    for item in items {
                        if !item.is_scalar() {
                            return Err(Error::InvalidQuery(format!(
                                "membership list for \"{}\" may only hold scalars, got {}",
                                tag,
                                type_name(item)
                            )));
                        }
                    }
                    exprs.push(condition(tag, "in", tag_filter.clone()));
                }
            },
            Value::Object(inner) => {
                if tag == "not" {
                    exprs.push(combinator("not", normalize_map(inner)?));
                } else {
                    for (op, operand) in inner {
                        if operand.is_scalar() {
                            exprs.push(condition(tag, op, operand.clone()));
                        } else if matches!(operand, Value::Array(_)) {
                            if op == "in" || op == "nin" {
                                exprs.push(condition(tag, op, operand.clone()));
                            } else {
                                return Err(Error::InvalidQuery(format!(
                                    "the \"{}\" operator does not apply to a list",
                                    op
                                )));
                            }
                        } else {
                            return Err(Error::InvalidQuery(format!(
                                "query condition for \"{}.{}\" is unrecognized: {} operand",
                                tag,
                                op,
                                type_name(operand)
                            )));
                        }
                    }
                }
            }
            other => {
                return Err(Error::InvalidQuery(format!(
                    "invalid filter for \"{}\": a field's filter must be a regex string, \
                     scalar, list, or {{operator: operand}} object, got {}",
                    tag,
                    type_name(other)
                )));
            }
        }
    }

    trace!("normalized filter into {} condition(s)", exprs.len());
    if exprs.len() == 1 {
        Ok(exprs.remove(0))
    } else {
        Ok(combinator("and", Value::Array(exprs)))
    }
}

/// A branch of an `and`/`or`/`any` list must itself be a filter object.
fn normalize_branch(tag: &str, item: &Value) -> Result<Value> {
    match item.as_object() {
        Some(map) => normalize_map(map),
        None => Err(Error::InvalidQuery(format!(
            "each branch of \"{}\" must be a filter object, got {}",
            tag,
            type_name(item)
        ))),
    }
}

/// `/pattern/` shorthand: returns the inner pattern with slashes stripped.
fn strip_slashes(s: &str) -> Option<&str> {
    if s.len() >= 2 && s.starts_with('/') && s.ends_with('/') {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}

fn condition(field: &str, op: &str, operand: Value) -> Value {
    let mut inner = Map::new();
    inner.insert(op.to_string(), operand);
    let mut outer = Map::new();
    outer.insert(field.to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn combinator(key: &str, operand: Value) -> Value {
    let mut outer = Map::new();
    outer.insert(key.to_string(), operand);
    Value::Object(outer)
}
