//! The construction protocol.
//!
//! [`build_expression`] walks a canonical [`Value`] together with the
//! discriminant registry. Candidate keys are derived from the value's shape:
//! a non-object value is a literal (its primitive type is the key); an
//! object yields its single top-level key and, when that key's value is a
//! non-empty object, the inner key as well, so one fragment can identify both
//! "this is an operator expression" and "this is specifically a not-equal".
//!
//! Candidates are tried in order. A lookup miss or an
//! [`Error::UnrecognizedExprType`] rejection advances to the next candidate;
//! exhausting all of them is [`Error::UnrecognizedNodeKind`]. Construction
//! only accepts canonical form; run shorthand filters through
//! [`crate::normalize`] first, or use [`expression_from_filter`].

use std::sync::LazyLock;

use log::trace;

use crate::ast::expressions::{Comparison, Expr, Literal, Logical, Operand};
use crate::ast::operators::{CompareOp, LogicalOp};
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::registry::{DiscriminantKey, Entry, FamilyId, Registry, ScalarKind, scalar_kind};
use crate::value::{Value, type_name};

static REGISTRY: LazyLock<Registry> =
    LazyLock::new(|| bootstrap().expect("discriminant registry bootstrap"));

/// The process-wide registry of node kinds, populated on first use and
/// read-only afterwards.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

fn bootstrap() -> Result<Registry> {
    let mut reg = Registry::new();

    reg.register(
        FamilyId::Expr,
        DiscriminantKey::tag("literal"),
        Entry::Family(FamilyId::Literal),
    )?;
    reg.register(
        FamilyId::Expr,
        DiscriminantKey::tag("operator_expr"),
        Entry::Family(FamilyId::Operator),
    )?;

    let literals: [(ScalarKind, &'static str, crate::registry::NodeBuilder); 5] = [
        (ScalarKind::String, "string literal", build_string_literal),
        (ScalarKind::Integer, "integer literal", build_integer_literal),
        (ScalarKind::Float, "float literal", build_float_literal),
        (ScalarKind::Boolean, "boolean literal", build_boolean_literal),
        (
            ScalarKind::DateTime,
            "datetime literal",
            build_datetime_literal,
        ),
    ];
    for (scalar, kind, build) in literals {
        reg.register(
            FamilyId::Literal,
            DiscriminantKey::Type(scalar),
            Entry::Final { kind, build },
        )?;
    }
    reg.register(
        FamilyId::Literal,
        DiscriminantKey::tag("regex"),
        Entry::Final {
            kind: "regex literal",
            build: build_regex_literal,
        },
    )?;
    reg.register(
        FamilyId::Literal,
        DiscriminantKey::tag("schema"),
        Entry::Final {
            kind: "schema identifier",
            build: build_schema_literal,
        },
    )?;

    for op in CompareOp::ALL {
        reg.register(
            FamilyId::Operator,
            DiscriminantKey::tag(op.key()),
            Entry::Final {
                kind: op.key(),
                build: build_comparison,
            },
        )?;
    }
    reg.register(
        FamilyId::Operator,
        DiscriminantKey::tag("not"),
        Entry::Final {
            kind: "not",
            build: build_not,
        },
    )?;
    for op in LogicalOp::ALL {
        reg.register(
            FamilyId::Operator,
            DiscriminantKey::tag(op.key()),
            Entry::Final {
                kind: op.key(),
                build: build_logical,
            },
        )?;
    }

    Ok(reg)
}

/// Candidate discriminant keys for a value, in the order they are tried.
fn candidate_keys(family: FamilyId, v: &Value) -> Vec<DiscriminantKey> {
    match family {
        FamilyId::Expr => match v {
            Value::Object(_) => vec![DiscriminantKey::tag("operator_expr")],
            _ => vec![DiscriminantKey::tag("literal")],
        },
        FamilyId::Literal => match scalar_kind(v) {
            Some(kind) => vec![DiscriminantKey::Type(kind)],
            None => Vec::new(),
        },
        FamilyId::Operator => {
            let mut keys = Vec::new();
            if let Value::Object(map) = v {
                if let Some((outer, inner)) = map.iter().next() {
                    keys.push(DiscriminantKey::Tag(outer.clone()));
                    if let Some(inner_map) = inner.as_object() {
                        if let Some(inner_key) = inner_map.keys().next() {
                            keys.push(DiscriminantKey::Tag(inner_key.clone()));
                        }
                    }
                }
            }
            keys
        }
    }
}

pub(crate) fn build_in(reg: &Registry, family: FamilyId, v: &Value) -> Result<Expr> {
    for key in candidate_keys(family, v) {
        match reg.lookup(family, &key) {
            Some(Entry::Final { kind, build }) => match build(reg, *kind, v) {
                Err(Error::UnrecognizedExprType(reason)) => {
                    trace!("candidate {} rejected: {}", key, reason);
                    continue;
                }
                other => return other,
            },
            Some(Entry::Family(child)) => return build_in(reg, *child, v),
            None => continue,
        }
    }
    Err(Error::UnrecognizedNodeKind(format!("{:?}", v)))
}

/// Input to [`build_expression`]: raw canonical JSON or an already built
/// node.
pub enum ExprInput {
    Node(Expr),
    Json(Value),
}

impl From<Expr> for ExprInput {
    fn from(expr: Expr) -> Self {
        ExprInput::Node(expr)
    }
}

impl From<Value> for ExprInput {
    fn from(v: Value) -> Self {
        ExprInput::Json(v)
    }
}

impl From<&Value> for ExprInput {
    fn from(v: &Value) -> Self {
        ExprInput::Json(v.clone())
    }
}

/// Builds an expression tree from canonical JSON.
///
/// Idempotent: an already built [`Expr`] passes through unchanged.
///
/// # Errors
///
/// [`Error::UnrecognizedNodeKind`] when no registered kind matches,
/// [`Error::InvalidQuery`] when a kind matches but its operand is malformed.
pub fn build_expression(input: impl Into<ExprInput>) -> Result<Expr> {
    match input.into() {
        ExprInput::Node(expr) => Ok(expr),
        ExprInput::Json(v) => build_in(registry(), FamilyId::Expr, &v),
    }
}

/// Like [`build_expression`], but rejects results that cannot stand where a
/// boolean expression is expected (WHERE clauses, combinator branches).
pub fn boolean_expression(input: impl Into<ExprInput>) -> Result<Expr> {
    let expr = build_expression(input)?;
    if expr.is_boolean() {
        Ok(expr)
    } else {
        Err(Error::InvalidQuery(format!(
            "expected a boolean expression, got {:?}",
            expr
        )))
    }
}

/// Normalizes a shorthand filter and builds its boolean expression tree.
pub fn expression_from_filter(filter: &Value) -> Result<Expr> {
    let canonical = normalize(filter)?;
    boolean_expression(canonical)
}

fn boolean_node(reg: &Registry, v: &Value) -> Result<Expr> {
    let expr = build_in(reg, FamilyId::Expr, v)?;
    if expr.is_boolean() {
        Ok(expr)
    } else {
        Err(Error::InvalidQuery(format!(
            "expected a boolean expression for {:?}",
            v
        )))
    }
}

// Final-kind builders. Each receives the whole JSON fragment and the kind
// tag it matched under; rejecting the fragment's shape with
// `UnrecognizedExprType` sends the protocol on to the next candidate key.

fn build_string_literal(_: &Registry, _: &'static str, v: &Value) -> Result<Expr> {
    match v {
        Value::String(s) => Ok(Expr::Literal(Literal::String(s.clone()))),
        other => Err(reject("string", other)),
    }
}

fn build_integer_literal(_: &Registry, _: &'static str, v: &Value) -> Result<Expr> {
    match v {
        Value::Integer(n) => Ok(Expr::Literal(Literal::Integer(*n))),
        other => Err(reject("integer", other)),
    }
}

fn build_float_literal(_: &Registry, _: &'static str, v: &Value) -> Result<Expr> {
    match v {
        Value::Float(n) => Ok(Expr::Literal(Literal::Float(*n))),
        other => Err(reject("float", other)),
    }
}

fn build_boolean_literal(_: &Registry, _: &'static str, v: &Value) -> Result<Expr> {
    match v {
        Value::Boolean(b) => Ok(Expr::Literal(Literal::Boolean(*b))),
        other => Err(reject("boolean", other)),
    }
}

fn build_datetime_literal(_: &Registry, _: &'static str, v: &Value) -> Result<Expr> {
    match v {
        Value::DateTime(ts) => Ok(Expr::Literal(Literal::DateTime(*ts))),
        other => Err(reject("datetime", other)),
    }
}

fn build_regex_literal(_: &Registry, _: &'static str, v: &Value) -> Result<Expr> {
    match v {
        Value::String(pattern) => Ok(Expr::Literal(checked_regex(pattern)?)),
        other => Err(reject("regex pattern string", other)),
    }
}

fn build_schema_literal(_: &Registry, _: &'static str, v: &Value) -> Result<Expr> {
    match v {
        Value::String(name) => Ok(Expr::Literal(Literal::Schema(name.clone()))),
        other => Err(reject("identifier string", other)),
    }
}

fn reject(expected: &str, got: &Value) -> Error {
    Error::UnrecognizedExprType(format!("expected a {}, got {}", expected, type_name(got)))
}

fn checked_regex(pattern: &str) -> Result<Literal> {
    regex::Regex::new(pattern).map_err(|err| {
        Error::InvalidQuery(format!("invalid regex pattern \"{}\": {}", pattern, err))
    })?;
    Ok(Literal::Regex(pattern.to_string()))
}

/// Comparison extraction: `{left: {op: operand}}`.
fn build_comparison(_: &Registry, kind: &'static str, v: &Value) -> Result<Expr> {
    let op = CompareOp::from_key(kind)
        .ok_or_else(|| Error::UnrecognizedExprType(format!("not a comparison kind: {}", kind)))?;
    let map = v
        .as_object()
        .ok_or_else(|| reject("condition object", v))?;
    let (left, inner) = map
        .iter()
        .next()
        .ok_or_else(|| reject("non-empty condition object", v))?;
    let operand = inner
        .as_object()
        .and_then(|inner_map| inner_map.get(kind))
        .ok_or_else(|| reject("{operator: operand} object", inner))?;

    let right = if op.is_field_variant() {
        match operand {
            Value::String(name) => Operand::One(Literal::Schema(name.clone())),
            other => {
                return Err(Error::InvalidQuery(format!(
                    "\"{}\" compares two fields; its operand must be a field name, got {}",
                    kind,
                    type_name(other)
                )));
            }
        }
    } else {
        match op {
            CompareOp::Regex | CompareOp::InverseRegex => match operand {
                Value::String(pattern) => Operand::One(checked_regex(pattern)?),
                other => {
                    return Err(Error::InvalidQuery(format!(
                        "\"{}\" requires a pattern string operand, got {}",
                        kind,
                        type_name(other)
                    )));
                }
            },
            CompareOp::In | CompareOp::NotIn => match operand {
                Value::Array(items) => Operand::Many(
                    items
                        .iter()
                        .map(scalar_literal)
                        .collect::<Result<Vec<_>>>()?,
                ),
                other => {
                    return Err(Error::InvalidQuery(format!(
                        "the \"{}\" operator is not applied on a list (got {})",
                        kind,
                        type_name(other)
                    )));
                }
            },
            CompareOp::Null | CompareOp::Missing => match operand {
                Value::Boolean(b) => Operand::One(Literal::Boolean(*b)),
                other => {
                    return Err(Error::InvalidQuery(format!(
                        "the \"{}\" operator takes a boolean operand, got {}",
                        kind,
                        type_name(other)
                    )));
                }
            },
            _ => Operand::One(scalar_literal(operand)?),
        }
    };

    Ok(Expr::Compare(Comparison {
        op,
        left: Literal::Schema(left.clone()),
        right,
    }))
}

fn scalar_literal(v: &Value) -> Result<Literal> {
    match v {
        Value::String(s) => Ok(Literal::String(s.clone())),
        Value::Integer(n) => Ok(Literal::Integer(*n)),
        Value::Float(n) => Ok(Literal::Float(*n)),
        Value::Boolean(b) => Ok(Literal::Boolean(*b)),
        Value::DateTime(ts) => Ok(Literal::DateTime(*ts)),
        other => Err(Error::InvalidQuery(format!(
            "invalid literal: expected a scalar, got {}",
            type_name(other)
        ))),
    }
}

/// Combinator extraction: `{op: [sub, sub, ...]}`.
fn build_logical(reg: &Registry, kind: &'static str, v: &Value) -> Result<Expr> {
    let op = LogicalOp::from_key(kind)
        .ok_or_else(|| Error::UnrecognizedExprType(format!("not a combinator kind: {}", kind)))?;
    let operand = v
        .as_object()
        .and_then(|map| map.values().next())
        .ok_or_else(|| reject("combinator object", v))?;
    let items = operand.as_array().ok_or_else(|| {
        Error::InvalidQuery(format!(
            "the \"{}\" operator is not applied on a list",
            kind
        ))
    })?;
    let exprs = items
        .iter()
        .map(|item| boolean_node(reg, item))
        .collect::<Result<Vec<_>>>()?;
    Ok(Expr::Logical(Logical { op, exprs }))
}

/// Negation extraction: `{"not": {sub-expression}}`.
fn build_not(reg: &Registry, _: &'static str, v: &Value) -> Result<Expr> {
    let operand = v
        .as_object()
        .and_then(|map| map.values().next())
        .ok_or_else(|| reject("negation object", v))?;
    if !matches!(operand, Value::Object(_)) {
        return Err(Error::InvalidQuery(format!(
            "\"not\" requires a nested expression object, got {}",
            type_name(operand)
        )));
    }
    let sub = boolean_node(reg, operand)?;
    Ok(Expr::Not(Box::new(sub)))
}
