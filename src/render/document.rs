//! Rendering for the document-store dialect.
//!
//! Produces MongoDB-style query objects as `serde_json::Value`. Unlike the
//! textual dialects, combinator branch order is preserved as given.

use serde_json::{Value as Json, json};

use crate::ast::expressions::{Comparison, Expr, Literal, Logical, Operand};
use crate::ast::operators::{CompareOp, LogicalOp};
use crate::error::{Error, Result};
use crate::render::{Dialect, unsupported};

pub(crate) fn render_expr(expr: &Expr) -> Result<Json> {
    match expr {
        Expr::Literal(lit) => literal_value(lit),
        Expr::Compare(cmp) => comparison_doc(cmp),
        Expr::Not(sub) => Ok(json!({ "$not": render_expr(sub)? })),
        Expr::Logical(logical) => logical_doc(logical),
    }
}

fn literal_value(lit: &Literal) -> Result<Json> {
    Ok(match lit {
        Literal::String(s) => json!(s),
        Literal::Integer(n) => json!(n),
        Literal::Float(n) => json!(n),
        Literal::Boolean(b) => json!(b),
        Literal::DateTime(ts) => json!(ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
        Literal::Regex(pattern) => json!(pattern),
        Literal::Schema(name) => json!(name),
    })
}

fn field_name<'a>(cmp: &'a Comparison) -> Result<&'a str> {
    match &cmp.left {
        Literal::Schema(name) => Ok(name),
        other => Err(Error::InvalidQuery(format!(
            "comparison left operand must be a schema identifier, got {}",
            other.kind()
        ))),
    }
}

fn single_value(cmp: &Comparison) -> Result<Json> {
    match &cmp.right {
        Operand::One(lit) => literal_value(lit),
        Operand::Many(_) => Err(Error::InvalidQuery(format!(
            "the \"{}\" operator does not take a list operand",
            cmp.op.key()
        ))),
    }
}

fn comparison_doc(cmp: &Comparison) -> Result<Json> {
    let field = field_name(cmp)?;
    if cmp.op.is_field_variant() {
        return Err(unsupported("field comparison", Dialect::Mongo));
    }
    let doc = match cmp.op {
        CompareOp::Eq => json!({ field: { "$eq": single_value(cmp)? } }),
        CompareOp::Neq => json!({ field: { "$ne": single_value(cmp)? } }),
        CompareOp::Gt => json!({ field: { "$gt": single_value(cmp)? } }),
        CompareOp::Gte => json!({ field: { "$gte": single_value(cmp)? } }),
        CompareOp::Lt => json!({ field: { "$lt": single_value(cmp)? } }),
        CompareOp::Lte => json!({ field: { "$lte": single_value(cmp)? } }),
        CompareOp::Regex => json!({ field: { "$regex": single_value(cmp)? } }),
        CompareOp::InverseRegex => {
            json!({ field: { "$not": { "$regex": single_value(cmp)? } } })
        }
        CompareOp::In | CompareOp::NotIn => {
            let items = match &cmp.right {
                Operand::Many(items) => items
                    .iter()
                    .map(literal_value)
                    .collect::<Result<Vec<_>>>()?,
                Operand::One(_) => {
                    return Err(Error::InvalidQuery(format!(
                        "the \"{}\" operator requires a list operand",
                        cmp.op.key()
                    )));
                }
            };
            let token = if cmp.op == CompareOp::In { "$in" } else { "$nin" };
            json!({ field: { token: items } })
        }
        CompareOp::Null => match single_value(cmp)? {
            Json::Bool(true) => json!({ field: Json::Null }),
            Json::Bool(false) => json!({ field: { "$ne": Json::Null } }),
            other => {
                return Err(Error::InvalidQuery(format!(
                    "the \"null\" operator takes a boolean operand, got {}",
                    other
                )));
            }
        },
        CompareOp::Missing => match single_value(cmp)? {
            Json::Bool(is_missing) => json!({ field: { "$exists": !is_missing } }),
            other => {
                return Err(Error::InvalidQuery(format!(
                    "the \"missing\" operator takes a boolean operand, got {}",
                    other
                )));
            }
        },
        // Field variants are rejected above.
        _ => return Err(unsupported("field comparison", Dialect::Mongo)),
    };
    Ok(doc)
}

fn logical_doc(logical: &Logical) -> Result<Json> {
    let token = match logical.op {
        LogicalOp::And => "$and",
        LogicalOp::Or | LogicalOp::Any => "$or",
    };
    let docs = logical
        .exprs
        .iter()
        .map(render_expr)
        .collect::<Result<Vec<_>>>()?;
    Ok(json!({ token: docs }))
}
