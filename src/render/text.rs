//! Rendering for the four textual dialects.
//!
//! Logical combinators sort their rendered sub-expressions before joining,
//! so the output depends only on the tree's content, not the order branches
//! were built in.

use crate::ast::expressions::{Comparison, Expr, Literal, Logical, Operand};
use crate::ast::operators::{CompareOp, LogicalOp};
use crate::error::{Error, Result};
use crate::render::{Dialect, unsupported};

pub(crate) fn render_expr(expr: &Expr, dialect: Dialect) -> Result<String> {
    match expr {
        Expr::Literal(lit) => render_literal(lit, dialect),
        Expr::Compare(cmp) => render_comparison(cmp, dialect),
        Expr::Not(sub) => render_not(sub, dialect),
        Expr::Logical(logical) => render_logical(logical, dialect),
    }
}

pub(crate) fn render_literal(lit: &Literal, dialect: Dialect) -> Result<String> {
    match lit {
        Literal::String(s) => Ok(format!("'{}'", s)),
        Literal::Integer(n) => Ok(n.to_string()),
        Literal::Float(n) => Ok(n.to_string()),
        Literal::Boolean(b) => Ok(match dialect {
            // SQL keyword casing; the dataframe dialect is Python syntax.
            Dialect::Sql => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Dialect::Dataframe => if *b { "True" } else { "False" }.to_string(),
            _ => b.to_string(),
        }),
        Literal::DateTime(ts) => Ok(match dialect {
            Dialect::InfluxQl => format!("'{}'", ts.format("%Y-%m-%dT%H:%M:%SZ")),
            _ => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S")),
        }),
        Literal::Regex(pattern) => match dialect {
            Dialect::InfluxQl => Ok(format!("/{}/", pattern)),
            Dialect::Sql => Ok(format!("'{}'", pattern)),
            _ => Err(unsupported("regex literal", dialect)),
        },
        Literal::Schema(name) => Ok(match dialect {
            Dialect::InfluxQl => format!("\"{}\"", name),
            _ => name.clone(),
        }),
    }
}

/// Operator token for the plain binary comparison kinds.
fn comparison_token(op: CompareOp, dialect: Dialect) -> Option<&'static str> {
    use CompareOp::*;
    let token = match (op, dialect) {
        (Eq | EqField, Dialect::InfluxQl | Dialect::Sql) => "=",
        (Eq | EqField, Dialect::Dataframe) => "==",
        (Eq | EqField, Dialect::Narrative) => "equals",
        (Neq | NeqField, Dialect::InfluxQl | Dialect::Dataframe) => "!=",
        (Neq | NeqField, Dialect::Sql) => "<>",
        (Neq | NeqField, Dialect::Narrative) => "does not equal",
        (Gt | GtField, Dialect::InfluxQl | Dialect::Sql | Dialect::Dataframe) => ">",
        (Gt | GtField, Dialect::Narrative) => "is more than",
        (Gte | GteField, Dialect::InfluxQl | Dialect::Sql | Dialect::Dataframe) => ">=",
        (Gte | GteField, Dialect::Narrative) => "is at least",
        (Lt | LtField, Dialect::InfluxQl | Dialect::Sql | Dialect::Dataframe) => "<",
        (Lt | LtField, Dialect::Narrative) => "is less than",
        (Lte | LteField, Dialect::InfluxQl | Dialect::Sql | Dialect::Dataframe) => "<=",
        (Lte | LteField, Dialect::Narrative) => "is at most",
        _ => return None,
    };
    Some(token)
}

fn single_operand<'a>(cmp: &'a Comparison) -> Result<&'a Literal> {
    match &cmp.right {
        Operand::One(lit) => Ok(lit),
        Operand::Many(_) => Err(Error::InvalidQuery(format!(
            "the \"{}\" operator does not take a list operand",
            cmp.op.key()
        ))),
    }
}

fn null_flag(cmp: &Comparison) -> Result<bool> {
    match single_operand(cmp)? {
        Literal::Boolean(b) => Ok(*b),
        other => Err(Error::InvalidQuery(format!(
            "the \"{}\" operator holds a {} operand",
            cmp.op.key(),
            other.kind()
        ))),
    }
}

fn render_comparison(cmp: &Comparison, dialect: Dialect) -> Result<String> {
    let left = render_literal(&cmp.left, dialect)?;
    match cmp.op {
        CompareOp::Regex | CompareOp::InverseRegex => {
            let pattern = render_literal(single_operand(cmp)?, dialect)?;
            let token = match (cmp.op, dialect) {
                (CompareOp::Regex, Dialect::InfluxQl) => "=~",
                (CompareOp::InverseRegex, Dialect::InfluxQl) => "!~",
                (CompareOp::Regex, Dialect::Sql) => "REGEXP",
                (CompareOp::InverseRegex, Dialect::Sql) => "NOT REGEXP",
                _ => return Err(unsupported("regex match", dialect)),
            };
            Ok(format!("{} {} {}", left, token, pattern))
        }
        CompareOp::In | CompareOp::NotIn => render_membership(cmp, dialect),
        CompareOp::Null => {
            let is_null = null_flag(cmp)?;
            match dialect {
                Dialect::Sql => Ok(format!(
                    "{} {}",
                    left,
                    if is_null { "IS NULL" } else { "IS NOT NULL" }
                )),
                Dialect::Dataframe => Ok(format!(
                    "{}.{}()",
                    left,
                    if is_null { "isnull" } else { "notnull" }
                )),
                Dialect::Narrative => Ok(format!(
                    "{} {}",
                    left,
                    if is_null { "is null" } else { "is not null" }
                )),
                _ => Err(unsupported("null check", dialect)),
            }
        }
        CompareOp::Missing => {
            let is_missing = null_flag(cmp)?;
            match dialect {
                Dialect::Narrative => Ok(format!(
                    "{} {}",
                    left,
                    if is_missing { "is missing" } else { "is present" }
                )),
                _ => Err(unsupported("presence check", dialect)),
            }
        }
        op => {
            let token =
                comparison_token(op, dialect).ok_or_else(|| unsupported("comparison", dialect))?;
            let right = render_literal(single_operand(cmp)?, dialect)?;
            Ok(format!("{} {} {}", left, token, right))
        }
    }
}

fn render_membership(cmp: &Comparison, dialect: Dialect) -> Result<String> {
    let items = match &cmp.right {
        Operand::Many(items) => items,
        Operand::One(_) => {
            return Err(Error::InvalidQuery(format!(
                "the \"{}\" operator requires a list operand",
                cmp.op.key()
            )));
        }
    };
    match dialect {
        Dialect::Sql => {
            let rendered = render_items(items, dialect)?;
            let token = if cmp.op == CompareOp::In { "IN" } else { "NOT IN" };
            let left = render_literal(&cmp.left, dialect)?;
            Ok(format!("{} {} ({})", left, token, rendered.join(", ")))
        }
        Dialect::Dataframe => {
            let rendered = render_items(items, dialect)?;
            let token = if cmp.op == CompareOp::In { "in" } else { "not in" };
            let left = render_literal(&cmp.left, dialect)?;
            Ok(format!("{} {} [{}]", left, token, rendered.join(", ")))
        }
        // No native list membership: render the equivalent per-value
        // disjunction / conjunction instead.
        _ => render_expr(&membership_fallback(cmp, items), dialect),
    }
}

fn render_items(items: &[Literal], dialect: Dialect) -> Result<Vec<String>> {
    items
        .iter()
        .map(|lit| render_literal(lit, dialect))
        .collect()
}

/// `in` becomes a disjunction of equalities, `nin` a conjunction of
/// inequalities.
fn membership_fallback(cmp: &Comparison, items: &[Literal]) -> Expr {
    let (combinator, comparison) = if cmp.op == CompareOp::In {
        (LogicalOp::Or, CompareOp::Eq)
    } else {
        (LogicalOp::And, CompareOp::Neq)
    };
    Expr::Logical(Logical {
        op: combinator,
        exprs: items
            .iter()
            .map(|lit| {
                Expr::Compare(Comparison {
                    op: comparison,
                    left: cmp.left.clone(),
                    right: Operand::One(lit.clone()),
                })
            })
            .collect(),
    })
}

fn render_not(sub: &Expr, dialect: Dialect) -> Result<String> {
    let inner = render_expr(sub, dialect)?;
    match dialect {
        Dialect::Sql => Ok(format!("NOT ({})", inner)),
        Dialect::Dataframe => Ok(format!("~({})", inner)),
        Dialect::Narrative => Ok(format!("it is not true that ({})", inner)),
        _ => Err(unsupported("negation", dialect)),
    }
}

fn logical_token(op: LogicalOp, dialect: Dialect) -> &'static str {
    match (op, dialect) {
        (LogicalOp::And, Dialect::Dataframe) => "&",
        (LogicalOp::And, Dialect::Narrative) => "and",
        (LogicalOp::And, _) => "AND",
        (_, Dialect::Dataframe) => "|",
        (_, Dialect::Narrative) => "or",
        (_, _) => "OR",
    }
}

fn render_logical(logical: &Logical, dialect: Dialect) -> Result<String> {
    if logical.exprs.is_empty() {
        return Ok(String::new());
    }
    if logical.op == LogicalOp::Any && dialect == Dialect::Narrative {
        return render_any_narrative(logical);
    }
    let mut parts = logical
        .exprs
        .iter()
        .map(|sub| Ok(format!("({})", render_expr(sub, dialect)?)))
        .collect::<Result<Vec<_>>>()?;
    parts.sort();
    Ok(parts.join(&format!(" {} ", logical_token(logical.op, dialect))))
}

/// Header line plus one indented, alphabetically sorted bullet per branch.
fn render_any_narrative(logical: &Logical) -> Result<String> {
    let mut bullets = logical
        .exprs
        .iter()
        .map(|sub| render_expr(sub, Dialect::Narrative))
        .collect::<Result<Vec<_>>>()?;
    bullets.sort();
    let mut out = String::from("any of the following:");
    for bullet in bullets {
        out.push_str("\n  - ");
        out.push_str(&bullet);
    }
    Ok(out)
}
