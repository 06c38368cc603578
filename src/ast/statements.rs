//! Statement builders.
//!
//! Thin assemblers over an already built WHERE tree: a row-selection
//! `SELECT` and the `SHOW …` introspection statements. Statements are
//! textual by nature, so only the InfluxQL and SQL dialects render them.

use crate::ast::build::{ExprInput, boolean_expression, expression_from_filter};
use crate::ast::expressions::{Expr, Literal};
use crate::error::Result;
use crate::render::{Dialect, text, unsupported};
use crate::value::Value;

fn check_statement_dialect(kind: &'static str, dialect: Dialect) -> Result<()> {
    match dialect {
        Dialect::InfluxQl | Dialect::Sql => Ok(()),
        _ => Err(unsupported(kind, dialect)),
    }
}

/// ` WHERE <expr>` fragment, or nothing when there is no clause or the
/// tree renders to empty text (an empty conjunction).
fn where_fragment(clause: Option<&Expr>, dialect: Dialect) -> Result<String> {
    match clause {
        Some(expr) => {
            let rendered = text::render_expr(expr, dialect)?;
            if rendered.is_empty() {
                Ok(String::new())
            } else {
                Ok(format!(" WHERE {}", rendered))
            }
        }
        None => Ok(String::new()),
    }
}

/// `db.rp.m` qualifier chain. A database without a retention policy leaves
/// an empty middle segment (`db..m`).
fn qualified_source(
    db: Option<&Literal>,
    retention_policy: Option<&Literal>,
    measurement: &Literal,
    dialect: Dialect,
) -> Result<String> {
    let measurement = text::render_literal(measurement, dialect)?;
    match (db, retention_policy) {
        (Some(db), Some(rp)) => Ok(format!(
            "{}.{}.{}",
            text::render_literal(db, dialect)?,
            text::render_literal(rp, dialect)?,
            measurement
        )),
        (Some(db), None) => Ok(format!(
            "{}..{}",
            text::render_literal(db, dialect)?,
            measurement
        )),
        (None, Some(rp)) => Ok(format!(
            "{}.{}",
            text::render_literal(rp, dialect)?,
            measurement
        )),
        (None, None) => Ok(measurement),
    }
}

/// A row-selection statement.
///
/// # Examples
///
/// ```
/// use polyquery::{Dialect, Select};
///
/// let query = Select::new("m")
///     .db("db")
///     .retention_policy("rp")
///     .to_query(Dialect::InfluxQl)
///     .unwrap();
/// assert_eq!(query, r#"SELECT * FROM "db"."rp"."m""#);
/// ```
#[derive(Debug, Clone)]
pub struct Select {
    measurement: Literal,
    retention_policy: Option<Literal>,
    db: Option<Literal>,
    columns: Vec<Literal>,
    where_clause: Option<Expr>,
}

impl Select {
    pub fn new(measurement: impl Into<String>) -> Self {
        Select {
            measurement: Literal::schema(measurement),
            retention_policy: None,
            db: None,
            columns: Vec::new(),
            where_clause: None,
        }
    }

    pub fn retention_policy(mut self, name: impl Into<String>) -> Self {
        self.retention_policy = Some(Literal::schema(name));
        self
    }

    pub fn db(mut self, name: impl Into<String>) -> Self {
        self.db = Some(Literal::schema(name));
        self
    }

    /// Columns to select; an empty list selects `*`.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Literal::schema).collect();
        self
    }

    /// Attaches a WHERE clause from canonical JSON or a built expression.
    pub fn where_expr(mut self, input: impl Into<ExprInput>) -> Result<Self> {
        self.where_clause = Some(boolean_expression(input)?);
        Ok(self)
    }

    /// Attaches a WHERE clause from a shorthand filter.
    pub fn where_filter(mut self, filter: &Value) -> Result<Self> {
        self.where_clause = Some(expression_from_filter(filter)?);
        Ok(self)
    }

    pub fn to_query(&self, dialect: Dialect) -> Result<String> {
        check_statement_dialect("select statement", dialect)?;
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns
                .iter()
                .map(|c| text::render_literal(c, dialect))
                .collect::<Result<Vec<_>>>()?
                .join(",")
        };
        let source = qualified_source(
            self.db.as_ref(),
            self.retention_policy.as_ref(),
            &self.measurement,
            dialect,
        )?;
        let where_clause = where_fragment(self.where_clause.as_ref(), dialect)?;
        Ok(format!("SELECT {} FROM {}{}", columns, source, where_clause))
    }
}

/// Shared assembly for the `SHOW …` introspection statements:
/// `<keyword> [ON <db>] [FROM [<rp>.]<m>] [WHERE …]`.
fn show_query(
    keyword: &str,
    db: Option<&Literal>,
    retention_policy: Option<&Literal>,
    measurement: Option<&Literal>,
    where_clause: Option<&Expr>,
    dialect: Dialect,
) -> Result<String> {
    check_statement_dialect("show statement", dialect)?;
    let on = match db {
        Some(db) => format!(" ON {}", text::render_literal(db, dialect)?),
        None => String::new(),
    };
    let from = match (measurement, retention_policy) {
        (Some(m), Some(rp)) => format!(
            " FROM {}.{}",
            text::render_literal(rp, dialect)?,
            text::render_literal(m, dialect)?
        ),
        (Some(m), None) => format!(" FROM {}", text::render_literal(m, dialect)?),
        // A retention policy without a measurement qualifies nothing.
        (None, _) => String::new(),
    };
    let where_clause = where_fragment(where_clause, dialect)?;
    Ok(format!("{}{}{}{}", keyword, on, from, where_clause))
}

/// A tag-key introspection statement.
///
/// # Examples
///
/// ```
/// use polyquery::{Dialect, ShowTagKeys};
///
/// let query = ShowTagKeys::new()
///     .measurement("m")
///     .to_query(Dialect::InfluxQl)
///     .unwrap();
/// assert_eq!(query, r#"SHOW TAG KEYS FROM "m""#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShowTagKeys {
    measurement: Option<Literal>,
    retention_policy: Option<Literal>,
    db: Option<Literal>,
    where_clause: Option<Expr>,
}

impl ShowTagKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measurement(mut self, name: impl Into<String>) -> Self {
        self.measurement = Some(Literal::schema(name));
        self
    }

    pub fn retention_policy(mut self, name: impl Into<String>) -> Self {
        self.retention_policy = Some(Literal::schema(name));
        self
    }

    pub fn db(mut self, name: impl Into<String>) -> Self {
        self.db = Some(Literal::schema(name));
        self
    }

    pub fn where_expr(mut self, input: impl Into<ExprInput>) -> Result<Self> {
        self.where_clause = Some(boolean_expression(input)?);
        Ok(self)
    }

    pub fn where_filter(mut self, filter: &Value) -> Result<Self> {
        self.where_clause = Some(expression_from_filter(filter)?);
        Ok(self)
    }

    pub fn to_query(&self, dialect: Dialect) -> Result<String> {
        show_query(
            "SHOW TAG KEYS",
            self.db.as_ref(),
            self.retention_policy.as_ref(),
            self.measurement.as_ref(),
            self.where_clause.as_ref(),
            dialect,
        )
    }
}

/// A column introspection statement; same clause assembly as
/// [`ShowTagKeys`] with the `SHOW COLUMNS` keyword.
#[derive(Debug, Clone, Default)]
pub struct ShowColumns {
    measurement: Option<Literal>,
    retention_policy: Option<Literal>,
    db: Option<Literal>,
    where_clause: Option<Expr>,
}

impl ShowColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measurement(mut self, name: impl Into<String>) -> Self {
        self.measurement = Some(Literal::schema(name));
        self
    }

    pub fn retention_policy(mut self, name: impl Into<String>) -> Self {
        self.retention_policy = Some(Literal::schema(name));
        self
    }

    pub fn db(mut self, name: impl Into<String>) -> Self {
        self.db = Some(Literal::schema(name));
        self
    }

    pub fn where_expr(mut self, input: impl Into<ExprInput>) -> Result<Self> {
        self.where_clause = Some(boolean_expression(input)?);
        Ok(self)
    }

    pub fn where_filter(mut self, filter: &Value) -> Result<Self> {
        self.where_clause = Some(expression_from_filter(filter)?);
        Ok(self)
    }

    pub fn to_query(&self, dialect: Dialect) -> Result<String> {
        show_query(
            "SHOW COLUMNS",
            self.db.as_ref(),
            self.retention_policy.as_ref(),
            self.measurement.as_ref(),
            self.where_clause.as_ref(),
            dialect,
        )
    }
}
