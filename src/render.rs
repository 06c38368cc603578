//! Dialect rendering.
//!
//! Every expression node renders independently per dialect; the dialect is
//! selected by name at call time. Four dialects produce text, the document
//! dialect produces a MongoDB-style query object. A node kind with no
//! mapping in the requested dialect fails with
//! [`Error::UnsupportedOperation`]. There is no silent fallback, except
//! where an equivalent expression exists (membership tests expand to
//! per-value equality in dialects without native list support).
//!
//! # Examples
//!
//! ```
//! use polyquery::{expression_from_filter, Dialect, Map, Value};
//!
//! let mut filter = Map::new();
//! filter.insert("status".to_string(), Value::from("ok"));
//! let expr = expression_from_filter(&Value::Object(filter)).unwrap();
//!
//! assert_eq!(expr.to_query(Dialect::InfluxQl).unwrap(), r#""status" = 'ok'"#);
//! assert_eq!(expr.to_query(Dialect::Sql).unwrap(), "status = 'ok'");
//! assert_eq!(expr.to_query(Dialect::Dataframe).unwrap(), "status == 'ok'");
//! assert_eq!(expr.to_query(Dialect::Narrative).unwrap(), "status equals 'ok'");
//! ```

pub(crate) mod document;
pub(crate) mod text;

use std::str::FromStr;

use crate::ast::expressions::Expr;
use crate::error::{Error, Result};

/// An output dialect, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Time-series query text (InfluxQL)
    InfluxQl,
    /// Relational query text (SQL)
    Sql,
    /// Document-store query object (MongoDB)
    Mongo,
    /// Dataframe boolean-mask text (pandas `DataFrame.query` syntax)
    Dataframe,
    /// Natural-language rule description
    Narrative,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::InfluxQl,
        Dialect::Sql,
        Dialect::Mongo,
        Dialect::Dataframe,
        Dialect::Narrative,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::InfluxQl => "influxql",
            Dialect::Sql => "sql",
            Dialect::Mongo => "mongo",
            Dialect::Dataframe => "dataframe",
            Dialect::Narrative => "narrative",
        }
    }

    pub fn from_name(name: &str) -> Option<Dialect> {
        Dialect::ALL.iter().copied().find(|d| d.name() == name)
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Dialect> {
        Dialect::from_name(s)
            .ok_or_else(|| Error::InvalidQuery(format!("unknown dialect \"{}\"", s)))
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A rendered expression: query text, or a query object for the document
/// dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Text(String),
    Document(serde_json::Value),
}

impl Rendered {
    pub fn into_text(self) -> Option<String> {
        match self {
            Rendered::Text(s) => Some(s),
            Rendered::Document(_) => None,
        }
    }

    pub fn into_document(self) -> Option<serde_json::Value> {
        match self {
            Rendered::Document(doc) => Some(doc),
            Rendered::Text(_) => None,
        }
    }
}

/// Renders an expression tree in the given dialect.
pub fn render(expr: &Expr, dialect: Dialect) -> Result<Rendered> {
    match dialect {
        Dialect::Mongo => document::render_expr(expr).map(Rendered::Document),
        _ => text::render_expr(expr, dialect).map(Rendered::Text),
    }
}

impl Expr {
    /// Renders this tree as query text. The document dialect yields its
    /// query object serialized as compact JSON.
    pub fn to_query(&self, dialect: Dialect) -> Result<String> {
        match render(self, dialect)? {
            Rendered::Text(s) => Ok(s),
            Rendered::Document(doc) => Ok(doc.to_string()),
        }
    }

    /// Renders this tree as a document-store query object.
    pub fn to_document(&self) -> Result<serde_json::Value> {
        document::render_expr(self)
    }
}

pub(crate) fn unsupported(kind: &'static str, dialect: Dialect) -> Error {
    Error::UnsupportedOperation {
        kind,
        dialect: dialect.name(),
    }
}
