//! Polyquery translates MongoDB-style nested filter maps into query text
//! for several dialects: InfluxQL, SQL, a MongoDB query object, a pandas
//! `DataFrame.query` boolean mask, and a plain-English rule description.
//!
//! The pipeline has three stages:
//!
//! 1. [`normalize`] rewrites filter shorthand (implicit equality,
//!    `/regex/` strings, bare membership lists) into one canonical shape.
//! 2. [`build_expression`] walks the canonical form and the discriminant
//!    registry to build a typed expression tree.
//! 3. [`render`] (or [`Select`] / `SHOW` statement builders) turns the
//!    tree into dialect output.
//!
//! ```
//! use polyquery::{expression_from_filter, Dialect, Map, Value};
//!
//! let mut filter = Map::new();
//! filter.insert("status".to_string(), Value::from("ok"));
//! filter.insert("version".to_string(), Value::from(vec![1, 2]));
//!
//! let expr = expression_from_filter(&Value::Object(filter)).unwrap();
//! assert_eq!(
//!     expr.to_query(Dialect::Sql).unwrap(),
//!     "(status = 'ok') AND (version IN (1, 2))"
//! );
//! ```

pub mod ast;
pub mod error;
pub mod normalize;
pub mod registry;
pub mod render;
pub mod value;

pub use ast::{
    CompareOp, Comparison, Expr, ExprInput, Literal, Logical, LogicalOp, Node, Operand, Select,
    ShowColumns, ShowTagKeys, boolean_expression, build_expression, expression_from_filter,
};
pub use error::{Error, Result};
pub use normalize::normalize;
pub use render::{Dialect, Rendered, render};
pub use value::{Map, Value};
