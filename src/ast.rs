//! # Polyquery - Expression Tree
//!
//! This module defines the typed expression tree built from canonical
//! filters, the discriminant-driven construction protocol that builds it,
//! and the statement assemblers that wrap a tree into a full query.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[expressions]** - Expression nodes (literals, comparisons, combinators)
//! - **[operators]** - Comparison and logical combinator kinds
//! - **[build]** - Construction protocol over the discriminant registry
//! - **[statements]** - `SELECT` / `SHOW …` statement assembly
//!
//! ## Core Concepts
//!
//! ### Canonical form
//!
//! Construction only accepts the canonical shape produced by
//! [`crate::normalize`]: every condition is `{field: {operator: operand}}`,
//! combinators are `{"and": [...]}` / `{"or": [...]}` / `{"any": [...]}` /
//! `{"not": {...}}`.
//!
//! ### Discriminant dispatch
//!
//! A fragment's shape yields one or more candidate keys; the registry maps
//! each key to a final node kind's builder or to a sub-family that applies
//! its own rule. See [`crate::registry`].
//!
//! ### Node families
//!
//! - *Literal*: one scalar value: string, integer, float, datetime,
//!   boolean, regex pattern, or schema identifier (which renders unquoted
//!   in most dialects, unlike a string value)
//! - *Comparison*: a schema identifier against a literal, another
//!   identifier, or a literal list
//! - *Logical*: negation and the and/or/any combinators
//! - *Statement*: `SELECT` and `SHOW …` wrappers around a WHERE tree

pub mod build;
pub mod expressions;
pub mod operators;
pub mod statements;

pub use build::{ExprInput, boolean_expression, build_expression, expression_from_filter, registry};
pub use expressions::{Comparison, Expr, ExprIter, Literal, Logical, Node, Operand};
pub use operators::{CompareOp, LogicalOp};
pub use statements::{Select, ShowColumns, ShowTagKeys};
