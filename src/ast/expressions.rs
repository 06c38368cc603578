use chrono::NaiveDateTime;

use crate::ast::operators::{CompareOp, LogicalOp};

/// A scalar literal node.
///
/// Schema identifiers are literals too, but a distinct kind: they name a
/// field, measurement or database rather than carrying a value, and quote
/// differently (double quotes in InfluxQL, bare elsewhere).
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// String value, single-quoted in every textual dialect
    String(String),

    /// Integer value
    Integer(i64),

    /// Floating-point value
    Float(f64),

    /// Timestamp, formatted per dialect
    DateTime(NaiveDateTime),

    /// Boolean value
    Boolean(bool),

    /// Regex pattern (the inner pattern, without surrounding slashes)
    Regex(String),

    /// Schema identifier: a field, table, measurement or database name
    Schema(String),
}

impl Literal {
    /// Human-readable kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::String(_) => "string literal",
            Literal::Integer(_) => "integer literal",
            Literal::Float(_) => "float literal",
            Literal::DateTime(_) => "datetime literal",
            Literal::Boolean(_) => "boolean literal",
            Literal::Regex(_) => "regex literal",
            Literal::Schema(_) => "schema identifier",
        }
    }

    pub fn schema(name: impl Into<String>) -> Self {
        Literal::Schema(name.into())
    }
}

/// Right operand of a comparison: a single literal or a literal list.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    One(Literal),
    Many(Vec<Literal>),
}

/// A binary comparison.
///
/// The left operand is always a schema identifier; the right operand is a
/// literal, another schema identifier (field-vs-field variants), or a list
/// of literals (membership).
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub op: CompareOp,
    pub left: Literal,
    pub right: Operand,
}

impl Comparison {
    pub fn new(op: CompareOp, field: impl Into<String>, right: Operand) -> Self {
        Comparison {
            op,
            left: Literal::Schema(field.into()),
            right,
        }
    }
}

/// An ordered list of boolean sub-expressions joined by a combinator.
#[derive(Debug, Clone, PartialEq)]
pub struct Logical {
    pub op: LogicalOp,
    pub exprs: Vec<Expr>,
}

/// An expression tree node.
///
/// Trees are immutable value graphs: building and rendering them is pure,
/// so independent trees may be handled concurrently without coordination.
///
/// # Example
///
/// ```
/// use polyquery::{build_expression, Dialect, Map, Value};
///
/// let mut inner = Map::new();
/// inner.insert("eq".to_string(), Value::from(1));
/// let mut cond = Map::new();
/// cond.insert("a".to_string(), Value::Object(inner));
///
/// let expr = build_expression(Value::Object(cond)).unwrap();
/// assert_eq!(expr.to_query(Dialect::InfluxQl).unwrap(), r#""a" = 1"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A bare literal
    Literal(Literal),

    /// A comparison between a field and a value, field or list
    Compare(Comparison),

    /// Logical negation of a boolean sub-expression
    Not(Box<Expr>),

    /// Conjunction, disjunction, or the "any" disjunction variant
    Logical(Logical),
}

impl Expr {
    /// True for nodes that may stand where a boolean expression is expected
    /// (WHERE clauses, combinator branches).
    pub fn is_boolean(&self) -> bool {
        !matches!(self, Expr::Literal(_))
    }

    /// Depth-first iterator over this node and all of its descendants,
    /// comparison operand literals included. Lazy and restartable; yields
    /// read-only views.
    pub fn iter(&self) -> ExprIter<'_> {
        ExprIter {
            stack: vec![Node::Expr(self)],
        }
    }
}

/// A read-only view of a tree node yielded during iteration.
///
/// Comparison operands are typed [`Literal`]s rather than full expressions,
/// so the iterator distinguishes the two.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Expr(&'a Expr),
    Literal(&'a Literal),
}

/// Depth-first traversal over an expression tree.
pub struct ExprIter<'a> {
    stack: Vec<Node<'a>>,
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Node::Expr(expr) = node {
            // Children are pushed in reverse so they pop in source order.
            match expr {
                Expr::Literal(_) => {}
                Expr::Compare(cmp) => {
                    match &cmp.right {
                        Operand::One(lit) => self.stack.push(Node::Literal(lit)),
                        Operand::Many(lits) => {
                            for lit in lits.iter().rev() {
                                self.stack.push(Node::Literal(lit));
                            }
                        }
                    }
                    self.stack.push(Node::Literal(&cmp.left));
                }
                Expr::Not(sub) => self.stack.push(Node::Expr(sub)),
                Expr::Logical(logical) => {
                    for sub in logical.exprs.iter().rev() {
                        self.stack.push(Node::Expr(sub));
                    }
                }
            }
        }
        Some(node)
    }
}
