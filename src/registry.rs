//! Discriminant registry.
//!
//! The construction protocol picks which expression node to build by looking
//! a *discriminant key* up in a process-wide registry. A key is either a
//! literal string tag (`"eq"`, `"and"`, `"regex"`) or a primitive type tag
//! (the scalar kind of a non-object value).
//!
//! Kinds are grouped into *families* that form a small tree: the root `Expr`
//! family routes to the `Literal` or `Operator` sub-family, and a key that is
//! not found in a family retries against its ancestors. Final node kinds map
//! to a builder function; non-final entries map to a sub-family that applies
//! its own candidate-key rule.
//!
//! The registry is populated exactly once (see [`crate::ast::build`]) and is
//! read-only afterwards, so sharing it across threads needs no locking. A
//! duplicate key at registration time is a configuration error, not a
//! runtime condition.

use std::collections::HashMap;

use crate::ast::expressions::Expr;
use crate::error::{Error, Result};
use crate::value::Value;

/// Identifier of a node-kind family.
///
/// Families are the dispatch roots of the registry tree: `Expr` is the root,
/// `Literal` and `Operator` are its children. Final kinds cannot be family
/// roots, so "subclassing" a final kind is unrepresentable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyId {
    /// Root family: any expression node
    Expr,
    /// Scalar literal kinds, keyed by primitive type tag or string tag
    Literal,
    /// Comparison and logical kinds, keyed by operator name
    Operator,
}

impl FamilyId {
    fn name(&self) -> &'static str {
        match self {
            FamilyId::Expr => "expr",
            FamilyId::Literal => "literal",
            FamilyId::Operator => "operator",
        }
    }
}

/// Primitive type tag used to dispatch literal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
}

/// The scalar kind of a value, if it has one.
pub fn scalar_kind(v: &Value) -> Option<ScalarKind> {
    match v {
        Value::String(_) => Some(ScalarKind::String),
        Value::Integer(_) => Some(ScalarKind::Integer),
        Value::Float(_) => Some(ScalarKind::Float),
        Value::Boolean(_) => Some(ScalarKind::Boolean),
        Value::DateTime(_) => Some(ScalarKind::DateTime),
        _ => None,
    }
}

/// A discriminant key: a string tag or a primitive type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiscriminantKey {
    Tag(String),
    Type(ScalarKind),
}

impl DiscriminantKey {
    pub fn tag(s: &str) -> Self {
        DiscriminantKey::Tag(s.to_string())
    }
}

impl std::fmt::Display for DiscriminantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscriminantKey::Tag(tag) => write!(f, "\"{}\"", tag),
            DiscriminantKey::Type(kind) => write!(f, "{:?}", kind),
        }
    }
}

/// Builder function for a final node kind. Receives the registry so nested
/// construction can dispatch recursively, and the kind tag it was
/// registered under so shared builders know which kind matched.
pub type NodeBuilder = fn(&Registry, &'static str, &Value) -> Result<Expr>;

/// What a discriminant key maps to.
pub enum Entry {
    /// A final kind: instantiable, no further dispatch.
    Final {
        kind: &'static str,
        build: NodeBuilder,
    },
    /// A non-final grouping: dispatch continues in the named sub-family.
    Family(FamilyId),
}

struct Family {
    parent: Option<FamilyId>,
    entries: HashMap<DiscriminantKey, Entry>,
}

/// Append-only mapping from (family, discriminant key) to node kind.
pub struct Registry {
    families: HashMap<FamilyId, Family>,
}

impl Registry {
    /// An empty registry with the family tree wired up.
    pub fn new() -> Self {
        let mut families = HashMap::new();
        families.insert(
            FamilyId::Expr,
            Family {
                parent: None,
                entries: HashMap::new(),
            },
        );
        families.insert(
            FamilyId::Literal,
            Family {
                parent: Some(FamilyId::Expr),
                entries: HashMap::new(),
            },
        );
        families.insert(
            FamilyId::Operator,
            Family {
                parent: Some(FamilyId::Expr),
                entries: HashMap::new(),
            },
        );
        Registry { families }
    }

    /// Registers `entry` under `key` in `family`.
    ///
    /// # Errors
    ///
    /// [`Error::RegistryConflict`] if the key is already taken in that
    /// family. Keys are never overwritten.
    pub fn register(&mut self, family: FamilyId, key: DiscriminantKey, entry: Entry) -> Result<()> {
        let fam = self
            .families
            .get_mut(&family)
            .ok_or_else(|| Error::RegistryConflict(format!("unknown family {:?}", family)))?;
        if let Some(existing) = fam.entries.get(&key) {
            let existing = match existing {
                Entry::Final { kind, .. } => kind,
                Entry::Family(id) => id.name(),
            };
            return Err(Error::RegistryConflict(format!(
                "key {} in the {} family already maps to {}",
                key,
                family.name(),
                existing
            )));
        }
        fam.entries.insert(key, entry);
        Ok(())
    }

    /// Looks `key` up in `family`, retrying ancestor families on a local
    /// miss. Sibling families share key space only through their common
    /// ancestors.
    pub fn lookup(&self, family: FamilyId, key: &DiscriminantKey) -> Option<&Entry> {
        let mut current = Some(family);
        while let Some(id) = current {
            let fam = self.families.get(&id)?;
            if let Some(entry) = fam.entries.get(key) {
                return Some(entry);
            }
            current = fam.parent;
        }
        None
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}
