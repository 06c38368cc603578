/// Comparison kinds.
///
/// Value comparisons take a literal right operand; the `*Field` variants
/// compare two schema identifiers. Membership, null and missing checks are
/// comparisons too: their operand is a literal list or a boolean flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (`eq`)
    Eq,
    /// Equal, field vs field (`eqf`)
    EqField,
    /// Not equal (`neq`)
    Neq,
    /// Not equal, field vs field (`neqf`)
    NeqField,
    /// Greater than (`gt`)
    Gt,
    /// Greater than, field vs field (`gtf`)
    GtField,
    /// Greater than or equal (`gte`)
    Gte,
    /// Greater than or equal, field vs field (`gtef`)
    GteField,
    /// Less than (`lt`)
    Lt,
    /// Less than, field vs field (`ltf`)
    LtField,
    /// Less than or equal (`lte`)
    Lte,
    /// Less than or equal, field vs field (`ltef`)
    LteField,
    /// Regex match (`regex`)
    Regex,
    /// Inverse regex match (`iregex`)
    InverseRegex,
    /// Membership (`in`)
    In,
    /// Inverse membership (`nin`)
    NotIn,
    /// Null check (`null`); operand `true` = is null, `false` = is not null
    Null,
    /// Presence check (`missing`); operand `true` = field absent
    Missing,
}

impl CompareOp {
    /// All comparison kinds, in registration order.
    pub const ALL: [CompareOp; 18] = [
        CompareOp::Eq,
        CompareOp::EqField,
        CompareOp::Neq,
        CompareOp::NeqField,
        CompareOp::Gt,
        CompareOp::GtField,
        CompareOp::Gte,
        CompareOp::GteField,
        CompareOp::Lt,
        CompareOp::LtField,
        CompareOp::Lte,
        CompareOp::LteField,
        CompareOp::Regex,
        CompareOp::InverseRegex,
        CompareOp::In,
        CompareOp::NotIn,
        CompareOp::Null,
        CompareOp::Missing,
    ];

    /// Canonical operator key, as produced by normalization.
    pub fn key(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::EqField => "eqf",
            CompareOp::Neq => "neq",
            CompareOp::NeqField => "neqf",
            CompareOp::Gt => "gt",
            CompareOp::GtField => "gtf",
            CompareOp::Gte => "gte",
            CompareOp::GteField => "gtef",
            CompareOp::Lt => "lt",
            CompareOp::LtField => "ltf",
            CompareOp::Lte => "lte",
            CompareOp::LteField => "ltef",
            CompareOp::Regex => "regex",
            CompareOp::InverseRegex => "iregex",
            CompareOp::In => "in",
            CompareOp::NotIn => "nin",
            CompareOp::Null => "null",
            CompareOp::Missing => "missing",
        }
    }

    /// Resolve a canonical key back to its comparison kind.
    pub fn from_key(key: &str) -> Option<CompareOp> {
        CompareOp::ALL.iter().copied().find(|op| op.key() == key)
    }

    /// True for the field-vs-field variants.
    pub fn is_field_variant(&self) -> bool {
        matches!(
            self,
            CompareOp::EqField
                | CompareOp::NeqField
                | CompareOp::GtField
                | CompareOp::GteField
                | CompareOp::LtField
                | CompareOp::LteField
        )
    }
}

/// Logical combinator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// Conjunction (`and`)
    And,
    /// Disjunction (`or`)
    Or,
    /// Disjunction with "any of the following" framing in the narrative
    /// dialect; identical to [`LogicalOp::Or`] everywhere else
    Any,
}

impl LogicalOp {
    pub const ALL: [LogicalOp; 3] = [LogicalOp::And, LogicalOp::Or, LogicalOp::Any];

    /// Canonical combinator key.
    pub fn key(&self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
            LogicalOp::Any => "any",
        }
    }

    pub fn from_key(key: &str) -> Option<LogicalOp> {
        LogicalOp::ALL.iter().copied().find(|op| op.key() == key)
    }
}
