//! Product kind enum.

use serde::{Deserialize, Serialize};

/// The purchase model of a product.
///
/// Maps to the `type` field of the upstream product payload. `Variable`
/// products carry a variation list; `Fixed` products are sold as-is at a
/// single price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Simple,
    Variable,
    Grouped,
    External,
    Fixed,
}

impl ProductKind {
    /// Whether this product is defined by a list of variations.
    #[must_use]
    pub const fn is_variable(self) -> bool {
        matches!(self, Self::Variable)
    }
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Variable => write!(f, "variable"),
            Self::Grouped => write!(f, "grouped"),
            Self::External => write!(f, "external"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for ProductKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "variable" => Ok(Self::Variable),
            "grouped" => Ok(Self::Grouped),
            "external" => Ok(Self::External),
            "fixed" => Ok(Self::Fixed),
            _ => Err(format!("invalid product kind: {s}")),
        }
    }
}
