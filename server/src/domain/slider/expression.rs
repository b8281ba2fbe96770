//! Filter expression tree attached to listing queries
//!
//! Leaves select products carrying any of a set of terms of one attribute.
//! Groups combine children under AND or OR.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::types::{TAXONOMY_PREFIX, TermId};

/// Boolean relation joining the children of a group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Relation {
    #[default]
    And,
    Or,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::And => write!(f, "AND"),
            Relation::Or => write!(f, "OR"),
        }
    }
}

/// Leaf: the product carries at least one of `terms` for `attribute`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermClause {
    pub attribute: String,
    pub terms: Vec<TermId>,
}

impl TermClause {
    pub fn new(attribute: impl Into<String>, terms: Vec<TermId>) -> Self {
        Self {
            attribute: attribute.into(),
            terms,
        }
    }

    /// Taxonomy name of the attribute (`pa_<attribute>`)
    pub fn taxonomy(&self) -> String {
        format!("{}{}", TAXONOMY_PREFIX, self.attribute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterExpression {
    Group {
        relation: Relation,
        children: Vec<FilterExpression>,
    },
    Terms(TermClause),
}

impl FilterExpression {
    pub fn and(children: Vec<FilterExpression>) -> Self {
        Self::Group {
            relation: Relation::And,
            children,
        }
    }

    pub fn or(children: Vec<FilterExpression>) -> Self {
        Self::Group {
            relation: Relation::Or,
            children,
        }
    }

    pub fn terms(attribute: impl Into<String>, terms: Vec<TermId>) -> Self {
        Self::Terms(TermClause::new(attribute, terms))
    }

    /// A group without children constrains nothing
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Group { children, .. } if children.is_empty())
    }

    /// Append `derived` after the leaves of `existing`, under an AND root.
    ///
    /// An existing AND group contributes its children in order; any other
    /// non-empty existing expression is kept whole as the first child so its
    /// own relation survives.
    pub fn merge(existing: Option<FilterExpression>, derived: Vec<FilterExpression>) -> Self {
        let mut children = match existing {
            None => Vec::new(),
            Some(expr) if expr.is_empty() => Vec::new(),
            Some(Self::Group {
                relation: Relation::And,
                children,
            }) => children,
            Some(other) => vec![other],
        };
        children.extend(derived);
        Self::and(children)
    }

    /// Leaf clauses in depth-first order
    pub fn clauses(&self) -> Vec<&TermClause> {
        let mut out = Vec::new();
        self.collect_clauses(&mut out);
        out
    }

    fn collect_clauses<'a>(&'a self, out: &mut Vec<&'a TermClause>) {
        match self {
            Self::Terms(clause) => out.push(clause),
            Self::Group { children, .. } => {
                for child in children {
                    child.collect_clauses(out);
                }
            }
        }
    }

    /// Evaluate against the term ids assigned to one product
    pub fn matches(&self, assigned: &HashSet<TermId>) -> bool {
        match self {
            Self::Terms(clause) => clause.terms.iter().any(|t| assigned.contains(t)),
            Self::Group { children, .. } if children.is_empty() => true,
            Self::Group {
                relation: Relation::And,
                children,
            } => children.iter().all(|c| c.matches(assigned)),
            Self::Group {
                relation: Relation::Or,
                children,
            } => children.iter().any(|c| c.matches(assigned)),
        }
    }
}
