use serde::Serialize;
use std::fmt;

/// An unordered pair of atom indices inferred to be in contact.
///
/// Stored normalized so that `i < j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Contact {
    pub i: usize,
    pub j: usize,
}

impl Contact {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            i: a.min(b),
            j: a.max(b),
        }
    }

}

/// The construction rule that produced a constraint edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintKind {
    /// Consecutive backbone atoms (residue numbers differ by one).
    BackboneBackbone,
    /// Backbone atom to the branch atom of its own residue.
    BackboneBranch,
    /// Any other pair closer than the proximity cutoff.
    Proximity,
}

impl ConstraintKind {
    pub const ALL: [ConstraintKind; 3] = [
        ConstraintKind::BackboneBackbone,
        ConstraintKind::BackboneBranch,
        ConstraintKind::Proximity,
    ];
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::BackboneBackbone => "backbone-backbone",
                Self::BackboneBranch => "backbone-branch",
                Self::Proximity => "proximity",
            }
        )
    }
}

/// A distance constraint between two atoms, with the stiffness handed to the
/// physics engine unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintEdge {
    pub i: usize,          // Lower atom index
    pub j: usize,          // Higher atom index
    pub kind: ConstraintKind,
    pub stiffness: f64,
}

impl ConstraintEdge {
    pub fn new(a: usize, b: usize, kind: ConstraintKind, stiffness: f64) -> Self {
        Self {
            i: a.min(b),
            j: a.max(b),
            kind,
            stiffness,
        }
    }

    pub fn pair(&self) -> (usize, usize) {
        (self.i, self.j)
    }
}

/// The two derived edge sets of a structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MolecularTopology {
    pub contacts: Vec<Contact>,
    pub constraints: Vec<ConstraintEdge>,
}

impl MolecularTopology {
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty() && self.constraints.is_empty()
    }

    pub fn constraints_of_kind(&self, kind: ConstraintKind) -> impl Iterator<Item = &ConstraintEdge> {
        self.constraints.iter().filter(move |edge| edge.kind == kind)
    }

    pub fn count_kind(&self, kind: ConstraintKind) -> usize {
        self.constraints_of_kind(kind).count()
    }
}
