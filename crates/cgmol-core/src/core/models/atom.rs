use super::element::Element;
use nalgebra::Point3;
use serde::Serialize;
use std::fmt;

/// Atom name marking the single backbone point of a residue.
pub const BACKBONE_ATOM_NAME: &str = "CA";
/// Atom name marking the side-chain (branch) point of a residue.
pub const BRANCH_ATOM_NAME: &str = "CG";

/// The role of a coarse-grained point within its residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtomKind {
    /// Alpha carbon, approximating the main chain.
    Backbone,
    /// Gamma carbon, approximating the side chain.
    Branch,
}

impl AtomKind {
    /// Returns the kind for an exact atom name, or `None` for names outside the
    /// coarse-grained representation.
    pub fn from_atom_name(name: &str) -> Option<Self> {
        match name {
            BACKBONE_ATOM_NAME => Some(AtomKind::Backbone),
            BRANCH_ATOM_NAME => Some(AtomKind::Branch),
            _ => None,
        }
    }

    pub fn atom_name(&self) -> &'static str {
        match self {
            AtomKind::Backbone => BACKBONE_ATOM_NAME,
            AtomKind::Branch => BRANCH_ATOM_NAME,
        }
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomKind::Backbone => write!(f, "backbone"),
            AtomKind::Branch => write!(f, "branch"),
        }
    }
}

/// A coarse-grained point parsed from one `ATOM` record.
///
/// Atoms are created once by the parser and never mutated. Their position in the
/// owning [`Structure`](super::structure::Structure) is their identity: edges refer to
/// atoms by list index.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom name, `"CA"` or `"CG"`.
    pub name: String,
    /// Backbone or branch, derived from the name.
    pub kind: AtomKind,
    /// Element class derived from the leading character of the name.
    pub element: Element,
    /// Residue sequence number.
    pub residue_number: isize,
    /// Three-letter residue code (e.g. "ALA").
    pub residue_name: String,
    /// Chain identifier, `' '` when the column is blank.
    pub chain_id: char,
    /// Coordinates in Angstroms, exactly as parsed.
    pub position: Point3<f64>,
    /// 1-based line number of the source record, 0 for atoms not read from text.
    pub line: usize,
}

impl Atom {
    /// Creates an atom of the given kind; the name follows from the kind.
    pub fn new(
        kind: AtomKind,
        element: Element,
        residue_number: isize,
        residue_name: &str,
        position: Point3<f64>,
    ) -> Self {
        Self {
            name: kind.atom_name().to_string(),
            kind,
            element,
            residue_number,
            residue_name: residue_name.to_string(),
            chain_id: ' ',
            position,
            line: 0,
        }
    }

    pub fn with_chain(mut self, chain_id: char) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn distance_squared(&self, other: &Atom) -> f64 {
        (self.position - other.position).norm_squared()
    }

    pub fn distance(&self, other: &Atom) -> f64 {
        (self.position - other.position).norm()
    }
}
