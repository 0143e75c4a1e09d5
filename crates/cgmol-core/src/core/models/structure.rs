use super::atom::{Atom, AtomKind};
use std::collections::BTreeSet;

/// The ordered list of coarse-grained atoms parsed from one input.
///
/// Order is the input record order and is meaningful: adjacency in the list
/// approximates adjacency along the polymer chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    atoms: Vec<Atom>,
}

impl Structure {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter()
    }

    /// Indices of backbone atoms, in list order.
    pub fn backbone_indices(&self) -> Vec<usize> {
        self.indices_of(AtomKind::Backbone)
    }

    pub fn branch_indices(&self) -> Vec<usize> {
        self.indices_of(AtomKind::Branch)
    }

    fn indices_of(&self, kind: AtomKind) -> Vec<usize> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| atom.kind == kind)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn count_kind(&self, kind: AtomKind) -> usize {
        self.atoms.iter().filter(|atom| atom.kind == kind).count()
    }

    /// Number of distinct `(chain, residue number)` pairs.
    pub fn residue_count(&self) -> usize {
        self.atoms
            .iter()
            .map(|atom| (atom.chain_id, atom.residue_number))
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Distinct chain identifiers, in order of first appearance.
    pub fn chain_ids(&self) -> Vec<char> {
        let mut seen = Vec::new();
        for atom in &self.atoms {
            if !seen.contains(&atom.chain_id) {
                seen.push(atom.chain_id);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::Element;
    use nalgebra::Point3;

    fn atom(kind: AtomKind, residue: isize, chain: char) -> Atom {
        Atom::new(kind, Element::C, residue, "LYS", Point3::origin()).with_chain(chain)
    }

    fn sample() -> Structure {
        Structure::new(vec![
            atom(AtomKind::Backbone, 1, 'A'),
            atom(AtomKind::Branch, 1, 'A'),
            atom(AtomKind::Backbone, 2, 'A'),
            atom(AtomKind::Backbone, 1, 'B'),
        ])
    }

    #[test]
    fn empty_structure_reports_empty() {
        let structure = Structure::default();
        assert!(structure.is_empty());
        assert_eq!(structure.len(), 0);
        assert!(structure.backbone_indices().is_empty());
        assert_eq!(structure.residue_count(), 0);
    }

    #[test]
    fn indices_follow_list_order() {
        let structure = sample();
        assert_eq!(structure.backbone_indices(), vec![0, 2, 3]);
        assert_eq!(structure.branch_indices(), vec![1]);
        assert_eq!(structure.count_kind(AtomKind::Backbone), 3);
    }

    #[test]
    fn residues_are_distinguished_by_chain() {
        let structure = sample();
        assert_eq!(structure.residue_count(), 3);
        assert_eq!(structure.chain_ids(), vec!['A', 'B']);
    }

    #[test]
    fn atom_lookup_is_bounds_checked() {
        let structure = sample();
        assert!(structure.atom(3).is_some());
        assert!(structure.atom(4).is_none());
        assert_eq!((&structure).into_iter().count(), 4);
    }
}
