use crate::core::models::atom::{Atom, AtomKind};
use crate::core::models::structure::Structure;
use crate::core::models::topology::{ConstraintEdge, ConstraintKind, Contact, MolecularTopology};
use crate::core::utils::geometry::{DisplayTransform, to_array};
use crate::engine::error::EngineError;
use nalgebra::Point3;
use serde::Serialize;

/// A built molecule together with the transform placing it in a scene.
///
/// Owns everything a front end needs to create one rigid body per atom, joints for
/// the constraint graph and colliders or bonds for the contacts. Indices in the edge
/// lists refer to positions in [`MoleculeScene::structure`].
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeScene {
    structure: Structure,
    topology: MolecularTopology,
    transform: DisplayTransform,
}

impl MoleculeScene {
    /// Creates a scene, checking that every edge refers to an existing atom.
    pub fn new(
        structure: Structure,
        topology: MolecularTopology,
        transform: DisplayTransform,
    ) -> Result<Self, EngineError> {
        let len = structure.len();
        let out_of_range = topology
            .contacts
            .iter()
            .map(|c| c.j)
            .chain(topology.constraints.iter().map(|e| e.j))
            .find(|&index| index >= len);
        if let Some(index) = out_of_range {
            return Err(EngineError::AtomIndex { index, len });
        }

        Ok(Self {
            structure,
            topology,
            transform,
        })
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn topology(&self) -> &MolecularTopology {
        &self.topology
    }

    /// One body per atom.
    pub fn body_count(&self) -> usize {
        self.structure.len()
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.topology.contacts
    }

    pub fn constraint_edges(&self) -> &[ConstraintEdge] {
        &self.topology.constraints
    }

    /// Atom positions mapped into display space, in atom order.
    pub fn display_positions(&self) -> Vec<Point3<f64>> {
        self.structure
            .iter()
            .map(|atom| self.transform.to_display(&atom.position))
            .collect()
    }

    /// Length a constraint should hold in display space, taken from the parsed pose.
    pub fn rest_length(&self, edge: &ConstraintEdge) -> f64 {
        let atoms = self.structure.atoms();
        self.transform.scale_length(atoms[edge.i].distance(&atoms[edge.j]))
    }

    pub fn export(&self) -> SceneExport {
        let translation = self.transform.translation();
        SceneExport {
            transform: TransformExport {
                scale: self.transform.scale(),
                translation: [translation.x, translation.y, translation.z],
            },
            atoms: self
                .structure
                .iter()
                .zip(self.display_positions())
                .enumerate()
                .map(|(index, (atom, display))| AtomExport::new(index, atom, &display))
                .collect(),
            contacts: self
                .topology
                .contacts
                .iter()
                .map(|c| [c.i, c.j])
                .collect(),
            constraints: self
                .topology
                .constraints
                .iter()
                .map(|e| ConstraintExport {
                    i: e.i,
                    j: e.j,
                    kind: e.kind,
                    stiffness: e.stiffness,
                    rest_length: self.rest_length(e),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneExport {
    pub transform: TransformExport,
    pub atoms: Vec<AtomExport>,
    pub contacts: Vec<[usize; 2]>,
    pub constraints: Vec<ConstraintExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformExport {
    pub scale: f64,
    pub translation: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomExport {
    pub index: usize,
    pub name: String,
    pub kind: AtomKind,
    pub element: String,
    pub residue_number: isize,
    pub residue_name: String,
    pub chain_id: String,
    pub position: [f64; 3],
    pub display_position: [f64; 3],
}

impl AtomExport {
    fn new(index: usize, atom: &Atom, display: &Point3<f64>) -> Self {
        Self {
            index,
            name: atom.name.clone(),
            kind: atom.kind,
            element: atom.element.to_string(),
            residue_number: atom.residue_number,
            residue_name: atom.residue_name.clone(),
            chain_id: atom.chain_id.to_string().trim().to_string(),
            position: to_array(&atom.position),
            display_position: to_array(display),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintExport {
    pub i: usize,
    pub j: usize,
    pub kind: ConstraintKind,
    pub stiffness: f64,
    /// Display-space distance between the two atoms in the parsed pose.
    pub rest_length: f64,
}
