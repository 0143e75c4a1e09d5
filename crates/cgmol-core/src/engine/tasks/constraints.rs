use crate::core::models::atom::{Atom, AtomKind};
use crate::core::models::structure::Structure;
use crate::core::models::topology::{ConstraintEdge, ConstraintKind};
use crate::engine::config::{ChainPolicy, TopologyConfig};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{debug, instrument};

/// Decides which constraint, if any, links a backbone `anchor` to a later atom.
///
/// Rules are tried in priority order: consecutive backbone, own branch, proximity.
/// A pair that qualifies for one of the first two never becomes a proximity edge.
pub fn classify_pair(anchor: &Atom, other: &Atom, config: &TopologyConfig) -> Option<ConstraintKind> {
    let same_chain = match config.chain_policy {
        ChainPolicy::Ignore => true,
        ChainPolicy::RespectChainIds => anchor.chain_id == other.chain_id,
    };

    match other.kind {
        AtomKind::Backbone
            if same_chain && anchor.residue_number.checked_add(1) == Some(other.residue_number) =>
        {
            Some(ConstraintKind::BackboneBackbone)
        }
        AtomKind::Branch if same_chain && other.residue_number == anchor.residue_number => {
            Some(ConstraintKind::BackboneBranch)
        }
        _ if anchor.distance(other) < config.proximity_cutoff => Some(ConstraintKind::Proximity),
        _ => None,
    }
}

/// Builds the constraint graph seeding the physics engine.
///
/// Each backbone atom is paired with every atom after it in list order, so pairs are
/// visited once with `i < j`. Residue numbering must ascend without gaps for the
/// backbone rule to fire; out-of-order or missing residues simply produce no
/// backbone edge.
#[instrument(skip_all, name = "constraint_graph_task")]
pub fn run(
    structure: &Structure,
    config: &TopologyConfig,
    reporter: &ProgressReporter,
) -> Vec<ConstraintEdge> {
    let atoms = structure.atoms();
    let anchors = structure.backbone_indices();

    reporter.report(Progress::TaskStart {
        total_steps: anchors.len() as u64,
    });

    let mut edges = Vec::new();
    for &j in &anchors {
        let anchor = &atoms[j];
        for (jj, other) in atoms.iter().enumerate().skip(j + 1) {
            if let Some(kind) = classify_pair(anchor, other, config) {
                edges.push(ConstraintEdge::new(
                    j,
                    jj,
                    kind,
                    config.stiffness.for_kind(kind),
                ));
            }
        }
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);

    debug!(
        backbone_backbone = edges
            .iter()
            .filter(|e| e.kind == ConstraintKind::BackboneBackbone)
            .count(),
        backbone_branch = edges
            .iter()
            .filter(|e| e.kind == ConstraintKind::BackboneBranch)
            .count(),
        proximity = edges
            .iter()
            .filter(|e| e.kind == ConstraintKind::Proximity)
            .count(),
        "Constraint graph complete."
    );
    edges
}
