use crate::core::io::pdb::{ParseReport, PdbFile, PdbReadOptions};
use crate::core::models::element::ElementTable;
use crate::core::models::structure::Structure;
use crate::core::models::topology::{ConstraintKind, MolecularTopology};
use crate::engine::config::TopologyConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks;
use tracing::{info, instrument, warn};

pub const PARSE_PHASE: &str = "Parsing Structure";
pub const CONTACT_PHASE: &str = "Inferring Contacts";
pub const CONSTRAINT_PHASE: &str = "Building Constraint Graph";

/// Everything produced by [`run_from_str`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutput {
    pub structure: Structure,
    pub report: ParseReport,
    pub topology: MolecularTopology,
}

/// Derives the contact list and constraint graph of an already parsed structure.
///
/// Radii for the contact test come from `elements`. The function is pure: the same
/// inputs always produce identical edge lists.
#[instrument(skip_all, name = "build_workflow")]
pub fn run(
    structure: &Structure,
    elements: &ElementTable,
    config: &TopologyConfig,
    reporter: &ProgressReporter,
) -> MolecularTopology {
    info!(
        num_atoms = structure.len(),
        "Building topology for {} backbone and {} branch atoms.",
        structure.backbone_indices().len(),
        structure.branch_indices().len()
    );

    let contacts = reporter.phase(CONTACT_PHASE, || {
        tasks::contacts::run(structure, elements, config, reporter)
    });
    let constraints = reporter.phase(CONSTRAINT_PHASE, || {
        tasks::constraints::run(structure, config, reporter)
    });

    let topology = MolecularTopology {
        contacts,
        constraints,
    };

    info!(
        "Topology complete: {} contacts, {} constraints ({} backbone-backbone, {} backbone-branch, {} proximity).",
        topology.contacts.len(),
        topology.constraints.len(),
        topology.count_kind(ConstraintKind::BackboneBackbone),
        topology.count_kind(ConstraintKind::BackboneBranch),
        topology.count_kind(ConstraintKind::Proximity),
    );
    topology
}

/// Parses PDB text and builds its topology in one step.
pub fn run_from_str(
    text: &str,
    options: &PdbReadOptions,
    config: &TopologyConfig,
    reporter: &ProgressReporter,
) -> Result<BuildOutput, EngineError> {
    let (structure, report) =
        reporter.phase(PARSE_PHASE, || PdbFile::read_str(text, options))?;

    if !report.skipped.is_empty() {
        reporter.report(Progress::Message(format!(
            "Skipped {} malformed ATOM record(s); first at line {}",
            report.skipped.len(),
            report.skipped[0].line
        )));
    }

    if structure.is_empty() {
        warn!("No CA or CG atoms found in input; the topology will be empty.");
    }

    let topology = run(&structure, &options.elements, config, reporter);
    Ok(BuildOutput {
        structure,
        report,
        topology,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::{PdbError, RecordPolicy};
    use crate::core::models::topology::{Contact, ConstraintEdge};
    use std::sync::{Arc, Mutex};

    // Residue 1 (CA, CG) and residue 2 (CA) plus records the parser must ignore.
    const THREE_ATOMS: &str = "\
HEADER    TEST STRUCTURE
ATOM      1  N   MET A   1      27.340  24.430   2.614  1.00  9.67           N
ATOM      2  CA  MET A   1      26.266  25.413   2.842  1.00 10.38           C
ATOM      6  CG  MET A   1      26.639  27.271   5.102  1.00 13.70           C
ATOM     10  CA  GLN A   2      26.850  29.021   3.898  1.00  9.07           C
HETATM  603  O   HOH A  77      45.000  30.000  20.000  1.00 20.00           O
END
";

    fn build(text: &str) -> BuildOutput {
        run_from_str(
            text,
            &PdbReadOptions::default(),
            &TopologyConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap()
    }

    #[test]
    fn three_atom_structure_yields_expected_graph() {
        let output = build(THREE_ATOMS);
        assert_eq!(output.structure.len(), 3);
        assert_eq!(output.report.atom_records, 4);
        assert_eq!(output.report.atoms_retained, 3);

        assert_eq!(
            output.topology.constraints,
            vec![
                ConstraintEdge::new(0, 1, ConstraintKind::BackboneBranch, 1e3),
                ConstraintEdge::new(0, 2, ConstraintKind::BackboneBackbone, 1e6),
            ]
        );
        assert_eq!(output.topology.count_kind(ConstraintKind::Proximity), 0);
    }

    #[test]
    fn contacts_use_parsed_coordinates() {
        // CA(1)-CG(1): d^2 = 0.139 + 3.452 + 5.108 = 8.70, threshold 1.2 * 1.52^2 = 2.77
        let output = build(THREE_ATOMS);
        assert!(output.topology.contacts.is_empty());

        let close = "\
ATOM      2  CA  GLY A   1       0.000   0.000   0.000  1.00  0.00           C
ATOM      3  CA  GLY A   2       1.000   0.000   0.000  1.00  0.00           C
";
        assert_eq!(build(close).topology.contacts, vec![Contact::new(0, 1)]);
    }

    #[test]
    fn building_twice_yields_identical_topology() {
        assert_eq!(build(THREE_ATOMS), build(THREE_ATOMS));
    }

    #[test]
    fn empty_input_yields_empty_topology() {
        let output = build("");
        assert!(output.structure.is_empty());
        assert!(output.topology.is_empty());
    }

    #[test]
    fn parse_failures_surface_as_structure_errors() {
        let bad = "ATOM      2  CA  MET A   X      26.266  25.413   2.842  1.00 10.38           C\n";
        let result = run_from_str(
            bad,
            &PdbReadOptions::default(),
            &TopologyConfig::default(),
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::Structure {
                source: PdbError::Parse { line: 1, .. }
            })
        ));
    }

    #[test]
    fn skip_policy_builds_from_remaining_records() {
        let text = format!(
            "{}ATOM     11  CA  GLN A   2      26.850  xx.xxx   3.898  1.00  9.07           C\n",
            THREE_ATOMS.replace("END\n", "")
        );
        let options = PdbReadOptions {
            policy: RecordPolicy::Skip,
            ..Default::default()
        };
        let output = run_from_str(
            &text,
            &options,
            &TopologyConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(output.structure.len(), 3);
        assert_eq!(output.report.skipped.len(), 1);
        assert_eq!(output.topology.constraints.len(), 2);
    }

    #[test]
    fn skipped_records_are_announced_to_the_reporter() {
        let text = format!(
            "{}ATOM     11  CA  GLN A   2      26.850  xx.xxx   3.898  1.00  9.07           C\n",
            THREE_ATOMS.replace("END\n", "")
        );
        let options = PdbReadOptions {
            policy: RecordPolicy::Skip,
            ..Default::default()
        };
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = messages.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::Message(text) = event {
                sink.lock().unwrap().push(text);
            }
        }));

        run_from_str(&text, &options, &TopologyConfig::default(), &reporter).unwrap();

        assert_eq!(
            *messages.lock().unwrap(),
            vec!["Skipped 1 malformed ATOM record(s); first at line 7".to_string()]
        );
    }

    #[test]
    fn clean_input_sends_no_messages() {
        let messages = Arc::new(Mutex::new(0));
        let sink = messages.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if matches!(event, Progress::Message(_)) {
                *sink.lock().unwrap() += 1;
            }
        }));
        run_from_str(
            THREE_ATOMS,
            &PdbReadOptions::default(),
            &TopologyConfig::default(),
            &reporter,
        )
        .unwrap();
        assert_eq!(*messages.lock().unwrap(), 0);
    }

    #[test]
    fn workflow_reports_each_phase() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::PhaseStart { name } = event {
                sink.lock().unwrap().push(name);
            }
        }));

        run_from_str(
            THREE_ATOMS,
            &PdbReadOptions::default(),
            &TopologyConfig::default(),
            &reporter,
        )
        .unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![PARSE_PHASE, CONTACT_PHASE, CONSTRAINT_PHASE]
        );
    }
}
