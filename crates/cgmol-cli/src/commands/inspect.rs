use crate::cli::InspectArgs;
use crate::config::build_config;
use crate::error::Result;
use cgmol::core::io::pdb::ParseReport;
use cgmol::core::models::atom::AtomKind;
use cgmol::core::models::structure::Structure;
use cgmol::core::models::topology::{ConstraintKind, MolecularTopology};
use cgmol::engine::progress::ProgressReporter;
use cgmol::workflows;
use std::fmt::Write;

pub fn run(args: InspectArgs) -> Result<()> {
    let config = build_config(&args.topology)?;
    let (structure, report) = super::read_structure(&args.input, &config.read_options)?;

    let topology = workflows::build::run(
        &structure,
        &config.read_options.elements,
        &config.topology,
        &ProgressReporter::new(),
    );

    print!("{}", format_summary(&structure, &report, &topology));
    Ok(())
}

pub fn format_summary(
    structure: &Structure,
    report: &ParseReport,
    topology: &MolecularTopology,
) -> String {
    let chains: String = structure
        .chain_ids()
        .into_iter()
        .map(|c| if c == ' ' { '-' } else { c })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "Records");
    let _ = writeln!(out, "  lines scanned      {:>8}", report.lines_scanned);
    let _ = writeln!(out, "  ATOM records       {:>8}", report.atom_records);
    let _ = writeln!(out, "  skipped            {:>8}", report.skipped.len());
    let _ = writeln!(out, "Model");
    let _ = writeln!(out, "  atoms              {:>8}", structure.len());
    for kind in [AtomKind::Backbone, AtomKind::Branch] {
        let label = format!("{} ({})", kind, kind.atom_name());
        let _ = writeln!(out, "  {:<18} {:>8}", label, structure.count_kind(kind));
    }
    let _ = writeln!(out, "  residues           {:>8}", structure.residue_count());
    let _ = writeln!(out, "  chains             {:>8}", chains);
    let _ = writeln!(out, "Topology");
    let _ = writeln!(out, "  contacts           {:>8}", topology.contacts.len());
    for kind in ConstraintKind::ALL {
        let _ = writeln!(out, "  {:<18} {:>8}", kind.to_string(), topology.count_kind(kind));
    }
    for skipped in &report.skipped {
        let _ = writeln!(out, "  line {}: {}", skipped.line, skipped.kind);
    }
    out
}
