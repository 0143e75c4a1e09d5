pub mod build;
pub mod inspect;

use crate::error::{CliError, Result};
use cgmol::core::io::pdb::{ParseReport, PdbFile, PdbReadOptions};
use cgmol::core::io::traits::StructureFile;
use cgmol::core::models::structure::Structure;
use std::path::Path;
use tracing::{info, warn};

fn read_structure(path: &Path, options: &PdbReadOptions) -> Result<(Structure, ParseReport)> {
    info!("Loading input structure from {:?}", path);
    let (structure, report) =
        PdbFile::read_path_with(path, options).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

    if !report.skipped.is_empty() {
        warn!(
            "Skipped {} malformed ATOM record(s) in {:?}.",
            report.skipped.len(),
            path
        );
    }
    if structure.is_empty() {
        warn!("No CA or CG atoms found in {:?}.", path);
    }
    Ok((structure, report))
}
