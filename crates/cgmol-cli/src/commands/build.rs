use crate::cli::BuildArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use cgmol::{
    core::io::{pdb::PdbFile, traits::StructureFile},
    engine::progress::ProgressReporter,
    workflows::{self, scene::MoleculeScene},
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

pub fn run(args: BuildArgs) -> Result<()> {
    check_output_paths(&args)?;

    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(&args.topology)?;

    let (structure, _report) = super::read_structure(&args.input, &config.read_options)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Building topology for {} atoms...", structure.len());
    let topology = workflows::build::run(
        &structure,
        &config.read_options.elements,
        &config.topology,
        &reporter,
    );
    let scene = MoleculeScene::new(structure, topology, config.transform)?;

    write_scene(&scene, &args.output)?;
    println!(
        "✓ Scene with {} bodies, {} contacts and {} constraints written to: {}",
        scene.body_count(),
        scene.contacts().len(),
        scene.constraint_edges().len(),
        args.output.display()
    );

    if let Some(path) = &args.coarse_pdb {
        info!("Writing coarse-grained structure to {:?}", path);
        PdbFile::write_to_path(scene.structure(), path).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        })?;
        println!("✓ Coarse-grained structure written to: {}", path.display());
    }

    Ok(())
}

fn check_output_paths(args: &BuildArgs) -> Result<()> {
    if args.output == args.input {
        return Err(CliError::Argument(
            "The output path must differ from the input path.".to_string(),
        ));
    }
    if let Some(coarse) = &args.coarse_pdb {
        if coarse == &args.input || coarse == &args.output {
            return Err(CliError::Argument(
                "--coarse-pdb must differ from both the input and the output path.".to_string(),
            ));
        }
    }
    Ok(())
}

fn write_scene(scene: &MoleculeScene, path: &Path) -> Result<()> {
    info!("Writing scene export to {:?}", path);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &scene.export())
        .map_err(|e| CliError::Other(e.into()))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
