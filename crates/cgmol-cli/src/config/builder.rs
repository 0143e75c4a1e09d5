use super::file::{FileConfig, apply_set_values};
use super::models::AppConfig;
use crate::cli::TopologyArgs;
use crate::error::{CliError, Result};
use cgmol::core::io::pdb::{PdbReadOptions, RecordPolicy};
use cgmol::core::models::element::ElementTable;
use cgmol::core::utils::geometry::{
    DEFAULT_DISPLAY_SCALE, DEFAULT_DISPLAY_TRANSLATION, DisplayTransform,
};
use cgmol::engine::config::{ChainPolicy, ContactSearch, TopologyConfigBuilder};
use nalgebra::Vector3;
use std::str::FromStr;
use tracing::{debug, info};

/// Resolves the run configuration. Precedence: CLI flag, then `--set`, then the
/// config file, then built-in defaults.
pub fn build_config(args: &TopologyArgs) -> Result<AppConfig> {
    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let parser_file = file_config.parser.take().unwrap_or_default();
    let contacts_file = file_config.contacts.take().unwrap_or_default();
    let mut constraints_file = file_config.constraints.take().unwrap_or_default();
    let stiffness_file = constraints_file.stiffness.take().unwrap_or_default();
    let scene_file = file_config.scene.take().unwrap_or_default();

    let policy = if args.skip_bad_records {
        RecordPolicy::Skip
    } else {
        parse_choice("parser.record-policy", parser_file.record_policy.as_deref())?
            .unwrap_or_default()
    };

    let elements = match args
        .element_table
        .as_ref()
        .or(parser_file.element_table.as_ref())
    {
        Some(path) => {
            info!("Loading element table from {:?}", path);
            ElementTable::load(path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?
        }
        None => ElementTable::default(),
    };

    let contact_search = if args.kd_tree {
        ContactSearch::KdTree
    } else {
        parse_choice("contacts.search", contacts_file.search.as_deref())?.unwrap_or_default()
    };
    let chain_policy = if args.ignore_chains {
        ChainPolicy::Ignore
    } else {
        parse_choice("constraints.chain-policy", constraints_file.chain_policy.as_deref())?
            .unwrap_or_default()
    };

    let mut builder = TopologyConfigBuilder::new()
        .contact_search(contact_search)
        .chain_policy(chain_policy);
    if let Some(scale) = args.contact_scale.or(contacts_file.scale) {
        builder = builder.contact_scale(scale);
    }
    if let Some(cutoff) = args.proximity_cutoff.or(constraints_file.proximity_cutoff) {
        builder = builder.proximity_cutoff(cutoff);
    }
    if let Some(value) = stiffness_file.backbone_backbone {
        builder = builder.backbone_backbone_stiffness(value);
    }
    if let Some(value) = stiffness_file.backbone_branch {
        builder = builder.backbone_branch_stiffness(value);
    }
    if let Some(value) = stiffness_file.proximity {
        builder = builder.proximity_stiffness(value);
    }
    let topology = builder.build().map_err(|e| CliError::Config(e.to_string()))?;

    let transform = DisplayTransform::new(
        scene_file.scale.unwrap_or(DEFAULT_DISPLAY_SCALE),
        Vector3::from(
            scene_file
                .translation
                .unwrap_or(DEFAULT_DISPLAY_TRANSLATION),
        ),
    )
    .map_err(|e| CliError::Config(e.to_string()))?;

    let config = AppConfig {
        read_options: PdbReadOptions { elements, policy },
        topology,
        transform,
    };
    debug!(
        topology = ?config.topology,
        transform = ?config.transform,
        record_policy = %policy,
        "Resolved configuration."
    );
    Ok(config)
}

fn parse_choice<T>(key: &str, value: Option<&str>) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    value
        .map(|v| {
            T::from_str(v).map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use cgmol::core::models::element::Element;
    use clap::Parser;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::{TempDir, tempdir};

    fn write_config_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn topology_args(extra: &[&str]) -> TopologyArgs {
        let mut args = vec!["cgmol", "inspect", "-i", "in.pdb"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Inspect(inspect) => inspect.topology,
            _ => panic!("Expected 'inspect' subcommand"),
        }
    }

    fn with_config(path: &Path, extra: &[&str]) -> TopologyArgs {
        let mut args = vec!["-c", path.to_str().unwrap()];
        args.extend_from_slice(extra);
        topology_args(&args)
    }

    #[test]
    fn no_sources_yields_library_defaults() {
        let config = build_config(&TopologyArgs::default()).unwrap();
        assert_eq!(config.read_options, PdbReadOptions::default());
        assert_eq!(config.topology, TopologyConfigBuilder::new().build().unwrap());
        assert_eq!(config.transform, DisplayTransform::default());
    }

    #[test]
    fn file_values_are_applied() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "cgmol.toml",
            r#"
            [parser]
            record-policy = "skip"

            [contacts]
            search = "kd-tree"

            [constraints]
            proximity-cutoff = 6.25
            chain-policy = "ignore"

            [constraints.stiffness]
            backbone-branch = 500.0

            [scene]
            scale = 1.0
            translation = [0.0, 0.0, 0.0]
            "#,
        );

        let config = build_config(&with_config(&path, &[])).unwrap();
        assert_eq!(config.read_options.policy, RecordPolicy::Skip);
        assert_eq!(config.topology.contact_search, ContactSearch::KdTree);
        assert_eq!(config.topology.proximity_cutoff, 6.25);
        assert_eq!(config.topology.chain_policy, ChainPolicy::Ignore);
        assert_eq!(config.topology.stiffness.backbone_branch, 500.0);
        assert_eq!(config.topology.stiffness.backbone_backbone, 1e6);
        assert_eq!(config.transform, DisplayTransform::identity());
    }

    #[test]
    fn cli_flags_override_set_values_and_file() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "override.toml",
            "[constraints]\nproximity-cutoff = 6.25 # Will be overridden\n\n[contacts]\nscale = 1.1\n",
        );

        let args = with_config(
            &path,
            &[
                "-S",
                "constraints.proximity-cutoff=4.0",
                "-S",
                "contacts.scale=1.4",
                "--proximity-cutoff",
                "3.5",
            ],
        );
        let config = build_config(&args).unwrap();
        assert_eq!(config.topology.proximity_cutoff, 3.5);
        assert_eq!(config.topology.contact_scale, 1.4);
    }

    #[test]
    fn boolean_flags_override_file_choices() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "choices.toml",
            "[parser]\nrecord-policy = \"strict\"\n\n[contacts]\nsearch = \"all-pairs\"\n",
        );
        let args = with_config(&path, &["--kd-tree", "--ignore-chains", "--skip-bad-records"]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.read_options.policy, RecordPolicy::Skip);
        assert_eq!(config.topology.contact_search, ContactSearch::KdTree);
        assert_eq!(config.topology.chain_policy, ChainPolicy::Ignore);
    }

    #[test]
    fn element_table_path_is_loaded() {
        let dir = tempdir().unwrap();
        let table = write_config_file(&dir, "radii.toml", "[C]\nradius = 0.07\n");
        let args = topology_args(&["--element-table", table.to_str().unwrap()]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.read_options.elements.radius(Element::C), 0.07);
    }

    #[test]
    fn invalid_choices_and_values_return_config_errors() {
        let args = topology_args(&["-S", "contacts.search=octree"]);
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let args = topology_args(&["--proximity-cutoff=-1.0"]);
        let result = build_config(&args);
        assert!(matches!(&result, Err(CliError::Config(msg)) if msg.contains("proximity-cutoff")));

        let args = topology_args(&["-S", "scene.scale=0"]);
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn broken_element_table_is_a_file_parsing_error() {
        let dir = tempdir().unwrap();
        let table = write_config_file(&dir, "radii.toml", "[C]\nradius = -1.0\n");
        let args = topology_args(&["--element-table", table.to_str().unwrap()]);
        assert!(matches!(
            build_config(&args),
            Err(CliError::FileParsing { .. })
        ));
    }
}
