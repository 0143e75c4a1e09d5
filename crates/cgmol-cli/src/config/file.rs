use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileParserConfig {
    #[serde(rename = "record-policy")]
    pub record_policy: Option<String>,
    #[serde(rename = "element-table")]
    pub element_table: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileContactsConfig {
    pub scale: Option<f64>,
    pub search: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileStiffnessConfig {
    #[serde(rename = "backbone-backbone")]
    pub backbone_backbone: Option<f64>,
    #[serde(rename = "backbone-branch")]
    pub backbone_branch: Option<f64>,
    pub proximity: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConstraintsConfig {
    #[serde(rename = "proximity-cutoff")]
    pub proximity_cutoff: Option<f64>,
    #[serde(rename = "chain-policy")]
    pub chain_policy: Option<String>,
    pub stiffness: Option<FileStiffnessConfig>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSceneConfig {
    pub scale: Option<f64>,
    pub translation: Option<[f64; 3]>,
}

/// The on-disk configuration; every field is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub parser: Option<FileParserConfig>,
    pub contacts: Option<FileContactsConfig>,
    pub constraints: Option<FileConstraintsConfig>,
    pub scene: Option<FileSceneConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn parse_translation(key: &str, value: &str) -> Result<[f64; 3]> {
    let parts: Vec<&str> = value
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .collect();
    if parts.len() != 3 {
        return Err(CliError::Config(format!(
            "Invalid vector value for {}: '{}'. Expected X,Y,Z.",
            key, value
        )));
    }
    Ok([
        parse_value(key, parts[0], "float")?,
        parse_value(key, parts[1], "float")?,
        parse_value(key, parts[2], "float")?,
    ])
}

/// Applies repeated `KEY=VALUE` overrides on top of a file configuration.
pub fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "parser.record-policy" => {
                config.parser.get_or_insert_with(Default::default).record_policy =
                    Some(value_str.trim().to_string());
            }
            "parser.element-table" => {
                config.parser.get_or_insert_with(Default::default).element_table =
                    Some(PathBuf::from(value_str.trim()));
            }
            "contacts.scale" => {
                config.contacts.get_or_insert_with(Default::default).scale =
                    Some(parse_value(key, value_str, "float")?);
            }
            "contacts.search" => {
                config.contacts.get_or_insert_with(Default::default).search =
                    Some(value_str.trim().to_string());
            }
            "constraints.proximity-cutoff" => {
                config
                    .constraints
                    .get_or_insert_with(Default::default)
                    .proximity_cutoff = Some(parse_value(key, value_str, "float")?);
            }
            "constraints.chain-policy" => {
                config
                    .constraints
                    .get_or_insert_with(Default::default)
                    .chain_policy = Some(value_str.trim().to_string());
            }
            "constraints.stiffness.backbone-backbone"
            | "constraints.stiffness.backbone-branch"
            | "constraints.stiffness.proximity" => {
                let value = parse_value(key, value_str, "float")?;
                let stiffness = config
                    .constraints
                    .get_or_insert_with(Default::default)
                    .stiffness
                    .get_or_insert_with(Default::default);
                match key.rsplit('.').next() {
                    Some("backbone-backbone") => stiffness.backbone_backbone = Some(value),
                    Some("backbone-branch") => stiffness.backbone_branch = Some(value),
                    _ => stiffness.proximity = Some(value),
                }
            }
            "scene.scale" => {
                config.scene.get_or_insert_with(Default::default).scale =
                    Some(parse_value(key, value_str, "float")?);
            }
            "scene.translation" => {
                config.scene.get_or_insert_with(Default::default).translation =
                    Some(parse_translation(key, value_str)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
