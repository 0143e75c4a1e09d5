use crate::core::models::topology::ConstraintKind;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CONTACT_SCALE: f64 = 1.2;
pub const DEFAULT_PROXIMITY_CUTOFF: f64 = 0.25;
pub const DEFAULT_BACKBONE_BACKBONE_STIFFNESS: f64 = 1e6;
pub const DEFAULT_BACKBONE_BRANCH_STIFFNESS: f64 = 1e3;
pub const DEFAULT_PROXIMITY_STIFFNESS: f64 = 10.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Parameter '{name}' must be finite and positive (got {value})")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Strategy used to enumerate candidate contact pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactSearch {
    /// Exhaustive scan over every unordered pair.
    #[default]
    AllPairs,
    /// Radius queries against a k-d tree; reports the same pairs as `AllPairs`.
    KdTree,
}

impl FromStr for ContactSearch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all-pairs" | "all_pairs" | "brute-force" => Ok(ContactSearch::AllPairs),
            "kd-tree" | "kdtree" | "kd_tree" => Ok(ContactSearch::KdTree),
            _ => Err(format!(
                "Invalid contact search '{}'. Expected 'all-pairs' or 'kd-tree'.",
                s
            )),
        }
    }
}

impl fmt::Display for ContactSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactSearch::AllPairs => write!(f, "all-pairs"),
            ContactSearch::KdTree => write!(f, "kd-tree"),
        }
    }
}

/// How chain identifiers take part in backbone and branch edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainPolicy {
    /// Backbone-backbone and backbone-branch edges require the same chain id.
    #[default]
    RespectChainIds,
    /// Residue numbers alone decide; chain ids are ignored.
    Ignore,
}

impl FromStr for ChainPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "respect-chain-ids" | "respect" => Ok(ChainPolicy::RespectChainIds),
            "ignore" | "ignore-chain-ids" => Ok(ChainPolicy::Ignore),
            _ => Err(format!(
                "Invalid chain policy '{}'. Expected 'respect-chain-ids' or 'ignore'.",
                s
            )),
        }
    }
}

impl fmt::Display for ChainPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainPolicy::RespectChainIds => write!(f, "respect-chain-ids"),
            ChainPolicy::Ignore => write!(f, "ignore"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StiffnessConfig {
    pub backbone_backbone: f64,
    pub backbone_branch: f64,
    pub proximity: f64,
}

impl Default for StiffnessConfig {
    fn default() -> Self {
        Self {
            backbone_backbone: DEFAULT_BACKBONE_BACKBONE_STIFFNESS,
            backbone_branch: DEFAULT_BACKBONE_BRANCH_STIFFNESS,
            proximity: DEFAULT_PROXIMITY_STIFFNESS,
        }
    }
}

impl StiffnessConfig {
    pub fn for_kind(&self, kind: ConstraintKind) -> f64 {
        match kind {
            ConstraintKind::BackboneBackbone => self.backbone_backbone,
            ConstraintKind::BackboneBranch => self.backbone_branch,
            ConstraintKind::Proximity => self.proximity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopologyConfig {
    /// Multiplier on the squared radius sum in the contact test.
    pub contact_scale: f64,
    pub contact_search: ContactSearch,
    /// Real-space distance below which a proximity constraint is drawn.
    pub proximity_cutoff: f64,
    pub stiffness: StiffnessConfig,
    pub chain_policy: ChainPolicy,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            contact_scale: DEFAULT_CONTACT_SCALE,
            contact_search: ContactSearch::default(),
            proximity_cutoff: DEFAULT_PROXIMITY_CUTOFF,
            stiffness: StiffnessConfig::default(),
            chain_policy: ChainPolicy::default(),
        }
    }
}

#[derive(Default)]
pub struct TopologyConfigBuilder {
    contact_scale: Option<f64>,
    contact_search: Option<ContactSearch>,
    proximity_cutoff: Option<f64>,
    backbone_backbone_stiffness: Option<f64>,
    backbone_branch_stiffness: Option<f64>,
    proximity_stiffness: Option<f64>,
    chain_policy: Option<ChainPolicy>,
}

impl TopologyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contact_scale(mut self, scale: f64) -> Self {
        self.contact_scale = Some(scale);
        self
    }
    pub fn contact_search(mut self, search: ContactSearch) -> Self {
        self.contact_search = Some(search);
        self
    }
    pub fn proximity_cutoff(mut self, cutoff: f64) -> Self {
        self.proximity_cutoff = Some(cutoff);
        self
    }
    pub fn backbone_backbone_stiffness(mut self, stiffness: f64) -> Self {
        self.backbone_backbone_stiffness = Some(stiffness);
        self
    }
    pub fn backbone_branch_stiffness(mut self, stiffness: f64) -> Self {
        self.backbone_branch_stiffness = Some(stiffness);
        self
    }
    pub fn proximity_stiffness(mut self, stiffness: f64) -> Self {
        self.proximity_stiffness = Some(stiffness);
        self
    }
    pub fn chain_policy(mut self, policy: ChainPolicy) -> Self {
        self.chain_policy = Some(policy);
        self
    }

    /// Builds the configuration, filling unset fields with defaults.
    pub fn build(self) -> Result<TopologyConfig, ConfigError> {
        let stiffness = StiffnessConfig {
            backbone_backbone: positive(
                "stiffness.backbone-backbone",
                self.backbone_backbone_stiffness
                    .unwrap_or(DEFAULT_BACKBONE_BACKBONE_STIFFNESS),
            )?,
            backbone_branch: positive(
                "stiffness.backbone-branch",
                self.backbone_branch_stiffness
                    .unwrap_or(DEFAULT_BACKBONE_BRANCH_STIFFNESS),
            )?,
            proximity: positive(
                "stiffness.proximity",
                self.proximity_stiffness
                    .unwrap_or(DEFAULT_PROXIMITY_STIFFNESS),
            )?,
        };
        Ok(TopologyConfig {
            contact_scale: positive(
                "contact-scale",
                self.contact_scale.unwrap_or(DEFAULT_CONTACT_SCALE),
            )?,
            contact_search: self.contact_search.unwrap_or_default(),
            proximity_cutoff: positive(
                "proximity-cutoff",
                self.proximity_cutoff.unwrap_or(DEFAULT_PROXIMITY_CUTOFF),
            )?,
            stiffness,
            chain_policy: self.chain_policy.unwrap_or_default(),
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_yields_defaults() {
        let config = TopologyConfigBuilder::new().build().unwrap();
        assert_eq!(config, TopologyConfig::default());
        assert_eq!(config.contact_scale, 1.2);
        assert_eq!(config.proximity_cutoff, 0.25);
        assert_eq!(config.stiffness.backbone_backbone, 1e6);
        assert_eq!(config.stiffness.backbone_branch, 1e3);
        assert_eq!(config.stiffness.proximity, 10.0);
        assert_eq!(config.chain_policy, ChainPolicy::RespectChainIds);
        assert_eq!(config.contact_search, ContactSearch::AllPairs);
    }

    #[test]
    fn builder_applies_every_setter() {
        let config = TopologyConfigBuilder::new()
            .contact_scale(1.5)
            .contact_search(ContactSearch::KdTree)
            .proximity_cutoff(6.25)
            .backbone_backbone_stiffness(5e5)
            .backbone_branch_stiffness(500.0)
            .proximity_stiffness(1.0)
            .chain_policy(ChainPolicy::Ignore)
            .build()
            .unwrap();
        assert_eq!(config.contact_scale, 1.5);
        assert_eq!(config.contact_search, ContactSearch::KdTree);
        assert_eq!(config.proximity_cutoff, 6.25);
        assert_eq!(config.stiffness.for_kind(ConstraintKind::BackboneBackbone), 5e5);
        assert_eq!(config.stiffness.for_kind(ConstraintKind::BackboneBranch), 500.0);
        assert_eq!(config.stiffness.for_kind(ConstraintKind::Proximity), 1.0);
        assert_eq!(config.chain_policy, ChainPolicy::Ignore);
    }

    #[test]
    fn builder_rejects_non_positive_or_non_finite_values() {
        assert_eq!(
            TopologyConfigBuilder::new().proximity_cutoff(0.0).build(),
            Err(ConfigError::InvalidParameter {
                name: "proximity-cutoff",
                value: 0.0
            })
        );
        assert!(TopologyConfigBuilder::new().contact_scale(-1.0).build().is_err());
        assert!(
            TopologyConfigBuilder::new()
                .proximity_stiffness(f64::INFINITY)
                .build()
                .is_err()
        );
    }

    #[test]
    fn enums_parse_from_kebab_case_strings() {
        assert_eq!("kd-tree".parse::<ContactSearch>(), Ok(ContactSearch::KdTree));
        assert_eq!("ALL-PAIRS".parse::<ContactSearch>(), Ok(ContactSearch::AllPairs));
        assert!("grid".parse::<ContactSearch>().is_err());
        assert_eq!("ignore".parse::<ChainPolicy>(), Ok(ChainPolicy::Ignore));
        assert_eq!(
            ChainPolicy::RespectChainIds.to_string().parse::<ChainPolicy>(),
            Ok(ChainPolicy::RespectChainIds)
        );
        assert!("split".parse::<ChainPolicy>().is_err());
    }
}
