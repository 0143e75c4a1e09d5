use cgmol::core::io::pdb::PdbReadOptions;
use cgmol::core::utils::geometry::DisplayTransform;
use cgmol::engine::config::TopologyConfig;

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub read_options: PdbReadOptions,
    pub topology: TopologyConfig,
    pub transform: DisplayTransform,
}
