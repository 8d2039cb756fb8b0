//! Command handlers for the `bgp` binary.
//!
//! Shared helpers live here; command-specific logic lives in the submodules.

pub mod ingest;

use anyhow::Result;
use bgp_config::LoadedConfig;

/// Load layered YAML. No paths means "all defaults".
pub fn load_config(paths: &[String]) -> Result<LoadedConfig> {
    if paths.is_empty() {
        return bgp_config::load_layered_yaml_from_strings(&[]);
    }
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    bgp_config::load_layered_yaml(&path_refs)
}
