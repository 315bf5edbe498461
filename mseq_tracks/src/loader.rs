use std::path::Path;

use log::debug;

use crate::config::{PortConfig, ProjectConfig};
use crate::error::ConfigError;

/// Load and parse a port config document from `path`.
pub fn load_port_config<P: AsRef<Path>>(path: P) -> Result<PortConfig, ConfigError> {
    let path = path.as_ref();
    debug!("loading port config from {}", path.display());
    let contents = fs_err::read_to_string(path)?;
    Ok(serde_yml::from_str(&contents)?)
}

/// Load and parse a project config document from `path`.
pub fn load_project_config<P: AsRef<Path>>(path: P) -> Result<ProjectConfig, ConfigError> {
    let path = path.as_ref();
    debug!("loading project config from {}", path.display());
    let contents = fs_err::read_to_string(path)?;
    Ok(serde_yml::from_str(&contents)?)
}
