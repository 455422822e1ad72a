use crate::error::Result;
use std::path::Path;
use topkit::workflows::load::LoadSettings;
use tracing::debug;

/// Reads the optional `--config` file. Without one every setting is unset.
pub fn read_settings(path: Option<&Path>) -> Result<LoadSettings> {
    let Some(path) = path else {
        return Ok(LoadSettings::default());
    };
    debug!("Reading load settings from {:?}", path);
    Ok(LoadSettings::from_toml_file(path)?)
}
