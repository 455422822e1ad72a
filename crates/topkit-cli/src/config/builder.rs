use super::defaults::DefaultsConfig;
use super::file::read_settings;
use crate::cli::LoadArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use topkit::workflows::load::{LoadConfig, LoadConfigBuilder};
use tracing::debug;

/// Merges command-line options over the config file over built-in defaults.
///
/// Include directories given with `-I` are searched before those of the config file.
/// Defines from `-D` replace config-file defines of the same name.
pub fn build_config(args: &LoadArgs) -> Result<LoadConfig> {
    let defaults = DefaultsConfig::default();
    let settings = read_settings(args.config.as_deref())?;

    let root = args
        .topology
        .clone()
        .or(settings.root)
        .ok_or_else(|| {
            CliError::Argument(
                "No topology file given. Pass <TOP> or set 'root' in the config file.".into(),
            )
        })?;

    let preprocessing = if args.no_preprocess {
        false
    } else {
        settings.preprocessing.unwrap_or(defaults.preprocessing)
    };
    let max_include_depth = args
        .max_include_depth
        .or(settings.max_include_depth)
        .unwrap_or(defaults.max_include_depth);

    let mut builder = LoadConfigBuilder::new()
        .root(root)
        .include_dirs(args.include_dirs.iter().cloned())
        .include_dirs(settings.include_dirs)
        .preprocessing(preprocessing)
        .max_include_depth(max_include_depth);

    for (name, value) in settings.defines {
        builder = builder.define(name, value);
    }
    for arg in &args.defines {
        let (name, value) =
            parser::parse_define(arg).map_err(|e| CliError::Argument(e.to_string()))?;
        debug!("Command-line define {} = {}", name, value);
        builder = builder.define(name, value);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}
