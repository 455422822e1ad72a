use crate::core::io::resolver::SearchPathResolver;
use crate::core::io::source::InputSource;
use crate::core::models::topology::Topology;
use crate::core::preprocess::{SymbolTable, SymbolValue};
use crate::parser::progress::{ParseEvent, ProgressReporter};
use crate::parser::topology::DEFAULT_MAX_INCLUDE_DEPTH;
use crate::parser::{TopologyError, TopologyParser};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration in '{path}': {source}")]
    Invalid { path: String, source: ConfigError },
}

/// Everything needed to load one topology.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    pub root: PathBuf,
    /// Searched in order after the root file's own directory.
    pub include_dirs: Vec<PathBuf>,
    pub defines: SymbolTable,
    pub preprocessing: bool,
    pub max_include_depth: usize,
}

impl LoadConfig {
    /// Reads a complete configuration from a TOML file.
    ///
    /// Relative paths in the file are taken relative to the file's directory.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigLoadError> {
        LoadSettings::from_toml_file(path)?
            .into_builder()
            .build()
            .map_err(|source| ConfigLoadError::Invalid {
                path: path.to_string_lossy().to_string(),
                source,
            })
    }

    /// Directories probed for includes: the root file's directory, then `include_dirs`.
    pub fn search_path(&self) -> Vec<PathBuf> {
        let root_dir = self
            .root
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        std::iter::once(root_dir)
            .chain(self.include_dirs.iter().cloned())
            .collect()
    }
}

#[derive(Default)]
pub struct LoadConfigBuilder {
    root: Option<PathBuf>,
    include_dirs: Vec<PathBuf>,
    defines: SymbolTable,
    preprocessing: Option<bool>,
    max_include_depth: Option<usize>,
}

impl LoadConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }
    pub fn include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }
    pub fn include_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.include_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }
    pub fn define(mut self, name: impl Into<String>, value: SymbolValue) -> Self {
        self.defines.define(name, value);
        self
    }
    pub fn preprocessing(mut self, enabled: bool) -> Self {
        self.preprocessing = Some(enabled);
        self
    }
    pub fn max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = Some(depth);
        self
    }

    pub fn build(self) -> Result<LoadConfig, ConfigError> {
        Ok(LoadConfig {
            root: self.root.ok_or(ConfigError::MissingParameter("root"))?,
            include_dirs: self.include_dirs,
            defines: self.defines,
            preprocessing: self.preprocessing.unwrap_or(true),
            max_include_depth: self.max_include_depth.unwrap_or(DEFAULT_MAX_INCLUDE_DEPTH),
        })
    }
}

/// Optional load settings as written in a TOML file.
///
/// ```toml
/// root = "system.top"
/// include-dirs = ["forcefields/charmm36.ff"]
/// preprocessing = true
///
/// [defines]
/// POSRES = true
/// POSRES_FC = 1000.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LoadSettings {
    pub root: Option<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
    pub defines: HashMap<String, SymbolValue>,
    pub preprocessing: Option<bool>,
    pub max_include_depth: Option<usize>,
}

impl LoadSettings {
    /// Reads settings from `path`, anchoring relative paths at the file's directory.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let settings: LoadSettings =
            toml::from_str(&content).map_err(|e| ConfigLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;

        match path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            Some(base) => Ok(settings.relative_to(base)),
            None => Ok(settings),
        }
    }

    fn relative_to(mut self, base: &Path) -> Self {
        self.root = self.root.map(|root| base.join(root));
        self.include_dirs = self.include_dirs.iter().map(|dir| base.join(dir)).collect();
        self
    }

    /// Seeds a builder with every value present in these settings.
    pub fn into_builder(self) -> LoadConfigBuilder {
        let mut builder = LoadConfigBuilder::new().include_dirs(self.include_dirs);
        if let Some(root) = self.root {
            builder = builder.root(root);
        }
        for (name, value) in self.defines {
            builder = builder.define(name, value);
        }
        if let Some(enabled) = self.preprocessing {
            builder = builder.preprocessing(enabled);
        }
        if let Some(depth) = self.max_include_depth {
            builder = builder.max_include_depth(depth);
        }
        builder
    }
}

/// Parses the configured root topology with a search-path resolver.
#[instrument(skip_all, name = "load_workflow", fields(root = %config.root.display()))]
pub fn run(config: &LoadConfig, reporter: &ProgressReporter) -> Result<Topology, TopologyError> {
    let resolver = SearchPathResolver::new(config.search_path());
    info!(
        directories = resolver.directories().len(),
        defines = config.defines.len(),
        "Loading topology."
    );
    reporter.report(ParseEvent::Message(format!(
        "Loading {}",
        config.root.display()
    )));

    let topology = TopologyParser::new()
        .preprocessing(config.preprocessing)
        .symbols(config.defines.clone())
        .max_include_depth(config.max_include_depth)
        .resolver(resolver)
        .parse_with_progress(InputSource::Path(config.root.clone()), reporter)?;

    info!(
        blocks = topology.blocks().len(),
        molecules = topology.molecules().len(),
        "Topology loaded."
    );
    Ok(topology)
}
