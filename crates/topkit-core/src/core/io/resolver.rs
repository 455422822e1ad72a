use super::source::InputSource;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Include '{name}' could not be resolved: {reason}")]
    Unresolved { name: String, reason: String },
}

/// Strategy mapping the target of an `#include "..."` line to an input.
///
/// Returning [`InputSource::None`] skips the include silently; returning an error aborts
/// the whole parse.
pub trait IncludeResolver {
    fn resolve(&mut self, name: &str) -> Result<InputSource, ResolveError>;
}

impl<F> IncludeResolver for F
where
    F: FnMut(&str) -> Result<InputSource, ResolveError>,
{
    fn resolve(&mut self, name: &str) -> Result<InputSource, ResolveError> {
        self(name)
    }
}

/// Resolves every include as a filesystem path identical to its literal name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver;

impl IncludeResolver for PathResolver {
    fn resolve(&mut self, name: &str) -> Result<InputSource, ResolveError> {
        Ok(InputSource::path(name))
    }
}

/// Resolves includes against an ordered list of directories.
///
/// The first directory containing the target wins. When none does, the literal name is
/// used as a path, which then fails at open time if it does not exist either.
#[derive(Debug, Clone, Default)]
pub struct SearchPathResolver {
    directories: Vec<PathBuf>,
}

impl SearchPathResolver {
    pub fn new<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            directories: directories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }
}

impl IncludeResolver for SearchPathResolver {
    fn resolve(&mut self, name: &str) -> Result<InputSource, ResolveError> {
        for directory in &self.directories {
            let candidate = directory.join(name);
            trace!(candidate = %candidate.display(), "probing include");
            if candidate.is_file() {
                return Ok(InputSource::Path(candidate));
            }
        }
        debug!(name, "include not found in search path, using literal path");
        Ok(InputSource::path(name))
    }
}

/// Serves includes from in-memory text. Unknown names resolve to [`InputSource::None`].
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    files: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.files.insert(name.into(), content.into());
    }
}

impl IncludeResolver for MemoryResolver {
    fn resolve(&mut self, name: &str) -> Result<InputSource, ResolveError> {
        Ok(match self.files.get(name) {
            Some(content) => InputSource::Content(content.clone()),
            None => {
                debug!(name, "include not provided, skipping");
                InputSource::None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn path_resolver_returns_literal_name() {
        let source = PathResolver.resolve("forcefield.itp").unwrap();
        assert!(matches!(source, InputSource::Path(p) if p == PathBuf::from("forcefield.itp")));
    }

    #[test]
    fn search_path_prefers_first_directory_with_file() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        fs::write(second.path().join("lipid.itp"), "[ moleculetype ]\n").unwrap();

        let mut resolver = SearchPathResolver::new([first.path(), second.path()]);
        let source = resolver.resolve("lipid.itp").unwrap();
        assert!(matches!(source, InputSource::Path(p) if p == second.path().join("lipid.itp")));
    }

    #[test]
    fn search_path_falls_back_to_literal_name() {
        let dir = tempdir().unwrap();
        let mut resolver = SearchPathResolver::new([dir.path()]);
        let source = resolver.resolve("nowhere.itp").unwrap();
        assert!(matches!(source, InputSource::Path(p) if p == PathBuf::from("nowhere.itp")));
    }

    #[test]
    fn memory_resolver_skips_unknown_names() {
        let mut resolver = MemoryResolver::new().with_file("a.itp", "[ atoms ]");
        assert!(matches!(resolver.resolve("a.itp").unwrap(), InputSource::Content(_)));
        assert!(resolver.resolve("b.itp").unwrap().is_none());
    }

    #[test]
    fn closures_are_resolvers() {
        let mut calls = Vec::new();
        let mut resolver = |name: &str| -> Result<InputSource, ResolveError> {
            calls.push(name.to_string());
            Err(ResolveError::Unresolved {
                name: name.to_string(),
                reason: "denied".into(),
            })
        };
        assert!(IncludeResolver::resolve(&mut resolver, "x.itp").is_err());
        assert_eq!(calls, ["x.itp"]);
    }
}
