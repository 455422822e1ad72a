use crate::core::io::resolver::ResolveError;
use crate::core::preprocess::ConditionalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("I/O error while reading '{file}': {source}")]
    Io {
        file: String,
        source: std::io::Error,
    },

    #[error("Preprocessor error on line {line} of '{file}': {kind}")]
    Conditional {
        file: String,
        line: usize,
        #[source]
        kind: ConditionalError,
    },

    #[error("Molecule types cannot be described after a system definition (line {line} of '{file}')")]
    MoleculeAfterSystem { file: String, line: usize },

    #[error("Include statement on line {line} of '{file}' has no quoted target: {statement}")]
    MalformedInclude {
        file: String,
        line: usize,
        statement: String,
    },

    #[error("Include '{name}' on line {line} of '{file}' exceeds the maximum include depth of {max_depth}")]
    IncludeTooDeep {
        file: String,
        line: usize,
        name: String,
        max_depth: usize,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("No entry point was given for the topology")]
    MissingEntryPoint,
}
