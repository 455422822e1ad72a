use super::document::TopologyDocument;
use std::fmt;

/// A document scoped to a single `[ moleculetype ]` section and everything that follows
/// it until the next `[ moleculetype ]`, `[ system ]` or `[ molecules ]` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoleculeBlock {
    pub document: TopologyDocument,
}

impl MoleculeBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: TopologyDocument) -> Self {
        Self { document }
    }

    /// Type name of the molecule: first token of the first non-comment
    /// `[ moleculetype ]` line. Empty when the block declares no name.
    pub fn molecule_type(&self) -> &str {
        self.document.name_and_nrexcl().0
    }

    /// Number of bonds within which non-bonded interactions are excluded.
    pub fn nrexcl(&self) -> Option<u32> {
        self.document.name_and_nrexcl().1
    }

    pub fn includes(&self) -> &[String] {
        self.document.includes()
    }
}

impl fmt::Display for MoleculeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.document, f)
    }
}
