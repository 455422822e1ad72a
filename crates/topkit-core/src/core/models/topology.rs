use super::document::{HEADLINE_KEY, TopologyDocument};
use super::molecule::MoleculeBlock;
use crate::core::preprocess::SymbolTable;
use std::collections::HashSet;
use std::fmt;

/// One line of the `[ molecules ]` manifest: a molecule type and how many copies of it
/// the system contains.
///
/// `block` is an index into the block list of the owning topology. It is `None` when no
/// parsed block declares this type, which is an expected outcome when the definition
/// lives in a file that was never supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub molecule_type: String,
    /// `None` when the count token is missing or not an integer.
    pub count: Option<i64>,
    pub block: Option<usize>,
}

impl ManifestEntry {
    /// Splits a manifest line on whitespace into type and count. `block` is left unset.
    pub fn from_line(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        let molecule_type = tokens.next().unwrap_or_default().to_string();
        let count = tokens.next().and_then(|c| c.parse().ok());
        Self {
            molecule_type,
            count,
            block: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.block.is_some()
    }
}

/// Result of a preprocessed parse: the system document, every molecule block found while
/// reading (including those pulled in through includes), and the resolved manifest.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    document: TopologyDocument,
    name: String,
    molecules: Vec<ManifestEntry>,
    blocks: Vec<MoleculeBlock>,
    symbols: SymbolTable,
    open_conditionals: usize,
}

impl Topology {
    pub(crate) fn new(
        document: TopologyDocument,
        name: String,
        molecules: Vec<ManifestEntry>,
        blocks: Vec<MoleculeBlock>,
        symbols: SymbolTable,
        open_conditionals: usize,
    ) -> Self {
        Self {
            document,
            name,
            molecules,
            blocks,
            symbols,
            open_conditionals,
        }
    }

    /// Name of the system: the `[ system ]` lines concatenated without separator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The top-level document, i.e. everything outside molecule blocks.
    pub fn document(&self) -> &TopologyDocument {
        &self.document
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.document.field(name)
    }

    pub fn system(&self) -> &[String] {
        self.document.field("system")
    }

    /// Manifest entries in `[ molecules ]` order.
    pub fn molecules(&self) -> &[ManifestEntry] {
        &self.molecules
    }

    /// Every molecule block in reading order.
    pub fn blocks(&self) -> &[MoleculeBlock] {
        &self.blocks
    }

    pub fn block_of(&self, entry: &ManifestEntry) -> Option<&MoleculeBlock> {
        entry.block.and_then(|i| self.blocks.get(i))
    }

    /// All manifest entries naming `molecule_type`.
    pub fn get_molecule(&self, molecule_type: &str) -> Vec<&ManifestEntry> {
        self.molecules
            .iter()
            .filter(|e| e.molecule_type == molecule_type)
            .collect()
    }

    /// Include lines of the system document and of every block, first occurrence only.
    pub fn all_includes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.document
            .includes()
            .iter()
            .chain(self.blocks.iter().flat_map(|b| b.includes()))
            .map(String::as_str)
            .filter(|line| seen.insert(*line))
            .collect()
    }

    /// Symbols defined when the parse finished, pre-defined ones included.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Depth of the conditional stack at the end of the parse; zero for balanced input.
    pub fn open_conditionals(&self) -> usize {
        self.open_conditionals
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_emission(f, &self.document, &self.molecules, &self.blocks)
    }
}

/// Writes the preamble, each resolved block once in manifest order, then the remaining
/// top-level fields.
pub(crate) fn write_emission(
    f: &mut fmt::Formatter<'_>,
    document: &TopologyDocument,
    molecules: &[ManifestEntry],
    blocks: &[MoleculeBlock],
) -> fmt::Result {
    for line in document.field(HEADLINE_KEY) {
        writeln!(f, "{}", line)?;
    }

    let mut written = HashSet::new();
    for index in molecules.iter().filter_map(|e| e.block) {
        if written.insert(index) {
            if let Some(block) = blocks.get(index) {
                write!(f, "{}", block)?;
            }
        }
    }

    document.write_fields(f, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(molecule_type: &str) -> MoleculeBlock {
        let mut block = MoleculeBlock::new();
        block
            .document
            .append_field_line("moleculetype", format!("{} 1", molecule_type));
        block
    }

    #[test]
    fn manifest_line_parses_type_and_count() {
        let entry = ManifestEntry::from_line("SOL    1024");
        assert_eq!(entry.molecule_type, "SOL");
        assert_eq!(entry.count, Some(1024));
        assert!(!entry.is_resolved());
    }

    #[test]
    fn non_integer_count_is_none() {
        assert_eq!(ManifestEntry::from_line("SOL many").count, None);
        assert_eq!(ManifestEntry::from_line("SOL").count, None);
        assert_eq!(ManifestEntry::from_line("SOL 1.5").count, None);
    }

    #[test]
    fn negative_and_zero_counts_are_integers() {
        assert_eq!(ManifestEntry::from_line("A -3").count, Some(-3));
        assert_eq!(ManifestEntry::from_line("B 0").count, Some(0));
    }

    #[test]
    fn display_emits_each_block_once() {
        let mut document = TopologyDocument::new();
        document.append_field_line(HEADLINE_KEY, "; header");
        document.append_field_line("system", "Demo");
        document.append_field("molecules", ["A 1", "A 2"]);
        let molecules = vec![
            ManifestEntry {
                molecule_type: "A".into(),
                count: Some(1),
                block: Some(0),
            },
            ManifestEntry {
                molecule_type: "A".into(),
                count: Some(2),
                block: Some(0),
            },
        ];
        let topology = Topology::new(
            document,
            "Demo".into(),
            molecules,
            vec![block("A")],
            SymbolTable::new(),
            0,
        );

        let text = topology.to_string();
        assert_eq!(text.matches("[moleculetype]").count(), 1);
        assert!(text.starts_with("; header\n\n[moleculetype]\nA 1\n"));
        assert!(text.ends_with("[system]\nDemo\n\n[molecules]\nA 1\nA 2\n"));
        assert_eq!(topology.get_molecule("A").len(), 2);
        assert_eq!(topology.system(), ["Demo"]);
    }
}
