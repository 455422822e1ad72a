use super::traits::TopologyFile;
use crate::core::models::document::{HEADLINE_KEY, TopologyDocument, section_header};
use crate::core::models::molecule::MoleculeBlock;
use crate::core::models::topology::{ManifestEntry, write_emission};
use std::collections::HashSet;
use std::fmt;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

const INCLUDE_PREFIX: &str = "#include";

#[derive(Debug, Error)]
pub enum ItpError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Reads one file into a single document.
///
/// No preprocessing happens: includes are recorded and kept as content of the current
/// field, conditional directives stay as plain lines.
pub struct ItpFile;

impl TopologyFile for ItpFile {
    type Output = TopologyDocument;
    type Error = ItpError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let mut document = TopologyDocument::new();
        let mut field = HEADLINE_KEY.to_string();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(name) = section_header(line) {
                field = name.to_string();
                continue;
            }
            if line.starts_with(INCLUDE_PREFIX) {
                document.push_include(line);
            }
            document.append_field_line(&field, line);
        }

        Ok(document)
    }

    fn write_to(value: &Self::Output, writer: &mut impl Write) -> Result<(), Self::Error> {
        write!(writer, "{}", value)?;
        Ok(())
    }
}

/// Reads a file holding several molecule definitions into one block per
/// `[ moleculetype ]`.
///
/// Lines before the first `[ moleculetype ]` belong to the first block.
pub struct MultiItpFile;

impl TopologyFile for MultiItpFile {
    type Output = Vec<MoleculeBlock>;
    type Error = ItpError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let mut blocks = vec![MoleculeBlock::new()];
        let mut field = HEADLINE_KEY.to_string();
        let mut seen_moleculetype = false;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(name) = section_header(line) {
                if name == "moleculetype" {
                    if seen_moleculetype {
                        blocks.push(MoleculeBlock::new());
                    }
                    seen_moleculetype = true;
                }
                field = name.to_string();
                continue;
            }

            // `blocks` always holds at least the initial block.
            let Some(block) = blocks.last_mut() else {
                continue;
            };
            if line.starts_with(INCLUDE_PREFIX) {
                block.document.push_include(line);
            }
            block.document.append_field_line(&field, line);
        }

        if blocks.len() == 1 && blocks[0].document.field_names().next().is_none() {
            blocks.clear();
        }
        debug!(blocks = blocks.len(), "split multi-molecule file");
        Ok(blocks)
    }

    fn write_to(value: &Self::Output, writer: &mut impl Write) -> Result<(), Self::Error> {
        for block in value {
            write!(writer, "{}", block)?;
        }
        Ok(())
    }
}

/// A `.top` file read without following includes, whose molecule definitions are
/// supplied afterwards with [`sideload`](Self::sideload).
#[derive(Debug, Clone, Default)]
pub struct SimpleTopology {
    document: TopologyDocument,
    molecules: Vec<ManifestEntry>,
    blocks: Vec<MoleculeBlock>,
}

impl SimpleTopology {
    /// Builds the manifest of `document`. Every entry starts unresolved.
    pub fn from_document(document: TopologyDocument) -> Self {
        let molecules = document
            .field_without_comments("molecules")
            .into_iter()
            .map(ManifestEntry::from_line)
            .collect();
        Self {
            document,
            molecules,
            blocks: Vec::new(),
        }
    }

    /// Attaches `block` to every manifest entry of its type, replacing any block
    /// sideloaded earlier for that type. Returns how many entries it now resolves.
    pub fn sideload(&mut self, block: MoleculeBlock) -> usize {
        let index = self.blocks.len();
        let mut attached = 0;
        for entry in &mut self.molecules {
            if entry.molecule_type == block.molecule_type() {
                entry.block = Some(index);
                attached += 1;
            }
        }
        self.blocks.push(block);
        attached
    }

    pub fn sideload_many(&mut self, blocks: impl IntoIterator<Item = MoleculeBlock>) {
        for block in blocks {
            self.sideload(block);
        }
    }

    pub fn document(&self) -> &TopologyDocument {
        &self.document
    }

    pub fn molecules(&self) -> &[ManifestEntry] {
        &self.molecules
    }

    pub fn blocks(&self) -> &[MoleculeBlock] {
        &self.blocks
    }

    pub fn block_of(&self, entry: &ManifestEntry) -> Option<&MoleculeBlock> {
        entry.block.and_then(|i| self.blocks.get(i))
    }

    pub fn get_molecule(&self, molecule_type: &str) -> Vec<&ManifestEntry> {
        self.molecules
            .iter()
            .filter(|e| e.molecule_type == molecule_type)
            .collect()
    }

    pub fn system(&self) -> &[String] {
        self.document.field("system")
    }

    pub fn name(&self) -> String {
        self.system().concat()
    }

    /// Include targets of the document and of every sideloaded block, first occurrence
    /// only.
    pub fn nested_includes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.document
            .included_files()
            .into_iter()
            .chain(self.blocks.iter().flat_map(|b| b.document.included_files()))
            .filter(|target| seen.insert(*target))
            .collect()
    }
}

impl fmt::Display for SimpleTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_emission(f, &self.document, &self.molecules, &self.blocks)
    }
}

/// Reads a `.top` file into a [`SimpleTopology`].
pub struct TopFile;

impl TopologyFile for TopFile {
    type Output = SimpleTopology;
    type Error = ItpError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        ItpFile::read_from(reader).map(SimpleTopology::from_document)
    }

    fn write_to(value: &Self::Output, writer: &mut impl Write) -> Result<(), Self::Error> {
        write!(writer, "{}", value)?;
        Ok(())
    }
}
