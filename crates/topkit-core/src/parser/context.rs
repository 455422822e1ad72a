use super::error::TopologyError;
use super::indexer;
use crate::core::models::document::{HEADLINE_KEY, TopologyDocument};
use crate::core::models::molecule::MoleculeBlock;
use crate::core::models::topology::Topology;
use crate::core::preprocess::{Preprocessor, SymbolTable};

/// Where content lines currently go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockCursor {
    /// No `[ moleculetype ]` seen yet; lines go to the system document.
    Preamble,
    /// Lines go to the block at this index of the stash.
    Open(usize),
    /// A `[ system ]` or `[ molecules ]` section has started; no more blocks allowed.
    Closed,
}

/// Mutable state shared by every source of one parse, passed by reference through the
/// include recursion.
#[derive(Debug)]
pub(super) struct ParseContext {
    pub(super) preprocessor: Preprocessor,
    document: TopologyDocument,
    blocks: Vec<MoleculeBlock>,
    current_field: String,
    cursor: BlockCursor,
    system_name: String,
}

impl ParseContext {
    pub(super) fn new(symbols: SymbolTable) -> Self {
        Self {
            preprocessor: Preprocessor::with_symbols(symbols),
            document: TopologyDocument::new(),
            blocks: Vec::new(),
            current_field: HEADLINE_KEY.to_string(),
            cursor: BlockCursor::Preamble,
            system_name: String::new(),
        }
    }

    /// Switches to the section `field`, opening or closing molecule blocks as needed.
    pub(super) fn enter_section(
        &mut self,
        field: &str,
        file: &str,
        line: usize,
    ) -> Result<(), TopologyError> {
        match field {
            "moleculetype" => {
                if self.cursor == BlockCursor::Closed {
                    return Err(TopologyError::MoleculeAfterSystem {
                        file: file.to_string(),
                        line,
                    });
                }
                self.blocks.push(MoleculeBlock::new());
                self.cursor = BlockCursor::Open(self.blocks.len() - 1);
            }
            "system" | "molecules" => self.cursor = BlockCursor::Closed,
            _ => {}
        }
        self.current_field = field.to_string();
        Ok(())
    }

    /// Appends a content line to the open block, or to the system document.
    pub(super) fn push_content(&mut self, line: &str) {
        match self.cursor {
            BlockCursor::Open(i) => self.blocks[i]
                .document
                .append_field_line(&self.current_field, line),
            BlockCursor::Preamble | BlockCursor::Closed => {
                if self.current_field == "system" {
                    self.system_name.push_str(line);
                }
                self.document.append_field_line(&self.current_field, line);
            }
        }
    }

    /// Records an include statement on the open block, or on the system document.
    pub(super) fn record_include(&mut self, statement: &str) {
        match self.cursor {
            BlockCursor::Open(i) => self.blocks[i].document.push_include(statement),
            BlockCursor::Preamble | BlockCursor::Closed => self.document.push_include(statement),
        }
    }

    /// Runs the molecule indexer and assembles the result.
    pub(super) fn finish(self) -> Topology {
        let molecules = indexer::index_molecules(&self.document, &self.blocks);
        let open_conditionals = self.preprocessor.stack().depth();
        Topology::new(
            self.document,
            self.system_name,
            molecules,
            self.blocks,
            self.preprocessor.into_symbols(),
            open_conditionals,
        )
    }
}
