use crate::core::models::document::TopologyDocument;
use crate::core::models::molecule::MoleculeBlock;
use crate::core::models::topology::ManifestEntry;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Resolves the `[ molecules ]` manifest of `document` against `blocks`.
///
/// Produces one entry per non-comment manifest line, in line order, duplicates included.
/// When several blocks declare the same type, the last one read wins. Entries whose type
/// has no block are kept with `block: None`.
pub fn index_molecules(document: &TopologyDocument, blocks: &[MoleculeBlock]) -> Vec<ManifestEntry> {
    let mut types: HashMap<&str, usize> = HashMap::new();
    for (index, block) in blocks.iter().enumerate() {
        types.insert(block.molecule_type(), index);
    }

    document
        .field_without_comments("molecules")
        .into_iter()
        .map(|line| {
            let mut entry = ManifestEntry::from_line(line);
            if entry.count.is_none() {
                warn!(line, "manifest line has no integer molecule count");
            }
            entry.block = types.get(entry.molecule_type.as_str()).copied();
            if entry.block.is_none() {
                debug!(molecule_type = %entry.molecule_type, "no moleculetype block for manifest entry");
            }
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(line: &str, atom: &str) -> MoleculeBlock {
        let mut block = MoleculeBlock::new();
        block.document.append_field_line("moleculetype", line);
        block.document.append_field_line("atoms", atom);
        block
    }

    fn manifest(lines: &[&str]) -> TopologyDocument {
        let mut document = TopologyDocument::new();
        document.append_field("molecules", lines.iter().copied());
        document
    }

    #[test]
    fn entries_mirror_manifest_order_and_duplicates() {
        let blocks = [block("A 1", "1 C"), block("B 1", "1 N")];
        let entries = index_molecules(&manifest(&["B 2", "; comment", "A 3", "B 4"]), &blocks);

        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.molecule_type.as_str(), e.count, e.block))
            .collect();
        assert_eq!(
            summary,
            [("B", Some(2), Some(1)), ("A", Some(3), Some(0)), ("B", Some(4), Some(1))]
        );
    }

    #[test]
    fn last_block_with_same_type_wins() {
        let blocks = [block("LIG 3", "1 C"), block("LIG 3", "1 O")];
        let entries = index_molecules(&manifest(&["LIG 1"]), &blocks);
        assert_eq!(entries[0].block, Some(1));
    }

    #[test]
    fn unknown_type_stays_unresolved() {
        let entries = index_molecules(&manifest(&["UNKNOWN 5"]), &[]);
        assert_eq!(
            entries,
            [ManifestEntry {
                molecule_type: "UNKNOWN".into(),
                count: Some(5),
                block: None
            }]
        );
    }

    #[test]
    fn negative_count_is_kept_as_an_integer() {
        let entries = index_molecules(&manifest(&["A -3", "B 0"]), &[]);
        let counts: Vec<_> = entries.iter().map(|e| e.count).collect();
        assert_eq!(counts, [Some(-3), Some(0)]);
    }

    #[test]
    fn missing_manifest_yields_no_entries() {
        let entries = index_molecules(&TopologyDocument::new(), &[block("A 1", "1 C")]);
        assert!(entries.is_empty());
    }
}
