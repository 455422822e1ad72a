use super::load_topology;
use crate::cli::LoadArgs;
use crate::error::Result;
use std::fmt;
use topkit::core::models::topology::Topology;
use tracing::info;

pub fn run(args: LoadArgs, show_progress: bool) -> Result<()> {
    let topology = load_topology(&args, show_progress)?;
    info!("Rendering summary.");
    print!("{}", Summary(&topology));
    Ok(())
}

/// Human-readable report of the system name, manifest, blocks and includes.
pub struct Summary<'a>(pub &'a Topology);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let topology = self.0;
        writeln!(f, "System: {}", topology.name())?;

        writeln!(f, "\nMolecules ({}):", topology.molecules().len())?;
        for entry in topology.molecules() {
            let count = entry
                .count
                .map_or_else(|| "?".to_string(), |c| c.to_string());
            let status = if entry.is_resolved() {
                "resolved"
            } else {
                "missing"
            };
            writeln!(f, "  {:<16} {:>10}  {}", entry.molecule_type, count, status)?;
        }

        writeln!(f, "\nBlocks ({}):", topology.blocks().len())?;
        for (i, block) in topology.blocks().iter().enumerate() {
            let nrexcl = block
                .nrexcl()
                .map_or_else(|| "?".to_string(), |n| n.to_string());
            writeln!(
                f,
                "  [{}] {} (nrexcl {}, {} atoms)",
                i,
                block.molecule_type(),
                nrexcl,
                block.document.atoms().len()
            )?;
        }

        let includes = topology.all_includes();
        writeln!(f, "\nIncludes ({}):", includes.len())?;
        for line in includes {
            writeln!(f, "  {}", line)?;
        }

        if !topology.symbols().is_empty() {
            let mut symbols: Vec<_> = topology.symbols().iter().collect();
            symbols.sort_by(|a, b| a.0.cmp(b.0));
            writeln!(f, "\nDefines ({}):", symbols.len())?;
            for (name, value) in symbols {
                writeln!(f, "  {} = {}", name, value)?;
            }
        }

        if topology.open_conditionals() > 0 {
            writeln!(
                f,
                "\nWarning: {} unterminated conditional block(s).",
                topology.open_conditionals()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topkit::core::io::resolver::MemoryResolver;
    use topkit::core::io::source::InputSource;
    use topkit::parser::TopologyParser;

    fn parse(text: &str) -> Topology {
        TopologyParser::new()
            .resolver(MemoryResolver::new().with_file(
                "water.itp",
                "[ moleculetype ]\nSOL 2\n[ atoms ]\n1 OW\n2 HW1\n3 HW2\n",
            ))
            .parse(InputSource::Content(text.to_string()))
            .unwrap()
    }

    #[test]
    fn summary_lists_manifest_blocks_and_includes() {
        let topology = parse(
            "#define TIP3P\n#include \"water.itp\"\n[ system ]\nBox\n[ molecules ]\nSOL 10\nNA many\n",
        );
        let summary = Summary(&topology).to_string();

        assert!(summary.starts_with("System: Box\n"));
        assert!(summary.contains("Molecules (2):"));
        assert!(summary.contains("resolved"));
        assert!(summary.contains("missing"));
        assert!(summary.contains("?"));
        assert!(summary.contains("[0] SOL (nrexcl 2, 3 atoms)"));
        assert!(summary.contains("Includes (1):\n  #include \"water.itp\""));
        assert!(summary.contains("TIP3P = true"));
        assert!(!summary.contains("Warning"));
    }

    #[test]
    fn summary_warns_on_open_conditionals() {
        let topology = parse("#ifdef NEVER\n[ system ]\nX\n");
        let summary = Summary(&topology).to_string();
        assert!(summary.contains("Warning: 1 unterminated conditional block(s)."));
        assert!(summary.contains("Molecules (0):"));
    }
}
