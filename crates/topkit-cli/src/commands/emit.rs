use super::load_topology;
use crate::cli::EmitArgs;
use crate::error::{CliError, Result};
use std::io::Write;
use tracing::info;

pub fn run(args: EmitArgs, show_progress: bool) -> Result<()> {
    // Spinner output would interleave with the emission on stdout-bound runs.
    let show_progress = show_progress && args.output.is_some();
    let topology = load_topology(&args.load, show_progress)?;
    let text = topology.to_string();

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text).map_err(|source| CliError::Output {
                path: path.clone(),
                source,
            })?;
            info!("Wrote {} bytes to {:?}", text.len(), path);
            println!("✓ Topology written to: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LoadArgs;
    use std::fs;

    #[test]
    fn emit_writes_resolved_topology_to_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("lig.itp"),
            "[ moleculetype ]\nLIG 3\n#ifdef POSRES\n[ position_restraints ]\n1 1 1000 1000 1000\n#endif\n",
        )
        .unwrap();
        let root = dir.path().join("topol.top");
        fs::write(
            &root,
            "#include \"lig.itp\"\n[ system ]\nLigand\n[ molecules ]\nLIG 1\n",
        )
        .unwrap();
        let output = dir.path().join("out.top");

        let args = EmitArgs {
            load: LoadArgs {
                topology: Some(root),
                ..Default::default()
            },
            output: Some(output.clone()),
        };
        run(args, false).unwrap();

        let text = fs::read_to_string(output).unwrap();
        assert!(text.contains("[moleculetype]\nLIG 3\n"));
        assert!(!text.contains("position_restraints"));
        assert!(!text.contains("#ifdef"));
        assert!(text.ends_with("[molecules]\nLIG 1\n"));
    }

    #[test]
    fn unwritable_output_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("topol.top");
        fs::write(&root, "[ system ]\nEmpty\n").unwrap();

        let args = EmitArgs {
            load: LoadArgs {
                topology: Some(root),
                ..Default::default()
            },
            output: Some(dir.path().to_path_buf()),
        };
        let err = run(args, false).unwrap_err();
        assert!(matches!(err, CliError::Output { .. }));
    }
}
