use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "topkit - read, resolve and re-emit molecular topology files (.top/.itp) with their preprocessor directives.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a topology and print its system name, manifest, molecule blocks and includes.
    Inspect(LoadArgs),
    /// Parse a topology and write it back out with conditionals and includes resolved.
    Emit(EmitArgs),
}

/// Options shared by every command that loads a topology.
#[derive(Args, Debug, Clone, Default)]
pub struct LoadArgs {
    /// Root topology file. May be omitted when the config file names a root.
    #[arg(value_name = "TOP")]
    pub topology: Option<PathBuf>,

    /// Add a directory to the include search path. Can be used multiple times.
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// Define a preprocessor symbol before parsing. Can be used multiple times.
    /// Example: -D POSRES -D POSRES_FC=1000
    #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]")]
    pub defines: Vec<String>,

    /// Path to a load configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep #define/#ifdef/#ifndef/#else/#endif lines as content instead of evaluating them.
    #[arg(long)]
    pub no_preprocess: bool,

    /// Override the maximum include nesting depth.
    #[arg(long, value_name = "INT")]
    pub max_include_depth: Option<usize>,
}

/// Arguments for the `emit` subcommand.
#[derive(Args, Debug, Clone)]
pub struct EmitArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    /// Output file. Writes to standard output when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn inspect_collects_repeated_flags() {
        let cli = Cli::try_parse_from([
            "topkit", "inspect", "topol.top", "-I", "ff", "-I", "/usr/share/top", "-D", "POSRES",
            "-D", "FC=1000", "--no-preprocess",
        ])
        .unwrap();
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.topology, Some(PathBuf::from("topol.top")));
        assert_eq!(args.include_dirs.len(), 2);
        assert_eq!(args.defines, ["POSRES", "FC=1000"]);
        assert!(args.no_preprocess);
    }

    #[test]
    fn emit_accepts_output_and_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["topkit", "emit", "a.top", "-o", "out.top", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Emit(args) = cli.command else {
            panic!("expected emit");
        };
        assert_eq!(args.output, Some(PathBuf::from("out.top")));
        assert_eq!(args.load.topology, Some(PathBuf::from("a.top")));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["topkit", "-q", "-v", "inspect", "a.top"]).is_err());
    }
}
