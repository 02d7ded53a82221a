//! treeop - count, copy, move and delete directory trees.
//!
//! Usage:
//!   treeop --count ROOT          Count directories and files under ROOT
//!   treeop --cp SRC DST          Copy SRC into the existing directory DST
//!   treeop --mv SRC DST          Move SRC into the existing directory DST
//!   treeop --rm ROOT             Delete ROOT and everything under it
//!   treeop -d -s --rm ROOT       Dry run with a trace of every step

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use color_eyre::eyre::{Context, Result, bail};
use tracing::Level;

use treeop_core::OperatorConfig;
use treeop_ops::{LocalStorage, OperationReport, TreeOperation, TreeOperator};

#[derive(Debug, Parser)]
#[command(
    name = "treeop",
    version,
    about = "Counts, copies, moves and deletes files and directories",
    long_about = "Counts, copies, moves and deletes files and directories.\n\n\
                  The source/root path is always included in the operation. \
                  Copies and moves land inside DST; an existing entry of the \
                  same name is never overwritten, the new entry is renamed \
                  to `name (1)`, `name (2)`, ... instead.",
    after_help = "Errors abort the operation immediately; nothing is rolled back."
)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["mv", "cp", "rm", "count"])
))]
struct Cli {
    /// Show every step while progressing, and the counters afterwards
    #[arg(short, long)]
    debug: bool,

    /// Disable deletion (removals are only counted)
    #[arg(short, long)]
    safe: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Move SRC into the directory DST
    #[arg(long = "mv", num_args = 2, value_names = ["SRC", "DST"])]
    mv: Option<Vec<PathBuf>>,

    /// Copy SRC into the directory DST
    #[arg(long = "cp", num_args = 2, value_names = ["SRC", "DST"])]
    cp: Option<Vec<PathBuf>>,

    /// Delete ROOT
    #[arg(long = "rm", value_name = "ROOT")]
    rm: Option<PathBuf>,

    /// Count the files and directories under ROOT
    #[arg(long, value_name = "ROOT")]
    count: Option<PathBuf>,
}

impl Cli {
    /// The single action requested on the command line.
    fn operation(&self) -> Result<TreeOperation> {
        if let Some([src, dst]) = self.mv.as_deref() {
            return Ok(TreeOperation::move_to(src, dst));
        }
        if let Some([src, dst]) = self.cp.as_deref() {
            return Ok(TreeOperation::copy(src, dst));
        }
        if let Some(root) = &self.rm {
            return Ok(TreeOperation::delete(root));
        }
        if let Some(root) = &self.count {
            return Ok(TreeOperation::count(root));
        }
        bail!("No operation given: expected one of --mv, --cp, --rm, --count")
    }

    fn config(&self) -> OperatorConfig {
        OperatorConfig::new()
            .with_debug_trace(self.debug)
            .with_deletion_enabled(!self.safe)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.debug);

    let report = run(&cli)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in report.summary_lines(cli.debug) {
            println!("{line}");
        }
    }

    Ok(())
}

/// Execute the requested operation against the local filesystem.
fn run(cli: &Cli) -> Result<OperationReport> {
    let operation = cli.operation()?;
    let mut operator = TreeOperator::new(LocalStorage::new(), cli.config());
    operator
        .execute(&operation)
        .with_context(|| format!("The {} operation failed", operation.operation_type()))
}

/// Send trace events to stderr, keeping stdout for summaries.
fn init_logging(debug: bool) {
    let level = if debug { Level::INFO } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("treeop").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_leading_flags_in_any_order() {
        let cli = parse(&["-s", "--debug", "--rm", "/tmp/x"]).unwrap();
        assert!(cli.debug);
        assert!(cli.safe);
        assert_eq!(cli.operation().unwrap(), TreeOperation::delete("/tmp/x"));

        let config = cli.config();
        assert!(config.debug_trace);
        assert!(!config.deletion_enabled);
    }

    #[test]
    fn test_copy_and_move_take_two_paths() {
        let cli = parse(&["--cp", "a", "b"]).unwrap();
        assert_eq!(cli.operation().unwrap(), TreeOperation::copy("a", "b"));
        assert!(cli.config().deletion_enabled);

        let cli = parse(&["--mv", "a", "b"]).unwrap();
        assert_eq!(cli.operation().unwrap(), TreeOperation::move_to("a", "b"));

        assert!(parse(&["--mv", "a"]).is_err());
    }

    #[test]
    fn test_count_takes_one_path() {
        let cli = parse(&["--count", "."]).unwrap();
        assert_eq!(cli.operation().unwrap(), TreeOperation::count("."));
        assert!(!cli.debug);
    }

    #[test]
    fn test_exactly_one_action_required() {
        let err = parse(&["-d"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = parse(&["--count", "a", "--rm", "b"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let err = parse(&["--force", "--rm", "x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_help_short_circuits() {
        let err = parse(&["-h", "--rm", "x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_run_copies_on_disk() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("notes");
        let dst = temp_dir.path().join("backup");
        std::fs::create_dir(&src).unwrap();
        std::fs::create_dir(&dst).unwrap();
        std::fs::write(src.join("todo.txt"), "ship it").unwrap();

        let src_arg = src.to_string_lossy().into_owned();
        let dst_arg = dst.to_string_lossy().into_owned();
        let cli = parse(&["--debug", "--cp", &src_arg, &dst_arg]).unwrap();
        let report = run(&cli).unwrap();

        assert_eq!(
            report.summary_lines(true),
            vec!["[Copied:  dirs=1, files=1]"]
        );
        assert_eq!(
            std::fs::read_to_string(dst.join("notes").join("todo.txt")).unwrap(),
            "ship it"
        );
    }

    #[test]
    fn test_run_reports_missing_root() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("missing").to_string_lossy().into_owned();
        let cli = parse(&["--rm", &missing]).unwrap();

        let err = run(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("Path not found"));
    }
}
