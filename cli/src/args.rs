//! Command-line definition and argument validation.

use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// Split an Excel workbook into one quoted CSV file per sheet
#[derive(Parser, Debug)]
#[command(
    name = "xlsx2csv",
    author = "iyulab",
    version,
    about = "Convert every sheet of a workbook into CSV",
    long_about = "xlsx2csv - write each sheet of an Excel workbook to its own CSV file.\n\n\
                  Output files are named <OUTPUT_DIR>/<input name>_<sheet name>.csv.\n\n\
                  Exit codes: 0 success, 81 missing arguments, 82 input file not found,\n\
                  83 output folder could not be created, 99 conversion failed."
)]
pub struct Cli {
    /// Input workbook file (.xlsx)
    pub input: Option<PathBuf>,

    /// Output folder (created if missing; its parent must exist)
    pub output: Option<PathBuf>,

    /// Ignored trailing arguments
    #[arg(hide = true)]
    pub extra: Vec<OsString>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress and completion messages
    #[arg(
        short,
        long,
        env = "XLSX2CSV_QUIET",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub quiet: bool,
}

/// Input and output locations of a validated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Reasons an invocation is rejected before any file is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    /// Input file or output folder not given
    MissingArguments,
    /// Input path is not an existing regular file
    InputNotFound(PathBuf),
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgError::MissingArguments => write!(
                f,
                "Missing arguments: 1st <INPUT> workbook file, 2nd <OUTPUT_DIR> output folder"
            ),
            ArgError::InputNotFound(path) => {
                write!(f, "Input workbook does not exist: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ArgError {}

/// Check that both paths were given and the input is an existing file.
pub fn check_args(cli: &Cli) -> Result<Invocation, ArgError> {
    let (Some(input), Some(output)) = (&cli.input, &cli.output) else {
        return Err(ArgError::MissingArguments);
    };

    if !cli.extra.is_empty() {
        tracing::warn!(count = cli.extra.len(), "ignoring extra arguments");
    }

    if !input.is_file() {
        return Err(ArgError::InputNotFound(input.clone()));
    }

    Ok(Invocation {
        input: input.clone(),
        output: output.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_missing_arguments() {
        assert_eq!(
            check_args(&parse(&["xlsx2csv"])),
            Err(ArgError::MissingArguments)
        );
        assert_eq!(
            check_args(&parse(&["xlsx2csv", "book.xlsx"])),
            Err(ArgError::MissingArguments)
        );
    }

    #[test]
    fn test_input_must_be_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.xlsx");
        let out = dir.path().join("out");

        let cli = parse(&["xlsx2csv", missing.to_str().unwrap(), out.to_str().unwrap()]);
        assert_eq!(check_args(&cli), Err(ArgError::InputNotFound(missing)));

        let cli = parse(&[
            "xlsx2csv",
            dir.path().to_str().unwrap(),
            out.to_str().unwrap(),
        ]);
        assert!(matches!(check_args(&cli), Err(ArgError::InputNotFound(_))));
    }

    #[test]
    fn test_valid_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("book.xlsx");
        std::fs::write(&input, b"x").unwrap();

        let cli = parse(&["xlsx2csv", input.to_str().unwrap(), "out", "extra"]);
        assert_eq!(cli.extra, vec![OsString::from("extra")]);
        assert_eq!(
            check_args(&cli),
            Ok(Invocation {
                input,
                output: PathBuf::from("out"),
            })
        );
    }

    #[test]
    fn test_flags() {
        let cli = parse(&["xlsx2csv", "-vv", "--quiet", "a.xlsx", "out"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
    }
}
