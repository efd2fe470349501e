//! Output folder preparation and the conversion run.

use crate::args::{check_args, ArgError, Cli};
use crate::logging;
use clap::error::ErrorKind;
use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Process exit status of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Input file or output folder argument missing, or unusable arguments
    MissingArguments,
    /// Input path does not name an existing file
    InputNotFound,
    /// Output folder could not be created
    OutputDirFailed,
    /// Opening the workbook, reading a sheet, or writing a CSV file failed
    ConversionFailed,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::MissingArguments => 81,
            ExitStatus::InputNotFound => 82,
            ExitStatus::OutputDirFailed => 83,
            ExitStatus::ConversionFailed => 99,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

impl From<&ArgError> for ExitStatus {
    fn from(err: &ArgError) -> Self {
        match err {
            ArgError::MissingArguments => ExitStatus::MissingArguments,
            ArgError::InputNotFound(_) => ExitStatus::InputNotFound,
        }
    }
}

/// Make sure the output folder exists.
///
/// Only the last path segment is created; a missing parent is an error.
/// An existing folder is left untouched.
pub fn prepare_output(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir(dir)
}

/// Run the converter with a full argument list (program name first).
pub fn run<I, T>(args: I) -> ExitStatus
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => return report_parse_error(err),
    };

    logging::init(cli.verbose);

    let invocation = match check_args(&cli) {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("{}: {}", "Error".red().bold(), err);
            return ExitStatus::from(&err);
        }
    };

    if let Err(e) = prepare_output(&invocation.output) {
        tracing::debug!(error = %e, path = %invocation.output.display(), "create_dir failed");
        eprintln!(
            "{}: Failed to create output folder: {}",
            "Error".red().bold(),
            invocation.output.display()
        );
        return ExitStatus::OutputDirFailed;
    }

    let quiet = cli.quiet;
    if !quiet {
        println!("{}", "Starting workbook to CSV conversion.".cyan().bold());
        println!("{}: {}", "Input file".bold(), invocation.input.display());
        println!("...");
    }

    let pb = create_spinner(quiet);
    let result = xlsx2csv::convert_workbook_with(&invocation.input, &invocation.output, |sheet| {
        pb.set_message(format!("Writing sheet {sheet}..."));
    });
    pb.finish_and_clear();

    match result {
        Ok(outputs) => {
            if !quiet {
                print_outputs(&outputs);
            }
            ExitStatus::Success
        }
        Err(e) => {
            tracing::warn!(error = %e, input = %invocation.input.display(), "conversion failed");
            eprintln!(
                "{}: Workbook to CSV conversion failed: {}",
                "Error".red().bold(),
                e
            );
            ExitStatus::ConversionFailed
        }
    }
}

fn report_parse_error(err: clap::Error) -> ExitStatus {
    // the message is clap's own formatted usage/help text
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitStatus::Success,
        _ => ExitStatus::MissingArguments,
    }
}

fn print_outputs(outputs: &[PathBuf]) {
    println!(
        "{} Workbook to CSV conversion complete.",
        "✓".green().bold()
    );
    println!("{}:", "Output files".bold());
    for path in outputs {
        println!("・{}", path.display());
    }
}

fn create_spinner(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Opening workbook...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
