//! # apptmerge-cli
//!
//! Command-line interface: merge an appointments workbook with a remarks
//! workbook and write the result as `.xlsx`.

use anyhow::{Context, Result};
use apptmerge_core::{process_uploads, MergeReport, Upload, UploadKind};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// apptmerge - attach remarks and agent names to appointments
#[derive(Parser)]
#[command(name = "apptmerge")]
#[command(author, version, about = "Attach remarks and agent names to appointments", long_about = None)]
struct Cli {
    /// Appointments workbook (.xlsx or .xls)
    #[arg(short = 'a', long = "appointments", value_name = "FILE")]
    appointments: PathBuf,

    /// Remarks workbook (.xlsx or .xls)
    #[arg(short = 'r', long = "remarks", value_name = "FILE")]
    remarks: PathBuf,

    /// Where to write the merged workbook [default: <stem>_appointments.xlsx]
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (summary, json)
    #[arg(short = 'f', long = "format", default_value = "summary")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// What to print after merging.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Row and match counts (default)
    #[default]
    Summary,
    /// Full results as JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let (report, output) = run(&cli)?;

    match cli.format {
        OutputFormat::Summary => print_summary(&report, &output),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report.view())?);
        }
    }

    Ok(())
}

/// Read a workbook from disk as an upload.
fn read_upload(kind: UploadKind, path: &Path) -> Result<Upload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Upload::new(kind, filename, bytes))
}

/// Merge the two workbooks and write the result; returns the report and the
/// path written.
fn run(cli: &Cli) -> Result<(MergeReport, PathBuf)> {
    let appointments = read_upload(UploadKind::Appointments, &cli.appointments)?;
    let remarks = read_upload(UploadKind::Remarks, &cli.remarks)?;

    let report = process_uploads(&appointments, &remarks).map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(report.download_name()));
    let bytes = report.to_xlsx().map_err(|e| anyhow::anyhow!("{e}"))?;
    std::fs::write(&output, bytes)
        .with_context(|| format!("Failed to write file: {}", output.display()))?;

    tracing::info!(path = %output.display(), rows = report.total_rows(), "wrote merged workbook");
    Ok((report, output))
}

fn print_summary(report: &MergeReport, output: &Path) {
    println!(
        "{} {} appointments read",
        "✓".green().bold(),
        report.appointment_rows
    );
    println!(
        "{} {} patient ids with remarks",
        "✓".green().bold(),
        report.remark_ids
    );
    println!(
        "{} {} appointments updated with remarks and agent names",
        "✓".green().bold(),
        report.matched_appointments
    );
    println!(
        "{} {} rows written to {}",
        "✓".green().bold(),
        report.total_rows(),
        output.display().to_string().cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use apptmerge_sheet::Book;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    fn write_workbook(path: &Path, rows: &[&[&str]]) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                worksheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_run_writes_merged_workbook() {
        let dir = tempdir().unwrap();
        let appointments = dir.path().join("week 3.xlsx");
        let remarks = dir.path().join("remarks.xlsx");
        let output = dir.path().join("merged.xlsx");

        write_workbook(&appointments, &[&["PID", "Name"], &["7", "Ann"]]);
        write_workbook(&remarks, &[&["PID", "Remarks"], &["7", "called"]]);

        let cli = Cli::parse_from([
            "apptmerge",
            "--appointments",
            appointments.to_str().unwrap(),
            "--remarks",
            remarks.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);
        let (report, written) = run(&cli).unwrap();

        assert_eq!(written, output);
        assert_eq!(report.source_stem, "week_3");
        assert_eq!(report.matched_appointments, 1);

        let book = Book::from_xlsx(&output).unwrap();
        let sheet = book.get_sheet("Appointment Data").unwrap();
        assert_eq!(sheet.text(1, 3), "called");
    }

    #[test]
    fn test_run_rejects_wrong_extension() {
        let dir = tempdir().unwrap();
        let appointments = dir.path().join("week.csv");
        let remarks = dir.path().join("remarks.xlsx");
        std::fs::write(&appointments, "Pat ID\n1\n").unwrap();
        write_workbook(&remarks, &[&["Patient ID", "Remark"]]);

        let cli = Cli::parse_from([
            "apptmerge",
            "-a",
            appointments.to_str().unwrap(),
            "-r",
            remarks.to_str().unwrap(),
        ]);
        let err = run(&cli).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid Appointments Excel file type. Please upload .xlsx or .xls"
        );
    }

    #[test]
    fn test_missing_file_has_context() {
        let cli = Cli::parse_from(["apptmerge", "-a", "/nonexistent/a.xlsx", "-r", "b.xlsx"]);
        let err = run(&cli).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read file: /nonexistent/a.xlsx"));
    }
}
