use anomaly_watch_export::{ExportError, ExportFormat, ExportOutcome, ExportRequest, Exporter};
use anomaly_watch_screener::Granularity;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::{RangeArgs, Session};

/// Arguments for the export command.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Output format: xlsx or pdf
    #[arg(short, long, default_value = "xlsx")]
    pub format: ExportFormat,

    /// Time granularity: daily, weekly, or all (all ignores --start/--end)
    #[arg(short, long, default_value = "daily")]
    pub granularity: Granularity,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Directory to write the file into
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// TrueType font for PDF export (overrides export.font_path)
    #[arg(long)]
    pub font: Option<PathBuf>,
}

/// Runs the export command.
///
/// # Errors
/// Returns an error if the font is unusable, rendering fails, or the file
/// cannot be written.
pub fn run_export(session: &Session, args: &ExportArgs) -> Result<()> {
    let date_range = match args.granularity {
        Granularity::Unrestricted => None,
        Granularity::Daily | Granularity::Weekly => Some(args.range.resolve(session.table())?),
    };
    let request = ExportRequest {
        format: args.format,
        granularity: args.granularity,
        date_range,
    };

    let mut config = session.config.export.clone();
    if let Some(font) = &args.font {
        config.font_path.clone_from(font);
    }
    let exporter = Exporter::new(config);

    let outcome = exporter
        .export_request(
            session.table().records(),
            &request,
            &session.predicate,
            &session.config.data.columns,
        )
        .map_err(|e| {
            let context = match &e {
                ExportError::InvalidConfig(_) => "Invalid export settings",
                e if e.is_configuration() => "PDF export needs a Unicode TrueType font",
                _ => "Export failed",
            };
            anyhow::Error::new(e).context(context)
        })?;

    match outcome {
        ExportOutcome::Artifact(artifact) => {
            std::fs::create_dir_all(&args.out)
                .with_context(|| format!("Cannot create {}", args.out.display()))?;
            let path = artifact.write_to(&args.out)?;
            println!(
                "Exported {} ({}, {} bytes)",
                path.display(),
                artifact.mime_type(),
                artifact.bytes.len()
            );
        }
        ExportOutcome::NothingToExport => {
            println!("No abnormal stocks to export for the selected period.");
        }
    }
    Ok(())
}
