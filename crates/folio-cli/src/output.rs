use std::io::Write;

use folio_core::{Cell, Envelope, Report};
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::error::CliError;

pub fn render<W: Write>(
    output: &CommandOutput,
    format: OutputFormat,
    pretty: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&output.envelope)?
            } else {
                serde_json::to_string(&output.envelope)?
            };
            writeln!(writer, "{payload}")?;
        }
        OutputFormat::Table => {
            render_meta(&output.envelope, writer)?;
            render_table(&output.report, writer)?;
        }
        OutputFormat::Csv => render_csv(&output.report, writer)?,
    }

    writer.flush()?;
    Ok(())
}

fn render_meta<W: Write>(envelope: &Envelope<Value>, writer: &mut W) -> Result<(), CliError> {
    let meta = &envelope.meta;
    writeln!(writer, "request_id  : {}", meta.request_id)?;
    writeln!(writer, "schema      : {}", meta.schema_version)?;
    writeln!(writer, "generated_at: {}", meta.generated_at)?;
    if let Some(source) = meta.source {
        writeln!(writer, "source      : {source}")?;
    }
    writeln!(writer, "latency_ms  : {}", meta.latency_ms)?;

    if !meta.warnings.is_empty() {
        writeln!(writer, "warnings:")?;
        for warning in &meta.warnings {
            writeln!(writer, "  - {warning}")?;
        }
    }

    writeln!(writer)?;
    Ok(())
}

fn render_table<W: Write>(report: &Report, writer: &mut W) -> Result<(), CliError> {
    if report.is_empty() {
        writeln!(writer, "no rows")?;
        return Ok(());
    }

    let cells = report
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| (cell.display(), cell.is_numeric())).collect())
        .collect::<Vec<Vec<(String, bool)>>>();

    let mut widths = report
        .columns
        .iter()
        .map(|column| column.chars().count())
        .collect::<Vec<_>>();
    for row in &cells {
        for (width, (text, _)) in widths.iter_mut().zip(row) {
            *width = (*width).max(text.chars().count());
        }
    }

    let header = report
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{column:<width$}"))
        .collect::<Vec<_>>();
    writeln!(writer, "{}", header.join("  ").trim_end())?;

    let rule = widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>();
    writeln!(writer, "{}", rule.join("  "))?;

    for row in &cells {
        let line = row
            .iter()
            .zip(&widths)
            .map(|((text, numeric), width)| {
                if *numeric {
                    format!("{text:>width$}")
                } else {
                    format!("{text:<width$}")
                }
            })
            .collect::<Vec<_>>();
        writeln!(writer, "{}", line.join("  ").trim_end())?;
    }

    Ok(())
}

fn render_csv<W: Write>(report: &Report, writer: &mut W) -> Result<(), CliError> {
    writeln!(writer, "{}", report.columns.join(","))?;

    for row in &report.rows {
        let values = row
            .iter()
            .map(|cell| match cell {
                Cell::Text(text) => format!("\"{}\"", text.replace('"', "\"\"")),
                other => other.raw(),
            })
            .collect::<Vec<_>>();
        writeln!(writer, "{}", values.join(","))?;
    }

    Ok(())
}
