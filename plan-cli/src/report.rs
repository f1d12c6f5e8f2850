//! Rendering of submissions and validation results for the terminal.

use std::io::{self, Write};

use plan_core::validation::{QUANTITY_TOO_LARGE, allocation_summary, color_advisories};
use plan_core::{MAJOR_FABRIC_NONE, ProductionPlan, Step, Submission, ValidationResult};
use serde::Serialize;

/// Output format for `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ListFormat {
    #[default]
    Text,
    Json,
    Csv,
}

pub fn render_submissions<W: Write>(
    submissions: &[Submission],
    format: ListFormat,
    out: W,
) -> anyhow::Result<()> {
    match format {
        ListFormat::Text => render_text(submissions, out)?,
        ListFormat::Json => render_json(submissions, out)?,
        ListFormat::Csv => render_csv(submissions, out)?,
    }
    Ok(())
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn major_fabric_label(plan: &ProductionPlan) -> &str {
    if plan.major_fabric.is_empty() || plan.major_fabric == MAJOR_FABRIC_NONE {
        "None"
    } else {
        &plan.major_fabric
    }
}

/// One block per submission, numbered from 1 in log order.
pub fn render_text<W: Write>(submissions: &[Submission], mut out: W) -> io::Result<()> {
    if submissions.is_empty() {
        writeln!(out, "No submissions yet.")?;
        return Ok(());
    }

    for (n, submission) in submissions.iter().enumerate() {
        let plan = &submission.plan;
        if n > 0 {
            writeln!(out)?;
        }
        writeln!(out, "Plan #{} [{}]", n + 1, submission.sourcing_label())?;
        writeln!(out, "  Id:             {}", submission.id)?;
        writeln!(
            out,
            "  Submitted:      {}",
            submission.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(out, "  Dates:          {} to {}", plan.start_date, plan.end_date)?;
        writeln!(out, "  Per day:        {}", plan.production_per_day)?;
        writeln!(out, "  Total order:    {}", plan.total_order_quantity)?;
        writeln!(out, "  Fabrics:")?;
        for fabric in &plan.fabrics {
            writeln!(
                out,
                "    - {}: {} ({} {}/piece) processes: {}",
                fabric.name,
                fabric.quantity,
                fabric.per_piece_requirement,
                fabric.unit,
                list_or_dash(&fabric.processes),
            )?;
            if !fabric.colors.is_empty() {
                let colors: Vec<String> = fabric
                    .colors
                    .iter()
                    .map(|c| format!("{} {}", c.color, c.quantity))
                    .collect();
                writeln!(out, "      colors: {}", colors.join(", "))?;
            }
            if !fabric.skipped_stages.is_empty() {
                writeln!(out, "      skips: {}", fabric.skipped_stages.join(", "))?;
            }
        }
        if plan.has_international_fabric == Some(true) {
            writeln!(out, "  China fabrics:  {}", list_or_dash(&plan.china_fabrics))?;
        }
        writeln!(out, "  Major fabric:   {}", major_fabric_label(plan))?;
    }
    Ok(())
}

pub fn render_json<W: Write>(submissions: &[Submission], mut out: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, submissions)?;
    writeln!(out)?;
    Ok(())
}

/// Flat row for spreadsheet export; list fields are joined with `; `.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    plan: usize,
    id: &'a str,
    submitted_at: String,
    sourcing: &'static str,
    start_date: &'a str,
    end_date: &'a str,
    production_per_day: &'a str,
    total_order_quantity: &'a str,
    fabrics: String,
    china_fabrics: String,
    major_fabric: &'a str,
}

pub fn render_csv<W: Write>(submissions: &[Submission], out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    for (n, submission) in submissions.iter().enumerate() {
        let plan = &submission.plan;
        let fabrics: Vec<String> = plan
            .fabrics
            .iter()
            .map(|f| format!("{} {}", f.name, f.quantity))
            .collect();
        writer.serialize(CsvRow {
            plan: n + 1,
            id: &submission.id,
            submitted_at: submission.submitted_at.to_rfc3339(),
            sourcing: submission.sourcing_label(),
            start_date: &plan.start_date,
            end_date: &plan.end_date,
            production_per_day: &plan.production_per_day,
            total_order_quantity: &plan.total_order_quantity,
            fabrics: fabrics.join("; "),
            china_fabrics: plan.china_fabrics.join("; "),
            major_fabric: major_fabric_label(plan),
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// `Step n: Title` followed by either `ok`, or the step's description and
/// one indented line per error.
pub fn render_step_result<W: Write>(
    step: Step,
    result: &ValidationResult,
    mut out: W,
) -> io::Result<()> {
    if result.is_valid {
        writeln!(out, "{step}: ok")
    } else {
        writeln!(out, "{step}:")?;
        writeln!(out, "  {}", step.description())?;
        for error in &result.errors {
            writeln!(out, "  - {error}")?;
        }
        Ok(())
    }
}

/// The running totals shown under the fabric list, plus color notes.
pub fn render_allocation<W: Write>(plan: &ProductionPlan, mut out: W) -> io::Result<()> {
    let summary = allocation_summary(plan);

    match (summary.allocated, summary.order_total, summary.allocated_percent) {
        (None, _, _) => writeln!(out, "Allocated: {QUANTITY_TOO_LARGE}")?,
        (Some(allocated), Some(total), Some(percent)) => {
            writeln!(out, "Allocated {allocated} of {total} ({percent:.1}%)")?
        }
        (Some(allocated), _, _) => writeln!(out, "Allocated {allocated}")?,
    }
    if let Some(remaining) = summary.remaining() {
        writeln!(out, "Remaining {remaining}")?;
    }

    for (fabric, requirement) in plan.fabrics.iter().zip(&summary.fabrics) {
        let share = requirement
            .share_percent
            .map(|p| format!(" ({p:.1}% of total)"))
            .unwrap_or_default();
        let name = if requirement.name.is_empty() {
            "(unnamed)"
        } else {
            &requirement.name
        };
        let needs = requirement
            .total_required
            .map(|total| format!("{total:.2} {}", requirement.unit))
            .unwrap_or_else(|| "too much to compute".to_string());
        writeln!(out, "  {name}: {}{share}, needs {needs}", requirement.quantity)?;
        for note in color_advisories(fabric) {
            writeln!(out, "    note: {note}")?;
        }
    }
    Ok(())
}
