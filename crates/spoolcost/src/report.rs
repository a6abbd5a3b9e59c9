//! Plain-text and JSON rendering of catalogs, sessions and diff reports.
//!
//! Amounts are rounded half away from zero to two decimals at render time
//! only; the values handed in are never modified.

use rust_decimal::{Decimal, RoundingStrategy};
use spoolcost_core::{mass_per_length, DiffReport, SessionSummary, Spool};
use std::io::{self, Write};
use std::path::Path;

const SUMMARY_RULE_WIDTH: usize = 75;
const DIFF_RULE_WIDTH: usize = 70;

/// Round `value` to `dp` decimals for display.
fn rounded(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn money(value: Decimal) -> Decimal {
    rounded(value, 2)
}

/// Write the numbered spool list shown before selection.
pub fn write_catalog<W: Write>(spools: &[Spool], out: &mut W) -> io::Result<()> {
    writeln!(out, "Available Spools:")?;
    for (idx, spool) in spools.iter().enumerate() {
        let filament = &spool.filament;
        writeln!(
            out,
            "{}. {} (ID: {}) Price: ${:.2} Material: {} Color: {}",
            idx + 1,
            spool.name(),
            spool.id,
            money(spool.price),
            filament.material.as_deref().unwrap_or("Unknown"),
            filament.color_hex.as_deref().unwrap_or("Unknown"),
        )?;
    }
    Ok(())
}

/// Write the details of a freshly selected spool.
pub fn write_spool_details<W: Write>(spool: &Spool, out: &mut W) -> io::Result<()> {
    let filament = &spool.filament;
    writeln!(out, "\nSelected Spool: {}", spool.name())?;
    writeln!(out, "Spool Cost: ${:.2}", money(spool.price))?;
    writeln!(out, "Spool Weight (initial): {} grams", spool.initial_weight.normalize())?;
    writeln!(
        out,
        "Remaining Filament Weight: {:.2} grams",
        rounded(spool.remaining_weight, 2)
    )?;
    writeln!(
        out,
        "Material: {}, Diameter: {} mm, Density: {} g/cm³",
        filament.material.as_deref().unwrap_or("Unknown"),
        filament.diameter_mm.normalize(),
        filament.density_g_cm3.normalize(),
    )?;
    let grams_per_meter = mass_per_length(filament.diameter_mm, filament.density_g_cm3);
    writeln!(
        out,
        "Estimated Mass per Meter: {:.4} g/m",
        rounded(grams_per_meter, 4)
    )
}

/// Write the end-of-session usage table.
pub fn write_summary<W: Write>(summary: &SessionSummary, out: &mut W) -> io::Result<()> {
    let rule = "-".repeat(SUMMARY_RULE_WIDTH);
    writeln!(out, "\nSummary of Filament Usage:")?;
    writeln!(
        out,
        "{:<30} {:>15} {:>10} {:>15}",
        "Spool Name", "Filament Used", "Unit", "Cost"
    )?;
    writeln!(out, "{rule}")?;
    for entry in &summary.entries {
        writeln!(
            out,
            "{:<30} {:>15.2} {:>10} {:>15.2}",
            entry.spool_name,
            rounded(entry.quantity.value, 2),
            entry.quantity.unit.symbol(),
            money(entry.cost),
        )?;
    }
    writeln!(out, "{rule}")?;
    writeln!(out, "{:<30} {:>40.2}", "Total Cost:", money(summary.total_cost))
}

/// Write a diff report as an aligned text table.
pub fn write_diff_text<W: Write>(
    baseline: &Path,
    later: &Path,
    report: &DiffReport,
    out: &mut W,
) -> io::Result<()> {
    let rule = "-".repeat(DIFF_RULE_WIDTH);
    writeln!(
        out,
        "\nComparing {} and {}...\n",
        baseline.display(),
        later.display()
    )?;
    writeln!(
        out,
        "{:<10} {:<30} {:>15} {:>12}",
        "Spool ID", "Name", "Weight Diff (g)", "Cost Used($)"
    )?;
    writeln!(out, "{rule}")?;
    for record in &report.records {
        writeln!(
            out,
            "{:<10} {:<30} {:>15.2} {:>12.2}",
            record.id,
            record.name,
            rounded(record.weight_diff, 2),
            money(record.cost_used),
        )?;
    }
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "{:<10} {:<30} {:>15.2} {:>12.2}",
        "TOTAL",
        "",
        rounded(report.total_weight_used, 2),
        money(report.total_cost_used),
    )
}

/// Write a diff report as pretty-printed JSON.
pub fn write_diff_json<W: Write>(report: &DiffReport, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}
