//! Plain tabulated `.sp` output.

use std::fs;
use std::path::Path;

use spgen_core::errors::SpError;
use spgen_core::EventTable;

const COLUMN_GAP: &str = "  ";

/// Renders the table as plain aligned text: a header line followed by one
/// line per row, every column right aligned.
pub fn render_plain_table(table: &EventTable) -> String {
    let mut header = vec!["time".to_string()];
    header.extend(table.channels.labels().iter().cloned());

    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![format_general(row.time)];
            cells.extend(row.jumps.iter().map(|jump| jump.to_string()));
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|cell| cell.len()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.len());
        }
    }

    let lines: Vec<String> = std::iter::once(&header)
        .chain(body.iter())
        .map(|cells| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:>width$}"))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP)
        })
        .collect();
    lines.join("\n")
}

/// Writes [`render_plain_table`] output to `path`, creating parent
/// directories as needed.
pub fn write_plain_table(path: &Path, table: &EventTable) -> Result<(), SpError> {
    ensure_parent(path)?;
    fs::write(path, render_plain_table(table))
        .map_err(|err| SpError::io("spgen.io.write_table", path, err))
}

/// Six significant digits, fixed notation for exponents in `[-4, 6)` and
/// scientific notation (`2e-11`, `1.5e-05`) otherwise.
pub fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".into();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let sci = format!("{value:.5e}");
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..6).contains(&exponent) {
        let decimals = (5 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    }
}

fn trim_fraction(raw: &str) -> &str {
    if raw.contains('.') {
        raw.trim_end_matches('0').trim_end_matches('.')
    } else {
        raw
    }
}

pub(crate) fn ensure_parent(path: &Path) -> Result<(), SpError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| SpError::io("spgen.io.create_dir", parent, err))?;
        }
    }
    Ok(())
}
