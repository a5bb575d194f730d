use std::path::Path;

use anyhow::{Context, Result, bail};
use rust_xlsxwriter::Workbook;

use super::model::{CellValue, Row};

pub const DEFAULT_EXPORT_NAME: &str = "export.xlsx";
const SHEET_NAME: &str = "Data";

/// Write `rows` to `path` (`.xlsx` or `.csv`). Provenance is not written.
///
/// Columns are `headers` followed by any other keys the rows carry, in the
/// order they are first seen.
pub fn export_rows(path: &Path, headers: &[String], rows: &[&Row]) -> Result<()> {
    let columns = export_columns(headers, rows);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" => write_xlsx(path, &columns, rows),
        "csv" => write_csv(path, &columns, rows),
        other => bail!("Cannot export to .{other}; use .xlsx or .csv"),
    }?;

    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn export_columns(headers: &[String], rows: &[&Row]) -> Vec<String> {
    let mut columns: Vec<String> = headers.to_vec();
    for row in rows {
        for key in row.cells.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn write_xlsx(path: &Path, columns: &[String], rows: &[&Row]) -> Result<()> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (c, name) in columns.iter().enumerate() {
            let col = u16::try_from(c).context("too many columns for a worksheet")?;
            sheet.write_string(0, col, name.as_str())?;
        }

        for (r, row) in rows.iter().enumerate() {
            let row_num = u32::try_from(r + 1).context("too many rows for a worksheet")?;
            for (c, name) in columns.iter().enumerate() {
                let col = u16::try_from(c).context("too many columns for a worksheet")?;
                match row.get(name) {
                    Some(CellValue::Number(v)) => {
                        sheet.write_number(row_num, col, *v)?;
                    }
                    Some(CellValue::Text(s)) if !s.is_empty() => {
                        sheet.write_string(row_num, col, s.as_str())?;
                    }
                    _ => {}
                }
            }
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn write_csv(path: &Path, columns: &[String], rows: &[&Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(columns).context("writing CSV header")?;
    for row in rows {
        writer
            .write_record(columns.iter().map(|c| row.text(c)))
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}
