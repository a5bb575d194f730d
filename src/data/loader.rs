use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;
use walkdir::WalkDir;

use super::model::{CellValue, Provenance, Row, SheetTable};

/// Extensions read through calamine.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Every extension [`load_file`] accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json"];

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const BLANK_HEADER: &str = "__EMPTY";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one source file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet only
/// * `.csv`  – header row, every cell kept as text
/// * `.json` – `[{ "Họ và tên": "...", "SĐT": "..." }, ...]`
pub fn load_file(path: &Path) -> Result<SheetTable> {
    let ext = extension_of(path);
    match ext.as_str() {
        e if WORKBOOK_EXTENSIONS.contains(&e) => load_workbook(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Outcome of loading several sources at once.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub table: SheetTable,
    /// Sources that could not be read, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Load `paths` in order and concatenate their rows. Headers come from the
/// first source that yields at least one row. A broken file is recorded in
/// the report and skipped.
pub fn load_many(paths: &[PathBuf]) -> LoadReport {
    let mut report = LoadReport::default();
    for path in paths {
        match load_file(path) {
            Ok(table) => {
                log::debug!(
                    "{}: {} rows, headers {:?}",
                    path.display(),
                    table.len(),
                    table.headers
                );
                report.table.append(table);
            }
            Err(e) => {
                log::warn!("Skipping {}: {e:#}", path.display());
                report.failed.push((path.clone(), format!("{e:#}")));
            }
        }
    }
    report
}

/// Expand directories (recursively) into the spreadsheet files they contain.
/// Plain file paths are passed through untouched.
pub fn collect_sources(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for path in paths {
        if !path.is_dir() {
            out.push(path.clone());
            continue;
        }
        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Cannot read directory entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|p| is_supported(p) && !is_lock_file(p))
            .collect();
        found.sort();
        out.extend(found);
    }
    out
}

pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension_of(path).as_str())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Office leaves `~$name.xlsx` owner files next to open workbooks.
fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Shared header / row shaping
// ---------------------------------------------------------------------------

/// Turn raw header cells into distinct names: blanks become `__EMPTY`,
/// repeats get `_1`, `_2`, … suffixes.
fn unique_headers(raw: &[CellValue]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());
    for cell in raw {
        let base = match cell.to_string() {
            s if s.is_empty() => BLANK_HEADER.to_string(),
            s => s,
        };
        let mut name = base.clone();
        let mut n = 0;
        while taken.contains(&name) {
            n += 1;
            name = format!("{base}_{n}");
        }
        taken.insert(name.clone());
        headers.push(name);
    }
    headers
}

/// Shape raw cell rows into a table: the first non-blank row is the header,
/// blank rows are skipped, short rows are padded with empty cells.
fn build_table<I>(raw_rows: I, source: Provenance) -> SheetTable
where
    I: IntoIterator<Item = Vec<CellValue>>,
{
    let mut rows_iter = raw_rows
        .into_iter()
        .filter(|cells| cells.iter().any(|c| !c.is_empty()));

    let Some(header_cells) = rows_iter.next() else {
        return SheetTable {
            headers: Vec::new(),
            rows: Vec::new(),
            sources: vec![source.file],
        };
    };
    let headers = unique_headers(&header_cells);

    let rows = rows_iter
        .map(|mut cells| {
            cells.resize(headers.len(), CellValue::Empty);
            let map: BTreeMap<String, CellValue> = headers.iter().cloned().zip(cells).collect();
            Row::new(map, source.clone())
        })
        .collect();

    SheetTable {
        headers,
        rows,
        sources: vec![source.file],
    }
}

// ---------------------------------------------------------------------------
// Workbook loader (calamine)
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path) -> Result<SheetTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("Workbook has no sheets")?;
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("reading sheet '{sheet}'"))?;

    let raw_rows = range
        .rows()
        .map(|cells| cells.iter().map(workbook_cell).collect::<Vec<_>>());

    Ok(build_table(
        raw_rows,
        Provenance {
            file: file_name(path),
            sheet,
        },
    ))
}

/// Convert one calamine cell. Number cells keep their raw value; the cell's
/// display format is not applied, so a phone stored as the number
/// `901234567` with a `0000000000` format reads back without its leading zero.
fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => CellValue::Text(format_date(dt)),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

fn format_date(dt: NaiveDateTime) -> String {
    dt.format(DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Every cell stays text so leading zeros in phone numbers survive.
fn load_csv(path: &Path) -> Result<SheetTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let mut raw_rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        raw_rows.push(
            record
                .iter()
                .map(|value| match value {
                    "" => CellValue::Empty,
                    v => CellValue::Text(v.to_string()),
                })
                .collect::<Vec<_>>(),
        );
    }

    Ok(build_table(
        raw_rows,
        Provenance {
            file: file_name(path),
            sheet: file_stem(path),
        },
    ))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "Họ và tên": "Nguyễn Văn A", "SĐT": "0901234567" },
///   ...
/// ]
/// ```
///
/// Headers are the keys of the first record, in document order.
fn load_json(path: &Path) -> Result<SheetTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;
    let source = Provenance {
        file: file_name(path),
        sheet: file_stem(path),
    };

    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        if headers.is_empty() {
            headers = obj.keys().cloned().collect();
        }
        let cells = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_cell(val)))
            .collect();
        rows.push(Row::new(cells, source.clone()));
    }

    Ok(SheetTable {
        headers,
        rows,
        sources: vec![source.file],
    })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.is_empty() => CellValue::Empty,
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => CellValue::Number(f),
            None => CellValue::Text(n.to_string()),
        },
        JsonValue::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        JsonValue::Null => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn texts(list: &[&str]) -> Vec<CellValue> {
        list.iter()
            .map(|s| if s.is_empty() { CellValue::Empty } else { CellValue::from(*s) })
            .collect()
    }

    #[test]
    fn blank_and_repeated_headers_become_distinct() {
        let headers = unique_headers(&texts(&["Tên", "", "Tên", "", "Tên", "Tên_1"]));
        assert_eq!(
            headers,
            vec!["Tên", "__EMPTY", "Tên_1", "__EMPTY_1", "Tên_2", "Tên_1_1"]
        );
    }

    #[test]
    fn build_table_skips_blank_rows_and_pads_short_ones() {
        let raw = vec![
            texts(&["", "", ""]),
            texts(&["Name", "Phone", "Note"]),
            texts(&["A", "0901234567", "x"]),
            texts(&["", "", ""]),
            texts(&["B"]),
        ];
        let table = build_table(raw, Provenance { file: "f.csv".into(), sheet: "f".into() });
        assert_eq!(table.headers, vec!["Name", "Phone", "Note"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1].text("Name"), "B");
        assert_eq!(table.rows[1].get("Phone"), Some(&CellValue::Empty));
        assert_eq!(table.rows[0].source.file, "f.csv");
    }

    #[test]
    fn csv_keeps_leading_zeros() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.csv");
        fs::write(
            &path,
            "Họ và tên,SĐT\nNguyễn Văn A,0901234567\n,\nTrần B,+84 91 234 5678\n",
        )
        .unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.headers, vec!["Họ và tên", "SĐT"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].text("SĐT"), "0901234567");
        assert_eq!(table.rows[1].source.sheet, "contacts");
        assert_eq!(table.sources, vec!["contacts.csv"]);
    }

    #[test]
    fn json_headers_follow_first_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.json");
        fs::write(
            &path,
            r#"[{"Tên": "A", "SĐT": 84901234567, "VIP": true}, {"Tên": "B", "SĐT": null}]"#,
        )
        .unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.headers, vec!["Tên", "SĐT", "VIP"]);
        assert_eq!(table.rows[0].text("SĐT"), "84901234567");
        assert_eq!(table.rows[0].text("VIP"), "TRUE");
        assert_eq!(table.rows[1].get("SĐT"), Some(&CellValue::Empty));
    }

    #[test]
    fn workbook_cells_convert_to_text_and_numbers() {
        use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

        use crate::data::phone::is_valid;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["Tên", "SĐT", "Ngày", "VIP", "STT"].iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        let date = ExcelDateTime::from_ymd(2024, 3, 5)
            .unwrap()
            .and_hms(12, 0, 0)
            .unwrap();
        let date_format = Format::new().set_num_format("dd/mm/yyyy hh:mm:ss");
        sheet.write_string(1, 0, "Nguyễn Văn A").unwrap();
        sheet.write_number(1, 1, 84901234567.0).unwrap();
        sheet
            .write_datetime_with_format(1, 2, &date, &date_format)
            .unwrap();
        sheet.write_boolean(1, 3, true).unwrap();
        sheet.write_number(1, 4, 1.5).unwrap();
        workbook.save(&path).unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.headers, vec!["Tên", "SĐT", "Ngày", "VIP", "STT"]);
        let row = &table.rows[0];
        assert_eq!(row.get("SĐT"), Some(&CellValue::Number(84901234567.0)));
        assert_eq!(row.text("SĐT"), "84901234567");
        assert!(is_valid(row.get("SĐT")));
        assert_eq!(row.text("Ngày"), "05/03/2024 12:00:00");
        assert_eq!(row.text("VIP"), "TRUE");
        assert_eq!(row.get("STT"), Some(&CellValue::Number(1.5)));
        assert_eq!(row.source.sheet, "Sheet1");
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = load_file(Path::new("notes.txt")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn load_many_concatenates_and_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("a_empty.csv");
        let first = dir.path().join("b.csv");
        let second = dir.path().join("c.csv");
        let broken = dir.path().join("d.json");
        fs::write(&empty, "Only,Header\n").unwrap();
        fs::write(&first, "Name,Phone\nA,0901234567\n").unwrap();
        fs::write(&second, "Phone,Name,Extra\n0912345678,B,1\n").unwrap();
        fs::write(&broken, "{not json").unwrap();

        let report = load_many(&[empty, first, second, broken.clone()]);
        assert_eq!(report.table.headers, vec!["Name", "Phone"]);
        assert_eq!(report.table.len(), 2);
        assert_eq!(report.table.rows[1].text("Name"), "B");
        assert_eq!(report.table.rows[1].source.file, "c.csv");
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, broken);
    }

    #[test]
    fn collect_sources_scans_directories_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2024");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("b.xlsx"), b"").unwrap();
        fs::write(nested.join("a.csv"), b"").unwrap();
        fs::write(dir.path().join("readme.txt"), b"").unwrap();
        fs::write(dir.path().join("~$b.xlsx"), b"").unwrap();

        let found = collect_sources(&[dir.path().to_path_buf()]);
        assert_eq!(found, vec![nested.join("a.csv"), dir.path().join("b.xlsx")]);

        let explicit = PathBuf::from("missing.xlsx");
        assert_eq!(collect_sources(&[explicit.clone()]), vec![explicit]);
    }
}
