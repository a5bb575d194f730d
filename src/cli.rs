use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Parser;

use crate::data::columns::infer_columns;
use crate::data::export::export_rows;
use crate::data::filter::{FilterCriteria, FilterMode, filter_rows};
use crate::data::loader::{collect_sources, load_many};
use crate::settings::Settings;

#[derive(Debug, Parser)]
#[command(
    name = "data-mirinda",
    version,
    about = "View, validate and filter phone lists from spreadsheets"
)]
pub struct Cli {
    /// Spreadsheet files or folders to load (default: the configured data_dir)
    pub paths: Vec<PathBuf>,
    /// Settings file (default: settings.toml in the user config folder)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write the filtered rows to this .xlsx/.csv file instead of opening a window
    #[arg(long, value_name = "OUT")]
    pub export: Option<PathBuf>,
    /// Keep only rows whose phone number is invalid
    #[arg(long, conflicts_with = "all_phones")]
    pub invalid_only: bool,
    /// Keep rows regardless of phone validity
    #[arg(long)]
    pub all_phones: bool,
    /// Keep rows whose name contains this text (accents and case ignored)
    #[arg(long, value_name = "QUERY")]
    pub name: Option<String>,
    /// Keep rows whose phone digits contain these digits
    #[arg(long, value_name = "QUERY")]
    pub phone: Option<String>,
    /// Write the current settings (defaults if none exist) to the settings file and exit
    #[arg(long, conflicts_with = "export")]
    pub init_config: bool,
}

impl Cli {
    /// Paths given on the command line, else the configured data folder.
    pub fn sources(&self, settings: &Settings) -> Vec<PathBuf> {
        if !self.paths.is_empty() {
            return self.paths.clone();
        }
        settings.data_dir.iter().cloned().collect()
    }

    pub fn criteria(&self, settings: &Settings) -> FilterCriteria {
        FilterCriteria {
            mode: if self.invalid_only {
                FilterMode::InvalidOnly
            } else {
                FilterMode::All
            },
            only_valid_phones: settings.only_valid_phones && !self.all_phones,
            name_query: self.name.clone().unwrap_or_default(),
            phone_query: self.phone.clone().unwrap_or_default(),
        }
    }
}

/// Counts reported after a headless export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub total: usize,
    pub exported: usize,
    pub failed_sources: usize,
}

/// Load, filter and export without a window.
pub fn run_export(cli: &Cli, settings: &Settings, out: &Path) -> Result<ExportSummary> {
    let sources = collect_sources(&cli.sources(settings));
    if sources.is_empty() {
        bail!("No input files given and no data_dir configured");
    }

    let report = load_many(&sources);
    let table = report.table;
    if table.is_empty() {
        match report.failed.first() {
            Some((path, reason)) => bail!("No rows loaded; {} failed: {reason}", path.display()),
            None => bail!("No rows loaded from {} source(s)", sources.len()),
        }
    }

    let columns = infer_columns(&table.headers, &settings.columns);
    log::info!(
        "Loaded {} rows; name column {:?}, phone column {:?}",
        table.len(),
        columns.name,
        columns.phone
    );
    if columns.phone.is_none() {
        log::warn!("No phone column found; every phone counts as invalid");
    }

    let rows = filter_rows(
        &table.rows,
        &cli.criteria(settings),
        columns.phone.as_deref(),
        columns.name.as_deref(),
    );
    export_rows(out, &table.headers, &rows)?;

    Ok(ExportSummary {
        total: table.len(),
        exported: rows.len(),
        failed_sources: report.failed.len(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("data-mirinda").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_map_to_criteria() {
        let settings = Settings::default();
        let c = parse(&["--invalid-only", "--name", "Lan"]).criteria(&settings);
        assert_eq!(c.mode, FilterMode::InvalidOnly);
        assert_eq!(c.name_query, "Lan");

        let c = parse(&["--all-phones"]).criteria(&settings);
        assert_eq!(c.mode, FilterMode::All);
        assert!(!c.only_valid_phones);

        let c = parse(&[]).criteria(&settings);
        assert!(c.only_valid_phones);
    }

    #[test]
    fn conflicting_phone_flags_are_rejected() {
        let res = Cli::try_parse_from(["data-mirinda", "--invalid-only", "--all-phones"]);
        assert!(res.is_err());
    }

    #[test]
    fn sources_fall_back_to_data_dir() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("data")),
            ..Settings::default()
        };
        assert_eq!(parse(&[]).sources(&settings), vec![PathBuf::from("data")]);
        assert_eq!(parse(&["a.xlsx"]).sources(&settings), vec![PathBuf::from("a.xlsx")]);
        assert!(parse(&[]).sources(&Settings::default()).is_empty());
    }

    #[test]
    fn headless_export_filters_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let out = dir.path().join("out.csv");
        fs::write(
            &input,
            "Name,Phone\nNguyễn Văn A,+84901234567\nTrần B,0123456789\n",
        )
        .unwrap();

        let cli = parse(&[input.to_str().unwrap(), "--phone", "901234"]);
        let summary = run_export(&cli, &Settings::default(), &out).unwrap();
        assert_eq!(
            summary,
            ExportSummary {
                total: 2,
                exported: 1,
                failed_sources: 0
            }
        );
        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(written, "Name,Phone\nNguyễn Văn A,+84901234567\n");
    }

    #[test]
    fn headless_export_reads_folders_and_reports_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("a.csv"), "SĐT\n0912345678\n0123\n").unwrap();
        fs::write(data.join("b.json"), "oops").unwrap();
        let out = dir.path().join("invalid.csv");

        let cli = parse(&[data.to_str().unwrap(), "--invalid-only"]);
        let summary = run_export(&cli, &Settings::default(), &out).unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.exported, 1);
        assert_eq!(summary.failed_sources, 1);
        assert_eq!(fs::read_to_string(&out).unwrap(), "SĐT\n0123\n");
    }

    #[test]
    fn headless_export_without_sources_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_export(&parse(&[]), &Settings::default(), &dir.path().join("o.csv"))
            .unwrap_err();
        assert!(err.to_string().contains("No input files"));
    }
}
