use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::color::CarrierColors;
use crate::data::columns::{ColumnHints, InferredColumns, infer_columns};
use crate::data::export::export_rows;
use crate::data::filter::{FilterCriteria, FilterMode, filtered_indices};
use crate::data::loader::{collect_sources, load_many};
use crate::data::model::{Row, SheetTable};
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded rows (None until the user loads something).
    pub table: Option<SheetTable>,

    /// Headers picked for the name and phone roles.
    pub columns: InferredColumns,

    /// Candidate phrases used for `columns`.
    pub hints: ColumnHints,

    /// Current tab, toggle and search text.
    pub criteria: FilterCriteria,

    /// Indices of rows passing `criteria` (cached).
    pub visible_indices: Vec<usize>,

    /// Tag colours for phone carriers.
    pub carrier_colors: CarrierColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            table: None,
            columns: InferredColumns::default(),
            hints: settings.columns.clone(),
            criteria: FilterCriteria {
                only_valid_phones: settings.only_valid_phones,
                ..FilterCriteria::default()
            },
            visible_indices: Vec::new(),
            carrier_colors: CarrierColors::default(),
            status_message: None,
        }
    }

    /// Replace whatever was loaded with `table`, infer columns and filter.
    pub fn set_table(&mut self, table: SheetTable) {
        self.columns = infer_columns(&table.headers, &self.hints);
        log::info!(
            "Loaded {} rows from {:?}; name column {:?}, phone column {:?}",
            table.len(),
            table.sources,
            self.columns.name,
            self.columns.phone
        );
        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    /// Expand `paths` (directories included), load them and take the result.
    /// Returns the number of sources that failed.
    pub fn load_paths(&mut self, paths: &[PathBuf]) -> usize {
        let sources = collect_sources(paths);
        if sources.is_empty() {
            self.status_message = Some("No spreadsheet files found".to_string());
            return 0;
        }

        let report = load_many(&sources);
        let failed = report.failed.len();
        // Nothing readable: keep what is already on screen.
        if !(report.table.is_empty() && failed > 0) {
            self.set_table(report.table);
        }
        if let Some((path, reason)) = report.failed.first() {
            let more = if failed > 1 {
                format!(" (and {} more)", failed - 1)
            } else {
                String::new()
            };
            self.status_message = Some(format!(
                "Error: could not load {}: {reason}{more}",
                path.display()
            ));
        }
        failed
    }

    /// Recompute `visible_indices` after a data or criteria change.
    pub fn refilter(&mut self) {
        self.visible_indices = match &self.table {
            Some(table) => filtered_indices(
                &table.rows,
                &self.criteria,
                self.columns.phone.as_deref(),
                self.columns.name.as_deref(),
            ),
            None => Vec::new(),
        };
    }

    pub fn set_mode(&mut self, mode: FilterMode) {
        if self.criteria.mode != mode {
            self.criteria.mode = mode;
            self.refilter();
        }
    }

    pub fn set_only_valid_phones(&mut self, only_valid: bool) {
        if self.criteria.only_valid_phones != only_valid {
            self.criteria.only_valid_phones = only_valid;
            self.refilter();
        }
    }

    /// Total number of loaded rows.
    pub fn total_rows(&self) -> usize {
        self.table.as_ref().map_or(0, SheetTable::len)
    }

    /// The rows currently shown, in display order.
    pub fn visible_rows(&self) -> Vec<&Row> {
        match &self.table {
            Some(table) => self
                .visible_indices
                .iter()
                .filter_map(|&i| table.rows.get(i))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Export the rows currently shown.
    pub fn export_visible(&self, path: &Path) -> Result<usize> {
        let headers = self
            .table
            .as_ref()
            .map(|t| t.headers.as_slice())
            .unwrap_or_default();
        let rows = self.visible_rows();
        export_rows(path, headers, &rows)?;
        Ok(rows.len())
    }
}
