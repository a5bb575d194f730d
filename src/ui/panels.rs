use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::columns::ColumnRole;
use crate::data::export::DEFAULT_EXPORT_NAME;
use crate::data::filter::FilterMode;
use crate::data::loader::SUPPORTED_EXTENSIONS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_none() {
        ui.label("No data loaded.");
        ui.label("Open files or drop them onto the window.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Tabs ----
            ui.horizontal(|ui: &mut Ui| {
                let mode = state.criteria.mode;
                if ui.selectable_label(mode == FilterMode::All, "All").clicked() {
                    state.set_mode(FilterMode::All);
                }
                if ui
                    .selectable_label(mode == FilterMode::InvalidOnly, "Invalid phones")
                    .clicked()
                {
                    state.set_mode(FilterMode::InvalidOnly);
                }
            });

            let mut only_valid = state.criteria.only_valid_phones;
            let toggle = ui.add_enabled(
                state.criteria.mode == FilterMode::All,
                egui::Checkbox::new(
                    &mut only_valid,
                    "Only valid phones (10 digits + carrier prefix)",
                ),
            );
            if toggle.changed() {
                state.set_only_valid_phones(only_valid);
            }
            ui.separator();

            // ---- Search ----
            ui.strong("Search");
            let name_hint = search_hint(state.columns.get(ColumnRole::Name), "name");
            let phone_hint = search_hint(state.columns.get(ColumnRole::Phone), "phone");
            let name_changed = ui
                .add(
                    egui::TextEdit::singleline(&mut state.criteria.name_query)
                        .hint_text(name_hint),
                )
                .changed();
            let phone_changed = ui
                .add(
                    egui::TextEdit::singleline(&mut state.criteria.phone_query)
                        .hint_text(phone_hint),
                )
                .changed();
            if name_changed || phone_changed {
                state.refilter();
            }
            ui.separator();

            // ---- Inferred columns ----
            ui.strong("Columns");
            column_label(ui, "Name", state.columns.get(ColumnRole::Name));
            column_label(ui, "Phone", state.columns.get(ColumnRole::Phone));
            ui.separator();

            // ---- Carrier legend ----
            egui::CollapsingHeader::new(RichText::new("Carriers").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for (name, color) in state.carrier_colors.legend_entries() {
                        ui.label(RichText::new(name).color(color));
                    }
                });

            // ---- Sources ----
            if let Some(table) = &state.table {
                let header_text = format!("Source files ({})", table.sources.len());
                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        for source in &table.sources {
                            ui.label(source);
                        }
                    });
            }
        });
}

fn search_hint(column: Option<&str>, fallback: &str) -> String {
    match column {
        Some(col) => format!("Search by {col}"),
        None => format!("Search by {fallback}"),
    }
}

fn column_label(ui: &mut Ui, role: &str, column: Option<&str>) {
    match column {
        Some(col) => ui.label(format!("{role}: {col}")),
        None => ui.label(RichText::new(format!("{role}: not found")).weak()),
    };
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open files…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            // An empty selection still exports the header row.
            let can_export = state.table.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export displayed…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.table.is_some() {
            ui.label(format!(
                "Total: {} • Showing: {}",
                state.total_rows(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open spreadsheets")
        .add_filter("Supported files", SUPPORTED_EXTENSIONS)
        .add_filter("Excel", &["xlsx", "xlsm", "xlsb", "xls"])
        .add_filter("OpenDocument", &["ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_files();

    if let Some(paths) = files {
        state.load_paths(&paths);
    }
}

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open a folder of spreadsheets")
        .pick_folder();

    if let Some(path) = folder {
        state.load_paths(&[path]);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export displayed rows")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("Excel", &["xlsx"])
        .add_filter("CSV", &["csv"])
        .save_file();

    let Some(path) = file else {
        return;
    };
    match state.export_visible(&path) {
        Ok(n) => {
            state.status_message = Some(format!("Exported {n} rows to {}", path.display()));
        }
        Err(e) => {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
