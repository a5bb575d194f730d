use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::validity_color;
use crate::data::model::CellValue;
use crate::data::phone::PhoneCheck;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Row table (central panel)
// ---------------------------------------------------------------------------

/// Render the visible rows in the central panel.
pub fn rows_table(ui: &mut Ui, state: &AppState) {
    let table = match &state.table {
        Some(t) if t.is_empty() => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("The loaded files contain no rows");
            });
            return;
        }
        Some(t) => t,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open spreadsheets to view contacts  (File → Open files…)");
            });
            return;
        }
    };

    let phone_column = state.columns.phone.as_deref();
    let text_height = egui::TextStyle::Body.resolve(ui.style()).size;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0).clip(true), table.headers.len())
        .header(text_height + 6.0, |mut header| {
            for h in &table.headers {
                header.col(|ui| {
                    ui.strong(h);
                });
            }
        })
        .body(|body| {
            body.rows(text_height + 6.0, state.visible_indices.len(), |mut row| {
                let Some(data) = table.rows.get(state.visible_indices[row.index()]) else {
                    return;
                };
                for h in &table.headers {
                    let value = data.get(h);
                    row.col(|ui| {
                        if Some(h.as_str()) == phone_column {
                            phone_cell(ui, state, value);
                        } else {
                            ui.label(value.map(|v| v.to_string()).unwrap_or_default());
                        }
                    });
                }
            });
        });
}

/// Raw value coloured by validity, with the local digits and carrier tag.
fn phone_cell(ui: &mut Ui, state: &AppState, value: Option<&CellValue>) {
    let check = PhoneCheck::of(value);
    let raw = value.map(|v| v.to_string()).unwrap_or_default();
    ui.label(RichText::new(raw).color(validity_color(check.valid)));
    if !check.local.is_empty() {
        ui.label(RichText::new(format!("({})", check.local)).small().weak());
    }
    if let Some(carrier) = check.carrier {
        ui.label(
            RichText::new(carrier.to_string())
                .small()
                .color(state.carrier_colors.color_for(carrier)),
        );
    }
}
