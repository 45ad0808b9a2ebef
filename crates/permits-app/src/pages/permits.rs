use egui_extras::{Column, TableBuilder};
use permits_shared::{id::DbId, permit::Permit, uac::PermitColumn};

use crate::ui_helpers::{format_date, format_timestamp, get_text_height, text_or_na};

pub mod details;
pub mod edit;
pub mod list;
pub mod new;
pub mod search;

/// Text shown for `permit` in `column`
pub fn permit_cell(permit: &Permit, column: PermitColumn) -> String {
    match column {
        PermitColumn::PermitNumber => text_or_na(permit.permit_number.as_deref()).to_string(),
        PermitColumn::Vehicle => {
            let number = text_or_na(permit.vehicle_number.as_deref());
            match permit.vehicle_type_name() {
                Some(type_name) => format!("{number} ({type_name})"),
                None => number.to_string(),
            }
        }
        PermitColumn::Owner => text_or_na(permit.owner_name.as_deref()).to_string(),
        PermitColumn::Authority => permit.authority.as_ref().to_string(),
        PermitColumn::Type => text_or_na(permit.permit_type_name()).to_string(),
        PermitColumn::Status => permit.status.label().to_string(),
        PermitColumn::ValidTo => format_date(permit.valid_to),
        PermitColumn::AssignedTo => text_or_na(permit.assigned_to_username.as_deref()).to_string(),
        PermitColumn::Modified => format_timestamp(permit.last_modified),
    }
}

/// Table of permits, returns the id of the row clicked if any
pub fn ui_permit_table(
    ui: &mut egui::Ui,
    permits: &[Permit],
    columns: &[PermitColumn],
) -> Option<DbId> {
    let text_height = get_text_height(ui);
    let mut result = None;
    let table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::LEFT))
        .columns(Column::auto(), columns.len().saturating_sub(1))
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .sense(egui::Sense::click())
        .header(text_height, |mut header| {
            for column in columns {
                header.col(|ui| {
                    ui.strong(column.to_string());
                });
            }
        });
    table.body(|body| {
        body.rows(text_height, permits.len(), |mut row| {
            let permit = &permits[row.index()];
            for column in columns {
                row.col(|ui| {
                    ui.label(permit_cell(permit, *column));
                });
            }
            if row.response().clicked() {
                result = Some(permit.id);
            }
        });
    });
    result
}
