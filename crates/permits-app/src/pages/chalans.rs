use egui_extras::{Column, TableBuilder};
use permits_shared::{chalan::ChalanSummary, id::DbId, list::lookup_name, vehicle_type::VehicleType};

use crate::ui_helpers::{format_timestamp, get_text_height, text_or_na};

pub mod create;
pub mod detail;
pub mod list;

/// Name sent with the chalan if any, otherwise resolved from the lookup list
pub fn vehicle_type_label<'a>(
    name: Option<&'a str>,
    id: Option<DbId>,
    vehicle_types: &'a [VehicleType],
) -> &'a str {
    match name.map(str::trim).filter(|x| !x.is_empty()) {
        Some(name) => name,
        None => lookup_name(vehicle_types, id),
    }
}

const HEADINGS: [&str; 9] = [
    "Chalan No.",
    "Owner",
    "Car",
    "Vehicle Type",
    "Fees",
    "Paid",
    "Remaining",
    "Status",
    "Issued",
];

/// Table of chalans, returns the id of the row clicked if any
pub fn ui_chalan_table(
    ui: &mut egui::Ui,
    chalans: &[ChalanSummary],
    vehicle_types: &[VehicleType],
) -> Option<DbId> {
    let text_height = get_text_height(ui);
    let mut result = None;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::LEFT))
        .columns(Column::auto(), HEADINGS.len() - 1)
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .sense(egui::Sense::click())
        .header(text_height, |mut header| {
            for heading in HEADINGS {
                header.col(|ui| {
                    ui.strong(heading);
                });
            }
        })
        .body(|body| {
            body.rows(text_height, chalans.len(), |mut row| {
                let chalan = &chalans[row.index()];
                let vehicle_type = vehicle_type_label(
                    chalan.vehicle_type_name.as_deref(),
                    chalan.vehicle_type,
                    vehicle_types,
                );
                let cells = [
                    chalan.chalan_number.clone(),
                    chalan.owner_name.clone(),
                    chalan.car_number.clone(),
                    vehicle_type.to_string(),
                    chalan.fees_amount.to_string(),
                    chalan.paid_amount.to_string(),
                    chalan.remaining_amount.to_string(),
                    chalan.status.label().to_string(),
                    format_timestamp(chalan.issued_date),
                ];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(text_or_na(Some(cell.as_str())));
                    });
                }
                if row.response().clicked() {
                    result = Some(chalan.id);
                }
            });
        });
    result
}
