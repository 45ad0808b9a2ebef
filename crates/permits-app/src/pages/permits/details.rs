use permits_client_core::screen::{DataState, RecordState};
use permits_shared::{
    id::DbId,
    list::Page,
    permit::{Permit, PermitHistoryEntry},
    route::Route,
    uac::can_edit_this_permit,
};

use crate::{
    app::wake_fn,
    pages::Screen,
    ui_helpers::{
        format_date, format_timestamp, get_text_height, text_or_na, ui_error, ui_failed,
        ui_grid_row,
    },
    DataShared,
};

#[derive(Debug)]
pub struct UiPermitDetails {
    permit: RecordState<Permit>,
    history: DataState<Page<PermitHistoryEntry>>,
}

impl UiPermitDetails {
    pub fn new(id: DbId) -> Self {
        Self {
            permit: RecordState::new(id, "Failed to load permit"),
            history: DataState::None,
        }
    }
}

impl Screen for UiPermitDetails {
    fn route(&self) -> Route {
        Route::PermitDetails(self.permit.id())
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        if self.permit.needs_fetch() {
            let ctx = ui.ctx().clone();
            let client = &data_shared.client;
            self.permit.start_fetch(|id| client.get_permit(id, wake_fn(ctx)));
        }
        self.permit.poll();

        ui.horizontal(|ui| {
            if ui.button("Back to Permits").clicked() {
                data_shared.navigate(Route::Permits);
            }
            let user = data_shared.user();
            if let Some(permit) = self.permit.record() {
                if can_edit_this_permit(user.as_deref(), permit) && ui.button("Edit").clicked() {
                    data_shared.navigate(Route::PermitEdit(permit.id));
                }
            }
        });
        ui.separator();

        if let Some(e) = self.permit.load_error() {
            ui_error(ui, e);
            if ui.button("Retry").clicked() {
                self.permit.retry();
            }
            return;
        }
        let Some(permit) = self.permit.record() else {
            ui.spinner();
            return;
        };
        ui_permit_fields(ui, permit);
        ui.add_space(8.0);

        ui.strong("History");
        if self.history.is_none() {
            self.history = DataState::awaiting(
                data_shared
                    .client
                    .permit_history(permit.id, wake_fn(ui.ctx().clone())),
            );
        }
        self.history.poll("Failed to load permit history");
        match &self.history {
            DataState::None | DataState::AwaitingResponse(_) => {
                ui.spinner();
            }
            DataState::Failed(_) => ui_failed(ui, &self.history),
            DataState::Present(page) if page.items.is_empty() => {
                ui.label("No history recorded");
            }
            DataState::Present(page) => ui_history(ui, &page.items),
        }
    }
}

fn ui_permit_fields(ui: &mut egui::Ui, permit: &Permit) {
    egui::Grid::new("permit details")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            ui_grid_row(ui, "Permit Number", text_or_na(permit.permit_number.as_deref()));
            ui_grid_row(ui, "Authority", permit.authority.label());
            ui_grid_row(ui, "Permit Type", text_or_na(permit.permit_type_name()));
            ui_grid_row(ui, "Status", permit.status.label());
            ui_grid_row(ui, "Valid From", format_date(permit.valid_from));
            ui_grid_row(ui, "Valid To", format_date(permit.valid_to));
            ui_grid_row(ui, "Vehicle Number", text_or_na(permit.vehicle_number.as_deref()));
            ui_grid_row(ui, "Vehicle Type", text_or_na(permit.vehicle_type_name()));
            ui_grid_row(ui, "Make", text_or_na(permit.vehicle_make.as_deref()));
            ui_grid_row(ui, "Model", text_or_na(permit.vehicle_model.as_deref()));
            let year = permit.vehicle_year.map(|x| x.to_string());
            ui_grid_row(ui, "Year", text_or_na(year.as_deref()));
            ui_grid_row(ui, "Owner", text_or_na(permit.owner_name.as_deref()));
            ui_grid_row(ui, "CNIC", text_or_na(permit.owner_cnic.as_deref()));
            ui_grid_row(ui, "Phone", text_or_na(permit.owner_phone.as_deref()));
            ui_grid_row(ui, "Email", text_or_na(permit.owner_email.as_deref()));
            ui_grid_row(ui, "Address", text_or_na(permit.owner_address.as_deref()));
            ui_grid_row(ui, "Description", text_or_na(permit.description.as_deref()));
            ui_grid_row(ui, "Remarks", text_or_na(permit.remarks.as_deref()));
            ui_grid_row(
                ui,
                "Assigned To",
                text_or_na(permit.assigned_to_username.as_deref()),
            );
            ui_grid_row(ui, "Last Modified", format_timestamp(permit.last_modified));
        });
}

fn ui_history(ui: &mut egui::Ui, entries: &[PermitHistoryEntry]) {
    use egui_extras::{Column, TableBuilder};

    let text_height = get_text_height(ui);
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .header(text_height, |mut header| {
            for title in ["When", "Action", "By", "Notes"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(text_height, entries.len(), |mut row| {
                let entry = &entries[row.index()];
                row.col(|ui| {
                    ui.label(format_timestamp(Some(entry.timestamp)));
                });
                row.col(|ui| {
                    ui.label(&entry.action);
                });
                row.col(|ui| {
                    ui.label(text_or_na(Some(entry.performed_by.as_str())));
                });
                row.col(|ui| {
                    ui.label(text_or_na(entry.notes.as_deref()));
                });
            });
        });
}
