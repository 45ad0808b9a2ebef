use permits_client_core::screen::RecordState;
use permits_shared::{
    errors::ValidationError,
    id::DbId,
    internal_error,
    permit::{Permit, PermitDiff, PermitEdit, PermitStatus},
    route::Route,
    uac::can_edit_this_permit,
};
use strum::IntoEnumIterator as _;
use tracing::info;

use crate::{
    app::wake_fn,
    pages::Screen,
    ui_helpers::{text_or_na, ui_error, ui_escape_button, ui_grid_edit, ui_grid_edit_multiline, ui_grid_row},
    DataShared,
};

#[derive(Debug)]
pub struct UiPermitEdit {
    permit: RecordState<Permit>,
    /// Values as loaded and as currently edited
    buffers: Option<(PermitEdit, PermitEdit)>,
    form_error: Option<String>,
}

impl UiPermitEdit {
    pub fn new(id: DbId) -> Self {
        Self {
            permit: RecordState::new(id, "Failed to load permit"),
            buffers: None,
            form_error: None,
        }
    }

    fn save(&mut self, ctx: egui::Context, data_shared: &DataShared) {
        let Some((org, edit)) = self.buffers.as_ref() else {
            return;
        };
        self.form_error = None;
        match PermitDiff::from_diff(org, edit) {
            Ok(Some(diff)) => {
                info!(id = ?diff.id, "Saving permit changes");
                self.permit.start_action(
                    data_shared.client.update_permit(&diff, wake_fn(ctx)),
                    "Failed to update permit",
                );
            }
            Ok(None) => self.permit.reject_action(ValidationError::NoChanges),
            Err(e) => match e.downcast::<ValidationError>() {
                Ok(e) => self.permit.reject_action(e),
                Err(e) => self.form_error = Some(internal_error!(e)),
            },
        }
    }
}

impl Screen for UiPermitEdit {
    fn route(&self) -> Route {
        Route::PermitEdit(self.permit.id())
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        if self.permit.needs_fetch() {
            let ctx = ui.ctx().clone();
            let client = &data_shared.client;
            self.permit.start_fetch(|id| client.get_permit(id, wake_fn(ctx)));
        }
        self.permit.poll();

        if self.permit.is_action_complete() {
            data_shared.navigate(Route::PermitDetails(self.permit.id()));
            return;
        }
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
        let user = data_shared.user();
        if !can_edit_this_permit(user.as_deref(), permit) {
            ui_error(ui, "You do not have permission to edit this permit");
            return;
        }
        let permit_number = text_or_na(permit.permit_number.as_deref()).to_string();
        let (_, edit) = self.buffers.get_or_insert_with(|| {
            let org = PermitEdit::from(permit);
            (org.clone(), org)
        });

        egui::Grid::new("permit edit").num_columns(2).show(ui, |ui| {
            ui_grid_row(ui, "Permit Number", permit_number);
            ui.label("Status");
            egui::ComboBox::from_id_salt("permit edit status")
                .selected_text(edit.status.label())
                .show_ui(ui, |ui| {
                    for status in PermitStatus::iter() {
                        ui.selectable_value(&mut edit.status, status, status.label());
                    }
                });
            ui.end_row();
            ui_grid_edit(ui, "Valid from (YYYY-MM-DD)", &mut edit.valid_from);
            ui_grid_edit(ui, "Valid to (YYYY-MM-DD)", &mut edit.valid_to);
            ui_grid_edit(ui, "Vehicle number", &mut edit.vehicle_number);
            ui_grid_edit(ui, "Make", &mut edit.vehicle_make);
            ui_grid_edit(ui, "Model", &mut edit.vehicle_model);
            ui_grid_edit(ui, "Owner name", &mut edit.owner_name);
            ui_grid_edit(ui, "Phone", &mut edit.owner_phone);
            ui_grid_edit(ui, "Email", &mut edit.owner_email);
            ui_grid_edit_multiline(ui, "Address", &mut edit.owner_address);
            ui_grid_edit_multiline(ui, "Description", &mut edit.description);
            ui_grid_edit_multiline(ui, "Remarks", &mut edit.remarks);
        });

        ui.horizontal(|ui| {
            let is_busy = self.permit.is_busy();
            if ui.add_enabled(!is_busy, egui::Button::new("Save")).clicked() {
                self.save(ui.ctx().clone(), data_shared);
            }
            if ui_escape_button(ui, "Cancel") {
                data_shared.navigate(Route::PermitDetails(self.permit.id()));
            }
            if is_busy {
                ui.spinner();
            }
        });
        if let Some(e) = self.permit.action_error() {
            ui_error(ui, e);
        }
        if let Some(e) = self.form_error.as_deref() {
            ui_error(ui, e);
        }
    }
}
