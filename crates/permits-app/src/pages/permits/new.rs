use chrono::NaiveDate;
use permits_client_core::screen::{DataState, SubmitState};
use permits_shared::{
    list::Page,
    permit::{Authority, PermitDraft, PermitType},
    route::Route,
    vehicle_type::VehicleType,
};
use strum::IntoEnumIterator as _;

use crate::{
    app::wake_fn,
    pages::{lookup_rows, Screen},
    ui_helpers::{ui_error, ui_escape_button, ui_grid_edit, ui_grid_edit_multiline, ui_lookup_combo},
    DataShared,
};

#[derive(Debug)]
pub struct UiNewPermit {
    draft: PermitDraft,
    permit_types: DataState<Page<PermitType>>,
    vehicle_types: DataState<Page<VehicleType>>,
    submit: SubmitState,
}

impl UiNewPermit {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            draft: PermitDraft::new(today),
            permit_types: DataState::None,
            vehicle_types: DataState::None,
            submit: SubmitState::new("Failed to create permit"),
        }
    }
}

impl Screen for UiNewPermit {
    fn route(&self) -> Route {
        Route::NewPermit
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        self.submit.poll();
        if let Some(id) = self.submit.created_id() {
            data_shared.navigate(Route::PermitDetails(id));
            return;
        }

        let ctx = ui.ctx().clone();
        let client = &data_shared.client;
        let permit_types = lookup_rows(&mut self.permit_types, "Failed to load permit types", || {
            DataState::awaiting(client.list_permit_types(wake_fn(ctx.clone())))
        });
        let vehicle_types =
            lookup_rows(&mut self.vehicle_types, "Failed to load vehicle types", || {
                DataState::awaiting(client.list_vehicle_types(wake_fn(ctx.clone())))
            });

        let draft = &mut self.draft;
        egui::Grid::new("new permit").num_columns(2).show(ui, |ui| {
            ui.label("Authority");
            egui::ComboBox::from_id_salt("new permit authority")
                .selected_text(draft.authority.label())
                .show_ui(ui, |ui| {
                    for authority in Authority::iter() {
                        ui.selectable_value(&mut draft.authority, authority, authority.label());
                    }
                });
            ui.end_row();
            ui.label("Permit type");
            ui_lookup_combo(ui, "new permit type", permit_types, &mut draft.permit_type);
            ui.end_row();
            ui.label("Vehicle type");
            ui_lookup_combo(ui, "new permit vehicle type", vehicle_types, &mut draft.vehicle_type);
            ui.end_row();
            ui_grid_edit(ui, "Vehicle number", &mut draft.vehicle_number);
            ui_grid_edit(ui, "Make", &mut draft.vehicle_make);
            ui_grid_edit(ui, "Model", &mut draft.vehicle_model);
            ui_grid_edit(ui, "Year", &mut draft.vehicle_year);
            ui_grid_edit(ui, "Owner name", &mut draft.owner_name);
            ui_grid_edit(ui, "Owner CNIC", &mut draft.owner_cnic);
            ui_grid_edit(ui, "Phone", &mut draft.owner_phone);
            ui_grid_edit(ui, "Email (optional)", &mut draft.owner_email);
            ui_grid_edit_multiline(ui, "Address", &mut draft.owner_address);
            ui_grid_edit(ui, "Valid from (YYYY-MM-DD)", &mut draft.valid_from);
            ui_grid_edit(ui, "Valid to (optional)", &mut draft.valid_to);
            ui_grid_edit_multiline(ui, "Description", &mut draft.description);
            ui_grid_edit_multiline(ui, "Remarks (optional)", &mut draft.remarks);
        });

        ui.horizontal(|ui| {
            let is_submitting = self.submit.is_submitting();
            if ui
                .add_enabled(!is_submitting, egui::Button::new("Create Permit"))
                .clicked()
            {
                match self.draft.validate() {
                    Ok(args) => self
                        .submit
                        .start(data_shared.client.create_permit(&args, wake_fn(ui.ctx().clone()))),
                    Err(e) => self.submit.reject(e),
                }
            }
            if ui_escape_button(ui, "Cancel") {
                data_shared.navigate(Route::Permits);
            }
            if is_submitting {
                ui.spinner();
            }
        });
        if let Some(e) = self.submit.error() {
            ui_error(ui, e);
        }
        for e in [self.permit_types.error(), self.vehicle_types.error()]
            .into_iter()
            .flatten()
        {
            ui_error(ui, e);
        }
    }
}
