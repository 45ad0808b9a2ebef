use permits_client_core::screen::{DataState, SubmitState};
use permits_shared::{
    amount::Amount,
    chalan::ChalanDraft,
    fee_structure::FeeStructure,
    id::DbId,
    list::Page,
    route::Route,
    vehicle_type::VehicleType,
};

use crate::{
    app::wake_fn,
    pages::{lookup_rows, Screen},
    ui_helpers::{ui_error, ui_escape_button, ui_grid_edit, ui_grid_edit_multiline, ui_lookup_combo},
    DataShared,
};

#[derive(Debug)]
pub struct UiChalanCreate {
    draft: ChalanDraft,
    vehicle_types: DataState<Page<VehicleType>>,
    /// Fee structures of the vehicle type they were requested for
    fee_preview: Option<(DbId, DataState<Page<FeeStructure>>)>,
    submit: SubmitState,
}

impl Default for UiChalanCreate {
    fn default() -> Self {
        Self {
            draft: ChalanDraft::new(),
            vehicle_types: DataState::None,
            fee_preview: None,
            submit: SubmitState::new("Failed to create chalan"),
        }
    }
}

/// Fee that would be charged for a vehicle type, the first active structure
/// wins
pub fn calculated_fee(structures: &[FeeStructure]) -> Option<Amount> {
    structures
        .iter()
        .find(|x| x.is_active)
        .map(|x| x.base_fee)
}

impl Screen for UiChalanCreate {
    fn route(&self) -> Route {
        Route::ChalanCreate
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        self.submit.poll();
        if let Some(id) = self.submit.created_id() {
            data_shared.navigate(Route::ChalanDetail(id));
            return;
        }

        let ctx = ui.ctx().clone();
        let client = &data_shared.client;
        let vehicle_types =
            lookup_rows(&mut self.vehicle_types, "Failed to load vehicle types", || {
                DataState::awaiting(client.list_vehicle_types(wake_fn(ctx.clone())))
            });

        let draft = &mut self.draft;
        egui::Grid::new("new chalan").num_columns(2).show(ui, |ui| {
            ui_grid_edit(ui, "Owner name", &mut draft.owner_name);
            ui_grid_edit(ui, "Owner CNIC", &mut draft.owner_cnic);
            ui_grid_edit(ui, "Phone (optional)", &mut draft.owner_phone);
            ui_grid_edit(ui, "Car number", &mut draft.car_number);
            ui.label("Vehicle type");
            ui_lookup_combo(ui, "new chalan vehicle type", vehicle_types, &mut draft.vehicle_type);
            ui.end_row();
            ui_grid_edit_multiline(ui, "Violation", &mut draft.violation_description);
            ui.label("Fees");
            ui.checkbox(&mut draft.auto_calculate_fee, "Calculate from fee structure");
            ui.end_row();
            ui_grid_edit(ui, "Fees amount", &mut draft.fees_amount);
            ui_grid_edit(ui, "Location (optional)", &mut draft.issue_location);
            ui_grid_edit_multiline(ui, "Remarks (optional)", &mut draft.remarks);
        });

        if let Some(vehicle_type) = self.draft.vehicle_type {
            if self.fee_preview.as_ref().map(|(id, _)| *id) != Some(vehicle_type) {
                let rx = client.fee_structures_for_vehicle(vehicle_type, wake_fn(ctx));
                self.fee_preview = Some((vehicle_type, DataState::awaiting(rx)));
            }
        }
        if let Some((_, preview)) = self.fee_preview.as_mut() {
            preview.poll("Failed to load fee structure");
            match preview.present().map(|x| calculated_fee(&x.items)) {
                Some(Some(fee)) => {
                    ui.label(format!("Fee from structure: {fee}"));
                }
                Some(None) => {
                    ui.weak("No active fee structure for this vehicle type");
                }
                None => {}
            }
        }

        ui.horizontal(|ui| {
            let is_submitting = self.submit.is_submitting();
            if ui
                .add_enabled(!is_submitting, egui::Button::new("Create Chalan"))
                .clicked()
            {
                match self.draft.validate() {
                    Ok(args) => self.submit.start(
                        data_shared
                            .client
                            .create_chalan(&args, wake_fn(ui.ctx().clone())),
                    ),
                    Err(e) => self.submit.reject(e),
                }
            }
            if ui_escape_button(ui, "Cancel") {
                data_shared.navigate(Route::Chalans);
            }
            if is_submitting {
                ui.spinner();
            }
        });
        if let Some(e) = self.submit.error() {
            ui_error(ui, e);
        }
        if let Some(e) = self.vehicle_types.error() {
            ui_error(ui, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure(base_fee: f64, is_active: bool) -> FeeStructure {
        FeeStructure {
            id: 1.into(),
            vehicle_type: 2.into(),
            vehicle_type_name: "Bus".into(),
            base_fee: base_fee.into(),
            description: String::new(),
            is_active,
        }
    }

    #[test]
    fn first_active_structure_sets_fee() {
        // Arrange
        let structures = [structure(500.0, false), structure(1500.0, true)];

        // Act
        let actual = calculated_fee(&structures);

        // Assert
        assert_eq!(actual, Some(Amount::from(1500.0)));
    }

    #[test]
    fn no_active_structure_means_no_fee() {
        assert_eq!(calculated_fee(&[structure(500.0, false)]), None);
        assert_eq!(calculated_fee(&[]), None);
    }

    #[test]
    fn new_screen_calculates_fee_by_default() {
        assert!(UiChalanCreate::default().draft.auto_calculate_fee);
    }
}
