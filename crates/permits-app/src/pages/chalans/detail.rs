use permits_client_core::screen::{DataState, RecordState};
use permits_shared::{
    chalan::{Chalan, ChalanDiff, ChalanEdit, ChalanHistoryEntry},
    errors::ValidationError,
    id::DbId,
    internal_error,
    list::Page,
    req_args::api::chalans::{CancelReqArgs, MarkPaidReqArgs, UpdateFeesReqArgs},
    route::Route,
};
use tracing::info;

use crate::{
    app::wake_fn,
    pages::Screen,
    ui_helpers::{
        format_timestamp, text_or_na, ui_error, ui_failed, ui_grid_edit, ui_grid_edit_multiline,
        ui_grid_row,
    },
    DataShared,
};

#[derive(Debug, Clone, Copy)]
enum ChalanAction {
    SaveEdits,
    MarkPaid,
    UpdateFees,
    Cancel,
}

/// Inputs for the actions available on a chalan
#[derive(Debug, Default)]
struct ActionInputs {
    payment_amount: String,
    payment_reference: String,
    fees_amount: String,
    cancel_reason: String,
}

#[derive(Debug)]
pub struct UiChalanDetail {
    chalan: RecordState<Chalan>,
    history: DataState<Page<ChalanHistoryEntry>>,
    /// Values as loaded and as currently edited
    buffers: Option<(ChalanEdit, ChalanEdit)>,
    inputs: ActionInputs,
    last_action: Option<&'static str>,
    form_error: Option<String>,
}

impl UiChalanDetail {
    pub fn new(id: DbId) -> Self {
        Self {
            chalan: RecordState::new(id, "Failed to load chalan"),
            history: DataState::None,
            buffers: None,
            inputs: ActionInputs::default(),
            last_action: None,
            form_error: None,
        }
    }

    fn save_edits(&mut self, ctx: egui::Context, data_shared: &DataShared) {
        let Some((org, edit)) = self.buffers.as_ref() else {
            return;
        };
        self.form_error = None;
        let diff = match ChalanDiff::from_diff(org, edit) {
            Ok(Some(diff)) => diff,
            Ok(None) => {
                self.chalan.reject_action(ValidationError::NoChanges);
                return;
            }
            Err(e) => {
                self.form_error = Some(internal_error!(e));
                return;
            }
        };
        if let Err(e) = diff.validate() {
            self.chalan.reject_action(e);
            return;
        }
        self.last_action = Some("Changes saved");
        self.chalan.start_action(
            data_shared.client.update_chalan(&diff, wake_fn(ctx)),
            "Failed to update chalan",
        );
    }

    fn mark_paid(&mut self, ctx: egui::Context, data_shared: &DataShared) {
        match MarkPaidReqArgs::from_input(
            &self.inputs.payment_amount,
            &self.inputs.payment_reference,
        ) {
            Ok(args) => {
                self.last_action = Some("Payment recorded");
                self.chalan.start_action(
                    data_shared
                        .client
                        .mark_chalan_paid(self.chalan.id(), &args, wake_fn(ctx)),
                    "Failed to record payment",
                );
            }
            Err(e) => self.chalan.reject_action(e),
        }
    }

    fn update_fees(&mut self, ctx: egui::Context, data_shared: &DataShared) {
        match UpdateFeesReqArgs::from_input(&self.inputs.fees_amount) {
            Ok(args) => {
                self.last_action = Some("Fees updated");
                self.chalan.start_action(
                    data_shared
                        .client
                        .update_chalan_fees(self.chalan.id(), &args, wake_fn(ctx)),
                    "Failed to update fees",
                );
            }
            Err(e) => self.chalan.reject_action(e),
        }
    }

    fn cancel(&mut self, ctx: egui::Context, data_shared: &DataShared) {
        match CancelReqArgs::from_input(&self.inputs.cancel_reason) {
            Ok(args) => {
                self.last_action = Some("Chalan cancelled");
                self.chalan.start_action(
                    data_shared
                        .client
                        .cancel_chalan(self.chalan.id(), &args, wake_fn(ctx)),
                    "Failed to cancel chalan",
                );
            }
            Err(e) => self.chalan.reject_action(e),
        }
    }

    /// Starts over from the freshly fetched record once an action went through
    fn on_action_complete(&mut self) {
        info!(id = ?self.chalan.id(), "chalan action completed");
        self.buffers = None;
        self.inputs = ActionInputs::default();
        self.history = DataState::None;
        self.chalan.clear_action();
    }
}

impl Screen for UiChalanDetail {
    fn route(&self) -> Route {
        Route::ChalanDetail(self.chalan.id())
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        if self.chalan.needs_fetch() {
            let ctx = ui.ctx().clone();
            let client = &data_shared.client;
            self.chalan.start_fetch(|id| client.get_chalan(id, wake_fn(ctx)));
        }
        self.chalan.poll();
        if self.chalan.is_action_complete() {
            self.on_action_complete();
        }

        if ui.button("Back to Chalans").clicked() {
            data_shared.navigate(Route::Chalans);
        }
        ui.separator();

        if let Some(e) = self.chalan.load_error() {
            ui_error(ui, e);
            if ui.button("Retry").clicked() {
                self.chalan.retry();
            }
            return;
        }
        let Some(chalan) = self.chalan.record() else {
            ui.spinner();
            return;
        };
        ui_chalan_fields(ui, chalan);
        let is_closed = chalan.status.is_closed();
        let (_, edit) = self.buffers.get_or_insert_with(|| {
            let org = ChalanEdit::from(chalan);
            (org.clone(), org)
        });
        let is_enabled = !is_closed && !self.chalan.is_busy();
        ui.add_space(8.0);

        let inputs = &mut self.inputs;
        let mut requested = None;
        ui.add_enabled_ui(is_enabled, |ui| {
            ui.strong("Edit Details");
            egui::Grid::new("chalan edit").num_columns(2).show(ui, |ui| {
                ui_grid_edit(ui, "Owner name", &mut edit.owner_name);
                ui_grid_edit(ui, "Phone", &mut edit.owner_phone);
                ui_grid_edit_multiline(ui, "Violation", &mut edit.violation_description);
                ui_grid_edit(ui, "Location", &mut edit.issue_location);
                ui_grid_edit_multiline(ui, "Remarks", &mut edit.remarks);
            });
            if ui.button("Save Changes").clicked() {
                requested = Some(ChalanAction::SaveEdits);
            }
            ui.separator();

            ui.strong("Actions");
            egui::Grid::new("chalan actions").num_columns(3).show(ui, |ui| {
                ui.label("Payment");
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut inputs.payment_amount)
                            .hint_text("Amount")
                            .desired_width(100.0),
                    );
                    ui.add(
                        egui::TextEdit::singleline(&mut inputs.payment_reference)
                            .hint_text("Reference (optional)"),
                    );
                });
                if ui.button("Mark as Paid").clicked() {
                    requested = Some(ChalanAction::MarkPaid);
                }
                ui.end_row();

                ui.label("Fees");
                ui.add(
                    egui::TextEdit::singleline(&mut inputs.fees_amount)
                        .hint_text("New fees amount"),
                );
                if ui.button("Update Fees").clicked() {
                    requested = Some(ChalanAction::UpdateFees);
                }
                ui.end_row();

                ui.label("Cancel");
                ui.add(
                    egui::TextEdit::singleline(&mut inputs.cancel_reason)
                        .hint_text("Reason"),
                );
                if ui.button("Cancel Chalan").clicked() {
                    requested = Some(ChalanAction::Cancel);
                }
                ui.end_row();
            });
        });
        let ctx = ui.ctx().clone();
        match requested {
            Some(ChalanAction::SaveEdits) => self.save_edits(ctx.clone(), data_shared),
            Some(ChalanAction::MarkPaid) => self.mark_paid(ctx.clone(), data_shared),
            Some(ChalanAction::UpdateFees) => self.update_fees(ctx.clone(), data_shared),
            Some(ChalanAction::Cancel) => self.cancel(ctx.clone(), data_shared),
            None => {}
        }
        if is_closed {
            ui.weak("Paid and cancelled chalans can no longer be changed");
        }
        if self.chalan.is_busy() {
            ui.spinner();
        } else if let Some(e) = self.chalan.action_error() {
            ui_error(ui, e);
        } else if let Some(msg) = self.last_action {
            ui.label(msg);
        }
        if let Some(e) = self.form_error.as_deref() {
            ui_error(ui, e);
        }
        ui.add_space(8.0);

        ui.strong("History");
        if self.history.is_none() {
            self.history = DataState::awaiting(
                data_shared
                    .client
                    .chalan_history(self.chalan.id(), wake_fn(ctx)),
            );
        }
        self.history.poll("Failed to load chalan history");
        match &self.history {
            DataState::None | DataState::AwaitingResponse(_) => {
                ui.spinner();
            }
            DataState::Failed(_) => ui_failed(ui, &self.history),
            DataState::Present(page) if page.items.is_empty() => {
                ui.label("No history recorded");
            }
            DataState::Present(page) => {
                egui::Grid::new("chalan history")
                    .num_columns(3)
                    .striped(true)
                    .show(ui, |ui| {
                        for entry in page.items.iter() {
                            ui.label(format_timestamp(Some(entry.timestamp)));
                            ui.label(&entry.action);
                            ui.label(text_or_na(Some(entry.notes.as_str())));
                            ui.end_row();
                        }
                    });
            }
        }
    }
}

fn ui_chalan_fields(ui: &mut egui::Ui, chalan: &Chalan) {
    egui::Grid::new("chalan details")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            ui_grid_row(ui, "Chalan Number", &chalan.chalan_number);
            ui_grid_row(ui, "Status", chalan.status.label());
            ui_grid_row(ui, "Owner", &chalan.owner_name);
            ui_grid_row(ui, "CNIC", text_or_na(Some(chalan.owner_cnic.as_str())));
            ui_grid_row(ui, "Phone", text_or_na(chalan.owner_phone.as_deref()));
            ui_grid_row(ui, "Car Number", &chalan.car_number);
            ui_grid_row(ui, "Vehicle Type", text_or_na(chalan.vehicle_type_name.as_deref()));
            let permit = chalan
                .permit_details
                .as_ref()
                .map(|x| x.permit_number.as_str());
            ui_grid_row(ui, "Permit", text_or_na(permit));
            ui_grid_row(ui, "Violation", &chalan.violation_description);
            ui_grid_row(ui, "Fees", chalan.fees_amount.to_string());
            ui_grid_row(ui, "Paid", chalan.paid_amount.to_string());
            ui_grid_row(ui, "Remaining", chalan.remaining_amount.to_string());
            ui_grid_row(ui, "Issued", format_timestamp(chalan.issued_date));
            ui_grid_row(ui, "Issued By", text_or_na(chalan.issued_by_name.as_deref()));
            ui_grid_row(ui, "Location", text_or_na(chalan.issue_location.as_deref()));
            ui_grid_row(ui, "Payment Date", format_timestamp(chalan.payment_date));
            ui_grid_row(
                ui,
                "Payment Reference",
                text_or_na(chalan.payment_reference.as_deref()),
            );
            ui_grid_row(ui, "Remarks", text_or_na(chalan.remarks.as_deref()));
        });
}
