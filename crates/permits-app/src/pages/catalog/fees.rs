use egui_extras::{Column, TableBuilder};
use permits_client_core::screen::{DataState, ListState, SubmitState};
use permits_shared::{
    fee_structure::{FeeStructure, FeeStructureForm},
    id::DbId,
    list::{ListQuery, Page},
    route::Route,
    uac::can_manage_fees,
    vehicle_type::VehicleType,
};
use tracing::info;

use crate::{
    app::wake_fn,
    pages::{chalans::vehicle_type_label, lookup_rows, Screen},
    shortcuts::shortcut_button,
    ui_helpers::{
        get_text_height, readonly_checkbox_no_text, ui_error, ui_escape_button, ui_failed,
        ui_grid_edit, ui_list_feedback, ui_lookup_combo, ui_pagination,
    },
    DataShared,
};

/// What the user is doing with fee structures
#[derive(Debug, Default)]
enum FeeOp {
    #[default]
    None,
    New(FeeStructureForm),
    Edit(DbId, FeeStructureForm),
    ConfirmDelete(DbId),
}

#[derive(Debug)]
pub struct UiFeeManagement {
    list: ListState<FeeStructure>,
    vehicle_types: DataState<Page<VehicleType>>,
    op: FeeOp,
    create: SubmitState,
    change: DataState<()>,
}

impl UiFeeManagement {
    pub fn new(query: ListQuery) -> Self {
        Self {
            list: ListState::new(query, "Failed to load fee structures"),
            vehicle_types: DataState::None,
            op: FeeOp::None,
            create: SubmitState::new("Failed to create fee structure"),
            change: DataState::None,
        }
    }

    /// Polls outstanding mutations and reloads the list when one succeeds
    fn poll_mutations(&mut self) {
        let mut is_done = false;
        if self.create.poll() && self.create.created_id().is_some() {
            self.create.reset();
            is_done = true;
        }
        if self.change.poll("Failed to save fee structure") && self.change.is_present() {
            self.change = DataState::None;
            is_done = true;
        }
        if is_done {
            info!("Fee structures changed, reloading");
            self.op = FeeOp::None;
            self.list.refresh();
        }
    }

    fn is_busy(&self) -> bool {
        self.create.is_submitting() || self.change.is_awaiting()
    }
}

impl Screen for UiFeeManagement {
    fn route(&self) -> Route {
        Route::FeeManagement
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let user = data_shared.user();
        let can_manage = can_manage_fees(user.as_deref());
        self.poll_mutations();

        ui.horizontal(|ui| {
            if shortcut_button(ui, "Refresh", "", &data_shared.shortcuts.refresh) {
                self.list.refresh();
            }
            if can_manage
                && matches!(self.op, FeeOp::None)
                && ui.button("New Fee Structure").clicked()
            {
                self.op = FeeOp::New(FeeStructureForm::default());
            }
        });
        ui.separator();

        let is_busy = self.is_busy();
        let ctx = ui.ctx().clone();
        let client = &data_shared.client;
        if self.list.needs_fetch() {
            let ctx = ctx.clone();
            self.list
                .start_fetch(|q| client.list_fee_structures(q, wake_fn(ctx)));
        }
        self.list.poll();
        let vehicle_types =
            lookup_rows(&mut self.vehicle_types, "Failed to load vehicle types", || {
                DataState::awaiting(client.list_vehicle_types(wake_fn(ctx.clone())))
            });

        match &mut self.op {
            FeeOp::None => {}
            FeeOp::New(form) => {
                ui.strong("New Fee Structure");
                ui_fee_form(ui, form, vehicle_types);
            }
            FeeOp::Edit(_, form) => {
                ui.strong("Edit Fee Structure");
                ui_fee_form(ui, form, vehicle_types);
            }
            FeeOp::ConfirmDelete(id) => {
                ui.label(format!("Delete fee structure {id}?"));
            }
        }
        if !matches!(self.op, FeeOp::None) {
            ui.horizontal(|ui| {
                let caption = match self.op {
                    FeeOp::ConfirmDelete(_) => "Delete",
                    _ => "Save",
                };
                if ui.add_enabled(!is_busy, egui::Button::new(caption)).clicked() {
                    self.submit_op(ctx.clone(), data_shared);
                }
                if ui_escape_button(ui, "Cancel") {
                    self.op = FeeOp::None;
                    self.create.reset();
                    self.change = DataState::None;
                }
                if is_busy {
                    ui.spinner();
                }
            });
            if let Some(e) = self.create.error() {
                ui_error(ui, e);
            }
            ui_failed(ui, &self.change);
            ui.separator();
        }

        ui_list_feedback(ui, &self.list, "No fee structures defined");
        if !self.list.rows().is_empty() {
            let vehicle_types = self.vehicle_types.present().map(|x| x.items.as_slice());
            if let Some(op) = ui_fee_table(
                ui,
                self.list.rows(),
                vehicle_types.unwrap_or_default(),
                can_manage && !is_busy,
            ) {
                self.op = op;
            }
        }
        ui.separator();
        ui_pagination(ui, &mut self.list, &data_shared.shortcuts);
    }
}

impl UiFeeManagement {
    fn submit_op(&mut self, ctx: egui::Context, data_shared: &DataShared) {
        let client = &data_shared.client;
        match &self.op {
            FeeOp::None => {}
            FeeOp::New(form) => match form.validate() {
                Ok(args) => self
                    .create
                    .start(client.create_fee_structure(&args, wake_fn(ctx))),
                Err(e) => self.create.reject(e),
            },
            FeeOp::Edit(id, form) => {
                self.change = match form.validate() {
                    Ok(args) => DataState::awaiting(client.update_fee_structure(
                        *id,
                        &args,
                        wake_fn(ctx),
                    )),
                    Err(e) => DataState::Failed(e.to_string()),
                }
            }
            FeeOp::ConfirmDelete(id) => {
                self.change =
                    DataState::awaiting(client.delete_fee_structure(*id, wake_fn(ctx)));
            }
        }
    }
}

fn ui_fee_form(ui: &mut egui::Ui, form: &mut FeeStructureForm, vehicle_types: &[VehicleType]) {
    egui::Grid::new("fee structure form")
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Vehicle type");
            ui_lookup_combo(ui, "fee vehicle type", vehicle_types, &mut form.vehicle_type);
            ui.end_row();
            ui_grid_edit(ui, "Base fee", &mut form.base_fee);
            ui_grid_edit(ui, "Description", &mut form.description);
            ui.label("Active");
            ui.checkbox(&mut form.is_active, "");
            ui.end_row();
        });
}

/// Returns the operation requested from a row if any
fn ui_fee_table(
    ui: &mut egui::Ui,
    rows: &[FeeStructure],
    vehicle_types: &[VehicleType],
    can_manage: bool,
) -> Option<FeeOp> {
    let text_height = get_text_height(ui);
    let mut result = None;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::LEFT))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .header(text_height, |mut header| {
            for heading in ["Vehicle Type", "Base Fee", "Active", "Description", ""] {
                header.col(|ui| {
                    ui.strong(heading);
                });
            }
        })
        .body(|body| {
            body.rows(text_height, rows.len(), |mut row| {
                let fee = &rows[row.index()];
                row.col(|ui| {
                    ui.label(vehicle_type_label(
                        Some(fee.vehicle_type_name.as_str()),
                        Some(fee.vehicle_type),
                        vehicle_types,
                    ));
                });
                row.col(|ui| {
                    ui.label(fee.base_fee.to_string());
                });
                row.col(|ui| {
                    readonly_checkbox_no_text(ui, fee.is_active);
                });
                row.col(|ui| {
                    ui.label(&fee.description);
                });
                row.col(|ui| {
                    if !can_manage {
                        return;
                    }
                    if ui.small_button("Edit").clicked() {
                        result = Some(FeeOp::Edit(fee.id, FeeStructureForm::from(fee)));
                    }
                    if ui.small_button("Delete").clicked() {
                        result = Some(FeeOp::ConfirmDelete(fee.id));
                    }
                });
            });
        });
    result
}
