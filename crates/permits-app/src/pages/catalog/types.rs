use egui_extras::{Column, TableBuilder};
use permits_client_core::screen::{DataState, SubmitState};
use permits_shared::{
    id::DbId,
    list::Page,
    permit::{PermitType, PermitTypeForm},
    route::Route,
    uac::can_manage_types,
    vehicle_type::{VehicleType, VehicleTypeForm},
};
use tracing::info;

use crate::{
    app::wake_fn,
    pages::Screen,
    shortcuts::shortcut_button,
    ui_helpers::{
        get_text_height, readonly_checkbox_no_text, text_or_na, ui_error, ui_escape_button,
        ui_failed, ui_grid_edit,
    },
    DataShared,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeKind {
    Permit,
    Vehicle,
}

impl TypeKind {
    fn label(&self) -> &'static str {
        match self {
            TypeKind::Permit => "permit type",
            TypeKind::Vehicle => "vehicle type",
        }
    }
}

/// What the user is doing with the type catalogues
#[derive(Debug, Default)]
enum TypeOp {
    #[default]
    None,
    NewPermitType(PermitTypeForm),
    EditPermitType(DbId, PermitTypeForm),
    NewVehicleType(VehicleTypeForm),
    EditVehicleType(DbId, VehicleTypeForm),
    ConfirmDelete(TypeKind, DbId),
}

impl TypeOp {
    fn heading(&self) -> Option<String> {
        Some(match self {
            TypeOp::None => return None,
            TypeOp::NewPermitType(_) => "New Permit Type".to_string(),
            TypeOp::EditPermitType(..) => "Edit Permit Type".to_string(),
            TypeOp::NewVehicleType(_) => "New Vehicle Type".to_string(),
            TypeOp::EditVehicleType(..) => "Edit Vehicle Type".to_string(),
            TypeOp::ConfirmDelete(kind, id) => format!("Delete {} {id}?", kind.label()),
        })
    }
}

/// Permit and vehicle type catalogues, editable by administrators
#[derive(Debug)]
pub struct UiTypes {
    permit_types: DataState<Page<PermitType>>,
    vehicle_types: DataState<Page<VehicleType>>,
    op: TypeOp,
    create: SubmitState,
    change: DataState<()>,
}

impl Default for UiTypes {
    fn default() -> Self {
        Self {
            permit_types: DataState::None,
            vehicle_types: DataState::None,
            op: TypeOp::None,
            create: SubmitState::new("Error saving data"),
            change: DataState::None,
        }
    }
}

impl UiTypes {
    /// Polls outstanding mutations and reloads both catalogues when one
    /// succeeds
    fn poll_mutations(&mut self) {
        let mut is_done = false;
        if self.create.poll() && self.create.created_id().is_some() {
            self.create.reset();
            is_done = true;
        }
        let fallback = match self.op {
            TypeOp::ConfirmDelete(..) => "Error deleting data",
            _ => "Error saving data",
        };
        if self.change.poll(fallback) && self.change.is_present() {
            self.change = DataState::None;
            is_done = true;
        }
        if is_done {
            info!("Types changed, reloading");
            self.op = TypeOp::None;
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        self.permit_types = DataState::None;
        self.vehicle_types = DataState::None;
    }

    fn is_busy(&self) -> bool {
        self.create.is_submitting() || self.change.is_awaiting()
    }

    fn submit_op(&mut self, ctx: egui::Context, data_shared: &DataShared) {
        let client = &data_shared.client;
        match &self.op {
            TypeOp::None => {}
            TypeOp::NewPermitType(form) => match form.validate() {
                Ok(args) => self
                    .create
                    .start(client.create_permit_type(&args, wake_fn(ctx))),
                Err(e) => self.create.reject(e),
            },
            TypeOp::NewVehicleType(form) => match form.validate() {
                Ok(args) => self
                    .create
                    .start(client.create_vehicle_type(&args, wake_fn(ctx))),
                Err(e) => self.create.reject(e),
            },
            TypeOp::EditPermitType(id, form) => {
                self.change = match form.validate() {
                    Ok(args) => {
                        DataState::awaiting(client.update_permit_type(*id, &args, wake_fn(ctx)))
                    }
                    Err(e) => DataState::Failed(e.to_string()),
                }
            }
            TypeOp::EditVehicleType(id, form) => {
                self.change = match form.validate() {
                    Ok(args) => {
                        DataState::awaiting(client.update_vehicle_type(*id, &args, wake_fn(ctx)))
                    }
                    Err(e) => DataState::Failed(e.to_string()),
                }
            }
            TypeOp::ConfirmDelete(kind, id) => {
                let rx = match kind {
                    TypeKind::Permit => client.delete_permit_type(*id, wake_fn(ctx)),
                    TypeKind::Vehicle => client.delete_vehicle_type(*id, wake_fn(ctx)),
                };
                self.change = DataState::awaiting(rx);
            }
        }
    }

    fn ui_op(&mut self, ui: &mut egui::Ui, data_shared: &DataShared) {
        let Some(heading) = self.op.heading() else {
            return;
        };
        ui.strong(heading);
        match &mut self.op {
            TypeOp::NewPermitType(form) | TypeOp::EditPermitType(_, form) => {
                ui_permit_type_form(ui, form);
            }
            TypeOp::NewVehicleType(form) | TypeOp::EditVehicleType(_, form) => {
                ui_vehicle_type_form(ui, form);
            }
            TypeOp::None | TypeOp::ConfirmDelete(..) => {}
        }
        let is_busy = self.is_busy();
        ui.horizontal(|ui| {
            let caption = match self.op {
                TypeOp::ConfirmDelete(..) => "Delete",
                _ => "Save",
            };
            if ui.add_enabled(!is_busy, egui::Button::new(caption)).clicked() {
                self.submit_op(ui.ctx().clone(), data_shared);
            }
            if ui_escape_button(ui, "Cancel") {
                self.op = TypeOp::None;
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
}

impl Screen for UiTypes {
    fn route(&self) -> Route {
        Route::Types
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let user = data_shared.user();
        let can_manage = can_manage_types(user.as_deref());
        self.poll_mutations();

        let is_idle = matches!(self.op, TypeOp::None);
        ui.horizontal(|ui| {
            if shortcut_button(ui, "Refresh", "", &data_shared.shortcuts.refresh) {
                self.refresh();
            }
            if can_manage && is_idle {
                if ui.button("New Permit Type").clicked() {
                    self.op = TypeOp::NewPermitType(PermitTypeForm::default());
                }
                if ui.button("New Vehicle Type").clicked() {
                    self.op = TypeOp::NewVehicleType(VehicleTypeForm::default());
                }
            }
        });
        ui.separator();

        let client = &data_shared.client;
        if self.permit_types.is_none() {
            self.permit_types =
                DataState::awaiting(client.list_permit_types(wake_fn(ui.ctx().clone())));
        }
        if self.vehicle_types.is_none() {
            self.vehicle_types =
                DataState::awaiting(client.list_vehicle_types(wake_fn(ui.ctx().clone())));
        }
        self.permit_types.poll("Failed to load permit types");
        self.vehicle_types.poll("Failed to load vehicle types");

        self.ui_op(ui, data_shared);
        let can_act = can_manage && !self.is_busy();
        let mut requested = None;

        ui.strong("Permit Types");
        match &self.permit_types {
            DataState::Present(page) => {
                ui.push_id("permit types", |ui| {
                    requested = ui_permit_types(ui, &page.items, can_act);
                });
            }
            DataState::Failed(_) => ui_failed(ui, &self.permit_types),
            _ => {
                ui.spinner();
            }
        }
        ui.add_space(8.0);

        ui.strong("Vehicle Types");
        match &self.vehicle_types {
            DataState::Present(page) => {
                ui.push_id("vehicle types", |ui| {
                    if let Some(op) = ui_vehicle_types(ui, &page.items, can_act) {
                        requested = Some(op);
                    }
                });
            }
            DataState::Failed(_) => ui_failed(ui, &self.vehicle_types),
            _ => {
                ui.spinner();
            }
        }

        if let Some(op) = requested {
            self.create.reset();
            self.change = DataState::None;
            self.op = op;
        }
    }
}

fn ui_permit_type_form(ui: &mut egui::Ui, form: &mut PermitTypeForm) {
    egui::Grid::new("permit type form")
        .num_columns(2)
        .show(ui, |ui| {
            ui_grid_edit(ui, "Name *", &mut form.name);
            ui_grid_edit(ui, "Code *", &mut form.code);
            ui_grid_edit(ui, "Icon", &mut form.icon);
            ui_grid_edit(ui, "Description", &mut form.description);
        });
}

fn ui_vehicle_type_form(ui: &mut egui::Ui, form: &mut VehicleTypeForm) {
    egui::Grid::new("vehicle type form")
        .num_columns(2)
        .show(ui, |ui| {
            ui_grid_edit(ui, "Name *", &mut form.name);
            ui_grid_edit(ui, "Icon *", &mut form.icon);
            ui_grid_edit(ui, "Permit duration (days) *", &mut form.permit_duration_days);
            ui_grid_edit(ui, "Description", &mut form.description);
        });
}

/// Returns the operation requested from a row if any
fn ui_permit_types(ui: &mut egui::Ui, rows: &[PermitType], can_manage: bool) -> Option<TypeOp> {
    let text_height = get_text_height(ui);
    let mut result = None;
    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::LEFT))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .column(Column::auto())
        .min_scrolled_height(0.0)
        .header(text_height, |mut header| {
            for heading in ["Code", "Name", "Description", ""] {
                header.col(|ui| {
                    ui.strong(heading);
                });
            }
        })
        .body(|body| {
            body.rows(text_height, rows.len(), |mut row| {
                let permit_type = &rows[row.index()];
                row.col(|ui| {
                    ui.label(text_or_na(Some(permit_type.code.as_str())));
                });
                row.col(|ui| {
                    ui.label(&permit_type.name);
                });
                row.col(|ui| {
                    ui.label(text_or_na(Some(permit_type.description.as_str())));
                });
                row.col(|ui| {
                    if !can_manage {
                        return;
                    }
                    if ui.small_button("Edit").clicked() {
                        result = Some(TypeOp::EditPermitType(
                            permit_type.id,
                            PermitTypeForm::from(permit_type),
                        ));
                    }
                    if ui.small_button("Delete").clicked() {
                        result = Some(TypeOp::ConfirmDelete(TypeKind::Permit, permit_type.id));
                    }
                });
            });
        });
    result
}

/// Returns the operation requested from a row if any
fn ui_vehicle_types(ui: &mut egui::Ui, rows: &[VehicleType], can_manage: bool) -> Option<TypeOp> {
    let text_height = get_text_height(ui);
    let mut result = None;
    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::LEFT))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .column(Column::auto())
        .min_scrolled_height(0.0)
        .header(text_height, |mut header| {
            for heading in ["Name", "Permit Duration (days)", "Active", "Description", ""] {
                header.col(|ui| {
                    ui.strong(heading);
                });
            }
        })
        .body(|body| {
            body.rows(text_height, rows.len(), |mut row| {
                let vehicle_type = &rows[row.index()];
                row.col(|ui| {
                    ui.label(&vehicle_type.name);
                });
                row.col(|ui| {
                    let days = vehicle_type.permit_duration_days.map(|x| x.to_string());
                    ui.label(text_or_na(days.as_deref()));
                });
                row.col(|ui| {
                    readonly_checkbox_no_text(ui, vehicle_type.is_active);
                });
                row.col(|ui| {
                    ui.label(text_or_na(Some(vehicle_type.description.as_str())));
                });
                row.col(|ui| {
                    if !can_manage {
                        return;
                    }
                    if ui.small_button("Edit").clicked() {
                        result = Some(TypeOp::EditVehicleType(
                            vehicle_type.id,
                            VehicleTypeForm::from(vehicle_type),
                        ));
                    }
                    if ui.small_button("Delete").clicked() {
                        result = Some(TypeOp::ConfirmDelete(TypeKind::Vehicle, vehicle_type.id));
                    }
                });
            });
        });
    result
}
