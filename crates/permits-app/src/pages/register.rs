use std::sync::Arc;

use permits_client_core::screen::DataState;
use permits_shared::{req_args::RegisterReqArgs, route::Route, uac::User};

use super::Screen;
use crate::{
    app::wake_fn,
    ui_helpers::{ui_error, ui_grid_edit, ui_password_edit},
    DataShared,
};

#[derive(Debug, Default)]
pub struct UiRegister {
    form: RegisterReqArgs,
    outcome: DataState<Arc<User>>,
}

impl UiRegister {
    fn send_request(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        if let Err(e) = self.form.validate() {
            self.outcome = DataState::Failed(e.to_string());
            return;
        }
        data_shared.username = self.form.username.trim().to_string();
        let rx = data_shared
            .client
            .register(&self.form, wake_fn(ui.ctx().clone()));
        self.outcome = DataState::awaiting(rx);
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("register grid")
            .num_columns(2)
            .show(ui, |ui| {
                ui_grid_edit(ui, "Username", &mut self.form.username);
                ui_grid_edit(ui, "Email", &mut self.form.email);
                ui_grid_edit(ui, "First Name", &mut self.form.first_name);
                ui_grid_edit(ui, "Last Name", &mut self.form.last_name);

                ui.label("Password");
                ui_password_edit(ui, &mut self.form.password, "At least 8 characters");
                ui.end_row();

                ui.label("Confirm Password");
                ui_password_edit(ui, &mut self.form.password_confirmation, "");
                ui.end_row();
            });
    }
}

impl Screen for UiRegister {
    fn route(&self) -> Route {
        Route::Register
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        self.outcome.poll("Registration failed. Please try again.");
        ui.vertical_centered(|ui| {
            ui.heading("Register");
            self.show_form(ui);

            match &self.outcome {
                DataState::AwaitingResponse(_) => {
                    ui.spinner();
                }
                DataState::Failed(e) => ui_error(ui, e.as_str()),
                DataState::Present(_) => {
                    ui.label("Account created");
                }
                DataState::None => {}
            }

            if ui
                .add_enabled(!self.outcome.is_awaiting(), egui::Button::new("Register"))
                .clicked()
            {
                self.send_request(ui, data_shared);
            }

            ui.separator();
            if ui.link("Already have an account? Login").clicked() {
                data_shared.navigate(Route::Login);
            }
        });
    }
}
