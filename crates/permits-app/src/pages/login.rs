use std::sync::Arc;

use permits_client_core::screen::DataState;
use permits_shared::{req_args::LoginReqArgs, route::Route, uac::User};
use secrecy::{ExposeSecret as _, SecretString};
use tracing::info;

use super::Screen;
use crate::{
    app::wake_fn,
    ui_helpers::{ui_error, ui_password_edit},
    DataShared,
};

#[derive(Debug)]
pub struct UiLogin {
    password: SecretString,
    login_attempt: DataState<Arc<User>>,
}

impl Default for UiLogin {
    fn default() -> Self {
        Self {
            password: SecretString::from(""),
            login_attempt: Default::default(),
        }
    }
}

impl UiLogin {
    fn is_allowed_to_login(&self, username: &str) -> bool {
        !username.trim().is_empty()
            && !self.password.expose_secret().is_empty()
            && !self.login_attempt.is_awaiting()
    }

    fn login_prompt(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let mut lost_focus = ui
            .add(egui::TextEdit::singleline(&mut data_shared.username).hint_text("Username"))
            .lost_focus();
        lost_focus =
            ui_password_edit(ui, &mut self.password, "Password").lost_focus() || lost_focus;

        if lost_focus
            && self.is_allowed_to_login(&data_shared.username)
            && ui.input(|i| i.key_pressed(egui::Key::Enter))
        {
            self.send_login_attempt(ui, data_shared)
        }
    }

    fn check_login_attempt_status(&mut self, ui: &mut egui::Ui) {
        if self.login_attempt.poll("Login failed. Please try again.") {
            ui.ctx().request_repaint();
        }
        match &self.login_attempt {
            DataState::None => {}
            DataState::AwaitingResponse(_) => {
                ui.spinner();
            }
            DataState::Present(user) => {
                // The route guard moves on to the dashboard on the next frame
                info!(username = %user.username, "Login completed");
                ui.label("Login successful");
            }
            DataState::Failed(e) => {
                ui.separator();
                ui_error(ui, e.as_str());
                if ui.button("Clear error status").clicked() {
                    self.login_attempt = DataState::None;
                }
                ui.separator();
            }
        }
    }

    fn send_login_attempt(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let args = LoginReqArgs::new(data_shared.username.trim(), self.password.clone());
        let rx = data_shared.client.login(args, wake_fn(ui.ctx().clone()));
        self.login_attempt = DataState::awaiting(rx);
        self.password = SecretString::from("");
    }
}

impl Screen for UiLogin {
    fn route(&self) -> Route {
        Route::Login
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        ui.vertical_centered(|ui| {
            ui.heading("Login");

            self.login_prompt(ui, data_shared);

            self.check_login_attempt_status(ui);

            if ui
                .add_enabled(
                    self.is_allowed_to_login(&data_shared.username),
                    egui::Button::new("Login"),
                )
                .clicked()
            {
                self.send_login_attempt(ui, data_shared);
            }

            ui.separator();
            if ui.link("Don't have an account? Register").clicked() {
                data_shared.navigate(Route::Register);
            }
        });
    }
}
