use std::sync::Arc;

use permits_client_core::screen::DataState;
use permits_shared::{
    req_args::api::{ChangePasswordReqArgs, UpdateProfileReqArgs},
    route::Route,
    uac::User,
};
use tracing::info;

use super::Screen;
use crate::{
    app::wake_fn,
    ui_helpers::{text_or_na, ui_failed, ui_grid_edit, ui_grid_row, ui_password_edit},
    DataShared,
};

#[derive(Debug, Default)]
pub struct UiProfile {
    profile_form: Option<UpdateProfileReqArgs>,
    profile_update: DataState<()>,
    user_refresh: DataState<Arc<User>>,
    password_form: ChangePasswordReqArgs,
    password_change: DataState<()>,
}

/// The profile form starts with the values currently stored
fn profile_form_for(user: &User) -> UpdateProfileReqArgs {
    UpdateProfileReqArgs {
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
    }
}

impl Screen for UiProfile {
    fn route(&self) -> Route {
        Route::Profile
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let Some(user) = data_shared.user() else {
            return;
        };
        self.ui_details(ui, &user);
        ui.separator();
        self.ui_update_profile(ui, data_shared, &user);
        ui.separator();
        self.ui_change_password(ui, data_shared);
    }
}

impl UiProfile {
    fn ui_details(&self, ui: &mut egui::Ui, user: &User) {
        ui.strong("Account");
        egui::Grid::new("profile details")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                ui_grid_row(ui, "Username", &user.username);
                ui_grid_row(ui, "Email", text_or_na(Some(user.email.as_str())));
                ui_grid_row(ui, "Name", user.display_name());
                ui_grid_row(ui, "Role", text_or_na(user.role.as_ref().map(|x| x.label())));
                let features = user
                    .features
                    .iter()
                    .map(|x| x.label())
                    .collect::<Vec<_>>()
                    .join(", ");
                ui_grid_row(ui, "Features", text_or_na(Some(features.as_str())));
            });
    }

    fn ui_update_profile(&mut self, ui: &mut egui::Ui, data_shared: &DataShared, user: &User) {
        ui.strong("Update Profile");
        let form = self
            .profile_form
            .get_or_insert_with(|| profile_form_for(user));
        let is_busy = self.profile_update.is_awaiting() || self.user_refresh.is_awaiting();
        egui::Grid::new("profile form").num_columns(2).show(ui, |ui| {
            ui_grid_edit(ui, "First name", &mut form.first_name);
            ui_grid_edit(ui, "Last name", &mut form.last_name);
            ui_grid_edit(ui, "Email", &mut form.email);
        });
        if ui
            .add_enabled(!is_busy, egui::Button::new("Save Profile"))
            .clicked()
        {
            self.user_refresh = DataState::None;
            self.profile_update = DataState::awaiting(
                data_shared
                    .client
                    .update_profile(form, wake_fn(ui.ctx().clone())),
            );
        }

        if self.profile_update.poll("Failed to update profile") && self.profile_update.is_present()
        {
            info!("Profile updated, fetching user again");
            self.user_refresh = DataState::awaiting(
                data_shared
                    .client
                    .refresh_user(wake_fn(ui.ctx().clone())),
            );
        }
        if self.user_refresh.poll("Failed to reload profile") && self.user_refresh.is_present() {
            // Show what the backend stored
            self.profile_form = None;
        }

        if is_busy {
            ui.spinner();
        } else if self.profile_update.error().is_some() {
            ui_failed(ui, &self.profile_update);
        } else if self.user_refresh.error().is_some() {
            ui_failed(ui, &self.user_refresh);
        } else if self.user_refresh.is_present() {
            ui.label("Profile updated");
        }
    }

    fn ui_change_password(&mut self, ui: &mut egui::Ui, data_shared: &DataShared) {
        ui.strong("Change Password");
        let is_busy = self.password_change.is_awaiting();
        egui::Grid::new("password form").num_columns(2).show(ui, |ui| {
            ui.label("Current password");
            ui_password_edit(ui, &mut self.password_form.old_password, "");
            ui.end_row();
            ui.label("New password");
            ui_password_edit(ui, &mut self.password_form.new_password, "");
            ui.end_row();
            ui.label("Confirm new password");
            ui_password_edit(ui, &mut self.password_form.confirm_password, "");
            ui.end_row();
        });
        if ui
            .add_enabled(!is_busy, egui::Button::new("Change Password"))
            .clicked()
        {
            self.password_change = match self.password_form.validate() {
                Ok(()) => DataState::awaiting(
                    data_shared
                        .client
                        .change_password(&self.password_form, wake_fn(ui.ctx().clone())),
                ),
                Err(e) => DataState::Failed(e.to_string()),
            };
        }
        if self.password_change.poll("Failed to change password")
            && self.password_change.is_present()
        {
            self.password_form = ChangePasswordReqArgs::default();
        }
        match &self.password_change {
            DataState::None => {}
            DataState::AwaitingResponse(_) => {
                ui.spinner();
            }
            DataState::Present(()) => {
                ui.label("Password changed");
            }
            DataState::Failed(_) => ui_failed(ui, &self.password_change),
        }
    }
}

#[cfg(test)]
mod tests {
    use permits_shared::id::DbId;

    use super::*;

    #[test]
    fn profile_form_starts_with_stored_values() {
        // Arrange
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 3,
            "username": "sara",
            "email": "sara@example.com",
            "first_name": "Sara",
            "last_name": "Khan"
        }))
        .unwrap();

        // Act
        let actual = profile_form_for(&user);

        // Assert
        assert_eq!(user.id, DbId::from(3));
        assert_eq!(actual.first_name, "Sara");
        assert_eq!(actual.last_name, "Khan");
        assert_eq!(actual.email, "sara@example.com");
    }
}
