use permits_client_core::screen::{DataState, SubmitState};
use permits_shared::{
    errors::ValidationError,
    id::DbId,
    list::Page,
    req_args::api::admin::role::FeatureReqArgs,
    route::Route,
    uac::{FeatureRecord, Role, RoleDraft, RoleName},
};
use tracing::info;

use crate::{
    app::wake_fn,
    pages::{lookup_rows, Screen},
    shortcuts::shortcut_button,
    ui_helpers::{text_or_na, ui_error, ui_failed, ui_grid_edit},
    DataShared,
};

#[derive(Debug)]
pub struct UiRoles {
    roles: DataState<Page<Role>>,
    features: DataState<Page<FeatureRecord>>,
    selected: Option<DbId>,
    new_name: String,
    new_description: String,
    create: SubmitState,
    /// Outcome of adding or removing a feature
    change: DataState<()>,
}

impl Default for UiRoles {
    fn default() -> Self {
        Self {
            roles: DataState::None,
            features: DataState::None,
            selected: None,
            new_name: String::new(),
            new_description: String::new(),
            create: SubmitState::new("Failed to create role"),
            change: DataState::None,
        }
    }
}

/// Normalizes the name typed by the user into the role to create
pub fn role_draft(name: &str, description: &str) -> Result<RoleDraft, ValidationError> {
    let name = RoleName::try_from(name).map_err(|_| ValidationError::Required("Role name"))?;
    Ok(RoleDraft {
        name,
        description: description.trim().to_string(),
    })
}

impl UiRoles {
    fn poll_mutations(&mut self) {
        let mut is_done = false;
        if self.create.poll() {
            if let Some(id) = self.create.created_id() {
                info!(?id, "Role created");
                self.selected = Some(id);
                self.new_name.clear();
                self.new_description.clear();
                self.create.reset();
                is_done = true;
            }
        }
        if self.change.poll("Failed to update role features") && self.change.is_present() {
            self.change = DataState::None;
            is_done = true;
        }
        if is_done {
            self.roles = DataState::None;
        }
    }
}

impl Screen for UiRoles {
    fn route(&self) -> Route {
        Route::Roles
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        self.poll_mutations();
        if shortcut_button(ui, "Refresh", "", &data_shared.shortcuts.refresh) {
            self.roles = DataState::None;
            self.features = DataState::None;
        }

        ui.strong("New Role");
        egui::Grid::new("new role").num_columns(2).show(ui, |ui| {
            ui_grid_edit(ui, "Name", &mut self.new_name);
            ui_grid_edit(ui, "Description", &mut self.new_description);
        });
        let ctx = ui.ctx().clone();
        let client = &data_shared.client;
        if ui
            .add_enabled(!self.create.is_submitting(), egui::Button::new("Create Role"))
            .clicked()
        {
            match role_draft(&self.new_name, &self.new_description) {
                Ok(args) => self
                    .create
                    .start(client.create_role(&args, wake_fn(ctx.clone()))),
                Err(e) => self.create.reject(e),
            }
        }
        if let Some(e) = self.create.error() {
            ui_error(ui, e);
        }
        ui.separator();

        let is_busy = self.change.is_awaiting();
        let selected = self.selected;
        let features = lookup_rows(&mut self.features, "Failed to load features", || {
            DataState::awaiting(client.list_features(wake_fn(ctx.clone())))
        });
        if self.roles.is_none() {
            self.roles = DataState::awaiting(client.list_roles(wake_fn(ctx.clone())));
        }
        self.roles.poll("Failed to load roles");
        let roles = match &self.roles {
            DataState::Present(page) => &page.items,
            DataState::Failed(_) => {
                ui_failed(ui, &self.roles);
                return;
            }
            _ => {
                ui.spinner();
                return;
            }
        };

        let mut clicked_role = None;
        let mut toggled = None;
        ui.columns(2, |columns| {
            columns[0].strong("Roles");
            for role in roles {
                let text = match role.user_count {
                    Some(count) => format!("{} ({count} users)", role.label()),
                    None => role.label().to_string(),
                };
                if columns[0]
                    .selectable_label(selected == Some(role.id), text)
                    .on_hover_text(text_or_na(Some(role.description.as_str())))
                    .clicked()
                {
                    clicked_role = Some(role.id);
                }
            }

            let Some(role) = roles.iter().find(|x| Some(x.id) == selected) else {
                columns[1].label("Select a role to manage its features");
                return;
            };
            columns[1].strong(format!("Features of {}", role.label()));
            for feature in features {
                let is_granted = role.has_feature_id(feature.id);
                let mut is_checked = is_granted;
                let label = if feature.display_name.is_empty() {
                    feature.name.as_str()
                } else {
                    feature.display_name.as_str()
                };
                columns[1].add_enabled(!is_busy, egui::Checkbox::new(&mut is_checked, label));
                if is_checked != is_granted {
                    toggled = Some((role.id, feature.id, is_checked));
                }
            }
        });

        if let Some(id) = clicked_role {
            self.selected = Some(id);
        }
        if let Some((role_id, feature_id, is_add)) = toggled {
            let args = FeatureReqArgs { feature_id };
            let rx = if is_add {
                client.add_role_feature(role_id, &args, wake_fn(ctx))
            } else {
                client.remove_role_feature(role_id, &args, wake_fn(ctx))
            };
            self.change = DataState::awaiting(rx);
        }
        if is_busy {
            ui.spinner();
        }
        ui_failed(ui, &self.change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_draft_normalizes_name() {
        // Act
        let actual = role_draft(" Fee Collector ", " Collects fees ").unwrap();

        // Assert
        assert_eq!(actual.name.as_ref(), "fee_collector");
        assert_eq!(actual.description, "Collects fees");
    }

    #[test]
    fn blank_role_name_rejected() {
        assert_eq!(
            role_draft("   ", ""),
            Err(ValidationError::Required("Role name"))
        );
    }
}
