use egui_extras::{Column, TableBuilder};
use permits_client_core::screen::{DataState, ListState};
use permits_shared::{
    id::DbId,
    list::{ListQuery, Page},
    req_args::api::admin::user::{AssignRoleReqArgs, NewUserReqArgs},
    route::Route,
    uac::{Role, User},
};
use tracing::info;

use crate::{
    app::wake_fn,
    pages::{lookup_rows, Screen},
    shortcuts::shortcut_button,
    ui_helpers::{
        get_text_height, readonly_checkbox_no_text, text_or_na, ui_escape_button, ui_failed,
        ui_grid_edit, ui_list_feedback, ui_lookup_combo, ui_pagination, ui_password_edit,
        ui_search_edit,
    },
    DataShared,
};

#[derive(Debug)]
pub struct UiUsers {
    list: ListState<User>,
    roles: DataState<Page<Role>>,
    search: String,
    new_user: Option<NewUserReqArgs>,
    selected: Option<DbId>,
    role_choice: Option<DbId>,
    /// Outcome of the last change made to any user
    change: DataState<()>,
}

impl UiUsers {
    pub fn new(query: ListQuery) -> Self {
        Self {
            list: ListState::new(query, "Failed to load users"),
            roles: DataState::None,
            search: String::new(),
            new_user: None,
            selected: None,
            role_choice: None,
            change: DataState::None,
        }
    }

    fn selected_user(&self) -> Option<&User> {
        self.selected
            .and_then(|id| self.list.rows().iter().find(|x| x.id == id))
    }
}

impl Screen for UiUsers {
    fn route(&self) -> Route {
        Route::Users
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        if self.change.poll("Failed to update user") && self.change.is_present() {
            info!("User changed, reloading list");
            self.new_user = None;
            self.list.refresh();
        }

        ui.horizontal(|ui| {
            let is_enter = ui_search_edit(ui, &mut self.search, "Search users");
            if ui.button("Search").clicked() || is_enter {
                let search = self.search.clone();
                self.list.update_query(|q| q.set_search(&search));
            }
            if shortcut_button(ui, "Refresh", "", &data_shared.shortcuts.refresh) {
                self.list.refresh();
            }
            if self.new_user.is_none() && ui.button("New User").clicked() {
                self.new_user = Some(NewUserReqArgs::default());
                self.change = DataState::None;
            }
        });
        ui.separator();

        let ctx = ui.ctx().clone();
        let client = &data_shared.client;
        if self.list.needs_fetch() {
            let ctx = ctx.clone();
            self.list.start_fetch(|q| client.list_users(q, wake_fn(ctx)));
        }
        self.list.poll();
        let selected_user = self.selected_user().cloned();
        let roles = lookup_rows(&mut self.roles, "Failed to load roles", || {
            DataState::awaiting(client.list_roles(wake_fn(ctx.clone())))
        });
        let is_busy = self.change.is_awaiting();

        if let Some(form) = self.new_user.as_mut() {
            let mut is_cancelled = false;
            ui.strong("New User");
            egui::Grid::new("new user").num_columns(2).show(ui, |ui| {
                ui_grid_edit(ui, "Username", &mut form.username);
                ui_grid_edit(ui, "Email", &mut form.email);
                ui.label("Password");
                ui_password_edit(ui, &mut form.password, "");
                ui.end_row();
                ui_grid_edit(ui, "First name", &mut form.first_name);
                ui_grid_edit(ui, "Last name", &mut form.last_name);
                ui.label("Role");
                ui_lookup_combo(ui, "new user role", roles, &mut form.role_id);
                ui.end_row();
            });
            ui.horizontal(|ui| {
                if ui.add_enabled(!is_busy, egui::Button::new("Create")).clicked() {
                    self.change = match form.validate() {
                        Ok(()) => {
                            DataState::awaiting(client.create_user(form, wake_fn(ctx.clone())))
                        }
                        Err(e) => DataState::Failed(e.to_string()),
                    };
                }
                is_cancelled = ui_escape_button(ui, "Cancel");
            });
            if is_cancelled {
                self.new_user = None;
            }
            ui.separator();
        }

        if let Some(user) = selected_user {
            ui.strong(format!("Selected: {}", user.username));
            ui.horizontal(|ui| {
                ui.label("Role");
                ui_lookup_combo(ui, "assign role", roles, &mut self.role_choice);
                let can_assign = !is_busy
                    && self.role_choice.is_some()
                    && self.role_choice != user.role.as_ref().map(|x| x.id);
                if ui
                    .add_enabled(can_assign, egui::Button::new("Assign Role"))
                    .clicked()
                {
                    if let Some(role_id) = self.role_choice {
                        self.change = DataState::awaiting(client.assign_role(
                            user.id,
                            &AssignRoleReqArgs { role_id },
                            wake_fn(ctx.clone()),
                        ));
                    }
                }
                ui.separator();
                let caption = if user.is_active {
                    "Deactivate"
                } else {
                    "Activate"
                };
                if ui.add_enabled(!is_busy, egui::Button::new(caption)).clicked() {
                    info!(id = ?user.id, caption, "changing user status");
                    let rx = if user.is_active {
                        client.deactivate_user(user.id, wake_fn(ctx.clone()))
                    } else {
                        client.activate_user(user.id, wake_fn(ctx.clone()))
                    };
                    self.change = DataState::awaiting(rx);
                }
            });
            ui.separator();
        }
        if is_busy {
            ui.spinner();
        }
        ui_failed(ui, &self.change);

        ui_list_feedback(ui, &self.list, "No users found");
        if !self.list.rows().is_empty() {
            if let Some(id) = ui_user_table(ui, self.list.rows(), self.selected) {
                self.role_choice = self
                    .list
                    .rows()
                    .iter()
                    .find(|x| x.id == id)
                    .and_then(|x| x.role.as_ref().map(|role| role.id));
                self.selected = Some(id);
            }
        }
        ui.separator();
        ui_pagination(ui, &mut self.list, &data_shared.shortcuts);
    }
}

/// Returns the id of the row clicked if any
fn ui_user_table(ui: &mut egui::Ui, users: &[User], selected: Option<DbId>) -> Option<DbId> {
    let text_height = get_text_height(ui);
    let mut result = None;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::LEFT))
        .columns(Column::auto(), 5)
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .sense(egui::Sense::click())
        .header(text_height, |mut header| {
            for heading in ["Username", "Name", "Email", "Role", "Active", "Staff"] {
                header.col(|ui| {
                    ui.strong(heading);
                });
            }
        })
        .body(|body| {
            body.rows(text_height, users.len(), |mut row| {
                let user = &users[row.index()];
                row.set_selected(selected == Some(user.id));
                row.col(|ui| {
                    ui.label(&user.username);
                });
                row.col(|ui| {
                    ui.label(user.display_name());
                });
                row.col(|ui| {
                    ui.label(text_or_na(Some(user.email.as_str())));
                });
                row.col(|ui| {
                    ui.label(text_or_na(user.role.as_ref().map(|x| x.label())));
                });
                row.col(|ui| {
                    readonly_checkbox_no_text(ui, user.is_active);
                });
                row.col(|ui| {
                    readonly_checkbox_no_text(ui, user.is_staff);
                });
                if row.response().clicked() {
                    result = Some(user.id);
                }
            });
        });
    result
}
