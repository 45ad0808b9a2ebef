use std::sync::Arc;

use egui::ScrollArea;
use permits_client_core::{screen::DataState, Client, UiCallBack};
use permits_shared::{
    list::ListQuery,
    nav::{visible_entries, NavEntry, NavSection, NavTarget},
    route::{self, GuardOutcome, Route},
    uac::User,
};
use secrecy::{ExposeSecret as _, SecretString};
use tracing::{info, instrument, warn};

use crate::{
    config::Settings, notification_center::NotificationCenter, pages::Page, shortcuts::Shortcuts,
};

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PermitsApp {
    data_shared: DataShared,
    #[serde(skip)]
    page: Option<Page>,
    #[serde(skip)]
    session_restore: DataState<Arc<User>>,
    #[serde(skip)]
    notifications: NotificationCenter,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct DataShared {
    /// Last username entered on the login screen
    pub username: String,
    /// Path of the screen being shown, kept across restarts
    current_path: String,
    /// Lets the session survive a restart, cleared on logout or rejection
    saved_token: Option<String>,
    pub shortcuts: Shortcuts,
    #[serde(skip)]
    pub client: Client,
    #[serde(skip)]
    page_size: u32,
}

impl DataShared {
    fn new(settings: &Settings) -> Self {
        Self {
            client: Client::new(
                settings.api.base_url.clone(),
                settings.api.api_key.clone(),
            ),
            page_size: settings.ui.page_size,
            ..Default::default()
        }
    }

    /// Shows `route` starting from the next frame
    #[instrument(skip(self))]
    pub fn navigate(&mut self, route: Route) {
        self.current_path = route.to_path();
    }

    pub fn user(&self) -> Option<Arc<User>> {
        self.client.user_info()
    }

    pub fn is_logged_in(&self) -> bool {
        self.client.is_logged_in()
    }

    /// Starting query for list screens using the configured page size
    pub fn list_query(&self) -> ListQuery {
        ListQuery::with_limit(self.page_size)
    }

    /// Keeps the persisted token in line with the client's session
    fn sync_saved_token(&mut self) {
        let current = self
            .client
            .token()
            .filter(|_| self.client.is_logged_in())
            .map(|x| x.expose_secret().to_string());
        if current.is_none() && self.client.token().is_some() {
            // Session restore still in progress
            return;
        }
        if self.saved_token != current {
            info!(has_token = current.is_some(), "Saved session updated");
            self.saved_token = current;
        }
    }

    fn logout(&mut self) {
        self.client.logout_no_wait();
        self.saved_token = None;
        self.navigate(Route::Login);
    }
}

impl eframe::App for PermitsApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        info!("Saving with key: {}", eframe::APP_KEY);
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per
    /// second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.top_panel(ctx);
        self.bottom_panel(ctx);
        if self.is_restoring_session(ctx) {
            return;
        }
        self.data_shared.sync_saved_token();
        if self.data_shared.is_logged_in() {
            let route = self.current_route();
            self.nav_panel(ctx, route);
        }
        // Resolved again as the navigation panel may have changed it
        let route = self.current_route();
        self.show_page(ctx, route);

        // Request repaint after 1 second for the clock
        ctx.request_repaint_after(std::time::Duration::from_secs(1));
    }
}

impl PermitsApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let fresh = DataShared::new(&settings);

        // Load previous app state (if any).
        let mut result: Self = if let Some(storage) = cc.storage {
            info!("Storage found. Loading...");
            match eframe::get_value(storage, eframe::APP_KEY) {
                Some(value) => {
                    info!("Loaded succeeded");
                    value
                }
                None => {
                    warn!("Load failed");
                    Default::default()
                }
            }
        } else {
            info!("No storage found");
            Default::default()
        };

        // Settings always come from the configuration not from storage
        result.data_shared.client = fresh.client;
        result.data_shared.page_size = fresh.page_size;

        if let Some(token) = result.data_shared.saved_token.clone() {
            info!("Restoring saved session");
            result.session_restore = DataState::awaiting(
                result
                    .data_shared
                    .client
                    .restore_session(SecretString::from(token), wake_fn(cc.egui_ctx.clone())),
            );
        }
        result
    }

    /// Shows a spinner until a saved session is confirmed or rejected
    fn is_restoring_session(&mut self, ctx: &egui::Context) -> bool {
        self.session_restore.poll("Failed to restore session");
        match &self.session_restore {
            DataState::AwaitingResponse(_) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.spinner();
                        ui.label("Restoring session...");
                    });
                });
                true
            }
            DataState::Failed(e) => {
                info!(?e, "Saved session was not accepted");
                self.data_shared.saved_token = None;
                self.session_restore = DataState::None;
                false
            }
            DataState::Present(user) => {
                info!(username = %user.username, "Session restored");
                self.session_restore = DataState::None;
                false
            }
            DataState::None => false,
        }
    }

    /// Applies the route guard to the current path, following any redirect
    fn current_route(&mut self) -> Route {
        let user = self.data_shared.user();
        let outcome = route::resolve(&self.data_shared.current_path, user.as_deref());
        if let GuardOutcome::Redirect(target) = outcome {
            info!(from = ?self.data_shared.current_path, to = %target, "Redirecting");
            self.data_shared.navigate(target);
        }
        outcome.route()
    }

    fn show_page(&mut self, ctx: &egui::Context, route: Route) {
        if self.page.as_ref().is_none_or(|x| x.route() != route) {
            self.page = Some(Page::new(route, &self.data_shared));
        }
        let Some(page) = self.page.as_mut() else {
            return;
        };
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                if !route.is_public() {
                    ui.heading(route.title());
                    ui.separator();
                }
                page.show(ui, &mut self.data_shared);
            });
        });
    }

    fn nav_panel(&mut self, ctx: &egui::Context, route: Route) {
        egui::SidePanel::left("nav_panel")
            .resizable(false)
            .default_width(180.0)
            .show(ctx, |ui| {
                if ui.input_mut(|i| i.consume_shortcut(&self.data_shared.shortcuts.go_dashboard)) {
                    self.data_shared.navigate(Route::Dashboard);
                }
                ui.with_layout(egui::Layout::top_down_justified(egui::Align::LEFT), |ui| {
                    let user = self.data_shared.user();
                    for entry in visible_entries(NavSection::Main, user.as_deref()) {
                        self.ui_nav_entry(ui, entry, route);
                    }
                    ui.separator();
                    for entry in visible_entries(NavSection::Info, user.as_deref()) {
                        self.ui_nav_entry(ui, entry, route);
                    }
                });
            });
    }

    fn ui_nav_entry(&mut self, ui: &mut egui::Ui, entry: &NavEntry, current: Route) {
        match entry.target {
            NavTarget::Route(target) => {
                let is_active = current.menu_route() == target;
                if ui.selectable_label(is_active, entry.label).clicked() {
                    self.data_shared.navigate(target);
                }
            }
            NavTarget::Logout => {
                if ui.button(entry.label).clicked() {
                    self.logout();
                }
            }
        }
    }

    fn top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                egui::widgets::global_theme_preference_switch(ui);
                ui.separator();
                self.ui_menu_file(ui, ctx);
                if self.data_shared.is_logged_in() {
                    ui.separator();
                    if let Some(route) = self.notifications.ui(ui, &self.data_shared.client) {
                        self.data_shared.navigate(route);
                    }
                }
            });
        });
    }

    fn bottom_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::BOTTOM), |ui| {
                ui.label(current_time());
                if let Some(user) = self.data_shared.user() {
                    if ui.button("Logout").clicked() {
                        self.logout();
                    }
                    ui.label(format!("Logged in as {}", user.display_name()));
                    if let Some(role) = user.role.as_ref() {
                        ui.weak(format!("({})", role.label()));
                    }
                } else if self.data_shared.client.token().is_some() {
                    ui.spinner();
                }
                ui.weak(self.data_shared.client.base_url());
                egui::warn_if_debug_build(ui);
            });
        });
    }

    #[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
    fn ui_menu_file(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.menu_button("File", |ui| {
            if self.data_shared.is_logged_in() {
                if ui.button("My Profile").clicked() {
                    self.data_shared.navigate(Route::Profile);
                    ui.close_menu();
                }
                if ui.button("Logout").clicked() {
                    self.logout();
                    ui.close_menu();
                }
            }

            // On the web the browser controls the zoom
            #[cfg(not(target_arch = "wasm32"))]
            {
                ui.separator();
                egui::gui_zoom::zoom_menu_buttons(ui);
                ui.weak(format!(
                    "Current zoom: {:.0}%",
                    100.0 * ui.ctx().zoom_factor()
                ))
                .on_hover_text("The UI zoom level, on top of the operating system's default value");
                ui.separator();
            }

            if ui.button("Reset Layout").clicked() {
                ui.ctx().memory_mut(|mem| mem.reset_areas());
                ui.close_menu();
            }

            #[cfg(not(target_arch = "wasm32"))] // no File->Quit on web pages!
            if ui.button("Quit").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }

    fn logout(&mut self) {
        info!("Logout requested");
        self.data_shared.logout();
        // Drop the page so none of its data outlives the session
        self.page = None;
        self.notifications = NotificationCenter::default();
    }
}

fn current_time() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[inline]
pub fn wake_fn(ctx: egui::Context) -> impl UiCallBack {
    move || ctx.request_repaint()
}

#[cfg(test)]
mod tests {
    use permits_shared::const_config::client::CLIENT_DEFAULT_PAGE_SIZE;

    use super::*;

    #[test]
    fn navigate_sets_path_of_route() {
        // Arrange
        let mut data_shared = DataShared::new(&Settings::default());

        // Act
        data_shared.navigate(Route::ChalanDetail(4.into()));

        // Assert
        assert_eq!(data_shared.current_path, "/chalans/4");
    }

    #[test]
    fn logged_out_session_sends_every_path_to_login() {
        // Arrange
        let mut app = PermitsApp {
            data_shared: DataShared::new(&Settings::default()),
            ..Default::default()
        };
        app.data_shared.navigate(Route::Users);

        // Act
        let actual = app.current_route();

        // Assert
        assert_eq!(actual, Route::Login);
        assert_eq!(app.data_shared.current_path, "/login");
    }

    #[test]
    fn list_query_uses_configured_page_size() {
        let mut settings = Settings::default();
        settings.ui.page_size = 50;

        let actual = DataShared::new(&settings).list_query();

        assert_eq!(actual.limit, 50);
        assert_ne!(actual.limit, CLIENT_DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn saved_token_is_cleared_when_there_is_no_session() {
        let mut data_shared = DataShared::new(&Settings::default());
        data_shared.saved_token = Some("stale".to_string());

        data_shared.sync_saved_token();

        assert_eq!(data_shared.saved_token, None);
    }

    #[test]
    fn persisted_state_skips_client_side_data() {
        let mut data_shared = DataShared::new(&Settings::default());
        data_shared.username = "officer".to_string();
        data_shared.navigate(Route::Chalans);

        let actual = serde_json::to_value(&data_shared).unwrap();

        assert_eq!(actual["username"], "officer");
        assert_eq!(actual["current_path"], "/chalans");
        assert!(actual.get("client").is_none());
        assert!(actual.get("page_size").is_none());
    }
}
