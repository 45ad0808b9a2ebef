use permits_client_core::screen::ListState;
use permits_shared::{
    list::ListQuery,
    nav::is_route_visible,
    permit::{Authority, Permit, PermitStatus},
    route::Route,
    uac::visible_permit_columns,
};
use strum::IntoEnumIterator as _;

use super::ui_permit_table;
use crate::{
    app::wake_fn,
    pages::Screen,
    shortcuts::shortcut_button,
    ui_helpers::{ui_filter_combo, ui_list_feedback, ui_pagination, ui_search_edit},
    DataShared,
};

#[derive(Debug)]
pub struct UiPermitList {
    list: ListState<Permit>,
    search: String,
}

impl UiPermitList {
    pub fn new(query: ListQuery) -> Self {
        Self {
            list: ListState::new(query, "Failed to load permits"),
            search: String::new(),
        }
    }
}

impl Screen for UiPermitList {
    fn route(&self) -> Route {
        Route::Permits
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let user = data_shared.user();
        ui.horizontal_wrapped(|ui| {
            let is_enter = ui_search_edit(ui, &mut self.search, "Search permits");
            if ui.button("Search").clicked() || is_enter {
                let search = self.search.clone();
                self.list.update_query(|q| q.set_search(&search));
            }
            ui.label("Status");
            let statuses: Vec<PermitStatus> = PermitStatus::iter().collect();
            let statuses = statuses.iter().map(|x| (x.as_ref(), x.label()));
            if let Some(status) =
                ui_filter_combo(ui, "permit status", self.list.query.status.as_deref(), statuses)
            {
                self.list.update_query(|q| q.set_status(status.as_deref()));
            }
            ui.label("Authority");
            let authorities: Vec<Authority> = Authority::iter().collect();
            let authorities = authorities.iter().map(|x| (x.as_ref(), x.as_ref()));
            if let Some(authority) = ui_filter_combo(
                ui,
                "permit authority",
                self.list.query.authority.as_deref(),
                authorities,
            ) {
                self.list.update_query(|q| q.set_authority(authority.as_deref()));
            }
            if shortcut_button(ui, "Refresh", "", &data_shared.shortcuts.refresh) {
                self.list.refresh();
            }
            if is_route_visible(Route::NewPermit, user.as_deref())
                && ui.button("New Permit").clicked()
            {
                data_shared.navigate(Route::NewPermit);
            }
        });
        ui.separator();

        if self.list.needs_fetch() {
            let ctx = ui.ctx().clone();
            let client = &data_shared.client;
            self.list.start_fetch(|q| client.list_permits(q, wake_fn(ctx)));
        }
        self.list.poll();

        ui_list_feedback(ui, &self.list, "No permits found");
        if !self.list.rows().is_empty() {
            let columns = visible_permit_columns(user.as_deref());
            if let Some(id) = ui_permit_table(ui, self.list.rows(), columns) {
                data_shared.navigate(Route::PermitDetails(id));
            }
        }
        ui.separator();
        ui_pagination(ui, &mut self.list, &data_shared.shortcuts);
    }
}
