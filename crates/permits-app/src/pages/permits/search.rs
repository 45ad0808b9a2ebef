use permits_client_core::screen::ListState;
use permits_shared::{list::ListQuery, permit::Permit, route::Route, uac::visible_permit_columns};

use super::ui_permit_table;
use crate::{
    app::wake_fn,
    pages::Screen,
    ui_helpers::{ui_list_feedback, ui_pagination, ui_search_edit},
    DataShared,
};

/// Free text lookup over permits, nothing is requested until the first search
#[derive(Debug)]
pub struct UiPermitSearch {
    list: ListState<Permit>,
    search: String,
    has_searched: bool,
}

impl UiPermitSearch {
    pub fn new(query: ListQuery) -> Self {
        Self {
            list: ListState::new(query, "Search failed"),
            search: String::new(),
            has_searched: false,
        }
    }
}

impl Screen for UiPermitSearch {
    fn route(&self) -> Route {
        Route::Search
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        ui.label("Search by permit number, vehicle number, owner name or CNIC");
        ui.horizontal(|ui| {
            let is_enter = ui_search_edit(ui, &mut self.search, "Search");
            let can_search = !self.search.trim().is_empty();
            let is_clicked = ui
                .add_enabled(can_search, egui::Button::new("Search"))
                .clicked();
            if can_search && (is_clicked || is_enter) {
                let search = self.search.clone();
                self.has_searched = true;
                self.list.update_query(|q| q.set_search(&search));
                self.list.refresh();
            }
        });
        ui.separator();
        if !self.has_searched {
            return;
        }

        if self.list.needs_fetch() {
            let ctx = ui.ctx().clone();
            let client = &data_shared.client;
            self.list.start_fetch(|q| client.list_permits(q, wake_fn(ctx)));
        }
        self.list.poll();

        ui_list_feedback(ui, &self.list, "No permits match the search");
        if !self.list.rows().is_empty() {
            let user = data_shared.user();
            let columns = visible_permit_columns(user.as_deref());
            if let Some(id) = ui_permit_table(ui, self.list.rows(), columns) {
                data_shared.navigate(Route::PermitDetails(id));
            }
            ui.separator();
            ui_pagination(ui, &mut self.list, &data_shared.shortcuts);
        }
    }
}
