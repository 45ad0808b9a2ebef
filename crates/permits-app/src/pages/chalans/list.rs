use permits_client_core::screen::{DataState, ListState};
use permits_shared::{
    chalan::{ChalanStatistics, ChalanStatus, ChalanSummary},
    list::{ListQuery, Page},
    nav::is_route_visible,
    route::Route,
    vehicle_type::VehicleType,
};
use strum::IntoEnumIterator as _;

use super::ui_chalan_table;
use crate::{
    app::wake_fn,
    pages::{dashboard::show_statistics, lookup_rows, Screen},
    shortcuts::shortcut_button,
    ui_helpers::{ui_filter_combo, ui_list_feedback, ui_pagination, ui_search_edit},
    DataShared,
};

#[derive(Debug)]
pub struct UiChalanList {
    list: ListState<ChalanSummary>,
    statistics: DataState<ChalanStatistics>,
    vehicle_types: DataState<Page<VehicleType>>,
    search: String,
}

impl UiChalanList {
    pub fn new(query: ListQuery) -> Self {
        Self {
            list: ListState::new(query, "Failed to load chalans"),
            statistics: DataState::None,
            vehicle_types: DataState::None,
            search: String::new(),
        }
    }
}

impl Screen for UiChalanList {
    fn route(&self) -> Route {
        Route::Chalans
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        egui::CollapsingHeader::new("Statistics")
            .default_open(true)
            .show(ui, |ui| show_statistics(ui, data_shared, &mut self.statistics));

        ui.horizontal_wrapped(|ui| {
            let is_enter = ui_search_edit(ui, &mut self.search, "Chalan no., owner or car");
            if ui.button("Search").clicked() || is_enter {
                let search = self.search.clone();
                self.list.update_query(|q| q.set_search(&search));
            }
            ui.label("Status");
            let statuses: Vec<ChalanStatus> = ChalanStatus::iter().collect();
            let statuses = statuses.iter().map(|x| (x.as_ref(), x.label()));
            if let Some(status) =
                ui_filter_combo(ui, "chalan status", self.list.query.status.as_deref(), statuses)
            {
                self.list.update_query(|q| q.set_status(status.as_deref()));
            }
            if shortcut_button(ui, "Refresh", "", &data_shared.shortcuts.refresh) {
                self.list.refresh();
                self.statistics = DataState::None;
            }
            let user = data_shared.user();
            if is_route_visible(Route::ChalanCreate, user.as_deref())
                && ui.button("Create Chalan").clicked()
            {
                data_shared.navigate(Route::ChalanCreate);
            }
        });
        ui.separator();

        let ctx = ui.ctx().clone();
        let client = &data_shared.client;
        if self.list.needs_fetch() {
            let ctx = ctx.clone();
            self.list.start_fetch(|q| client.list_chalans(q, wake_fn(ctx)));
        }
        self.list.poll();
        let vehicle_types =
            lookup_rows(&mut self.vehicle_types, "Failed to load vehicle types", || {
                DataState::awaiting(client.list_vehicle_types(wake_fn(ctx)))
            });

        ui_list_feedback(ui, &self.list, "No chalans found");
        if !self.list.rows().is_empty() {
            if let Some(id) = ui_chalan_table(ui, self.list.rows(), vehicle_types) {
                data_shared.navigate(Route::ChalanDetail(id));
            }
        }
        ui.separator();
        ui_pagination(ui, &mut self.list, &data_shared.shortcuts);
    }
}
