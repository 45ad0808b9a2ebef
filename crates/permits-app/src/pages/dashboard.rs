use permits_client_core::screen::DataState;
use permits_shared::{
    chalan::{ChalanStatistics, ChalanStatus},
    nav::{is_route_visible, visible_entries, NavSection, NavTarget},
    route::Route,
};
use strum::IntoEnumIterator as _;

use super::Screen;
use crate::{
    app::wake_fn,
    ui_helpers::{ui_failed, ui_grid_row},
    DataShared,
};

#[derive(Debug, Default)]
pub struct UiDashboard {
    statistics: DataState<ChalanStatistics>,
}

impl Screen for UiDashboard {
    fn route(&self) -> Route {
        Route::Dashboard
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let Some(user) = data_shared.user() else {
            return;
        };
        ui.label(format!("Welcome, {}", user.display_name()));
        if let Some(role) = user.role.as_ref() {
            ui.weak(format!("Role: {}", role.label()));
        }
        ui.add_space(8.0);

        if is_route_visible(Route::Chalans, Some(&*user)) {
            show_statistics(ui, data_shared, &mut self.statistics);
            ui.add_space(8.0);
        }

        ui.strong("Quick Links");
        ui.horizontal_wrapped(|ui| {
            for entry in visible_entries(NavSection::Main, Some(&*user)) {
                let NavTarget::Route(target) = entry.target else {
                    continue;
                };
                if target != Route::Dashboard && ui.button(entry.label).clicked() {
                    data_shared.navigate(target);
                }
            }
        });
    }
}

/// Chalan totals shared by the dashboard, chalan list and reports
pub fn show_statistics(
    ui: &mut egui::Ui,
    data_shared: &DataShared,
    statistics: &mut DataState<ChalanStatistics>,
) {
    if statistics.is_none() {
        *statistics = DataState::awaiting(
            data_shared
                .client
                .chalan_statistics(wake_fn(ui.ctx().clone())),
        );
    }
    statistics.poll("Failed to load chalan statistics");
    ui.strong("Chalan Statistics");
    match statistics {
        DataState::None | DataState::AwaitingResponse(_) => {
            ui.spinner();
        }
        DataState::Failed(_) => {
            ui_failed(ui, statistics);
            if ui.button("Retry").clicked() {
                *statistics = DataState::None;
            }
        }
        DataState::Present(stats) => {
            egui::Grid::new("chalan statistics")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    ui_grid_row(ui, "Total Chalans", stats.total_chalans.to_string());
                    for status in ChalanStatus::iter() {
                        ui_grid_row(ui, status.label(), stats.count_for(status).to_string());
                    }
                    ui_grid_row(ui, "Total Fees", stats.total_fees_amount.to_string());
                    ui_grid_row(ui, "Total Paid", stats.total_paid_amount.to_string());
                    ui_grid_row(ui, "Pending Collection", stats.pending_collection.to_string());
                });
        }
    }
}
