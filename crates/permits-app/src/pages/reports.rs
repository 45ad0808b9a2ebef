use egui_extras::{Column, TableBuilder};
use permits_client_core::screen::DataState;
use permits_shared::{
    chalan::ChalanStatistics,
    report::{
        percent_of, AuthorityReportRow, DetailedStats, ExpiringPermitsReport, ExpiringQuery,
        GroupedReport, PermitTypeReportRow, VehicleTypeReportRow,
    },
    route::Route,
};
use strum::IntoEnumIterator as _;

use super::{dashboard::show_statistics, Screen};
use crate::{
    app::wake_fn,
    ui_helpers::{get_text_height, text_or_na, ui_failed, ui_grid_row},
    DataShared,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::EnumIter)]
enum ReportTab {
    #[default]
    Overview,
    PermitTypes,
    VehicleTypes,
    Authorities,
    Expiring,
}

impl ReportTab {
    fn label(&self) -> &'static str {
        match self {
            ReportTab::Overview => "Overview",
            ReportTab::PermitTypes => "By Permit Type",
            ReportTab::VehicleTypes => "By Vehicle Type",
            ReportTab::Authorities => "By Authority",
            ReportTab::Expiring => "Expiring Soon",
        }
    }
}

/// Each report is only requested once its tab is first opened
#[derive(Debug, Default)]
pub struct UiReports {
    tab: ReportTab,
    statistics: DataState<ChalanStatistics>,
    detailed: DataState<DetailedStats>,
    by_permit_type: DataState<GroupedReport<PermitTypeReportRow>>,
    by_vehicle_type: DataState<GroupedReport<VehicleTypeReportRow>>,
    by_authority: DataState<GroupedReport<AuthorityReportRow>>,
    expiring: DataState<ExpiringPermitsReport>,
}

impl UiReports {
    fn refresh(&mut self) {
        let tab = self.tab;
        *self = Self {
            tab,
            ..Default::default()
        };
    }

    /// Starts the request for the open tab if needed and polls it
    fn fetch(&mut self, ctx: &egui::Context, data_shared: &DataShared) {
        let client = &data_shared.client;
        let notify = || wake_fn(ctx.clone());
        match self.tab {
            ReportTab::Overview => {
                if self.detailed.is_none() {
                    self.detailed = DataState::awaiting(client.report_detailed_stats(notify()));
                }
                self.detailed.poll("Failed to load permit statistics");
            }
            ReportTab::PermitTypes => {
                if self.by_permit_type.is_none() {
                    self.by_permit_type =
                        DataState::awaiting(client.report_permits_by_type(notify()));
                }
                self.by_permit_type.poll("Failed to load permit type report");
            }
            ReportTab::VehicleTypes => {
                if self.by_vehicle_type.is_none() {
                    self.by_vehicle_type =
                        DataState::awaiting(client.report_permits_by_vehicle(notify()));
                }
                self.by_vehicle_type.poll("Failed to load vehicle type report");
            }
            ReportTab::Authorities => {
                if self.by_authority.is_none() {
                    self.by_authority =
                        DataState::awaiting(client.report_authority_summary(notify()));
                }
                self.by_authority.poll("Failed to load authority report");
            }
            ReportTab::Expiring => {
                if self.expiring.is_none() {
                    self.expiring = DataState::awaiting(
                        client.report_expiring_permits(ExpiringQuery::default(), notify()),
                    );
                }
                self.expiring.poll("Failed to load expiring permits");
            }
        }
    }
}

impl Screen for UiReports {
    fn route(&self) -> Route {
        Route::Reports
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        ui.horizontal(|ui| {
            for tab in ReportTab::iter() {
                ui.selectable_value(&mut self.tab, tab, tab.label());
            }
            ui.separator();
            if ui.button("Refresh").clicked() {
                self.refresh();
            }
        });
        ui.separator();
        self.fetch(&ui.ctx().clone(), data_shared);

        match self.tab {
            ReportTab::Overview => {
                show_report(ui, &self.detailed, ui_detailed_stats);
                ui.add_space(8.0);
                show_statistics(ui, data_shared, &mut self.statistics);
            }
            ReportTab::PermitTypes => show_report(ui, &self.by_permit_type, |ui, report| {
                ui_permit_type_rows(ui, &report.data)
            }),
            ReportTab::VehicleTypes => show_report(ui, &self.by_vehicle_type, |ui, report| {
                ui_vehicle_type_rows(ui, &report.data)
            }),
            ReportTab::Authorities => show_report(ui, &self.by_authority, |ui, report| {
                ui_authority_rows(ui, &report.data)
            }),
            ReportTab::Expiring => show_report(ui, &self.expiring, ui_expiring),
        }
    }
}

fn show_report<T>(
    ui: &mut egui::Ui,
    state: &DataState<T>,
    add_contents: impl FnOnce(&mut egui::Ui, &T),
) {
    match state {
        DataState::None | DataState::AwaitingResponse(_) => {
            ui.spinner();
        }
        DataState::Failed(_) => ui_failed(ui, state),
        DataState::Present(report) => add_contents(ui, report),
    }
}

fn ui_detailed_stats(ui: &mut egui::Ui, stats: &DetailedStats) {
    let overall = &stats.overall_stats;
    ui.strong("Permits");
    egui::Grid::new("permit statistics")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            ui_grid_row(ui, "Total", overall.total_permits.to_string());
            for (status, count) in overall.by_status() {
                ui_grid_row(ui, status.label(), count.to_string());
            }
            let activity = &stats.recent_activity;
            ui_grid_row(
                ui,
                "Created (30 days)",
                activity.created_last_30_days.to_string(),
            );
            ui_grid_row(
                ui,
                "Modified (30 days)",
                activity.modified_last_30_days.to_string(),
            );
            ui_grid_row(
                ui,
                "Expiring (30 days)",
                activity.expiring_in_30_days.to_string(),
            );
        });
    ui.add_space(8.0);
    ui.columns(3, |columns| {
        for (ui, (title, counts)) in columns.iter_mut().zip([
            ("By Authority", &stats.by_authority),
            ("By Permit Type", &stats.by_permit_type),
            ("By Vehicle Type", &stats.by_vehicle_type),
        ]) {
            ui.strong(title);
            egui::Grid::new(title).num_columns(2).striped(true).show(ui, |ui| {
                for (name, count) in counts {
                    ui_grid_row(ui, name, count.to_string());
                }
            });
        }
    });
}

/// Header row followed by one row per item
fn ui_report_table<T>(
    ui: &mut egui::Ui,
    headings: &[&str],
    rows: &[T],
    mut cells: impl FnMut(&T) -> Vec<String>,
) {
    let text_height = get_text_height(ui);
    let mut table = TableBuilder::new(ui).striped(true).min_scrolled_height(0.0);
    for _ in headings {
        table = table.column(Column::auto());
    }
    table
        .header(text_height, |mut header| {
            for heading in headings {
                header.col(|ui| {
                    ui.strong(*heading);
                });
            }
        })
        .body(|body| {
            body.rows(text_height, rows.len(), |mut row| {
                for cell in cells(&rows[row.index()]) {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

fn active_share(active: u64, total: u64) -> String {
    format!("{}%", percent_of(active, total))
}

fn ui_permit_type_rows(ui: &mut egui::Ui, rows: &[PermitTypeReportRow]) {
    ui_report_table(
        ui,
        &[
            "Code",
            "Permit Type",
            "Total",
            "Active",
            "Pending",
            "Expired",
            "Cancelled",
            "Inactive",
            "Active %",
        ],
        rows,
        |x| {
            vec![
                x.permit_code.clone(),
                x.permit_type.clone(),
                x.total.to_string(),
                x.active.to_string(),
                x.pending.to_string(),
                x.expired.to_string(),
                x.cancelled.to_string(),
                x.inactive.to_string(),
                active_share(x.active, x.total),
            ]
        },
    );
}

fn ui_vehicle_type_rows(ui: &mut egui::Ui, rows: &[VehicleTypeReportRow]) {
    ui_report_table(
        ui,
        &["Vehicle Type", "Total", "Active", "Expired", "Active %"],
        rows,
        |x| {
            vec![
                x.vehicle_type.clone(),
                x.total.to_string(),
                x.active.to_string(),
                x.expired.to_string(),
                active_share(x.active, x.total),
            ]
        },
    );
}

fn ui_authority_rows(ui: &mut egui::Ui, rows: &[AuthorityReportRow]) {
    ui_report_table(
        ui,
        &["Authority", "Total", "Active", "Pending", "Expired", "Cancelled", "Inactive"],
        rows,
        |x| {
            vec![
                x.authority.clone(),
                x.total_permits.to_string(),
                x.active.to_string(),
                x.pending.to_string(),
                x.expired.to_string(),
                x.cancelled.to_string(),
                x.inactive.to_string(),
            ]
        },
    );
}

fn ui_expiring(ui: &mut egui::Ui, report: &ExpiringPermitsReport) {
    ui.strong(format!(
        "{} active permits expire by {}",
        report.total_expiring,
        report
            .expiring_date
            .map(|x| x.to_string())
            .unwrap_or_default()
    ));
    ui_report_table(
        ui,
        &["Permit Number", "Owner", "Vehicle", "Valid To"],
        &report.data,
        |x| {
            vec![
                text_or_na(x.permit_number.as_deref()).to_string(),
                text_or_na(x.owner_name.as_deref()).to_string(),
                text_or_na(x.vehicle_number.as_deref()).to_string(),
                x.valid_to.map(|d| d.to_string()).unwrap_or_default(),
            ]
        },
    );
}
