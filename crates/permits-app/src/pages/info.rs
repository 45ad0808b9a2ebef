use permits_shared::route::Route;

use super::Screen;
use crate::DataShared;

/// Static pages with no data to load
#[derive(Debug)]
pub struct UiInfo {
    route: Route,
}

impl UiInfo {
    pub fn new(route: Route) -> Self {
        Self { route }
    }
}

impl Screen for UiInfo {
    fn route(&self) -> Route {
        self.route
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        match self.route {
            Route::Privacy => {
                ui.label(
                    "Personal details collected for permits and chalans (names, CNIC numbers, \
                     phone numbers and addresses) are used only to process transport \
                     authority records.",
                );
                ui.label(
                    "Records are stored by the transport authority and are only visible to \
                     staff with the required permissions.",
                );
                ui.label("Contact the authority to request corrections to your records.");
            }
            _ => {
                ui.label(
                    "This application manages vehicle route permits and traffic violation \
                     chalans for the Provincial and Regional Transport Authorities.",
                );
                ui.label(
                    "Officers issue and track chalans, administrators manage fee structures, \
                     users and roles and applicants can follow the status of their permits.",
                );
                ui.weak(format!("Version {}", env!("CARGO_PKG_VERSION")));
            }
        }
        ui.separator();
        if ui.button("Back to Dashboard").clicked() {
            data_shared.navigate(Route::Dashboard);
        }
    }
}
