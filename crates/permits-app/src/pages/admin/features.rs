use egui_extras::{Column, TableBuilder};
use permits_client_core::screen::DataState;
use permits_shared::{
    list::Page,
    route::Route,
    uac::{FeatureRecord, User},
};

use crate::{
    app::wake_fn,
    pages::Screen,
    shortcuts::shortcut_button,
    ui_helpers::{get_text_height, readonly_checkbox_no_text, text_or_na, ui_failed},
    DataShared,
};

/// Feature catalogue with the ones granted to the current user marked
#[derive(Debug, Default)]
pub struct UiFeatures {
    features: DataState<Page<FeatureRecord>>,
}

/// Grants may arrive with or without an id so the name is also compared
pub fn is_granted_to(user: &User, feature: &FeatureRecord) -> bool {
    user.features.iter().any(|grant| {
        grant.id == Some(feature.id) || grant.name.trim().eq_ignore_ascii_case(feature.name.trim())
    })
}

impl Screen for UiFeatures {
    fn route(&self) -> Route {
        Route::Features
    }

    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        if shortcut_button(ui, "Refresh", "", &data_shared.shortcuts.refresh) {
            self.features = DataState::None;
        }
        if self.features.is_none() {
            self.features = DataState::awaiting(
                data_shared
                    .client
                    .list_features(wake_fn(ui.ctx().clone())),
            );
        }
        self.features.poll("Failed to load features");
        let rows = match &self.features {
            DataState::Present(page) => &page.items,
            DataState::Failed(_) => {
                ui_failed(ui, &self.features);
                return;
            }
            _ => {
                ui.spinner();
                return;
            }
        };
        let user = data_shared.user();

        let text_height = get_text_height(ui);
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::remainder())
            .min_scrolled_height(0.0)
            .header(text_height, |mut header| {
                for heading in ["Name", "Display Name", "Granted", "Description"] {
                    header.col(|ui| {
                        ui.strong(heading);
                    });
                }
            })
            .body(|body| {
                body.rows(text_height, rows.len(), |mut row| {
                    let feature = &rows[row.index()];
                    row.col(|ui| {
                        ui.label(&feature.name);
                    });
                    row.col(|ui| {
                        ui.label(text_or_na(Some(feature.display_name.as_str())));
                    });
                    row.col(|ui| {
                        let is_granted = user.as_deref().is_some_and(|x| is_granted_to(x, feature));
                        readonly_checkbox_no_text(ui, is_granted);
                    });
                    row.col(|ui| {
                        ui.label(text_or_na(Some(feature.description.as_str())));
                    });
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use permits_shared::uac::FeatureGrant;
    use rstest::rstest;

    use super::*;

    fn user(grants: Vec<FeatureGrant>) -> User {
        let mut result: User =
            serde_json::from_value(serde_json::json!({"id": 1, "username": "amna"})).unwrap();
        result.features = grants;
        result
    }

    fn grant(id: Option<u64>, name: &str) -> FeatureGrant {
        FeatureGrant {
            id: id.map(Into::into),
            name: name.into(),
            display_name: String::new(),
        }
    }

    #[rstest]
    #[case::by_id(grant(Some(5), "other"), true)]
    #[case::by_name(grant(None, "Can_Manage_Fees"), true)]
    #[case::different(grant(Some(6), "is_employee"), false)]
    fn granted_features(#[case] grant: FeatureGrant, #[case] expected: bool) {
        // Arrange
        let feature = FeatureRecord {
            id: 5.into(),
            name: "can_manage_fees".into(),
            display_name: String::new(),
            description: String::new(),
        };

        // Act
        let actual = is_granted_to(&user(vec![grant]), &feature);

        // Assert
        assert_eq!(actual, expected);
    }
}
