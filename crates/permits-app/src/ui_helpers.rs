use chrono::{DateTime, Local, NaiveDate, Utc};
use permits_client_core::screen::{DataState, ListState};
use permits_shared::{
    const_config::{client::CLIENT_PAGE_SIZE_CHOICES, display::DISPLAY_NOT_AVAILABLE},
    id::DbId,
    list::Lookup,
};
use secrecy::{ExposeSecret as _, SecretString};

use crate::shortcuts::{shortcut_button_enabled, Shortcuts};

pub fn get_text_height(ui: &mut egui::Ui) -> f32 {
    egui::TextStyle::Body
        .resolve(ui.style())
        .size
        .max(ui.spacing().interact_size.y)
}

pub fn ui_password_edit(
    ui: &mut egui::Ui,
    password: &mut SecretString,
    hint_text: &str,
) -> egui::Response {
    let mut temp = password.expose_secret().to_owned();
    let result = ui.add(
        egui::TextEdit::singleline(&mut temp)
            .password(true)
            .hint_text(hint_text),
    );
    *password = SecretString::from(temp);
    result
}

pub fn readonly_checkbox_no_text(ui: &mut egui::Ui, mut value: bool) {
    ui.add_enabled(false, egui::Checkbox::without_text(&mut value));
}

/// Convenience function to create escape buttons
pub fn ui_escape_button(ui: &mut egui::Ui, caption: impl Into<egui::WidgetText>) -> bool {
    crate::shortcuts::shortcut_button(
        ui,
        caption,
        "",
        &egui::KeyboardShortcut::new(egui::Modifiers::NONE, egui::Key::Escape),
    )
}

pub fn ui_error(ui: &mut egui::Ui, msg: impl Into<egui::RichText>) {
    ui.colored_label(ui.visuals().error_fg_color, msg);
}

/// Shows the message of a request that did not succeed
pub fn ui_failed<T>(ui: &mut egui::Ui, state: &DataState<T>) {
    if let Some(e) = state.error() {
        ui_error(ui, e);
    }
}

/// Single line edit that reports if enter was pressed in it
pub fn ui_search_edit(ui: &mut egui::Ui, text: &mut String, hint_text: &str) -> bool {
    let response = ui.add(egui::TextEdit::singleline(text).hint_text(hint_text));
    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

/// Shows the spinner, error or empty message for a list
pub fn ui_list_feedback<T>(ui: &mut egui::Ui, list: &ListState<T>, empty_msg: &str) {
    if list.is_loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading...");
        });
    } else if let Some(e) = list.error() {
        ui_error(ui, e);
    } else if list.page().is_some() && list.rows().is_empty() {
        ui.label(empty_msg);
    }
}

/// Page navigation and page size controls below a table
pub fn ui_pagination<T>(ui: &mut egui::Ui, list: &mut ListState<T>, shortcuts: &Shortcuts) {
    ui.horizontal(|ui| {
        let is_idle = !list.is_loading();
        if shortcut_button_enabled(
            ui,
            is_idle && !list.query.is_first_page(),
            "< Previous",
            "Previous page",
            &shortcuts.previous_page,
        ) {
            list.update_query(|q| q.previous_page());
        }
        ui.label(format!("Page {}", list.query.page_number()));
        if shortcut_button_enabled(
            ui,
            is_idle && list.has_next_page(),
            "Next >",
            "Next page",
            &shortcuts.next_page,
        ) {
            list.update_query(|q| q.next_page());
        }
        if let Some(total) = list.page().and_then(|x| x.total) {
            ui.weak(format!("{total} total"));
        }
        ui.separator();
        let mut limit = list.query.limit;
        egui::ComboBox::from_id_salt("page size")
            .selected_text(format!("{limit} per page"))
            .show_ui(ui, |ui| {
                for choice in CLIENT_PAGE_SIZE_CHOICES {
                    ui.selectable_value(&mut limit, choice, choice.to_string());
                }
            });
        if limit != list.query.limit {
            list.update_query(|q| q.set_limit(limit));
        }
    });
}

/// Combo box over an optional filter value where `None` means no filter
///
/// Returns the new value if the user changed it
pub fn ui_filter_combo<'a>(
    ui: &mut egui::Ui,
    id_salt: &str,
    current: Option<&str>,
    options: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Option<Option<String>> {
    let options: Vec<(&str, &str)> = options.into_iter().collect();
    let selected_text = current
        .and_then(|value| options.iter().find(|(x, _)| *x == value))
        .map(|(_, label)| *label)
        .unwrap_or("All");
    let mut result = None;
    egui::ComboBox::from_id_salt(id_salt)
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            if ui.selectable_label(current.is_none(), "All").clicked() && current.is_some() {
                result = Some(None);
            }
            for (value, label) in options.iter() {
                let is_selected = current == Some(*value);
                if ui.selectable_label(is_selected, *label).clicked() && !is_selected {
                    result = Some(Some(value.to_string()));
                }
            }
        });
    result
}

/// Combo box to pick one record from a locally fetched list
pub fn ui_lookup_combo<T: Lookup>(
    ui: &mut egui::Ui,
    id_salt: &str,
    items: &[T],
    selected: &mut Option<DbId>,
) -> egui::Response {
    let selected_text = permits_shared::list::lookup_name(items, *selected);
    let selected_text = if selected.is_none() {
        "Select..."
    } else {
        selected_text
    };
    egui::ComboBox::from_id_salt(id_salt)
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            for item in items {
                ui.selectable_value(selected, Some(item.lookup_id()), item.lookup_label());
            }
        })
        .response
}

/// Label and value on one row of a two column grid
pub fn ui_grid_row(ui: &mut egui::Ui, label: &str, value: impl Into<egui::WidgetText>) {
    ui.label(label);
    ui.label(value);
    ui.end_row();
}

/// Label and single line edit on one row of a two column grid
pub fn ui_grid_edit(ui: &mut egui::Ui, label: &str, value: &mut String) -> egui::Response {
    ui.label(label);
    let result = ui.text_edit_singleline(value);
    ui.end_row();
    result
}

/// Label and multi line edit on one row of a two column grid
pub fn ui_grid_edit_multiline(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::multiline(value).desired_rows(3));
    ui.end_row();
}

pub fn text_or_na(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .unwrap_or(DISPLAY_NOT_AVAILABLE)
}

pub fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|x| {
            x.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| DISPLAY_NOT_AVAILABLE.to_string())
}

pub fn format_date(value: Option<NaiveDate>) -> String {
    value
        .map(|x| x.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| DISPLAY_NOT_AVAILABLE.to_string())
}
