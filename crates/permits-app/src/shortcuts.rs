use egui::{Key, KeyboardShortcut, Modifiers};

/// Returns true if the button is clicked or the shortcut is pressed
///
/// Note: The shortcut only works while the button is showing
pub fn shortcut_button(
    ui: &mut egui::Ui,
    caption: impl Into<egui::WidgetText>,
    hint_msg: &str,
    shortcut: &KeyboardShortcut,
) -> bool {
    ui.button(caption)
        .on_hover_text(shortcut_hint_text(ui, hint_msg, shortcut))
        .clicked()
        || ui.input_mut(|i| i.consume_shortcut(shortcut))
}

/// Same as [`shortcut_button`] but the button can be disabled
pub fn shortcut_button_enabled(
    ui: &mut egui::Ui,
    is_enabled: bool,
    caption: impl Into<egui::WidgetText>,
    hint_msg: &str,
    shortcut: &KeyboardShortcut,
) -> bool {
    let clicked = ui
        .add_enabled(is_enabled, egui::Button::new(caption))
        .on_hover_text(shortcut_hint_text(ui, hint_msg, shortcut))
        .clicked();
    is_enabled && (clicked || ui.input_mut(|i| i.consume_shortcut(shortcut)))
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Shortcuts {
    pub refresh: KeyboardShortcut,
    pub next_page: KeyboardShortcut,
    pub previous_page: KeyboardShortcut,
    pub go_dashboard: KeyboardShortcut,
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            refresh: KeyboardShortcut::new(Modifiers::NONE, Key::F5),
            next_page: KeyboardShortcut::new(Modifiers::ALT, Key::ArrowRight),
            previous_page: KeyboardShortcut::new(Modifiers::ALT, Key::ArrowLeft),
            go_dashboard: KeyboardShortcut::new(Modifiers::CTRL | Modifiers::SHIFT, Key::D),
        }
    }
}

fn shortcut_hint_text(ui: &mut egui::Ui, hint_msg: &str, shortcut: &KeyboardShortcut) -> String {
    let space = if hint_msg.is_empty() { "" } else { " " };
    format!("{hint_msg}{space}({})", ui.ctx().format_shortcut(shortcut))
}
