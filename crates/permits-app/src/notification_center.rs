//! Unread badge and dropdown list of the user's notifications

use permits_client_core::{screen::DataState, Client};
use permits_shared::{
    const_config::client::CLIENT_NOTIFICATION_POLL_SECS,
    id::DbId,
    list::Page,
    notification::{Notification, UnreadCount},
    route::Route,
};
use tracing::{info, warn};

use crate::{app::wake_fn, ui_helpers::ui_failed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BulkAction {
    MarkAllRead,
    ClearRead,
}

#[derive(Debug, Default)]
pub struct NotificationCenter {
    unread: DataState<UnreadCount>,
    /// Last count received, kept while the next one is requested
    unread_count: u64,
    /// Value of `egui::InputState::time` when the count is next requested
    next_poll_at: f64,
    list: DataState<Page<Notification>>,
    change: DataState<()>,
}

impl NotificationCenter {
    fn is_poll_due(&self, now: f64) -> bool {
        self.unread.is_none() && now >= self.next_poll_at
    }

    /// Requests the unread count every poll interval and records the answer
    fn poll_unread(&mut self, now: f64, client: &Client, ctx: &egui::Context) {
        if self.is_poll_due(now) {
            self.unread =
                DataState::awaiting(client.unread_notification_count(wake_fn(ctx.clone())));
            self.next_poll_at = now + CLIENT_NOTIFICATION_POLL_SECS;
        }
        if !self.unread.poll("Failed to load unread notification count") {
            return;
        }
        match &self.unread {
            DataState::Present(count) => self.unread_count = count.unread_count,
            DataState::Failed(e) => warn!(?e, "Unread notification count not updated"),
            DataState::None | DataState::AwaitingResponse(_) => {}
        }
        self.unread = DataState::None;
    }

    /// Forces both the count and the list to be fetched again
    fn refresh(&mut self) {
        self.unread = DataState::None;
        self.next_poll_at = 0.0;
        self.list = DataState::None;
    }

    fn poll_change(&mut self) {
        if self.change.poll("Failed to update notifications") && self.change.is_present() {
            info!("Notifications changed, reloading");
            self.change = DataState::None;
            self.refresh();
        }
    }

    fn mark_read(&mut self, id: DbId, client: &Client, ctx: &egui::Context) {
        self.change =
            DataState::awaiting(client.mark_notification_read(id, wake_fn(ctx.clone())));
    }

    fn start_bulk(&mut self, action: BulkAction, client: &Client, ctx: &egui::Context) {
        let notify = wake_fn(ctx.clone());
        self.change = DataState::awaiting(match action {
            BulkAction::MarkAllRead => client.mark_all_notifications_read(notify),
            BulkAction::ClearRead => client.clear_read_notifications(notify),
        });
    }

    /// Shows the badge button and, while open, the list. Returns the route of
    /// a notification the user chose to follow.
    pub fn ui(&mut self, ui: &mut egui::Ui, client: &Client) -> Option<Route> {
        let ctx = ui.ctx().clone();
        let now = ui.input(|i| i.time);
        self.poll_unread(now, client, &ctx);
        self.poll_change();

        let caption = match self.unread_count {
            0 => egui::RichText::new("Notifications"),
            n => egui::RichText::new(format!("Notifications ({n})"))
                .color(ui.visuals().error_fg_color),
        };
        let mut follow = None;
        let response = ui.menu_button(caption, |ui| {
            ui.set_min_width(320.0);
            if self.list.is_none() {
                self.list = DataState::awaiting(client.list_notifications(wake_fn(ctx.clone())));
            }
            self.list.poll("Failed to load notifications");
            follow = self.ui_list(ui, client, &ctx);
        });
        if response.inner.is_none() && !self.list.is_awaiting() {
            // Closed, fetch again when next opened
            self.list = DataState::None;
        }
        follow
    }

    fn ui_list(
        &mut self,
        ui: &mut egui::Ui,
        client: &Client,
        ctx: &egui::Context,
    ) -> Option<Route> {
        let mut clicked: Option<&Notification> = None;
        let mut bulk = None;
        match &self.list {
            DataState::None | DataState::AwaitingResponse(_) => {
                ui.spinner();
            }
            DataState::Failed(_) => ui_failed(ui, &self.list),
            DataState::Present(page) if page.items.is_empty() => {
                ui.weak("No notifications");
            }
            DataState::Present(page) => {
                egui::ScrollArea::vertical().max_height(400.0).show(ui, |ui| {
                    for notification in &page.items {
                        if ui_notification(ui, notification).clicked() {
                            clicked = Some(notification);
                        }
                        ui.separator();
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Mark All Read").clicked() {
                        bulk = Some(BulkAction::MarkAllRead);
                    }
                    if ui.button("Clear Read").clicked() {
                        bulk = Some(BulkAction::ClearRead);
                    }
                });
            }
        }
        ui_failed(ui, &self.change);

        let follow = clicked.map(|notification| {
            let target = notification.action_url.as_deref().and_then(Route::parse);
            (notification.id, !notification.is_read, target)
        });
        if let Some(action) = bulk {
            self.start_bulk(action, client, ctx);
        }
        let (id, is_unread, target) = follow?;
        if is_unread {
            self.mark_read(id, client, ctx);
        }
        if target.is_some() {
            ui.close_menu();
        }
        target
    }
}

/// One entry of the list, unread ones in bold
fn ui_notification(ui: &mut egui::Ui, notification: &Notification) -> egui::Response {
    let mut title = egui::RichText::new(&notification.title);
    if !notification.is_read {
        title = title.strong();
    }
    ui.vertical(|ui| {
        let response = ui.add(egui::Label::new(title).sense(egui::Sense::click()));
        ui.label(&notification.message);
        ui.horizontal(|ui| {
            ui.weak(notification.type_label());
            ui.weak(notification.created_at.format("%Y-%m-%d").to_string());
        });
        response
    })
    .inner
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::first_frame(0.0, 0.0, true)]
    #[case::waiting(10.0, 30.0, false)]
    #[case::interval_passed(31.0, 30.0, true)]
    fn poll_schedule(#[case] now: f64, #[case] next_poll_at: f64, #[case] expected: bool) {
        // Arrange
        let center = NotificationCenter {
            next_poll_at,
            ..Default::default()
        };

        // Act
        let actual = center.is_poll_due(now);

        // Assert
        assert_eq!(actual, expected);
    }

    #[test]
    fn change_makes_count_due_at_once() {
        // Arrange
        let (tx, rx) = futures::channel::oneshot::channel();
        let mut center = NotificationCenter {
            next_poll_at: 90.0,
            unread_count: 2,
            change: DataState::awaiting(rx),
            ..Default::default()
        };
        tx.send(Ok(())).unwrap();

        // Act
        center.poll_change();

        // Assert
        assert!(center.is_poll_due(1.0));
        assert!(center.change.is_none());
        assert_eq!(center.unread_count, 2);
    }

    #[test]
    fn failed_change_keeps_schedule() {
        // Arrange
        let (tx, rx) = futures::channel::oneshot::channel::<anyhow::Result<()>>();
        let mut center = NotificationCenter {
            next_poll_at: 90.0,
            change: DataState::awaiting(rx),
            ..Default::default()
        };
        drop(tx);

        // Act
        center.poll_change();

        // Assert
        assert!(!center.is_poll_due(1.0));
        assert_eq!(center.change.error(), Some("Failed to update notifications"));
    }
}
