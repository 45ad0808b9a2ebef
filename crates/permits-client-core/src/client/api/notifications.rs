use futures::channel::oneshot;
use permits_shared::{
    const_config::path::{
        PATH_NOTIFICATIONS_CLEAR_READ, PATH_NOTIFICATIONS_LIST, PATH_NOTIFICATIONS_MARK_ALL_READ,
        PATH_NOTIFICATIONS_MARK_READ, PATH_NOTIFICATIONS_UNREAD_COUNT,
    },
    id::DbId,
    list::Page,
    notification::{Notification, UnreadCount},
};

use crate::{
    client::{UiCallBack, DUMMY_ARGUMENT},
    Client,
};

impl Client {
    /// Newest first, only those of the logged in user
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_notifications<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<Notification>>> {
        self.send_request_expect_json(PATH_NOTIFICATIONS_LIST.into(), &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn unread_notification_count<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<UnreadCount>> {
        self.send_request_expect_json(
            PATH_NOTIFICATIONS_UNREAD_COUNT.into(),
            &DUMMY_ARGUMENT,
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn mark_notification_read<F: UiCallBack>(
        &self,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(
            PATH_NOTIFICATIONS_MARK_READ.with_id(id),
            &DUMMY_ARGUMENT,
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn mark_all_notifications_read<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(
            PATH_NOTIFICATIONS_MARK_ALL_READ.into(),
            &DUMMY_ARGUMENT,
            ui_notify,
        )
    }

    /// Deletes every notification already read
    #[tracing::instrument(skip(ui_notify))]
    pub fn clear_read_notifications<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(
            PATH_NOTIFICATIONS_CLEAR_READ.into(),
            &DUMMY_ARGUMENT,
            ui_notify,
        )
    }
}
