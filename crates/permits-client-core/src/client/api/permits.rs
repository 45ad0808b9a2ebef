use futures::channel::oneshot;
use permits_shared::{
    const_config::path::{
        PATH_PERMITS_CREATE, PATH_PERMITS_DETAIL, PATH_PERMITS_HISTORY, PATH_PERMITS_LIST,
        PATH_PERMITS_UPDATE,
    },
    id::{Created, DbId},
    list::{ListQuery, Page},
    permit::{NewPermit, Permit, PermitDiff, PermitHistoryEntry},
};

use crate::{
    client::{UiCallBack, DUMMY_ARGUMENT},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_permits<F: UiCallBack>(
        &self,
        query: &ListQuery,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<Permit>>> {
        self.send_request_expect_json(PATH_PERMITS_LIST.into(), query, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_permit<F: UiCallBack>(
        &self,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Permit>> {
        self.send_request_expect_json(PATH_PERMITS_DETAIL.with_id(id), &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn create_permit<F: UiCallBack>(
        &self,
        args: &NewPermit,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Created>> {
        self.send_request_expect_json(PATH_PERMITS_CREATE.into(), args, ui_notify)
    }

    /// Sends only the fields present in `diff`
    #[tracing::instrument(skip(ui_notify))]
    pub fn update_permit<F: UiCallBack>(
        &self,
        diff: &PermitDiff,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(PATH_PERMITS_UPDATE.with_id(diff.id), diff, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn permit_history<F: UiCallBack>(
        &self,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<PermitHistoryEntry>>> {
        self.send_request_expect_json(PATH_PERMITS_HISTORY.with_id(id), &DUMMY_ARGUMENT, ui_notify)
    }
}
