use futures::channel::oneshot;
use permits_shared::{
    chalan::{Chalan, ChalanDiff, ChalanHistoryEntry, ChalanStatistics, ChalanSummary, NewChalan},
    const_config::path::{
        PATH_CHALANS_CANCEL, PATH_CHALANS_CREATE, PATH_CHALANS_DETAIL, PATH_CHALANS_HISTORY,
        PATH_CHALANS_LIST, PATH_CHALANS_MARK_PAID, PATH_CHALANS_STATISTICS, PATH_CHALANS_UPDATE,
        PATH_CHALANS_UPDATE_FEES,
    },
    id::{Created, DbId},
    list::{ListQuery, Page},
    req_args::api::chalans::{CancelReqArgs, MarkPaidReqArgs, UpdateFeesReqArgs},
};

use crate::{
    client::{UiCallBack, DUMMY_ARGUMENT},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_chalans<F: UiCallBack>(
        &self,
        query: &ListQuery,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<ChalanSummary>>> {
        self.send_request_expect_json(PATH_CHALANS_LIST.into(), query, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_chalan<F: UiCallBack>(
        &self,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Chalan>> {
        self.send_request_expect_json(PATH_CHALANS_DETAIL.with_id(id), &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn create_chalan<F: UiCallBack>(
        &self,
        args: &NewChalan,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Created>> {
        self.send_request_expect_json(PATH_CHALANS_CREATE.into(), args, ui_notify)
    }

    /// Sends only the fields present in `diff`
    #[tracing::instrument(skip(ui_notify))]
    pub fn update_chalan<F: UiCallBack>(
        &self,
        diff: &ChalanDiff,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(PATH_CHALANS_UPDATE.with_id(diff.id), diff, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn mark_chalan_paid<F: UiCallBack>(
        &self,
        id: DbId,
        args: &MarkPaidReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(PATH_CHALANS_MARK_PAID.with_id(id), args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn update_chalan_fees<F: UiCallBack>(
        &self,
        id: DbId,
        args: &UpdateFeesReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(PATH_CHALANS_UPDATE_FEES.with_id(id), args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn cancel_chalan<F: UiCallBack>(
        &self,
        id: DbId,
        args: &CancelReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(PATH_CHALANS_CANCEL.with_id(id), args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn chalan_history<F: UiCallBack>(
        &self,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<ChalanHistoryEntry>>> {
        self.send_request_expect_json(PATH_CHALANS_HISTORY.with_id(id), &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn chalan_statistics<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<ChalanStatistics>> {
        self.send_request_expect_json(PATH_CHALANS_STATISTICS.into(), &DUMMY_ARGUMENT, ui_notify)
    }
}
