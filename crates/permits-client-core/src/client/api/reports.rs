use futures::channel::oneshot;
use permits_shared::{
    const_config::path::{
        PATH_REPORT_AUTHORITY_SUMMARY, PATH_REPORT_BY_PERMIT_TYPE, PATH_REPORT_BY_VEHICLE_TYPE,
        PATH_REPORT_DETAILED_STATS, PATH_REPORT_EXPIRING_PERMITS,
    },
    report::{
        AuthorityReportRow, DetailedStats, ExpiringPermitsReport, ExpiringQuery, GroupedReport,
        PermitTypeReportRow, VehicleTypeReportRow,
    },
};

use crate::{
    client::{UiCallBack, DUMMY_ARGUMENT},
    Client,
};

impl Client {
    /// Totals over every permit, computed by the backend
    #[tracing::instrument(skip(ui_notify))]
    pub fn report_detailed_stats<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<DetailedStats>> {
        self.send_request_expect_json(
            PATH_REPORT_DETAILED_STATS.into(),
            &DUMMY_ARGUMENT,
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn report_permits_by_type<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<GroupedReport<PermitTypeReportRow>>> {
        self.send_request_expect_json(
            PATH_REPORT_BY_PERMIT_TYPE.into(),
            &DUMMY_ARGUMENT,
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn report_permits_by_vehicle<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<GroupedReport<VehicleTypeReportRow>>> {
        self.send_request_expect_json(
            PATH_REPORT_BY_VEHICLE_TYPE.into(),
            &DUMMY_ARGUMENT,
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn report_authority_summary<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<GroupedReport<AuthorityReportRow>>> {
        self.send_request_expect_json(
            PATH_REPORT_AUTHORITY_SUMMARY.into(),
            &DUMMY_ARGUMENT,
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn report_expiring_permits<F: UiCallBack>(
        &self,
        query: ExpiringQuery,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<ExpiringPermitsReport>> {
        self.send_request_expect_json(PATH_REPORT_EXPIRING_PERMITS.into(), &query, ui_notify)
    }
}
