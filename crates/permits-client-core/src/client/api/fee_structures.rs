use futures::channel::oneshot;
use permits_shared::{
    const_config::path::{
        PATH_FEES_ACTIVE_ONLY, PATH_FEES_BY_VEHICLE, PATH_FEES_CREATE, PATH_FEES_DELETE,
        PATH_FEES_DETAIL, PATH_FEES_LIST, PATH_FEES_UPDATE,
    },
    fee_structure::{ByVehicleQuery, FeeStructure, FeeStructureArgs},
    id::{Created, DbId},
    list::{ListQuery, Page},
};

use crate::{
    client::{UiCallBack, DUMMY_ARGUMENT},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_fee_structures<F: UiCallBack>(
        &self,
        query: &ListQuery,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<FeeStructure>>> {
        self.send_request_expect_json(PATH_FEES_LIST.into(), query, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_fee_structure<F: UiCallBack>(
        &self,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<FeeStructure>> {
        self.send_request_expect_json(PATH_FEES_DETAIL.with_id(id), &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn create_fee_structure<F: UiCallBack>(
        &self,
        args: &FeeStructureArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Created>> {
        self.send_request_expect_json(PATH_FEES_CREATE.into(), args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn update_fee_structure<F: UiCallBack>(
        &self,
        id: DbId,
        args: &FeeStructureArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(PATH_FEES_UPDATE.with_id(id), args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn delete_fee_structure<F: UiCallBack>(
        &self,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(PATH_FEES_DELETE.with_id(id), &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn fee_structures_for_vehicle<F: UiCallBack>(
        &self,
        vehicle_type_id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<FeeStructure>>> {
        let args = ByVehicleQuery { vehicle_type_id };
        self.send_request_expect_json(PATH_FEES_BY_VEHICLE.into(), &args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn active_fee_structures<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<FeeStructure>>> {
        self.send_request_expect_json(PATH_FEES_ACTIVE_ONLY.into(), &DUMMY_ARGUMENT, ui_notify)
    }
}
