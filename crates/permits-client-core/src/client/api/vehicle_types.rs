use futures::channel::oneshot;
use permits_shared::{
    const_config::path::{
        PATH_VEHICLE_TYPES_CREATE, PATH_VEHICLE_TYPES_DELETE, PATH_VEHICLE_TYPES_DETAIL,
        PATH_VEHICLE_TYPES_LIST, PATH_VEHICLE_TYPES_UPDATE,
    },
    id::{Created, DbId},
    list::Page,
    vehicle_type::{VehicleType, VehicleTypeArgs},
};

use crate::{
    client::{UiCallBack, DUMMY_ARGUMENT},
    Client,
};

impl Client {
    /// All vehicle types, used both for display and to resolve names
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_vehicle_types<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<VehicleType>>> {
        self.send_request_expect_json(PATH_VEHICLE_TYPES_LIST.into(), &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_vehicle_type<F: UiCallBack>(
        &self,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<VehicleType>> {
        self.send_request_expect_json(
            PATH_VEHICLE_TYPES_DETAIL.with_id(id),
            &DUMMY_ARGUMENT,
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn create_vehicle_type<F: UiCallBack>(
        &self,
        args: &VehicleTypeArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Created>> {
        self.send_request_expect_json(PATH_VEHICLE_TYPES_CREATE.into(), args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn update_vehicle_type<F: UiCallBack>(
        &self,
        id: DbId,
        args: &VehicleTypeArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(PATH_VEHICLE_TYPES_UPDATE.with_id(id), args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn delete_vehicle_type<F: UiCallBack>(
        &self,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(
            PATH_VEHICLE_TYPES_DELETE.with_id(id),
            &DUMMY_ARGUMENT,
            ui_notify,
        )
    }
}
