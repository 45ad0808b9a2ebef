use futures::channel::oneshot;
use permits_shared::{
    const_config::path::{
        PATH_PERMIT_TYPES_CREATE, PATH_PERMIT_TYPES_DELETE, PATH_PERMIT_TYPES_LIST,
        PATH_PERMIT_TYPES_UPDATE,
    },
    id::{Created, DbId},
    list::Page,
    permit::{PermitType, PermitTypeArgs},
};

use crate::{
    client::{UiCallBack, DUMMY_ARGUMENT},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_permit_types<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<PermitType>>> {
        self.send_request_expect_json(PATH_PERMIT_TYPES_LIST.into(), &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn create_permit_type<F: UiCallBack>(
        &self,
        args: &PermitTypeArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Created>> {
        self.send_request_expect_json(PATH_PERMIT_TYPES_CREATE.into(), args, ui_notify)
    }

    /// Replaces every editable field of the permit type
    #[tracing::instrument(skip(ui_notify))]
    pub fn update_permit_type<F: UiCallBack>(
        &self,
        id: DbId,
        args: &PermitTypeArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(PATH_PERMIT_TYPES_UPDATE.with_id(id), args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn delete_permit_type<F: UiCallBack>(
        &self,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(
            PATH_PERMIT_TYPES_DELETE.with_id(id),
            &DUMMY_ARGUMENT,
            ui_notify,
        )
    }
}
