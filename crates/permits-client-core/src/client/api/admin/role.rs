use futures::channel::oneshot;
use permits_shared::{
    const_config::path::{
        PATH_FEATURES_LIST, PATH_ROLES_ADD_FEATURE, PATH_ROLES_CREATE, PATH_ROLES_DETAIL,
        PATH_ROLES_LIST, PATH_ROLES_REMOVE_FEATURE,
    },
    id::{Created, DbId},
    list::Page,
    req_args::api::admin::role::FeatureReqArgs,
    uac::{FeatureRecord, Role, RoleDraft},
};

use crate::{
    client::{UiCallBack, DUMMY_ARGUMENT},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_roles<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<Role>>> {
        self.send_request_expect_json(PATH_ROLES_LIST.into(), &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn create_role<F: UiCallBack>(
        &self,
        args: &RoleDraft,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Created>> {
        self.send_request_expect_json(PATH_ROLES_CREATE.into(), args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_role<F: UiCallBack>(
        &self,
        role_id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Role>> {
        self.send_request_expect_json(PATH_ROLES_DETAIL.with_id(role_id), &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn add_role_feature<F: UiCallBack>(
        &self,
        role_id: DbId,
        args: &FeatureReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(PATH_ROLES_ADD_FEATURE.with_id(role_id), args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn remove_role_feature<F: UiCallBack>(
        &self,
        role_id: DbId,
        args: &FeatureReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(
            PATH_ROLES_REMOVE_FEATURE.with_id(role_id),
            args,
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn list_features<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<FeatureRecord>>> {
        self.send_request_expect_json(PATH_FEATURES_LIST.into(), &DUMMY_ARGUMENT, ui_notify)
    }
}
