use futures::channel::oneshot;
use permits_shared::{
    const_config::path::{
        PATH_USERS_ACTIVATE, PATH_USERS_ASSIGN_ROLE, PATH_USERS_CREATE, PATH_USERS_DEACTIVATE,
        PATH_USERS_LIST,
    },
    id::DbId,
    list::{ListQuery, Page},
    req_args::api::admin::user::{AssignRoleReqArgs, NewUserReqArgs},
    uac::User,
};
use secrecy::ExposeSecret as _;

use crate::{
    client::{EmptyBody, UiCallBack},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_users<F: UiCallBack>(
        &self,
        query: &ListQuery,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Page<User>>> {
        self.send_request_expect_json(PATH_USERS_LIST.into(), query, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn create_user<F: UiCallBack>(
        &self,
        user: &NewUserReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        let args = serde_json::json!({
            "username": user.username.trim(),
            "email": user.email.trim(),
            "password": user.password.expose_secret(),
            "first_name": user.first_name.trim(),
            "last_name": user.last_name.trim(),
            "role_id": user.role_id,
        });
        self.send_request_expect_empty(PATH_USERS_CREATE.into(), &args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn assign_role<F: UiCallBack>(
        &self,
        user_id: DbId,
        args: &AssignRoleReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(PATH_USERS_ASSIGN_ROLE.with_id(user_id), args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn activate_user<F: UiCallBack>(
        &self,
        user_id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(PATH_USERS_ACTIVATE.with_id(user_id), &EmptyBody {}, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn deactivate_user<F: UiCallBack>(
        &self,
        user_id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(
            PATH_USERS_DEACTIVATE.with_id(user_id),
            &EmptyBody {},
            ui_notify,
        )
    }
}
