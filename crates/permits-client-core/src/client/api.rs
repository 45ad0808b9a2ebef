use std::sync::Arc;

use futures::channel::oneshot;
use permits_shared::{
    const_config::path::{
        PATH_AUTH_CHANGE_PASSWORD, PATH_AUTH_LOGOUT, PATH_AUTH_UPDATE_PROFILE, PATH_AUTH_USER,
    },
    req_args::api::{ChangePasswordReqArgs, UpdateProfileReqArgs},
    uac::{CurrentUserResponse, User},
};
use secrecy::{ExposeSecret as _, SecretString};

use crate::{
    client::{process_empty, process_json_body, EmptyBody, UiCallBack, DUMMY_ARGUMENT},
    Client,
};

pub mod admin;
pub mod chalans;
pub mod fee_structures;
pub mod notifications;
pub mod permit_types;
pub mod permits;
pub mod reports;
pub mod vehicle_types;

impl Client {
    #[tracing::instrument(skip(args, ui_notify))]
    pub fn change_password<F>(
        &self,
        args: &ChangePasswordReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>>
    where
        F: UiCallBack,
    {
        let args = serde_json::json!({
            "old_password": args.old_password.expose_secret(),
            "new_password": args.new_password.expose_secret(),
            "confirm_password": args.confirm_password.expose_secret()
        });
        self.send_request_expect_empty(PATH_AUTH_CHANGE_PASSWORD.into(), &args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn update_profile<F>(
        &self,
        args: &UpdateProfileReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>>
    where
        F: UiCallBack,
    {
        self.send_request_expect_empty(PATH_AUTH_UPDATE_PROFILE.into(), args, ui_notify)
    }

    /// Resumes a session from a token saved by an earlier run
    ///
    /// The token is dropped if the backend does not accept it
    #[tracing::instrument(skip(token, ui_notify))]
    pub fn restore_session<F: UiCallBack>(
        &self,
        token: SecretString,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Arc<User>>> {
        self.start_session(token, None);
        self.fetch_current_user(true, ui_notify)
    }

    /// Reloads the user of the current session (for example after the profile
    /// was changed)
    #[tracing::instrument(skip(ui_notify))]
    pub fn refresh_user<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Arc<User>>> {
        self.fetch_current_user(false, ui_notify)
    }

    fn fetch_current_user<F: UiCallBack>(
        &self,
        should_clear_on_failure: bool,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Arc<User>>> {
        let (tx, rx) = oneshot::channel();
        let origin = self.request_origin();
        let token = origin.token.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_json_body::<CurrentUserResponse>(resp, origin.clone())
                .await
                .map(|body| origin.set_session_user(body.user));
            if should_clear_on_failure && msg.is_err() {
                origin.end_session();
            }
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_request(PATH_AUTH_USER.into(), &DUMMY_ARGUMENT, token, on_done);
        rx
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn logout<F: UiCallBack>(&self, ui_notify: F) -> oneshot::Receiver<anyhow::Result<()>> {
        let (tx, rx) = oneshot::channel();
        let origin = self.request_origin();
        let token = origin.token.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_empty(resp, origin).await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        // The request holds its own copy of the token so the session can go now
        self.initiate_request(PATH_AUTH_LOGOUT.into(), &EmptyBody {}, token, on_done);
        self.clear_session(); // Clear session even if logout fails
        rx
    }

    #[tracing::instrument]
    pub fn logout_no_wait(&self) {
        self.send_request_no_wait(PATH_AUTH_LOGOUT.into(), &EmptyBody {});
        self.clear_session(); // Clear session even if logout fails
    }
}
