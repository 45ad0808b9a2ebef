//! UI independent state for the screens
//!
//! Every screen moves through idle, loading then success or error each time
//! the user triggers a fetch or mutation. The receivers are polled once per
//! frame by the UI.

use futures::channel::oneshot;
use permits_shared::{
    errors::{user_facing_message, ValidationError},
    id::{Created, DbId},
    list::{ListQuery, Page},
};
use tracing::{error, info};

#[derive(Debug)]
pub struct AwaitingType<T>(pub oneshot::Receiver<anyhow::Result<T>>);

impl<T> From<oneshot::Receiver<anyhow::Result<T>>> for AwaitingType<T> {
    fn from(value: oneshot::Receiver<anyhow::Result<T>>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Default)]
pub enum DataState<T> {
    #[default]
    None,
    AwaitingResponse(AwaitingType<T>),
    Present(T),
    Failed(String),
}

impl<T> DataState<T> {
    pub fn awaiting(rx: oneshot::Receiver<anyhow::Result<T>>) -> Self {
        Self::AwaitingResponse(rx.into())
    }

    /// Checks for a response without blocking
    ///
    /// Errors are converted into the message to show the user with
    /// `fallback_msg` used if the backend did not provide one. Returns `true`
    /// if the state changed.
    pub fn poll(&mut self, fallback_msg: &str) -> bool {
        let DataState::AwaitingResponse(rx) = self else {
            return false;
        };
        let new_state = match rx.0.try_recv() {
            Ok(None) => return false,
            Ok(Some(Ok(data))) => DataState::Present(data),
            Ok(Some(Err(e))) => {
                let msg = user_facing_message(&e, fallback_msg);
                error!(?e, msg, "Error response received instead of the data");
                DataState::Failed(msg)
            }
            Err(e) => {
                error!(?e, "Error receiving on channel");
                DataState::Failed(fallback_msg.to_string())
            }
        };
        *self = new_state;
        true
    }

    /// Returns `true` if the data state is [`Present`].
    ///
    /// [`Present`]: DataState::Present
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(..))
    }

    /// Returns `true` if the data state is [`None`].
    ///
    /// [`None`]: DataState::None
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        matches!(self, Self::AwaitingResponse(..))
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            DataState::Present(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DataState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Rows of a list screen together with the filters used to get them
#[derive(Debug)]
pub struct ListState<T> {
    pub query: ListQuery,
    data: DataState<Page<T>>,
    fallback_msg: &'static str,
}

impl<T> ListState<T> {
    pub fn new(query: ListQuery, fallback_msg: &'static str) -> Self {
        Self {
            query,
            data: DataState::None,
            fallback_msg,
        }
    }

    /// True when nothing has been requested for the current query
    pub fn needs_fetch(&self) -> bool {
        self.data.is_none()
    }

    /// Starts the one fetch for this refresh, previous rows are discarded
    pub fn start_fetch<F>(&mut self, fetch: F)
    where
        F: FnOnce(&ListQuery) -> oneshot::Receiver<anyhow::Result<Page<T>>>,
    {
        self.data = DataState::awaiting(fetch(&self.query));
    }

    /// Schedules a fetch on the next check of [`Self::needs_fetch`]
    pub fn refresh(&mut self) {
        self.data = DataState::None;
    }

    /// Applies a change to the filters and schedules a refresh
    pub fn update_query(&mut self, f: impl FnOnce(&mut ListQuery)) {
        let before = self.query.clone();
        f(&mut self.query);
        if before != self.query {
            self.refresh();
        }
    }

    pub fn poll(&mut self) -> bool {
        self.data.poll(self.fallback_msg)
    }

    /// Rows from the last successful fetch of the current query, empty
    /// otherwise
    pub fn rows(&self) -> &[T] {
        self.data.present().map(|x| x.items.as_slice()).unwrap_or(&[])
    }

    pub fn page(&self) -> Option<&Page<T>> {
        self.data.present()
    }

    pub fn error(&self) -> Option<&str> {
        self.data.error()
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_awaiting()
    }

    pub fn has_next_page(&self) -> bool {
        self.page().is_some_and(|x| self.query.has_next_page(x))
    }
}

/// A single record plus the mutations done to it
///
/// After any mutation succeeds the record is fetched again. The record shown
/// stays the previous one until that fetch completes.
#[derive(Debug)]
pub struct RecordState<T> {
    id: DbId,
    record: Option<T>,
    fetch: DataState<T>,
    is_stale: bool,
    action: DataState<()>,
    /// Set together with `action` by [`Self::start_action`]
    action_fallback_msg: Option<&'static str>,
    load_fallback_msg: &'static str,
}

impl<T> RecordState<T> {
    pub fn new(id: DbId, load_fallback_msg: &'static str) -> Self {
        Self {
            id,
            record: None,
            fetch: DataState::None,
            is_stale: false,
            action: DataState::None,
            action_fallback_msg: None,
            load_fallback_msg,
        }
    }

    pub fn id(&self) -> DbId {
        self.id
    }

    pub fn record(&self) -> Option<&T> {
        self.record.as_ref()
    }

    pub fn needs_fetch(&self) -> bool {
        self.fetch.is_none() && (self.record.is_none() || self.is_stale)
    }

    pub fn start_fetch<F>(&mut self, fetch: F)
    where
        F: FnOnce(DbId) -> oneshot::Receiver<anyhow::Result<T>>,
    {
        self.is_stale = false;
        self.fetch = DataState::awaiting(fetch(self.id));
    }

    /// Clears a failed load so it is attempted again
    pub fn retry(&mut self) {
        if self.fetch.error().is_some() {
            self.fetch = DataState::None;
            self.is_stale = true;
        }
    }

    /// Starts a mutation, any previous outcome is discarded
    pub fn start_action(
        &mut self,
        rx: oneshot::Receiver<anyhow::Result<()>>,
        fallback_msg: &'static str,
    ) {
        self.action_fallback_msg = Some(fallback_msg);
        self.action = DataState::awaiting(rx);
    }

    /// Records a problem found before anything was sent
    pub fn reject_action(&mut self, err: ValidationError) {
        self.action = DataState::Failed(err.to_string());
    }

    pub fn poll(&mut self) -> bool {
        let mut changed = self.fetch.poll(self.load_fallback_msg);
        if matches!(self.fetch, DataState::Present(_)) {
            if let DataState::Present(record) = std::mem::take(&mut self.fetch) {
                self.record = Some(record);
            }
        }
        let action_changed = match self.action_fallback_msg {
            Some(fallback_msg) => self.action.poll(fallback_msg),
            None => false,
        };
        if action_changed {
            changed = true;
            if self.action.is_present() {
                info!(id = ?self.id, "mutation succeeded, fetching record again");
                self.is_stale = true;
            }
        }
        changed
    }

    pub fn load_error(&self) -> Option<&str> {
        self.fetch.error()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action.error()
    }

    pub fn is_busy(&self) -> bool {
        self.fetch.is_awaiting() || self.action.is_awaiting()
    }

    /// The last mutation succeeded and the record reflects it
    pub fn is_action_complete(&self) -> bool {
        self.action.is_present() && !self.is_stale && !self.fetch.is_awaiting()
    }

    pub fn clear_action(&mut self) {
        self.action = DataState::None;
        self.action_fallback_msg = None;
    }
}

/// Submission of a form that creates a record
#[derive(Debug)]
pub struct SubmitState {
    state: DataState<Created>,
    fallback_msg: &'static str,
}

impl SubmitState {
    pub fn new(fallback_msg: &'static str) -> Self {
        Self {
            state: DataState::None,
            fallback_msg,
        }
    }

    pub fn start(&mut self, rx: oneshot::Receiver<anyhow::Result<Created>>) {
        self.state = DataState::awaiting(rx);
    }

    pub fn reject(&mut self, err: ValidationError) {
        self.state = DataState::Failed(err.to_string());
    }

    pub fn poll(&mut self) -> bool {
        self.state.poll(self.fallback_msg)
    }

    /// Identifier assigned by the backend once creation succeeded
    pub fn created_id(&self) -> Option<DbId> {
        self.state.present().map(|x| x.id)
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.is_awaiting()
    }

    pub fn reset(&mut self) {
        self.state = DataState::None;
    }
}
