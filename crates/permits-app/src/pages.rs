use permits_client_core::screen::DataState;
use permits_shared::{list::Page as RowsPage, route::Route};
use tracing::info;

use crate::DataShared;

pub mod admin;
pub mod catalog;
pub mod chalans;
pub mod dashboard;
pub mod info;
pub mod login;
pub mod permits;
pub mod profile;
pub mod register;
pub mod reports;

use admin::{features::UiFeatures, roles::UiRoles, users::UiUsers};
use catalog::{fees::UiFeeManagement, types::UiTypes};
use chalans::{create::UiChalanCreate, detail::UiChalanDetail, list::UiChalanList};
use dashboard::UiDashboard;
use info::UiInfo;
use login::UiLogin;
use permits::{
    details::UiPermitDetails, edit::UiPermitEdit, list::UiPermitList, new::UiNewPermit,
    search::UiPermitSearch,
};
use profile::UiProfile;
use register::UiRegister;
use reports::UiReports;

/// A screen shown in the central panel for one route
pub trait Screen {
    /// The route the screen was created for
    fn route(&self) -> Route;

    /// Displays the screen, called once per frame
    fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared);
}

/// Rows of a list used to fill a combo box or resolve names
///
/// The list is requested the first time it is needed and then kept for the
/// lifetime of the screen. Failures leave the rows empty.
pub fn lookup_rows<'a, T>(
    state: &'a mut DataState<RowsPage<T>>,
    fallback_msg: &str,
    fetch: impl FnOnce() -> DataState<RowsPage<T>>,
) -> &'a [T] {
    if state.is_none() {
        *state = fetch();
    }
    state.poll(fallback_msg);
    state.present().map(|x| x.items.as_slice()).unwrap_or(&[])
}

#[derive(Debug)]
pub enum Page {
    Login(UiLogin),
    Register(UiRegister),
    Dashboard(UiDashboard),
    Profile(UiProfile),
    Permits(UiPermitList),
    NewPermit(UiNewPermit),
    Search(UiPermitSearch),
    Reports(UiReports),
    PermitDetails(UiPermitDetails),
    PermitEdit(UiPermitEdit),
    Chalans(UiChalanList),
    ChalanCreate(UiChalanCreate),
    ChalanDetail(UiChalanDetail),
    FeeManagement(UiFeeManagement),
    Types(UiTypes),
    Users(UiUsers),
    Roles(UiRoles),
    Features(UiFeatures),
    Info(UiInfo),
}

macro_rules! do_on_page {
    ($on:ident, $page:ident, $body:tt) => {
        match $on {
            Page::Login($page) => $body,
            Page::Register($page) => $body,
            Page::Dashboard($page) => $body,
            Page::Profile($page) => $body,
            Page::Permits($page) => $body,
            Page::NewPermit($page) => $body,
            Page::Search($page) => $body,
            Page::Reports($page) => $body,
            Page::PermitDetails($page) => $body,
            Page::PermitEdit($page) => $body,
            Page::Chalans($page) => $body,
            Page::ChalanCreate($page) => $body,
            Page::ChalanDetail($page) => $body,
            Page::FeeManagement($page) => $body,
            Page::Types($page) => $body,
            Page::Users($page) => $body,
            Page::Roles($page) => $body,
            Page::Features($page) => $body,
            Page::Info($page) => $body,
        }
    };
}

impl Page {
    /// Builds the screen for `route` with no data loaded yet
    #[tracing::instrument(skip(data_shared))]
    pub fn new(route: Route, data_shared: &DataShared) -> Self {
        info!("Opening page");
        match route {
            Route::Login => Self::Login(UiLogin::default()),
            Route::Register => Self::Register(UiRegister::default()),
            Route::Dashboard => Self::Dashboard(UiDashboard::default()),
            Route::Profile => Self::Profile(UiProfile::default()),
            Route::Permits => Self::Permits(UiPermitList::new(data_shared.list_query())),
            Route::NewPermit => Self::NewPermit(UiNewPermit::new(chrono::Local::now().date_naive())),
            Route::Search => Self::Search(UiPermitSearch::new(data_shared.list_query())),
            Route::Reports => Self::Reports(UiReports::default()),
            Route::PermitDetails(id) => Self::PermitDetails(UiPermitDetails::new(id)),
            Route::PermitEdit(id) => Self::PermitEdit(UiPermitEdit::new(id)),
            Route::Chalans => Self::Chalans(UiChalanList::new(data_shared.list_query())),
            Route::ChalanCreate => Self::ChalanCreate(UiChalanCreate::default()),
            Route::ChalanDetail(id) => Self::ChalanDetail(UiChalanDetail::new(id)),
            Route::FeeManagement => {
                Self::FeeManagement(UiFeeManagement::new(data_shared.list_query()))
            }
            Route::Types => Self::Types(UiTypes::default()),
            Route::Users => Self::Users(UiUsers::new(data_shared.list_query())),
            Route::Roles => Self::Roles(UiRoles::default()),
            Route::Features => Self::Features(UiFeatures::default()),
            Route::About | Route::Privacy => Self::Info(UiInfo::new(route)),
        }
    }

    pub fn route(&self) -> Route {
        do_on_page!(self, page, { page.route() })
    }

    pub fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        do_on_page!(self, page, { page.show(ui, data_shared) })
    }
}
