//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub mod client {
    /// Used when no configuration overrides it
    pub const CLIENT_DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
    /// Development key accepted by a locally running backend
    pub const CLIENT_DEFAULT_API_KEY: &str = "sk-dev-12345678901234567890";
    pub const CLIENT_DEFAULT_PAGE_SIZE: u32 = 20;
    pub const CLIENT_PAGE_SIZE_CHOICES: [u32; 4] = [10, 20, 50, 100];
    pub const CLIENT_API_KEY_HEADER: &str = "X-API-Key";
    /// Prefix used in the `Authorization` header before the session token
    pub const CLIENT_AUTH_SCHEME: &str = "Token";
    pub const CLIENT_NOTIFICATION_POLL_SECS: f64 = 30.0;
}

pub mod validation {
    pub const MIN_PASSWORD_LENGTH: usize = 8;
}

pub mod display {
    /// Shown when a related record cannot be found in a locally fetched list
    pub const DISPLAY_NOT_AVAILABLE: &str = "N/A";
}

pub mod path {
    mod path_spec;
    pub use path_spec::{PathSpec, ResolvedPath};

    // Auth
    pub const PATH_AUTH_LOGIN: PathSpec = PathSpec::post("/auth/login/");
    pub const PATH_AUTH_REGISTER: PathSpec = PathSpec::post("/auth/register/");
    pub const PATH_AUTH_LOGOUT: PathSpec = PathSpec::post("/auth/logout/");
    pub const PATH_AUTH_USER: PathSpec = PathSpec::get("/auth/user/");
    pub const PATH_AUTH_CHANGE_PASSWORD: PathSpec = PathSpec::post("/auth/change-password/");
    pub const PATH_AUTH_UPDATE_PROFILE: PathSpec = PathSpec::put("/auth/update-profile/");
    pub const PATH_HEALTH_CHECK: PathSpec = PathSpec::get("/health/");

    // Chalans
    pub const PATH_CHALANS_LIST: PathSpec = PathSpec::get("/chalans/");
    pub const PATH_CHALANS_CREATE: PathSpec = PathSpec::post("/chalans/");
    pub const PATH_CHALANS_DETAIL: PathSpec = PathSpec::get("/chalans/{id}/");
    pub const PATH_CHALANS_UPDATE: PathSpec = PathSpec::patch("/chalans/{id}/");
    pub const PATH_CHALANS_MARK_PAID: PathSpec = PathSpec::post("/chalans/{id}/mark_as_paid/");
    pub const PATH_CHALANS_UPDATE_FEES: PathSpec = PathSpec::patch("/chalans/{id}/update_fees/");
    pub const PATH_CHALANS_CANCEL: PathSpec = PathSpec::post("/chalans/{id}/cancel/");
    pub const PATH_CHALANS_HISTORY: PathSpec = PathSpec::get("/chalans/{id}/history/");
    pub const PATH_CHALANS_STATISTICS: PathSpec = PathSpec::get("/chalans/statistics/");

    // Vehicle fee structures
    pub const PATH_FEES_LIST: PathSpec = PathSpec::get("/vehicle-fee-structures/");
    pub const PATH_FEES_CREATE: PathSpec = PathSpec::post("/vehicle-fee-structures/");
    pub const PATH_FEES_DETAIL: PathSpec = PathSpec::get("/vehicle-fee-structures/{id}/");
    pub const PATH_FEES_UPDATE: PathSpec = PathSpec::patch("/vehicle-fee-structures/{id}/");
    pub const PATH_FEES_DELETE: PathSpec = PathSpec::delete("/vehicle-fee-structures/{id}/");
    pub const PATH_FEES_BY_VEHICLE: PathSpec =
        PathSpec::get("/vehicle-fee-structures/by_vehicle/");
    pub const PATH_FEES_ACTIVE_ONLY: PathSpec =
        PathSpec::get("/vehicle-fee-structures/active_only/");

    // Vehicle types
    pub const PATH_VEHICLE_TYPES_LIST: PathSpec = PathSpec::get("/vehicle-types/");
    pub const PATH_VEHICLE_TYPES_CREATE: PathSpec = PathSpec::post("/vehicle-types/");
    pub const PATH_VEHICLE_TYPES_DETAIL: PathSpec = PathSpec::get("/vehicle-types/{id}/");
    pub const PATH_VEHICLE_TYPES_UPDATE: PathSpec = PathSpec::put("/vehicle-types/{id}/");
    pub const PATH_VEHICLE_TYPES_DELETE: PathSpec = PathSpec::delete("/vehicle-types/{id}/");

    // Permit types
    pub const PATH_PERMIT_TYPES_LIST: PathSpec = PathSpec::get("/permit-types/");
    pub const PATH_PERMIT_TYPES_CREATE: PathSpec = PathSpec::post("/permit-types/");
    pub const PATH_PERMIT_TYPES_UPDATE: PathSpec = PathSpec::put("/permit-types/{id}/");
    pub const PATH_PERMIT_TYPES_DELETE: PathSpec = PathSpec::delete("/permit-types/{id}/");

    // Permits
    pub const PATH_PERMITS_LIST: PathSpec = PathSpec::get("/permits/");
    pub const PATH_PERMITS_CREATE: PathSpec = PathSpec::post("/permits/");
    pub const PATH_PERMITS_DETAIL: PathSpec = PathSpec::get("/permits/{id}/");
    pub const PATH_PERMITS_UPDATE: PathSpec = PathSpec::patch("/permits/{id}/");
    pub const PATH_PERMITS_HISTORY: PathSpec = PathSpec::get("/permits/{id}/history/");

    // Permit reports
    pub const PATH_REPORT_DETAILED_STATS: PathSpec =
        PathSpec::get("/permits/report_detailed_stats/");
    pub const PATH_REPORT_BY_PERMIT_TYPE: PathSpec =
        PathSpec::get("/permits/report_permits_by_type/");
    pub const PATH_REPORT_BY_VEHICLE_TYPE: PathSpec =
        PathSpec::get("/permits/report_permits_by_vehicle/");
    pub const PATH_REPORT_AUTHORITY_SUMMARY: PathSpec =
        PathSpec::get("/permits/report_authority_summary/");
    pub const PATH_REPORT_EXPIRING_PERMITS: PathSpec =
        PathSpec::get("/permits/report_expiring_permits/");

    // Users
    pub const PATH_USERS_LIST: PathSpec = PathSpec::get("/users/");
    pub const PATH_USERS_CREATE: PathSpec = PathSpec::post("/users/create-user/");
    pub const PATH_USERS_ASSIGN_ROLE: PathSpec = PathSpec::post("/users/{id}/assign_role/");
    pub const PATH_USERS_ACTIVATE: PathSpec = PathSpec::post("/users/{id}/activate/");
    pub const PATH_USERS_DEACTIVATE: PathSpec = PathSpec::post("/users/{id}/deactivate/");

    // Roles and features
    pub const PATH_ROLES_LIST: PathSpec = PathSpec::get("/roles/");
    pub const PATH_ROLES_CREATE: PathSpec = PathSpec::post("/roles/");
    pub const PATH_ROLES_DETAIL: PathSpec = PathSpec::get("/roles/{id}/");
    pub const PATH_ROLES_ADD_FEATURE: PathSpec = PathSpec::post("/roles/{id}/add-feature/");
    pub const PATH_ROLES_REMOVE_FEATURE: PathSpec = PathSpec::post("/roles/{id}/remove-feature/");
    pub const PATH_FEATURES_LIST: PathSpec = PathSpec::get("/features/");

    // Notifications of the logged in user
    pub const PATH_NOTIFICATIONS_LIST: PathSpec = PathSpec::get("/notifications/");
    pub const PATH_NOTIFICATIONS_UNREAD_COUNT: PathSpec =
        PathSpec::get("/notifications/unread_count/");
    pub const PATH_NOTIFICATIONS_MARK_READ: PathSpec =
        PathSpec::post("/notifications/{id}/mark_as_read/");
    pub const PATH_NOTIFICATIONS_MARK_ALL_READ: PathSpec =
        PathSpec::post("/notifications/mark_all_as_read/");
    pub const PATH_NOTIFICATIONS_CLEAR_READ: PathSpec =
        PathSpec::delete("/notifications/clear_read/");
}
