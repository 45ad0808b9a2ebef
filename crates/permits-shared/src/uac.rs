//! Shared items related to user account control

mod access;
mod feature;
mod responses;
mod role;
pub(crate) mod user;

pub use access::{
    can_edit_permits, can_edit_this_permit, can_manage_fees, can_manage_types, can_manage_users,
    can_view_reports,
    has_feature, visible_permit_columns, PermitColumn,
};
pub use feature::{Feature, FeatureGrant, FeatureRecord};
pub use responses::{CurrentUserResponse, LoginResponse, RegisterResponse};
pub use role::{Role, RoleDraft, RoleName, ADMIN_ROLE_NAME};
pub use user::{User, Username};
