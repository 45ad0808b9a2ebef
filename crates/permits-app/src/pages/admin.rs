pub mod features;
pub mod roles;
pub mod users;
