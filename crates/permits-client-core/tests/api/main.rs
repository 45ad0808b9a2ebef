mod chalans;
mod fees;
mod health_check;
mod helpers;
mod login;
mod notifications;
mod permits;
mod reports;
mod screens;
mod types;
mod users_roles;
