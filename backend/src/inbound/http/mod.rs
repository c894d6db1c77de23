//! HTTP inbound adapter exposing the form-action endpoints.

pub mod account;
pub mod auth;
pub mod error;
pub mod forms;
pub mod projects;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
