//! Hosted identity service adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `IdentityGateway` port.

mod dto;
mod http_gateway;

pub use http_gateway::HttpIdentityGateway;
