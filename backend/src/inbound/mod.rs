//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! Form-action and read endpoints live under [`http`]; the refresh feed
//! clients subscribe to lives under [`ws`].

pub mod http;
pub mod ws;
