//! Daylist backend library.
//!
//! The domain layer owns validation, result envelopes, and the action
//! services; `inbound` adapts HTTP and WebSocket traffic onto the domain
//! ports; `outbound` implements the driven ports; `server` wires everything
//! into an Actix application.

pub mod doc;
pub mod domain;
pub mod form;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
