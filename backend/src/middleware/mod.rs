//! Request middleware.
//!
//! Cross-cutting request plumbing kept outside the handlers, currently the
//! trace correlation layer.

pub mod trace;

pub use trace::Trace;
