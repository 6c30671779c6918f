//! API Gateway proxy Lambdas for the user service.
//!
//! One library backs three binaries: the mono-Lambda router (`user-lambda`)
//! and the single-purpose `list-users` and `update-user` functions.

pub mod handlers;
pub mod runtime;

pub use handlers::{dispatch, handler, Route};
