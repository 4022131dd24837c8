//! Service layer: payment storage backends and the domain service on top.
//! - `storage` holds the repository trait, the row codec and both backends.
//! - `payments` applies input validation and partial-update merging.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod payments;

pub use errors::ServiceError;
