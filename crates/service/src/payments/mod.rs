//! Payments module: domain service over a `PaymentRepository`.
//!
//! Validation and partial-update merging live here; storage stays a plain
//! full-replace CRUD contract.

pub mod merge;
pub mod service;

pub use merge::merge_payment;
pub use service::PaymentService;
