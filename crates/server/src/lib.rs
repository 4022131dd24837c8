//! HTTP surface for the payments service: `/payments` CRUD routes over a
//! `PaymentService` plus `/health`.

pub mod routes;
pub mod startup;
pub mod errors;

pub use startup::run;
