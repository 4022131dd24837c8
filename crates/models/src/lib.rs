//! Domain types shared by the storage, service and HTTP layers.

pub mod errors;
pub mod payment;

pub use payment::{Payment, PaymentInput};
