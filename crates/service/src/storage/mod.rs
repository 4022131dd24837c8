//! Storage abstractions for the service layer.
//!
//! `PaymentRepository` is the seam; `in_memory` and `csv_file` are the two
//! interchangeable backends picked at startup.

pub mod repository;
pub mod row;
pub mod in_memory;
pub mod csv_file;

pub use repository::{uuid_generator, IdGenerator, PaymentRepository};
pub use in_memory::InMemoryPaymentRepository;
pub use csv_file::CsvPaymentRepository;
